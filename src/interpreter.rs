use crate::command::{CommandInput, OutputBuffer};
use crate::env::Environment;
use crate::error::ShellError;
use crate::history::History;
use crate::lexer;
use crate::observer::{ExecutionEvent, Observer};
use crate::parser::{self, AstNode, CommandNode, Substitution};
use crate::registry::CommandRegistry;
use anyhow::Context;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fs::File;
use std::io;
use std::path::Path;

/// A line-oriented interpreter running built-in commands against one session.
///
/// The interpreter owns the session [`Environment`] and a [`CommandRegistry`]
/// that names are resolved against. See [`Default`] for the interpreter with
/// every built-in registered.
///
/// Example
/// ```
/// use line_shell::Interpreter;
/// let mut sh = Interpreter::default();
/// let out = sh.run("echo hello | wc -w").unwrap();
/// assert_eq!(out.concat(), "1\n");
/// ```
pub struct Interpreter {
    env: Environment,
    registry: CommandRegistry,
    observers: Vec<Box<dyn Observer>>,
}

impl Interpreter {
    /// Create a new interpreter resolving names against `registry`.
    pub fn new(registry: CommandRegistry) -> Self {
        Self::with_env(registry, Environment::new())
    }

    /// Same as [`Interpreter::new`] with an explicit session.
    pub fn with_env(registry: CommandRegistry, env: Environment) -> Self {
        Self {
            env,
            registry,
            observers: Vec::new(),
        }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Notify `observer` about every line run through [`Interpreter::execute_and_notify`].
    pub fn attach(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Run one command line and return everything it printed.
    pub fn run(&mut self, line: &str) -> Result<OutputBuffer, ShellError> {
        self.run_with_input(line, None)
    }

    /// Run one command line with `data` as input for the statements it contains.
    pub fn run_with_input(
        &mut self,
        line: &str,
        data: Option<&str>,
    ) -> Result<OutputBuffer, ShellError> {
        let mut out = OutputBuffer::new();
        self.run_into(line, data, &mut out)?;
        Ok(out)
    }

    /// Run one command line, appending its output to `out`.
    ///
    /// The line is parsed completely before anything runs, so a syntax error
    /// means nothing runs. A statement failing at execution time does not stop
    /// the statements after it: its error goes to stderr, and the last such
    /// error is returned once the line is done. `out` keeps everything printed.
    pub fn run_into(
        &mut self,
        line: &str,
        data: Option<&str>,
        out: &mut OutputBuffer,
    ) -> Result<(), ShellError> {
        let ast = parser::parse_line(line)?;
        self.execute_node(&ast, data, out)
    }

    /// [`Interpreter::run_into`] followed by notification of every attached observer.
    pub fn execute_and_notify(
        &mut self,
        line: &str,
        out: &mut OutputBuffer,
    ) -> Result<(), ShellError> {
        let result = self.run_into(line, None, out);
        let event = ExecutionEvent {
            command_line: line,
            error: result.as_ref().err(),
        };
        for observer in &self.observers {
            observer.update(&event);
        }
        result
    }

    /// Interactive Read-Eval-Print Loop.
    ///
    /// Reads lines until `exit`, end of input or an interrupt. History is loaded
    /// from `history_path` before the first prompt and written back at the end.
    pub fn repl(&mut self, history_path: Option<&Path>) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(path) = history_path {
            self.env.history = History::load(path)
                .with_context(|| format!("failed to load history from {}", path.display()))?;
            for line in self.env.history.entries() {
                rl.add_history_entry(line.as_str())?;
            }
        }

        loop {
            let prompt = format!("{}> ", self.env.current_dir.display());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed == "exit" {
                        break;
                    }
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.env.history.push(line.as_str());
                    rl.add_history_entry(line.as_str())?;

                    let mut out = OutputBuffer::new();
                    let result = self.execute_and_notify(&line, &mut out);
                    out.drain_to(&mut io::stdout().lock())
                        .context("failed to write output")?;
                    if let Err(e) = result {
                        eprintln!("{}", e);
                    }
                    if self.env.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(path) = history_path {
            self.env
                .history
                .save(path)
                .with_context(|| format!("failed to save history to {}", path.display()))?;
        }
        Ok(())
    }

    fn execute_node(
        &mut self,
        node: &AstNode,
        data: Option<&str>,
        out: &mut OutputBuffer,
    ) -> Result<(), ShellError> {
        match node {
            AstNode::Sequence(statements) => {
                // Only the last failure is returned; earlier ones are reported here.
                let mut failure: Option<ShellError> = None;
                for statement in statements {
                    match self.execute_node(statement, data, out) {
                        Ok(()) => {}
                        Err(e) if e.is_statement_local() => {
                            if let Some(previous) = failure.replace(e) {
                                report(&previous);
                            }
                        }
                        Err(e) => {
                            if let Some(previous) = failure.take() {
                                report(&previous);
                            }
                            return Err(e);
                        }
                    }
                }
                failure.map_or(Ok(()), Err)
            }
            AstNode::Pipeline(stages) => {
                let Some((last, init)) = stages.split_last() else {
                    return Ok(());
                };
                let mut piped: Option<String> = data.map(str::to_owned);
                for stage in init {
                    let mut captured = OutputBuffer::new();
                    self.execute_node(stage, piped.as_deref(), &mut captured)?;
                    piped = Some(captured.concat());
                }
                self.execute_node(last, piped.as_deref(), out)
            }
            AstNode::Substitution(subst) => {
                let expanded = self.expand(subst)?;
                log::debug!("substituted: {}", expanded);
                let ast = parser::parse_line(&expanded)?;
                self.execute_node(&ast, data, out)
            }
            AstNode::Command(cmd) => self.execute_command(cmd, data, out),
        }
    }

    /// Replaces every backtick span with the trimmed output of its body.
    fn expand(&mut self, subst: &Substitution) -> Result<String, ShellError> {
        let mut expanded = String::with_capacity(subst.text.len());
        let mut cursor = 0;
        for span in &subst.spans {
            expanded.push_str(&subst.text[cursor..span.range.start]);
            let mut captured = OutputBuffer::new();
            self.execute_node(&span.body, None, &mut captured)?;
            expanded.push_str(captured.concat().trim_end());
            cursor = span.range.end;
        }
        expanded.push_str(&subst.text[cursor..]);
        Ok(expanded)
    }

    fn execute_command(
        &mut self,
        node: &CommandNode,
        data: Option<&str>,
        out: &mut OutputBuffer,
    ) -> Result<(), ShellError> {
        let input_path = node.input.as_ref().map(|p| self.env.resolve(p));
        if let (Some(path), Some(shown)) = (&input_path, &node.input) {
            if !path.exists() {
                return Err(ShellError::NotFound(format!("input file '{}'", shown)));
            }
        }
        let output_path = node.output.as_ref().map(|p| self.env.resolve(p));

        let tokens = lexer::split_into_tokens(&node.text, &self.env.current_dir)?;
        let Some((name, args)) = tokens.split_first() else {
            if node.input.is_some() || node.output.is_some() {
                return Err(ShellError::Syntax(
                    "missing command before redirection".to_string(),
                ));
            }
            return Ok(());
        };

        let command = self.registry.resolve(name)?;
        let input = CommandInput {
            data,
            input_redirect: input_path.as_deref(),
            output_redirect: output_path.as_deref(),
        };
        log::debug!("dispatching {} {:?}", name, args);

        let mut local = OutputBuffer::new();
        let result = command.execute(args, &mut local, &input, &mut self.env);
        let Some(path) = output_path else {
            out.append(&mut local);
            return result;
        };
        result?;
        let mut file = File::create(&path).map_err(|e| ShellError::from_io(e, path.display()))?;
        local
            .drain_to(&mut file)
            .map_err(|e| ShellError::from_io(e, path.display()))
    }
}

fn report(err: &ShellError) {
    log::warn!("statement failed: {}", err);
    eprintln!("{}", err);
}

impl Default for Interpreter {
    /// Create an interpreter with every built-in registered.
    fn default() -> Self {
        Self::new(CommandRegistry::with_builtins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn shell() -> (TempDir, Interpreter) {
        let dir = TempDir::new().unwrap();
        let env = Environment::with_current_dir(dir.path());
        (dir, Interpreter::with_env(CommandRegistry::with_builtins(), env))
    }

    fn run(sh: &mut Interpreter, line: &str) -> String {
        sh.run(line).unwrap().concat()
    }

    #[test]
    fn test_echo_pipe_wc_output() {
        let (_dir, mut sh) = shell();
        assert_eq!(run(&mut sh, "echo \"22\" | wc"), "1 1 3\n");
    }

    #[test]
    fn test_statements_share_the_session() {
        let (dir, mut sh) = shell();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let out = run(&mut sh, "cd sub; pwd");
        let expected = fs::canonicalize(dir.path().join("sub")).unwrap();
        assert_eq!(out, format!("{}\n", expected.display()));
    }

    #[test]
    fn test_substitution_is_spliced_and_reparsed() {
        let (_dir, mut sh) = shell();
        assert_eq!(run(&mut sh, "echo `echo foo; echo bar`"), "foo bar\n");
        assert_eq!(run(&mut sh, "echo \"a `echo \"b\"`\""), "a b\n");
        assert_eq!(run(&mut sh, "`echo echo` hi"), "hi\n");
    }

    #[test]
    fn test_output_redirect_writes_file_instead_of_buffer() {
        let (dir, mut sh) = shell();
        assert_eq!(run(&mut sh, "echo AAA > out.txt"), "");
        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "AAA\n"
        );
        run(&mut sh, "echo B > out.txt");
        assert_eq!(
            fs::read_to_string(dir.path().join("out.txt")).unwrap(),
            "B\n"
        );
    }

    #[test]
    fn test_input_redirect_must_exist_before_dispatch() {
        let (_dir, mut sh) = shell();
        assert!(matches!(
            sh.run("frobnicate < missing.txt"),
            Err(ShellError::NotFound(_))
        ));
        assert_eq!(run(&mut sh, "echo x > in.txt; cat < in.txt"), "x\n");
    }

    #[test]
    fn test_failed_statement_does_not_stop_the_line() {
        let (_dir, mut sh) = shell();
        let mut out = OutputBuffer::new();
        let result = sh.run_into("echo before; nosuch; echo after", None, &mut out);
        assert_eq!(result, Err(ShellError::UnknownCommand("nosuch".to_string())));
        assert_eq!(out.concat(), "before\nafter\n");
    }

    #[test]
    fn test_statements_after_a_failing_one_still_run() {
        let (dir, mut sh) = shell();
        let mut out = OutputBuffer::new();
        let result = sh.run_into("rmdir nothere; mkdir d; echo ok", None, &mut out);
        assert!(matches!(result, Err(ShellError::NotFound(_))));
        assert!(dir.path().join("d").is_dir());
        assert_eq!(out.concat(), "ok\n");

        let result = sh.run_into("rmdir nothere; rmdir d", None, &mut out);
        assert!(matches!(result, Err(ShellError::NotFound(_))));
        assert!(!dir.path().join("d").exists());
    }

    #[test]
    fn test_last_failure_is_the_line_status() {
        let (_dir, mut sh) = shell();
        let result = sh.run("nosuch; cat missing.txt; echo done");
        assert!(matches!(result, Err(ShellError::NotFound(_))));
    }

    #[test]
    fn test_syntax_error_from_substitution_stops_the_line() {
        let (dir, mut sh) = shell();
        let result = sh.run("echo `echo \"'\"`; mkdir late");
        assert!(matches!(result, Err(ShellError::Syntax(_))));
        assert!(!dir.path().join("late").exists());
    }

    #[test]
    fn test_syntax_error_runs_nothing() {
        let (dir, mut sh) = shell();
        assert!(matches!(
            sh.run("echo x > made.txt; echo \"open"),
            Err(ShellError::Syntax(_))
        ));
        assert!(!dir.path().join("made.txt").exists());
    }

    #[test]
    fn test_redirect_without_command() {
        let (_dir, mut sh) = shell();
        assert!(matches!(
            sh.run("> out.txt"),
            Err(ShellError::Syntax(_))
        ));
    }

    #[test]
    fn test_run_with_input_feeds_first_stage() {
        let (_dir, mut sh) = shell();
        let out = sh.run_with_input("sort -r", Some("a\nc\nb\n")).unwrap();
        assert_eq!(out.concat(), "c\nb\na\n");
    }
}
