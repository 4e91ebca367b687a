use crate::command::{Command, CommandInput, OutputBuffer};
use crate::env::Environment;
use crate::error::ShellError;
use crate::registry::CommandRegistry;
use argh::{EarlyExit, FromArgs};
use regex::RegexBuilder;
use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed directly
/// in-process. They append their output to the buffer they are given and never
/// apply redirection themselves.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name() -> &'static str;

    /// Executes the command with its parsed arguments.
    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError>;
}

/// Adapter exposing a [`BuiltinCommand`] through the object-safe [`Command`] trait.
///
/// Argument errors reported by argh become [`ShellError::InvalidArgs`]; an
/// explicit help request writes the generated usage text as output.
pub(crate) struct Builtin<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Builtin<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T: BuiltinCommand> Command for Builtin<T> {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputBuffer,
        input: &CommandInput<'_>,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match T::from_args(&[T::name()], &args) {
            Ok(cmd) => cmd.execute(input, out, env),
            Err(EarlyExit {
                output,
                status: Ok(()),
            }) => {
                out.push(output);
                Ok(())
            }
            Err(EarlyExit {
                output,
                status: Err(()),
            }) => Err(ShellError::InvalidArgs(format!(
                "{}: {}",
                T::name(),
                output.trim()
            ))),
        }
    }
}

fn construct<T: BuiltinCommand + 'static>() -> Rc<dyn Command> {
    Rc::new(Builtin::<T>::default())
}

/// Register every built-in of this crate in `registry`.
pub(crate) fn register_all(registry: &mut CommandRegistry) {
    registry.register_shared(Pwd::name(), construct::<Pwd>);
    registry.register(Cd::name(), construct::<Cd>);
    registry.register("echo", || -> Rc<dyn Command> { Rc::new(Echo) });
    registry.register(Exit::name(), construct::<Exit>);
    registry.register(Ls::name(), construct::<Ls>);
    registry.register(Cat::name(), construct::<Cat>);
    registry.register(Head::name(), construct::<Head>);
    registry.register(Tail::name(), construct::<Tail>);
    registry.register(Grep::name(), construct::<Grep>);
    registry.register(Cut::name(), construct::<Cut>);
    registry.register("find", || -> Rc<dyn Command> { Rc::new(Find) });
    registry.register(Uniq::name(), construct::<Uniq>);
    registry.register(Sort::name(), construct::<Sort>);
    registry.register(Mkdir::name(), construct::<Mkdir>);
    registry.register(Rmdir::name(), construct::<Rmdir>);
    registry.register(Rm::name(), construct::<Rm>);
    registry.register(Wc::name(), construct::<Wc>);
    registry.register(HistoryList::name(), construct::<HistoryList>);
}

fn read_file(env: &Environment, name: &str, cmd: &str) -> Result<String, ShellError> {
    let bytes = fs::read(env.resolve(name))
        .map_err(|e| ShellError::from_io(e, format!("{}: {}", cmd, name)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Text a filter works on: the named file if there is one, else the command input.
fn source_text(
    file: Option<&str>,
    input: &CommandInput<'_>,
    env: &Environment,
    cmd: &str,
) -> Result<String, ShellError> {
    match file {
        Some(name) => read_file(env, name, cmd),
        None => input
            .read()?
            .ok_or_else(|| ShellError::InvalidArgs(format!("{}: no input provided", cmd))),
    }
}

fn push_lines<'a>(out: &mut OutputBuffer, lines: impl IntoIterator<Item = &'a str>) {
    for line in lines {
        out.push(format!("{}\n", line));
    }
}

#[derive(FromArgs)]
/// Print the current working directory to standard output.
pub struct Pwd {}

impl BuiltinCommand for Pwd {
    fn name() -> &'static str {
        "pwd"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        out.push(format!("{}\n", env.current_dir.to_string_lossy()));
        Ok(())
    }
}

#[derive(FromArgs)]
/// Change the current working directory.
/// If no target is provided, changes to the directory specified by the HOME environment variable.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory. Defaults to $HOME when omitted.
    pub target: Option<String>,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        _out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let target = match self.target {
            Some(t) if !t.is_empty() => t,
            _ => env.get_var("HOME").ok_or_else(|| {
                ShellError::InvalidArgs("cd: no target and HOME not set".to_string())
            })?,
        };

        let canonical = fs::canonicalize(env.resolve(&target))
            .map_err(|e| ShellError::from_io(e, format!("cd: {}", target)))?;
        if !canonical.is_dir() {
            return Err(ShellError::Io(format!("cd: {}: not a directory", target)));
        }
        env.current_dir = canonical;
        Ok(())
    }
}

#[derive(FromArgs)]
/// Leave the interactive shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// ignored
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        _out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        env.should_exit = true;
        Ok(())
    }
}

/// `echo [-n] ARGS...`: write the arguments separated by spaces, followed by
/// a newline unless the first argument is `-n`.
///
/// Any other word is printed as-is, including ones starting with a dash, so
/// this one skips argh and implements [`Command`] directly.
pub struct Echo;

impl Command for Echo {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputBuffer,
        _input: &CommandInput<'_>,
        _env: &mut Environment,
    ) -> Result<(), ShellError> {
        let (no_newline, words) = match args.split_first() {
            Some((flag, rest)) if flag == "-n" => (true, rest),
            _ => (false, args),
        };
        let s = words.join(" ");
        if no_newline {
            out.push(s);
        } else {
            out.push(format!("{}\n", s));
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// list directory contents, hidden entries excluded
pub struct Ls {
    #[argh(positional)]
    /// directory to list; defaults to the current directory
    pub path: Option<String>,
}

impl BuiltinCommand for Ls {
    fn name() -> &'static str {
        "ls"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let shown = self.path.as_deref().unwrap_or(".");
        let dir = env.resolve(shown);
        let context = || format!("ls: {}", shown);

        let meta = fs::metadata(&dir).map_err(|e| ShellError::from_io(e, context()))?;
        if !meta.is_dir() {
            out.push(format!("{}\n", shown));
            return Ok(());
        }

        let mut names = fs::read_dir(&dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
                    .collect::<io::Result<Vec<_>>>()
            })
            .map_err(|e| ShellError::from_io(e, context()))?;
        names.retain(|name| !name.starts_with('.'));
        names.sort();
        push_lines(out, names.iter().map(String::as_str));
        Ok(())
    }
}

#[derive(argh::FromArgs)]
/// print file(s) to stdout
pub struct Cat {
    #[argh(positional, greedy)]
    /// files to print; the command input is used when none are given
    pub files: Vec<String>,
}

impl BuiltinCommand for Cat {
    fn name() -> &'static str {
        "cat"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        if self.files.is_empty() {
            let text = input.read()?.ok_or_else(|| {
                ShellError::InvalidArgs("cat: no files specified".to_string())
            })?;
            if !text.is_empty() {
                out.push(text);
            }
            return Ok(());
        }
        for fname in &self.files {
            out.push(read_file(env, fname, "cat")?);
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// print the first lines of a file or of the input
pub struct Head {
    #[argh(option, short = 'n', default = "10")]
    /// number of lines to print
    pub lines: usize,

    #[argh(positional)]
    /// file to read; the command input is used when omitted
    pub file: Option<String>,
}

impl BuiltinCommand for Head {
    fn name() -> &'static str {
        "head"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let text = source_text(self.file.as_deref(), input, env, "head")?;
        push_lines(out, text.lines().take(self.lines));
        Ok(())
    }
}

#[derive(FromArgs)]
/// print the last lines of a file or of the input
pub struct Tail {
    #[argh(option, short = 'n', default = "10")]
    /// number of lines to print
    pub lines: usize,

    #[argh(positional)]
    /// file to read; the command input is used when omitted
    pub file: Option<String>,
}

impl BuiltinCommand for Tail {
    fn name() -> &'static str {
        "tail"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        // Nothing to print, so the input is never opened.
        if self.lines == 0 {
            return Ok(());
        }
        let text = source_text(self.file.as_deref(), input, env, "tail")?;
        let lines: Vec<&str> = text.lines().collect();
        let start = lines.len().saturating_sub(self.lines);
        push_lines(out, lines[start..].iter().copied());
        Ok(())
    }
}

#[derive(argh::FromArgs)]
/// print lines matching a pattern
pub struct Grep {
    #[argh(positional)]
    /// the pattern to search for (a regular expression)
    pub pattern: String,

    #[argh(positional, greedy)]
    /// files to search. If none provided, reads the command input.
    pub files: Vec<String>,

    #[argh(switch, short = 'w')]
    /// match only whole words (using non-word characters as boundaries)
    pub word_regexp: bool,

    #[argh(switch, short = 'i')]
    /// ignore case distinctions
    pub ignore_case: bool,
}

impl Grep {
    fn filter(&self, text: &str, prefix: &str, re: &regex::Regex, out: &mut OutputBuffer) {
        for line in text.lines().filter(|line| re.is_match(line)) {
            out.push(format!("{}{}\n", prefix, line));
        }
    }
}

impl BuiltinCommand for Grep {
    fn name() -> &'static str {
        "grep"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let pattern = if self.word_regexp {
            format!(r"\b({})\b", self.pattern)
        } else {
            self.pattern.clone()
        };

        let re = RegexBuilder::new(&pattern)
            .case_insensitive(self.ignore_case)
            .build()
            .map_err(|e| {
                ShellError::InvalidArgs(format!("grep: invalid regex pattern {}: {}", pattern, e))
            })?;

        if self.files.is_empty() {
            let text = input.read()?.ok_or_else(|| {
                ShellError::InvalidArgs("grep: no input data or file provided".to_string())
            })?;
            self.filter(&text, "", &re, out);
            return Ok(());
        }

        let multiple = self.files.len() > 1;
        for file_name in &self.files {
            let text = read_file(env, file_name, "grep")?;
            let prefix = if multiple {
                format!("{}:", file_name)
            } else {
                String::new()
            };
            self.filter(&text, &prefix, &re, out);
        }
        Ok(())
    }
}

/// Half-open byte range; `end == None` runs to the end of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ByteRange {
    start: usize,
    end: Option<usize>,
}

/// Parses a `cut -b` list such as `1,3-5,-2,7-` into merged 0-based ranges.
fn parse_byte_ranges(list: &str) -> Result<Vec<ByteRange>, ShellError> {
    let position = |s: &str| match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ShellError::InvalidArgs(format!(
            "cut: invalid byte position '{}'",
            s
        ))),
    };

    let mut ranges = Vec::new();
    for part in list.split(',') {
        let range = match part.split_once('-') {
            None => {
                let n = position(part)?;
                ByteRange {
                    start: n - 1,
                    end: Some(n),
                }
            }
            Some(("", "")) => {
                return Err(ShellError::InvalidArgs(
                    "cut: invalid range with no endpoint: -".to_string(),
                ));
            }
            Some(("", end)) => ByteRange {
                start: 0,
                end: Some(position(end)?),
            },
            Some((start, "")) => ByteRange {
                start: position(start)? - 1,
                end: None,
            },
            Some((start, end)) => {
                let (start, end) = (position(start)?, position(end)?);
                if end < start {
                    return Err(ShellError::InvalidArgs(format!(
                        "cut: invalid decreasing range '{}'",
                        part
                    )));
                }
                ByteRange {
                    start: start - 1,
                    end: Some(end),
                }
            }
        };
        ranges.push(range);
    }
    Ok(merge_byte_ranges(ranges))
}

/// Sorts ranges and merges every pair that touches or overlaps.
fn merge_byte_ranges(mut ranges: Vec<ByteRange>) -> Vec<ByteRange> {
    ranges.sort_by_key(|r| r.start);
    let mut merged: Vec<ByteRange> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if last.end.is_none_or(|end| range.start <= end) => {
                last.end = match (last.end, range.end) {
                    (Some(a), Some(b)) => Some(a.max(b)),
                    _ => None,
                };
            }
            _ => merged.push(range),
        }
    }
    merged
}

fn select_bytes(line: &str, ranges: &[ByteRange]) -> String {
    let bytes = line.as_bytes();
    let mut selected = Vec::with_capacity(bytes.len());
    for range in ranges.iter().filter(|r| r.start < bytes.len()) {
        let end = range.end.map_or(bytes.len(), |e| e.min(bytes.len()));
        selected.extend_from_slice(&bytes[range.start..end]);
    }
    String::from_utf8_lossy(&selected).into_owned()
}

#[derive(FromArgs)]
/// print selected bytes of each line
pub struct Cut {
    #[argh(option, short = 'b')]
    /// comma-separated 1-based byte positions and ranges (N, N-M, -M, N-)
    pub bytes: String,

    #[argh(positional)]
    /// file to read; the command input is used when omitted
    pub file: Option<String>,
}

impl BuiltinCommand for Cut {
    fn name() -> &'static str {
        "cut"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let ranges = parse_byte_ranges(&self.bytes)?;
        let text = source_text(self.file.as_deref(), input, env, "cut")?;
        for line in text.lines() {
            out.push(format!("{}\n", select_bytes(line, &ranges)));
        }
        Ok(())
    }
}

/// `find [PATH] -name PATTERN`: recursive search for files whose name matches
/// a shell pattern.
///
/// The single-dash `-name` option does not fit argh's conventions, so this one
/// implements [`Command`] directly.
pub struct Find;

impl Find {
    const USAGE: &'static str = "find: expected format: find [PATH] -name PATTERN";

    fn walk(
        dir: &Path,
        relative: &Path,
        matcher: &glob::Pattern,
        found: &mut Vec<String>,
    ) -> io::Result<()> {
        let mut entries = fs::read_dir(dir)?.collect::<io::Result<Vec<_>>>()?;
        entries.sort_by_key(|e| e.file_name());
        for entry in entries {
            let name = entry.file_name();
            let rel = relative.join(&name);
            if entry.file_type()?.is_dir() {
                Self::walk(&entry.path(), &rel, matcher, found)?;
            } else if matcher.matches(&name.to_string_lossy()) {
                found.push(rel.to_string_lossy().into_owned());
            }
        }
        Ok(())
    }
}

impl Command for Find {
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputBuffer,
        _input: &CommandInput<'_>,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let (root, pattern) = match args {
            [flag, pattern] if flag == "-name" => (".", pattern),
            [root, flag, pattern] if flag == "-name" => (root.as_str(), pattern),
            _ => return Err(ShellError::InvalidArgs(Self::USAGE.to_string())),
        };
        if pattern.trim().is_empty() {
            return Err(ShellError::InvalidArgs(
                "find: a search pattern must be provided".to_string(),
            ));
        }
        let matcher = glob::Pattern::new(pattern).map_err(|e| {
            ShellError::InvalidArgs(format!("find: invalid pattern '{}': {}", pattern, e))
        })?;

        let dir = env.resolve(root);
        let context = || format!("find: {}", root);
        let meta = fs::metadata(&dir).map_err(|e| ShellError::from_io(e, context()))?;
        if !meta.is_dir() {
            return Err(ShellError::InvalidArgs(format!(
                "find: '{}' is not a directory",
                root
            )));
        }

        let mut found = Vec::new();
        Self::walk(&dir, Path::new(""), &matcher, &mut found)
            .map_err(|e| ShellError::from_io(e, context()))?;

        let root = root.trim_end_matches('/');
        for rel in found {
            out.push(format!("{}/{}\n", root, rel));
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// drop adjacent duplicate lines
pub struct Uniq {
    #[argh(switch, short = 'i')]
    /// compare lines case-insensitively
    pub ignore_case: bool,

    #[argh(positional)]
    /// file to read; the command input is used when omitted
    pub file: Option<String>,
}

impl BuiltinCommand for Uniq {
    fn name() -> &'static str {
        "uniq"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let text = source_text(self.file.as_deref(), input, env, "uniq")?;
        // Comparison starts from an empty line, so leading blank lines are dropped.
        let mut last = String::new();
        for line in text.lines() {
            let key = if self.ignore_case {
                line.trim().to_lowercase()
            } else {
                line.trim().to_string()
            };
            if key != last {
                out.push(format!("{}\n", line));
                last = key;
            }
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// sort lines
pub struct Sort {
    #[argh(switch, short = 'r')]
    /// reverse the result
    pub reverse: bool,

    #[argh(positional)]
    /// file to read; the command input is used when omitted
    pub file: Option<String>,
}

impl BuiltinCommand for Sort {
    fn name() -> &'static str {
        "sort"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        let text = source_text(self.file.as_deref(), input, env, "sort")?;
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        if self.reverse {
            lines.reverse();
        }
        push_lines(out, lines);
        Ok(())
    }
}

#[derive(FromArgs)]
/// create directories, parents included
pub struct Mkdir {
    #[argh(positional, greedy)]
    /// directories to create
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Mkdir {
    fn name() -> &'static str {
        "mkdir"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        _out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        if self.dirs.is_empty() {
            return Err(ShellError::InvalidArgs(
                "mkdir: no directory path specified".to_string(),
            ));
        }
        for dir in &self.dirs {
            fs::create_dir_all(env.resolve(dir))
                .map_err(|e| ShellError::from_io(e, format!("mkdir: {}", dir)))?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// remove empty directories
pub struct Rmdir {
    #[argh(positional, greedy)]
    /// directories to remove
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Rmdir {
    fn name() -> &'static str {
        "rmdir"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        _out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        if self.dirs.is_empty() {
            return Err(ShellError::InvalidArgs(
                "rmdir: no directory path specified".to_string(),
            ));
        }
        for dir in &self.dirs {
            fs::remove_dir(env.resolve(dir))
                .map_err(|e| ShellError::from_io(e, format!("rmdir: {}", dir)))?;
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// remove files
pub struct Rm {
    #[argh(positional, greedy)]
    /// files to remove
    pub files: Vec<String>,
}

impl BuiltinCommand for Rm {
    fn name() -> &'static str {
        "rm"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        _out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        if self.files.is_empty() {
            return Err(ShellError::InvalidArgs(
                "rm: no files specified".to_string(),
            ));
        }
        for file in &self.files {
            fs::remove_file(env.resolve(file))
                .map_err(|e| ShellError::from_io(e, format!("rm: {}", file)))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Counts {
    fn of(text: &str) -> Self {
        Self {
            lines: text.lines().count(),
            words: text.split_whitespace().count(),
            bytes: text.len(),
        }
    }
}

#[derive(argh::FromArgs)]
/// count lines, words and bytes
pub struct Wc {
    #[argh(switch, short = 'l')]
    /// print the line count
    pub lines: bool,

    #[argh(switch, short = 'w')]
    /// print the word count
    pub words: bool,

    #[argh(switch, short = 'c')]
    /// print the byte count
    pub bytes: bool,

    #[argh(positional, greedy)]
    /// files to count; the command input is used when none are given
    pub files: Vec<String>,
}

impl Wc {
    /// Selected counts in line, word, byte order; all three when none is selected.
    fn format(&self, counts: Counts) -> String {
        let all = !(self.lines || self.words || self.bytes);
        let fields = [
            (self.lines, counts.lines),
            (self.words, counts.words),
            (self.bytes, counts.bytes),
        ];
        fields
            .iter()
            .filter(|(selected, _)| all || *selected)
            .map(|(_, n)| n.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BuiltinCommand for Wc {
    fn name() -> &'static str {
        "wc"
    }

    fn execute(
        self,
        input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        if self.files.is_empty() {
            let text = input.read()?.ok_or_else(|| {
                ShellError::InvalidArgs("wc: no files or input provided".to_string())
            })?;
            out.push(format!("{}\n", self.format(Counts::of(&text))));
            return Ok(());
        }
        for fname in &self.files {
            let text = read_file(env, fname, "wc")?;
            out.push(format!("{} {}\n", self.format(Counts::of(&text)), fname));
        }
        Ok(())
    }
}

#[derive(FromArgs)]
/// print the command history
pub struct HistoryList {}

impl BuiltinCommand for HistoryList {
    fn name() -> &'static str {
        "history"
    }

    fn execute(
        self,
        _input: &CommandInput<'_>,
        out: &mut OutputBuffer,
        env: &mut Environment,
    ) -> Result<(), ShellError> {
        for (i, line) in env.history.entries().iter().enumerate() {
            out.push(format!("{}: {}\n", i + 1, line));
        }
        Ok(())
    }
}
