use anyhow::Context;
use argh::FromArgs;
use line_shell::observer::CommandLogger;
use line_shell::{Interpreter, OutputBuffer};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

const HISTORY_FILE: &str = ".line_shell_history";

#[derive(FromArgs)]
/// Line-oriented shell with built-in commands.
/// Starts an interactive session unless a command line is given with -c.
struct Args {
    #[argh(option, short = 'c')]
    /// run a single command line and exit
    command: Option<String>,

    #[argh(option)]
    /// history file; defaults to ~/.line_shell_history
    history: Option<PathBuf>,

    #[argh(switch, short = 'v')]
    /// log every executed line, not only failures
    verbose: bool,
}

fn default_history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(HISTORY_FILE))
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();

    let mut shell = Interpreter::default();
    shell.attach(Box::new(CommandLogger::new(args.verbose)));

    let Some(line) = args.command else {
        let history = args.history.or_else(default_history_path);
        shell.repl(history.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    };

    let mut out = OutputBuffer::new();
    let result = shell.execute_and_notify(&line, &mut out);
    out.drain_to(&mut io::stdout().lock())
        .context("failed to write output")?;
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
