//! Hooks notified after a command line has been executed.

use crate::error::ShellError;

/// What happened to one command line.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionEvent<'a> {
    pub command_line: &'a str,
    /// `None` when the line ran to completion.
    pub error: Option<&'a ShellError>,
}

/// Receives an [`ExecutionEvent`] for every line run through
/// [`Interpreter::execute_and_notify`](crate::Interpreter::execute_and_notify).
pub trait Observer {
    fn update(&self, event: &ExecutionEvent<'_>);
}

/// Logs failed lines, and successful ones too when `verbose` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandLogger {
    pub verbose: bool,
}

impl CommandLogger {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl Observer for CommandLogger {
    fn update(&self, event: &ExecutionEvent<'_>) {
        match event.error {
            Some(e) => log::error!("Error: {}", e),
            None if self.verbose => log::info!("Executed: {}", event.command_line),
            None => {}
        }
    }
}
