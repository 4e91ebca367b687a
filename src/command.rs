use crate::env::Environment;
use crate::error::ShellError;
use std::collections::VecDeque;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Ordered, append-only sequence of text chunks produced by commands.
///
/// Insertion order is output order. The buffer never reorders or merges what
/// was pushed; it is consumed by printing, by feeding the next pipeline stage,
/// or by being captured for a substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    chunks: VecDeque<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk.
    pub fn push(&mut self, chunk: impl Into<String>) {
        self.chunks.push_back(chunk.into());
    }

    /// Move every chunk of `other` to the end of `self`, leaving `other` empty.
    pub fn append(&mut self, other: &mut OutputBuffer) {
        self.chunks.append(&mut other.chunks);
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// All chunks joined into a single text blob.
    pub fn concat(&self) -> String {
        self.chunks.iter().map(String::as_str).collect()
    }

    /// Write chunks to `writer` front to back, removing each one once written.
    pub fn drain_to(&mut self, writer: &mut dyn Write) -> io::Result<()> {
        while let Some(chunk) = self.chunks.pop_front() {
            writer.write_all(chunk.as_bytes())?;
        }
        writer.flush()
    }
}

/// Everything a command may read besides its arguments.
///
/// `output_redirect` is informational: the dispatcher applies redirection
/// after the command returns, so built-ins must not write to it themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandInput<'a> {
    /// Output of the previous pipeline stage, if any.
    pub data: Option<&'a str>,
    /// File named by `<PATH`, already resolved and checked to exist.
    pub input_redirect: Option<&'a Path>,
    /// File named by `>PATH`, already resolved.
    pub output_redirect: Option<&'a Path>,
}

impl CommandInput<'_> {
    /// The command's standard input: the redirected file if there is one,
    /// otherwise the piped data. `None` when neither is present.
    pub fn read(&self) -> Result<Option<String>, ShellError> {
        if let Some(path) = self.input_redirect {
            let bytes = fs::read(path).map_err(|e| ShellError::from_io(e, path.display()))?;
            return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()));
        }
        Ok(self.data.map(str::to_owned))
    }
}

/// The single capability every built-in exposes.
///
/// The dispatcher is polymorphic over this trait: it resolves a name to a
/// `Command`, calls `execute`, and applies output redirection afterwards.
pub trait Command {
    /// Run with resolved arguments, appending output chunks to `out`.
    fn execute(
        &self,
        args: &[String],
        out: &mut OutputBuffer,
        input: &CommandInput<'_>,
        env: &mut Environment,
    ) -> Result<(), ShellError>;
}
