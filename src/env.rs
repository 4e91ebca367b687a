use crate::history::History;
use std::collections::HashMap;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Mutable session state shared by every invocation run through one interpreter.
///
/// The environment contains:
/// - `vars`: variables visible to built-ins (only `HOME` is consulted today).
/// - `current_dir`: the working directory relative paths are resolved against.
/// - `history`: command lines entered in this session and loaded from disk.
/// - `should_exit`: a flag that the interactive loop checks to know when to terminate.
///
/// Nothing here touches process-wide state, so several sessions can live in one process.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., HOME).
    pub vars: HashMap<String, String>,
    /// The working directory for command execution.
    pub current_dir: PathBuf,
    /// Lines entered so far, oldest first.
    pub history: History,
    /// When set to true, indicates that an interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// This copies variables from `std::env::vars()` and initializes `current_dir`
    /// from `std::env::current_dir()`.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_current_dir(current_dir)
    }

    /// Same as [`Environment::new`] but rooted at `dir`.
    pub fn with_current_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: stdenv::vars().collect(),
            current_dir: dir.into(),
            history: History::new(),
            should_exit: false,
        }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Resolve `path` against the session working directory.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir.join(path)
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
