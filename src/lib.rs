//! A small line-oriented command interpreter.
//!
//! A command line is split into `;` statements, `|` pipelines, backtick
//! substitutions and `<`/`>` redirections, and every invocation is resolved by
//! name against a registry of built-in commands implemented in Rust. Output is
//! collected in an [`OutputBuffer`](command::OutputBuffer) rather than written
//! straight to the terminal, so lines can be run and inspected from code.
//!
//! The main entry point is [`Interpreter`]. The public modules [`command`] and
//! [`registry`] expose the capability trait and the name registry for plugging
//! in your own commands; [`env`] and [`history`] hold the session state.

mod builtin;
pub mod command;
pub mod env;
pub mod error;
pub mod history;
mod interpreter;
mod lexer;
pub mod observer;
mod parser;
pub mod registry;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::Interpreter;

pub use command::{Command, CommandInput, OutputBuffer};
pub use error::ShellError;
