//! shnake: a bash-inspired command line lexer.
//!
//! This crate turns raw, possibly multi-line text into a [`parse::Pipeline`]:
//! commands joined by `&&`, `||`, `|` or `;`, each command an ordered list of
//! words and redirections. It handles quoting, escapes, comments, the usual
//! redirection forms, and asks its line source for more input when a line is
//! structurally unfinished. It performs no expansion and runs nothing.
//!
//! # Architecture
//!
//! - **[`parse`]**: Grammar: word and redirector scanners, command grouping, pipeline types.
//! - **[`session`]**: Continuation loop: line sources (prompting or buffered) and the interpreter.
//! - **[`error`]**: Syntax error taxonomy and failure classification.
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: Logger setup (stderr or file).

/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Syntax errors and their classification.
pub mod error;
/// Logger installation.
pub mod logging;
/// Command line grammar: scanners, parser, pipeline types.
pub mod parse;
/// Continuation loop over line sources.
pub mod session;

pub use error::{Error, ErrorKind, Reason, SyntaxError};
pub use parse::{ParseOutcome, Parser, Pipeline, parse};
pub use session::{Interpreter, Step};

/// Parse every unit of `script` with the default grammar, collecting the pipelines.
///
/// This is the main entry point for tests and simple usage. Interactive
/// callers should drive an [`Interpreter`] over a [`session::PromptSource`].
pub fn parse_script(script: &str) -> error::Result<Vec<Pipeline>> {
    let mut pipelines = Vec::new();
    Interpreter::default().interpret(script, |p| pipelines.push(p))?;
    Ok(pipelines)
}
