//! Continuation loop: turns a line source into pipelines.
//!
//! Each unit of input starts with one line. If the buffered text is
//! structurally unfinished (open quote, trailing backslash, dangling `&&`
//! or `||`), one more line is fetched, appended, and the whole buffer is
//! parsed again. When the source runs dry first, the last incomplete error
//! is returned as is.

pub mod source;

pub use source::{BufferSource, LineSource, PromptSource};

use log::debug;

use crate::error::Result;
use crate::parse::{ParseOutcome, Parser, Pipeline};

/// What one pass of the continuation loop produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Pipeline(Pipeline),
    /// The unit held only blanks and comments.
    Blank,
    /// The source had no more lines.
    Exhausted,
}

/// Drives a [`Parser`] over a [`LineSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpreter {
    parser: Parser,
}

impl Interpreter {
    pub fn new(parser: Parser) -> Self {
        Self { parser }
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    /// Read lines until they form one pipeline, a blank unit, or an error.
    ///
    /// Incomplete input that the source cannot finish is returned as an
    /// [`ErrorKind::Incomplete`](crate::error::ErrorKind::Incomplete) syntax
    /// error; malformed input is returned as soon as it is seen.
    pub fn read_pipeline<S>(&self, source: &mut S) -> Result<Step>
    where
        S: LineSource + ?Sized,
    {
        let Some(first) = source.read_line(false)? else {
            return Ok(Step::Exhausted);
        };
        let mut buffer = String::new();
        push_line(&mut buffer, &first);

        loop {
            let text = buffer.strip_suffix('\n').unwrap_or(&buffer);
            match self.parser.parse(text) {
                ParseOutcome::Complete(pipeline) => return Ok(Step::Pipeline(pipeline)),
                ParseOutcome::Empty => return Ok(Step::Blank),
                ParseOutcome::Fatal(e) => {
                    debug!("fatal: {e}");
                    return Err(e.into());
                }
                ParseOutcome::Incomplete(e) => {
                    debug!("{e}; reading a continuation line");
                    match source.read_line(true)? {
                        Some(line) => push_line(&mut buffer, &line),
                        None => {
                            debug!("source exhausted while incomplete");
                            return Err(e.into());
                        }
                    }
                }
            }
        }
    }

    /// Parse every unit of `source`, handing each pipeline to `dispatch`.
    ///
    /// Blank units are skipped. Stops at the first error. Returns the value
    /// of the last dispatch, or `None` when nothing was dispatched.
    pub fn run<S, F, T>(&self, source: &mut S, mut dispatch: F) -> Result<Option<T>>
    where
        S: LineSource + ?Sized,
        F: FnMut(Pipeline) -> T,
    {
        let mut last = None;
        loop {
            match self.read_pipeline(source)? {
                Step::Pipeline(pipeline) => {
                    debug!("dispatching: {pipeline}");
                    last = Some(dispatch(pipeline));
                }
                Step::Blank => {}
                Step::Exhausted => return Ok(last),
            }
        }
    }

    /// [`run`](Self::run) over an in-memory script.
    pub fn interpret<F, T>(&self, text: &str, dispatch: F) -> Result<Option<T>>
    where
        F: FnMut(Pipeline) -> T,
    {
        let mut source = BufferSource::from_text(text);
        self.run(&mut source, dispatch)
    }
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    if !line.ends_with('\n') {
        buffer.push('\n');
    }
}
