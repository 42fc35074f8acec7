use super::cursor::{Cursor, Failure, Scan};
use super::redirect::scan_redirect;
use super::types::{Command, Connector, Pipeline, Token};
use super::word::{Scanned, scan_word};
use crate::error::{Classified, SyntaxError, classify};

/// Tagged result of one parse attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// The whole text is one pipeline.
    Complete(Pipeline),
    /// Only blanks, comments and line ends: nothing to execute.
    Empty,
    /// Structurally unfinished; more input may complete it.
    Incomplete(SyntaxError),
    /// Malformed; more input cannot help.
    Fatal(SyntaxError),
}

impl ParseOutcome {
    pub fn into_pipeline(self) -> Option<Pipeline> {
        match self {
            ParseOutcome::Complete(p) => Some(p),
            _ => None,
        }
    }
}

/// The command line grammar.
///
/// Holds only its configuration, so one parser can be shared by any number
/// of callers. With redirectors disabled the grammar accepts plain command
/// lists and treats `<`, `>` and `&>` as unexpected tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parser {
    redirectors: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self { redirectors: true }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable redirector recognition.
    pub fn with_redirectors(mut self, enabled: bool) -> Self {
        self.redirectors = enabled;
        self
    }

    pub fn redirectors(&self) -> bool {
        self.redirectors
    }

    /// Parse `text` as one pipeline.
    ///
    /// The text is expected without the final line end of the last line;
    /// embedded line ends are fine inside quotes, after connectors and
    /// after an escaping backslash.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut cur = Cursor::new(text);
        let failure = match self.pipeline(&mut cur) {
            Ok(pipeline) => return ParseOutcome::Complete(pipeline),
            Err(failure) => failure,
        };
        match classify(text, failure.position, failure.expected) {
            Classified::Empty => ParseOutcome::Empty,
            Classified::Error(e) if e.is_recoverable() => {
                log::trace!("incomplete input: {e}");
                ParseOutcome::Incomplete(e)
            }
            Classified::Error(e) => {
                log::trace!("malformed input: {e}");
                ParseOutcome::Fatal(e)
            }
        }
    }

    /// `junk command (connector junk command)* [; junk] junk EOF`
    fn pipeline(&self, cur: &mut Cursor) -> Scan<Pipeline> {
        cur.skip_junk();
        let first = self.command(cur)?;
        let mut rest = Vec::new();

        loop {
            cur.skip_inline();
            let at = cur.pos();
            let Some(connector) = scan_connector(cur) else {
                break;
            };
            cur.skip_junk();
            if connector == Connector::Sequence && cur.at_end() {
                break;
            }
            let end = cur.len();
            // Nothing but junk after the connector: blame the connector.
            let command = self.command(cur).map_err(|f| {
                if f.position >= end {
                    Failure::at(at, "command")
                } else {
                    f
                }
            })?;
            rest.push((connector, command));
        }

        cur.skip_inline();
        if !cur.at_end() {
            let at = cur.pos();
            cur.skip_junk();
            if !cur.at_end() {
                return Err(Failure::at(at, "end of input"));
            }
        }
        Ok(Pipeline::new(first, rest))
    }

    /// One or more words and redirectors, freely interleaved.
    fn command(&self, cur: &mut Cursor) -> Scan<Command> {
        let mut tokens = Vec::new();
        loop {
            cur.skip_inline();
            if self.redirectors {
                if let Some(redirect) = scan_redirect(cur)? {
                    tokens.push(Token::Redirect(redirect));
                    continue;
                }
            }
            match scan_word(cur)? {
                Scanned::Word(word) => tokens.push(Token::Word(word)),
                Scanned::Continuation => continue,
                Scanned::Nothing => break,
            }
        }
        Command::new(tokens).ok_or_else(|| Failure::at(cur.pos(), "command"))
    }
}

fn scan_connector(cur: &mut Cursor) -> Option<Connector> {
    if cur.eat("&&") {
        Some(Connector::And)
    } else if cur.eat("||") {
        Some(Connector::Or)
    } else if cur.eat("|") {
        Some(Connector::Pipe)
    } else if cur.eat(";") {
        Some(Connector::Sequence)
    } else {
        None
    }
}

/// Parse `text` with the default (redirector-aware) grammar.
pub fn parse(text: &str) -> ParseOutcome {
    Parser::default().parse(text)
}
