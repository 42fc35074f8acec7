//! Syntax error taxonomy and the failure classifier used by the continuation loop.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using the crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Whether more input could still turn a failed parse into a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Structurally unfinished input (open quote, dangling escape or operator).
    Incomplete,
    /// A character the grammar has no alternative for.
    Malformed,
}

/// Human-readable cause of a syntax error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The whole input is a lone `\` followed by a line end.
    #[error("unexpected EOF after escaped newline")]
    LoneContinuation,

    #[error("unexpected EOF while looking for matching `{0}`")]
    UnterminatedQuote(char),

    /// The input ends with a backslash.
    #[error("unexpected EOF after escaped newline")]
    TrailingEscape,

    /// `&&` or `||` with no command after it.
    #[error("unexpected end of file after `{0}`")]
    DanglingOperator(String),

    #[error("unexpected token `{}` (expected {expected})", .found.escape_default())]
    UnexpectedToken { found: char, expected: String },
}

impl Reason {
    /// Recoverable reasons are retried with one more line of input.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Reason::UnexpectedToken { .. })
    }
}

/// A classified parse failure.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("syntax error at position {position}: {reason}")]
pub struct SyntaxError {
    pub kind: ErrorKind,
    /// Character offset of the failure within the parsed text.
    pub position: usize,
    pub reason: Reason,
}

impl SyntaxError {
    /// A syntax error whose kind follows from its reason.
    pub fn new(position: usize, reason: Reason) -> Self {
        let kind = if reason.is_recoverable() {
            ErrorKind::Incomplete
        } else {
            ErrorKind::Malformed
        };
        Self {
            kind,
            position,
            reason,
        }
    }

    /// Whether the continuation loop may retry with more input.
    pub fn is_recoverable(&self) -> bool {
        self.kind == ErrorKind::Incomplete
    }
}

/// Errors surfaced by the continuation loop.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The line source failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            Error::Syntax(e) => Some(e),
            Error::Io(_) => None,
        }
    }
}

/// Result of classifying a failure position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classified {
    /// Ran out of input before any command: nothing to execute.
    Empty,
    Error(SyntaxError),
}

/// Classify a grammar failure at char offset `position` of `text`.
///
/// `expected` describes what the grammar wanted at that point and only
/// appears in malformed-input messages.
pub(crate) fn classify(text: &str, position: usize, expected: &str) -> Classified {
    let chars: Vec<char> = text.chars().collect();
    let error = |reason| Classified::Error(SyntaxError::new(position, reason));

    let Some(&c) = chars.get(position) else {
        if text.trim() == "\\" {
            return error(Reason::LoneContinuation);
        }
        return Classified::Empty;
    };

    let reason = match (c, chars.get(position + 1).copied()) {
        ('\'' | '"', _) => Reason::UnterminatedQuote(c),
        ('\\', None) => Reason::TrailingEscape,
        ('&', Some('&')) | ('|', Some('|')) => Reason::DanglingOperator(format!("{c}{c}")),
        _ => Reason::UnexpectedToken {
            found: c,
            expected: expected.to_string(),
        },
    };
    error(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(text: &str, position: usize) -> Reason {
        match classify(text, position, "command") {
            Classified::Error(e) => e.reason,
            Classified::Empty => panic!("expected an error for {text:?}"),
        }
    }

    #[test]
    fn past_end_is_empty() {
        assert_eq!(classify("   ", 3, "command"), Classified::Empty);
        assert_eq!(classify("", 0, "command"), Classified::Empty);
    }

    #[test]
    fn lone_backslash_past_end() {
        assert_eq!(reason("\\\n", 2), Reason::LoneContinuation);
    }

    #[test]
    fn quote_is_unterminated() {
        assert_eq!(reason("echo \"foo", 5), Reason::UnterminatedQuote('"'));
        assert_eq!(reason("echo 'foo", 5), Reason::UnterminatedQuote('\''));
    }

    #[test]
    fn backslash_at_last_index() {
        assert_eq!(reason("echo foo\\", 8), Reason::TrailingEscape);
    }

    #[test]
    fn backslash_not_last_is_malformed() {
        let r = reason("a\\b", 1);
        assert!(!r.is_recoverable());
    }

    #[test]
    fn dangling_logical_operators() {
        assert_eq!(reason("true &&", 5), Reason::DanglingOperator("&&".into()));
        assert_eq!(reason("true ||", 5), Reason::DanglingOperator("||".into()));
        assert_eq!(
            reason("true || # later\n\\\n", 5),
            Reason::DanglingOperator("||".into())
        );
    }

    #[test]
    fn operator_at_failure_position_is_dangling() {
        match classify("&& ls", 0, "command") {
            Classified::Error(e) => {
                assert_eq!(e.kind, ErrorKind::Incomplete);
                assert_eq!(e.reason, Reason::DanglingOperator("&&".into()));
            }
            Classified::Empty => panic!("expected an error"),
        }
    }

    #[test]
    fn kind_follows_reason() {
        assert_eq!(SyntaxError::new(0, Reason::TrailingEscape).kind, ErrorKind::Incomplete);
        let e = SyntaxError::new(
            4,
            Reason::UnexpectedToken {
                found: ')',
                expected: "command".into(),
            },
        );
        assert_eq!(e.kind, ErrorKind::Malformed);
        assert!(!e.is_recoverable());
    }

    #[test]
    fn anything_else_is_malformed() {
        match classify("ls )", 3, "end of input") {
            Classified::Error(e) => {
                assert_eq!(e.kind, ErrorKind::Malformed);
                assert_eq!(e.position, 3);
                assert_eq!(
                    e.to_string(),
                    "syntax error at position 3: unexpected token `)` (expected end of input)"
                );
            }
            Classified::Empty => panic!("expected malformed"),
        }
    }

    #[test]
    fn messages() {
        assert_eq!(
            Reason::UnterminatedQuote('\'').to_string(),
            "unexpected EOF while looking for matching `'`"
        );
        assert_eq!(
            Reason::DanglingOperator("&&".into()).to_string(),
            "unexpected end of file after `&&`"
        );
    }
}
