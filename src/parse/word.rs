//! Word scanner: one shell argument built from unquoted, quoted and escaped fragments.

use super::cursor::{Cursor, Failure, Scan};
use super::types::is_metachar;
use crate::error::{Classified, SyntaxError, classify};

/// What the word scanner found at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scanned {
    /// A complete word, quotes and escapes removed.
    Word(String),
    /// Only a line continuation (`\` + line end) was consumed.
    Continuation,
    /// Nothing word-shaped starts here.
    Nothing,
}

/// Scan one word at the cursor.
///
/// A word that starts with a line continuation yields [`Scanned::Continuation`].
pub(crate) fn scan_word(cur: &mut Cursor) -> Scan<Scanned> {
    if skip_continuation(cur) {
        return Ok(Scanned::Continuation);
    }

    let mut text = String::new();
    let mut consumed = false;
    loop {
        match cur.peek() {
            Some('\\') => {
                if skip_continuation(cur) {
                    continue;
                }
                let at = cur.pos();
                cur.bump();
                match cur.bump() {
                    Some(c) => text.push(c),
                    None => return Err(Failure::at(at, "escaped character")),
                }
            }
            Some(quote @ ('\'' | '"')) => scan_quoted(cur, quote, &mut text)?,
            Some(c) if !is_metachar(c) => {
                cur.bump();
                text.push(c);
            }
            _ => break,
        }
        consumed = true;
    }

    if consumed {
        Ok(Scanned::Word(text))
    } else {
        Ok(Scanned::Nothing)
    }
}

/// Consume a line continuation at the cursor.
///
/// If the continued line holds only a comment, that whole line is skipped as well.
fn skip_continuation(cur: &mut Cursor) -> bool {
    let n = cur.continuation_len();
    if n == 0 {
        return false;
    }
    cur.reset(cur.pos() + n);
    let line_start = cur.pos();
    cur.skip_blanks();
    if cur.skip_comment() {
        let end = cur.line_end_len();
        cur.reset(cur.pos() + end);
    } else {
        cur.reset(line_start);
    }
    true
}

/// Scan a quoted span, which may cross line ends. Fails at the opening quote.
fn scan_quoted(cur: &mut Cursor, quote: char, out: &mut String) -> Scan<()> {
    let open = cur.pos();
    cur.bump();
    loop {
        match cur.bump() {
            None => return Err(Failure::at(open, "closing quote")),
            Some(c) if c == quote => return Ok(()),
            Some('\\') => match cur.bump() {
                None => return Err(Failure::at(open, "closing quote")),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('r') => out.push('\r'),
                Some('f') => out.push('\x0c'),
                Some(c) => out.push(c),
            },
            Some(c) => out.push(c),
        }
    }
}

/// Parse `text` as exactly one word.
///
/// Returns `Ok(None)` when the text holds no word at all (empty, or only
/// line continuations).
pub fn parse_word(text: &str) -> Result<Option<String>, SyntaxError> {
    let mut cur = Cursor::new(text);
    let scanned = loop {
        match scan_word(&mut cur) {
            Ok(Scanned::Continuation) => continue,
            other => break other,
        }
    };
    let scanned = scanned.and_then(|s| {
        if cur.at_end() {
            Ok(s)
        } else {
            Err(Failure::at(cur.pos(), "end of word"))
        }
    });
    match scanned {
        Ok(Scanned::Word(word)) => Ok(Some(word)),
        Ok(_) => Ok(None),
        Err(f) => match classify(text, f.position, f.expected) {
            Classified::Empty => Ok(None),
            Classified::Error(e) => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Reason};

    fn word(text: &str) -> String {
        parse_word(text).unwrap().unwrap()
    }

    #[test]
    fn plain_and_quoted_forms() {
        assert_eq!(word("foo"), "foo");
        assert_eq!(word("'foo'"), "foo");
        assert_eq!(word("\"foo\""), "foo");
        assert_eq!(word("foo\\ bar"), "foo bar");
    }

    #[test]
    fn fragments_concatenate() {
        assert_eq!(word("foo'bar'\"baz\"qux"), "foobarbazqux");
    }

    #[test]
    fn empty_quotes_are_a_word() {
        assert_eq!(word("''"), "");
        assert_eq!(word("\"\""), "");
    }

    #[test]
    fn escapes_inside_quotes() {
        assert_eq!(word("'it\\'s'"), "it's");
        assert_eq!(word("\"a\\\"b\""), "a\"b");
        assert_eq!(word("\"a\\tb\""), "a\tb");
        assert_eq!(word("'a\\\\b'"), "a\\b");
    }

    #[test]
    fn metachars_lose_meaning_when_quoted_or_escaped() {
        assert_eq!(word("'a && b'"), "a && b");
        assert_eq!(word("\\$HOME"), "$HOME");
        assert_eq!(word("a\\|b"), "a|b");
    }

    #[test]
    fn quotes_span_lines() {
        assert_eq!(word("\"foo\nbar\""), "foo\nbar");
    }

    #[test]
    fn continuation_inside_word_is_dropped() {
        assert_eq!(word("foo\\\nbar"), "foobar");
        assert_eq!(word("foo\\\r\nbar"), "foobar");
    }

    #[test]
    fn continued_comment_line_inside_word_is_skipped() {
        assert_eq!(word("--a\\\n# note\n--c"), "--a--c");
        assert_eq!(word("--a\\\n  # note\r\n--c"), "--a--c");
    }

    #[test]
    fn hash_inside_word_is_literal() {
        assert_eq!(word("a#b"), "a#b");
    }

    #[test]
    fn leading_continuation_yields_no_word() {
        let mut cur = Cursor::new("\\\nfoo");
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Continuation));
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Word("foo".into())));
    }

    #[test]
    fn continued_comment_line_is_skipped() {
        let mut cur = Cursor::new("\\\n  # note\nfoo");
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Continuation));
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Word("foo".into())));
    }

    #[test]
    fn word_stops_at_metachar() {
        let mut cur = Cursor::new("foo>bar");
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Word("foo".into())));
        assert_eq!(cur.peek(), Some('>'));
        assert_eq!(scan_word(&mut cur), Ok(Scanned::Nothing));
    }

    #[test]
    fn unterminated_quote_fails_at_opening_quote() {
        let err = parse_word("ab\"cd").unwrap_err();
        assert_eq!(err.position, 2);
        assert_eq!(err.reason, Reason::UnterminatedQuote('"'));
        assert_eq!(err.kind, ErrorKind::Incomplete);
    }

    #[test]
    fn trailing_backslash_fails_at_backslash() {
        let err = parse_word("foo\\").unwrap_err();
        assert_eq!(err.position, 3);
        assert_eq!(err.reason, Reason::TrailingEscape);
    }

    #[test]
    fn two_words_is_malformed() {
        let err = parse_word("foo bar").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Malformed);
        assert_eq!(err.position, 3);
    }

    #[test]
    fn nothing_to_scan() {
        assert_eq!(parse_word(""), Ok(None));
        assert_eq!(parse_word("\\\n"), Ok(None));
    }
}
