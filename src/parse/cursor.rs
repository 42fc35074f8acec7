//! Character cursor shared by the word, redirector and pipeline scanners.

/// Where and why a scanner gave up.
///
/// Positions are char offsets. The failure is classified later by
/// [`crate::error::classify`]; scanners only report the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub position: usize,
    pub expected: &'static str,
}

impl Failure {
    pub fn at(position: usize, expected: &'static str) -> Self {
        Self { position, expected }
    }
}

pub(crate) type Scan<T> = Result<T, Failure>;

pub(crate) struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume `lit` if the input continues with it.
    pub fn eat(&mut self, lit: &str) -> bool {
        let n = lit.chars().count();
        let matches = lit
            .chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c));
        if matches {
            self.pos += n;
        }
        matches
    }

    /// Length of the line end at the cursor (`\n` or `\r\n`), 0 if none.
    pub fn line_end_len(&self) -> usize {
        self.line_end_len_at(0)
    }

    pub fn line_end_len_at(&self, offset: usize) -> usize {
        match (self.peek_at(offset), self.peek_at(offset + 1)) {
            (Some('\n'), _) => 1,
            (Some('\r'), Some('\n')) => 2,
            _ => 0,
        }
    }

    /// Length of a `\` + line end sequence at the cursor, 0 if none.
    pub fn continuation_len(&self) -> usize {
        if self.peek() != Some('\\') {
            return 0;
        }
        match self.line_end_len_at(1) {
            0 => 0,
            n => n + 1,
        }
    }

    pub fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.pos += 1;
        }
    }

    /// Skip a `#` comment up to, not including, the line end.
    pub fn skip_comment(&mut self) -> bool {
        if self.peek() != Some('#') {
            return false;
        }
        while !self.at_end() && self.line_end_len() == 0 {
            self.pos += 1;
        }
        true
    }

    /// Skip blanks and a trailing comment on the current line.
    pub fn skip_inline(&mut self) {
        self.skip_blanks();
        self.skip_comment();
    }

    /// Skip blanks, comments, line ends and escaped line ends.
    pub fn skip_junk(&mut self) {
        loop {
            self.skip_inline();
            let n = self.line_end_len().max(self.continuation_len());
            if n == 0 {
                break;
            }
            self.pos += n;
        }
    }
}
