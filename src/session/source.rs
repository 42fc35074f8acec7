//! Line sources feeding the continuation loop.

use std::io::{self, BufRead, Write};

/// Something that yields input one line at a time.
///
/// Lines are returned with a trailing `\n`; `Ok(None)` means the source is
/// exhausted. `continuation` is true when the line is requested to finish
/// a unit that did not parse yet (the secondary prompt, in shell terms).
pub trait LineSource {
    fn read_line(&mut self, continuation: bool) -> io::Result<Option<String>>;
}

impl<F> LineSource for F
where
    F: FnMut(bool) -> io::Result<Option<String>>,
{
    fn read_line(&mut self, continuation: bool) -> io::Result<Option<String>> {
        self(continuation)
    }
}

/// Read one line from `reader`, normalising the line end to `\n`.
fn next_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.strip_suffix('\n').unwrap_or(&line);
    let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
    Ok(Some(format!("{trimmed}\n")))
}

/// Non-interactive source over a file, stdin or an in-memory string.
pub struct BufferSource<R> {
    reader: R,
}

impl<R: BufRead> BufferSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl BufferSource<io::Cursor<String>> {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(io::Cursor::new(text.into()))
    }
}

impl<R: BufRead> LineSource for BufferSource<R> {
    fn read_line(&mut self, _continuation: bool) -> io::Result<Option<String>> {
        next_line(&mut self.reader)
    }
}

/// Interactive source: writes a prompt, then reads the answer.
///
/// The primary prompt starts each new unit of input, the secondary prompt
/// asks for continuation lines.
pub struct PromptSource<R, W> {
    reader: R,
    writer: W,
    primary: String,
    secondary: String,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
            primary: "$ ".into(),
            secondary: "> ".into(),
        }
    }

    pub fn with_prompts(mut self, primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        self.primary = primary.into();
        self.secondary = secondary.into();
        self
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> LineSource for PromptSource<R, W> {
    fn read_line(&mut self, continuation: bool) -> io::Result<Option<String>> {
        let prompt = if continuation {
            &self.secondary
        } else {
            &self.primary
        };
        self.writer.write_all(prompt.as_bytes())?;
        self.writer.flush()?;
        let line = next_line(&mut self.reader)?;
        if line.is_none() {
            // leave the terminal on a fresh line after ^D
            self.writer.write_all(b"\n")?;
        }
        Ok(line)
    }
}
