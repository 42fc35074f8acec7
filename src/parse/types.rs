//! Types produced by the shell parser and consumed by the dispatch layer.

use std::fmt;

use serde::ser::{SerializeSeq, Serializer};
use serde::Serialize;

/// Connector joining two consecutive commands of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    /// `&&`: run next only if previous succeeded
    And,
    /// `||`: run next only if previous failed
    Or,
    /// `|`: pipe stdout
    Pipe,
    /// `;`: run next unconditionally
    Sequence,
}

impl Connector {
    /// The connector's shell syntax.
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "&&",
            Connector::Or => "||",
            Connector::Pipe => "|",
            Connector::Sequence => ";",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Connector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Descriptor a redirection applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Descriptor {
    /// A numbered descriptor (0, 1 or 2).
    Fd(u8),
    /// Both stdout and stderr (`&>word`, `>&word`, `&>>word`).
    Both,
}

impl Serialize for Descriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Descriptor::Fd(fd) => serializer.serialize_u8(*fd),
            Descriptor::Both => serializer.serialize_str("&"),
        }
    }
}

/// Redirection operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectOp {
    /// `[n]<word`
    Read,
    /// `[n]>word`, `&>word`
    Write,
    /// `[n]>>word`, `&>>word`
    Append,
    /// `[n]<>word`
    ReadWrite,
    /// `[n]<&m`
    DupRead,
    /// `[n]>&m`
    DupWrite,
    /// `<<word`, or `<<-word` when `strip_tabs` is set.
    ///
    /// Tabs are not stripped here; the flag is kept for the consumer.
    HereDoc { strip_tabs: bool },
    /// `<<<word`
    HereString,
}

impl RedirectOp {
    /// Descriptor used when the source text names none.
    pub fn default_fd(&self) -> u8 {
        match self {
            RedirectOp::Write | RedirectOp::Append | RedirectOp::DupWrite => 1,
            _ => 0,
        }
    }

    /// The operator's shell syntax (without any `&` target marker).
    pub fn symbol(&self) -> &'static str {
        match self {
            RedirectOp::Read | RedirectOp::DupRead => "<",
            RedirectOp::Write | RedirectOp::DupWrite => ">",
            RedirectOp::Append => ">>",
            RedirectOp::ReadWrite => "<>",
            RedirectOp::HereDoc { strip_tabs: false } => "<<",
            RedirectOp::HereDoc { strip_tabs: true } => "<<-",
            RedirectOp::HereString => "<<<",
        }
    }
}

/// What a redirection points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RedirectTarget {
    /// A file path, here-doc delimiter or here-string body.
    Word(String),
    /// A duplicated descriptor (`2>&1`); `moved` records the `-` suffix of `2>&1-`.
    Fd { fd: u8, moved: bool },
}

/// A file-descriptor redirection directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub source: Descriptor,
    pub op: RedirectOp,
    pub target: RedirectTarget,
}

impl Redirect {
    /// The matched sub-parts in source order, uninterpreted.
    ///
    /// `2>&1` gives `["2", ">", "1"]`, `&>out` gives `["&", ">", "out"]`,
    /// `<<-EOF` gives `["<<-", "EOF"]`.
    pub fn parts(&self) -> Vec<String> {
        let mut parts = Vec::with_capacity(4);
        match self.op {
            RedirectOp::HereDoc { .. } | RedirectOp::HereString => {
                parts.push(self.op.symbol().to_string());
            }
            _ => {
                parts.push(match self.source {
                    Descriptor::Fd(fd) => fd.to_string(),
                    Descriptor::Both => "&".to_string(),
                });
                parts.push(self.op.symbol().to_string());
            }
        }
        match &self.target {
            RedirectTarget::Word(word) => parts.push(word.clone()),
            RedirectTarget::Fd { fd, moved } => {
                parts.push(fd.to_string());
                if *moved {
                    parts.push("-".to_string());
                }
            }
        }
        parts
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Descriptor::Both => f.write_str("&")?,
            Descriptor::Fd(fd) if fd != self.op.default_fd() => write!(f, "{fd}")?,
            Descriptor::Fd(_) => {}
        }
        f.write_str(self.op.symbol())?;
        match &self.target {
            // `<<` + `-EOF` would read back as `<<-` + `EOF`.
            RedirectTarget::Word(word)
                if self.op == (RedirectOp::HereDoc { strip_tabs: false })
                    && word.starts_with('-') =>
            {
                write_quoted(f, word)
            }
            RedirectTarget::Word(word) => write_word(f, word),
            RedirectTarget::Fd { fd, moved } => {
                write!(f, "&{fd}")?;
                if *moved {
                    f.write_str("-")?;
                }
                Ok(())
            }
        }
    }
}

/// One element of a command: an argument or a redirection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Token {
    /// Fully resolved argument, quotes and escapes removed.
    Word(String),
    Redirect(Redirect),
}

impl Token {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            Token::Redirect(_) => None,
        }
    }
}

impl From<&str> for Token {
    fn from(word: &str) -> Self {
        Token::Word(word.to_string())
    }
}

impl From<Redirect> for Token {
    fn from(redirect: Redirect) -> Self {
        Token::Redirect(redirect)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write_word(f, word),
            Token::Redirect(redirect) => redirect.fmt(f),
        }
    }
}

/// Characters that end an unquoted run.
pub(crate) fn is_metachar(c: char) -> bool {
    matches!(
        c,
        ' ' | '\t'
            | '\r'
            | '\n'
            | '\x0c'
            | '\x0b'
            | '\\'
            | '$'
            | '&'
            | '<'
            | '>'
            | '('
            | ')'
            | ';'
            | '|'
            | '\''
            | '"'
            | '`'
    )
}

/// Write a word so that it scans back to the same text.
fn write_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    let bare = !word.is_empty() && !word.starts_with('#') && !word.chars().any(is_metachar);
    if bare {
        return f.write_str(word);
    }
    write_quoted(f, word)
}

fn write_quoted(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in word.chars() {
        if c == '\'' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("'")
}

/// An ordered, non-empty run of words and redirections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(Vec<Token>);

impl Command {
    /// Build a command; `None` when `tokens` is empty.
    pub fn new(tokens: Vec<Token>) -> Option<Self> {
        if tokens.is_empty() {
            None
        } else {
            Some(Command(tokens))
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    /// Plain arguments in order, redirections skipped.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.0.iter().filter_map(Token::as_word)
    }

    /// Redirections in order.
    pub fn redirects(&self) -> impl Iterator<Item = &Redirect> {
        self.0.iter().filter_map(|t| match t {
            Token::Redirect(r) => Some(r),
            Token::Word(_) => None,
        })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            token.fmt(f)?;
        }
        Ok(())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.0)
    }
}

/// A fully parsed input unit: commands joined by connectors.
///
/// For a simple command like `ls -la`, there is one command and no connectors.
/// For `a && b | c`, there are three commands and two connectors (`&&`, `|`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    first: Command,
    rest: Vec<(Connector, Command)>,
}

impl Pipeline {
    pub fn new(first: Command, rest: Vec<(Connector, Command)>) -> Self {
        Self { first, rest }
    }

    pub fn first(&self) -> &Command {
        &self.first
    }

    /// The `(connector, command)` pairs following the first command.
    pub fn rest(&self) -> &[(Connector, Command)] {
        &self.rest
    }

    /// Commands in order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        std::iter::once(&self.first).chain(self.rest.iter().map(|(_, c)| c))
    }

    /// Connectors in order; always one fewer than the commands.
    pub fn connectors(&self) -> impl Iterator<Item = Connector> + '_ {
        self.rest.iter().map(|(op, _)| *op)
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false: a pipeline holds at least one command.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.first.fmt(f)?;
        for (op, command) in &self.rest {
            write!(f, " {op} {command}")?;
        }
        Ok(())
    }
}

/// Serialized as the alternating list `[command, connector, command, ...]`.
impl Serialize for Pipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rest.len() * 2 + 1))?;
        seq.serialize_element(&self.first)?;
        for (op, command) in &self.rest {
            seq.serialize_element(op)?;
            seq.serialize_element(command)?;
        }
        seq.end()
    }
}
