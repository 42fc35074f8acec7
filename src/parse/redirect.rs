//! Redirector scanner: `<`, `>`, `>>`, `<>`, `&>`, `>&`, here-docs and `N>&M` forms.

use super::cursor::{Cursor, Failure, Scan};
use super::types::{Descriptor, Redirect, RedirectOp, RedirectTarget};
use super::word::{Scanned, scan_word};

/// Whether the cursor sits on something that can only be a redirector.
///
/// A 0-2 digit counts only when the operator follows it directly; `&`
/// only as `&>` (a lone `&` or `&&` is left to the pipeline grammar).
pub(crate) fn starts_redirect(cur: &Cursor) -> bool {
    match cur.peek() {
        Some('<' | '>') => true,
        Some('&') => cur.peek_at(1) == Some('>'),
        Some('0'..='2') => matches!(cur.peek_at(1), Some('<' | '>')),
        _ => false,
    }
}

/// Scan a redirector, trying each form in priority order.
///
/// Returns `Ok(None)` when no redirector starts here. Once one does, failing
/// every form is an error at the redirector's first character.
pub(crate) fn scan_redirect(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    if !starts_redirect(cur) {
        return Ok(None);
    }
    let start = cur.pos();
    let forms: [fn(&mut Cursor) -> Scan<Option<Redirect>>; 5] =
        [fd_redir, full_redir, here_doc, add_to_file, fd_bind];
    for form in forms {
        cur.reset(start);
        if let Some(redirect) = form(cur)? {
            return Ok(Some(redirect));
        }
    }
    cur.reset(start);
    Err(Failure::at(start, "redirection target"))
}

fn fd_digit(cur: &mut Cursor) -> Option<u8> {
    let fd = cur.peek().filter(|c| ('0'..='2').contains(c))?.to_digit(10)?;
    cur.bump();
    Some(fd as u8)
}

/// The word a redirector points at, blanks allowed before it.
fn word_target(cur: &mut Cursor) -> Scan<Option<String>> {
    loop {
        let before = cur.pos();
        cur.skip_blanks();
        if cur.pos() > before && cur.peek() == Some('#') {
            return Ok(None);
        }
        match scan_word(cur)? {
            Scanned::Word(word) => return Ok(Some(word)),
            Scanned::Continuation => continue,
            Scanned::Nothing => return Ok(None),
        }
    }
}

fn to_word(source: Descriptor, op: RedirectOp, word: Option<String>) -> Option<Redirect> {
    word.map(|w| Redirect {
        source,
        op,
        target: RedirectTarget::Word(w),
    })
}

/// `[n]<word`, `[n]>word`, `[n]<&m[-]`, `[n]>&m[-]`
fn fd_redir(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    let digit = fd_digit(cur);
    let (op, dup) = if cur.eat("<") {
        (RedirectOp::Read, RedirectOp::DupRead)
    } else if cur.eat(">") {
        (RedirectOp::Write, RedirectOp::DupWrite)
    } else {
        return Ok(None);
    };
    let source = Descriptor::Fd(digit.unwrap_or(op.default_fd()));

    let after_op = cur.pos();
    if let Some(redirect) = to_word(source, op, word_target(cur)?) {
        return Ok(Some(redirect));
    }
    cur.reset(after_op);
    if !cur.eat("&") {
        return Ok(None);
    }
    let Some(fd) = fd_digit(cur) else {
        return Ok(None);
    };
    let moved = cur.eat("-");
    Ok(Some(Redirect {
        source,
        op: dup,
        target: RedirectTarget::Fd { fd, moved },
    }))
}

/// `&>word`, `>&word`
fn full_redir(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    if !(cur.eat("&>") || cur.eat(">&")) {
        return Ok(None);
    }
    Ok(to_word(Descriptor::Both, RedirectOp::Write, word_target(cur)?))
}

/// `<<<word`, `<<-word`, `<<word`
fn here_doc(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    let op = if cur.eat("<<<") {
        RedirectOp::HereString
    } else if cur.eat("<<-") {
        RedirectOp::HereDoc { strip_tabs: true }
    } else if cur.eat("<<") {
        RedirectOp::HereDoc { strip_tabs: false }
    } else {
        return Ok(None);
    };
    Ok(to_word(Descriptor::Fd(0), op, word_target(cur)?))
}

/// `[n]>>word`, `&>>word`
fn add_to_file(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    let source = if cur.eat("&") {
        Descriptor::Both
    } else {
        Descriptor::Fd(fd_digit(cur).unwrap_or(1))
    };
    if !cur.eat(">>") {
        return Ok(None);
    }
    Ok(to_word(source, RedirectOp::Append, word_target(cur)?))
}

/// `[n]<>word`
fn fd_bind(cur: &mut Cursor) -> Scan<Option<Redirect>> {
    let source = Descriptor::Fd(fd_digit(cur).unwrap_or(0));
    if !cur.eat("<>") {
        return Ok(None);
    }
    Ok(to_word(source, RedirectOp::ReadWrite, word_target(cur)?))
}
