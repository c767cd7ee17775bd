//! Line sanitizing: comments, trailing modifiers, escapes and continuations.
//!
//! All functions work on borrowed slices and return sub-slices or newly
//! owned strings; the input line is never modified.

use std::borrow::Cow;
use std::io;

/// The result of cutting a trailing bracketed span from a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketCut<'a> {
    /// The line does not end with the closing bracket.
    Absent,
    /// The span was found. `span` includes both brackets.
    Found { rest: &'a str, span: &'a str },
    /// The line ends with a closing bracket that has no opener.
    Unbalanced,
}

/// A line with its comment and modifier removed, escapes still encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stripped<'a> {
    pub body: &'a str,
    pub modifier: Option<&'a str>,
    pub comment: Option<&'a str>,
    /// A trailing `}` had no matching `{`.
    pub unbalanced: bool,
}

/// A fully sanitized line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
    pub text: String,
    pub modifier: Option<String>,
    pub comment: Option<String>,
    pub unbalanced: bool,
}

/// Each char with its byte index and whether an unescaped backslash precedes it.
fn escape_flags(line: &str) -> Vec<(usize, char, bool)> {
    let mut escaped = false;
    line.char_indices()
        .map(|(index, c)| {
            let flagged = (index, c, escaped);
            escaped = !escaped && c == '\\';
            flagged
        })
        .collect()
}

/// Split a line at its first unescaped `!`.
///
/// The whitespace before the `!` is trimmed from the line and the comment
/// is trimmed on both sides. A line without a comment is returned unchanged.
#[must_use]
pub fn cut_comment(line: &str) -> (&str, Option<&str>) {
    let mut escaped = false;
    for (index, c) in line.char_indices() {
        if c == '!' && !escaped {
            return (line[..index].trim_end(), Some(line[index + 1..].trim()));
        }
        escaped = !escaped && c == '\\';
    }
    (line, None)
}

/// Cut a trailing `{...}` modifier span.
#[must_use]
pub fn cut_modifier(line: &str) -> BracketCut<'_> {
    cut_trailing(line, '{', '}')
}

/// Cut a trailing `[...]` dbxref list.
#[must_use]
pub fn cut_dbxref(line: &str) -> BracketCut<'_> {
    cut_trailing(line, '[', ']')
}

fn cut_trailing(line: &str, open: char, close: char) -> BracketCut<'_> {
    let line = line.trim_end();
    let chars = escape_flags(line);
    match chars.last() {
        Some(&(_, c, false)) if c == close => {}
        _ => return BracketCut::Absent,
    }

    let mut depth = 0usize;
    for &(index, c, escaped) in chars.iter().rev() {
        if escaped {
            continue;
        }
        if c == close {
            depth += 1;
        } else if c == open {
            depth -= 1;
            if depth == 0 {
                return BracketCut::Found {
                    rest: line[..index].trim_end(),
                    span: &line[index..],
                };
            }
        }
    }
    BracketCut::Unbalanced
}

/// Decode OBO escapes: `\n`, `\t`, `\W` (space) and `\x` for any other `x`.
///
/// A trailing bare backslash is dropped.
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find('\\') else {
        return Cow::Borrowed(text);
    };

    let mut decoded = String::with_capacity(text.len());
    decoded.push_str(&text[..first]);
    let mut chars = text[first..].chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('W') => decoded.push(' '),
            Some(other) => decoded.push(other),
            None => {}
        }
    }
    Cow::Owned(decoded)
}

/// Whether a physical line continues on the next one.
///
/// True when the line ends in an odd number of backslashes.
#[must_use]
pub fn needs_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// Join continuation lines onto `line`.
///
/// While the line needs continuing, its final backslash is removed and the
/// next physical line is appended. A missing next line ends the join.
pub fn join_continuations<F>(mut line: String, mut next_line: F) -> io::Result<String>
where
    F: FnMut() -> io::Result<Option<String>>,
{
    while needs_continuation(&line) {
        line.pop();
        match next_line()? {
            Some(next) => line.push_str(&next),
            None => break,
        }
    }
    Ok(line)
}

/// Remove the comment and trailing modifier of a line.
#[must_use]
pub fn strip(line: &str) -> Stripped<'_> {
    let (body, comment) = cut_comment(line);
    let (body, modifier, unbalanced) = match cut_modifier(body) {
        BracketCut::Absent => (body, None, false),
        BracketCut::Found { rest, span } => (rest, Some(span), false),
        BracketCut::Unbalanced => (body, None, true),
    };
    Stripped {
        body: body.trim(),
        modifier,
        comment,
        unbalanced,
    }
}

/// Strip a line and decode its escapes.
#[must_use]
pub fn sanitize(line: &str) -> Sanitized {
    let stripped = strip(line);
    Sanitized {
        text: unescape(stripped.body).into_owned(),
        modifier: stripped.modifier.map(str::to_owned),
        comment: stripped.comment.map(|c| unescape(c).into_owned()),
        unbalanced: stripped.unbalanced,
    }
}

/// The name inside a `[Name]` stanza header, if the line is one.
#[must_use]
pub fn header_name(body: &str) -> Option<&str> {
    let inner = body.trim().strip_prefix('[')?.strip_suffix(']')?;
    Some(inner.trim())
}

/// A logical line: one or more physical lines joined by continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// The number of the first physical line.
    pub number: usize,
    pub text: String,
}

/// Iterator joining physical lines into logical lines.
pub struct LogicalLines<I> {
    lines: I,
    line_number: usize,
}

impl<I> LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub const fn new(lines: I) -> Self {
        Self {
            lines,
            line_number: 0,
        }
    }
}

fn trim_line_end(mut line: String) -> String {
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    line
}

impl<I> Iterator for LogicalLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = match self.lines.next()? {
            Ok(line) => trim_line_end(line),
            Err(e) => return Some(Err(e)),
        };
        self.line_number += 1;
        let number = self.line_number;

        let lines = &mut self.lines;
        let line_number = &mut self.line_number;
        let joined = join_continuations(first, || match lines.next() {
            Some(Ok(next)) => {
                *line_number += 1;
                Ok(Some(trim_line_end(next)))
            }
            Some(Err(e)) => Err(e),
            None => Ok(None),
        });
        Some(joined.map(|text| LogicalLine { number, text }))
    }
}
