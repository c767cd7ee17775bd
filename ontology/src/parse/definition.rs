//! Definition sub-parser.
//!
//! Parses `"escaped text" [dbxref, dbxref "desc"] {modifier}` values. The
//! quoted text is decoded; the dbxref list is scanned only far enough to skip
//! it. Every step is a small state machine over `&str` returning how many
//! bytes it consumed.

use std::fmt;

/// A decoded quoted string and the number of input bytes it used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quoted {
    pub text: String,
    /// Bytes consumed, up to and including the closing quote.
    pub consumed: usize,
}

/// A parsed definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub text: String,
    /// Bytes consumed, including any dbxref list.
    pub consumed: usize,
}

/// Why a definition could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionError {
    /// No opening `"` in the value.
    MissingOpenQuote,
    /// No closing `"` after the opening one.
    MissingCloseQuote,
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingOpenQuote => write!(f, "definition is not a quoted string"),
            Self::MissingCloseQuote => write!(f, "definition has no closing quote"),
        }
    }
}

impl std::error::Error for DefinitionError {}

/// Decode the first quoted string in `input`.
///
/// Escapes are decoded as in [`crate::parse::sanitize::unescape`].
pub fn parse_quoted(input: &str) -> Result<Quoted, DefinitionError> {
    let start = input.find('"').ok_or(DefinitionError::MissingOpenQuote)?;

    let mut text = String::new();
    let mut escaped = false;
    for (offset, c) in input[start + 1..].char_indices() {
        if escaped {
            match c {
                'n' => text.push('\n'),
                't' => text.push('\t'),
                'W' => text.push(' '),
                other => text.push(other),
            }
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok(Quoted {
                text,
                consumed: start + 1 + offset + 1,
            });
        } else {
            text.push(c);
        }
    }
    Err(DefinitionError::MissingCloseQuote)
}

/// Skip a dbxref list at the start of `input`.
///
/// Leading spaces and an optional `[` are skipped. Scanning stops after the
/// closing `]`, at the first `name=value` modifier token, or at the end of
/// the input. Returns the number of bytes skipped.
#[must_use]
pub fn skip_dbxrefs(input: &str) -> usize {
    let trimmed = input.trim_start();
    let mut consumed = input.len() - trimmed.len();
    let Some(list) = trimmed.strip_prefix('[') else {
        return consumed;
    };
    consumed += 1;

    let mut token_start = consumed;
    let mut in_quote = false;
    let mut escaped = false;
    for (offset, c) in list.char_indices() {
        let position = consumed + offset;
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quote = !in_quote,
            _ if in_quote => {}
            ']' => return position + 1,
            ',' => token_start = position + 1,
            '=' => return token_start,
            _ => {}
        }
    }
    input.len()
}

/// Parse a `def` value.
pub fn parse_definition(input: &str) -> Result<Definition, DefinitionError> {
    let quoted = parse_quoted(input)?;
    let skipped = skip_dbxrefs(&input[quoted.consumed..]);
    Ok(Definition {
        text: quoted.text,
        consumed: quoted.consumed + skipped,
    })
}
