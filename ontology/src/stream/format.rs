//! Record formats the stream reader can parse.
//!
//! Formats are a closed set. Each one reads a single record from a
//! [`LineSource`] into a caller-owned [`Term`]; the reader decides what to
//! do with retryable failures.

use std::fmt;
use std::io;

use crate::diagnostics::{Diagnostics, Location};
use crate::parse::{
    BuildMode, TermExtras, apply_term_tag, header_name, join_continuations, parse_tag_line, strip,
};
use crate::stream::source::LineSource;
use crate::types::Term;

/// A record format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One `[Term]` stanza of an OBO flat file.
    Obo,
}

/// Formats in the order the reader trials them.
pub const REGISTERED_FORMATS: &[Format] = &[Format::Obo];

/// Why a record could not be read.
#[derive(Debug)]
pub enum ReadError {
    /// No record before the end of the source.
    EndOfInput,
    /// A record was found but could not be parsed.
    Malformed(String),
    Io(io::Error),
}

impl ReadError {
    /// Whether another attempt (or another format) may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::EndOfInput | Self::Malformed(_))
    }
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfInput => write!(f, "end of input"),
            Self::Malformed(message) => write!(f, "malformed record: {message}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl Format {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Obo => "obo",
        }
    }

    /// Whether the reader may trial this format on a source of unknown format.
    #[must_use]
    pub const fn auto_try(self) -> bool {
        match self {
            Self::Obo => true,
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        REGISTERED_FORMATS
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(name))
    }

    /// Read one record into `term`, which the caller has cleared.
    pub fn try_read(
        self,
        source: &mut dyn LineSource,
        term: &mut Term,
        scratch: &mut String,
        diagnostics: &mut Diagnostics,
    ) -> Result<(), ReadError> {
        match self {
            Self::Obo => read_obo_term(source, term, scratch, diagnostics),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Skip to the next `[Term]` header and parse that stanza.
///
/// The source is left positioned at the next `[` line.
fn read_obo_term(
    source: &mut dyn LineSource,
    term: &mut Term,
    scratch: &mut String,
    diagnostics: &mut Diagnostics,
) -> Result<(), ReadError> {
    loop {
        if !source.read_line(scratch)? {
            return Err(ReadError::EndOfInput);
        }
        if header_name(strip(scratch).body) == Some("Term") {
            break;
        }
    }
    let header_line = source.line_number();
    let name = source.source_name().to_owned();
    let mut extras = TermExtras::default();

    loop {
        let before = source.checkpoint();
        if !source.read_line(scratch)? {
            break;
        }
        if scratch.trim_start().starts_with('[') {
            source.restore(before)?;
            break;
        }
        let number = source.line_number();
        let text = join_continuations(std::mem::take(scratch), || {
            let mut next = String::new();
            Ok(source.read_line(&mut next)?.then_some(next))
        })?;
        let stripped = strip(&text);
        let Some(line) = parse_tag_line(&stripped, Location::at(&name, number), diagnostics) else {
            continue;
        };
        apply_term_tag(term, &mut extras, line, BuildMode::Stream, &name, diagnostics);
    }

    if term.id.is_empty() {
        return Err(ReadError::Malformed(format!(
            "[Term] stanza at {name}:{header_line} has no id"
        )));
    }
    Ok(())
}
