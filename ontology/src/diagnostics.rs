//! Advisory diagnostics.
//!
//! Almost every problem found in an ontology file is advisory: it is logged
//! through `tracing`, recorded here with its location, and processing
//! continues with whatever partial result the parser could salvage.
//!
//! # Invariants
//!
//! - Diagnostics are kept in the order they were raised.
//! - Recording a diagnostic never fails and never aborts the caller.

use std::fmt;

use serde::Serialize;

/// The category of an advisory problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A tag token did not end in `:`.
    BadTagName,
    /// A tag had no value.
    MissingValue,
    /// A tag value could not be interpreted.
    BadValue,
    /// A trailing `}` or `]` had no matching opener.
    UnbalancedBracket,
    /// A `[Type]` header named an unrecognised stanza type.
    UnknownStanzaType,
    /// Stanza types appeared out of canonical order.
    StanzaOrder,
    /// A single-valued tag appeared more than once in a stanza.
    RepeatedTag,
    /// A boolean tag was neither `true` nor `false`.
    BadBoolean,
    /// A `def` value was not a quoted string.
    BadDefinition,
    /// A stanza had no `id` tag.
    MissingId,
    /// An id was already present in its table.
    DuplicateId,
    /// An `alt_id` was already present in the term table.
    DuplicateAltId,
    /// A name or synonym key was already present in the name table.
    DuplicateName,
    /// An id sorted before the id of the previous stanza.
    IdOrder,
    /// An id repeated the id of the previous stanza.
    DuplicatePreviousId,
    /// A header-block tag was not in the header vocabulary.
    UnknownHeaderTag,
    /// A stanza tag was not in the stanza schema.
    UnknownTag,
    /// A stanza tag appeared out of schema order.
    TagOrder,
    /// A stanza tag was used with an obsolete name.
    ObsoleteTag,
    /// A stanza tag occurred too many or too few times.
    Cardinality,
    /// A referenced id could not be resolved.
    UnknownId,
    /// A reference comment did not match the referenced term's name.
    NameMismatch,
    /// A relationship used an undeclared relationship type.
    UnknownRelationship,
    /// An alt-id chain did not resolve to a term.
    AltIdCycle,
    /// A validation toggle was not recognised.
    UnknownToggle,
    /// A stanza could not be read in the active format.
    MalformedRecord,
    /// A query list entry could not be opened or read and was passed over.
    SkippedEntry,
}

impl DiagnosticKind {
    /// Short stable name, used as the structured `kind` log field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadTagName => "bad_tag_name",
            Self::MissingValue => "missing_value",
            Self::BadValue => "bad_value",
            Self::UnbalancedBracket => "unbalanced_bracket",
            Self::UnknownStanzaType => "unknown_stanza_type",
            Self::StanzaOrder => "stanza_order",
            Self::RepeatedTag => "repeated_tag",
            Self::BadBoolean => "bad_boolean",
            Self::BadDefinition => "bad_definition",
            Self::MissingId => "missing_id",
            Self::DuplicateId => "duplicate_id",
            Self::DuplicateAltId => "duplicate_alt_id",
            Self::DuplicateName => "duplicate_name",
            Self::IdOrder => "id_order",
            Self::DuplicatePreviousId => "duplicate_previous_id",
            Self::UnknownHeaderTag => "unknown_header_tag",
            Self::UnknownTag => "unknown_tag",
            Self::TagOrder => "tag_order",
            Self::ObsoleteTag => "obsolete_tag",
            Self::Cardinality => "cardinality",
            Self::UnknownId => "unknown_id",
            Self::NameMismatch => "name_mismatch",
            Self::UnknownRelationship => "unknown_relationship",
            Self::AltIdCycle => "alt_id_cycle",
            Self::UnknownToggle => "unknown_toggle",
            Self::MalformedRecord => "malformed_record",
            Self::SkippedEntry => "skipped_entry",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a diagnostic was raised.
#[derive(Debug, Clone, Copy)]
pub struct Location<'a> {
    /// The file or stream name.
    pub source: &'a str,
    /// The 1-based line number, 0 when not tied to a line.
    pub line: usize,
    /// The id of the stanza being processed, if known.
    pub term_id: Option<&'a str>,
}

impl<'a> Location<'a> {
    /// A location at a line of a source, outside any stanza.
    #[must_use]
    pub const fn at(source: &'a str, line: usize) -> Self {
        Self {
            source,
            line,
            term_id: None,
        }
    }

    /// The same location attributed to a stanza id.
    #[must_use]
    pub const fn with_term(self, term_id: Option<&'a str>) -> Self {
        Self {
            source: self.source,
            line: self.line,
            term_id,
        }
    }
}

/// A recorded advisory problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub source: String,
    pub line: usize,
    pub term_id: Option<String>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: ", self.source, self.line)?;
        if let Some(term_id) = &self.term_id {
            write!(f, "[{term_id}] ")?;
        }
        write!(f, "{}", self.message)
    }
}

/// An ordered collection of advisory diagnostics.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log and record an advisory problem.
    pub fn warn(&mut self, kind: DiagnosticKind, location: Location<'_>, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(
            kind = kind.as_str(),
            source = location.source,
            line = location.line,
            term = location.term_id.unwrap_or("-"),
            "{message}"
        );
        self.entries.push(Diagnostic {
            kind,
            source: location.source.to_owned(),
            line: location.line,
            term_id: location.term_id.map(str::to_owned),
            message,
        });
    }

    /// Move all diagnostics from `other` to the end of this collection.
    pub fn append(&mut self, other: &mut Self) {
        self.entries.append(&mut other.entries);
    }

    #[must_use]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Number of diagnostics of the given kind.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Whether any diagnostic of the given kind was recorded.
    #[must_use]
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.entries.iter().any(|d| d.kind == kind)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
