//! Stanza builder.
//!
//! Accumulates the tag lines of one stanza into a [`Term`] (for `[Term]`
//! stanzas) or a generic tag list (for every other stanza type). The per-tag
//! dispatch in [`apply_term_tag`] is shared by the whole-file loader and the
//! incremental reader; the two differ only in [`BuildMode`].

use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::parse::definition::{parse_definition, parse_quoted};
use crate::parse::sanitize::{Stripped, unescape};
use crate::parse::tokenize::tokenize;
use crate::types::{StanzaType, Tag, Term};

/// Which consumer the builder is working for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    /// Whole-file load: absorbed tags stay out of the term's tag list.
    Bulk,
    /// Incremental read: `alt_id` and `synonym` are also kept as tags.
    Stream,
}

/// A tokenized tag line. The value is still escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLine {
    pub name: String,
    pub value: String,
    pub modifier: Option<String>,
    pub comment: Option<String>,
    pub line_number: usize,
}

impl TagLine {
    /// Convert into a [`Tag`], decoding the value.
    #[must_use]
    pub fn into_tag(self) -> Tag {
        Tag {
            value: unescape(&self.value).into_owned(),
            name: self.name,
            modifier: self.modifier,
            comment: self.comment,
            line_number: self.line_number,
        }
    }

    fn unescaped(&self) -> String {
        unescape(&self.value).into_owned()
    }
}

/// Tokenize a stripped line, warning about malformed names and values.
pub fn parse_tag_line(
    stripped: &Stripped<'_>,
    location: Location<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<TagLine> {
    if stripped.unbalanced {
        diagnostics.warn(
            DiagnosticKind::UnbalancedBracket,
            location,
            "trailing '}' has no matching '{'",
        );
    }
    let tokens = tokenize(stripped.body)?;
    if tokens.bad_name {
        diagnostics.warn(
            DiagnosticKind::BadTagName,
            location,
            format!("bad name '{}': tag names end with ':'", tokens.name),
        );
    }
    if tokens.missing_value {
        diagnostics.warn(
            DiagnosticKind::MissingValue,
            location,
            format!("missing value for tag '{}'", tokens.name),
        );
    }
    Some(TagLine {
        name: tokens.name.to_owned(),
        value: tokens.value.to_owned(),
        modifier: stripped.modifier.map(str::to_owned),
        comment: stripped.comment.map(|c| unescape(c).into_owned()),
        line_number: location.line,
    })
}

/// A name or synonym waiting for the stanza's namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameKey {
    pub text: String,
    pub synonym: bool,
    pub line: usize,
}

/// Per-stanza state that only becomes meaningful once the stanza closes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermExtras {
    /// `alt_id` values with their line numbers.
    pub alt_ids: Vec<(String, usize)>,
    pub name_keys: Vec<NameKey>,
}

fn term_location<'a>(source: &'a str, line: usize, term: &'a Term) -> Location<'a> {
    let term_id = (!term.id.is_empty()).then_some(term.id.as_str());
    Location::at(source, line).with_term(term_id)
}

fn warn_repeat(diagnostics: &mut Diagnostics, location: Location<'_>, name: &str) {
    diagnostics.warn(
        DiagnosticKind::RepeatedTag,
        location,
        format!("repeated '{name}' tag ignored"),
    );
}

fn parse_boolean(
    line: &TagLine,
    location: Location<'_>,
    diagnostics: &mut Diagnostics,
) -> Option<bool> {
    match unescape(&line.value).as_ref() {
        "true" => Some(true),
        "false" => Some(false),
        other => {
            diagnostics.warn(
                DiagnosticKind::BadBoolean,
                location,
                format!("'{}' value '{other}' is not 'true' or 'false'", line.name),
            );
            None
        }
    }
}

/// Apply one tag line of a `[Term]` stanza.
///
/// Scalar fields keep their first value; a repeat warns and is dropped.
pub fn apply_term_tag(
    term: &mut Term,
    extras: &mut TermExtras,
    line: TagLine,
    mode: BuildMode,
    source: &str,
    diagnostics: &mut Diagnostics,
) {
    let location = term_location(source, line.line_number, term);
    match line.name.as_str() {
        "id" => {
            if term.id.is_empty() {
                let id = line.unescaped();
                term.set_id(&id, &line.value);
            } else {
                warn_repeat(diagnostics, location, "id");
            }
        }
        "name" => {
            if term.name.is_some() {
                warn_repeat(diagnostics, location, "name");
            } else {
                let name = line.unescaped();
                extras.name_keys.push(NameKey {
                    text: name.clone(),
                    synonym: false,
                    line: line.line_number,
                });
                term.name = Some(name);
            }
        }
        "namespace" => {
            if term.namespace.is_some() {
                warn_repeat(diagnostics, location, "namespace");
            } else {
                term.namespace = Some(line.unescaped());
            }
        }
        "comment" => {
            if term.comment.is_some() {
                warn_repeat(diagnostics, location, "comment");
            } else {
                term.comment = Some(line.unescaped());
            }
        }
        "def" => {
            if term.def.is_some() {
                warn_repeat(diagnostics, location, "def");
            } else {
                match parse_definition(&line.value) {
                    Ok(definition) => term.def = Some(definition.text),
                    Err(e) => diagnostics.warn(DiagnosticKind::BadDefinition, location, e.to_string()),
                }
            }
        }
        "synonym" => {
            match parse_quoted(&line.value) {
                Ok(quoted) => extras.name_keys.push(NameKey {
                    text: quoted.text,
                    synonym: true,
                    line: line.line_number,
                }),
                Err(_) => diagnostics.warn(
                    DiagnosticKind::BadValue,
                    location,
                    "synonym has no quoted text",
                ),
            }
            if mode == BuildMode::Stream {
                term.tags.push(line.into_tag());
            }
        }
        "is_obsolete" => {
            if let Some(value) = parse_boolean(&line, location, diagnostics) {
                term.obsolete = value;
            }
            term.tags.push(line.into_tag());
        }
        "builtin" => {
            if let Some(value) = parse_boolean(&line, location, diagnostics) {
                term.builtin = value;
            }
            term.tags.push(line.into_tag());
        }
        "replaced_by" | "consider" => {
            term.replaced = Some(line.unescaped());
            term.tags.push(line.into_tag());
        }
        "alt_id" => {
            extras.alt_ids.push((line.unescaped(), line.line_number));
            if mode == BuildMode::Stream {
                term.tags.push(line.into_tag());
            }
        }
        _ => term.tags.push(line.into_tag()),
    }
}

/// A non-Term stanza: its id and every tag, `id` included.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenericStanza {
    pub id: Option<String>,
    pub tags: Vec<Tag>,
}

/// Apply one tag line of a non-Term stanza.
pub fn apply_generic_tag(
    stanza: &mut GenericStanza,
    line: TagLine,
    source: &str,
    diagnostics: &mut Diagnostics,
) {
    if line.name == "id" {
        if stanza.id.is_some() {
            let location = Location::at(source, line.line_number).with_term(stanza.id.as_deref());
            warn_repeat(diagnostics, location, "id");
        } else {
            stanza.id = Some(line.unescaped());
        }
    }
    stanza.tags.push(line.into_tag());
}

/// The type of a stanza, as named by its header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StanzaKind {
    Known(StanzaType),
    /// An unrecognised type, kept as an opaque tag bag.
    Other(String),
}

impl StanzaKind {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Known(kind) => kind.as_str(),
            Self::Other(name) => name,
        }
    }
}

/// Tracks stanza headers to check type names and canonical order.
#[derive(Debug, Default)]
pub struct StanzaOrder {
    previous: Option<StanzaType>,
}

impl StanzaOrder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a header name, warning about unknown or out-of-order types.
    pub fn enter(
        &mut self,
        name: &str,
        location: Location<'_>,
        diagnostics: &mut Diagnostics,
    ) -> StanzaKind {
        let Some(kind) = StanzaType::from_header(name) else {
            diagnostics.warn(
                DiagnosticKind::UnknownStanzaType,
                location,
                format!("unknown stanza type '[{name}]'"),
            );
            return StanzaKind::Other(name.to_owned());
        };
        if let Some(previous) = self.previous.filter(|previous| kind.rank() < previous.rank()) {
            diagnostics.warn(
                DiagnosticKind::StanzaOrder,
                location,
                format!("[{kind}] stanza after [{previous}] stanza"),
            );
        }
        self.previous = Some(kind);
        StanzaKind::Known(kind)
    }
}

/// A finished stanza.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stanza {
    Term {
        term: Term,
        extras: TermExtras,
        line: usize,
    },
    Other {
        kind: StanzaKind,
        stanza: GenericStanza,
        line: usize,
    },
}

/// Builds whole stanzas for the bulk loader.
///
/// A new header always flushes the stanza in progress.
#[derive(Debug, Default)]
pub struct StanzaBuilder {
    current: Option<Stanza>,
}

impl StanzaBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stanza, returning the one it replaces.
    pub fn begin(&mut self, kind: StanzaKind, line: usize) -> Option<Stanza> {
        let next = match kind {
            StanzaKind::Known(StanzaType::Term) => Stanza::Term {
                term: Term::new(),
                extras: TermExtras::default(),
                line,
            },
            kind => Stanza::Other {
                kind,
                stanza: GenericStanza::default(),
                line,
            },
        };
        self.current.replace(next)
    }

    /// Whether a stanza is in progress.
    #[must_use]
    pub const fn in_stanza(&self) -> bool {
        self.current.is_some()
    }

    /// Add a tag line to the stanza in progress. Ignored outside a stanza.
    pub fn add(&mut self, line: TagLine, source: &str, diagnostics: &mut Diagnostics) {
        match &mut self.current {
            Some(Stanza::Term { term, extras, .. }) => {
                apply_term_tag(term, extras, line, BuildMode::Bulk, source, diagnostics);
            }
            Some(Stanza::Other { stanza, .. }) => {
                apply_generic_tag(stanza, line, source, diagnostics);
            }
            None => {}
        }
    }

    /// Close the stanza in progress.
    pub const fn finish(&mut self) -> Option<Stanza> {
        self.current.take()
    }
}
