//! Whole-file loader.
//!
//! One pass over the logical lines of a file builds every table; the
//! cross-reference checks in `validate` run once the last stanza is stored.
//! Only I/O failures are errors. Everything else is an advisory diagnostic
//! and the ontology is always returned.

use std::cmp::Ordering;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::{Ontology, StanzaEntry, ValidationToggles, name_key, validate};
use crate::constants::HEADER_TAGS;
use crate::diagnostics::{DiagnosticKind, Location};
use crate::parse::{
    GenericStanza, LogicalLine, LogicalLines, Stanza, StanzaBuilder, StanzaKind, StanzaOrder,
    TagLine, TermExtras, header_name, parse_tag_line, strip,
};
use crate::types::{StanzaType, Term, id_prefix};

/// Errors that abort a load.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// A line could not be read.
    Read {
        source_name: String,
        line: usize,
        error: io::Error,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "cannot open ontology {}: {source}", path.display())
            }
            Self::Read {
                source_name,
                line,
                error,
            } => write!(f, "read error in {source_name} at line {line}: {error}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Read { error, .. } => Some(error),
        }
    }
}

impl Ontology {
    /// Load an ontology file with a validation toggle string.
    ///
    /// Unknown toggle tokens are recorded as diagnostics and ignored.
    pub fn load(path: &Path, toggles: &str) -> Result<Self, LoadError> {
        let (parsed, unknown) = ValidationToggles::parse(toggles);
        let mut loader = Loader::new(&path.display().to_string(), parsed);
        loader.report_unknown_toggles(&unknown);
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        loader.read(BufReader::new(file).lines())
    }

    /// Load an ontology file with explicit toggles.
    pub fn load_with(path: &Path, toggles: ValidationToggles) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(&path.display().to_string(), BufReader::new(file), toggles)
    }

    /// Load an ontology from any buffered reader.
    pub fn from_reader<R: BufRead>(
        source_name: &str,
        reader: R,
        toggles: ValidationToggles,
    ) -> Result<Self, LoadError> {
        Loader::new(source_name, toggles).read(reader.lines())
    }

    /// Load an ontology from text already in memory.
    #[must_use]
    pub fn parse_str(source_name: &str, text: &str, toggles: ValidationToggles) -> Self {
        let mut loader = Loader::new(source_name, toggles);
        for line in LogicalLines::new(text.lines().map(|line| Ok(line.to_owned()))).flatten() {
            loader.feed(&line);
        }
        loader.finish()
    }
}

/// Per-load state.
struct Loader {
    ontology: Ontology,
    toggles: ValidationToggles,
    builder: StanzaBuilder,
    order: StanzaOrder,
    /// Type and id of the previous stanza, for ordering checks.
    previous_id: Option<(StanzaKind, String)>,
    last_line: usize,
}

impl Loader {
    fn new(source_name: &str, toggles: ValidationToggles) -> Self {
        Self {
            ontology: Ontology::new(source_name),
            toggles,
            builder: StanzaBuilder::new(),
            order: StanzaOrder::new(),
            previous_id: None,
            last_line: 0,
        }
    }

    fn report_unknown_toggles(&mut self, unknown: &[String]) {
        for token in unknown {
            self.ontology.diagnostics.warn(
                DiagnosticKind::UnknownToggle,
                Location::at(&self.ontology.source, 0),
                format!("unknown validation toggle '{token}' ignored"),
            );
        }
    }

    fn read<I>(mut self, lines: I) -> Result<Ontology, LoadError>
    where
        I: Iterator<Item = io::Result<String>>,
    {
        for line in LogicalLines::new(lines) {
            let line = line.map_err(|error| LoadError::Read {
                source_name: self.ontology.source.clone(),
                line: self.last_line + 1,
                error,
            })?;
            self.feed(&line);
        }
        Ok(self.finish())
    }

    fn feed(&mut self, line: &LogicalLine) {
        self.last_line = line.number;
        let stripped = strip(&line.text);
        let location = Location::at(&self.ontology.source, line.number);

        if let Some(name) = header_name(stripped.body) {
            let kind = self
                .order
                .enter(name, location, &mut self.ontology.diagnostics);
            if let Some(previous) = self.builder.begin(kind, line.number) {
                self.store(previous);
            }
            return;
        }

        let Some(tag) = parse_tag_line(&stripped, location, &mut self.ontology.diagnostics) else {
            return;
        };
        if self.builder.in_stanza() {
            self.builder
                .add(tag, &self.ontology.source, &mut self.ontology.diagnostics);
        } else {
            self.header_tag(tag);
        }
    }

    fn header_tag(&mut self, tag: TagLine) {
        if !HEADER_TAGS.contains(&tag.name.as_str()) {
            self.ontology.diagnostics.warn(
                DiagnosticKind::UnknownHeaderTag,
                Location::at(&self.ontology.source, tag.line_number),
                format!("unknown header tag '{}'", tag.name),
            );
        }
        self.ontology.header.push(tag.into_tag());
    }

    fn store(&mut self, stanza: Stanza) {
        match stanza {
            Stanza::Term {
                term,
                extras,
                line,
            } => self.store_term(term, extras, line),
            Stanza::Other {
                kind,
                stanza,
                line,
            } => self.store_generic(kind, stanza, line),
        }
    }

    fn store_term(&mut self, term: Term, extras: TermExtras, line: usize) {
        if term.id.is_empty() {
            self.ontology.diagnostics.warn(
                DiagnosticKind::MissingId,
                Location::at(&self.ontology.source, line),
                "[Term] stanza has no id, skipped",
            );
            return;
        }
        self.check_id_order(&StanzaKind::Known(StanzaType::Term), &term.id, line);
        self.count_prefix(&term.id);

        let id = term.id.clone();
        let namespace = term.namespace.clone();
        let obsolete = term.obsolete;
        let index = match self.ontology.insert_term(term) {
            Ok(index) => index,
            Err(duplicate) => {
                self.ontology.diagnostics.warn(
                    DiagnosticKind::DuplicateId,
                    Location::at(&self.ontology.source, line).with_term(Some(&duplicate.id)),
                    format!("duplicate id '{}', first definition kept", duplicate.id),
                );
                return;
            }
        };

        for (alt_id, alt_line) in extras.alt_ids {
            if self.ontology.insert_term(Term::stub(&alt_id, &id)).is_ok() {
                self.count_prefix(&alt_id);
            } else {
                self.ontology.diagnostics.warn(
                    DiagnosticKind::DuplicateAltId,
                    Location::at(&self.ontology.source, alt_line).with_term(Some(&id)),
                    format!("alt_id '{alt_id}' is already in the term table"),
                );
            }
        }

        for key in extras.name_keys {
            let full_key = name_key(namespace.as_deref(), &key.text, obsolete);
            let Err(owner) = self.ontology.insert_name(full_key.clone(), index) else {
                continue;
            };
            let silent = owner == index || (key.synonym && !self.toggles.multi_synonym);
            if !silent {
                let owner_id = self.ontology.terms.get(owner).map_or("", |t| t.id.as_str());
                self.ontology.diagnostics.warn(
                    DiagnosticKind::DuplicateName,
                    Location::at(&self.ontology.source, key.line).with_term(Some(&id)),
                    format!("name '{full_key}' already names {owner_id}"),
                );
            }
        }
    }

    fn store_generic(&mut self, kind: StanzaKind, stanza: GenericStanza, line: usize) {
        let Some(id) = stanza.id else {
            self.ontology.diagnostics.warn(
                DiagnosticKind::MissingId,
                Location::at(&self.ontology.source, line),
                format!("[{}] stanza has no id, skipped", kind.name()),
            );
            return;
        };
        self.check_id_order(&kind, &id, line);
        self.count_prefix(&id);

        let entry = StanzaEntry {
            id,
            tags: stanza.tags,
            line,
        };
        if let Err(duplicate) = self.ontology.table_mut(&kind).insert(entry) {
            self.ontology.diagnostics.warn(
                DiagnosticKind::DuplicateId,
                Location::at(&self.ontology.source, line).with_term(Some(&duplicate.id)),
                format!(
                    "duplicate [{}] id '{}', first definition kept",
                    kind.name(),
                    duplicate.id
                ),
            );
        }
    }

    /// Ids within a run of same-typed stanzas should increase.
    fn check_id_order(&mut self, kind: &StanzaKind, id: &str, line: usize) {
        if self.toggles.id_order {
            if let Some((previous_kind, previous_id)) = &self.previous_id {
                if previous_kind == kind {
                    let location = Location::at(&self.ontology.source, line).with_term(Some(id));
                    match id.cmp(previous_id.as_str()) {
                        Ordering::Less => self.ontology.diagnostics.warn(
                            DiagnosticKind::IdOrder,
                            location,
                            format!("id '{id}' is out of order after '{previous_id}'"),
                        ),
                        Ordering::Equal => self.ontology.diagnostics.warn(
                            DiagnosticKind::DuplicatePreviousId,
                            location,
                            format!("'{id}' is a duplicate of previous ID"),
                        ),
                        Ordering::Greater => {}
                    }
                }
            }
        }
        self.previous_id = Some((kind.clone(), id.to_owned()));
    }

    fn count_prefix(&mut self, id: &str) {
        if let Some(prefix) = id_prefix(id) {
            *self
                .ontology
                .id_prefixes
                .entry(prefix.to_owned())
                .or_default() += 1;
        }
    }

    /// Every alt-id stub must resolve to a term.
    fn check_alt_ids(&mut self) {
        let unresolved: Vec<String> = self
            .ontology
            .terms
            .iter()
            .filter(|term| term.is_stub() && self.ontology.fetch_by_id(&term.id).is_none())
            .map(|term| term.id.clone())
            .collect();
        for id in unresolved {
            self.ontology.diagnostics.warn(
                DiagnosticKind::AltIdCycle,
                Location::at(&self.ontology.source, 0).with_term(Some(&id)),
                format!("alt_id '{id}' does not resolve to a term"),
            );
        }
    }

    fn finish(mut self) -> Ontology {
        if let Some(stanza) = self.builder.finish() {
            self.store(stanza);
        }
        self.check_alt_ids();
        if self.toggles.cross_references {
            validate::cross_reference(&mut self.ontology, self.toggles);
        }

        let ontology = self.ontology;
        for (prefix, count) in &ontology.id_prefixes {
            tracing::info!(source = %ontology.source, prefix = %prefix, count, "id prefix");
        }
        tracing::info!(
            source = %ontology.source,
            terms = ontology.term_count(),
            typedefs = ontology.typedefs().map_or(0, super::StanzaTable::len),
            names = ontology.name_table.len(),
            warnings = ontology.diagnostics.len(),
            "loaded ontology"
        );
        ontology
    }
}
