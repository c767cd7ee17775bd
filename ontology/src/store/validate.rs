//! Cross-reference validation, run once after the whole file is loaded.
//!
//! Two passes over id-sorted lists: Typedef stanzas first, then terms. Each
//! stanza is checked against its tag schema, and every id the stanza
//! mentions is looked up in the term and Typedef tables.
//!
//! Tags the loader absorbs into term fields (`id`, `name`, `def`, ...) are
//! not in a term's tag list, so their schema minimums are not checked here.

use super::sort::shell_sort_by;
use super::{Ontology, StanzaEntry, ValidationToggles};
use crate::diagnostics::{DiagnosticKind, Diagnostics, Location};
use crate::parse::{BracketCut, cut_dbxref};
use crate::types::schema::lookup;
use crate::types::{StanzaType, Tag, Term, id_prefix};

/// Characters that end an id token inside free text.
const SEPARATORS: &[char] = &[',', ';', '(', ')', '[', ']', '{', '}', '"', '\''];

/// Run both cross-reference passes and record their findings.
pub(super) fn cross_reference(ontology: &mut Ontology, toggles: ValidationToggles) {
    let mut diagnostics = Diagnostics::new();
    let mut checker = Checker {
        ontology: &*ontology,
        toggles,
        diagnostics: &mut diagnostics,
    };
    checker.typedef_pass();
    checker.term_pass();
    ontology.diagnostics.append(&mut diagnostics);
}

struct Checker<'a> {
    ontology: &'a Ontology,
    toggles: ValidationToggles,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> Checker<'a> {
    fn location(&self, line: usize, id: &'a str) -> Location<'a> {
        Location::at(&self.ontology.source, line).with_term(Some(id))
    }

    fn typedef_pass(&mut self) {
        let ontology = self.ontology;
        let Some(table) = ontology.typedefs() else {
            return;
        };
        let mut entries: Vec<&StanzaEntry> = table.iter().collect();
        shell_sort_by(&mut entries, |a, b| a.id.cmp(&b.id));

        for entry in entries {
            self.check_schema(StanzaType::Typedef, &entry.id, &entry.tags, entry.line);
            if self.toggles.unknown_ids {
                for tag in entry.tags.iter().filter(|tag| tag.name != "id") {
                    self.check_tokens(&entry.id, tag);
                }
            }
        }
    }

    fn term_pass(&mut self) {
        let ontology = self.ontology;
        let mut terms: Vec<&Term> = ontology.terms().collect();
        shell_sort_by(&mut terms, |a, b| a.id.cmp(&b.id));

        for term in terms {
            let line = term.tags.first().map_or(0, |tag| tag.line_number);
            self.check_schema(StanzaType::Term, &term.id, &term.tags, line);
            for tag in &term.tags {
                match tag.name.as_str() {
                    "is_a" | "consider" => self.check_reference(&term.id, tag, tag.first_token()),
                    "relationship" => self.check_relationship(&term.id, tag),
                    _ => {
                        if self.toggles.unknown_ids {
                            self.check_tokens(&term.id, tag);
                        }
                    }
                }
            }
        }
    }

    /// Tag order, cardinality, unknown and obsolete tag names.
    fn check_schema(&mut self, kind: StanzaType, id: &'a str, tags: &'a [Tag], line: usize) {
        let schema = kind.schema();
        let mut counts = vec![0_usize; schema.len()];
        let mut last: Option<(usize, &str)> = None;

        for tag in tags {
            let location = self.location(tag.line_number, id);
            let Some((position, rule)) = lookup(schema, &tag.name) else {
                // Terms may use a declared relationship type as a tag name.
                let relationship_tag = kind == StanzaType::Term && self.ontology.is_typedef(&tag.name);
                if !relationship_tag {
                    self.diagnostics.warn(
                        DiagnosticKind::UnknownTag,
                        location,
                        format!("unknown [{kind}] tag '{}'", tag.name),
                    );
                }
                continue;
            };

            if let Some(replacement) = rule.alias_of {
                self.diagnostics.warn(
                    DiagnosticKind::ObsoleteTag,
                    location,
                    format!("obsolete tag '{}', use '{replacement}'", tag.name),
                );
            }

            match last {
                Some((last_position, last_name)) if position < last_position => {
                    self.diagnostics.warn(
                        DiagnosticKind::TagOrder,
                        location,
                        format!("tag '{}' out of order after '{last_name}'", tag.name),
                    );
                }
                _ => last = Some((position, tag.name.as_str())),
            }

            counts[position] += 1;
            let target = &schema[position];
            if counts[position].checked_sub(1) == Some(target.max) {
                self.diagnostics.warn(
                    DiagnosticKind::Cardinality,
                    location,
                    format!("too many '{}' tags, at most {} allowed", target.name, target.max),
                );
            }
        }

        for (rule, count) in schema.iter().zip(&counts) {
            if rule.alias_of.is_some() || *count >= rule.min {
                continue;
            }
            if kind == StanzaType::Term && absorbed(rule.name) {
                continue;
            }
            self.diagnostics.warn(
                DiagnosticKind::Cardinality,
                self.location(line, id),
                format!("missing required tag '{}'", rule.name),
            );
        }
    }

    /// An `is_a` or `consider` target must be a known term, and a trailing
    /// comment must match the target's name.
    fn check_reference(&mut self, id: &'a str, tag: &'a Tag, target: &str) {
        let location = self.location(tag.line_number, id);
        if target.is_empty() {
            self.diagnostics.warn(
                DiagnosticKind::BadValue,
                location,
                format!("'{}' has no target id", tag.name),
            );
            return;
        }
        match self.ontology.fetch_by_id(target) {
            None => {
                if self.toggles.unknown_ids {
                    self.diagnostics.warn(
                        DiagnosticKind::UnknownId,
                        location,
                        format!("Unknown id '{target}' in '{}'", tag.name),
                    );
                }
            }
            Some(found) => {
                let Some(comment) = tag.comment.as_deref() else {
                    return;
                };
                let name = found.name.as_deref().unwrap_or("");
                if comment != name {
                    self.diagnostics.warn(
                        DiagnosticKind::NameMismatch,
                        location,
                        format!("'{target}' is named '{name}', comment says '{comment}'"),
                    );
                }
            }
        }
    }

    /// `relationship: type target` needs a declared type and a known target.
    fn check_relationship(&mut self, id: &'a str, tag: &'a Tag) {
        let mut parts = tag.value.split_whitespace();
        let (Some(relation), Some(target)) = (parts.next(), parts.next()) else {
            self.diagnostics.warn(
                DiagnosticKind::BadValue,
                self.location(tag.line_number, id),
                "relationship needs a type and a target",
            );
            return;
        };
        if self.toggles.unknown_ids && !self.ontology.is_typedef(relation) {
            self.diagnostics.warn(
                DiagnosticKind::UnknownRelationship,
                self.location(tag.line_number, id),
                format!("relationship type '{relation}' is not a declared Typedef"),
            );
        }
        self.check_reference(id, tag, target);
    }

    /// Report id-looking tokens whose prefix belongs to this file but which
    /// name no term or Typedef.
    fn check_tokens(&mut self, id: &'a str, tag: &'a Tag) {
        for token in reference_tokens(&tag.value) {
            let tracked = id_prefix(token).is_some_and(|prefix| self.ontology.is_tracked_prefix(prefix));
            if !tracked || self.ontology.entry(token).is_some() || self.ontology.is_typedef(token) {
                continue;
            }
            self.diagnostics.warn(
                DiagnosticKind::UnknownId,
                self.location(tag.line_number, id),
                format!("Unknown id '{token}' in '{}'", tag.name),
            );
        }
    }
}

/// Term tags the loader stores as fields instead of tags.
fn absorbed(name: &str) -> bool {
    matches!(
        name,
        "id" | "name" | "namespace" | "comment" | "def" | "synonym" | "alt_id"
    )
}

/// Split a tag value into candidate id tokens.
///
/// Quoted text and a trailing dbxref list are skipped. Tokens end at
/// whitespace and at [`SEPARATORS`]; a trailing `.` is dropped.
fn reference_tokens(value: &str) -> Vec<&str> {
    let value = match cut_dbxref(value) {
        BracketCut::Found { rest, .. } => rest,
        BracketCut::Absent | BracketCut::Unbalanced => value,
    };

    let mut tokens = Vec::new();
    let mut start = None;
    let mut in_quote = false;
    let mut escaped = false;
    for (index, c) in value.char_indices() {
        let quote = c == '"' && !escaped;
        escaped = !escaped && c == '\\';
        if quote {
            in_quote = !in_quote;
        }
        let boundary = quote || in_quote || c.is_whitespace() || SEPARATORS.contains(&c);
        if boundary {
            if let Some(begin) = start.take() {
                tokens.push(&value[begin..index]);
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        tokens.push(&value[begin..]);
    }

    tokens
        .into_iter()
        .map(|token| token.trim_end_matches('.'))
        .filter(|token| !token.is_empty())
        .collect()
}
