//! Invariant checking for deterministic simulation testing.
//!
//! Each check compares a load or a stream against what the generated
//! document says it must contain, recording violations instead of
//! panicking so a run reports every problem it finds.

use std::collections::BTreeSet;

use crate::store::{Ontology, ValidationToggles, name_key};
use crate::testing::term_to_obo;

use super::document_gen::{ExpectedTerm, GeneratedDocument};

/// An invariant violation detected during simulation.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Index of the document where it was detected.
    pub document_index: usize,
    /// Additional context.
    pub context: String,
}

/// Checker for loader and stream invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    violations: Vec<InvariantViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    fn violation(&mut self, document_index: usize, description: &str, context: String) {
        self.violations.push(InvariantViolation {
            description: description.to_owned(),
            document_index,
            context,
        });
    }

    /// A clean document loads without diagnostics; a malformed one reports
    /// the diagnostic its malformation calls for.
    pub fn check_diagnostics(&mut self, doc: &GeneratedDocument, ontology: &Ontology, index: usize) {
        let diagnostics = ontology.diagnostics();
        match doc.malformation {
            None if !diagnostics.is_empty() => {
                let first = diagnostics.entries().first().map(ToString::to_string);
                self.violation(
                    index,
                    "Clean document produced diagnostics",
                    format!("{} diagnostics, first: {first:?}", diagnostics.len()),
                );
            }
            Some(malformation) if !diagnostics.has(malformation.expected_diagnostic()) => {
                self.violation(
                    index,
                    "Malformation not reported",
                    format!("{malformation:?} expected {:?}", malformation.expected_diagnostic()),
                );
            }
            _ => {}
        }
    }

    /// Every well-formed term is present with the generated fields.
    pub fn check_terms(&mut self, doc: &GeneratedDocument, ontology: &Ontology, index: usize) {
        for expected in &doc.terms {
            let Some(term) = ontology.fetch_by_id(&expected.id) else {
                self.violation(index, "Term missing", expected.id.clone());
                continue;
            };
            let matches = term.name.as_deref() == Some(expected.name.as_str())
                && term.namespace.as_deref() == Some(expected.namespace.as_str())
                && term.obsolete == expected.obsolete
                && term.parent_ids() == expected.parent.iter().map(String::as_str).collect::<Vec<_>>();
            if !matches {
                self.violation(index, "Term fields differ", format!("{expected:?} vs {term:?}"));
            }
        }
    }

    /// Alt-id stubs point at their owner and resolve to it.
    pub fn check_alt_ids(&mut self, doc: &GeneratedDocument, ontology: &Ontology, index: usize) {
        for expected in &doc.terms {
            let Some(alt_id) = &expected.alt_id else {
                continue;
            };
            let stub_owner = ontology.entry(alt_id).and_then(|stub| stub.true_id.as_deref());
            let resolved = ontology.fetch_by_id(alt_id).map(|term| term.id.as_str());
            if stub_owner != Some(expected.id.as_str()) || resolved != Some(expected.id.as_str()) {
                self.violation(
                    index,
                    "Alt id does not resolve to its owner",
                    format!("{alt_id} -> stub {stub_owner:?}, resolved {resolved:?}"),
                );
            }
        }
    }

    /// Names and synonyms are keyed by namespace and map back to their term.
    pub fn check_name_keys(&mut self, doc: &GeneratedDocument, ontology: &Ontology, index: usize) {
        for expected in &doc.terms {
            let texts = std::iter::once(&expected.name).chain(expected.synonym.as_ref());
            for text in texts {
                let key = name_key(Some(expected.namespace.as_str()), text, expected.obsolete);
                let owner = ontology.fetch_by_name(&key).map(|term| term.id.as_str());
                if owner != Some(expected.id.as_str()) {
                    self.violation(
                        index,
                        "Name key does not map back",
                        format!("{key} -> {owner:?}, expected {}", expected.id),
                    );
                }
            }
        }
    }

    /// Two loads of the same text agree on every table.
    pub fn check_idempotent(&mut self, first: &Ontology, second: &Ontology, index: usize) {
        let term_keys = |o: &Ontology| o.term_keys().map(str::to_owned).collect::<BTreeSet<_>>();
        let name_keys = |o: &Ontology| o.name_keys().map(str::to_owned).collect::<BTreeSet<_>>();

        if term_keys(first) != term_keys(second) || name_keys(first) != name_keys(second) {
            self.violation(index, "Reload changed the key sets", String::new());
            return;
        }
        if !first.terms().eq(second.terms()) {
            self.violation(index, "Reload changed term values", String::new());
        }
    }

    /// A serialized term loads back with the same fields.
    pub fn check_round_trip(&mut self, ontology: &Ontology, expected: &ExpectedTerm, index: usize) {
        let Some(term) = ontology.fetch_by_id(&expected.id) else {
            return;
        };
        let reloaded = Ontology::parse_str("round-trip", &term_to_obo(term), ValidationToggles::none());
        let Some(again) = reloaded.fetch_by_id(&term.id) else {
            self.violation(index, "Round trip lost the term", term.id.clone());
            return;
        };
        let same = again.name == term.name
            && again.namespace == term.namespace
            && again.def == term.def
            && again.obsolete == term.obsolete
            && again.tags.len() == term.tags.len()
            && again
                .tags
                .iter()
                .zip(&term.tags)
                .all(|(a, b)| a.name == b.name && a.value == b.value && a.comment == b.comment);
        if !same {
            self.violation(index, "Round trip changed the term", format!("{term:?} vs {again:?}"));
        }
    }

    /// A stream yields every well-formed term, in file order.
    pub fn check_stream(&mut self, doc: &GeneratedDocument, streamed: &[String], index: usize) {
        let expected: Vec<&str> = doc.terms.iter().map(|term| term.id.as_str()).collect();
        let wanted: BTreeSet<&str> = expected.iter().copied().collect();
        let mut seen = BTreeSet::new();
        // A duplicate id is streamed twice; only its first occurrence counts.
        let found: Vec<&str> = streamed
            .iter()
            .map(String::as_str)
            .filter(|id| wanted.contains(id) && seen.insert(*id))
            .collect();
        if found != expected {
            self.violation(
                index,
                "Stream and expected terms differ",
                format!("streamed {found:?}, expected {expected:?}"),
            );
        }
    }

    /// Two streams over the same sources yield the same ids.
    pub fn check_same_ids(&mut self, description: &str, left: &[String], right: &[String], index: usize) {
        if left != right {
            self.violation(
                index,
                description,
                format!("{} ids vs {} ids", left.len(), right.len()),
            );
        }
    }

    /// Record a failure that no invariant allows.
    pub fn unexpected(&mut self, description: &str, context: String, index: usize) {
        self.violation(index, description, context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::document_gen::{DocumentGenerator, MalformationType};

    #[test]
    fn test_clean_document_passes_every_check() {
        let mut generator = DocumentGenerator::new(3);
        let doc = generator.generate_document(None);
        let ontology = Ontology::parse_str("sim", &doc.text, ValidationToggles::default());

        let mut checker = InvariantChecker::new();
        checker.check_diagnostics(&doc, &ontology, 0);
        checker.check_terms(&doc, &ontology, 0);
        checker.check_alt_ids(&doc, &ontology, 0);
        checker.check_name_keys(&doc, &ontology, 0);
        assert!(!checker.has_violations(), "{:?}", checker.violations());
    }

    #[test]
    fn test_missing_term_is_a_violation() {
        let mut generator = DocumentGenerator::new(3);
        let doc = generator.generate_document(None);
        let empty = Ontology::parse_str("sim", "", ValidationToggles::default());

        let mut checker = InvariantChecker::new();
        checker.check_terms(&doc, &empty, 4);
        assert!(checker.has_violations());
        assert_eq!(checker.violations()[0].document_index, 4);
        assert_eq!(checker.violations()[0].description, "Term missing");
        assert_eq!(checker.violations()[0].context, doc.terms[0].id);
    }

    #[test]
    fn test_unreported_malformation_is_a_violation() {
        let mut generator = DocumentGenerator::new(3);
        let mut doc = generator.generate_document(None);
        let ontology = Ontology::parse_str("sim", &doc.text, ValidationToggles::default());
        doc.malformation = Some(MalformationType::UnknownTag);

        let mut checker = InvariantChecker::new();
        checker.check_diagnostics(&doc, &ontology, 0);
        assert!(checker.has_violations());
    }

    #[test]
    fn test_stream_order_is_checked() {
        let mut generator = DocumentGenerator::new(5);
        let mut doc = generator.generate_document(None);
        while doc.terms.len() < 2 {
            doc = generator.generate_document(None);
        }
        let mut streamed: Vec<String> = doc.terms.iter().map(|t| t.id.clone()).collect();

        let mut checker = InvariantChecker::new();
        checker.check_stream(&doc, &streamed, 0);
        assert!(!checker.has_violations());

        streamed.reverse();
        checker.check_stream(&doc, &streamed, 1);
        assert!(checker.has_violations());
    }
}
