//! Document generator for deterministic simulation testing.
//!
//! This module generates random but reproducible OBO documents, recording
//! for each well-formed term what a correct load must contain. A document
//! may end with one malformed stanza whose expected diagnostic is known.

use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::diagnostics::DiagnosticKind;

/// Configuration for document generation.
#[derive(Debug, Clone)]
pub struct DocumentGenConfig {
    /// Probability of appending a malformed stanza (0.0 - 1.0).
    pub malformed_rate: f64,
    /// Maximum number of well-formed terms per document.
    pub max_terms: usize,
    /// Probability that a term carries an `alt_id`.
    pub alt_id_rate: f64,
    /// Probability that a term carries a synonym.
    pub synonym_rate: f64,
    /// Probability that a term is obsolete.
    pub obsolete_rate: f64,
    /// Probability that a term's name is split across a continuation.
    pub continuation_rate: f64,
    /// Number of namespaces terms are spread over.
    pub namespace_count: usize,
}

impl Default for DocumentGenConfig {
    fn default() -> Self {
        Self {
            malformed_rate: 0.0,
            max_terms: 30,
            alt_id_rate: 0.2,
            synonym_rate: 0.3,
            obsolete_rate: 0.1,
            continuation_rate: 0.1,
            namespace_count: 3,
        }
    }
}

/// Types of malformations that can be generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformationType {
    /// `is_obsolete` with a value other than `true` or `false`.
    BadBoolean,
    /// A `[Term]` stanza without an `id` tag.
    MissingId,
    /// A `[Term]` reusing the first term's id.
    DuplicateId,
    /// A tag name the Term schema does not know.
    UnknownTag,
    /// A trailing `}` with no opening brace.
    UnbalancedModifier,
    /// A stanza header naming no known stanza type.
    UnknownStanza,
}

impl MalformationType {
    /// All malformation types.
    pub const ALL: [Self; 6] = [
        Self::BadBoolean,
        Self::MissingId,
        Self::DuplicateId,
        Self::UnknownTag,
        Self::UnbalancedModifier,
        Self::UnknownStanza,
    ];

    /// The diagnostic a load must report for this malformation.
    #[must_use]
    pub const fn expected_diagnostic(self) -> DiagnosticKind {
        match self {
            Self::BadBoolean => DiagnosticKind::BadBoolean,
            Self::MissingId => DiagnosticKind::MissingId,
            Self::DuplicateId => DiagnosticKind::DuplicateId,
            Self::UnknownTag => DiagnosticKind::UnknownTag,
            Self::UnbalancedModifier => DiagnosticKind::UnbalancedBracket,
            Self::UnknownStanza => DiagnosticKind::UnknownStanzaType,
        }
    }
}

/// What a correct load must hold for one well-formed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedTerm {
    pub id: String,
    pub name: String,
    pub namespace: String,
    pub obsolete: bool,
    pub alt_id: Option<String>,
    pub synonym: Option<String>,
    pub parent: Option<String>,
}

/// A generated document and what loading it must produce.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub text: String,
    /// Well-formed terms, in file order.
    pub terms: Vec<ExpectedTerm>,
    pub malformation: Option<MalformationType>,
}

/// Generator for random OBO documents.
///
/// This generator produces deterministic sequences of documents
/// given the same seed, enabling reproducible testing.
pub struct DocumentGenerator {
    rng: StdRng,
    config: DocumentGenConfig,
}

impl DocumentGenerator {
    /// Create a new document generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, DocumentGenConfig::default())
    }

    /// Create a new document generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: DocumentGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Generate the next document.
    ///
    /// This may end in a malformed stanza depending on the configuration.
    pub fn next_document(&mut self) -> GeneratedDocument {
        let should_malform = self.rng.random::<f64>() < self.config.malformed_rate;
        let malformation = should_malform.then(|| {
            let index = self.rng.random_range(0..MalformationType::ALL.len());
            MalformationType::ALL[index]
        });
        self.generate_document(malformation)
    }

    /// Generate a document, optionally ending in the given malformation.
    pub fn generate_document(&mut self, malformation: Option<MalformationType>) -> GeneratedDocument {
        let count = self.rng.random_range(1..=self.config.max_terms.max(1));
        let mut text = String::from("format-version: 1.2\ndefault-namespace: ns0\n\n");
        let mut terms: Vec<ExpectedTerm> = Vec::with_capacity(count);

        for index in 1..=count {
            let term = self.generate_term(index, &terms);
            self.write_term(&mut text, &term, &terms);
            terms.push(term);
        }

        if let Some(malformation) = malformation {
            write_malformed(&mut text, malformation, count + 1);
        }

        GeneratedDocument {
            text,
            terms,
            malformation,
        }
    }

    fn generate_term(&mut self, index: usize, earlier: &[ExpectedTerm]) -> ExpectedTerm {
        let namespace = self.rng.random_range(0..self.config.namespace_count.max(1));
        let parent = if earlier.is_empty() || self.rng.random_bool(0.3) {
            None
        } else {
            Some(earlier[self.rng.random_range(0..earlier.len())].id.clone())
        };
        ExpectedTerm {
            id: format!("SIM:{index:07}"),
            name: format!("term {index}"),
            namespace: format!("ns{namespace}"),
            obsolete: self.rng.random::<f64>() < self.config.obsolete_rate,
            alt_id: (self.rng.random::<f64>() < self.config.alt_id_rate)
                .then(|| format!("ALT:{index:07}")),
            synonym: (self.rng.random::<f64>() < self.config.synonym_rate)
                .then(|| format!("synonym {index}")),
            parent,
        }
    }

    fn write_term(&mut self, text: &mut String, term: &ExpectedTerm, earlier: &[ExpectedTerm]) {
        let _ = writeln!(text, "[Term]\nid: {}", term.id);
        if self.rng.random::<f64>() < self.config.continuation_rate {
            // "term" and the number end up on separate physical lines.
            let (head, tail) = term.name.split_at(4);
            let _ = writeln!(text, "name: {head}\\\n{tail}");
        } else {
            let _ = writeln!(text, "name: {}", term.name);
        }
        let _ = writeln!(text, "namespace: {}", term.namespace);
        if let Some(alt_id) = &term.alt_id {
            let _ = writeln!(text, "alt_id: {alt_id}");
        }
        let _ = writeln!(text, "def: \"Generated term {}.\" [SIM:curators]", term.id);
        if let Some(synonym) = &term.synonym {
            let _ = writeln!(text, "synonym: \"{synonym}\" EXACT []");
        }
        if let Some(parent) = &term.parent {
            let parent_name = earlier
                .iter()
                .find(|t| &t.id == parent)
                .map_or("", |t| t.name.as_str());
            let _ = writeln!(text, "is_a: {parent} ! {parent_name}");
        }
        if term.obsolete {
            text.push_str("is_obsolete: true\n");
        }
        text.push('\n');
    }
}

/// Append one malformed stanza after the well-formed terms.
fn write_malformed(text: &mut String, malformation: MalformationType, index: usize) {
    let id = format!("SIM:{index:07}");
    match malformation {
        MalformationType::BadBoolean => {
            let _ = write!(text, "[Term]\nid: {id}\nname: malformed {index}\nis_obsolete: maybe\n");
        }
        MalformationType::MissingId => {
            let _ = write!(text, "[Term]\nname: malformed {index}\n");
        }
        MalformationType::DuplicateId => {
            text.push_str("[Term]\nid: SIM:0000001\nname: duplicate\n");
        }
        MalformationType::UnknownTag => {
            let _ = write!(text, "[Term]\nid: {id}\nname: malformed {index}\nfrobnicate: yes\n");
        }
        MalformationType::UnbalancedModifier => {
            let _ = write!(text, "[Term]\nid: {id}\nname: malformed {index}\ncomment: dangling }}\n");
        }
        MalformationType::UnknownStanza => {
            let _ = write!(text, "[Frobnicate]\nid: frob{index}\n");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_deterministic() {
        let mut gen1 = DocumentGenerator::new(12345);
        let mut gen2 = DocumentGenerator::new(12345);

        for _ in 0..20 {
            let doc1 = gen1.next_document();
            let doc2 = gen2.next_document();
            assert_eq!(doc1.text, doc2.text);
            assert_eq!(doc1.terms, doc2.terms);
        }
    }

    #[test]
    fn test_generated_ids_ascend() {
        let mut generator = DocumentGenerator::new(7);
        let doc = generator.generate_document(None);

        assert!(!doc.terms.is_empty());
        assert!(doc.terms.windows(2).all(|pair| pair[0].id < pair[1].id));
        assert!(doc.text.starts_with("format-version: 1.2\n"));
    }

    #[test]
    fn test_parents_precede_children() {
        let mut generator = DocumentGenerator::new(99);
        for _ in 0..10 {
            let doc = generator.generate_document(None);
            for (index, term) in doc.terms.iter().enumerate() {
                if let Some(parent) = &term.parent {
                    assert!(doc.terms[..index].iter().any(|t| &t.id == parent));
                }
            }
        }
    }

    #[test]
    fn test_every_malformation_is_written() {
        let mut generator = DocumentGenerator::new(1);
        for malformation in MalformationType::ALL {
            let doc = generator.generate_document(Some(malformation));
            assert_eq!(doc.malformation, Some(malformation));
        }
        let mut generator = DocumentGenerator::with_config(
            1,
            DocumentGenConfig {
                malformed_rate: 1.0,
                ..DocumentGenConfig::default()
            },
        );
        assert!(generator.next_document().malformation.is_some());
    }
}
