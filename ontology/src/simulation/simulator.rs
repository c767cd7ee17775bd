//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties together the document generator, the faulty access
//! method and the invariant checker: every generated document is loaded
//! twice, streamed with and without injected faults, and finally all
//! documents are streamed again through one query list.

use crate::store::{Ontology, ValidationToggles};
use crate::stream::{AccessMethod, MemoryAccess, StreamError, TermReader};
use crate::types::Term;

use super::access::{FaultConfig, FaultyAccess};
use super::document_gen::{DocumentGenConfig, DocumentGenerator};
use super::invariants::{InvariantChecker, InvariantViolation};

/// Name of the list file naming every generated document.
const BATCH_LIST: &str = "batch.txt";

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Fault injection configuration.
    pub fault_config: FaultConfig,
    /// Document generation configuration.
    pub document_config: DocumentGenConfig,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            fault_config: FaultConfig::default(),
            document_config: DocumentGenConfig::default(),
        }
    }

    /// Set the fault configuration.
    #[must_use]
    pub const fn with_fault_config(mut self, config: FaultConfig) -> Self {
        self.fault_config = config;
        self
    }

    /// Set the document configuration.
    #[must_use]
    pub const fn with_document_config(mut self, config: DocumentGenConfig) -> Self {
        self.document_config = config;
        self
    }

    /// Set the malformed document rate.
    #[must_use]
    pub const fn with_malformed_rate(mut self, rate: f64) -> Self {
        self.document_config.malformed_rate = rate;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of documents generated and checked.
    pub documents_processed: u64,
    /// Number of loads and streams that completed.
    pub successful_operations: u64,
    /// Number of streams abandoned because of an injected fault.
    pub failed_operations: u64,
    /// Terms indexed across every first load.
    pub terms_loaded: u64,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: DocumentGenerator,
    checker: InvariantChecker,
    /// Every generated document, for the final list stream.
    batch: MemoryAccess,
    /// Ids each document streamed without faults, in document order.
    reference_ids: Vec<String>,
    documents_processed: u64,
    successful_operations: u64,
    failed_operations: u64,
    terms_loaded: u64,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = DocumentGenerator::with_config(config.seed, config.document_config.clone());
        Self {
            config,
            generator,
            checker: InvariantChecker::new(),
            batch: MemoryAccess::new(),
            reference_ids: Vec::new(),
            documents_processed: 0,
            successful_operations: 0,
            failed_operations: 0,
            terms_loaded: 0,
        }
    }

    /// Run the simulation for a given number of documents.
    pub fn run(&mut self, document_count: usize) -> SimulationResult {
        let mut list = String::new();
        for index in 0..document_count {
            let name = format!("doc{index}.obo");
            self.run_document(index, &name);
            list.push_str(&name);
            list.push('\n');
        }
        self.batch.insert(BATCH_LIST, &list);
        self.run_batch(document_count);

        SimulationResult {
            seed: self.config.seed,
            documents_processed: self.documents_processed,
            successful_operations: self.successful_operations,
            failed_operations: self.failed_operations,
            terms_loaded: self.terms_loaded,
            invariant_violations: self.checker.violations().to_vec(),
        }
    }

    fn run_document(&mut self, index: usize, name: &str) {
        let doc = self.generator.next_document();
        self.documents_processed += 1;

        let first = Ontology::parse_str(name, &doc.text, ValidationToggles::default());
        let second = Ontology::parse_str(name, &doc.text, ValidationToggles::default());
        self.successful_operations += 2;
        self.terms_loaded += first.term_count() as u64;

        self.checker.check_diagnostics(&doc, &first, index);
        self.checker.check_terms(&doc, &first, index);
        self.checker.check_alt_ids(&doc, &first, index);
        self.checker.check_name_keys(&doc, &first, index);
        self.checker.check_idempotent(&first, &second, index);
        if let Some(expected) = doc.terms.get(index % doc.terms.len().max(1)) {
            self.checker.check_round_trip(&first, expected, index);
        }

        let access = MemoryAccess::new().with(name, &doc.text);
        let reference = match stream(name, Box::new(access)) {
            Ok(ids) => ids,
            Err(e) => {
                self.checker
                    .unexpected("Stream without faults failed", e.to_string(), index);
                return;
            }
        };
        self.successful_operations += 1;
        self.checker.check_stream(&doc, &reference, index);

        if self.config.fault_config.fetch_error_rate > 0.0 {
            let access = FaultyAccess::new(
                MemoryAccess::new().with(name, &doc.text),
                self.config.seed ^ index as u64,
                self.config.fault_config.clone(),
            );
            match stream(name, Box::new(access)) {
                Ok(ids) => {
                    self.successful_operations += 1;
                    self.checker
                        .check_same_ids("Faulty stream returned different ids", &ids, &reference, index);
                }
                Err(StreamError::Open { .. }) => self.failed_operations += 1,
                Err(e) => self
                    .checker
                    .unexpected("Injected fault surfaced wrongly", e.to_string(), index),
            }
        }

        self.batch.insert(name, &doc.text);
        self.reference_ids.extend(reference);
    }

    /// Stream every document through one query list.
    fn run_batch(&mut self, index: usize) {
        if self.documents_processed == 0 {
            return;
        }
        let query = format!("@{BATCH_LIST}");
        match stream(&query, Box::new(self.batch.clone())) {
            Ok(ids) => {
                self.successful_operations += 1;
                self.checker.check_same_ids(
                    "List stream differs from per-document streams",
                    &ids,
                    &self.reference_ids,
                    index,
                );
            }
            Err(e) => self
                .checker
                .unexpected("List stream failed", e.to_string(), index),
        }
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}

fn stream(query: &str, access: Box<dyn AccessMethod>) -> Result<Vec<String>, StreamError> {
    let mut reader = TermReader::open(query, access)?;
    let mut term = Term::new();
    let mut ids = Vec::new();
    while reader.read_next(&mut term)? {
        ids.push(term.id.clone());
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_basic() {
        let config = SimulatorConfig::new(12345);
        let mut simulator = Simulator::new(config);

        let result = simulator.run(50);

        assert_eq!(result.documents_processed, 50);
        assert!(result.terms_loaded >= 50);
        assert_eq!(result.failed_operations, 0);
        assert!(result.passed(), "Simulation should pass: {:?}", result.invariant_violations);
    }

    #[test]
    fn test_simulator_with_malformed_documents() {
        let config = SimulatorConfig::new(12345).with_malformed_rate(0.5);
        let mut simulator = Simulator::new(config);

        let result = simulator.run(60);

        assert!(result.passed(), "Simulation should pass: {:?}", result.invariant_violations);
    }

    #[test]
    fn test_simulator_with_faults() {
        let config = SimulatorConfig::new(777).with_fault_config(FaultConfig::high_faults());
        let mut simulator = Simulator::new(config);

        let result = simulator.run(80);

        assert!(result.failed_operations > 0);
        assert!(result.passed(), "Simulation should pass: {:?}", result.invariant_violations);
    }

    #[test]
    fn test_simulator_deterministic() {
        // Same seed should produce same results
        let mut sim1 = Simulator::new(SimulatorConfig::new(12345).with_malformed_rate(0.3));
        let result1 = sim1.run(30);

        let mut sim2 = Simulator::new(SimulatorConfig::new(12345).with_malformed_rate(0.3));
        let result2 = sim2.run(30);

        assert_eq!(result1.terms_loaded, result2.terms_loaded);
        assert_eq!(result1.successful_operations, result2.successful_operations);
        assert_eq!(result1.failed_operations, result2.failed_operations);
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let config = SimulatorConfig::new(99999)
            .with_malformed_rate(0.1)
            .with_fault_config(FaultConfig::low_faults())
            .with_document_config(DocumentGenConfig {
                max_terms: 200,
                malformed_rate: 0.1,
                ..DocumentGenConfig::default()
            });
        let mut simulator = Simulator::new(config);

        let result = simulator.run(2_000);

        assert!(result.passed());
        assert!(!simulator.checker().has_violations());
    }
}
