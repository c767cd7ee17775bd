//! Deterministic simulation testing of the loader and the stream reader.
//!
//! This module exercises the crate with:
//! - Reproducible, randomly generated OBO documents
//! - Deliberately malformed stanzas with a known expected diagnostic
//! - An in-memory access method with injected fetch failures
//! - Invariant checking after every load and stream
//!
//! # Design Principles
//!
//! 1. All randomness is seeded for reproducibility
//! 2. Every generated document records what a correct load must contain
//! 3. Faults are injected only at the access-method boundary
//! 4. Given the same seed, execution is identical
//!
//! # Usage
//!
//! ```ignore
//! use simulation::access::FaultConfig;
//! use simulation::simulator::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345) // seed
//!     .with_fault_config(FaultConfig::low_faults())
//!     .with_malformed_rate(0.1);
//!
//! let mut sim = Simulator::new(config);
//! let result = sim.run(100); // Run 100 documents
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod access;
mod document_gen;
mod invariants;
mod simulator;
