//! Simulated access method with fault injection.
//!
//! Wraps [`MemoryAccess`] and fails fetches at a configurable rate, the
//! way an unreachable file or remote database would.

use std::io;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::stream::{AccessMethod, LineSource, MemoryAccess};

/// Configuration for fault injection.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Probability that a fetch fails (0.0 - 1.0).
    pub fetch_error_rate: f64,
}

impl FaultConfig {
    /// Create a fault config with no faults (for baseline testing).
    #[must_use]
    pub fn no_faults() -> Self {
        Self::default()
    }

    /// Create a fault config with low fault rates (for stress testing).
    #[must_use]
    pub const fn low_faults() -> Self {
        Self {
            fetch_error_rate: 0.01,
        }
    }

    /// Create a fault config with high fault rates (for extreme testing).
    #[must_use]
    pub const fn high_faults() -> Self {
        Self {
            fetch_error_rate: 0.25,
        }
    }
}

/// In-memory access method that fails on demand.
pub struct FaultyAccess {
    inner: MemoryAccess,
    fault_config: FaultConfig,
    rng: StdRng,
    /// Number of fetches that were failed on purpose.
    injected: usize,
}

impl FaultyAccess {
    #[must_use]
    pub fn new(inner: MemoryAccess, seed: u64, fault_config: FaultConfig) -> Self {
        Self {
            inner,
            fault_config,
            rng: StdRng::seed_from_u64(seed),
            injected: 0,
        }
    }

    /// Number of injected fetch failures so far.
    #[must_use]
    pub const fn injected(&self) -> usize {
        self.injected
    }

    fn should_fail(&mut self) -> bool {
        self.fault_config.fetch_error_rate > 0.0
            && self.rng.random::<f64>() < self.fault_config.fetch_error_rate
    }
}

impl AccessMethod for FaultyAccess {
    fn name(&self) -> &str {
        "faulty-memory"
    }

    fn single_record(&self) -> bool {
        self.inner.single_record()
    }

    fn fetch(&mut self, target: &str) -> io::Result<Option<Box<dyn LineSource>>> {
        if self.should_fail() {
            self.injected += 1;
            return Err(io::Error::other(format!("injected fetch failure for '{target}'")));
        }
        self.inner.fetch(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_faults_passes_through() {
        let inner = MemoryAccess::new().with("a.obo", "[Term]\nid: A:1\n");
        let mut access = FaultyAccess::new(inner, 1, FaultConfig::no_faults());

        for _ in 0..50 {
            assert!(access.fetch("a.obo").expect("fetch").is_some());
        }
        assert_eq!(access.injected(), 0);
    }

    #[test]
    fn test_always_failing() {
        let inner = MemoryAccess::new().with("a.obo", "[Term]\nid: A:1\n");
        let mut access = FaultyAccess::new(inner, 1, FaultConfig { fetch_error_rate: 1.0 });

        let err = access.fetch("a.obo").err().expect("injected failure");
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(access.injected(), 1);
    }

    #[test]
    fn test_faults_deterministic() {
        let run = |seed| {
            let inner = MemoryAccess::new().with("a.obo", "");
            let mut access = FaultyAccess::new(inner, seed, FaultConfig::high_faults());
            (0..100).map(|_| access.fetch("a.obo").is_err()).collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
