use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Workload sizes for the stress scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    /// Loop count per client in the paired and structural scenarios.
    pub iterations: usize,
    /// Loop count per client in the cyclic-lock-order scenario.
    pub cyclic_iterations: usize,
    /// Copies every entry starts with.
    pub stock: i64,
    /// Snapshots the observing thread takes.
    pub reads: usize,
    /// How long a client may run before it is presumed stuck.
    pub timeout: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            cyclic_iterations: 5000,
            stock: 2500,
            reads: 1000,
            timeout: Duration::from_secs(60),
        }
    }
}

impl StressConfig {
    /// Same shape, every loop count replaced by `iterations`.
    pub fn with_iterations(iterations: usize) -> Self {
        Self {
            iterations,
            cyclic_iterations: iterations,
            reads: iterations.saturating_mul(2),
            ..Self::default()
        }
    }
}
