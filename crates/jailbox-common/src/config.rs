//! Per-run configuration threaded through every component.
//!
//! There is deliberately no process-wide jail path: each run carries its own
//! configuration so parallel runs (and parallel tests) can use distinct
//! jail roots.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::Platform;

/// Policy applied when some layers failed to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PullPolicy {
    /// Abort before launch if any layer failed.
    Strict,
    /// Launch with whatever layers succeeded, after logging the tally.
    Lenient,
}

/// Configuration for a single `run` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory that becomes the child's filesystem root.
    pub jail_root: PathBuf,
    /// Platform used to select a manifest from a multi-arch index.
    pub platform: Platform,
    /// Ceiling on simultaneous in-flight layer downloads.
    pub concurrency: usize,
    /// Behavior on partial image fetch.
    pub policy: PullPolicy,
    /// Whether to place the child in a fresh PID namespace.
    pub new_pid_namespace: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            jail_root: PathBuf::from(crate::constants::DEFAULT_JAIL_DIR),
            platform: Platform::default(),
            concurrency: crate::constants::DEFAULT_CONCURRENCY,
            policy: PullPolicy::Lenient,
            new_pid_namespace: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_lenient_with_pid_namespace() {
        let config = RunConfig::default();
        assert_eq!(config.policy, PullPolicy::Lenient);
        assert!(config.new_pid_namespace);
        assert_eq!(config.concurrency, crate::constants::DEFAULT_CONCURRENCY);
        assert_eq!(config.jail_root, PathBuf::from("jail"));
    }
}
