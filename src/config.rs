//! Configuration for dominator tree construction
//!
//! Controls how much checking [`DominatorTree::with_config`](crate::graph::algorithms::DominatorTree::with_config)
//! performs around the Lengauer-Tarjan computation itself.

/// Configuration for dominator tree construction
///
/// The computation itself never fails on a well-formed graph. These settings
/// add input checks before it runs and a consistency check after it ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DominatorConfig {
    /// Reject empty root lists and roots that are not blocks of the graph (recommended: always true)
    /// Without it, invalid roots are skipped with a warning
    pub enable_structural_validation: bool,

    /// Run [`DominatorTree::verify`](crate::graph::algorithms::DominatorTree::verify) on the result
    /// Roughly doubles construction cost; useful in tests and when fuzzing code generators
    pub enable_result_validation: bool,

    /// Maximum number of reachable blocks (0 = unlimited)
    pub max_block_count: usize,
}

impl Default for DominatorConfig {
    fn default() -> Self {
        Self {
            enable_structural_validation: true,
            enable_result_validation: false,
            max_block_count: 0,
        }
    }
}

impl DominatorConfig {
    /// Creates a configuration without any checks
    ///
    /// **Warning**: An empty root list then produces an empty tree instead of an error.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable_structural_validation: false,
            enable_result_validation: false,
            max_block_count: 0,
        }
    }

    /// Creates a configuration with input and result checks enabled
    #[must_use]
    pub fn strict() -> Self {
        Self {
            enable_structural_validation: true,
            enable_result_validation: true,
            max_block_count: 0,
        }
    }

    /// Returns this configuration with a limit on the number of reachable blocks
    #[must_use]
    pub fn with_max_block_count(mut self, max_block_count: usize) -> Self {
        self.max_block_count = max_block_count;
        self
    }
}
