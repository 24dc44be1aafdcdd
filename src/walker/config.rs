//! Configuration types for the size walker

use clap::ValueEnum;

/// What to do when the reparse query fails for a discovered subdirectory.
///
/// The root itself is not governed by this policy: a failed query on the
/// root is always reported to the caller as an error for that path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum QueryFailurePolicy {
    /// Warn and do not enter the subdirectory
    #[default]
    Skip,
    /// Treat the subdirectory as an ordinary directory
    Descend,
    /// Give up on the whole root
    Abort,
}

/// Configuration for directory sizing.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Descend into subdirectories (otherwise only the root's own files count)
    pub recurse: bool,
    pub on_query_failure: QueryFailurePolicy,
    /// Number of roots sized concurrently.
    /// 0 = auto-detect (use all available cores)
    /// 1 = sequential (no parallelism)
    /// N = use N worker threads
    pub parallel_workers: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            recurse: false,
            on_query_failure: QueryFailurePolicy::Skip,
            parallel_workers: 0,
        }
    }
}

impl WalkerConfig {
    pub fn recursive() -> Self {
        Self {
            recurse: true,
            ..Default::default()
        }
    }
}
