//! Output configuration types

/// Configuration for output formatting.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
    /// Add a human-readable size column (1.5K, 3.0G, ...)
    pub human_sizes: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            human_sizes: true,
        }
    }
}
