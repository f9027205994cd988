//! Resource limits and output retention.

use serde::Deserialize;

/// Resource limits.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    /// Channels that may exist at once; 0 means unlimited.
    #[serde(default)]
    pub max_channels: usize,
}

/// Output stream retention.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Batches kept in the output stream; older ones are deleted as new
    /// ones arrive (default: 10000).
    #[serde(default = "default_retained_batches")]
    pub retained_batches: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            retained_batches: default_retained_batches(),
        }
    }
}

fn default_retained_batches() -> usize {
    10_000
}
