//! Error types for TAP Core
//!
//! Pipeline failures are [`FailedOperation`](tap_model::FailedOperation)
//! values. The errors here cover adapter setup only:
//! - Configuration file access
//! - Configuration parsing

use std::path::PathBuf;

/// Adapter configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file couldn't be read
    #[error("cannot read configuration file {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text is not valid
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
