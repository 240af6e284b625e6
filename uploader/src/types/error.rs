//! Configuration errors

use thiserror::Error;

/// Errors raised while reading process configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    /// An environment variable holds a value that cannot be used
    #[error("Invalid value for {name}: {value}")]
    InvalidVar {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}
