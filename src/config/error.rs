//! Configuration error types.

use thiserror::Error;

/// Errors raised while resolving the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("invalid configuration for {key}: '{value}' ({reason})")]
    InvalidValue {
        /// Option name.
        key: String,
        /// Offending value (redacted for secrets).
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {key} ({hint})")]
    MissingRequired {
        /// Option name.
        key: String,
        /// How to supply it.
        hint: String,
    },

    /// The OS secure random source is unavailable. This is a hard startup
    /// failure; there is no fallback entropy source.
    #[error("secure random source unavailable: {reason}")]
    EntropyUnavailable {
        /// Failure detail from the RNG.
        reason: String,
    },
}
