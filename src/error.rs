//! Error types for the fallible boundaries of the crate.
//!
//! Field validation never fails; it returns closed result enums instead
//! (see [`crate::validate`], [`crate::expiry`], [`crate::cvc`]). Errors here
//! come from the BIN lookup collaborators and from loading configuration.

use std::path::PathBuf;

/// Errors raised while performing a BIN lookup.
///
/// The repository never surfaces these to the shopper: a failed lookup
/// falls back to local detection.
#[derive(Debug, thiserror::Error)]
pub enum BinLookupError {
    /// The request or response JSON is malformed.
    #[error("BIN lookup serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The lookup service could not be reached or answered with an error.
    #[error("BIN lookup network error: {0}")]
    Network(String),

    /// The BIN could not be encrypted.
    #[error("BIN encryption failed: {0}")]
    Encryption(String),
}

/// Errors raised while loading a [`crate::config::CheckoutConfiguration`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the configuration schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
