//! Enrichment error types.

use thiserror::Error;

/// Errors that can occur while talking to upstream services or driving
/// the enrichment pipeline.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// An HTTP request to an upstream service failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// A response from an upstream service could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// An upstream credential exchange was rejected.
    #[error("authentication with {source_name} failed: {message}")]
    Auth {
        source_name: String,
        message: String,
    },

    /// Required credentials were not configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    /// The album exceeds the enrichment ceiling; nothing was attempted.
    #[error("album has {count} tracks, more than the {limit}-track ceiling")]
    TooManyTracks { count: usize, limit: usize },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// An error propagated from the core domain layer.
    #[error("core error: {0}")]
    Core(#[from] sleevenotes_core::Error),

    /// An error writing the result artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EnrichError {
    /// Returns `true` when the request was rejected before any upstream
    /// call was made (input validation rather than upstream trouble).
    pub fn is_input_validation(&self) -> bool {
        matches!(
            self,
            Self::TooManyTracks { .. } | Self::MissingCredentials(_)
        )
    }
}

/// Convenience alias for enrichment results.
pub type EnrichResult<T> = std::result::Result<T, EnrichError>;
