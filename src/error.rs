use thiserror::Error;

/// Unified error type for the generation core.
///
/// The taxonomy follows the failure domains of the pipeline: external
/// generation providers, local cache I/O, artifact storage, and record
/// persistence. Cache failures are recovered close to where they happen and
/// rarely reach callers; provider and persistence failures do.
#[derive(Debug, Error)]
pub enum Error {
    /// External generation call failed (transport, quota, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        /// True when the provider did not answer within its deadline, as
        /// opposed to answering with an error.
        timeout: bool,
    },

    /// Local disk or index I/O failure inside the content cache.
    #[error("cache I/O error: {0}")]
    CacheIo(String),

    /// Object-store upload failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Database write failure. Fatal to the job that triggered it.
    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a provider error.
    pub fn provider(msg: impl Into<String>) -> Self {
        Error::Provider {
            message: msg.into(),
            timeout: false,
        }
    }

    /// Create a provider error for a call that exceeded its deadline.
    pub fn provider_timeout(msg: impl Into<String>) -> Self {
        Error::Provider {
            message: msg.into(),
            timeout: true,
        }
    }

    /// Create a cache I/O error.
    pub fn cache_io(msg: impl Into<String>) -> Self {
        Error::CacheIo(msg.into())
    }

    /// Create a storage error.
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create a persistence error.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Error::Persistence(msg.into())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    /// Whether this error came from an external provider call.
    pub fn is_provider(&self) -> bool {
        matches!(self, Error::Provider { .. })
    }

    /// Whether this error was a provider deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Provider { timeout: true, .. })
    }
}
