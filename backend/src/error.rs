//! Error types for the listings store and the grid engine.
//!
//! Every failure surfaced by the library is a [`GuideError`]. The variants map
//! one-to-one onto the conditions callers are expected to react to:
//!
//! - [`GuideError::InvalidArgument`]: bad grid parameters, never retried
//! - [`GuideError::NotReady`]: no snapshot has been installed yet
//! - [`GuideError::SourceUnavailable`]: the feed could not be read or parsed
//! - [`GuideError::InvalidFormat`]: a malformed timestamp inside the feed
//! - [`GuideError::Configuration`]: process configuration problems

/// Result type for guide operations
pub type GuideResult<T> = Result<T, GuideError>;

/// Error type for guide operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuideError {
    /// Caller-supplied grid parameters were rejected.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// No successful refresh has completed yet.
    #[error("Listings not ready: no feed snapshot has been loaded")]
    NotReady,

    /// The feed source could not be read or parsed.
    #[error("Source unavailable: {message} [source={source_name}]")]
    SourceUnavailable {
        source_name: String,
        message: String,
    },

    /// A feed value did not match the expected format.
    #[error("Invalid format: '{value}' does not match {expected}")]
    InvalidFormat { value: String, expected: String },

    /// Configuration file or environment problem.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl GuideError {
    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a source-unavailable error for the named source.
    pub fn source_unavailable(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-format error for a rejected value.
    pub fn invalid_format(value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidFormat {
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the same call may succeed later without the caller changing anything.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady | Self::SourceUnavailable { .. })
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "INVALID_ARGUMENT",
            Self::NotReady => "NOT_READY",
            Self::SourceUnavailable { .. } => "SOURCE_UNAVAILABLE",
            Self::InvalidFormat { .. } => "INVALID_FORMAT",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
        }
    }
}
