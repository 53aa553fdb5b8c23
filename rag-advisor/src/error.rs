//! Typed errors for the retrieval pipeline.

use thiserror::Error;

/// Failure of one pipeline step. Propagated unchanged up to [`AdvisoryService`],
/// which is the only place it is turned into an [`AdvisoryFailure`].
///
/// [`AdvisoryService`]: crate::AdvisoryService
#[derive(Debug, Error)]
pub enum RagError {
    /// Bad chunking/retrieval parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The embedding model could not be invoked or returned unusable output.
    #[error("embedding unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// An index was built from zero vectors.
    #[error("cannot build an index from empty input")]
    EmptyInput,

    /// Vectors in one index (or a query) differ in length.
    #[error("vector dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Vector and payload sequences differ in length.
    #[error("got {vectors} vectors for {payloads} payloads")]
    LengthMismatch { vectors: usize, payloads: usize },

    /// Chunking produced nothing to index (e.g. empty document).
    #[error("no chunks produced from document")]
    NoChunksProduced,

    /// Prompt template lacks a required placeholder.
    #[error("prompt template is missing placeholder {{{0}}}")]
    MissingPlaceholder(&'static str),

    /// Farmer data could not be serialized to text.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The completion provider failed.
    #[error("completion failed: {0}")]
    Completion(String),
}

/// Result alias for pipeline steps.
pub type Result<T> = std::result::Result<T, RagError>;

/// Uniform failure surfaced to callers of [`AdvisoryService::get_advisory`].
///
/// Carries only the underlying cause's message; error kinds are not exposed.
///
/// [`AdvisoryService::get_advisory`]: crate::AdvisoryService::get_advisory
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AdvisoryFailure {
    message: String,
}

impl AdvisoryFailure {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<RagError> for AdvisoryFailure {
    fn from(err: RagError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_cause_message() {
        let failure = AdvisoryFailure::from(RagError::DimensionMismatch {
            expected: 384,
            got: 768,
        });
        assert_eq!(
            failure.message(),
            "vector dimension mismatch: expected 384, got 768"
        );
        assert_eq!(failure.to_string(), failure.message());
    }

    #[test]
    fn placeholder_message_shows_braces() {
        assert_eq!(
            RagError::MissingPlaceholder("context").to_string(),
            "prompt template is missing placeholder {context}"
        );
    }
}
