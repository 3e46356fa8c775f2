//! Normalizer errors
//!
//! Only caller-side lifecycle bugs are errors. Browser quirks degrade to
//! "no action" and never surface here.

/// Result type for normalizer operations
pub type NormalizerResult<T> = Result<T, NormalizerError>;

/// Normalizer errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizerError {
    #[error("Normalizer used after destroy()")]
    Destroyed,

    #[error("Node is outside the editable root: {0}")]
    OutsideRoot(String),
}
