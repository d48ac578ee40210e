//! Error taxonomy for core document operations

/// Failure of a core operation
///
/// The current document is never changed when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Import payload is unparseable or has no recognizable shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// A template (or other looked-up entity) does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A command was rejected, e.g. a reorder that is not a permutation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
