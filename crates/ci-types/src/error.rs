use thiserror::Error;

/// Errors shared by the non-HTTP crates (`ci-query`, `ci-scoring`,
/// `ci-enrichment`, `ci-reports`, `ci-scheduler`). `ci-api` maps these onto
/// HTTP status codes at the edge; nothing below that layer knows about
/// status codes.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("entity not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("upstream provider error ({source}): {message}")]
    Upstream { source: String, message: String },

    #[error("operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
