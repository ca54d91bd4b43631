use thiserror::Error;

/// Provider/adapter failures never reach this type — they are recovered
/// locally into an `AdapterOutcome` with `success=false` (spec.md §7).
/// `EnrichmentError` only covers request-level problems the orchestrator
/// itself cannot recover from.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("invalid input: {0}")]
    Validation(String),
}

pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

impl From<EnrichmentError> for ci_types::CoreError {
    fn from(err: EnrichmentError) -> Self {
        match err {
            EnrichmentError::Validation(message) => ci_types::CoreError::Validation(message),
        }
    }
}
