use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error(transparent)]
    Store(#[from] ci_query::QueryError),

    #[error("entity not found: {0}")]
    NotFound(String),
}

pub type ScoringResult<T> = Result<T, ScoringError>;

impl From<ScoringError> for ci_types::CoreError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Store(e) => ci_types::CoreError::Store(e.to_string()),
            ScoringError::NotFound(id) => ci_types::CoreError::NotFound(id),
        }
    }
}
