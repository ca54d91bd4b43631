use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Store(#[from] ci_query::QueryError),

    #[error(transparent)]
    Scoring(#[from] ci_scoring::ScoringError),
}

pub type ReportResult<T> = Result<T, ReportError>;

impl From<ReportError> for ci_types::CoreError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::Store(e) => ci_types::CoreError::Store(e.to_string()),
            ReportError::Scoring(e) => e.into(),
        }
    }
}
