use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("failed to decode stored row: {0}")]
    Decode(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl From<sqlx::Error> for QueryError {
    fn from(err: sqlx::Error) -> Self {
        QueryError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Decode(err.to_string())
    }
}

impl From<QueryError> for ci_types::CoreError {
    fn from(err: QueryError) -> Self {
        ci_types::CoreError::Store(err.to_string())
    }
}
