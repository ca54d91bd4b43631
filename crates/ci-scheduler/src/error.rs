use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("unknown job: {0}")]
    UnknownJob(String),
}

pub type SchedulerResult<T> = Result<T, SchedulerError>;

impl From<SchedulerError> for ci_types::CoreError {
    fn from(err: SchedulerError) -> Self {
        match err {
            SchedulerError::UnknownJob(name) => ci_types::CoreError::NotFound(name),
        }
    }
}
