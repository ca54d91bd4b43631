use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Success,
    Partial,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobError {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub context: String,
}

/// Append-only record of one job execution, written unconditionally
/// (spec.md §4.4) regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHistory {
    pub job_id: String,
    pub job_name: String,
    pub status: JobStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: i64,
    pub records_processed: u64,
    pub errors: Vec<JobError>,
}
