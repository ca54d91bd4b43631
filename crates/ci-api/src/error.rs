//! HTTP-layer error type (spec.md §7). Every non-adapter error that
//! reaches here gets one `{success:false, error}` envelope and an HTTP
//! status; adapter/provider failures never arrive as `ApiError` at all —
//! they are recovered inside `ci-enrichment` and surface in a response's
//! own `errors` field instead (spec.md §7 "Propagation policy").

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::envelope::{Envelope, Meta};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream provider error ({source}): {message}")]
    Upstream { source: String, message: String },

    #[error("operation timed out")]
    Timeout,

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found<S: Into<String>>(id: S) -> Self {
        Self::NotFound(id.into())
    }

    fn from_core(err: ci_types::CoreError) -> Self {
        match err {
            ci_types::CoreError::NotFound(id) => Self::NotFound(id),
            ci_types::CoreError::Validation(message) => Self::Validation(message),
            ci_types::CoreError::Store(message) => Self::Internal(message),
            ci_types::CoreError::Upstream { source, message } => Self::Upstream { source, message },
            ci_types::CoreError::Timeout(_) => Self::Timeout,
            ci_types::CoreError::Internal(message) => Self::Internal(message),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Timeout => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        match status {
            StatusCode::INTERNAL_SERVER_ERROR | StatusCode::BAD_GATEWAY | StatusCode::GATEWAY_TIMEOUT => {
                tracing::error!(status = status.as_u16(), error = %message, "request failed");
            }
            _ => tracing::warn!(status = status.as_u16(), error = %message, "request rejected"),
        }

        let body = Json(Envelope::<()> {
            success: false,
            data: None,
            error: Some(message),
            meta: Some(Meta {
                timestamp: chrono::Utc::now(),
                processing_time_ms: 0,
                cached: None,
            }),
        });

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ci_types::CoreError> for ApiError {
    fn from(err: ci_types::CoreError) -> Self {
        Self::from_core(err)
    }
}

impl From<ci_query::QueryError> for ApiError {
    fn from(err: ci_query::QueryError) -> Self {
        Self::from_core(err.into())
    }
}

impl From<ci_scoring::ScoringError> for ApiError {
    fn from(err: ci_scoring::ScoringError) -> Self {
        Self::from_core(err.into())
    }
}

impl From<ci_reports::ReportError> for ApiError {
    fn from(err: ci_reports::ReportError) -> Self {
        Self::from_core(err.into())
    }
}

impl From<ci_enrichment::EnrichmentError> for ApiError {
    fn from(err: ci_enrichment::EnrichmentError) -> Self {
        Self::from_core(err.into())
    }
}
