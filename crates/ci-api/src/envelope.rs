//! The one response shape every route returns (spec.md §6: "every
//! response has `{success, data?, error?, meta?}`"). Handlers build an
//! [`Envelope`] directly; [`crate::error::ApiError`] builds the failure
//! half of the same shape so a caller never has to branch on which one
//! arrived before reading `success`.

use std::time::Instant;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

impl Meta {
    pub fn since(start: Instant) -> Self {
        Self {
            timestamp: Utc::now(),
            processing_time_ms: start.elapsed().as_millis() as u64,
            cached: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Wraps `data` as a `200 OK` success envelope, with `processing_time_ms`
/// measured from `start`.
pub fn ok<T: Serialize>(data: T, start: Instant) -> Response {
    (
        StatusCode::OK,
        Json(Envelope {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(Meta::since(start)),
        }),
    )
        .into_response()
}
