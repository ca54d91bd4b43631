//! JSON body extraction that reports malformed payloads through the same
//! `{success:false, error}` envelope as every other failure, instead of
//! axum's default `422`/plain-text rejection body (grounded on the
//! teacher's `handle_json_rejection`, adapted to this service's envelope).

use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::ApiError;

pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    Json<T>: FromRequest<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::validation("malformed or missing JSON request body"))?;
        Ok(Self(value))
    }
}
