pub mod auth;
pub mod chat;
pub mod events;
pub mod home;
pub mod ledger;
pub mod media;
pub mod notes;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use grange_core::GrangeError;
use serde::Serialize;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Convert anyhow errors to HTTP responses, mapping the core's
/// not-found / invalid-input / unauthorized variants onto their status
/// codes and everything else onto 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self.0.downcast_ref::<GrangeError>() {
            Some(GrangeError::NotFound(_)) => StatusCode::NOT_FOUND,
            Some(GrangeError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Some(GrangeError::Unauthorized) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
