use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::any::Any;

pub const KEY_NOT_FOUND: &str = "Key not found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const ROUTE_NOT_FOUND: &str = "Not found";
pub const CONFIGURATION_UNAVAILABLE: &str = "Configuration unavailable";

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Every handler returns this type on failure, so the mapping to status
/// codes and bodies lives in one place. Internal errors are logged in full
/// here and replaced by a fixed message before they reach the client.
#[derive(Debug)]
pub enum ApiError {
    /// Requested key is absent from the configuration mapping
    KeyNotFound(String),
    /// Anything unexpected, e.g. an I/O failure while reading the file
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::KeyNotFound(key) => {
                tracing::debug!("Responding 404 for key: {}", key);
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(KEY_NOT_FOUND))).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!("Unhandled error: {:?}", err);
                internal_error_response()
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

/// The one 500 response the service ever sends
pub fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(INTERNAL_SERVER_ERROR)),
    )
        .into_response()
}

/// Responder for `CatchPanicLayer`: log the payload, hide it from the client
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };

    tracing::error!("Unhandled panic: {}", detail);
    internal_error_response()
}

/// Fallback for paths no route matches
pub async fn not_found_fallback() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(ROUTE_NOT_FOUND)))
}
