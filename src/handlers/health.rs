use crate::error::{HealthResponse, UnhealthyResponse, CONFIGURATION_UNAVAILABLE};
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /health handler - Health check endpoint
///
/// Reads and parses the configuration file without the empty-mapping
/// fallback. Returns 200 OK if it yields a JSON object, 503 Service
/// Unavailable otherwise. The failure reason is only logged.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = UnhealthyResponse)
    ),
    tag = "health"
)]
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<HealthResponse>), (StatusCode, Json<UnhealthyResponse>)> {
    match state.loader.read_mapping().await {
        Ok(_) => {
            tracing::debug!("Health check passed");
            Ok((
                StatusCode::OK,
                Json(HealthResponse {
                    status: "healthy".to_string(),
                }),
            ))
        }
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnhealthyResponse {
                    status: "unhealthy".to_string(),
                    error: CONFIGURATION_UNAVAILABLE.to_string(),
                }),
            ))
        }
    }
}
