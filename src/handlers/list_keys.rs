use crate::error::{ApiError, ErrorResponse};
use crate::models::ListKeysResponse;
use crate::routes;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};

/// GET /list_keys handler - List every top-level key, in file order
#[utoipa::path(
    get,
    path = routes::LIST_KEYS,
    responses(
        (status = 200, description = "Keys in the configuration file", body = ListKeysResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "keys"
)]
pub async fn list_keys_handler(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ListKeysResponse>), ApiError> {
    let config = state.loader.load().await?;
    let keys: Vec<String> = config.into_iter().map(|(key, _)| key).collect();

    tracing::info!("Listed {} keys", keys.len());

    Ok((StatusCode::OK, Json(ListKeysResponse { keys })))
}
