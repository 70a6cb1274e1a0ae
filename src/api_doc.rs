use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::ListKeysResponse;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "keyvault API",
        version = "0.1.0",
        description = "Read-only lookups into a JSON key/value configuration file"
    ),
    paths(
        handlers::health::health_handler,
        handlers::get_key::get_key_handler,
        handlers::list_keys::list_keys_handler
    ),
    components(
        schemas(
            ListKeysResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "keys", description = "Configuration key lookups")
    )
)]
pub struct ApiDoc;
