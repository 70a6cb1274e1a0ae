use axum::{middleware, routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::error::{handle_panic, not_found_fallback};
use crate::forwarded::{make_request_span, normalize_forwarded_headers};
use crate::handlers::{get_key_handler, health_handler, list_keys_handler};
use crate::state::AppState;

// Route path constants - single source of truth for all API paths
pub const HEALTH: &str = "/health";
pub const GET_KEY: &str = "/get_key/{key_name}";
pub const LIST_KEYS: &str = "/list_keys";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route(HEALTH, get(health_handler))
        .route(GET_KEY, get(get_key_handler))
        .route(LIST_KEYS, get(list_keys_handler))
        .fallback(not_found_fallback)
        .with_state(state);

    with_middleware(
        api.merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi())),
    )
}

/// Layers applied to every route, innermost first
pub fn with_middleware(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(middleware::from_fn(normalize_forwarded_headers))
}
