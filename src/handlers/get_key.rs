use crate::error::{ApiError, ErrorResponse};
use crate::loader::ConfigMap;
use crate::routes;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};

/// GET /get_key/{key_name} handler - Retrieve a single configuration value
///
/// The file is re-read on every call. Keys match exactly and case-sensitively;
/// the body is a one-entry object `{ key_name: value }`. A segment that does
/// not decode to UTF-8 cannot name any key and is answered as a miss.
#[utoipa::path(
    get,
    path = routes::GET_KEY,
    params(
        ("key_name" = String, Path, description = "Top-level key in the configuration file")
    ),
    responses(
        (status = 200, description = "Key found", body = serde_json::Value),
        (status = 404, description = "Key not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "keys"
)]
pub async fn get_key_handler(
    State(state): State<AppState>,
    key_name: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<ConfigMap>), ApiError> {
    let mut config = state.loader.load().await?;

    let key_name = match key_name {
        Ok(Path(key_name)) => key_name,
        Err(rejection) => {
            let reason = rejection.body_text();
            tracing::warn!("Key not found: undecodable key name ({})", reason);
            return Err(ApiError::KeyNotFound(reason));
        }
    };

    match config.remove(&key_name) {
        Some(value) => {
            tracing::info!("Key retrieved: {}", key_name);
            let mut body = ConfigMap::new();
            body.insert(key_name, value);
            Ok((StatusCode::OK, Json(body)))
        }
        None => {
            tracing::warn!("Key not found: {}", key_name);
            Err(ApiError::KeyNotFound(key_name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{app_for, get, setup_test_app};
    use serde_json::{json, Value as JsonValue};

    const SCENARIO: &str = r#"{"db_password": "abc123", "api_key": 42}"#;

    #[tokio::test]
    async fn test_get_key_success() {
        let (_dir, app) = setup_test_app(Some(SCENARIO));

        let (status, body) = get(&app, "/get_key/db_password").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, br#"{"db_password":"abc123"}"#);

        let (status, body) = get(&app, "/get_key/api_key").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, br#"{"api_key":42}"#);
    }

    #[tokio::test]
    async fn test_get_key_not_found() {
        let (_dir, app) = setup_test_app(Some(SCENARIO));

        let (status, body) = get(&app, "/get_key/missing").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);
    }

    #[tokio::test]
    async fn test_get_key_is_case_sensitive() {
        let (_dir, app) = setup_test_app(Some(SCENARIO));

        let (status, _) = get(&app, "/get_key/DB_PASSWORD").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_key_percent_encoded_name() {
        let (_dir, app) = setup_test_app(Some(r#"{"my key": "spaced"}"#));

        let (status, body) = get(&app, "/get_key/my%20key").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, br#"{"my key":"spaced"}"#);
    }

    #[tokio::test]
    async fn test_get_key_undecodable_name() {
        let (_dir, app) = setup_test_app(Some(r#"{"a": 1}"#));

        let (status, body) = get(&app, "/get_key/%FF").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);

        let (status, body) = get(&app, "/get_key/a%2Fb").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);
    }

    #[tokio::test]
    async fn test_get_key_complex_json() {
        let test_data = json!({
            "string": "hello",
            "number": 123,
            "float": 1.5,
            "boolean": true,
            "null": null,
            "array": [1, "two", {"three": 3}],
            "nested": {
                "key": "value",
                "deeper": {"list": []}
            }
        });
        let (_dir, app) = setup_test_app(Some(&test_data.to_string()));

        for (key, expected) in test_data.as_object().unwrap() {
            let (status, body) = get(&app, &format!("/get_key/{}", key)).await;
            assert_eq!(status, StatusCode::OK, "key {} should be found", key);

            let response_json: JsonValue = serde_json::from_slice(&body).unwrap();
            let mut expected_body = ConfigMap::new();
            expected_body.insert(key.clone(), expected.clone());
            assert_eq!(response_json, JsonValue::Object(expected_body));
        }
    }

    #[tokio::test]
    async fn test_get_key_missing_file() {
        let (_dir, app) = setup_test_app(None);

        let (status, body) = get(&app, "/get_key/anything").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);
    }

    #[tokio::test]
    async fn test_get_key_invalid_json() {
        let (_dir, app) = setup_test_app(Some(r#"{"db_password": "abc123""#));

        let (status, body) = get(&app, "/get_key/db_password").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);
    }

    #[tokio::test]
    async fn test_get_key_top_level_array() {
        let (_dir, app) = setup_test_app(Some(r#"["db_password"]"#));

        let (status, body) = get(&app, "/get_key/db_password").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, br#"{"error":"Key not found"}"#);
    }

    #[tokio::test]
    async fn test_get_key_is_idempotent() {
        let (_dir, app) = setup_test_app(Some(SCENARIO));

        for uri in ["/get_key/db_password", "/get_key/missing"] {
            let first = get(&app, uri).await;
            let second = get(&app, uri).await;
            assert_eq!(first, second);
        }
    }

    #[tokio::test]
    async fn test_get_key_sees_file_edits() {
        let (dir, app) = setup_test_app(Some(SCENARIO));

        let (status, _) = get(&app, "/get_key/rotated").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        std::fs::write(
            dir.path().join(crate::handlers::test_support::CONFIG_FILE_NAME),
            r#"{"rotated": "xyz789"}"#,
        )
        .unwrap();

        let (status, body) = get(&app, "/get_key/rotated").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, br#"{"rotated":"xyz789"}"#);
    }

    #[tokio::test]
    async fn test_get_key_io_failure() {
        // A directory where the file should be makes the read itself fail
        let dir = tempfile::TempDir::new().unwrap();
        let app = app_for(dir.path().to_path_buf());

        let (status, body) = get(&app, "/get_key/db_password").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, br#"{"error":"Internal server error"}"#);
    }
}
