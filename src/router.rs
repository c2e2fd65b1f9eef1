use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::{AppConfig, Environment};
use crate::handlers::{self, protected, public};
use crate::middleware::{jwt_auth_middleware, request_id_middleware, REQUEST_ID_HEADER};
use crate::state::AppState;

/// Build the full application router.
///
/// Layer order, outermost first: trace, CORS, request id, then the token
/// check on the contact routes only.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(contact_routes(&state))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(middleware::from_fn(request_id_middleware));

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(public::login))
        .route("/health", get(public::health))
}

fn contact_routes(state: &AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/contacts", get(protected::contacts_get))
        .route("/contact", post(protected::contact_post))
        .route(
            "/contact/:id",
            put(protected::contact_put)
                .get(protected::contact_get)
                .delete(protected::contact_delete),
        );

    if state.config.security.require_auth {
        routes.route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware))
    } else {
        tracing::warn!("REQUIRE_AUTH=false: contact routes are served without authentication");
        routes
    }
}

/// Configured origins may call every contact route with a bearer token and
/// JSON body, and read back the request id.
fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.environment == Environment::Development && config.security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .expose_headers([REQUEST_ID_HEADER]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use chrono::Utc;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::generate_jwt;
    use crate::database::{
        Contact, ContactInput, ContactRepository, ContactStore, DatabaseError, DatabaseManager, Pagination,
    };

    /// Store whose every call fails, for the 500 paths
    struct BrokenStore;

    #[async_trait]
    impl ContactStore for BrokenStore {
        async fn create_schema(&self) -> Result<(), DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn insert(&self, _: &ContactInput) -> Result<i64, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn list(&self, _: Pagination, _: Option<&str>) -> Result<Vec<Contact>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn find(&self, _: i64) -> Result<Option<Contact>, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn update(&self, _: &Contact) -> Result<u64, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn delete(&self, _: i64) -> Result<u64, DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
        async fn health_check(&self) -> Result<(), DatabaseError> {
            Err(DatabaseError::Sqlx(sqlx::Error::PoolClosed))
        }
    }

    fn test_config(require_auth: bool) -> AppConfig {
        let mut config = AppConfig::development();
        config.security.require_auth = require_auth;
        config.security.app_user = Some("admin".to_string());
        config.security.app_password = Some("s3cret".to_string());
        config.security.jwt_secret = Some("router-test-key".to_string());
        config
    }

    async fn sqlite_state(require_auth: bool) -> AppState {
        let config = test_config(require_auth);
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let repo = ContactRepository::new(pool);
        repo.create_schema().await.unwrap();
        AppState::new(config, Arc::new(repo))
    }

    fn broken_state() -> AppState {
        AppState::new(test_config(false), Arc::new(BrokenStore))
    }

    fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protected_route_requires_token() {
        let router = app(sqlite_state(true).await);
        let response = router.oneshot(request(Method::GET, "/contacts", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("x-request-id"));
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], 401);
    }

    #[tokio::test]
    async fn valid_token_reaches_handler() {
        let state = sqlite_state(true).await;
        let token = generate_jwt(&state.config.security, "admin", Utc::now()).unwrap().token;
        let router = app(state);

        let mut req = request(Method::GET, "/contacts", None);
        req.headers_mut()
            .insert(header::AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        let response = router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
    }

    #[tokio::test]
    async fn login_is_not_behind_auth() {
        let router = app(sqlite_state(true).await);
        let response = router
            .oneshot(request(
                Method::POST,
                "/login",
                Some(json!({"username": "admin", "password": "s3cret"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["expires_in"], 3600);
    }

    #[tokio::test]
    async fn inbound_request_id_is_echoed() {
        let router = app(sqlite_state(false).await);
        let mut req = request(Method::GET, "/health", None);
        req.headers_mut().insert("x-request-id", "trace-me-123".parse().unwrap());
        let response = router.oneshot(req).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "trace-me-123");
    }

    #[tokio::test]
    async fn unknown_route_uses_error_envelope() {
        let router = app(sqlite_state(false).await);
        let response = router.oneshot(request(Method::GET, "/nope", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({"error": {"message": "Not Found", "code": 404}}));
    }

    #[tokio::test]
    async fn storage_failures_become_generic_500s() {
        let cases = [
            (Method::GET, "/contacts", None, "Error fetching contacts"),
            (
                Method::POST,
                "/contact",
                Some(json!({"name": "John Doe", "email": "john@example.com"})),
                "Failed to create contact",
            ),
            (
                Method::PUT,
                "/contact/1",
                Some(json!({"name": "John Doe", "email": "john@example.com"})),
                "Failed to update contact",
            ),
            (Method::DELETE, "/contact/1", None, "Failed to delete contact"),
        ];

        for (method, uri, body, message) in cases {
            let router = app(broken_state());
            let response = router.oneshot(request(method, uri, body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(
                json_body(response).await,
                json!({"error": {"message": message, "code": 500}})
            );
        }
    }

    #[tokio::test]
    async fn health_reports_degraded_storage() {
        let router = app(broken_state());
        let response = router.oneshot(request(Method::GET, "/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "degraded");
    }

    fn staging_cors_config() -> AppConfig {
        let mut config = AppConfig::staging();
        config.database.url = "sqlite::memory:".to_string();
        config.security.enable_cors = true;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    #[tokio::test]
    async fn cors_preflight_allows_authorized_json_writes() {
        let config = staging_cors_config();
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let router = app(AppState::new(config, Arc::new(ContactRepository::new(pool))));

        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/contact/1")
            .header(header::ORIGIN, "https://staging.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "PUT")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://staging.example.com");
        let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
        assert!(methods.contains("PUT") && methods.contains("DELETE"), "{}", methods);
        let allowed = headers[header::ACCESS_CONTROL_ALLOW_HEADERS].to_str().unwrap().to_ascii_lowercase();
        assert!(allowed.contains("authorization") && allowed.contains("content-type"), "{}", allowed);
    }

    #[tokio::test]
    async fn cors_exposes_request_id_to_configured_origin() {
        let config = staging_cors_config();
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let router = app(AppState::new(config, Arc::new(ContactRepository::new(pool))));

        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "https://staging.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        let exposed = response.headers()[header::ACCESS_CONTROL_EXPOSE_HEADERS]
            .to_str()
            .unwrap()
            .to_ascii_lowercase();
        assert!(exposed.contains("x-request-id"), "{}", exposed);
    }

    #[tokio::test]
    async fn unknown_origin_gets_no_cors_grant() {
        let config = staging_cors_config();
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let router = app(AppState::new(config, Arc::new(ContactRepository::new(pool))));

        let req = Request::builder()
            .method(Method::GET)
            .uri("/health")
            .header(header::ORIGIN, "https://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        assert!(!response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[tokio::test]
    async fn unsupported_method_uses_error_envelope() {
        let router = app(sqlite_state(false).await);
        let response = router
            .oneshot(request(
                Method::PATCH,
                "/contact/1",
                Some(json!({"name": "John Doe", "email": "john@example.com"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            json_body(response).await,
            json!({"error": {"message": "Method Not Allowed", "code": 405}})
        );
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let mut config = test_config(false);
        config.api.max_request_size_bytes = 64;
        let pool = DatabaseManager::connect(&config.database).await.unwrap();
        let repo = ContactRepository::new(pool);
        repo.create_schema().await.unwrap();
        let router = app(AppState::new(config, Arc::new(repo)));

        let long_name = "x".repeat(256);
        let response = router
            .oneshot(request(
                Method::POST,
                "/contact",
                Some(json!({"name": long_name, "email": "john@example.com"})),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json_body(response).await,
            json!({"error": {"message": "Request body too large", "code": 413}})
        );
    }

    #[tokio::test]
    async fn create_without_content_type_is_bad_request() {
        let router = app(sqlite_state(false).await);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/contact")
            .body(Body::from(r#"{"name":"John Doe","email":"john@example.com"}"#))
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "Invalid request body");
    }
}
