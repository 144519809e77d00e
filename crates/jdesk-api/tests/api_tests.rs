//! API integration tests.
//!
//! Without Firestore credentials the tests run against a minimal router
//! carrying the same middleware stack, which is enough to exercise the
//! HTTP plumbing (headers, CORS, probes). Tests needing real state are
//! ignored by default.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

/// Test security headers.
#[tokio::test]
async fn test_security_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("X-Content-Type-Options"));
    assert!(headers.contains_key("X-Frame-Options"));
    assert!(headers.contains_key("X-Request-ID"));
}

/// Test CORS preflight.
#[tokio::test]
async fn test_cors_headers() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/jobs")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT
    );
}

/// Admin namespace is guarded: no cookie means 401 before any handler.
#[tokio::test]
#[ignore = "requires Firestore credentials for full app state"]
async fn test_admin_guard_rejects_anonymous() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    for uri in ["/api/admin/users", "/api/admin/jobs", "/api/admin/auth-check"] {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
    }
}

/// Guard allowlist: the admin login page is reachable anonymously
/// (it answers 400 for an empty body, not 401).
#[tokio::test]
#[ignore = "requires Firestore credentials for full app state"]
async fn test_admin_login_is_allowlisted() {
    dotenvy::dotenv().ok();

    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header("Content-Type", "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// End-to-end scenario against a running server: register an admin in
/// development mode, log in, hit auth-check with the cookie.
#[tokio::test]
#[ignore = "requires a running server and Firestore"]
async fn test_register_login_auth_check_flow() {
    dotenvy::dotenv().ok();

    let base_url = std::env::var("JDESK_TEST_API_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    let register = client
        .post(format!("{}/api/admin/register", base_url))
        .json(&serde_json::json!({
            "name": "A",
            "email": "a@x.com",
            "password": "p1-long-enough"
        }))
        .send()
        .await
        .unwrap();
    assert!(register.status() == StatusCode::CREATED || register.status() == StatusCode::CONFLICT);

    let login = client
        .post(format!("{}/api/admin/login", base_url))
        .json(&serde_json::json!({
            "email": "a@x.com",
            "password": "p1-long-enough"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let body: serde_json::Value = login.json().await.unwrap();
    assert_eq!(body["user"]["role"], "admin");

    let check = client
        .get(format!("{}/api/admin/auth-check", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(check.status(), StatusCode::OK);
    let body: serde_json::Value = check.json().await.unwrap();
    assert_eq!(body["authenticated"], true);
}

/// Helper to create a test router. Uses real state when credentials are
/// available, otherwise a minimal router behind the same middleware.
async fn create_test_router() -> axum::Router {
    use jdesk_api::{create_router, ApiConfig, AppState};

    let config = ApiConfig::from_env().unwrap_or_default();

    match AppState::new(config).await {
        // No metrics recorder in tests: the process-global Prometheus
        // recorder can only be installed once
        Ok(state) => create_router(state, None),
        Err(_) => {
            use axum::middleware;
            use axum::routing::get;
            use axum::Json;
            use jdesk_api::middleware::{request_id, security_headers};
            use serde_json::json;

            axum::Router::new()
                .route(
                    "/health",
                    get(|| async {
                        Json(json!({
                            "status": "healthy",
                            "version": env!("CARGO_PKG_VERSION")
                        }))
                    }),
                )
                .route("/api/jobs", get(|| async { Json(json!({"success": true, "jobs": []})) }))
                .layer(middleware::from_fn(security_headers))
                .layer(middleware::from_fn(request_id))
                .layer(jdesk_api::middleware::cors_layer(&["*".to_string()]))
        }
    }
}
