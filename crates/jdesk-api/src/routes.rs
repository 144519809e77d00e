//! API routes.

use axum::middleware;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::admin::{
    admin_login, admin_logout, auth_check, list_users, register, set_user_active, set_user_role,
};
use crate::handlers::applications::{apply, list_applications, update_application_status};
use crate::handlers::auth::{change_password, login, logout, me};
use crate::handlers::categories::{create_category, delete_category, list_categories};
use crate::handlers::companies::{
    create_company, delete_company, get_company, list_companies, update_company,
};
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{
    admin_list_jobs, create_job, delete_job, get_job, list_jobs, update_job,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    admin_guard, cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Public browsing and application submission
    let public_routes = Router::new()
        .route("/jobs", get(list_jobs))
        .route("/jobs/:job_id", get(get_job))
        .route("/jobs/:job_id/apply", post(apply))
        .route("/companies", get(list_companies))
        .route("/companies/:company_id", get(get_company))
        .route("/categories", get(list_categories));

    // Session endpoints for the public site
    let auth_routes = Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/change-password", post(change_password));

    // Admin back-office. Everything here sits behind the admin guard;
    // login and register are allowlisted inside the guard itself.
    let admin_routes = Router::new()
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/register", post(register))
        .route("/admin/auth-check", get(auth_check))
        // Job management
        .route("/admin/jobs", get(admin_list_jobs))
        .route("/admin/jobs", post(create_job))
        .route("/admin/jobs/:job_id", put(update_job))
        .route("/admin/jobs/:job_id", delete(delete_job))
        .route("/admin/jobs/:job_id/applications", get(list_applications))
        // Application review
        .route(
            "/admin/applications/:application_id/status",
            patch(update_application_status),
        )
        // Company management
        .route("/admin/companies", post(create_company))
        .route("/admin/companies/:company_id", put(update_company))
        .route("/admin/companies/:company_id", delete(delete_company))
        // Category management
        .route("/admin/categories", post(create_category))
        .route("/admin/categories/:category_id", delete(delete_category))
        // User management
        .route("/admin/users", get(list_users))
        .route("/admin/users/:user_id/active", patch(set_user_active))
        .route("/admin/users/:user_id/role", patch(set_user_role))
        .layer(middleware::from_fn_with_state(state.clone(), admin_guard));

    // General limiter for browsing; a tighter one for credential
    // endpoints to slow brute-force attempts
    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));
    let auth_rate_limiter =
        std::sync::Arc::new(RateLimiterCache::new(state.config.auth_rate_limit_rps));

    let api_routes = Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ))
        .merge(auth_routes.layer(middleware::from_fn_with_state(
            auth_rate_limiter,
            rate_limit_middleware,
        )));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Body size cap ahead of any JSON parsing
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
