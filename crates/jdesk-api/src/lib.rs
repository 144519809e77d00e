//! Axum HTTP API server for the JobDesk backend.
//!
//! This crate provides:
//! - Cookie/JWT session authentication with an admin access guard
//! - Public job/company/category browsing and application submission
//! - Admin back-office endpoints
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::{ApiConfig, AuthConfig};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::UserService;
pub use state::AppState;
