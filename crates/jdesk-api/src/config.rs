//! API configuration.

use anyhow::{bail, Result};
use tracing::warn;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Rate limit requests per second (general API)
    pub rate_limit_rps: u32,
    /// Rate limit requests per second for login/registration
    pub auth_rate_limit_rps: u32,
    /// Max request body size
    pub max_body_size: usize,
    /// Environment (development/production)
    pub environment: String,
    /// Authentication settings
    pub auth: AuthConfig,
}

/// Authentication configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Server-held HMAC secret for signing session tokens
    pub jwt_secret: String,
    /// Token validity window in days
    pub token_ttl_days: i64,
    /// Shared secret gating admin self-registration in production
    pub admin_registration_secret: Option<String>,
}

impl AuthConfig {
    /// Token validity window in seconds (cookie max-age mirrors this).
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_days * 24 * 60 * 60
    }

    fn from_env(is_production: bool) -> Result<Self> {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ if is_production => bail!("JWT_SECRET must be set in production"),
            _ => {
                warn!("JWT_SECRET not set, using development default");
                "jdesk-dev-secret-change-me".to_string()
            }
        };

        Ok(Self {
            jwt_secret,
            token_ttl_days: std::env::var("TOKEN_TTL_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            admin_registration_secret: std::env::var("ADMIN_REGISTRATION_SECRET")
                .ok()
                .filter(|s| !s.is_empty()),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            rate_limit_rps: 10,
            auth_rate_limit_rps: 5,
            max_body_size: 1024 * 1024, // 1MB
            environment: "development".to_string(),
            auth: AuthConfig {
                jwt_secret: "jdesk-dev-secret-change-me".to_string(),
                token_ttl_days: 7,
                admin_registration_secret: None,
            },
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self> {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment.to_lowercase() == "production";

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            rate_limit_rps: std::env::var("RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            auth_rate_limit_rps: std::env::var("AUTH_RATE_LIMIT_RPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
            auth: AuthConfig::from_env(is_production)?,
            environment,
        })
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_development_defaults() {
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("JWT_SECRET");
        std::env::remove_var("TOKEN_TTL_DAYS");
        let config = ApiConfig::from_env().unwrap();
        assert!(!config.is_production());
        assert_eq!(config.auth.token_ttl_days, 7);
        assert_eq!(config.auth.token_ttl_seconds(), 7 * 24 * 60 * 60);
    }

    #[test]
    #[serial]
    fn test_production_requires_jwt_secret() {
        std::env::set_var("ENVIRONMENT", "production");
        std::env::remove_var("JWT_SECRET");
        assert!(ApiConfig::from_env().is_err());
        std::env::remove_var("ENVIRONMENT");
    }

    #[test]
    #[serial]
    fn test_production_with_secret() {
        std::env::set_var("ENVIRONMENT", "production");
        std::env::set_var("JWT_SECRET", "s3cret");
        let config = ApiConfig::from_env().unwrap();
        assert!(config.is_production());
        assert_eq!(config.auth.jwt_secret, "s3cret");
        std::env::remove_var("ENVIRONMENT");
        std::env::remove_var("JWT_SECRET");
    }
}
