//! Session token authentication.
//!
//! Four small pieces, kept together because they share the claim types:
//! - password hashing/verification (argon2id)
//! - token issuance and verification (HS256 over a server-held secret)
//! - session cookie builders
//! - request extractors for the authenticated user

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use jdesk_models::{User, UserId, UserRole};

use crate::config::AuthConfig;
use crate::error::ApiError;
use crate::state::AppState;

/// Cookie carrying the public-site session token.
pub const SESSION_COOKIE: &str = "token";

/// Cookie carrying the admin back-office session token.
pub const ADMIN_COOKIE: &str = "admin_token";

// =============================================================================
// Password hashing
// =============================================================================

/// Hash a plaintext secret with argon2id and a random salt.
///
/// Fails closed: a hashing error aborts the write that needed it, so a
/// plaintext secret can never reach the store.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    use argon2::password_hash::{rand_core::OsRng, PasswordHasher, SaltString};
    use argon2::Argon2;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Password hashing failed: {}", e)))
}

/// One-way comparison of a plaintext secret against a stored hash.
///
/// A malformed stored hash counts as a mismatch, never as a match.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// =============================================================================
// Token issuance
// =============================================================================

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Account email at issue time
    pub email: String,
    /// Account role at issue time; role changes require a fresh login
    pub role: UserRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Mints and verifies signed session tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_seconds: i64,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_seconds: config.token_ttl_seconds(),
        }
    }

    /// Token validity window in seconds; the session cookie mirrors it.
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Mint a token for a verified identity.
    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + self.ttl_seconds,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to encode token: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Bad signature, malformed payload and past expiry all collapse into
    /// the same unauthenticated error; callers are never told which.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))
    }
}

// =============================================================================
// Session cookies
// =============================================================================

/// Build a session cookie carrying a token.
///
/// HTTP-only, path-scoped to `/`, max-age equal to the token TTL.
/// `secure` is set outside development.
pub fn session_cookie(
    name: &'static str,
    token: String,
    max_age_seconds: i64,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(max_age_seconds))
        .build()
}

/// Build the deletion form of a session cookie (same name and path,
/// max-age zero). Clearing an absent cookie is a no-op for the client.
pub fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .max_age(time::Duration::ZERO)
        .build()
}

/// Pull a session token out of request headers: named cookies first (in
/// the given order), then an `Authorization: Bearer` header for the
/// mobile shell.
pub fn token_from_headers(headers: &HeaderMap, cookie_names: &[&str]) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    for name in cookie_names {
        if let Some(cookie) = jar.get(name) {
            let value = cookie.value();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
}

// =============================================================================
// Extractors
// =============================================================================

/// Authenticated user extracted from the session cookie or bearer header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: UserId::from(claims.sub),
            email: claims.email,
            role: claims.role,
        }
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &[SESSION_COOKIE])
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = state.tokens.verify(&token)?;
        Ok(AuthUser::from(claims))
    }
}

/// Authenticated admin. Accepts the admin cookie first so a back-office
/// session coexists with a public-site session, and re-checks the role
/// even behind the admin guard.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers, &[ADMIN_COOKIE, SESSION_COOKIE])
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        let claims = state.tokens.verify(&token)?;
        if !claims.role.is_admin() {
            return Err(ApiError::forbidden("Admin access required"));
        }

        Ok(AdminUser(AuthUser::from(claims)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn test_issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_ttl_days: 7,
            admin_registration_secret: None,
        })
    }

    fn test_user(role: UserRole) -> User {
        User::new("Ada", "ada@example.com", "$argon2id$fake", role)
    }

    #[test]
    fn test_hash_is_not_plaintext_and_verifies() {
        let hash = hash_password("hunter2!").unwrap();
        assert_ne!(hash, "hunter2!");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2!", &hash));
        assert!(!verify_password("hunter3!", &hash));
    }

    #[test]
    fn test_two_hashes_of_same_password_differ() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b); // random salt
        assert!(verify_password("same-password", &a));
        assert!(verify_password("same-password", &b));
    }

    #[test]
    fn test_malformed_stored_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_issue_verify_round_trip() {
        let issuer = test_issuer();
        let user = test_user(UserRole::Admin);

        let token = issuer.issue(&user).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.role.is_admin());
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_and_garbage_tokens_fail_identically() {
        let issuer = test_issuer();
        let user = test_user(UserRole::User);

        // Token already past its expiry window
        let now = Utc::now().timestamp();
        let expired = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now - 600,
            exp: now - 120,
        };
        let expired_token = encode(
            &Header::default(),
            &expired,
            &EncodingKey::from_secret(b"unit-test-secret"),
        )
        .unwrap();

        let expired_err = issuer.verify(&expired_token).unwrap_err();
        let garbage_err = issuer.verify("not.a.token").unwrap_err();

        assert_eq!(expired_err.to_string(), garbage_err.to_string());
        assert!(matches!(expired_err, ApiError::Unauthorized(_)));
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let issuer = test_issuer();
        let other = TokenIssuer::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            token_ttl_days: 7,
            admin_registration_secret: None,
        });

        let token = other.issue(&test_user(UserRole::User)).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(SESSION_COOKIE, "tok".to_string(), 604800, false);
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
        assert_ne!(cookie.secure(), Some(true));

        let secure = session_cookie(ADMIN_COOKIE, "tok".to_string(), 604800, true);
        assert_eq!(secure.secure(), Some(true));
    }

    #[test]
    fn test_removal_cookie_zeroes_max_age() {
        let cookie = removal_cookie(SESSION_COOKIE);
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_token_from_headers_cookie_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "cookie",
            HeaderValue::from_static("token=user-tok; admin_token=admin-tok"),
        );

        assert_eq!(
            token_from_headers(&headers, &[SESSION_COOKIE]).as_deref(),
            Some("user-tok")
        );
        assert_eq!(
            token_from_headers(&headers, &[ADMIN_COOKIE, SESSION_COOKIE]).as_deref(),
            Some("admin-tok")
        );
    }

    #[test]
    fn test_token_from_headers_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(
            token_from_headers(&headers, &[SESSION_COOKIE]).as_deref(),
            Some("abc123")
        );

        let empty = HeaderMap::new();
        assert!(token_from_headers(&empty, &[SESSION_COOKIE]).is_none());
    }
}
