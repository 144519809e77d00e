//! Public-site auth handlers: login, logout, me.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::info;

use jdesk_models::PublicUser;

use crate::auth::{removal_cookie, session_cookie, AuthUser, SESSION_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{is_valid_email, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response carrying a sanitized user.
#[derive(Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
}

/// Simple success response.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Validate the shape of a login request before touching the store.
pub(crate) fn validate_credentials_shape(email: &str, password: &str) -> ApiResult<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }
    if !is_valid_email(email.trim()) {
        return Err(ApiError::validation("Invalid email address"));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::validation("Password too long"));
    }
    Ok(())
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    validate_credentials_shape(&request.email, &request.password)?;

    let user = match state.users.verify_login(&request.email, &request.password).await {
        Ok(user) => user,
        Err(e) => {
            metrics::record_login(match &e {
                ApiError::AccountDisabled => "disabled",
                _ => "invalid",
            });
            return Err(e);
        }
    };

    let token = state.tokens.issue(&user)?;
    let jar = jar.add(session_cookie(
        SESSION_COOKIE,
        token,
        state.tokens.ttl_seconds(),
        state.config.is_production(),
    ));

    metrics::record_login("success");
    info!("User {} logged in", user.id);

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: user.sanitized(),
        }),
    ))
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Idempotent: logging out twice, or without
/// a session, still succeeds.
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(removal_cookie(SESSION_COOKIE));
    (jar, Json(SuccessResponse { success: true }))
}

/// Password-change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ChangePasswordRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    if request.current_password.is_empty() {
        return Err(ApiError::validation("Current password is required"));
    }
    if request.new_password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if request.new_password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::validation("Password too long"));
    }

    state
        .users
        .change_password(&user.id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /api/auth/me
///
/// A missing or malformed token surfaces as 401 via the extractor, never
/// as a server error.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<AuthResponse>> {
    let record = state
        .users
        .get(&user.id)
        .await?
        .filter(|u| u.active)
        .ok_or_else(|| ApiError::unauthorized("Session no longer valid"))?;

    Ok(Json(AuthResponse {
        success: true,
        user: record.sanitized(),
    }))
}
