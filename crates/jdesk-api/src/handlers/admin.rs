//! Admin back-office handlers: login, registration, auth-check, user
//! management.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use jdesk_models::{PublicUser, UserId, UserRole};

use crate::auth::{removal_cookie, session_cookie, AdminUser, ADMIN_COOKIE};
use crate::error::{ApiError, ApiResult};
use crate::handlers::auth::{validate_credentials_shape, AuthResponse, LoginRequest, SuccessResponse};
use crate::security::{
    is_valid_email, sanitize_line, MAX_NAME_LENGTH, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
use crate::state::AppState;

/// Header carrying the shared registration secret.
const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

/// POST /api/admin/login
///
/// Same contract as the public login, but the account must hold the
/// admin role and the session lands in the `admin_token` cookie so it
/// coexists with a public-site session.
pub async fn admin_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    validate_credentials_shape(&request.email, &request.password)?;

    let user = state
        .users
        .verify_login(&request.email, &request.password)
        .await?;

    if !user.role.is_admin() {
        warn!("Non-admin account {} attempted admin login", user.id);
        return Err(ApiError::forbidden("Admin access required"));
    }

    let token = state.tokens.issue(&user)?;
    let jar = jar.add(session_cookie(
        ADMIN_COOKIE,
        token,
        state.tokens.ttl_seconds(),
        state.config.is_production(),
    ));

    info!("Admin {} logged in", user.id);

    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: user.sanitized(),
        }),
    ))
}

/// POST /api/admin/logout
///
/// Clears only the admin cookie; a public-site session survives.
pub async fn admin_logout(jar: CookieJar) -> (CookieJar, Json<SuccessResponse>) {
    let jar = jar.add(removal_cookie(ADMIN_COOKIE));
    (jar, Json(SuccessResponse { success: true }))
}

/// Auth-check response.
#[derive(Serialize)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
}

/// GET /api/admin/auth-check
///
/// 200 with the user when the admin session is valid, 401 otherwise.
/// Never errors on a missing or malformed token.
pub async fn auth_check(
    State(state): State<AppState>,
    admin: Option<AdminUser>,
) -> Result<Json<AuthCheckResponse>, (StatusCode, Json<AuthCheckResponse>)> {
    let unauthenticated = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(AuthCheckResponse {
                authenticated: false,
                user: None,
            }),
        )
    };

    let admin = admin.ok_or_else(unauthenticated)?;

    let record = state
        .users
        .get(&admin.0.id)
        .await
        .ok()
        .flatten()
        .filter(|u| u.active && u.role.is_admin())
        .ok_or_else(unauthenticated)?;

    Ok(Json(AuthCheckResponse {
        authenticated: true,
        user: Some(record.sanitized()),
    }))
}

/// Admin registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Admin registration response; the token is included for the mobile
/// shell, browsers use the cookie.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: PublicUser,
    pub token: String,
}

/// POST /api/admin/register
///
/// Open in development; in production the `x-admin-secret` header must
/// match the configured registration secret. An unset secret in
/// production closes registration entirely.
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<RegisterResponse>)> {
    if state.config.is_production() {
        let provided = headers
            .get(ADMIN_SECRET_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        let allowed = state
            .config
            .auth
            .admin_registration_secret
            .as_deref()
            .is_some_and(|expected| !provided.is_empty() && provided == expected);

        if !allowed {
            warn!("Rejected admin registration attempt without valid secret");
            return Err(ApiError::unauthorized("Registration is not open"));
        }
    }

    let name = sanitize_line(&request.name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    let email = request.email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email address"));
    }
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::validation("Password too long"));
    }

    let user = state
        .users
        .create_user(&name, email, &request.password, UserRole::Admin)
        .await?;

    let token = state.tokens.issue(&user)?;
    let jar = jar.add(session_cookie(
        ADMIN_COOKIE,
        token.clone(),
        state.tokens.ttl_seconds(),
        state.config.is_production(),
    ));

    info!("Registered admin account {}", user.id);

    Ok((
        StatusCode::CREATED,
        jar,
        Json(RegisterResponse {
            success: true,
            user: user.sanitized(),
            token,
        }),
    ))
}

// =============================================================================
// User management
// =============================================================================

/// List users query params.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub page_token: Option<String>,
}

fn default_limit() -> u32 {
    20
}

/// List users response.
#[derive(Serialize)]
pub struct ListUsersResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// User info for admin views. Sanitized plus moderation fields.
#[derive(Serialize)]
pub struct AdminUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub active: bool,
    pub created_at: String,
}

/// GET /api/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<ListUsersResponse>> {
    let limit = query.limit.clamp(1, 100);
    let (users, next_page_token) = state.users.list(limit, query.page_token.as_deref()).await?;

    let users = users
        .into_iter()
        .map(|u| AdminUserView {
            id: u.id.to_string(),
            name: u.name,
            email: u.email,
            role: u.role,
            active: u.active,
            created_at: u.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ListUsersResponse {
        success: true,
        users,
        next_page_token,
    }))
}

/// Toggle-active request.
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// User mutation response.
#[derive(Serialize)]
pub struct UserUpdateResponse {
    pub success: bool,
    pub user: PublicUser,
    pub active: bool,
}

/// PATCH /api/admin/users/:user_id/active
pub async fn set_user_active(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
    Json(request): Json<SetActiveRequest>,
) -> ApiResult<Json<UserUpdateResponse>> {
    let target = UserId::from(user_id);
    if target == admin.0.id && !request.active {
        return Err(ApiError::validation("Cannot disable your own account"));
    }

    let user = state.users.set_active(&target, request.active).await?;

    info!(
        "Admin {} set user {} active={}",
        admin.0.id, target, request.active
    );

    Ok(Json(UserUpdateResponse {
        success: true,
        active: user.active,
        user: user.sanitized(),
    }))
}

/// Role-change request.
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// PATCH /api/admin/users/:user_id/role
pub async fn set_user_role(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(user_id): Path<String>,
    Json(request): Json<SetRoleRequest>,
) -> ApiResult<Json<UserUpdateResponse>> {
    let role = match request.role.as_str() {
        "admin" => UserRole::Admin,
        "user" => UserRole::User,
        other => {
            return Err(ApiError::validation(format!(
                "Invalid role '{}'. Must be one of: admin, user",
                other
            )));
        }
    };

    let target = UserId::from(user_id);
    if target == admin.0.id && role == UserRole::User {
        return Err(ApiError::validation("Cannot demote your own account"));
    }

    let user = state.users.set_role(&target, role).await?;

    info!("Admin {} set user {} role={}", admin.0.id, target, role);

    Ok(Json(UserUpdateResponse {
        success: true,
        active: user.active,
        user: user.sanitized(),
    }))
}
