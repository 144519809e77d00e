//! Company handlers: public browse plus admin CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use jdesk_firestore::CompanyRepository;
use jdesk_models::{Company, CompanyId};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::security::{
    is_valid_http_url, sanitize_line, sanitize_text, MAX_NAME_LENGTH, MAX_TEXT_LENGTH,
};
use crate::state::AppState;

/// Company list query params.
#[derive(Debug, Deserialize)]
pub struct ListCompaniesQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    pub page_token: Option<String>,
}

fn default_limit() -> u32 {
    50
}

/// Company list response.
#[derive(Serialize)]
pub struct CompanyListResponse {
    pub success: bool,
    pub companies: Vec<Company>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Single company response.
#[derive(Serialize)]
pub struct CompanyResponse {
    pub success: bool,
    pub company: Company,
}

/// Deletion acknowledgement.
#[derive(Serialize)]
pub struct CompanyDeletedResponse {
    pub success: bool,
    pub id: String,
}

/// GET /api/companies
pub async fn list_companies(
    State(state): State<AppState>,
    Query(query): Query<ListCompaniesQuery>,
) -> ApiResult<Json<CompanyListResponse>> {
    let (companies, next_page_token) = CompanyRepository::new((*state.firestore).clone())
        .list(query.limit.clamp(1, 100), query.page_token.as_deref())
        .await?;

    Ok(Json(CompanyListResponse {
        success: true,
        companies,
        next_page_token,
    }))
}

/// GET /api/companies/:company_id
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> ApiResult<Json<CompanyResponse>> {
    let company = CompanyRepository::new((*state.firestore).clone())
        .get(&CompanyId::from(company_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}

// =============================================================================
// Admin surface
// =============================================================================

/// Create/update company request.
#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub website: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
}

fn validate_optional_url(url: &Option<String>, field: &str) -> ApiResult<()> {
    if let Some(url) = url {
        if !is_valid_http_url(url) {
            return Err(ApiError::validation(format!("Invalid {} URL", field)));
        }
    }
    Ok(())
}

/// POST /api/admin/companies
pub async fn create_company(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CompanyRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let name = sanitize_line(&request.name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    validate_optional_url(&request.website, "website")?;
    validate_optional_url(&request.logo_url, "logo")?;

    let mut company = Company::new(name, sanitize_text(&request.description, MAX_TEXT_LENGTH));
    company.website = request.website;
    company.location = request
        .location
        .map(|l| sanitize_line(&l, MAX_NAME_LENGTH));
    company.logo_url = request.logo_url;

    CompanyRepository::new((*state.firestore).clone())
        .create(&company)
        .await?;

    info!("Admin {} created company {}", admin.0.id, company.id);

    Ok((
        StatusCode::CREATED,
        Json(CompanyResponse {
            success: true,
            company,
        }),
    ))
}

/// PUT /api/admin/companies/:company_id
pub async fn update_company(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(company_id): Path<String>,
    Json(request): Json<CompanyRequest>,
) -> ApiResult<Json<CompanyResponse>> {
    let repo = CompanyRepository::new((*state.firestore).clone());
    let mut company = repo
        .get(&CompanyId::from(company_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Company not found"))?;

    let name = sanitize_line(&request.name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    validate_optional_url(&request.website, "website")?;
    validate_optional_url(&request.logo_url, "logo")?;

    company.slug = jdesk_models::slugify(&name);
    company.name = name;
    company.description = sanitize_text(&request.description, MAX_TEXT_LENGTH);
    company.website = request.website;
    company.location = request
        .location
        .map(|l| sanitize_line(&l, MAX_NAME_LENGTH));
    company.logo_url = request.logo_url;
    company.updated_at = chrono::Utc::now();

    repo.update(&company).await?;

    info!("Admin {} updated company {}", admin.0.id, company.id);

    Ok(Json(CompanyResponse {
        success: true,
        company,
    }))
}

/// DELETE /api/admin/companies/:company_id
pub async fn delete_company(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(company_id): Path<String>,
) -> ApiResult<Json<CompanyDeletedResponse>> {
    let company_id = CompanyId::from(company_id);
    CompanyRepository::new((*state.firestore).clone())
        .delete(&company_id)
        .await?;

    info!("Admin {} deleted company {}", admin.0.id, company_id);

    Ok(Json(CompanyDeletedResponse {
        success: true,
        id: company_id.to_string(),
    }))
}
