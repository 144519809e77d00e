//! Application submission and review handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use jdesk_firestore::{ApplicationRepository, JobRepository};
use jdesk_models::{Application, ApplicationId, ApplicationStatus, JobId};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::{
    is_valid_email, is_valid_http_url, sanitize_line, sanitize_text, MAX_COVER_LETTER_LENGTH,
    MAX_NAME_LENGTH,
};
use crate::state::AppState;

/// Application submission request.
#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_url: Option<String>,
}

/// Submission acknowledgement.
#[derive(Serialize)]
pub struct ApplyResponse {
    pub success: bool,
    pub application_id: String,
}

/// POST /api/jobs/:job_id/apply
pub async fn apply(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> ApiResult<(StatusCode, Json<ApplyResponse>)> {
    let name = sanitize_line(&request.name, MAX_NAME_LENGTH);
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    let email = request.email.trim();
    if !is_valid_email(email) {
        return Err(ApiError::validation("Invalid email address"));
    }
    if let Some(ref url) = request.resume_url {
        if !is_valid_http_url(url) {
            return Err(ApiError::validation("Invalid resume URL"));
        }
    }

    // Applications land on visible postings only
    let job_id = JobId::from(job_id);
    let jobs = JobRepository::new((*state.firestore).clone());
    jobs.get(&job_id)
        .await?
        .filter(|job| job.active)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    let mut application = Application::new(job_id.clone(), name, email);
    application.phone = request.phone.map(|p| sanitize_line(&p, 40));
    application.cover_letter = request
        .cover_letter
        .map(|c| sanitize_text(&c, MAX_COVER_LETTER_LENGTH));
    application.resume_url = request.resume_url;

    ApplicationRepository::new((*state.firestore).clone())
        .create(&application)
        .await?;

    // Counter is display-only; a failed bump must not fail the submission
    if let Err(e) = jobs.increment_application_count(&job_id).await {
        warn!("Failed to bump application count for job {}: {}", job_id, e);
    }

    metrics::record_application_submitted();
    info!("Application {} submitted for job {}", application.id, job_id);

    Ok((
        StatusCode::CREATED,
        Json(ApplyResponse {
            success: true,
            application_id: application.id.to_string(),
        }),
    ))
}

// =============================================================================
// Admin surface
// =============================================================================

/// Application list query params.
#[derive(Debug, Deserialize)]
pub struct ListApplicationsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// Application list response.
#[derive(Serialize)]
pub struct ApplicationListResponse {
    pub success: bool,
    pub applications: Vec<Application>,
}

/// GET /api/admin/jobs/:job_id/applications
pub async fn list_applications(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(job_id): Path<String>,
    Query(query): Query<ListApplicationsQuery>,
) -> ApiResult<Json<ApplicationListResponse>> {
    let job_id = JobId::from(job_id);

    // 404 on unknown job rather than returning an empty list
    JobRepository::new((*state.firestore).clone())
        .get(&job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    let applications = ApplicationRepository::new((*state.firestore).clone())
        .list_for_job(&job_id, query.limit.clamp(1, 200))
        .await?;

    Ok(Json(ApplicationListResponse {
        success: true,
        applications,
    }))
}

/// Status-change request.
#[derive(Debug, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub status: String,
}

/// Status-change acknowledgement.
#[derive(Serialize)]
pub struct ApplicationStatusResponse {
    pub success: bool,
    pub id: String,
    pub status: ApplicationStatus,
}

/// PATCH /api/admin/applications/:application_id/status
pub async fn update_application_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(application_id): Path<String>,
    Json(request): Json<UpdateApplicationStatusRequest>,
) -> ApiResult<Json<ApplicationStatusResponse>> {
    let status = match request.status.as_str() {
        "submitted" => ApplicationStatus::Submitted,
        "reviewed" => ApplicationStatus::Reviewed,
        "accepted" => ApplicationStatus::Accepted,
        "rejected" => ApplicationStatus::Rejected,
        other => {
            return Err(ApiError::validation(format!(
                "Invalid status '{}'. Must be one of: submitted, reviewed, accepted, rejected",
                other
            )));
        }
    };

    let application_id = ApplicationId::from(application_id);
    let repo = ApplicationRepository::new((*state.firestore).clone());

    repo.get(&application_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Application not found"))?;

    repo.update_status(&application_id, status).await?;

    info!(
        "Admin {} set application {} status={}",
        admin.0.id, application_id, status
    );

    Ok(Json(ApplicationStatusResponse {
        success: true,
        id: application_id.to_string(),
        status,
    }))
}
