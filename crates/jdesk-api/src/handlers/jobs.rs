//! Job listing handlers: public browse plus admin CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use jdesk_firestore::{CategoryRepository, CompanyRepository, JobFilter, JobRepository};
use jdesk_models::{CategoryId, CompanyId, Job, JobId, JobType};

use crate::auth::AdminUser;
use crate::error::{ApiError, ApiResult};
use crate::security::{is_valid_doc_id, sanitize_line, sanitize_text, MAX_TEXT_LENGTH, MAX_TITLE_LENGTH};
use crate::state::AppState;

/// Listing query params.
#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub category: Option<String>,
    pub company: Option<String>,
    pub job_type: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

/// Job list response.
#[derive(Serialize)]
pub struct JobListResponse {
    pub success: bool,
    pub jobs: Vec<Job>,
}

/// Single job response.
#[derive(Serialize)]
pub struct JobResponse {
    pub success: bool,
    pub job: Job,
}

/// Deletion/mutation acknowledgement.
#[derive(Serialize)]
pub struct JobDeletedResponse {
    pub success: bool,
    pub id: String,
}

fn parse_job_type(raw: &str) -> ApiResult<JobType> {
    Ok(match raw {
        "full_time" => JobType::FullTime,
        "part_time" => JobType::PartTime,
        "contract" => JobType::Contract,
        "internship" => JobType::Internship,
        "remote" => JobType::Remote,
        other => {
            return Err(ApiError::validation(format!(
                "Invalid job type '{}'. Must be one of: full_time, part_time, contract, internship, remote",
                other
            )));
        }
    })
}

fn filter_from_query(query: &ListJobsQuery, include_inactive: bool) -> ApiResult<JobFilter> {
    let job_type = query.job_type.as_deref().map(parse_job_type).transpose()?;

    Ok(JobFilter {
        category_id: query.category.clone().map(CategoryId::from),
        company_id: query.company.clone().map(CompanyId::from),
        job_type,
        search: query
            .search
            .as_deref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        include_inactive,
        limit: query.limit.clamp(1, 100),
        offset: query.offset,
    })
}

/// GET /api/jobs: active postings, newest first.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let filter = filter_from_query(&query, false)?;
    let jobs = JobRepository::new((*state.firestore).clone())
        .list(&filter)
        .await?;

    Ok(Json(JobListResponse {
        success: true,
        jobs,
    }))
}

/// GET /api/jobs/:job_id: a single active posting.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobResponse>> {
    if !is_valid_doc_id(&job_id) {
        return Err(ApiError::not_found("Job not found"));
    }

    let job = JobRepository::new((*state.firestore).clone())
        .get(&JobId::from(job_id))
        .await?
        .filter(|job| job.active)
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    Ok(Json(JobResponse {
        success: true,
        job,
    }))
}

// =============================================================================
// Admin surface
// =============================================================================

/// GET /api/admin/jobs: includes deactivated postings.
pub async fn admin_list_jobs(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListJobsQuery>,
) -> ApiResult<Json<JobListResponse>> {
    let filter = filter_from_query(&query, true)?;
    let jobs = JobRepository::new((*state.firestore).clone())
        .list(&filter)
        .await?;

    Ok(Json(JobListResponse {
        success: true,
        jobs,
    }))
}

/// Create-job request.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company_id: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default = "default_job_type")]
    pub job_type: String,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
}

fn default_job_type() -> String {
    "full_time".to_string()
}

/// POST /api/admin/jobs
pub async fn create_job(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<(StatusCode, Json<JobResponse>)> {
    let title = sanitize_line(&request.title, MAX_TITLE_LENGTH);
    if title.is_empty() {
        return Err(ApiError::validation("Title is required"));
    }
    let description = sanitize_text(&request.description, MAX_TEXT_LENGTH);
    if description.trim().is_empty() {
        return Err(ApiError::validation("Description is required"));
    }
    let job_type = parse_job_type(&request.job_type)?;
    if let (Some(min), Some(max)) = (request.salary_min, request.salary_max) {
        if min > max {
            return Err(ApiError::validation("salary_min cannot exceed salary_max"));
        }
    }

    // The referenced company and category must exist
    let company_id = CompanyId::from(request.company_id);
    CompanyRepository::new((*state.firestore).clone())
        .get(&company_id)
        .await?
        .ok_or_else(|| ApiError::validation("Unknown company"))?;

    let category_id = CategoryId::from(request.category_id);
    CategoryRepository::new((*state.firestore).clone())
        .get(&category_id)
        .await?
        .ok_or_else(|| ApiError::validation("Unknown category"))?;

    let mut job = Job::new(
        title,
        description,
        company_id,
        category_id,
        sanitize_line(&request.location, MAX_TITLE_LENGTH),
        job_type,
    );
    job.salary_min = request.salary_min;
    job.salary_max = request.salary_max;

    JobRepository::new((*state.firestore).clone()).create(&job).await?;

    info!("Admin {} created job {}", admin.0.id, job.id);

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            success: true,
            job,
        }),
    ))
}

/// Update-job request: all fields optional, absent fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub active: Option<bool>,
}

/// PUT /api/admin/jobs/:job_id
pub async fn update_job(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> ApiResult<Json<JobResponse>> {
    let repo = JobRepository::new((*state.firestore).clone());
    let mut job = repo
        .get(&JobId::from(job_id))
        .await?
        .ok_or_else(|| ApiError::not_found("Job not found"))?;

    if let Some(title) = request.title {
        let title = sanitize_line(&title, MAX_TITLE_LENGTH);
        if title.is_empty() {
            return Err(ApiError::validation("Title cannot be empty"));
        }
        job.slug = jdesk_models::slugify(&title);
        job.title = title;
    }
    if let Some(description) = request.description {
        let description = sanitize_text(&description, MAX_TEXT_LENGTH);
        if description.trim().is_empty() {
            return Err(ApiError::validation("Description cannot be empty"));
        }
        job.description = description;
    }
    if let Some(location) = request.location {
        job.location = sanitize_line(&location, MAX_TITLE_LENGTH);
    }
    if let Some(ref job_type) = request.job_type {
        job.job_type = parse_job_type(job_type)?;
    }
    if request.salary_min.is_some() {
        job.salary_min = request.salary_min;
    }
    if request.salary_max.is_some() {
        job.salary_max = request.salary_max;
    }
    if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
        if min > max {
            return Err(ApiError::validation("salary_min cannot exceed salary_max"));
        }
    }
    if let Some(active) = request.active {
        job.active = active;
    }
    job.updated_at = chrono::Utc::now();

    repo.update(&job).await?;

    info!("Admin {} updated job {}", admin.0.id, job.id);

    Ok(Json(JobResponse {
        success: true,
        job,
    }))
}

/// DELETE /api/admin/jobs/:job_id
pub async fn delete_job(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobDeletedResponse>> {
    let job_id = JobId::from(job_id);
    JobRepository::new((*state.firestore).clone())
        .delete(&job_id)
        .await?;

    info!("Admin {} deleted job {}", admin.0.id, job_id);

    Ok(Json(JobDeletedResponse {
        success: true,
        id: job_id.to_string(),
    }))
}
