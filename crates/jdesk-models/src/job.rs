//! Job posting models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::category::CategoryId;
use crate::company::CompanyId;
use crate::utils::slugify;

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Employment type of a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Job posting stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job ID
    pub id: JobId,

    /// Posting title
    pub title: String,

    /// URL slug derived from the title
    pub slug: String,

    /// Full description
    pub description: String,

    /// Owning company
    pub company_id: CompanyId,

    /// Category the posting is listed under
    pub category_id: CategoryId,

    /// Location text ("Berlin", "Remote", ...)
    pub location: String,

    /// Employment type
    #[serde(default)]
    pub job_type: JobType,

    /// Salary band, optional
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<u32>,

    /// Inactive postings are hidden from the public site
    #[serde(default = "default_active")]
    pub active: bool,

    /// Number of applications received
    #[serde(default)]
    pub application_count: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Job {
    /// Build a new posting with a fresh ID, a slug derived from the title,
    /// and zeroed counters.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        company_id: CompanyId,
        category_id: CategoryId,
        location: impl Into<String>,
        job_type: JobType,
    ) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: JobId::new(),
            slug: slugify(&title),
            title,
            description: description.into(),
            company_id,
            category_id,
            location: location.into(),
            job_type,
            salary_min: None,
            salary_max: None,
            active: true,
            application_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_slug_and_defaults() {
        let job = Job::new(
            "Senior Rust Engineer",
            "Build things.",
            CompanyId::from("c1"),
            CategoryId::from("cat1"),
            "Remote",
            JobType::FullTime,
        );
        assert_eq!(job.slug, "senior-rust-engineer");
        assert!(job.active);
        assert_eq!(job.application_count, 0);
    }

    #[test]
    fn test_job_type_serde() {
        assert_eq!(serde_json::to_string(&JobType::PartTime).unwrap(), "\"part_time\"");
        let t: JobType = serde_json::from_str("\"internship\"").unwrap();
        assert_eq!(t, JobType::Internship);
    }
}
