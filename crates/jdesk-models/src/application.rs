//! Job application models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::job::JobId;
use crate::utils::normalize_email;

/// Unique identifier for a job application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub String);

impl ApplicationId {
    /// Generate a new random application ID.
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

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ApplicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApplicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Review status of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Freshly submitted, not yet looked at
    #[default]
    Submitted,
    /// Seen by a reviewer
    Reviewed,
    /// Moving forward
    Accepted,
    /// Not moving forward
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application submitted against a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    /// Unique application ID
    pub id: ApplicationId,

    /// Posting this application targets
    pub job_id: JobId,

    /// Applicant name
    pub applicant_name: String,

    /// Applicant contact email, stored lowercase
    pub applicant_email: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,

    /// Review status
    #[serde(default)]
    pub status: ApplicationStatus,

    /// Submission timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Application {
    /// Build a new application in `Submitted` state.
    pub fn new(job_id: JobId, applicant_name: impl Into<String>, applicant_email: &str) -> Self {
        let now = Utc::now();
        Self {
            id: ApplicationId::new(),
            job_id,
            applicant_name: applicant_name.into(),
            applicant_email: normalize_email(applicant_email),
            phone: None,
            cover_letter: None,
            resume_url: None,
            status: ApplicationStatus::Submitted,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_application_defaults() {
        let app = Application::new(JobId::from("j1"), "Ada", "Ada@Example.com");
        assert_eq!(app.status, ApplicationStatus::Submitted);
        assert_eq!(app.applicant_email, "ada@example.com");
        assert!(app.cover_letter.is_none());
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Reviewed).unwrap(),
            "\"reviewed\""
        );
    }
}
