//! Typed repository for job applications.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use jdesk_models::{Application, ApplicationId, ApplicationStatus, JobId};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};

const COLLECTION: &str = "applications";

/// Repository for submitted applications.
pub struct ApplicationRepository {
    client: FirestoreClient,
}

impl ApplicationRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Get an application by ID.
    pub async fn get(&self, application_id: &ApplicationId) -> FirestoreResult<Option<Application>> {
        let doc = self
            .client
            .get_document(COLLECTION, application_id.as_str())
            .await?;
        doc.map(|d| document_to_application(&d)).transpose()
    }

    /// Persist a new submission.
    pub async fn create(&self, application: &Application) -> FirestoreResult<()> {
        self.client
            .create_document(
                COLLECTION,
                application.id.as_str(),
                application_to_fields(application),
            )
            .await?;
        info!(
            "Stored application {} for job {}",
            application.id, application.job_id
        );
        Ok(())
    }

    /// List applications for one posting, newest first.
    pub async fn list_for_job(
        &self,
        job_id: &JobId,
        limit: u32,
    ) -> FirestoreResult<Vec<Application>> {
        let query = StructuredQuery::collection(COLLECTION)
            .with_equalities(vec![(
                "job_id",
                Value::StringValue(job_id.as_str().to_string()),
            )])
            .order_desc("created_at")
            .with_limit(limit.max(1));

        let docs = self.client.run_query(query).await?;
        docs.iter().map(document_to_application).collect()
    }

    /// Move an application to a new review status.
    pub async fn update_status(
        &self,
        application_id: &ApplicationId,
        status: ApplicationStatus,
    ) -> FirestoreResult<()> {
        let mut fields = HashMap::new();
        fields.insert("status".to_string(), status.as_str().to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                COLLECTION,
                application_id.as_str(),
                fields,
                Some(vec!["status".to_string(), "updated_at".to_string()]),
            )
            .await?;
        Ok(())
    }
}

fn application_to_fields(application: &Application) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), application.id.as_str().to_firestore_value());
    fields.insert(
        "job_id".to_string(),
        application.job_id.as_str().to_firestore_value(),
    );
    fields.insert(
        "applicant_name".to_string(),
        application.applicant_name.to_firestore_value(),
    );
    fields.insert(
        "applicant_email".to_string(),
        application.applicant_email.to_firestore_value(),
    );
    if let Some(ref phone) = application.phone {
        fields.insert("phone".to_string(), phone.to_firestore_value());
    }
    if let Some(ref cover_letter) = application.cover_letter {
        fields.insert("cover_letter".to_string(), cover_letter.to_firestore_value());
    }
    if let Some(ref resume_url) = application.resume_url {
        fields.insert("resume_url".to_string(), resume_url.to_firestore_value());
    }
    fields.insert(
        "status".to_string(),
        application.status.as_str().to_firestore_value(),
    );
    fields.insert(
        "created_at".to_string(),
        application.created_at.to_firestore_value(),
    );
    fields.insert(
        "updated_at".to_string(),
        application.updated_at.to_firestore_value(),
    );
    fields
}

fn document_to_application(doc: &Document) -> FirestoreResult<Application> {
    let get_string =
        |key: &str| -> Option<String> { doc.field(key).and_then(String::from_firestore_value) };

    let id = get_string("id")
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| {
            FirestoreError::InvalidResponse("application document missing id".to_string())
        })?;

    let job_id = get_string("job_id").ok_or_else(|| {
        FirestoreError::InvalidResponse("application document missing job_id".to_string())
    })?;

    let status = match get_string("status").as_deref() {
        Some("reviewed") => ApplicationStatus::Reviewed,
        Some("accepted") => ApplicationStatus::Accepted,
        Some("rejected") => ApplicationStatus::Rejected,
        _ => ApplicationStatus::Submitted,
    };

    Ok(Application {
        id: ApplicationId::from(id),
        job_id: JobId::from(job_id),
        applicant_name: get_string("applicant_name").unwrap_or_default(),
        applicant_email: get_string("applicant_email").unwrap_or_default(),
        phone: get_string("phone"),
        cover_letter: get_string("cover_letter"),
        resume_url: get_string("resume_url"),
        status,
        created_at: doc
            .field("created_at")
            .and_then(DateTime::<Utc>::from_firestore_value)
            .unwrap_or_else(Utc::now),
        updated_at: doc
            .field("updated_at")
            .and_then(DateTime::<Utc>::from_firestore_value)
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_round_trip() {
        let mut application = Application::new(JobId::from("j1"), "Ada", "ada@example.com");
        application.cover_letter = Some("Hello".to_string());

        let parsed =
            document_to_application(&Document::new(application_to_fields(&application))).unwrap();
        assert_eq!(parsed.job_id, JobId::from("j1"));
        assert_eq!(parsed.status, ApplicationStatus::Submitted);
        assert_eq!(parsed.cover_letter.as_deref(), Some("Hello"));
        assert!(parsed.phone.is_none());
    }

    #[test]
    fn test_missing_job_id_is_an_error() {
        let application = Application::new(JobId::from("j1"), "Ada", "ada@example.com");
        let mut fields = application_to_fields(&application);
        fields.remove("job_id");
        assert!(matches!(
            document_to_application(&Document::new(fields)),
            Err(FirestoreError::InvalidResponse(_))
        ));
    }
}
