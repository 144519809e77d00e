//! Typed repositories for jobs, companies and categories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use jdesk_models::{Category, CategoryId, Company, CompanyId, Job, JobId, JobType};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};

const JOBS: &str = "jobs";
const COMPANIES: &str = "companies";
const CATEGORIES: &str = "categories";

// =============================================================================
// Jobs
// =============================================================================

/// Filter for job listing queries.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub category_id: Option<CategoryId>,
    pub company_id: Option<CompanyId>,
    pub job_type: Option<JobType>,
    /// Case-insensitive substring match on title/location, applied after
    /// the structured query (Firestore has no full-text search).
    pub search: Option<String>,
    /// Admin views also see deactivated postings.
    pub include_inactive: bool,
    pub limit: u32,
    pub offset: u32,
}

/// Repository for job postings.
pub struct JobRepository {
    client: FirestoreClient,
}

impl JobRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Get a job by ID.
    pub async fn get(&self, job_id: &JobId) -> FirestoreResult<Option<Job>> {
        let doc = self.client.get_document(JOBS, job_id.as_str()).await?;
        doc.map(|d| document_to_job(&d)).transpose()
    }

    /// Create a new posting.
    pub async fn create(&self, job: &Job) -> FirestoreResult<()> {
        self.client
            .create_document(JOBS, job.id.as_str(), job_to_fields(job))
            .await?;
        info!("Created job posting: {}", job.id);
        Ok(())
    }

    /// Replace all stored fields of a posting.
    pub async fn update(&self, job: &Job) -> FirestoreResult<()> {
        self.client
            .update_document(JOBS, job.id.as_str(), job_to_fields(job), None)
            .await?;
        Ok(())
    }

    /// Delete a posting. Idempotent.
    pub async fn delete(&self, job_id: &JobId) -> FirestoreResult<()> {
        self.client.delete_document(JOBS, job_id.as_str()).await
    }

    /// List postings matching the filter, newest first.
    pub async fn list(&self, filter: &JobFilter) -> FirestoreResult<Vec<Job>> {
        let mut equalities: Vec<(&str, Value)> = Vec::new();
        if !filter.include_inactive {
            equalities.push(("active", Value::BooleanValue(true)));
        }
        if let Some(ref category) = filter.category_id {
            equalities.push(("category_id", Value::StringValue(category.as_str().to_string())));
        }
        if let Some(ref company) = filter.company_id {
            equalities.push(("company_id", Value::StringValue(company.as_str().to_string())));
        }
        if let Some(job_type) = filter.job_type {
            equalities.push(("job_type", Value::StringValue(job_type.as_str().to_string())));
        }

        let mut query = StructuredQuery::collection(JOBS)
            .with_equalities(equalities)
            .order_desc("created_at")
            .with_limit(filter.limit.max(1));
        if filter.offset > 0 {
            query = query.with_offset(filter.offset);
        }

        let docs = self
            .client
            .with_retry("list_jobs", || self.client.run_query(query.clone()))
            .await?;

        let mut jobs = docs
            .iter()
            .map(document_to_job)
            .collect::<FirestoreResult<Vec<_>>>()?;

        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            jobs.retain(|job| {
                job.title.to_lowercase().contains(&needle)
                    || job.location.to_lowercase().contains(&needle)
            });
        }

        Ok(jobs)
    }

    /// Bump the application counter by one and return the new count.
    ///
    /// Read-modify-write on a single document. The write itself is
    /// atomic; concurrent submissions may race the read, acceptable for
    /// a display counter.
    pub async fn increment_application_count(&self, job_id: &JobId) -> FirestoreResult<u32> {
        let doc = self
            .client
            .get_document(JOBS, job_id.as_str())
            .await?
            .ok_or_else(|| FirestoreError::not_found(format!("{}/{}", JOBS, job_id)))?;

        let current = doc
            .field("application_count")
            .and_then(u32::from_firestore_value)
            .unwrap_or(0);
        let new_count = current + 1;

        let mut fields = HashMap::new();
        fields.insert("application_count".to_string(), new_count.to_firestore_value());
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        self.client
            .update_document(
                JOBS,
                job_id.as_str(),
                fields,
                Some(vec!["application_count".to_string(), "updated_at".to_string()]),
            )
            .await?;

        Ok(new_count)
    }

}

// =============================================================================
// Companies
// =============================================================================

/// Repository for company profiles.
pub struct CompanyRepository {
    client: FirestoreClient,
}

impl CompanyRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, company_id: &CompanyId) -> FirestoreResult<Option<Company>> {
        let doc = self.client.get_document(COMPANIES, company_id.as_str()).await?;
        doc.map(|d| document_to_company(&d)).transpose()
    }

    pub async fn create(&self, company: &Company) -> FirestoreResult<()> {
        self.client
            .create_document(COMPANIES, company.id.as_str(), company_to_fields(company))
            .await?;
        info!("Created company: {}", company.id);
        Ok(())
    }

    pub async fn update(&self, company: &Company) -> FirestoreResult<()> {
        self.client
            .update_document(COMPANIES, company.id.as_str(), company_to_fields(company), None)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, company_id: &CompanyId) -> FirestoreResult<()> {
        self.client.delete_document(COMPANIES, company_id.as_str()).await
    }

    /// List companies, paginated, in store order.
    pub async fn list(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> FirestoreResult<(Vec<Company>, Option<String>)> {
        let response = self
            .client
            .list_documents(COMPANIES, Some(page_size), page_token)
            .await?;

        let companies = response
            .documents
            .unwrap_or_default()
            .iter()
            .map(document_to_company)
            .collect::<FirestoreResult<Vec<_>>>()?;

        Ok((companies, response.next_page_token))
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Repository for listing categories.
pub struct CategoryRepository {
    client: FirestoreClient,
}

impl CategoryRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    pub async fn get(&self, category_id: &CategoryId) -> FirestoreResult<Option<Category>> {
        let doc = self.client.get_document(CATEGORIES, category_id.as_str()).await?;
        doc.map(|d| document_to_category(&d)).transpose()
    }

    pub async fn create(&self, category: &Category) -> FirestoreResult<()> {
        self.client
            .create_document(CATEGORIES, category.id.as_str(), category_to_fields(category))
            .await?;
        info!("Created category: {}", category.id);
        Ok(())
    }

    pub async fn delete(&self, category_id: &CategoryId) -> FirestoreResult<()> {
        self.client.delete_document(CATEGORIES, category_id.as_str()).await
    }

    /// List all categories, name order.
    pub async fn list(&self) -> FirestoreResult<Vec<Category>> {
        let query = StructuredQuery::collection(CATEGORIES)
            .order_asc("name")
            .with_limit(200);

        let docs = self
            .client
            .with_retry("list_categories", || self.client.run_query(query.clone()))
            .await?;

        docs.iter().map(document_to_category).collect()
    }
}

// =============================================================================
// Field mapping
// =============================================================================

fn job_to_fields(job: &Job) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), job.id.as_str().to_firestore_value());
    fields.insert("title".to_string(), job.title.to_firestore_value());
    fields.insert("slug".to_string(), job.slug.to_firestore_value());
    fields.insert("description".to_string(), job.description.to_firestore_value());
    fields.insert(
        "company_id".to_string(),
        job.company_id.as_str().to_firestore_value(),
    );
    fields.insert(
        "category_id".to_string(),
        job.category_id.as_str().to_firestore_value(),
    );
    fields.insert("location".to_string(), job.location.to_firestore_value());
    fields.insert("job_type".to_string(), job.job_type.as_str().to_firestore_value());
    if let Some(min) = job.salary_min {
        fields.insert("salary_min".to_string(), min.to_firestore_value());
    }
    if let Some(max) = job.salary_max {
        fields.insert("salary_max".to_string(), max.to_firestore_value());
    }
    fields.insert("active".to_string(), job.active.to_firestore_value());
    fields.insert(
        "application_count".to_string(),
        job.application_count.to_firestore_value(),
    );
    fields.insert("created_at".to_string(), job.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), job.updated_at.to_firestore_value());
    fields
}

fn document_to_job(doc: &Document) -> FirestoreResult<Job> {
    let get_string =
        |key: &str| -> Option<String> { doc.field(key).and_then(String::from_firestore_value) };

    let id = get_string("id")
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| FirestoreError::InvalidResponse("job document missing id".to_string()))?;

    let job_type = match get_string("job_type").as_deref() {
        Some("part_time") => JobType::PartTime,
        Some("contract") => JobType::Contract,
        Some("internship") => JobType::Internship,
        Some("remote") => JobType::Remote,
        _ => JobType::FullTime,
    };

    Ok(Job {
        id: JobId::from(id),
        title: get_string("title").unwrap_or_default(),
        slug: get_string("slug").unwrap_or_default(),
        description: get_string("description").unwrap_or_default(),
        company_id: CompanyId::from(get_string("company_id").unwrap_or_default()),
        category_id: CategoryId::from(get_string("category_id").unwrap_or_default()),
        location: get_string("location").unwrap_or_default(),
        job_type,
        salary_min: doc.field("salary_min").and_then(u32::from_firestore_value),
        salary_max: doc.field("salary_max").and_then(u32::from_firestore_value),
        active: doc
            .field("active")
            .and_then(bool::from_firestore_value)
            .unwrap_or(true),
        application_count: doc
            .field("application_count")
            .and_then(u32::from_firestore_value)
            .unwrap_or(0),
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

fn company_to_fields(company: &Company) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), company.id.as_str().to_firestore_value());
    fields.insert("name".to_string(), company.name.to_firestore_value());
    fields.insert("slug".to_string(), company.slug.to_firestore_value());
    fields.insert(
        "description".to_string(),
        company.description.to_firestore_value(),
    );
    if let Some(ref website) = company.website {
        fields.insert("website".to_string(), website.to_firestore_value());
    }
    if let Some(ref location) = company.location {
        fields.insert("location".to_string(), location.to_firestore_value());
    }
    if let Some(ref logo_url) = company.logo_url {
        fields.insert("logo_url".to_string(), logo_url.to_firestore_value());
    }
    fields.insert(
        "created_at".to_string(),
        company.created_at.to_firestore_value(),
    );
    fields.insert(
        "updated_at".to_string(),
        company.updated_at.to_firestore_value(),
    );
    fields
}

fn document_to_company(doc: &Document) -> FirestoreResult<Company> {
    let get_string =
        |key: &str| -> Option<String> { doc.field(key).and_then(String::from_firestore_value) };

    let id = get_string("id")
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| {
            FirestoreError::InvalidResponse("company document missing id".to_string())
        })?;

    Ok(Company {
        id: CompanyId::from(id),
        name: get_string("name").unwrap_or_default(),
        slug: get_string("slug").unwrap_or_default(),
        description: get_string("description").unwrap_or_default(),
        website: get_string("website"),
        location: get_string("location"),
        logo_url: get_string("logo_url"),
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

fn category_to_fields(category: &Category) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), category.id.as_str().to_firestore_value());
    fields.insert("name".to_string(), category.name.to_firestore_value());
    fields.insert("slug".to_string(), category.slug.to_firestore_value());
    fields.insert(
        "created_at".to_string(),
        category.created_at.to_firestore_value(),
    );
    fields
}

fn document_to_category(doc: &Document) -> FirestoreResult<Category> {
    let get_string =
        |key: &str| -> Option<String> { doc.field(key).and_then(String::from_firestore_value) };

    let id = get_string("id")
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| {
            FirestoreError::InvalidResponse("category document missing id".to_string())
        })?;

    Ok(Category {
        id: CategoryId::from(id),
        name: get_string("name").unwrap_or_default(),
        slug: get_string("slug").unwrap_or_default(),
        created_at: doc
            .field("created_at")
            .and_then(DateTime::<Utc>::from_firestore_value)
            .unwrap_or_else(Utc::now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_fields_round_trip() {
        let mut job = Job::new(
            "Backend Engineer",
            "Ship APIs.",
            CompanyId::from("c1"),
            CategoryId::from("cat1"),
            "Berlin",
            JobType::Contract,
        );
        job.salary_min = Some(60_000);
        job.application_count = 3;

        let doc = Document::new(job_to_fields(&job));
        let parsed = document_to_job(&doc).unwrap();

        assert_eq!(parsed.id, job.id);
        assert_eq!(parsed.slug, "backend-engineer");
        assert_eq!(parsed.job_type, JobType::Contract);
        assert_eq!(parsed.salary_min, Some(60_000));
        assert_eq!(parsed.salary_max, None);
        assert_eq!(parsed.application_count, 3);
    }

    #[test]
    fn test_company_round_trip_optional_fields() {
        let mut company = Company::new("Acme", "Anvils.");
        company.website = Some("https://acme.test".to_string());

        let parsed = document_to_company(&Document::new(company_to_fields(&company))).unwrap();
        assert_eq!(parsed.website.as_deref(), Some("https://acme.test"));
        assert!(parsed.location.is_none());
    }

    #[test]
    fn test_category_round_trip() {
        let category = Category::new("Engineering");
        let parsed = document_to_category(&Document::new(category_to_fields(&category))).unwrap();
        assert_eq!(parsed.slug, "engineering");
    }

    #[test]
    fn test_unknown_job_type_defaults_to_full_time() {
        let job = Job::new(
            "X",
            "Y",
            CompanyId::from("c"),
            CategoryId::from("k"),
            "Z",
            JobType::Remote,
        );
        let mut fields = job_to_fields(&job);
        fields.insert("job_type".to_string(), "gig".to_firestore_value());
        let parsed = document_to_job(&Document::new(fields)).unwrap();
        assert_eq!(parsed.job_type, JobType::FullTime);
    }
}
