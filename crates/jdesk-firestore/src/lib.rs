//! Firestore REST API client for the JobDesk backend.
//!
//! This crate provides:
//! - Typed repositories for users, jobs, companies, categories and applications
//! - Service account authentication via gcp_auth
//! - Token caching with single-flight refresh
//! - Merge updates, structured queries and retry logic

pub mod application_repo;
pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod retry;
pub mod token_cache;
pub mod types;
pub mod user_repo;

pub use application_repo::ApplicationRepository;
pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use repos::{CategoryRepository, CompanyRepository, JobFilter, JobRepository};
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
pub use user_repo::UserRepository;
