//! Typed repository for user documents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::info;

use jdesk_models::{normalize_email, User, UserId, UserRole};

use crate::client::FirestoreClient;
use crate::error::{FirestoreError, FirestoreResult};
use crate::types::{Document, FromFirestoreValue, StructuredQuery, ToFirestoreValue, Value};

const COLLECTION: &str = "users";

/// Repository for user documents.
pub struct UserRepository {
    client: FirestoreClient,
}

impl UserRepository {
    pub fn new(client: FirestoreClient) -> Self {
        Self { client }
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &UserId) -> FirestoreResult<Option<User>> {
        let doc = self.client.get_document(COLLECTION, user_id.as_str()).await?;
        doc.map(|d| document_to_user(&d)).transpose()
    }

    /// Look up a user by email. The email is normalized before comparison;
    /// stored emails are canonical lowercase so equality suffices.
    pub async fn get_by_email(&self, email: &str) -> FirestoreResult<Option<User>> {
        let email = normalize_email(email);
        let query = StructuredQuery::collection(COLLECTION)
            .with_equalities(vec![("email", Value::StringValue(email))])
            .with_limit(1);

        let docs = self.client.run_query(query).await?;
        docs.first().map(document_to_user).transpose()
    }

    /// Create a new user record. Surfaces `AlreadyExists` on an ID clash.
    pub async fn create(&self, user: &User) -> FirestoreResult<()> {
        let fields = user_to_fields(user);
        self.client
            .create_document(COLLECTION, user.id.as_str(), fields)
            .await?;
        info!("Created user record: {}", user.id);
        Ok(())
    }

    /// Replace the stored credential hash.
    pub async fn update_password(&self, user_id: &UserId, password_hash: &str) -> FirestoreResult<()> {
        self.masked_update(
            user_id,
            vec![("password_hash", password_hash.to_firestore_value())],
        )
        .await
    }

    /// Toggle the active flag.
    pub async fn set_active(&self, user_id: &UserId, active: bool) -> FirestoreResult<()> {
        self.masked_update(user_id, vec![("active", active.to_firestore_value())])
            .await
    }

    /// Change the account role.
    pub async fn set_role(&self, user_id: &UserId, role: UserRole) -> FirestoreResult<()> {
        self.masked_update(user_id, vec![("role", role.as_str().to_firestore_value())])
            .await
    }

    /// List users, paginated.
    pub async fn list(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> FirestoreResult<(Vec<User>, Option<String>)> {
        let response = self
            .client
            .list_documents(COLLECTION, Some(page_size), page_token)
            .await?;

        let users = response
            .documents
            .unwrap_or_default()
            .iter()
            .map(document_to_user)
            .collect::<FirestoreResult<Vec<_>>>()?;

        Ok((users, response.next_page_token))
    }

    async fn masked_update(
        &self,
        user_id: &UserId,
        updates: Vec<(&str, Value)>,
    ) -> FirestoreResult<()> {
        let mut fields: HashMap<String, Value> = updates
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        fields.insert("updated_at".to_string(), Utc::now().to_firestore_value());

        let mask = fields.keys().cloned().collect();
        self.client
            .update_document(COLLECTION, user_id.as_str(), fields, Some(mask))
            .await?;
        Ok(())
    }
}

/// Convert a user record to Firestore fields.
fn user_to_fields(user: &User) -> HashMap<String, Value> {
    let mut fields = HashMap::new();
    fields.insert("id".to_string(), user.id.as_str().to_firestore_value());
    fields.insert("name".to_string(), user.name.to_firestore_value());
    fields.insert("email".to_string(), user.email.to_firestore_value());
    fields.insert(
        "password_hash".to_string(),
        user.password_hash.to_firestore_value(),
    );
    fields.insert("role".to_string(), user.role.as_str().to_firestore_value());
    fields.insert("active".to_string(), user.active.to_firestore_value());
    fields.insert("created_at".to_string(), user.created_at.to_firestore_value());
    fields.insert("updated_at".to_string(), user.updated_at.to_firestore_value());
    fields
}

/// Parse a user document.
fn document_to_user(doc: &Document) -> FirestoreResult<User> {
    let get_string = |key: &str| -> Option<String> {
        doc.field(key).and_then(String::from_firestore_value)
    };

    let id = get_string("id")
        .or_else(|| doc.doc_id().map(|s| s.to_string()))
        .ok_or_else(|| FirestoreError::InvalidResponse("user document missing id".to_string()))?;

    let email = get_string("email")
        .ok_or_else(|| FirestoreError::InvalidResponse("user document missing email".to_string()))?;

    let role = match get_string("role").as_deref() {
        Some("admin") => UserRole::Admin,
        _ => UserRole::User,
    };

    Ok(User {
        id: UserId::from(id),
        name: get_string("name").unwrap_or_default(),
        email,
        password_hash: get_string("password_hash").unwrap_or_default(),
        role,
        active: doc
            .field("active")
            .and_then(bool::from_firestore_value)
            .unwrap_or(true),
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

    fn sample_user() -> User {
        User::new("Ada", "ada@example.com", "$argon2id$fake", UserRole::Admin)
    }

    #[test]
    fn test_user_fields_round_trip() {
        let user = sample_user();
        let doc = Document::new(user_to_fields(&user));
        let parsed = document_to_user(&doc).unwrap();

        assert_eq!(parsed.id, user.id);
        assert_eq!(parsed.email, user.email);
        assert_eq!(parsed.role, UserRole::Admin);
        assert!(parsed.active);
        assert_eq!(parsed.password_hash, user.password_hash);
    }

    #[test]
    fn test_missing_email_is_an_error() {
        let mut fields = user_to_fields(&sample_user());
        fields.remove("email");
        let doc = Document::new(fields);
        assert!(matches!(
            document_to_user(&doc),
            Err(FirestoreError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_unknown_role_defaults_to_user() {
        let mut fields = user_to_fields(&sample_user());
        fields.insert("role".to_string(), "superuser".to_firestore_value());
        let parsed = document_to_user(&Document::new(fields)).unwrap();
        assert_eq!(parsed.role, UserRole::User);
    }
}
