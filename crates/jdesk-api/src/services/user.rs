//! User service: account creation, login verification, admin management.

use std::sync::Arc;

use tracing::{info, warn};

use jdesk_firestore::{FirestoreClient, FirestoreError, UserRepository};
use jdesk_models::{normalize_email, User, UserId, UserRole};

use crate::auth::{hash_password, verify_password};
use crate::error::{ApiError, ApiResult};

/// User service over the Firestore user collection.
#[derive(Clone)]
pub struct UserService {
    firestore: Arc<FirestoreClient>,
}

impl UserService {
    /// Create a new user service.
    pub fn new(firestore: Arc<FirestoreClient>) -> Self {
        Self { firestore }
    }

    fn repo(&self) -> UserRepository {
        UserRepository::new((*self.firestore).clone())
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &UserId) -> ApiResult<Option<User>> {
        Ok(self.repo().get(user_id).await?)
    }

    /// Get a user by email (normalized before lookup).
    pub async fn get_by_email(&self, email: &str) -> ApiResult<Option<User>> {
        Ok(self.repo().get_by_email(email).await?)
    }

    /// Create an account from a plaintext secret.
    ///
    /// Hashing happens here, before any document is written; a hashing
    /// failure aborts the whole save. A taken email is reported as a
    /// duplicate regardless of whether the duplicate surfaces from the
    /// pre-check or from the create itself.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> ApiResult<User> {
        let email = normalize_email(email);

        if self.repo().get_by_email(&email).await?.is_some() {
            return Err(ApiError::duplicate(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let password_hash = hash_password(password)?;
        let user = User::new(name, &email, password_hash, role);

        match self.repo().create(&user).await {
            Ok(()) => {
                info!("Created {} account {}", user.role, user.id);
                Ok(user)
            }
            Err(FirestoreError::AlreadyExists(_)) => Err(ApiError::duplicate(format!(
                "A user with email {} already exists",
                email
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Verify a login attempt.
    ///
    /// Unknown email and wrong password both produce the same
    /// `InvalidCredentials` error; a disabled account with correct
    /// credentials produces `AccountDisabled`.
    pub async fn verify_login(&self, email: &str, password: &str) -> ApiResult<User> {
        let user = match self.repo().get_by_email(email).await? {
            Some(user) => user,
            None => {
                // Burn a verification anyway so the timing of the reply
                // does not reveal whether the account exists
                let _ = verify_password(password, DUMMY_HASH);
                return Err(ApiError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        if !user.active {
            warn!("Login attempt on disabled account {}", user.id);
            return Err(ApiError::AccountDisabled);
        }

        Ok(user)
    }

    /// Rotate the account secret after re-verifying the current one.
    ///
    /// Hashing failure aborts before any write, so the stored hash is
    /// either the old one or the new one, never anything else.
    pub async fn change_password(
        &self,
        user_id: &UserId,
        current: &str,
        new: &str,
    ) -> ApiResult<()> {
        let user = self
            .repo()
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized("Session no longer valid"))?;

        if !verify_password(current, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        let password_hash = hash_password(new)?;
        self.repo().update_password(user_id, &password_hash).await?;
        info!("User {} changed password", user_id);
        Ok(())
    }

    /// List users, paginated.
    pub async fn list(
        &self,
        page_size: u32,
        page_token: Option<&str>,
    ) -> ApiResult<(Vec<User>, Option<String>)> {
        Ok(self.repo().list(page_size, page_token).await?)
    }

    /// Toggle the active flag. Returns the updated record.
    pub async fn set_active(&self, user_id: &UserId, active: bool) -> ApiResult<User> {
        let mut user = self
            .repo()
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        self.repo().set_active(user_id, active).await?;
        info!("Set user {} active={}", user_id, active);
        user.active = active;
        Ok(user)
    }

    /// Change the account role. Returns the updated record.
    pub async fn set_role(&self, user_id: &UserId, role: UserRole) -> ApiResult<User> {
        let mut user = self
            .repo()
            .get(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        self.repo().set_role(user_id, role).await?;
        info!("Set user {} role={}", user_id, role);
        user.role = role;
        Ok(user)
    }
}

/// Valid argon2id hash of an unguessable throwaway string, verified
/// against when the account does not exist (see `verify_login`).
const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$wJ7kP2VmTqzFhLxYcN8d1g$K8HtZyPzqT1mPzV9PqPzV9PqPzV9PqPzV9PqPzV9PqQ";
