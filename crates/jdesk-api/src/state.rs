//! Application state.

use std::sync::Arc;

use jdesk_firestore::FirestoreClient;

use crate::auth::TokenIssuer;
use crate::config::ApiConfig;
use crate::services::UserService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub firestore: Arc<FirestoreClient>,
    pub tokens: Arc<TokenIssuer>,
    pub users: UserService,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let firestore = Arc::new(FirestoreClient::from_env().await?);
        let tokens = Arc::new(TokenIssuer::new(&config.auth));
        let users = UserService::new(Arc::clone(&firestore));

        Ok(Self {
            config,
            firestore,
            tokens,
            users,
        })
    }
}
