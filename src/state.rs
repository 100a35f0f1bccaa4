use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::{DatabaseManager, TaskRepository, TaskStore};
use crate::services::ChangeFeed;

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub tasks: Arc<TaskRepository>,
    pub store: Arc<dyn TaskStore>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, verifier: TokenVerifier, subscription_buffer: usize) -> Self {
        let feed = ChangeFeed::new(subscription_buffer);
        Self {
            tasks: Arc::new(TaskRepository::new(store.clone(), feed)),
            store,
            verifier: Arc::new(verifier),
        }
    }

    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let store = DatabaseManager::connect(&config.database).await?;
        let verifier = TokenVerifier::from_config(&config.auth).await?;
        Ok(Self::new(store, verifier, config.api.subscription_buffer))
    }
}
