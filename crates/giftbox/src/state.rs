//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::flow::FlowController;
use crate::scan::SecretVerifier;
use crate::store::{ConfigurationStore, FileStore, KeyValueStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Quiz questions and PIN in the persistent store
    pub quiz_config: ConfigurationStore,

    /// Scan secret verifier
    pub verifier: Arc<SecretVerifier>,
}

impl AppState {
    /// Create application state, opening the store file
    pub fn new(config: AppConfig) -> Result<Self> {
        let store = FileStore::open(&config.store_path).with_context(|| {
            format!("Failed to open store at {}", config.store_path.display())
        })?;
        tracing::debug!(path = %store.path().display(), "Store ready");

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Create application state over an existing store
    pub fn with_store(config: AppConfig, store: Arc<dyn KeyValueStore>) -> Self {
        let quiz_config = ConfigurationStore::new(store);
        let verifier = Arc::new(SecretVerifier::new(config.scan_secret.clone()));

        Self {
            config,
            quiz_config,
            verifier,
        }
    }

    /// A new session, starting in `Scan`
    pub fn flow_controller(&self) -> FlowController {
        FlowController::new(self.verifier.clone(), self.quiz_config.clone())
    }
}
