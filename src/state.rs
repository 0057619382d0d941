//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Construct resources once**: the store handle and repository are
//!    created at startup, not at load time via process-wide globals
//! 2. **Cheap cloning**: all fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: state is read-only during request handling

use crate::config::AppConfig;
use crate::repositories::EntryRepository;
use mongodb::Database;
use std::sync::Arc;
use std::time::Duration;

/// Shared application state
///
/// This struct holds all shared resources that handlers need access to.
/// All fields are designed for cheap cloning across async tasks.
///
/// # Performance
///
/// - `db`: the driver handle is internally Arc'd, cloning is O(1)
/// - `entries`: wraps a collection handle, cloning is O(1)
/// - `config`: wrapped in Arc, cloning is O(1)
#[derive(Clone)]
pub struct AppState {
    /// Document store database handle
    pub db: Database,
    /// Entry repository bound to the entries collection
    pub entries: EntryRepository,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new application state
    ///
    /// The repository is constructed here with its collection handle and
    /// per-operation timeout, so handlers never reach for globals.
    pub fn new(db: Database, config: AppConfig) -> Self {
        let entries = EntryRepository::new(
            &db,
            Duration::from_secs(config.store.operation_timeout_secs),
        );

        Self {
            db,
            entries,
            config: Arc::new(config),
        }
    }

    /// Get a reference to the database handle
    #[inline]
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Get a reference to the entry repository
    #[inline]
    pub fn entries(&self) -> &EntryRepository {
        &self.entries
    }

    /// Get a reference to the configuration
    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::options::ClientOptions;
    use mongodb::Client;

    #[tokio::test]
    async fn test_state_clone_is_cheap() {
        // This test ensures our state design allows cheap cloning.
        // The driver connects lazily, so no store needs to be running.
        let config = AppConfig::default();
        let options = ClientOptions::parse(&config.store.url).await.unwrap();
        let client = Client::with_options(options).unwrap();
        let state = AppState::new(client.database(crate::db::DATABASE_NAME), config);

        // Clone should be O(1) - just Arc increments
        let _cloned = state.clone();
    }

    #[tokio::test]
    async fn test_repository_timeout_comes_from_config() {
        let mut config = AppConfig::default();
        config.store.operation_timeout_secs = 42;
        let options = ClientOptions::parse(&config.store.url).await.unwrap();
        let client = Client::with_options(options).unwrap();
        let state = AppState::new(client.database(crate::db::DATABASE_NAME), config);

        assert_eq!(state.config().store.operation_timeout_secs, 42);
        let _repo = state.entries().clone();
    }
}
