//! Document store connection management
//!
//! This module owns the MongoDB client and hands out collection handles.
//! The client pools connections internally and is safe to share across
//! concurrent request tasks; its lifetime is the process lifetime.

use crate::config::StoreConfig;
use crate::repositories::Entry;
use anyhow::Result;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed database holding all tracker collections
pub const DATABASE_NAME: &str = "caloriesdb";

/// Collection storing meal entries
pub const ENTRIES_COLLECTION: &str = "calories";

/// Connect to the document store and return a handle to the fixed database
///
/// Issues a `ping` so a dead store fails here rather than on the first
/// request. Connection failure at this point is fatal to the process:
/// the service has no function without storage.
pub async fn connect(config: &StoreConfig) -> Result<Database> {
    let mut options = ClientOptions::parse(&config.url).await?;
    options.app_name = Some("calorie-tracker".to_string());
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(config.connect_timeout_secs));

    let client = Client::with_options(options)?;
    let db = client.database(DATABASE_NAME);

    db.run_command(doc! { "ping": 1 }).await?;

    info!("Connected to MongoDB");

    Ok(db)
}

/// Typed handle to the entries collection
///
/// Resolution is local and lazy; the store validates existence implicitly
/// on first use.
pub fn entries_collection(db: &Database) -> Collection<Entry> {
    db.collection(ENTRIES_COLLECTION)
}

/// Check document store health
pub async fn health_check(db: &Database) -> Result<()> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!("Store health check failed: {}", e);
            e.into()
        })
}
