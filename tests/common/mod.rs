//! Common test utilities for integration tests
//!
//! This module provides shared setup and teardown for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use calorie_tracker_backend::{config::AppConfig, routes, state::AppState};
use mongodb::bson::oid::ObjectId;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub db: Database,
}

impl TestApp {
    /// Create a new test application with a real document store
    ///
    /// Each instance gets its own uniquely named database so tests never
    /// observe each other's documents.
    pub async fn new() -> Self {
        let config = test_config();

        let options = ClientOptions::parse(&config.store.url)
            .await
            .expect("Failed to parse test store URL");
        let client = Client::with_options(options).expect("Failed to build test client");
        let db = client.database(&format!("caloriesdb_test_{}", ObjectId::new().to_hex()));

        let state = AppState::new(db.clone(), config);
        let app = routes::create_router(state);

        Self { app, db }
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request("GET", path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.request("POST", path, Some(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put(&self, path: &str, body: &str) -> (StatusCode, String) {
        self.request("PUT", path, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.request("DELETE", path, None).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if body.is_some() {
            builder = builder.header("Content-Type", "application/json");
        }
        let request = builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, body_str)
    }

    /// Clean up test data
    pub async fn cleanup(&self) {
        self.db.drop().await.ok();
    }
}

/// Build the configuration used by integration tests
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var("TEST_MONGODB_URL") {
        config.store.url = url;
    }
    config
}
