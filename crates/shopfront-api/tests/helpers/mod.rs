//! Test helpers: build AppState and router for integration tests.
//!
//! Storage is a local directory in a temp dir and the catalog lives in memory,
//! so no database or bucket is required: `cargo test -p shopfront-api`.

pub mod catalog;
pub mod fixtures;
pub mod uploads;

use axum_test::TestServer;
use shopfront_api::constants;
use shopfront_api::setup::routes;
use shopfront_api::state::AppState;
use shopfront_core::Config;
use shopfront_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const ASSET_BASE_URL: &str = "http://localhost:4000/assets";

/// API path prefix for tests (e.g. `/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server, state, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub storage: Arc<dyn Storage>,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub async fn object_exists(&self, key: &str) -> bool {
        self.storage.exists(key).await.expect("exists check")
    }
}

pub fn create_test_config(storage_path: &str, max_file_size_mb: &str) -> Config {
    let vars = [
        ("DATABASE_URL", "postgres://localhost/shopfront_test"),
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", storage_path),
        ("LOCAL_STORAGE_BASE_URL", ASSET_BASE_URL),
        ("MAX_FILE_SIZE_MB", max_file_size_mb),
    ];
    Config::from_lookup(|key| {
        vars.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
    .expect("valid test config")
}

/// Setup test app with local storage and an in-memory catalog.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_limit("5").await
}

pub async fn setup_test_app_with_limit(max_file_size_mb: &str) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&storage_path, ASSET_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let config = create_test_config(&storage_path, max_file_size_mb);
    let catalog = Arc::new(catalog::InMemoryCatalog::default());
    let state = Arc::new(AppState::new(config.clone(), storage.clone(), catalog));

    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router.into_make_service()).expect("Failed to start test server");

    TestApp {
        server,
        state,
        storage,
        _temp_dir: temp_dir,
    }
}
