//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::Result;
use shopfront_core::Config;
use shopfront_services::SweeperHandle;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router, SweeperHandle)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(&config.server)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.server.environment,
        storage_backend = %config.storage.backend,
        "Configuration loaded"
    );

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage
    let storage = storage::setup_storage(&config).await?;

    // Initialize state and background tasks
    let state = services::initialize_services(&config, pool, storage);
    let sweeper = services::start_session_sweeper(&config, &state);

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router, sweeper))
}
