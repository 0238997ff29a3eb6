//! Application state and background tasks

use crate::state::AppState;
use shopfront_core::Config;
use shopfront_db::PgCatalogRepository;
use shopfront_services::{SessionSweeper, Storage, SweeperHandle};
use sqlx::PgPool;
use std::sync::Arc;

/// Wire repositories and services into the shared application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Arc<AppState> {
    let catalog = Arc::new(PgCatalogRepository::new(pool));
    Arc::new(AppState::new(config.clone(), storage, catalog))
}

/// Start the idle upload session sweeper; stop it with [`SweeperHandle::shutdown`]
pub fn start_session_sweeper(config: &Config, state: &AppState) -> SweeperHandle {
    SessionSweeper::new(state.assets.clone(), config.staging.sweep_interval()).start()
}
