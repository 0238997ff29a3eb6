//! Application state shared by all handlers.

use shopfront_core::Config;
use shopfront_db::CatalogRepository;
use shopfront_services::{SessionRegistry, Storage, TempAssetManager};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
    /// Staged upload lifecycle (registry, promotion, cleanup)
    pub assets: TempAssetManager,
    pub catalog: Arc<dyn CatalogRepository>,
}

impl AppState {
    pub fn new(
        config: Config,
        storage: Arc<dyn Storage>,
        catalog: Arc<dyn CatalogRepository>,
    ) -> Self {
        let assets = TempAssetManager::new(
            storage.clone(),
            SessionRegistry::new(),
            config.staging.max_idle(),
        );

        Self {
            config,
            storage,
            assets,
            catalog,
        }
    }
}
