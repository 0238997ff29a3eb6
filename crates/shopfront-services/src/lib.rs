//! Shopfront Services Layer
//!
//! Hosts the staged-upload lifecycle: the per-session registry of temporary
//! assets, promotion into permanent storage, cleanup and the idle-session
//! sweeper. Keep HTTP handling in shopfront-api.

pub mod staging;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use shopfront_storage::{create_storage, Storage, StorageBackend, StorageError, StorageResult};
pub use staging::{
    ActiveSessionGuard, CleanupReport, PromotionError, SessionRegistry, SessionSweeper,
    SweeperHandle, TempAssetManager,
};
