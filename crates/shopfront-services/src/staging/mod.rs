//! Staged upload lifecycle
//!
//! ```text
//! upload ──► temp-uploads/{category}/{name}   (registered under a session)
//!              │
//!              ├─ promote ──► {category}/{name}   record removed
//!              ├─ discard / cleanup ──► deleted   record removed
//!              └─ sweep (idle, not active) ──► deleted
//! ```
//!
//! A record whose store delete fails is dropped anyway; the object stays
//! orphaned in the bucket.

mod manager;
mod registry;
mod sweeper;

pub use manager::{ActiveSessionGuard, CleanupReport, PromotionError, TempAssetManager};
pub use registry::SessionRegistry;
pub use sweeper::{SessionSweeper, SweeperHandle};
