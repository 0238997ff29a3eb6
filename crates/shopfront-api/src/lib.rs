//! Shopfront API Library
//!
//! This crate provides the HTTP API handlers, middleware, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod middleware;
pub mod setup;
pub mod state;

// Re-exports
pub use error::ErrorResponse;
pub use middleware::UploadSessionId;
pub use state::AppState;
