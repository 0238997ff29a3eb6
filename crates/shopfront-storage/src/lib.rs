//! Shopfront Storage Library
//!
//! This crate provides the storage abstraction used for product, hero and
//! category images, with implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! - **Staged uploads**: `temp-uploads/{category}/{filename}`
//! - **Promoted assets**: `{category}/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in the
//! `keys` module so all backends and the staging service stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use shopfront_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
