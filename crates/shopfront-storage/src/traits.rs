//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Copy failed: {0}")]
    CopyFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// The staging service only talks to this trait, so tests can run against the
/// local backend in a temp directory.
///
/// **Key format:** see the crate root documentation.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data to a specific storage key, overwriting any existing object.
    /// Returns the public URL for the uploaded file.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Delete a file by its storage key. Deleting a missing key succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Copy a file from one key to another, overwriting the destination.
    /// Returns the public URL of the destination.
    async fn copy(&self, from_key: &str, to_key: &str) -> StorageResult<String>;

    /// Deterministic public URL for a key. Performs no I/O.
    fn public_url(&self, storage_key: &str) -> String;

    /// Inverse of [`Storage::public_url`] for URLs produced by this backend
    fn key_from_url(&self, url: &str) -> Option<String> {
        let base = self.public_url("");
        let key = url.strip_prefix(base.as_str())?;
        let key = key.split(['?', '#']).next().unwrap_or(key);
        if key.is_empty() {
            return None;
        }
        urlencoding::decode(key).ok().map(|k| k.into_owned())
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
