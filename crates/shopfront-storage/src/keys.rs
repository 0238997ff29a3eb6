//! Shared key generation for storage backends.
//!
//! Staged uploads live under `temp-uploads/{category}/`, promoted assets under
//! `{category}/`. The staging service detects staged URLs by the same prefix.

use crate::traits::{StorageError, StorageResult};
use shopfront_core::models::AssetCategory;

/// Namespace prefix for not-yet-committed uploads
pub const STAGING_PREFIX: &str = "temp-uploads";

/// Staging key for a freshly uploaded file: `temp-uploads/{category}/{filename}`
pub fn staging_key(category: AssetCategory, filename: &str) -> String {
    format!("{}/{}/{}", STAGING_PREFIX, category.as_str(), filename)
}

/// Permanent key for a promoted file: `{category}/{filename}`
pub fn final_key(category: AssetCategory, filename: &str) -> String {
    format!("{}/{}", category.as_str(), filename)
}

/// Whether the key points into the staging namespace
pub fn is_staging_key(key: &str) -> bool {
    key.strip_prefix(STAGING_PREFIX)
        .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
}

/// Last path segment of a key
pub fn file_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Extract a staging key from any URL whose path contains `/temp-uploads/`.
///
/// Used as a fallback when a URL was not produced by the configured backend
/// (e.g. a CDN host in front of the bucket).
pub fn staging_key_in_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let marker = format!("/{}/", STAGING_PREFIX);
    let start = path.find(&marker)? + 1;
    let key = &path[start..];
    let key = urlencoding::decode(key).ok()?.into_owned();
    is_staging_key(&key).then_some(key)
}

/// Reject keys that could escape the storage namespace
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key '{}' contains invalid characters",
            key
        )));
    }
    Ok(())
}
