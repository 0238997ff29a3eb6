use chrono::{DateTime, Utc};
use futures::future::join_all;
use shopfront_core::models::{AssetCategory, TempAsset};
use shopfront_core::AppError;
use shopfront_storage::keys::{
    file_name, final_key, is_staging_key, staging_key, staging_key_in_url,
};
use shopfront_storage::{Storage, StorageError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use super::registry::SessionRegistry;

/// Errors surfaced by [`TempAssetManager::move_to_final`]
#[derive(Debug, Error)]
pub enum PromotionError {
    #[error("Finalize failed for {key}: {source}")]
    FinalizeFailed {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Key {0} is not in the staging area")]
    NotStaged(String),

    #[error("Invalid target name: {0}")]
    InvalidName(String),
}

/// Outcome of deleting a session's staged objects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub session_id: String,
    pub deleted: usize,
    /// Objects whose store delete failed; they are now orphaned
    pub failed: usize,
}

impl CleanupReport {
    fn empty(session_id: &str) -> Self {
        Self {
            session_id: session_id.to_string(),
            deleted: 0,
            failed: 0,
        }
    }
}

/// Stages uploads, promotes them to permanent keys and cleans up abandoned sessions
#[derive(Clone)]
pub struct TempAssetManager {
    storage: Arc<dyn Storage>,
    registry: SessionRegistry,
    max_idle: Duration,
}

impl TempAssetManager {
    pub fn new(storage: Arc<dyn Storage>, registry: SessionRegistry, max_idle: Duration) -> Self {
        Self {
            storage,
            registry,
            max_idle,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn max_idle(&self) -> Duration {
        self.max_idle
    }

    /// Write an upload to `temp-uploads/{category}/{uuid}.{extension}` and
    /// register it under the session.
    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn stage_upload(
        &self,
        session_id: &str,
        category: AssetCategory,
        extension: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<TempAsset, AppError> {
        let filename = format!("{}.{}", Uuid::new_v4(), extension.to_lowercase());
        let key = staging_key(category, &filename);

        let url = self
            .storage
            .upload_with_key(&key, data, content_type)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Failed to stage upload");
                AppError::S3(e.to_string())
            })?;

        let asset = TempAsset {
            key,
            category,
            uploaded_at: Utc::now(),
            url,
        };
        self.registry.register(session_id, asset.clone());

        tracing::info!(key = %asset.key, "Temporary asset staged");

        Ok(asset)
    }

    /// Record an already staged object under a session. Never fails.
    pub fn register_temp_asset(&self, session_id: &str, key: &str, category: AssetCategory) {
        self.registry.register(
            session_id,
            TempAsset {
                key: key.to_string(),
                category,
                uploaded_at: Utc::now(),
                url: self.storage.public_url(key),
            },
        );
        tracing::debug!(session_id = %session_id, key = %key, "Temporary asset registered");
    }

    /// Promote a staged object to `{category}/{new_name or original file name}`.
    ///
    /// A staged object that no longer exists is not an error: the URL of the
    /// intended final key is returned. Copy failures become
    /// [`PromotionError::FinalizeFailed`]. A second call for the same target
    /// overwrites the first copy.
    #[tracing::instrument(skip(self))]
    pub async fn move_to_final(
        &self,
        key: &str,
        category: AssetCategory,
        new_name: Option<&str>,
    ) -> Result<String, PromotionError> {
        if !is_staging_key(key) {
            return Err(PromotionError::NotStaged(key.to_string()));
        }

        let name = new_name.unwrap_or_else(|| file_name(key));
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return Err(PromotionError::InvalidName(name.to_string()));
        }
        let target = final_key(category, name);
        let start = Instant::now();

        let staged = self
            .storage
            .exists(key)
            .await
            .map_err(|source| PromotionError::FinalizeFailed {
                key: key.to_string(),
                source,
            })?;

        if !staged {
            tracing::warn!(
                key = %key,
                target = %target,
                "Staged object missing, returning best-effort URL"
            );
            self.registry.forget_key(key);
            return Ok(self.storage.public_url(&target));
        }

        let url = match self.storage.copy(key, &target).await {
            Ok(url) => url,
            Err(StorageError::NotFound(_)) => {
                // Removed by a concurrent cleanup after the existence check
                tracing::warn!(
                    key = %key,
                    target = %target,
                    "Staged object vanished during promotion, returning best-effort URL"
                );
                self.registry.forget_key(key);
                return Ok(self.storage.public_url(&target));
            }
            Err(source) => {
                tracing::error!(error = %source, key = %key, target = %target, "Promotion copy failed");
                return Err(PromotionError::FinalizeFailed {
                    key: key.to_string(),
                    source,
                });
            }
        };

        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(
                error = %e,
                key = %key,
                "Failed to delete staged copy after promotion"
            );
        }
        self.registry.forget_key(key);

        tracing::info!(
            key = %key,
            target = %target,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Asset promoted"
        );

        Ok(url)
    }

    /// Resolve the staging key behind a URL, if it points into the staging area
    pub fn staged_key_for_url(&self, url: &str) -> Option<String> {
        self.storage
            .key_from_url(url)
            .filter(|key| is_staging_key(key))
            .or_else(|| staging_key_in_url(url))
    }

    /// Promote `url` when it references a staged object; any other URL is
    /// returned unchanged. Promotion failures are logged and the original
    /// URL is kept so entity creation is never blocked by one image.
    pub async fn promote_url(&self, url: &str, category: AssetCategory) -> String {
        let Some(key) = self.staged_key_for_url(url) else {
            return url.to_string();
        };

        match self.move_to_final(&key, category, None).await {
            Ok(final_url) => final_url,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    url = %url,
                    category = %category,
                    "Asset promotion failed, keeping staged URL"
                );
                url.to_string()
            }
        }
    }

    /// [`promote_url`](Self::promote_url) for a list, preserving order
    pub async fn promote_urls(&self, urls: &[String], category: AssetCategory) -> Vec<String> {
        join_all(urls.iter().map(|url| self.promote_url(url, category))).await
    }

    /// Delete one staged object owned by the session and forget it
    #[tracing::instrument(skip(self))]
    pub async fn discard_temp_asset(&self, session_id: &str, key: &str) -> Result<(), AppError> {
        if !self.registry.contains_key(session_id, key) {
            return Err(AppError::NotFound(format!(
                "Staged asset {} not found in this session",
                key
            )));
        }

        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(error = %e, key = %key, "Failed to delete discarded asset");
        }
        self.registry.forget_session_key(session_id, key);

        Ok(())
    }

    /// Delete every staged object of the session and drop the session.
    /// Deletes run independently; failures are logged and counted, never
    /// returned. Cleaning an unknown session is a no-op.
    #[tracing::instrument(skip(self))]
    pub async fn cleanup_session(&self, session_id: &str) -> CleanupReport {
        let Some(assets) = self.registry.take_session(session_id) else {
            tracing::debug!("No staged assets to clean up");
            return CleanupReport::empty(session_id);
        };

        let report = self.delete_assets(session_id, assets).await;

        tracing::info!(
            deleted = report.deleted,
            failed = report.failed,
            "Upload session cleaned up"
        );

        report
    }

    async fn delete_assets(&self, session_id: &str, mut assets: Vec<TempAsset>) -> CleanupReport {
        assets.sort_by(|a, b| a.key.cmp(&b.key));
        assets.dedup_by(|a, b| a.key == b.key);

        let results = join_all(assets.iter().map(|asset| async move {
            let result = self.storage.delete(&asset.key).await;
            if let Err(ref e) = result {
                tracing::error!(
                    error = %e,
                    session_id = %session_id,
                    key = %asset.key,
                    "Failed to delete staged asset, leaving it orphaned"
                );
            }
            result
        }))
        .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        CleanupReport {
            session_id: session_id.to_string(),
            deleted: results.len() - failed,
            failed,
        }
    }

    pub fn mark_session_active(&self, session_id: &str) {
        self.registry.mark_active(session_id);
    }

    pub fn mark_session_inactive(&self, session_id: &str) {
        self.registry.mark_inactive(session_id);
    }

    pub fn is_session_active(&self, session_id: &str) -> bool {
        self.registry.is_active(session_id)
    }

    /// Mark the session active until the returned guard is dropped
    pub fn activate(&self, session_id: &str) -> ActiveSessionGuard {
        self.registry.mark_active(session_id);
        ActiveSessionGuard {
            registry: self.registry.clone(),
            session_id: session_id.to_string(),
        }
    }

    /// Clean up every session idle past `max_idle` that is not active.
    /// Returns the number of sessions swept.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let expired = self.registry.take_expired(now, self.max_idle);
        let swept = expired.len();

        for (session_id, assets) in expired {
            let report = self.delete_assets(&session_id, assets).await;
            tracing::info!(
                session_id = %report.session_id,
                deleted = report.deleted,
                failed = report.failed,
                "Idle upload session swept"
            );
        }

        swept
    }
}

/// Keeps a session out of the idle sweep while promotions are in flight
pub struct ActiveSessionGuard {
    registry: SessionRegistry,
    session_id: String,
}

impl ActiveSessionGuard {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl Drop for ActiveSessionGuard {
    fn drop(&mut self) {
        self.registry.mark_inactive(&self.session_id);
    }
}
