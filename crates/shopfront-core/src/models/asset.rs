use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::{IntoParams, ToSchema};

/// Logical category of an uploaded image.
///
/// The category decides both the staging prefix (`temp-uploads/{category}/`)
/// and the permanent namespace (`{category}/`) an asset is promoted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum AssetCategory {
    #[serde(rename = "products")]
    Product,
    #[serde(rename = "hero")]
    Hero,
    #[serde(rename = "categories")]
    Category,
}

impl AssetCategory {
    /// Path segment used for both the staging and the permanent namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::Product => "products",
            AssetCategory::Hero => "hero",
            AssetCategory::Category => "categories",
        }
    }
}

impl Display for AssetCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// One uploaded-but-not-yet-committed object owned by an upload session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TempAsset {
    /// Staging key in the object store
    pub key: String,
    pub category: AssetCategory,
    pub uploaded_at: DateTime<Utc>,
    /// Public URL of the staged object
    pub url: String,
}

/// Response returned by the temporary upload endpoints
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TempUploadResponse {
    /// Temporary public URL; submit it with the entity form
    pub url: String,
    /// Staging key in the object store
    pub key: String,
    /// Upload session the asset was registered under
    pub session_id: String,
    pub category: AssetCategory,
}

impl TempUploadResponse {
    pub fn new(asset: TempAsset, session_id: String) -> Self {
        Self {
            url: asset.url,
            key: asset.key,
            session_id,
            category: asset.category,
        }
    }
}

/// Manual cleanup request. When `session_id` is omitted the session header is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CleanupRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CleanupResponse {
    pub success: bool,
    pub session_id: String,
    /// Number of staged objects deleted from storage
    pub deleted: usize,
    /// Number of staged objects whose deletion failed (left orphaned)
    pub failed: usize,
}

/// Query for discarding a single staged asset
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiscardQuery {
    /// Staging key returned by the upload endpoint
    pub key: String,
}
