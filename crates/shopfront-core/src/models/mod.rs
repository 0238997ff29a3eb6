//! Domain models
//!
//! `asset` holds the temporary asset staging types; `catalog` holds the thin
//! product and advertisement entities that reference staged or permanent images.

pub mod asset;
pub mod catalog;

pub use asset::{
    AssetCategory, CleanupRequest, CleanupResponse, DiscardQuery, TempAsset, TempUploadResponse,
};
pub use catalog::{
    Advertisement, CreateAdvertisementRequest, CreateProductRequest, ListQuery, Product,
    UpdateProductRequest,
};
