//! Database repositories for data access layer
//
// Catalog repositories (products, advertisements)
pub mod catalog;

pub use catalog::{CatalogRepository, PgCatalogRepository};
