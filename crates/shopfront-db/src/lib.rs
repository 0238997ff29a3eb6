//! Shopfront persistence layer
//!
//! PostgreSQL repositories for catalog entities. The API only depends on the
//! [`CatalogRepository`] trait so it can be tested without a database.

pub mod db;

pub use db::{CatalogRepository, PgCatalogRepository};
