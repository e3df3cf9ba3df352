//! Catalog data model and its JSON document store

pub mod catalog;
pub mod store;

// Re-exports for convenience
pub use catalog::{Catalog, Category, ImageRef, ImageTarget};
pub use store::CatalogStore;
