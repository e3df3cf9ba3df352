//! Catalogbot - Telegram bot for browsing and filing images by category
//!
//! Users browse a two-level category/subcategory tree of images through inline
//! menus and file new photos into it with a `category:subcategory` caption.
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, and logging
//! - `storage`: Catalog tree and its JSON document store
//! - `navigation`: Transport-independent menu state machine
//! - `telegram`: teloxide dispatcher schema and reply delivery
//! - `cli`: Command-line interface

pub mod cli;
pub mod core;
pub mod navigation;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use navigation::{Inbound, Navigator, Reply, SessionStore};
pub use storage::{Catalog, CatalogStore};
pub use telegram::{schema, HandlerDeps};
