//! Common test utilities
//!
//! This module is shared across all integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use catalogbot::navigation::{Inbound, Navigator, PhotoVariant, Reply, SessionStore, UserKey};
use catalogbot::storage::{Catalog, CatalogStore};
use tempfile::TempDir;

/// Test user ID (consistent across tests)
pub const TEST_USER: UserKey = 123456789;

/// A navigator over a scratch catalog document
///
/// # Example
/// ```ignore
/// let env = TestEnvironment::new().await;
/// env.add_category(TEST_USER, "Animals").await;
/// assert_eq!(env.catalog().await.len(), 1);
/// ```
pub struct TestEnvironment {
    /// Keeps the scratch directory alive for the test's duration
    pub dir: TempDir,
    pub navigator: Navigator,
}

impl TestEnvironment {
    pub async fn new() -> Self {
        Self::with_ttl(Duration::from_secs(600)).await
    }

    pub async fn with_ttl(ttl: Duration) -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store = CatalogStore::open(dir.path().join("categories.json"))
            .await
            .expect("open catalog store");
        let navigator = Navigator::new(Arc::new(store), SessionStore::new(ttl));
        Self { dir, navigator }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("categories.json")
    }

    pub async fn catalog(&self) -> Catalog {
        self.navigator.store().load().await.expect("load catalog")
    }

    pub async fn send(&self, user: UserKey, inbound: Inbound) -> Option<Reply> {
        self.navigator.handle(user, inbound).await.expect("handle action")
    }

    pub async fn press(&self, user: UserKey, callback: &str) -> Option<Reply> {
        self.send(user, Inbound::Callback(callback.to_string())).await
    }

    /// Full "Add Category" flow: button press, then the name as text
    pub async fn add_category(&self, user: UserKey, name: &str) -> Reply {
        self.press(user, "add_category").await.expect("prompt for name");
        self.send(user, Inbound::Text(name.to_string()))
            .await
            .expect("reply to category name")
    }

    /// Full "Add Image" flow: button press, then a captioned photo
    pub async fn add_image(&self, user: UserKey, image: &str, caption: Option<&str>) -> Reply {
        self.press(user, "add_image").await.expect("prompt for image");
        self.send(user, photo(image, caption))
            .await
            .expect("reply to photo")
    }
}

/// A photo message whose largest variant is `image`
pub fn photo(image: &str, caption: Option<&str>) -> Inbound {
    Inbound::Photo {
        variants: vec![
            PhotoVariant {
                image: format!("{image}-thumb"),
                width: 90,
                height: 90,
            },
            PhotoVariant {
                image: image.to_string(),
                width: 1280,
                height: 1280,
            },
        ],
        caption: caption.map(str::to_string),
    }
}
