//! JSON-file backed catalog store
//!
//! The whole catalog lives in one JSON document. Every access reads the full
//! document and every mutation rewrites it in full. Two guarantees hold inside
//! one process:
//!
//! - read-modify-write cycles are serialized through a per-store mutex, so
//!   concurrent handlers cannot lose each other's updates;
//! - writes go to a temporary sibling file that is synced and then renamed over
//!   the document, so an interrupted write leaves the previous version intact.
//!
//! Several processes sharing one document are still last-writer-wins.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::catalog::Catalog;
use crate::core::error::{StorageError, ValidationError};

/// Distinguishes temp files of concurrent writes within one process
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Persistent owner of the catalog document
#[derive(Debug)]
pub struct CatalogStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CatalogStore {
    /// Binds a store to `path`, creating an empty `{}` document if none exists.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let store = Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        };
        if !store.document_exists().await? {
            log::info!("Catalog document {} not found, creating an empty one", store.path.display());
            store.write_document(&Catalog::new()).await?;
        }
        Ok(store)
    }

    /// Reads the document at `path` without creating or rewriting anything.
    ///
    /// Used by read-only inspection; a missing document is an error here.
    pub async fn load_existing(path: impl AsRef<Path>) -> Result<Catalog, StorageError> {
        let path = path.as_ref();
        let raw = fs_err::tokio::read_to_string(path)
            .await
            .map_err(|e| StorageError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| StorageError::json(path, e))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full catalog.
    ///
    /// A missing document is replaced by an empty catalog, which is persisted
    /// before it is returned.
    pub async fn load(&self) -> Result<Catalog, StorageError> {
        let _guard = self.write_lock.lock().await;
        self.read_document().await
    }

    /// Overwrites the document with `catalog`.
    pub async fn save(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        self.write_document(catalog).await
    }

    /// Transactional read-modify-write.
    ///
    /// `mutate` runs against a freshly loaded catalog while the store lock is
    /// held. The catalog is written back only when `mutate` succeeds; a
    /// validation failure leaves the document untouched and is handed back to
    /// the caller in the inner result.
    pub async fn update<T, F>(&self, mutate: F) -> Result<Result<T, ValidationError>, StorageError>
    where
        F: FnOnce(&mut Catalog) -> Result<T, ValidationError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut catalog = self.read_document().await?;
        match mutate(&mut catalog) {
            Ok(value) => {
                self.write_document(&catalog).await?;
                Ok(Ok(value))
            }
            Err(rejected) => Ok(Err(rejected)),
        }
    }

    async fn document_exists(&self) -> Result<bool, StorageError> {
        match fs_err::tokio::metadata(&self.path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::io(&self.path, e)),
        }
    }

    async fn read_document(&self) -> Result<Catalog, StorageError> {
        if !self.document_exists().await? {
            let empty = Catalog::new();
            self.write_document(&empty).await?;
            return Ok(empty);
        }

        let raw = fs_err::tokio::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::io(&self.path, e))?;
        serde_json::from_str(&raw).map_err(|e| StorageError::json(&self.path, e))
    }

    async fn write_document(&self, catalog: &Catalog) -> Result<(), StorageError> {
        let bytes = encode_document(catalog).map_err(|e| StorageError::json(&self.path, e))?;
        let temp_path = PathBuf::from(format!(
            "{}.tmp.{}.{}",
            self.path.display(),
            std::process::id(),
            WRITE_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        let written = async {
            let mut file = fs_err::tokio::File::create(&temp_path).await?;
            file.write_all(&bytes).await?;
            file.sync_all().await?;
            drop(file);
            fs_err::tokio::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            let _ = fs_err::tokio::remove_file(&temp_path).await;
            return Err(StorageError::io(&self.path, e));
        }

        log::debug!(
            "Catalog written to {} ({} categories, {} images)",
            self.path.display(),
            catalog.len(),
            catalog.image_count()
        );
        Ok(())
    }
}

/// Pretty-printed with four-space indentation.
fn encode_document(catalog: &Catalog) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    catalog.serialize(&mut serializer)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::catalog::ImageTarget;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn doc_path(dir: &TempDir) -> PathBuf {
        dir.path().join("categories.json")
    }

    #[tokio::test]
    async fn test_open_creates_empty_document() {
        let dir = TempDir::new().unwrap();
        let path = doc_path(&dir);

        let store = CatalogStore::open(&path).await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "{}");
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_keeps_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = doc_path(&dir);
        std::fs::write(&path, r#"{"Animals": {"Cats": ["imgA"]}}"#).unwrap();

        let store = CatalogStore::open(&path).await.unwrap();
        let catalog = store.load().await.unwrap();

        assert_eq!(catalog.images("Animals", "Cats"), ["imgA"]);
    }

    #[tokio::test]
    async fn test_load_recreates_deleted_document() {
        let dir = TempDir::new().unwrap();
        let path = doc_path(&dir);
        let store = CatalogStore::open(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let catalog = store.load().await.unwrap();

        assert!(catalog.is_empty());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_load_malformed_document_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = doc_path(&dir);
        std::fs::write(&path, "{ not json").unwrap();
        let store = CatalogStore::open(&path).await.unwrap();

        let err = store.load().await.unwrap_err();

        assert!(matches!(err, StorageError::Json { .. }), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_save_writes_four_space_indent() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(doc_path(&dir)).await.unwrap();
        let mut catalog = Catalog::new();
        catalog.add_category("Animals").unwrap();

        store.save(&catalog).await.unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(raw, "{\n    \"Animals\": {}\n}");
    }

    #[tokio::test]
    async fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(doc_path(&dir)).await.unwrap();
        store.save(&Catalog::new()).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_update_persists_only_on_success() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::open(doc_path(&dir)).await.unwrap();

        store.update(|c| c.add_category("Animals")).await.unwrap().unwrap();
        let rejected = store.update(|c| c.add_category("Animals")).await.unwrap();

        assert_eq!(rejected, Err(ValidationError::CategoryExists("Animals".to_string())));
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_load_existing_never_creates_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("typo.json");

        let err = CatalogStore::load_existing(&path).await.unwrap_err();

        assert!(matches!(err, StorageError::Io { .. }), "unexpected error: {err}");
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_load_existing_reads_without_rewriting() {
        let dir = TempDir::new().unwrap();
        let path = doc_path(&dir);
        let compact = r#"{"Animals":{"Cats":["imgA"]}}"#;
        std::fs::write(&path, compact).unwrap();

        let catalog = CatalogStore::load_existing(&path).await.unwrap();

        assert_eq!(catalog.images("Animals", "Cats"), ["imgA"]);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), compact);
    }

    #[tokio::test]
    async fn test_two_handles_on_one_path_write_separate_temp_files() {
        let dir = TempDir::new().unwrap();
        let first = std::sync::Arc::new(CatalogStore::open(doc_path(&dir)).await.unwrap());
        let second = std::sync::Arc::new(CatalogStore::open(doc_path(&dir)).await.unwrap());

        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = if i % 2 == 0 {
                std::sync::Arc::clone(&first)
            } else {
                std::sync::Arc::clone(&second)
            };
            tasks.push(tokio::spawn(async move {
                let mut catalog = Catalog::new();
                catalog.add_category(&format!("Category{i}")).unwrap();
                store.save(&catalog).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        // Whichever write landed last, the document is whole and no temp file is left.
        let catalog = first.load().await.unwrap();
        assert_eq!(catalog.len(), 1);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_not_lost() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(CatalogStore::open(doc_path(&dir)).await.unwrap());
        store.update(|c| c.add_category("Animals")).await.unwrap().unwrap();

        let mut tasks = Vec::new();
        for i in 0..20 {
            let store = std::sync::Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let target = ImageTarget::parse("Animals:Cats").unwrap();
                store
                    .update(move |c| c.file_image(&target, format!("img{i}")))
                    .await
                    .unwrap()
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().images("Animals", "Cats").len(), 20);
    }
}
