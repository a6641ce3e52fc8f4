use chrono::Utc;
use lookalike_core::{Catalog, CatalogConfig, Error, Product, Result};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, info, warn};
use crate::persistence::CatalogPersistence;
use crate::seed::seed_catalog;
use crate::snapshot::{CatalogSnapshotData, SnapshotDescription, SnapshotManager};

/// Name of the catalog the application searches
pub const DEFAULT_CATALOG: &str = "products";

type CatalogMap = Arc<RwLock<HashMap<String, Arc<Catalog>>>>;

#[derive(Debug, Clone)]
pub struct StorageOptions {
    /// Period of the background save; `None` disables it
    pub save_interval: Option<Duration>,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            save_interval: Some(Duration::from_secs(300)),
        }
    }
}

struct BackgroundSave {
    stop: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

/// Manages catalogs and persistence
pub struct StorageManager {
    catalogs: CatalogMap,
    snapshots: Arc<SnapshotManager>,
    persistence: Arc<CatalogPersistence>,
    background: Mutex<Option<BackgroundSave>>,
}

fn new_catalog(name: &str) -> Arc<Catalog> {
    Arc::new(Catalog::new(CatalogConfig {
        name: name.to_string(),
    }))
}

/// Rebuild a catalog from stored products, keeping their ids and timestamps
fn restore_catalog(name: &str, products: Vec<Product>) -> Arc<Catalog> {
    let catalog = new_catalog(name);
    for product in products {
        let id = product.id.to_string();
        if let Err(e) = catalog.upsert(product) {
            warn!(catalog = name, product = %id, error = %e, "skipping product during restore");
        }
    }
    catalog
}

/// Validate dumped documents, dropping the ones that cannot become products
fn products_from_documents(name: &str, documents: &[serde_json::Value]) -> Vec<Product> {
    documents
        .iter()
        .filter_map(|doc| match Product::from_document(doc) {
            Ok(product) => Some(product),
            Err(e) => {
                warn!(catalog = name, error = %e, "skipping invalid document in dump");
                None
            }
        })
        .collect()
}

impl StorageManager {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        Self::with_options(data_dir, StorageOptions::default())
    }

    pub fn with_options<P: AsRef<Path>>(data_dir: P, options: StorageOptions) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&data_dir)?;

        let snapshot_dir = data_dir.join("snapshots");
        let snapshots = Arc::new(SnapshotManager::new(&snapshot_dir)
            .map_err(|e| Error::Storage(e.to_string()))?);

        let persistence = Arc::new(CatalogPersistence::new(&data_dir));

        let mut catalogs_map = HashMap::new();
        if let Some(dump) = persistence.load()
            .map_err(|e| Error::Persistence(e.to_string()))? {
            for catalog_dump in dump.catalogs {
                let products = products_from_documents(&catalog_dump.name, &catalog_dump.products);
                let catalog = restore_catalog(&catalog_dump.name, products);
                info!(catalog = %catalog_dump.name, products = catalog.count(), "catalog restored");
                catalogs_map.insert(catalog_dump.name, catalog);
            }
        }
        catalogs_map
            .entry(DEFAULT_CATALOG.to_string())
            .or_insert_with(|| new_catalog(DEFAULT_CATALOG));

        let manager = Self {
            catalogs: Arc::new(RwLock::new(catalogs_map)),
            snapshots,
            persistence,
            background: Mutex::new(None),
        };

        if let Some(interval) = options.save_interval.filter(|i| !i.is_zero()) {
            manager.start_background_save(interval)?;
        }

        Ok(manager)
    }

    /// Start background save thread
    fn start_background_save(&self, interval: Duration) -> Result<()> {
        let catalogs = self.catalogs.clone();
        let persistence = self.persistence.clone();
        let (stop, stopped) = mpsc::channel::<()>();

        let handle = std::thread::Builder::new()
            .name("catalog-bgsave".to_string())
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        // Clone the map so catalogs stay writable during the dump
                        let snapshot = catalogs.read().clone();
                        if let Err(e) = persistence.try_save(&snapshot) {
                            error!(error = %e, "background save failed");
                        }
                    }
                    // Stop signal or manager dropped
                    _ => break,
                }
            })?;

        info!(interval_secs = interval.as_secs(), "background save started");
        *self.background.lock() = Some(BackgroundSave { stop, handle });
        Ok(())
    }

    fn stop_background_save(&self) {
        if let Some(background) = self.background.lock().take() {
            let _ = background.stop.send(());
            if background.handle.join().is_err() {
                error!("background save thread panicked");
            }
        }
    }

    pub fn create_catalog(&self, name: &str) -> Result<Arc<Catalog>> {
        let mut catalogs = self.catalogs.write();

        if catalogs.contains_key(name) {
            return Err(Error::CatalogExists(name.to_string()));
        }

        let catalog = new_catalog(name);
        catalogs.insert(name.to_string(), catalog.clone());
        info!(catalog = name, "catalog created");
        Ok(catalog)
    }

    #[inline]
    pub fn get_catalog(&self, name: &str) -> Option<Arc<Catalog>> {
        self.catalogs.read().get(name).cloned()
    }

    /// The default product catalog, created if it was deleted
    pub fn products(&self) -> Arc<Catalog> {
        if let Some(catalog) = self.get_catalog(DEFAULT_CATALOG) {
            return catalog;
        }
        self.catalogs
            .write()
            .entry(DEFAULT_CATALOG.to_string())
            .or_insert_with(|| new_catalog(DEFAULT_CATALOG))
            .clone()
    }

    pub fn delete_catalog(&self, name: &str) -> Result<bool> {
        let removed = self.catalogs.write().remove(name).is_some();
        if removed {
            info!(catalog = name, "catalog deleted");
        }
        Ok(removed)
    }

    #[must_use]
    pub fn list_catalogs(&self) -> Vec<String> {
        let mut names: Vec<String> = self.catalogs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Replace the default catalog's contents with the sample products
    pub fn seed(&self) -> Result<usize> {
        seed_catalog(&self.products())
    }

    /// Force save
    pub fn save(&self) -> Result<()> {
        let catalogs = self.catalogs.read().clone();
        self.persistence.save(&catalogs)
            .map_err(|e| Error::Persistence(e.to_string()))?;
        info!(path = ?self.persistence.dump_path(), "catalogs saved");
        Ok(())
    }

    /// Get last save time (unix seconds, 0 if never saved)
    pub fn last_save_time(&self) -> u64 {
        self.persistence.last_save_time()
    }

    pub fn is_save_in_progress(&self) -> bool {
        self.persistence.is_save_in_progress()
    }

    /// Stop the background save and write a final dump
    pub fn shutdown(&self) -> Result<()> {
        self.stop_background_save();
        self.save()
    }

    // ==================== Snapshot Methods ====================

    /// Create a snapshot for a catalog
    pub fn create_catalog_snapshot(&self, catalog_name: &str) -> Result<SnapshotDescription> {
        let catalog = self.get_catalog(catalog_name)
            .ok_or_else(|| Error::CatalogNotFound(catalog_name.to_string()))?;

        let snapshot_data = CatalogSnapshotData {
            name: catalog_name.to_string(),
            products: catalog.iter(),
            created_at: Utc::now(),
        };

        let description = self.snapshots.create_catalog_snapshot(&snapshot_data)
            .map_err(|e| Error::Storage(e.to_string()))?;
        info!(catalog = catalog_name, snapshot = %description.name, "snapshot created");
        Ok(description)
    }

    /// List snapshots for a catalog
    pub fn list_catalog_snapshots(&self, catalog_name: &str) -> Result<Vec<SnapshotDescription>> {
        self.snapshots.list_catalog_snapshots(catalog_name)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// List all snapshots
    pub fn list_all_snapshots(&self) -> Result<Vec<SnapshotDescription>> {
        self.snapshots.list_all_snapshots()
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Delete a snapshot
    pub fn delete_catalog_snapshot(&self, catalog_name: &str, snapshot_name: &str) -> Result<bool> {
        self.snapshots.delete_catalog_snapshot(catalog_name, snapshot_name)
            .map_err(|e| Error::Storage(e.to_string()))
    }

    /// Replace a catalog with the contents of one of its snapshots
    pub fn recover_from_snapshot(&self, catalog_name: &str, snapshot_name: &str) -> Result<Arc<Catalog>> {
        let snapshot_data = self.snapshots.load_catalog_snapshot(catalog_name, snapshot_name)
            .map_err(|e| Error::Storage(e.to_string()))?;

        let catalog = restore_catalog(catalog_name, snapshot_data.products);
        self.catalogs.write().insert(catalog_name.to_string(), catalog.clone());
        info!(
            catalog = catalog_name,
            snapshot = snapshot_name,
            products = catalog.count(),
            "catalog recovered from snapshot"
        );
        Ok(catalog)
    }
}

impl Drop for StorageManager {
    fn drop(&mut self) {
        self.stop_background_save();
    }
}
