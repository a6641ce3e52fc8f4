use anyhow::{anyhow, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use lookalike_core::Catalog;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

const DUMP_FILENAME: &str = "dump.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct DumpData {
    pub catalogs: Vec<CatalogDump>,
    pub timestamp: u64,
}

/// Products are kept as raw documents; they are validated when restored
#[derive(Debug, Serialize, Deserialize)]
pub struct CatalogDump {
    pub name: String,
    pub products: Vec<Value>,
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Whole-store JSON dump, replaced atomically on every save
pub struct CatalogPersistence {
    dump_path: PathBuf,
    save_in_progress: AtomicBool,
    last_save_time: AtomicU64,
}

impl CatalogPersistence {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            dump_path: data_dir.as_ref().join(DUMP_FILENAME),
            save_in_progress: AtomicBool::new(false),
            last_save_time: AtomicU64::new(0),
        }
    }

    pub fn dump_path(&self) -> &Path {
        &self.dump_path
    }

    /// Copy every catalog out so the write happens without holding locks
    fn create_dump(&self, catalogs: &HashMap<String, Arc<Catalog>>) -> Result<DumpData> {
        let mut dumps = Vec::with_capacity(catalogs.len());
        for (name, catalog) in catalogs {
            let products = catalog
                .iter()
                .iter()
                .map(serde_json::to_value)
                .collect::<serde_json::Result<Vec<Value>>>()?;
            dumps.push(CatalogDump {
                name: name.clone(),
                products,
            });
        }
        dumps.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(DumpData {
            catalogs: dumps,
            timestamp: unix_now(),
        })
    }

    fn write_dump(&self, dump: &DumpData) -> Result<()> {
        let data = serde_json::to_vec(dump)?;
        AtomicFile::new(&self.dump_path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| anyhow!("Failed to write {:?}: {}", self.dump_path, e))?;

        self.last_save_time.store(dump.timestamp, Ordering::Release);
        debug!(path = ?self.dump_path, catalogs = dump.catalogs.len(), "dump written");
        Ok(())
    }

    /// Save unless another save is running; `Ok(false)` means skipped
    pub fn try_save(&self, catalogs: &HashMap<String, Arc<Catalog>>) -> Result<bool> {
        if self.save_in_progress.swap(true, Ordering::Acquire) {
            return Ok(false);
        }

        let result = self
            .create_dump(catalogs)
            .and_then(|dump| self.write_dump(&dump));
        self.save_in_progress.store(false, Ordering::Release);
        result.map(|_| true)
    }

    /// Force save (synchronous)
    pub fn save(&self, catalogs: &HashMap<String, Arc<Catalog>>) -> Result<()> {
        let dump = self.create_dump(catalogs)?;
        self.write_dump(&dump)
    }

    /// Load the dump from disk (on startup)
    pub fn load(&self) -> Result<Option<DumpData>> {
        if !self.dump_path.exists() {
            return Ok(None);
        }

        let data = std::fs::read(&self.dump_path)?;
        let dump: DumpData = serde_json::from_slice(&data)
            .map_err(|e| anyhow!("Corrupt dump {:?}: {}", self.dump_path, e))?;
        info!(
            path = ?self.dump_path,
            catalogs = dump.catalogs.len(),
            "dump loaded"
        );
        Ok(Some(dump))
    }

    pub fn is_save_in_progress(&self) -> bool {
        self.save_in_progress.load(Ordering::Acquire)
    }

    /// Unix seconds of the last successful save, 0 if none
    pub fn last_save_time(&self) -> u64 {
        self.last_save_time.load(Ordering::Acquire)
    }
}
