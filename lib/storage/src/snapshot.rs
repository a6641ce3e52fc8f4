// Point-in-time catalog snapshots, gzip-compressed JSON with SHA-256 checksums
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use lookalike_core::Product;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_EXTENSION: &str = "snapshot";

/// Snapshot description for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotDescription {
    pub name: String,
    pub catalog: String,
    pub creation_time: Option<String>,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Catalog snapshot data - every product of one catalog
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshotData {
    pub name: String,
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
}

pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

/// Snapshot and catalog names end up in file paths
fn check_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(anyhow!("Invalid snapshot or catalog name '{}'", name));
    }
    Ok(())
}

fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

impl SnapshotManager {
    pub fn new<P: AsRef<Path>>(snapshot_dir: P) -> Result<Self> {
        let snapshot_dir = snapshot_dir.as_ref().to_path_buf();
        fs::create_dir_all(&snapshot_dir)?;
        Ok(Self { snapshot_dir })
    }

    fn catalog_snapshot_dir(&self, catalog_name: &str) -> PathBuf {
        self.snapshot_dir.join(catalog_name)
    }

    fn snapshot_path(&self, catalog_name: &str, snapshot_name: &str) -> Result<PathBuf> {
        check_name(catalog_name)?;
        check_name(snapshot_name)?;
        Ok(self.catalog_snapshot_dir(catalog_name).join(snapshot_name))
    }

    /// Generate snapshot filename with a millisecond timestamp
    fn generate_snapshot_name(catalog_name: &str) -> String {
        let now: DateTime<Utc> = Utc::now();
        format!(
            "{}-{}.{}",
            catalog_name,
            now.format("%Y-%m-%d-%H-%M-%S-%3f"),
            SNAPSHOT_EXTENSION
        )
    }

    fn describe(catalog_name: &str, path: &Path) -> Result<SnapshotDescription> {
        let metadata = fs::metadata(path)?;
        let checksum = sha256_hex(&fs::read(path)?);

        let creation_time = metadata
            .created()
            .or_else(|_| metadata.modified())
            .ok()
            .map(DateTime::<Utc>::from)
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string());

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow!("Snapshot path {:?} has no file name", path))?;

        Ok(SnapshotDescription {
            name: name.to_string(),
            catalog: catalog_name.to_string(),
            creation_time,
            size: metadata.len(),
            checksum: Some(checksum),
        })
    }

    /// Write a snapshot for a catalog
    pub fn create_catalog_snapshot(&self, data: &CatalogSnapshotData) -> Result<SnapshotDescription> {
        check_name(&data.name)?;
        let catalog_dir = self.catalog_snapshot_dir(&data.name);
        fs::create_dir_all(&catalog_dir)?;

        let snapshot_path = catalog_dir.join(Self::generate_snapshot_name(&data.name));

        let json_data = serde_json::to_vec(data)?;
        let file = File::create(&snapshot_path)?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        encoder.write_all(&json_data)?;
        encoder.finish()?.flush()?;

        Self::describe(&data.name, &snapshot_path)
    }

    /// List snapshots of a catalog, newest first
    pub fn list_catalog_snapshots(&self, catalog_name: &str) -> Result<Vec<SnapshotDescription>> {
        check_name(catalog_name)?;
        let catalog_dir = self.catalog_snapshot_dir(catalog_name);

        if !catalog_dir.exists() {
            return Ok(Vec::new());
        }

        let mut snapshots = Vec::new();
        for entry in fs::read_dir(&catalog_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) == Some(SNAPSHOT_EXTENSION) {
                snapshots.push(Self::describe(catalog_name, &path)?);
            }
        }

        // Names embed the timestamp
        snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(snapshots)
    }

    /// Load a snapshot from file
    pub fn load_catalog_snapshot(&self, catalog_name: &str, snapshot_name: &str) -> Result<CatalogSnapshotData> {
        let snapshot_path = self.snapshot_path(catalog_name, snapshot_name)?;

        if !snapshot_path.exists() {
            return Err(anyhow!(
                "Snapshot '{}' not found for catalog '{}'",
                snapshot_name,
                catalog_name
            ));
        }

        self.load_snapshot_from_path(&snapshot_path)
    }

    /// Load snapshot from a file path
    pub fn load_snapshot_from_path(&self, path: &Path) -> Result<CatalogSnapshotData> {
        let file = File::open(path)?;
        let mut decoder = GzDecoder::new(BufReader::new(file));
        let mut json_data = Vec::new();
        decoder.read_to_end(&mut json_data)?;

        let data: CatalogSnapshotData = serde_json::from_slice(&json_data)?;
        Ok(data)
    }

    /// Delete a snapshot
    pub fn delete_catalog_snapshot(&self, catalog_name: &str, snapshot_name: &str) -> Result<bool> {
        let snapshot_path = self.snapshot_path(catalog_name, snapshot_name)?;

        if snapshot_path.exists() {
            fs::remove_file(&snapshot_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// List all snapshots across all catalogs, newest first
    pub fn list_all_snapshots(&self) -> Result<Vec<SnapshotDescription>> {
        let mut all_snapshots = Vec::new();

        if !self.snapshot_dir.exists() {
            return Ok(all_snapshots);
        }

        for entry in fs::read_dir(&self.snapshot_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                if let Some(catalog_name) = entry.file_name().to_str() {
                    all_snapshots.extend(self.list_catalog_snapshots(catalog_name)?);
                }
            }
        }

        all_snapshots.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(all_snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookalike_core::NewProduct;

    fn data(name: &str) -> CatalogSnapshotData {
        CatalogSnapshotData {
            name: name.to_string(),
            products: vec![
                NewProduct::new("Chess Set", "toys", "/chess.jpg")
                    .with_tags(["board", "game"])
                    .into_product(Utc::now()),
            ],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_list_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path()).unwrap();

        let desc = manager.create_catalog_snapshot(&data("products")).unwrap();
        assert!(desc.name.starts_with("products-"));
        assert!(desc.name.ends_with(".snapshot"));
        assert_eq!(desc.checksum.as_ref().map(String::len), Some(64));

        let listed = manager.list_catalog_snapshots("products").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].checksum, desc.checksum);

        let loaded = manager.load_catalog_snapshot("products", &desc.name).unwrap();
        assert_eq!(loaded.products.len(), 1);
        assert_eq!(loaded.products[0].name, "Chess Set");

        assert!(manager.delete_catalog_snapshot("products", &desc.name).unwrap());
        assert!(!manager.delete_catalog_snapshot("products", &desc.name).unwrap());
        assert!(manager.list_catalog_snapshots("products").unwrap().is_empty());
    }

    #[test]
    fn test_missing_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path()).unwrap();

        assert!(manager.load_catalog_snapshot("products", "nope.snapshot").is_err());
        assert!(manager.list_catalog_snapshots("never").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path()).unwrap();

        assert!(manager.load_catalog_snapshot("products", "../dump.json").is_err());
        assert!(manager.delete_catalog_snapshot("..", "x.snapshot").is_err());
    }

    #[test]
    fn test_list_all_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let manager = SnapshotManager::new(dir.path()).unwrap();

        manager.create_catalog_snapshot(&data("products")).unwrap();
        manager.create_catalog_snapshot(&data("archive")).unwrap();

        let all = manager.list_all_snapshots().unwrap();
        assert_eq!(all.len(), 2);
        let mut catalogs: Vec<&str> = all.iter().map(|s| s.catalog.as_str()).collect();
        catalogs.sort();
        assert_eq!(catalogs, vec!["archive", "products"]);
    }
}
