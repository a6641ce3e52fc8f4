pub mod manager;
pub mod persistence;
pub mod seed;
pub mod snapshot;

pub use manager::{StorageManager, StorageOptions, DEFAULT_CATALOG};
pub use persistence::CatalogPersistence;
pub use seed::{sample_products, seed_catalog, SeedProduct, CATEGORIES, SAMPLE_PRODUCTS};
pub use snapshot::{SnapshotDescription, SnapshotManager};
