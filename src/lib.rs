//! # Lookalike
//!
//! Visual product search over an in-memory catalog.
//!
//! Given an image (a URL, or an upload that is assigned an opaque
//! identifier), Lookalike ranks catalog products by how similar their
//! images are. Visual features are synthesized deterministically from the
//! image identifier, so no image is ever downloaded or decoded.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! lookalike --http-port 3000 --seed
//! curl -X POST localhost:3000/search \
//!      -H 'content-type: application/json' \
//!      -d '{"imageUrl": "https://example.com/red.jpg", "category": "fruits"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use lookalike::prelude::*;
//!
//! let catalog = Catalog::new(CatalogConfig::default());
//! seed_catalog(&catalog).unwrap();
//!
//! let candidates = catalog.find(
//!     &CatalogQuery::new().with_filter(FilterCondition::category("toys")),
//! );
//! let ranked = score_products("https://example.com/teddy.png", candidates, Some("toys"));
//! let top = apply_threshold(ranked, 0.6, 3);
//!
//! assert!(top.len() <= 3);
//! assert!(top.iter().all(|r| r.candidate.category == "toys"));
//! ```
//!
//! ## Crate Structure
//!
//! - [`lookalike-core`](https://docs.rs/lookalike-core) - Products, catalog store, filters
//! - [`lookalike-similarity`](https://docs.rs/lookalike-similarity) - Feature synthesis, scoring, refinement
//! - [`lookalike-storage`](https://docs.rs/lookalike-storage) - Persistence, snapshots, sample data
//! - [`lookalike-api`](https://docs.rs/lookalike-api) - REST API

// Re-export core types
pub use lookalike_core::{
    Catalog, CatalogConfig, CatalogQuery,
    Product, ProductId, NewProduct,
    Filter, ProductFilter, FilterCondition,
    Error, Result,
};

// Re-export similarity
pub use lookalike_similarity::{
    extract_features, score, score_products,
    apply_threshold, available_tags,
    FeatureVector, Rgb, WeightConfig, Factor,
    SimilarityScorer, ScoredCandidate, FactorScores,
    Refinement, SortOrder, SearchStats, SearchMetadata,
};

// Re-export storage
pub use lookalike_storage::{seed_catalog, StorageManager, StorageOptions};

// Re-export API
pub use lookalike_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Catalog, CatalogConfig, CatalogQuery,
        Product, ProductId, NewProduct,
        Filter, FilterCondition,
        Error, Result,
        extract_features, score_products, apply_threshold,
        WeightConfig, SimilarityScorer, ScoredCandidate,
        Refinement, SortOrder,
        seed_catalog, StorageManager,
        RestApi,
    };
}
