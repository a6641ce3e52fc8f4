//! # Lookalike Similarity
//!
//! A simulated visual similarity engine for product images.
//!
//! No pixels are ever decoded. Each image identifier (its URL) is hashed
//! into a deterministic pseudo-random feature vector, and candidates are
//! ranked by a weighted, multi-factor comparison of those vectors plus a
//! category and tag bonus.
//!
//! ## Features
//!
//! - **Feature Extraction**: Deterministic synthetic palette, brightness, contrast,
//!   saturation, aspect ratio and complexity per identifier
//! - **Weighted Scoring**: Seven configurable factors combined into a score in `[0, 1]`
//! - **Ranking**: Parallel scoring, random jitter, stable descending sort
//! - **Explainability**: Per-factor contribution breakdown and search statistics
//!
//! ## Example
//!
//! ```rust
//! use lookalike_similarity::{extract_features, CandidateRecord, NoJitter, SimilarityScorer, WeightConfig};
//!
//! // Same identifier, same features
//! assert_eq!(extract_features("/red-apples-fresh.jpg"), extract_features("/red-apples-fresh.jpg"));
//!
//! let candidates = vec![
//!     CandidateRecord::new("/red-apples-fresh.jpg", "fruits", vec!["apple".into(), "red".into()]),
//!     CandidateRecord::new("/yellow-bananas-ripe.jpg", "fruits", vec!["banana".into()]),
//!     CandidateRecord::new("/golden-retriever-puppy.png", "animals", vec!["dog".into()]),
//! ];
//!
//! let scorer = SimilarityScorer::new(WeightConfig::default()).with_jitter(NoJitter);
//! let ranked = scorer.score_products("https://example.com/photo.jpg", candidates, Some("fruits"));
//!
//! assert_eq!(ranked.len(), 3);
//! assert!(ranked.iter().all(|r| (0.6..=0.99).contains(&r.similarity_score)));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Identifier  │────>│  Extractor  │────>│  Feature    │
//! │   (URL)     │     │ (hash→rng)  │     │  Vector     │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!       ┌─────────────┐     ┌─────────────┐      │
//!       │   Weights   │────>│   Scorer    │<─────┘
//!       └─────────────┘     │ (+ jitter)  │
//!                           └─────────────┘
//!                                  │
//!                           ┌─────────────┐
//!                           │   Refine    │
//!                           │  + Stats    │
//!                           └─────────────┘
//! ```

pub mod features;
pub mod distance;
pub mod weights;
pub mod scorer;
pub mod refine;
pub mod explain;

// Re-export main types for convenience
pub use features::{extract_features, string_hash, FeatureVector, Rgb, SeededRandom};
pub use weights::{Factor, WeightConfig, WeightError};
pub use scorer::{
    score,
    score_products,
    Candidate,
    CandidateRecord,
    FactorScores,
    NoJitter,
    ScoreJitter,
    ScoredCandidate,
    SimilarityScorer,
    UniformJitter,
    SCORE_CEILING,
    SCORE_FLOOR,
};
pub use refine::{apply_threshold, available_tags, Refinement, SortOrder};
pub use explain::{SearchMetadata, SearchStats, ALL_CATEGORIES};
