// Integration tests for Lookalike
use lookalike_core::{Catalog, CatalogConfig, CatalogQuery, FilterCondition, NewProduct, Product};
use lookalike_similarity::{
    apply_threshold, extract_features, score_products, CandidateRecord, NoJitter, Refinement,
    SimilarityScorer, SortOrder, WeightConfig, SCORE_CEILING, SCORE_FLOOR,
};
use lookalike_storage::{seed_catalog, StorageManager, StorageOptions, DEFAULT_CATALOG, SAMPLE_PRODUCTS};

fn seeded_catalog() -> Catalog {
    let catalog = Catalog::new(CatalogConfig::default());
    seed_catalog(&catalog).unwrap();
    catalog
}

fn storage(dir: &std::path::Path) -> StorageManager {
    StorageManager::with_options(dir, StorageOptions { save_interval: None }).unwrap()
}

#[test]
fn test_search_seeded_catalog() {
    let catalog = seeded_catalog();

    let candidates = catalog.find(
        &CatalogQuery::new()
            .with_filter(FilterCondition::category("fruits"))
            .limit(40),
    );
    assert_eq!(candidates.len(), 5);

    let ranked = score_products("https://example.com/red.jpg", candidates, Some("fruits"));
    assert_eq!(ranked.len(), 5);
    assert!(ranked
        .iter()
        .all(|r| (SCORE_FLOOR..=SCORE_CEILING).contains(&r.similarity_score)));
    assert!(ranked
        .windows(2)
        .all(|w| w[0].similarity_score >= w[1].similarity_score));
}

#[test]
fn test_identical_image_scores_highest() {
    let catalog = seeded_catalog();
    let products = catalog.iter();
    let target = products
        .iter()
        .find(|p| !p.image_url.starts_with("/placeholder"))
        .unwrap()
        .clone();

    let weights = WeightConfig::default();
    let scorer = SimilarityScorer::new(weights).with_jitter(NoJitter);
    let ranked = scorer.score_products(&target.image_url, products, Some(&target.category));

    let own = ranked.iter().find(|r| r.candidate.id == target.id).unwrap();
    assert_eq!(own.factors.color, weights.color);
    assert_eq!(own.factors.brightness, weights.brightness);
    assert_eq!(own.factors.aspect_ratio, weights.aspect_ratio);
    assert_eq!(own.factors.category, weights.category);
    assert!(own.raw_score >= 0.95);

    // Beats everything outside its category
    assert!(ranked
        .iter()
        .filter(|r| r.candidate.category != target.category)
        .all(|r| r.raw_score < own.raw_score));
}

#[test]
fn test_shared_placeholder_images_share_features() {
    let placeholders: Vec<&str> = SAMPLE_PRODUCTS
        .iter()
        .map(|p| p.image_url)
        .filter(|url| url.starts_with("/placeholder"))
        .collect();
    assert!(placeholders.len() > 1);

    let first = extract_features(placeholders[0]);
    assert!(placeholders.iter().all(|url| extract_features(url) == first));
}

#[test]
fn test_scoring_plain_records() {
    let candidates = vec![
        CandidateRecord::new("/a.jpg", "books", vec!["novel".into()]),
        CandidateRecord::new("/b.jpg", "sports", vec!["ball".into()]),
        CandidateRecord::new("", "books", vec![]),
    ];

    let ranked = score_products("/query.jpg", candidates, None);
    assert_eq!(ranked.len(), 3);
}

#[test]
fn test_threshold_then_refine() {
    let catalog = seeded_catalog();
    let ranked = SimilarityScorer::new(WeightConfig::default())
        .with_jitter(NoJitter)
        .score_products("/query.jpg", catalog.iter(), None);

    let top = apply_threshold(ranked, SCORE_FLOOR, 10);
    assert_eq!(top.len(), 10);

    let refined = Refinement {
        sort: SortOrder::Name,
        ..Refinement::default()
    }
    .apply(top);
    let names: Vec<String> = refined.iter().map(|r| r.candidate.name.to_lowercase()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_invalid_documents_are_rejected() {
    let doc = serde_json::json!({
        "_id": "abc",
        "name": "Broken",
        "category": "toys",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    });
    assert!(Product::from_document(&doc).is_err());

    let catalog = Catalog::new(CatalogConfig::default());
    assert!(catalog.insert(NewProduct::new("No Image", "toys", "")).is_err());
    assert!(catalog.is_empty());
}

#[test]
fn test_storage_manager() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = storage(temp_dir.path());

    assert_eq!(storage.seed().unwrap(), 50);
    let archive = storage.create_catalog("archive").unwrap();
    archive.insert(NewProduct::new("Old Map", "books", "/map.jpg")).unwrap();

    assert_eq!(storage.list_catalogs(), vec!["archive", DEFAULT_CATALOG]);
    assert_eq!(storage.get_catalog("archive").unwrap().count(), 1);
}

#[test]
fn test_persistence_roundtrip() {
    let temp_dir = tempfile::tempdir().unwrap();
    let ids: Vec<String> = {
        let storage = storage(temp_dir.path());
        storage.seed().unwrap();
        storage.shutdown().unwrap();
        storage.products().iter().iter().map(|p| p.id.to_string()).collect()
    };

    let reopened = storage(temp_dir.path());
    let restored: Vec<String> = reopened
        .products()
        .iter()
        .iter()
        .map(|p| p.id.to_string())
        .collect();
    assert_eq!(restored, ids);
}

#[test]
fn test_snapshot_recovery() {
    let temp_dir = tempfile::tempdir().unwrap();
    let storage = storage(temp_dir.path());
    storage.seed().unwrap();

    let snapshot = storage.create_catalog_snapshot(DEFAULT_CATALOG).unwrap();
    storage.products().clear();

    storage.recover_from_snapshot(DEFAULT_CATALOG, &snapshot.name).unwrap();
    assert_eq!(storage.products().count(), 50);
    assert_eq!(storage.products().categories().len(), 10);
}
