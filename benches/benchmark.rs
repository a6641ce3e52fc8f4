// Feature extraction and ranking throughput over the sample catalog
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lookalike_core::{Catalog, CatalogConfig, NewProduct, Product};
use lookalike_similarity::{extract_features, NoJitter, SimilarityScorer, WeightConfig};
use lookalike_storage::{seed_catalog, CATEGORIES};
use rand::prelude::*;

fn random_image_url(rng: &mut impl Rng) -> String {
    format!("https://cdn.example.com/images/{:08x}.jpg", rng.random::<u32>())
}

/// Sample catalog padded with random products up to `size`
fn catalog_products(size: usize) -> Vec<Product> {
    let catalog = Catalog::new(CatalogConfig::default());
    seed_catalog(&catalog).unwrap();

    let mut rng = rand::rng();
    let extra: Vec<NewProduct> = (catalog.count()..size)
        .map(|i| {
            let category = CATEGORIES[i % CATEGORIES.len()];
            NewProduct::new(format!("Product {}", i), category, random_image_url(&mut rng))
                .with_price(rng.random_range(1.0..500.0))
                .with_tags([category])
        })
        .collect();
    catalog.insert_many(extra).unwrap();
    catalog.iter()
}

fn benchmark_extract_features(c: &mut Criterion) {
    let mut rng = rand::rng();
    let urls: Vec<String> = (0..1000).map(|_| random_image_url(&mut rng)).collect();

    c.bench_function("extract_features", |b| {
        let mut i = 0;
        b.iter(|| {
            i = (i + 1) % urls.len();
            black_box(extract_features(black_box(&urls[i])))
        });
    });
}

fn benchmark_score_products(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_products");
    let scorer = SimilarityScorer::new(WeightConfig::default()).with_jitter(NoJitter);

    for size in [50, 1000, 10000].iter() {
        let products = catalog_products(*size);
        group.bench_with_input(BenchmarkId::new("lookalike", size), &products, |b, products| {
            b.iter(|| {
                let ranked = scorer.score_products(
                    black_box("https://example.com/query.jpg"),
                    products.iter().collect::<Vec<&Product>>(),
                    Some("toys"),
                );
                black_box(ranked)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_extract_features, benchmark_score_products);
criterion_main!(benches);
