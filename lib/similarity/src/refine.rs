//! Post-processing of ranked results
//!
//! Scoring never drops or truncates candidates; callers use these helpers
//! to apply a minimum score, a result limit and the browsing refinements
//! (price and score ranges, tag selection, alternative sort orders).

use crate::scorer::ScoredCandidate;
use lookalike_core::Product;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Keep results scoring at least `min_similarity`, at most `limit` of them
pub fn apply_threshold<C>(
    results: Vec<ScoredCandidate<C>>,
    min_similarity: f64,
    limit: usize,
) -> Vec<ScoredCandidate<C>> {
    results
        .into_iter()
        .filter(|r| r.similarity_score >= min_similarity)
        .take(limit)
        .collect()
}

/// Result ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Highest score first (the ranking order)
    #[default]
    Similarity,
    PriceLow,
    PriceHigh,
    /// Alphabetical by name, case-insensitive
    Name,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "similarity" => Ok(SortOrder::Similarity),
            "price-low" => Ok(SortOrder::PriceLow),
            "price-high" => Ok(SortOrder::PriceHigh),
            "name" => Ok(SortOrder::Name),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Browsing refinements applied to an already ranked result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Refinement {
    /// Inclusive `[min, max]` price
    pub price_range: Option<(f64, f64)>,
    /// Inclusive `[min, max]` reported score
    pub similarity_range: Option<(f64, f64)>,
    /// Keep results carrying any of these tags; empty keeps everything
    pub tags: Vec<String>,
    pub sort: SortOrder,
}

#[inline]
fn within(value: f64, range: Option<(f64, f64)>) -> bool {
    range.map_or(true, |(min, max)| value >= min && value <= max)
}

impl Refinement {
    pub fn is_noop(&self) -> bool {
        *self == Refinement::default()
    }

    fn keeps<P: Borrow<Product>>(&self, result: &ScoredCandidate<P>) -> bool {
        let product = result.candidate.borrow();
        within(product.price, self.price_range)
            && within(result.similarity_score, self.similarity_range)
            && (self.tags.is_empty() || self.tags.iter().any(|t| product.has_tag(t)))
    }

    /// Filter, then re-sort (stable) according to `sort`
    pub fn apply<P: Borrow<Product>>(&self, results: Vec<ScoredCandidate<P>>) -> Vec<ScoredCandidate<P>> {
        let mut kept: Vec<ScoredCandidate<P>> =
            results.into_iter().filter(|r| self.keeps(r)).collect();

        match self.sort {
            SortOrder::Similarity => {
                kept.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score))
            }
            SortOrder::PriceLow => kept.sort_by(|a, b| {
                a.candidate.borrow().price.total_cmp(&b.candidate.borrow().price)
            }),
            SortOrder::PriceHigh => kept.sort_by(|a, b| {
                b.candidate.borrow().price.total_cmp(&a.candidate.borrow().price)
            }),
            SortOrder::Name => kept.sort_by_cached_key(|r| r.candidate.borrow().name.to_lowercase()),
        }
        kept
    }
}

/// Distinct tags across a result set, sorted
pub fn available_tags<P: Borrow<Product>>(results: &[ScoredCandidate<P>]) -> Vec<String> {
    let set: BTreeSet<&str> = results
        .iter()
        .flat_map(|r| r.candidate.borrow().tags.iter().map(String::as_str))
        .collect();
    set.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract_features;
    use crate::scorer::FactorScores;
    use chrono::Utc;
    use lookalike_core::NewProduct;

    fn result(name: &str, price: f64, score: f64, tags: &[&str]) -> ScoredCandidate<Product> {
        let product = NewProduct::new(name, "toys", format!("/{}.jpg", name))
            .with_price(price)
            .with_tags(tags.iter().copied())
            .into_product(Utc::now());
        ScoredCandidate {
            features: extract_features(&product.image_url),
            candidate: product,
            similarity_score: score,
            raw_score: score,
            factors: FactorScores::default(),
        }
    }

    fn names<P: Borrow<Product>>(results: &[ScoredCandidate<P>]) -> Vec<String> {
        results.iter().map(|r| r.candidate.borrow().name.clone()).collect()
    }

    fn ranked() -> Vec<ScoredCandidate<Product>> {
        vec![
            result("yo-yo", 4.0, 0.95, &["toy", "classic"]),
            result("Kite", 25.0, 0.90, &["outdoor"]),
            result("blocks", 40.0, 0.80, &["toy", "kids"]),
            result("Drone", 300.0, 0.70, &["tech"]),
            result("Puzzle", 25.0, 0.62, &["kids"]),
        ]
    }

    #[test]
    fn test_apply_threshold() {
        let kept = apply_threshold(ranked(), 0.75, 10);
        assert_eq!(names(&kept), vec!["yo-yo", "Kite", "blocks"]);

        let limited = apply_threshold(ranked(), 0.0, 2);
        assert_eq!(names(&limited), vec!["yo-yo", "Kite"]);

        assert!(apply_threshold(ranked(), 0.99, 10).is_empty());
    }

    #[test]
    fn test_default_refinement_is_noop() {
        let refinement = Refinement::default();
        assert!(refinement.is_noop());
        assert_eq!(names(&refinement.apply(ranked())), names(&ranked()));
    }

    #[test]
    fn test_price_and_similarity_ranges() {
        let refinement = Refinement {
            price_range: Some((10.0, 100.0)),
            similarity_range: Some((0.8, 0.99)),
            ..Refinement::default()
        };
        assert_eq!(names(&refinement.apply(ranked())), vec!["Kite", "blocks"]);
    }

    #[test]
    fn test_tag_selection() {
        let refinement = Refinement {
            tags: vec!["kids".to_string(), "tech".to_string()],
            ..Refinement::default()
        };
        assert_eq!(names(&refinement.apply(ranked())), vec!["blocks", "Drone", "Puzzle"]);
    }

    #[test]
    fn test_sort_orders() {
        let by = |sort| Refinement { sort, ..Refinement::default() }.apply(ranked());

        // Kite and Puzzle share a price, so the stable sort keeps Kite first
        assert_eq!(names(&by(SortOrder::PriceLow)), vec!["yo-yo", "Kite", "Puzzle", "blocks", "Drone"]);
        assert_eq!(names(&by(SortOrder::PriceHigh)), vec!["Drone", "blocks", "Kite", "Puzzle", "yo-yo"]);
        assert_eq!(names(&by(SortOrder::Name)), vec!["blocks", "Drone", "Kite", "Puzzle", "yo-yo"]);
    }

    #[test]
    fn test_sort_order_parsing() {
        assert_eq!("price-low".parse::<SortOrder>(), Ok(SortOrder::PriceLow));
        assert!("cheapest".parse::<SortOrder>().is_err());

        let r: Refinement = serde_json::from_str(r#"{"sort": "price-high", "priceRange": [0, 50]}"#).unwrap();
        assert_eq!(r.sort, SortOrder::PriceHigh);
        assert_eq!(r.price_range, Some((0.0, 50.0)));
    }

    #[test]
    fn test_available_tags() {
        assert_eq!(
            available_tags(&ranked()),
            vec!["classic", "kids", "outdoor", "tech", "toy"]
        );
    }
}
