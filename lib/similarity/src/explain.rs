//! Summary statistics for a similarity search
//!
//! Output structures describing a finished search: how many results came
//! back, how long it took, and which factor drove the best match.

use crate::scorer::ScoredCandidate;
use crate::weights::Factor;
use serde::Serialize;
use std::time::Duration;

/// Label reported when a search is not restricted to a category
pub const ALL_CATEGORIES: &str = "All Categories";

/// Summary statistics for a similarity query
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    /// Number of results returned
    pub total_results: usize,
    /// Wall-clock search time in seconds
    pub search_time: f64,
    /// Average reported score of results
    pub average_similarity: f64,
    /// Score of best result
    pub best_score: f64,
    /// Factor that contributed most to best result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_contributing_factor: Option<Factor>,
}

impl SearchStats {
    /// Compute stats from results sorted best-first
    pub fn compute<C>(results: &[ScoredCandidate<C>], elapsed: Duration) -> Self {
        let search_time = elapsed.as_secs_f64();

        let Some(best) = results.first() else {
            return Self {
                total_results: 0,
                search_time,
                average_similarity: 0.0,
                best_score: 0.0,
                top_contributing_factor: None,
            };
        };

        let sum: f64 = results.iter().map(|r| r.similarity_score).sum();

        Self {
            total_results: results.len(),
            search_time,
            average_similarity: sum / results.len() as f64,
            best_score: best.similarity_score,
            top_contributing_factor: Some(best.factors.top_factor()),
        }
    }
}

/// Describes what a search looked at
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    /// Candidates scored before thresholding
    pub total_scanned: usize,
    pub min_similarity: f64,
    /// Category searched, or "All Categories"
    pub category: String,
}

impl SearchMetadata {
    pub fn new(total_scanned: usize, min_similarity: f64, category: Option<&str>) -> Self {
        Self {
            total_scanned,
            min_similarity,
            category: category
                .filter(|c| !c.is_empty())
                .unwrap_or(ALL_CATEGORIES)
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{CandidateRecord, FactorScores};
    use crate::features::extract_features;

    fn scored(id: &str, score: f64, factors: FactorScores) -> ScoredCandidate<CandidateRecord> {
        ScoredCandidate {
            candidate: CandidateRecord::new(id, "toys", vec![]),
            similarity_score: score,
            raw_score: score,
            features: extract_features(id),
            factors,
        }
    }

    #[test]
    fn test_search_stats() {
        let factors = FactorScores {
            saturation: 0.14,
            color: 0.1,
            ..FactorScores::default()
        };
        let results = vec![
            scored("1", 0.95, factors),
            scored("2", 0.85, FactorScores::default()),
            scored("3", 0.75, FactorScores::default()),
        ];

        let stats = SearchStats::compute(&results, Duration::from_millis(250));

        assert_eq!(stats.total_results, 3);
        assert_eq!(stats.best_score, 0.95);
        assert!((stats.average_similarity - 0.85).abs() < 1e-9);
        assert!((stats.search_time - 0.25).abs() < 1e-9);
        assert_eq!(stats.top_contributing_factor, Some(Factor::Saturation));
    }

    #[test]
    fn test_empty_stats() {
        let results: Vec<ScoredCandidate<CandidateRecord>> = Vec::new();
        let stats = SearchStats::compute(&results, Duration::ZERO);

        assert_eq!(stats.total_results, 0);
        assert_eq!(stats.average_similarity, 0.0);
        assert!(stats.top_contributing_factor.is_none());

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("topContributingFactor").is_none());
        assert_eq!(json["totalResults"], 0);
    }

    #[test]
    fn test_metadata_category_label() {
        assert_eq!(SearchMetadata::new(10, 0.6, None).category, ALL_CATEGORIES);
        assert_eq!(SearchMetadata::new(10, 0.6, Some("")).category, ALL_CATEGORIES);
        assert_eq!(SearchMetadata::new(10, 0.6, Some("books")).category, "books");
    }
}
