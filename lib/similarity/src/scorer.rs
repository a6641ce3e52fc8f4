//! Weighted multi-factor scoring and ranking
//!
//! [`SimilarityScorer`] turns a query feature vector and a candidate feature
//! vector into a single score in `[0, 1]`, and ranks whole candidate lists
//! with [`SimilarityScorer::score_products`].

use crate::distance::{
    aspect_ratio_similarity, category_similarity, linear_similarity, palette_similarity,
    tag_similarity,
};
use crate::features::{extract_features, FeatureVector};
use crate::weights::{Factor, WeightConfig};
use lookalike_core::Product;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reported scores never leave `[SCORE_FLOOR, SCORE_CEILING]`
pub const SCORE_FLOOR: f64 = 0.6;
pub const SCORE_CEILING: f64 = 0.99;
/// Default half-width of the random perturbation
pub const JITTER_AMPLITUDE: f64 = 0.05;

/// A record that can be ranked against a query image
pub trait Candidate {
    /// Image identifier the candidate's features are derived from
    fn identifier(&self) -> &str;
    fn category(&self) -> &str;
    fn tags(&self) -> &[String];
}

impl Candidate for Product {
    fn identifier(&self) -> &str {
        &self.image_url
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl<C: Candidate + ?Sized> Candidate for &C {
    fn identifier(&self) -> &str {
        (**self).identifier()
    }

    fn category(&self) -> &str {
        (**self).category()
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

/// Minimal candidate: identifier, category and tags only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub identifier: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CandidateRecord {
    pub fn new(identifier: impl Into<String>, category: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            identifier: identifier.into(),
            category: category.into(),
            tags,
        }
    }
}

impl Candidate for CandidateRecord {
    fn identifier(&self) -> &str {
        &self.identifier
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Weighted contribution of every factor to a score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
    pub color: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub aspect_ratio: f64,
    pub category: f64,
    pub tags: f64,
}

impl FactorScores {
    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Color => self.color,
            Factor::Brightness => self.brightness,
            Factor::Contrast => self.contrast,
            Factor::Saturation => self.saturation,
            Factor::AspectRatio => self.aspect_ratio,
            Factor::Category => self.category,
            Factor::Tags => self.tags,
        }
    }

    /// Unclamped weighted sum
    pub fn total(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Factor with the largest contribution (first one wins on ties)
    pub fn top_factor(&self) -> Factor {
        Factor::ALL
            .iter()
            .copied()
            .fold(Factor::Color, |best, f| if self.get(f) > self.get(best) { f } else { best })
    }
}

/// Source of the random offset added to each ranked score
pub trait ScoreJitter: Send + Sync {
    fn offset(&self) -> f64;
}

/// Uniform offset in `[-amplitude, +amplitude]` from the thread-local RNG
#[derive(Debug, Clone, Copy)]
pub struct UniformJitter {
    amplitude: f64,
}

impl UniformJitter {
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude: amplitude.abs(),
        }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new(JITTER_AMPLITUDE)
    }
}

impl ScoreJitter for UniformJitter {
    fn offset(&self) -> f64 {
        rand::rng().random_range(-self.amplitude..=self.amplitude)
    }
}

/// Always zero; rankings become reproducible
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl ScoreJitter for NoJitter {
    fn offset(&self) -> f64 {
        0.0
    }
}

/// A candidate with its score, features and per-factor breakdown
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate<C> {
    #[serde(flatten)]
    pub candidate: C,
    /// Reported score, jittered and clamped to `[0.6, 0.99]`
    pub similarity_score: f64,
    /// Weighted score before jitter, in `[0, 1]`
    pub raw_score: f64,
    pub features: FeatureVector,
    pub factors: FactorScores,
}

#[inline]
fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Scores candidates against a query image
#[derive(Debug, Clone)]
pub struct SimilarityScorer<J = UniformJitter> {
    weights: WeightConfig,
    jitter: J,
}

impl SimilarityScorer {
    /// Create a scorer with the given weights and the default jitter
    pub fn new(weights: WeightConfig) -> Self {
        Self {
            weights,
            jitter: UniformJitter::default(),
        }
    }
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(WeightConfig::default())
    }
}

impl<J: ScoreJitter> SimilarityScorer<J> {
    /// Replace the jitter source
    pub fn with_jitter<K: ScoreJitter>(self, jitter: K) -> SimilarityScorer<K> {
        SimilarityScorer {
            weights: self.weights,
            jitter,
        }
    }

    /// Get a reference to the weights
    pub fn weights(&self) -> &WeightConfig {
        &self.weights
    }

    /// Weighted per-factor contributions
    pub fn explain(
        &self,
        query: &FeatureVector,
        query_category: Option<&str>,
        candidate: &FeatureVector,
        candidate_category: &str,
        candidate_tags: &[String],
    ) -> FactorScores {
        let w = &self.weights;
        FactorScores {
            color: palette_similarity(&query.dominant_colors, &candidate.dominant_colors) * w.color,
            brightness: linear_similarity(query.brightness, candidate.brightness) * w.brightness,
            contrast: linear_similarity(query.contrast, candidate.contrast) * w.contrast,
            saturation: linear_similarity(query.saturation, candidate.saturation) * w.saturation,
            aspect_ratio: aspect_ratio_similarity(query.aspect_ratio, candidate.aspect_ratio)
                * w.aspect_ratio,
            category: category_similarity(query_category, candidate_category) * w.category,
            tags: tag_similarity(query_category, candidate_tags) * w.tags,
        }
    }

    /// Weighted similarity clamped to `[0, 1]`
    pub fn score(
        &self,
        query: &FeatureVector,
        query_category: Option<&str>,
        candidate: &FeatureVector,
        candidate_category: &str,
        candidate_tags: &[String],
    ) -> f64 {
        clamp_unit(
            self.explain(query, query_category, candidate, candidate_category, candidate_tags)
                .total(),
        )
    }

    /// Rank candidates against the image behind `query_identifier`.
    ///
    /// Every candidate is scored, jittered and clamped to `[0.6, 0.99]`, then
    /// the list is sorted by descending score. Equal scores keep their input
    /// order. Nothing is filtered out or truncated.
    pub fn score_products<C>(
        &self,
        query_identifier: &str,
        candidates: Vec<C>,
        query_category: Option<&str>,
    ) -> Vec<ScoredCandidate<C>>
    where
        C: Candidate + Send,
    {
        let query = extract_features(query_identifier);
        let count = candidates.len();

        let mut results: Vec<ScoredCandidate<C>> = candidates
            .into_par_iter()
            .map(|candidate| {
                let features = extract_features(candidate.identifier());
                let factors = self.explain(
                    &query,
                    query_category,
                    &features,
                    candidate.category(),
                    candidate.tags(),
                );
                let raw_score = clamp_unit(factors.total());
                let similarity_score =
                    (raw_score + self.jitter.offset()).clamp(SCORE_FLOOR, SCORE_CEILING);

                ScoredCandidate {
                    candidate,
                    similarity_score,
                    raw_score,
                    features,
                    factors,
                }
            })
            .collect();

        // stable: ties keep input order
        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

        debug!(candidates = count, query = query_identifier, "scored candidates");
        results
    }
}

/// Score one candidate with explicit weights and no jitter
pub fn score(
    query: &FeatureVector,
    query_category: Option<&str>,
    candidate: &FeatureVector,
    candidate_category: &str,
    candidate_tags: &[String],
    weights: &WeightConfig,
) -> f64 {
    SimilarityScorer::new(*weights).score(
        query,
        query_category,
        candidate,
        candidate_category,
        candidate_tags,
    )
}

/// Rank candidates with the default weights and jitter
pub fn score_products<C>(
    query_identifier: &str,
    candidates: Vec<C>,
    query_category: Option<&str>,
) -> Vec<ScoredCandidate<C>>
where
    C: Candidate + Send,
{
    SimilarityScorer::default().score_products(query_identifier, candidates, query_category)
}
