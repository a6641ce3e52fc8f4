//! Per-factor similarity functions
//!
//! Each function compares one aspect of two feature vectors (or of the
//! query category against a candidate) and returns a similarity where 1.0
//! means identical. Weighting happens in the scorer.

use crate::features::Rgb;

/// Normalizer for RGB distances, ~ the distance from black to white
pub const MAX_RGB_DISTANCE: f64 = 441.67;

/// Color term when either palette is empty
pub const NEUTRAL_COLOR_SIMILARITY: f64 = 0.5;

pub const CATEGORY_MATCH: f64 = 1.0;
/// Cross-category candidates keep 70% of the category weight
pub const CATEGORY_MISMATCH: f64 = 0.7;

pub const TAG_NEUTRAL: f64 = 0.5;
pub const TAG_MATCH: f64 = 1.0;
pub const TAG_MISMATCH: f64 = 0.3;

/// Treat an empty query category the same as no category
#[inline]
pub fn defined_category(category: Option<&str>) -> Option<&str> {
    category.filter(|c| !c.is_empty())
}

/// Similarity of two colors: `1 - distance / 441.67`, floored at 0
#[inline]
pub fn color_similarity(a: &Rgb, b: &Rgb) -> f64 {
    (1.0 - a.distance(b) / MAX_RGB_DISTANCE).max(0.0)
}

/// Best match over every pair of colors from the two palettes
pub fn palette_similarity(query: &[Rgb], candidate: &[Rgb]) -> f64 {
    if query.is_empty() || candidate.is_empty() {
        return NEUTRAL_COLOR_SIMILARITY;
    }

    query
        .iter()
        .flat_map(|q| candidate.iter().map(move |c| color_similarity(q, c)))
        .fold(0.0, f64::max)
}

/// `1 - |a - b|` for brightness, contrast and saturation
#[inline]
pub fn linear_similarity(a: f64, b: f64) -> f64 {
    1.0 - (a - b).abs()
}

/// Aspect-ratio differences of 2.0 or more give zero similarity
#[inline]
pub fn aspect_ratio_similarity(a: f64, b: f64) -> f64 {
    1.0 - ((a - b).abs() / 2.0).min(1.0)
}

/// Exact (case-sensitive) category match bonus
pub fn category_similarity(query_category: Option<&str>, candidate_category: &str) -> f64 {
    match defined_category(query_category) {
        Some(q) if q == candidate_category => CATEGORY_MATCH,
        _ => CATEGORY_MISMATCH,
    }
}

/// Whether any tag and the query category contain one another, ignoring case
pub fn tag_similarity(query_category: Option<&str>, candidate_tags: &[String]) -> f64 {
    let query = match defined_category(query_category) {
        Some(q) if !candidate_tags.is_empty() => q.to_lowercase(),
        _ => return TAG_NEUTRAL,
    };

    let matched = candidate_tags.iter().any(|tag| {
        let tag = tag.to_lowercase();
        tag.contains(&query) || query.contains(&tag)
    });

    if matched {
        TAG_MATCH
    } else {
        TAG_MISMATCH
    }
}
