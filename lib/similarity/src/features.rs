//! Synthetic visual feature extraction
//!
//! Features are derived from the image identifier string alone, never from
//! pixel data. The identifier is hashed into a seed for a sine-scrambled
//! pseudo-random generator, and a fixed sequence of draws fills in the
//! feature vector. Same identifier, same process, same vector.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::fmt;

/// Lower bound and width of each generated scalar feature
const BRIGHTNESS: (f64, f64) = (0.2, 0.6);
const CONTRAST: (f64, f64) = (0.1, 0.8);
const SATURATION: (f64, f64) = (0.1, 0.9);
const ASPECT_RATIO: (f64, f64) = (0.5, 2.0);
const COMPLEXITY: (f64, f64) = (0.2, 0.8);

pub const MIN_DOMINANT_COLORS: usize = 2;
pub const MAX_DOMINANT_COLORS: usize = 4;

/// An RGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Euclidean distance in RGB space
    #[inline]
    pub fn distance(&self, other: &Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).ok_or_else(|| de::Error::custom(format!("invalid hex color: {}", s)))
    }
}

/// Synthetic descriptor of an image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// 2 to 4 colors in generation order
    pub dominant_colors: SmallVec<[Rgb; MAX_DOMINANT_COLORS]>,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub aspect_ratio: f64,
    /// Not used for scoring
    pub complexity: f64,
}

/// Deterministic generator seeded from a number.
///
/// `state = sin(seed) * 10000`; every draw replaces the state with
/// `sin(state) * 10000` and yields its fractional part.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: f64,
}

impl SeededRandom {
    #[must_use]
    pub fn new(seed: f64) -> Self {
        Self {
            state: seed.sin() * 10000.0,
        }
    }

    /// Seed from the rolling hash of `identifier`
    #[must_use]
    pub fn from_identifier(identifier: &str) -> Self {
        Self::new(f64::from(string_hash(identifier)))
    }

    /// Next value in `[0, 1)`
    pub fn draw(&mut self) -> f64 {
        self.state = self.state.sin() * 10000.0;
        self.state - self.state.floor()
    }
}

impl Iterator for SeededRandom {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.draw())
    }
}

/// `hash * 31 + unit` over UTF-16 code units with 32-bit signed
/// wrap-around, then the absolute value.
pub fn string_hash(s: &str) -> u32 {
    let hash = s
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)));
    hash.unsigned_abs()
}

#[inline]
fn rescale(draw: f64, (min, span): (f64, f64)) -> f64 {
    draw * span + min
}

#[inline]
fn channel(draw: f64) -> u8 {
    // float-to-int casts saturate, so a draw rounding up to 1.0 still maps to 255
    (draw * 256.0).floor() as u8
}

fn generate_dominant_colors(rng: &mut SeededRandom) -> SmallVec<[Rgb; MAX_DOMINANT_COLORS]> {
    let extra = ((rng.draw() * 3.0).floor() as usize).min(MAX_DOMINANT_COLORS - MIN_DOMINANT_COLORS);
    let count = MIN_DOMINANT_COLORS + extra;

    (0..count)
        .map(|_| {
            let r = channel(rng.draw());
            let g = channel(rng.draw());
            let b = channel(rng.draw());
            Rgb::new(r, g, b)
        })
        .collect()
}

/// Derive the synthetic feature vector of an image identifier.
///
/// Any string is accepted and the function never fails.
pub fn extract_features(identifier: &str) -> FeatureVector {
    let mut rng = SeededRandom::from_identifier(identifier);

    // Draw order is part of the contract: colors first, then the scalars
    let dominant_colors = generate_dominant_colors(&mut rng);
    let brightness = rescale(rng.draw(), BRIGHTNESS);
    let contrast = rescale(rng.draw(), CONTRAST);
    let saturation = rescale(rng.draw(), SATURATION);
    let aspect_ratio = rescale(rng.draw(), ASPECT_RATIO);
    let complexity = rescale(rng.draw(), COMPLEXITY);

    FeatureVector {
        dominant_colors,
        brightness,
        contrast,
        saturation,
        aspect_ratio,
        complexity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_identifiers() -> Vec<String> {
        let mut ids: Vec<String> = (0..500)
            .map(|i| format!("https://cdn.example.com/images/product-{}.jpg", i))
            .collect();
        ids.extend(
            [
                "/golden-retriever-puppy.png",
                "/placeholder.svg?height=300&width=300",
                "http://x/red.jpg",
                "upload://3f2c/photo.png",
                "ünïcødé-ẞ-🙂.jpg",
                "a",
                "",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        ids
    }

    #[test]
    fn test_string_hash_known_values() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        assert_eq!(string_hash("hello"), 99_162_322);
    }

    #[test]
    fn test_string_hash_wraps_to_min_int() {
        // 32-bit hash of this string is exactly i32::MIN
        assert_eq!(string_hash("polygenelubricants"), 2_147_483_648);
    }

    #[test]
    fn test_seeded_random_is_reproducible() {
        let a: Vec<f64> = SeededRandom::new(12345.0).take(32).collect();
        let b: Vec<f64> = SeededRandom::new(12345.0).take(32).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|v| (0.0..1.0).contains(v)));

        let c: Vec<f64> = SeededRandom::new(12346.0).take(32).collect();
        assert_ne!(a, c);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        for id in sample_identifiers() {
            assert_eq!(extract_features(&id), extract_features(&id), "identifier {:?}", id);
        }
    }

    #[test]
    fn test_extraction_ranges() {
        for id in sample_identifiers() {
            let f = extract_features(&id);
            assert!((0.2..=0.8).contains(&f.brightness), "brightness {} for {:?}", f.brightness, id);
            assert!((0.1..=0.9).contains(&f.contrast), "contrast {} for {:?}", f.contrast, id);
            assert!((0.1..=1.0).contains(&f.saturation), "saturation {} for {:?}", f.saturation, id);
            assert!((0.5..=2.5).contains(&f.aspect_ratio), "aspect {} for {:?}", f.aspect_ratio, id);
            assert!((0.2..=1.0).contains(&f.complexity), "complexity {} for {:?}", f.complexity, id);
            assert!(
                (MIN_DOMINANT_COLORS..=MAX_DOMINANT_COLORS).contains(&f.dominant_colors.len()),
                "{} colors for {:?}",
                f.dominant_colors.len(),
                id
            );
        }
    }

    #[test]
    fn test_empty_identifier_sits_on_lower_bounds() {
        // hash 0 -> sin(0) = 0 -> every draw is 0
        let f = extract_features("");
        assert_eq!(f.dominant_colors.as_slice(), &[Rgb::new(0, 0, 0), Rgb::new(0, 0, 0)]);
        assert_eq!(f.brightness, 0.2);
        assert_eq!(f.contrast, 0.1);
        assert_eq!(f.saturation, 0.1);
        assert_eq!(f.aspect_ratio, 0.5);
        assert_eq!(f.complexity, 0.2);
    }

    #[test]
    fn test_different_identifiers_differ() {
        let a = extract_features("/red-apples-fresh.jpg");
        let b = extract_features("/yellow-bananas-ripe.jpg");
        assert_ne!(a, b);
    }

    #[test]
    fn test_color_count_varies_across_identifiers() {
        let counts: std::collections::HashSet<usize> = sample_identifiers()
            .iter()
            .map(|id| extract_features(id).dominant_colors.len())
            .collect();
        assert!(counts.len() > 1);
    }

    #[test]
    fn test_rgb_hex() {
        let c = Rgb::new(255, 8, 171);
        assert_eq!(c.to_hex(), "#ff08ab");
        assert_eq!(Rgb::from_hex("#FF08AB"), Some(c));
        assert_eq!(Rgb::from_hex("ff08ab"), Some(c));
        assert_eq!(Rgb::from_hex("#ff08a"), None);
        assert_eq!(Rgb::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_feature_vector_serde() {
        let f = extract_features("http://x/red.jpg");
        let json = serde_json::to_value(&f).unwrap();

        assert!(json["dominantColors"][0].as_str().unwrap().starts_with('#'));
        assert!(json.get("aspectRatio").is_some());

        let back: FeatureVector = serde_json::from_value(json).unwrap();
        assert_eq!(back.dominant_colors, f.dominant_colors);
        assert!((back.brightness - f.brightness).abs() < 1e-12);
        assert!((back.aspect_ratio - f.aspect_ratio).abs() < 1e-12);
    }
}
