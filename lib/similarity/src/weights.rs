//! Weight configuration for the similarity factors
//!
//! Weights are non-negative coefficients, one per factor. They are not
//! required to sum to 1.0; the scorer clamps its output instead.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// The factors combined into a similarity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Factor {
    Color,
    Brightness,
    Contrast,
    Saturation,
    AspectRatio,
    Category,
    Tags,
}

impl Factor {
    pub const ALL: [Factor; 7] = [
        Factor::Color,
        Factor::Brightness,
        Factor::Contrast,
        Factor::Saturation,
        Factor::AspectRatio,
        Factor::Category,
        Factor::Tags,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Factor::Color => "color",
            Factor::Brightness => "brightness",
            Factor::Contrast => "contrast",
            Factor::Saturation => "saturation",
            Factor::AspectRatio => "aspectRatio",
            Factor::Category => "category",
            Factor::Tags => "tags",
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Factor {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "color" => Ok(Factor::Color),
            "brightness" => Ok(Factor::Brightness),
            "contrast" => Ok(Factor::Contrast),
            "saturation" => Ok(Factor::Saturation),
            "aspectRatio" | "aspect_ratio" => Ok(Factor::AspectRatio),
            "category" => Ok(Factor::Category),
            "tags" => Ok(Factor::Tags),
            other => Err(WeightError::UnknownFactor(other.to_string())),
        }
    }
}

/// Per-factor weights
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeightConfig {
    pub color: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub saturation: f64,
    pub aspect_ratio: f64,
    pub category: f64,
    pub tags: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            color: 0.30,
            brightness: 0.15,
            contrast: 0.10,
            saturation: 0.15,
            aspect_ratio: 0.10,
            category: 0.15,
            tags: 0.05,
        }
    }
}

impl WeightConfig {
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

    pub fn set(&mut self, factor: Factor, weight: f64) {
        let slot = match factor {
            Factor::Color => &mut self.color,
            Factor::Brightness => &mut self.brightness,
            Factor::Contrast => &mut self.contrast,
            Factor::Saturation => &mut self.saturation,
            Factor::AspectRatio => &mut self.aspect_ratio,
            Factor::Category => &mut self.category,
            Factor::Tags => &mut self.tags,
        };
        *slot = weight;
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Check every weight is finite and non-negative
    pub fn validate(&self) -> Result<(), WeightError> {
        for factor in Factor::ALL {
            let weight = self.get(factor);
            if !weight.is_finite() {
                return Err(WeightError::NonFinite(factor));
            }
            if weight < 0.0 {
                return Err(WeightError::NegativeWeight(factor));
            }
        }
        Ok(())
    }

    /// Copy of these weights with some factors replaced.
    ///
    /// Keys are factor names (`"color"`, `"aspectRatio"`, ...). The result
    /// is validated but not normalized.
    pub fn with_overrides(&self, overrides: &HashMap<String, f64>) -> Result<WeightConfig, WeightError> {
        let mut weights = *self;
        for (name, weight) in overrides {
            weights.set(name.parse()?, *weight);
        }
        weights.validate()?;
        Ok(weights)
    }
}

/// Errors that can occur during weight validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("Factor '{0}' has negative weight")]
    NegativeWeight(Factor),

    #[error("Factor '{0}' has a non-finite weight")]
    NonFinite(Factor),

    #[error("Unknown similarity factor '{0}'")]
    UnknownFactor(String),
}
