//! Analysis settings loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analyzer::projection::Damping;
use crate::analyzer::relevance::DamageRelevance;
use crate::errors::{AnalyzerError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub verdict: VerdictConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub relevance: DamageRelevance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictConfig {
    /// A damage modifier needs strictly more potential than this.
    #[serde(default = "default_worth_threshold")]
    pub worth_threshold: f64,
}

impl Default for VerdictConfig {
    fn default() -> Self {
        VerdictConfig {
            worth_threshold: default_worth_threshold(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default = "default_max_damping")]
    pub max_damping: f64,
    #[serde(default = "default_avg_damping")]
    pub avg_damping: f64,
    /// Best damage-modifier potential times this is the estimated DPS gain.
    #[serde(default = "default_gain_factor")]
    pub gain_factor: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig {
            max_damping: default_max_damping(),
            avg_damping: default_avg_damping(),
            gain_factor: default_gain_factor(),
        }
    }
}

impl ProjectionConfig {
    pub fn damping(&self) -> Damping {
        Damping {
            avg: self.avg_damping,
            max: self.max_damping,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Market cost of one reroll currency, a fixed estimate.
    #[serde(default = "default_reroll_cost")]
    pub reroll_cost: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            reroll_cost: default_reroll_cost(),
            currency: default_currency(),
        }
    }
}

fn default_worth_threshold() -> f64 {
    0.1
}
fn default_max_damping() -> f64 {
    0.8
}
fn default_avg_damping() -> f64 {
    0.4
}
fn default_gain_factor() -> f64 {
    0.3
}
fn default_reroll_cost() -> f64 {
    150.0
}
fn default_currency() -> String {
    "divine".to_string()
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.verdict.worth_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(AnalyzerError::Validation(format!(
                "worth_threshold must be within 0..=100, got {}",
                threshold
            )));
        }

        let projection = &self.projection;
        if projection.avg_damping < 0.0
            || projection.max_damping < 0.0
            || projection.gain_factor < 0.0
        {
            return Err(AnalyzerError::Validation(
                "projection factors must not be negative".to_string(),
            ));
        }
        if projection.avg_damping > projection.max_damping {
            return Err(AnalyzerError::Validation(format!(
                "avg_damping ({}) exceeds max_damping ({})",
                projection.avg_damping, projection.max_damping
            )));
        }

        if self.pricing.reroll_cost.is_nan() || self.pricing.reroll_cost <= 0.0 {
            return Err(AnalyzerError::Validation(format!(
                "reroll_cost must be positive, got {}",
                self.pricing.reroll_cost
            )));
        }

        if self.relevance.version == 0 {
            return Err(AnalyzerError::Validation(
                "relevance table version must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    parse_toml(&content)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Reads and validates an analysis config, or the defaults without a path.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let config = match path {
        Some(path) => load_toml::<AnalysisConfig>(path)?,
        None => AnalysisConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
