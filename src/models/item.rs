use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::item_type::ItemRarity;
use super::modifier::{ModifierAnalysis, SkippedStat};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemVerdict {
    pub worth_rerolling: bool,
    /// Best potential among damage-relevant `ok` modifiers.
    pub max_chance: f64,
    /// Best potential among all `ok` modifiers.
    pub max_overall_chance: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DpsEstimate {
    pub dps: Option<f64>,
    pub pdps: Option<f64>,
    pub edps: Option<f64>,
}

impl DpsEstimate {
    pub fn is_empty(&self) -> bool {
        self.dps.is_none() && self.pdps.is_none() && self.edps.is_none()
    }
}

/// Heuristic best-case DPS after rerolling. `min <= avg <= max` when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PotentialDps {
    pub min_dps: Option<f64>,
    pub avg_dps: Option<f64>,
    pub max_dps: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub amount: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowTag {
    WorthGood,
    WorthMedium,
    WorthBad,
    NotWorth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Recommended,
    Consider,
    NotRecommended,
}

/// Everything derived from one listing, kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: String,
    pub name: String,
    pub rarity: ItemRarity,
    pub item_level: Option<u32>,
    pub price: Option<ItemPrice>,
    pub price_text: String,
    pub seller: Option<String>,
    pub listed_at: Option<DateTime<Utc>>,
    pub whisper: Option<String>,
    pub dps: DpsEstimate,
    /// `None` when the item could not be analyzed.
    pub verdict: Option<ItemVerdict>,
    pub potential_dps: PotentialDps,
    pub dps_gain_pct: f64,
    pub row_tag: RowTag,
    pub recommendation: Option<Recommendation>,
    pub reroll_cost: f64,
    pub cost_per_potential_point: Option<f64>,
    pub modifiers: Vec<ModifierAnalysis>,
    pub skipped: Vec<SkippedStat>,
    pub error: Option<String>,
}

impl ItemDetails {
    /// Placeholder for a listing that could not even be decoded.
    pub fn unanalyzable(id: String, error: String, reroll_cost: f64) -> Self {
        Self {
            id,
            name: "Unknown Item".to_string(),
            rarity: ItemRarity::Other,
            item_level: None,
            price: None,
            price_text: "No price".to_string(),
            seller: None,
            listed_at: None,
            whisper: None,
            dps: DpsEstimate::default(),
            verdict: None,
            potential_dps: PotentialDps::default(),
            dps_gain_pct: 0.0,
            row_tag: RowTag::NotWorth,
            recommendation: None,
            reroll_cost,
            cost_per_potential_point: None,
            modifiers: Vec::new(),
            skipped: Vec::new(),
            error: Some(error),
        }
    }

    pub fn is_worth_rerolling(&self) -> bool {
        self.verdict.map(|v| v.worth_rerolling).unwrap_or(false)
    }
}
