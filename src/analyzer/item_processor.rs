use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::analyzer::dps::estimate_dps;
use crate::analyzer::format::price_text;
use crate::analyzer::potential::{GOOD_THRESHOLD, MEDIUM_THRESHOLD};
use crate::analyzer::projection::{estimate_potential_dps, estimated_gain_pct};
use crate::analyzer::reconciler::reconcile;
use crate::analyzer::verdict::VerdictAggregator;
use crate::config::AnalysisConfig;
use crate::data::WeaponBaseDatabase;
use crate::models::{
    ItemDetails, ItemPrice, ItemRarity, ItemResponse, ItemVerdict, ModifierAnalysis,
    Recommendation, RowTag,
};

const RECOMMEND_THRESHOLD: f64 = 40.0;
const CONSIDER_THRESHOLD: f64 = 20.0;

/// Turns raw trade listings into display-ready detail records. Holds only
/// read-only tables, so one instance can be shared across worker threads.
#[derive(Debug, Clone)]
pub struct ItemProcessor {
    config: AnalysisConfig,
    bases: WeaponBaseDatabase,
}

impl ItemProcessor {
    pub fn new(config: AnalysisConfig, bases: WeaponBaseDatabase) -> Self {
        Self { config, bases }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decodes and processes one listing. Listings that fail to decode
    /// still yield a record, with no verdict and the decode error.
    pub fn process_value(&self, value: Value) -> ItemDetails {
        let id = value
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();

        match serde_json::from_value::<ItemResponse>(value) {
            Ok(response) => self.process_item(&response),
            Err(e) => {
                warn!(id = %id, "could not decode listing: {}", e);
                ItemDetails::unanalyzable(id, e.to_string(), self.config.pricing.reroll_cost)
            }
        }
    }

    pub fn process_item(&self, response: &ItemResponse) -> ItemDetails {
        let item = &response.item;
        let listing = response.listing.clone().unwrap_or_default();

        let price = listing.price.as_ref().and_then(|p| match (p.amount, &p.currency) {
            (Some(amount), Some(currency)) => Some(ItemPrice {
                amount,
                currency: currency.clone(),
            }),
            _ => None,
        });
        let price_text = price_text(
            price.as_ref().map(|p| p.amount),
            price.as_ref().map(|p| p.currency.as_str()),
        );

        let dps = estimate_dps(item, &self.bases);

        let reconciliation = reconcile(item);
        let mut modifiers = reconciliation.analyses;
        let aggregator = VerdictAggregator::new(
            &self.config.relevance,
            self.config.verdict.worth_threshold,
        );
        let verdict = aggregator.aggregate(&mut modifiers);

        let candidates: Vec<&ModifierAnalysis> =
            modifiers.iter().filter(|m| m.counts_for_verdict()).collect();
        let projection = &self.config.projection;
        let potential_dps =
            estimate_potential_dps(dps.dps, dps.pdps, &candidates, projection.damping());

        let dps_gain_pct = if dps.dps.is_some() && verdict.worth_rerolling {
            estimated_gain_pct(&candidates, projection.gain_factor)
        } else {
            0.0
        };

        let reroll_cost = self.config.pricing.reroll_cost;
        let cost_per_potential_point = if verdict.worth_rerolling && verdict.max_chance > 0.0 {
            Some(reroll_cost / verdict.max_chance)
        } else {
            None
        };

        let recommendation = recommendation(&candidates);

        debug!(
            id = %response.id,
            worth = verdict.worth_rerolling,
            max_chance = verdict.max_chance,
            skipped = reconciliation.skipped.len(),
            "processed item"
        );

        ItemDetails {
            id: response.id.clone(),
            name: item.display_name(),
            rarity: ItemRarity::from_listing(item.rarity.as_deref(), item.frame_type),
            item_level: item.ilvl,
            price,
            price_text,
            seller: listing.account.and_then(|a| a.name),
            listed_at: listing.indexed.as_deref().and_then(parse_listing_time),
            whisper: listing.whisper,
            dps,
            verdict: Some(verdict),
            potential_dps,
            dps_gain_pct,
            row_tag: row_tag(&verdict),
            recommendation,
            reroll_cost,
            cost_per_potential_point,
            modifiers,
            skipped: reconciliation.skipped,
            error: None,
        }
    }
}

pub fn row_tag(verdict: &ItemVerdict) -> RowTag {
    if !verdict.worth_rerolling {
        RowTag::NotWorth
    } else if verdict.max_chance >= GOOD_THRESHOLD {
        RowTag::WorthGood
    } else if verdict.max_chance >= MEDIUM_THRESHOLD {
        RowTag::WorthMedium
    } else {
        RowTag::WorthBad
    }
}

/// `None` when no damage modifier has any room left.
pub fn recommendation(candidates: &[&ModifierAnalysis]) -> Option<Recommendation> {
    let best = candidates
        .iter()
        .filter_map(|m| m.potential_pct())
        .fold(0.0_f64, f64::max);

    if best <= 0.0 {
        None
    } else if best >= RECOMMEND_THRESHOLD {
        Some(Recommendation::Recommended)
    } else if best >= CONSIDER_THRESHOLD {
        Some(Recommendation::Consider)
    } else {
        Some(Recommendation::NotRecommended)
    }
}

fn parse_listing_time(indexed: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(indexed) {
        Ok(time) => Some(time.with_timezone(&Utc)),
        Err(e) => {
            debug!(indexed, "unparseable listing time: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processor() -> ItemProcessor {
        ItemProcessor::new(
            AnalysisConfig::default(),
            WeaponBaseDatabase::builtin().unwrap(),
        )
    }

    fn bow_listing() -> Value {
        json!({
            "id": "abc123",
            "listing": {
                "indexed": "2025-01-15T20:31:07Z",
                "account": { "name": "Seller#1234" },
                "whisper": "@Seller hi",
                "price": { "amount": 3, "currency": "divine" }
            },
            "item": {
                "name": "Storm Song",
                "typeLine": "Gemini Bow",
                "baseType": "Gemini Bow",
                "rarity": "Rare",
                "ilvl": 79,
                "properties": [
                    { "name": "Physical Damage", "values": [["50-100", 1]] },
                    { "name": "Attacks per Second", "values": [["1.2", 0]] }
                ],
                "explicitMods": [
                    "100% increased Physical Damage",
                    "+80 to maximum Life"
                ],
                "extended": {
                    "mods": {
                        "explicit": [
                            { "name": "Tyrannical", "tier": "S2", "magnitudes": [
                                { "hash": "explicit.stat_1509134228", "min": 80, "max": 120 }
                            ]},
                            { "name": "of the Whale", "tier": "P1", "magnitudes": [
                                { "hash": "explicit.stat_3299347043", "min": 70, "max": 89 }
                            ]}
                        ]
                    },
                    "hashes": {
                        "explicit": [
                            ["explicit.stat_1509134228", [0]],
                            ["explicit.stat_3299347043", [1]]
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn test_process_listing() {
        let details = processor().process_value(bow_listing());

        assert_eq!(details.id, "abc123");
        assert_eq!(details.name, "Storm Song Gemini Bow");
        assert_eq!(details.rarity, ItemRarity::Rare);
        assert_eq!(details.item_level, Some(79));
        assert_eq!(details.price_text, "3 divine");
        assert_eq!(details.seller.as_deref(), Some("Seller#1234"));
        assert!(details.listed_at.is_some());
        assert!(details.error.is_none());

        assert_eq!(details.dps.pdps, Some(90.0));
        assert_eq!(details.dps.dps, Some(90.0));

        let verdict = details.verdict.unwrap();
        assert!(verdict.worth_rerolling);
        assert!((verdict.max_chance - 50.0).abs() < 1e-9);
        assert_eq!(details.row_tag, RowTag::WorthMedium);
        assert_eq!(details.recommendation, Some(Recommendation::Recommended));
        assert!((details.dps_gain_pct - 15.0).abs() < 1e-9);
        assert!((details.cost_per_potential_point.unwrap() - 3.0).abs() < 1e-9);

        assert_eq!(details.modifiers.len(), 2);
        assert!(details.modifiers[0].damage_relevant);
        assert_eq!(details.modifiers[0].tiers, vec!["T2".to_string()]);
        assert!(!details.modifiers[1].damage_relevant);

        let projection = details.potential_dps;
        assert_eq!(projection.min_dps, Some(90.0));
        assert!((projection.max_dps.unwrap() - 126.0).abs() < 1e-9);
    }

    #[test]
    fn test_malformed_display_fields_keep_analysis() {
        let mut listing = bow_listing();
        listing["item"]["ilvl"] = json!("82");
        listing["item"]["frameType"] = json!(null);
        listing["item"]["properties"]
            .as_array_mut()
            .unwrap()
            .push(json!({ "name": null, "values": [["+5%", 0]] }));
        listing["listing"]["account"]["name"] = json!(17);

        let details = processor().process_value(listing);
        assert!(details.error.is_none());
        assert_eq!(details.item_level, Some(82));
        assert_eq!(details.seller, None);
        assert_eq!(details.dps.pdps, Some(90.0));
        assert!(details.verdict.unwrap().worth_rerolling);
        assert_eq!(details.modifiers.len(), 2);
    }

    #[test]
    fn test_undecodable_listing_still_appears() {
        let details = processor().process_value(json!({ "id": "broken", "item": 42 }));
        assert_eq!(details.id, "broken");
        assert!(details.verdict.is_none());
        assert!(details.error.is_some());
        assert_eq!(details.row_tag, RowTag::NotWorth);
    }

    #[test]
    fn test_item_without_extended_data() {
        let details = processor().process_value(json!({
            "id": "plain",
            "item": { "typeLine": "Leather Vest", "explicitMods": ["+20 to maximum Life"] }
        }));

        let verdict = details.verdict.unwrap();
        assert!(!verdict.worth_rerolling);
        assert_eq!(details.row_tag, RowTag::NotWorth);
        assert_eq!(details.recommendation, None);
        assert_eq!(details.price_text, "No price");
        assert!(details.dps.is_empty());
        assert_eq!(details.modifiers.len(), 1);
    }

    #[test]
    fn test_row_tag_and_recommendation_bands() {
        let verdict = |worth, max_chance| ItemVerdict {
            worth_rerolling: worth,
            max_chance,
            max_overall_chance: max_chance,
        };
        assert_eq!(row_tag(&verdict(true, 65.0)), RowTag::WorthGood);
        assert_eq!(row_tag(&verdict(true, 35.0)), RowTag::WorthMedium);
        assert_eq!(row_tag(&verdict(true, 10.0)), RowTag::WorthBad);
        assert_eq!(row_tag(&verdict(false, 90.0)), RowTag::NotWorth);
        assert_eq!(recommendation(&[]), None);
    }
}
