use serde::{Deserialize, Serialize};

use crate::models::ModifierAnalysis;

/// Current revision of the built-in damage-relevance table.
pub const RELEVANCE_TABLE_VERSION: u32 = 1;

/// Stat identifiers and text rules deciding which modifiers affect damage
/// output. Only these modifiers count toward the reroll verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageRelevance {
    pub version: u32,
    #[serde(default)]
    pub stats: Vec<RelevantStat>,
    #[serde(default)]
    pub keywords: Vec<KeywordRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelevantStat {
    pub id: String,
    #[serde(default)]
    pub label: String,
}

/// A text heuristic for modifiers without a stat identifier. Every set
/// condition must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Case-insensitive prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_with: Option<String>,
    /// All must appear.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<String>,
    /// At least one must appear.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<String>,
    /// None may appear.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<String>,
}

impl KeywordRule {
    pub fn matches(&self, text: &str) -> bool {
        if let Some(prefix) = &self.starts_with {
            if !text.to_lowercase().starts_with(&prefix.to_lowercase()) {
                return false;
            }
        }

        self.contains.iter().all(|k| text.contains(k.as_str()))
            && (self.any_of.is_empty() || self.any_of.iter().any(|k| text.contains(k.as_str())))
            && !self.excludes.iter().any(|k| text.contains(k.as_str()))
    }
}

impl Default for DamageRelevance {
    fn default() -> Self {
        let stat = |id: &str, label: &str| RelevantStat {
            id: id.to_string(),
            label: label.to_string(),
        };
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();

        Self {
            version: RELEVANCE_TABLE_VERSION,
            stats: vec![
                stat("explicit.stat_1509134228", "Increased Physical Damage"),
                stat("explicit.stat_2901986750", "Increased Physical Damage (local)"),
                stat("explicit.stat_1940865751", "Adds Physical Damage"),
                stat("explicit.stat_210067635", "Attack Speed"),
                stat("explicit.stat_2923486259", "Attack Speed (local)"),
                stat("explicit.stat_2628039082", "Critical Strike Chance"),
                stat("explicit.stat_2311243048", "Critical Strike Multiplier"),
                stat("explicit.stat_2301191210", "Critical Strike Multiplier"),
                stat("explicit.stat_709508406", "Adds Fire Damage"),
                stat("explicit.stat_1999113824", "Adds Cold Damage"),
                stat("explicit.stat_737908626", "Adds Lightning Damage"),
                stat("explicit.stat_1202301673", "+# to Level of all Projectile Skills"),
            ],
            keywords: vec![
                KeywordRule {
                    contains: words(&["Physical Damage"]),
                    excludes: words(&["taken"]),
                    ..Default::default()
                },
                KeywordRule {
                    contains: words(&["Attack Speed"]),
                    ..Default::default()
                },
                KeywordRule {
                    contains: words(&["Critical"]),
                    any_of: words(&["Chance", "Multiplier"]),
                    ..Default::default()
                },
                KeywordRule {
                    starts_with: Some("adds".to_string()),
                    any_of: words(&[
                        "Fire Damage",
                        "Cold Damage",
                        "Lightning Damage",
                        "Chaos Damage",
                    ]),
                    ..Default::default()
                },
                KeywordRule {
                    contains: words(&["to Level of all"]),
                    ..Default::default()
                },
            ],
        }
    }
}

impl DamageRelevance {
    /// Matches on the part after the scope prefix, so `implicit.stat_X`
    /// and `explicit.stat_X` are the same stat.
    pub fn is_relevant_stat(&self, stat_id: &str) -> bool {
        let wanted = strip_scope(stat_id);
        self.stats.iter().any(|s| strip_scope(&s.id) == wanted)
    }

    pub fn matches_keywords(&self, text: &str) -> bool {
        self.keywords.iter().any(|rule| rule.matches(text))
    }

    /// Structured stats go by identifier; text-only modifiers by keyword.
    pub fn is_relevant(&self, analysis: &ModifierAnalysis) -> bool {
        match &analysis.stat_id {
            Some(stat_id) => self.is_relevant_stat(stat_id),
            None => self.matches_keywords(&analysis.text),
        }
    }

    pub fn label_for(&self, stat_id: &str) -> Option<&str> {
        let wanted = strip_scope(stat_id);
        self.stats
            .iter()
            .find(|s| strip_scope(&s.id) == wanted)
            .map(|s| s.label.as_str())
    }
}

fn strip_scope(stat_id: &str) -> &str {
    stat_id.split_once('.').map(|(_, rest)| rest).unwrap_or(stat_id)
}
