use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::modifier::ModScope;

/// One listing as returned by the trade2 fetch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub item: ItemData,
    #[serde(default)]
    pub listing: Option<ListingData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemData {
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub type_line: String,
    #[serde(deserialize_with = "nullable")]
    pub base_type: String,
    #[serde(deserialize_with = "optional_text")]
    pub rarity: Option<String>,
    #[serde(deserialize_with = "optional_integer")]
    pub frame_type: Option<i32>,
    #[serde(deserialize_with = "optional_integer")]
    pub ilvl: Option<u32>,
    #[serde(deserialize_with = "nullable")]
    pub properties: Vec<Property>,
    #[serde(deserialize_with = "nullable")]
    pub explicit_mods: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub implicit_mods: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub extended: ExtendedData,
}

impl ItemData {
    pub fn mod_lines(&self, scope: ModScope) -> &[String] {
        match scope {
            ModScope::Explicit => &self.explicit_mods,
            ModScope::Implicit => &self.implicit_mods,
        }
    }

    /// Name + type line, collapsed when one already contains the other.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        let type_line = self.type_line.trim();

        let full_name = match (name.is_empty(), type_line.is_empty()) {
            (false, false) if type_line.contains(name) => type_line.to_string(),
            (false, false) => format!("{} {}", name, type_line),
            (true, false) => type_line.to_string(),
            (false, true) => name.to_string(),
            (true, true) => String::new(),
        };

        if !full_name.is_empty() {
            full_name
        } else if !self.base_type.trim().is_empty() {
            self.base_type.trim().to_string()
        } else {
            "Unknown Item".to_string()
        }
    }

    /// Base type used for weapon base lookups, falling back to the type line.
    pub fn base_type_or_type_line(&self) -> &str {
        if self.base_type.trim().is_empty() {
            &self.type_line
        } else {
            &self.base_type
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub values: Vec<Value>,
}

impl Property {
    pub fn new(name: &str, values: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            values: values
                .iter()
                .map(|v| Value::Array(vec![Value::String(v.to_string()), Value::from(0)]))
                .collect(),
        }
    }

    /// The display strings of every `[value, type]` pair.
    pub fn value_strings(&self) -> Vec<String> {
        self.values.iter().filter_map(pair_value).collect()
    }

    pub fn first_value(&self) -> Option<String> {
        self.values.first().and_then(pair_value)
    }
}

fn pair_value(pair: &Value) -> Option<String> {
    match pair.as_array()?.first()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExtendedData {
    #[serde(deserialize_with = "nullable")]
    pub mods: ModData,
    #[serde(deserialize_with = "nullable")]
    pub hashes: HashData,
    #[serde(deserialize_with = "numeric_only")]
    pub dps: Option<f64>,
    #[serde(deserialize_with = "numeric_only")]
    pub pdps: Option<f64>,
    #[serde(deserialize_with = "numeric_only")]
    pub edps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModData {
    #[serde(deserialize_with = "nullable")]
    pub explicit: Vec<ModInfo>,
    #[serde(deserialize_with = "nullable")]
    pub implicit: Vec<ModInfo>,
}

impl ModData {
    pub fn for_scope(&self, scope: ModScope) -> &[ModInfo] {
        match scope {
            ModScope::Explicit => &self.explicit,
            ModScope::Implicit => &self.implicit,
        }
    }
}

/// Structured descriptor of one rolled mod.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModInfo {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub tier: String,
    #[serde(default)]
    pub magnitudes: Option<Vec<Magnitude>>,
}

/// A min/max sub-range of a mod, tagged with the stat it feeds.
/// Bounds that are missing or not numeric decode as NaN.
#[derive(Debug, Clone, Deserialize)]
pub struct Magnitude {
    #[serde(default, deserialize_with = "nullable")]
    pub hash: String,
    #[serde(default = "not_a_number", deserialize_with = "lenient_bound")]
    pub min: f64,
    #[serde(default = "not_a_number", deserialize_with = "lenient_bound")]
    pub max: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HashData {
    #[serde(deserialize_with = "nullable")]
    pub explicit: Vec<HashEntry>,
    #[serde(deserialize_with = "nullable")]
    pub implicit: Vec<HashEntry>,
}

impl HashData {
    pub fn for_scope(&self, scope: ModScope) -> &[HashEntry] {
        match scope {
            ModScope::Explicit => &self.explicit,
            ModScope::Implicit => &self.implicit,
        }
    }
}

/// `[stat_id, [component_index, ...]]`. Anything not shaped like that decodes
/// to an entry with missing parts; non-integer indices become -1.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub struct HashEntry {
    pub stat_id: Option<String>,
    pub components: Option<Vec<i64>>,
}

impl HashEntry {
    /// Stat id and component list, if both are present and non-empty.
    pub fn parts(&self) -> Option<(&str, &[i64])> {
        let stat_id = self.stat_id.as_deref().filter(|s| !s.is_empty())?;
        let components = self.components.as_deref().filter(|c| !c.is_empty())?;
        Some((stat_id, components))
    }
}

impl From<Value> for HashEntry {
    fn from(value: Value) -> Self {
        let parts = match value {
            Value::Array(parts) if parts.len() == 2 => parts,
            _ => return Self::default(),
        };

        Self {
            stat_id: parts[0].as_str().map(str::to_string),
            components: parts[1]
                .as_array()
                .map(|indices| indices.iter().map(|i| i.as_i64().unwrap_or(-1)).collect()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ListingData {
    pub price: Option<Price>,
    pub account: Option<Account>,
    #[serde(deserialize_with = "optional_text")]
    pub indexed: Option<String>,
    #[serde(deserialize_with = "optional_text")]
    pub whisper: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Price {
    #[serde(deserialize_with = "numeric_only")]
    pub amount: Option<f64>,
    #[serde(deserialize_with = "optional_text")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(deserialize_with = "optional_text")]
    pub name: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn numeric_only<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|v| v.is_finite()))
}

fn lenient_bound<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Strings pass through; anything else reads as absent.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Integers, or strings holding one, that fit the target type.
fn optional_integer<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(number.and_then(|n| T::try_from(n).ok()))
}

fn not_a_number() -> f64 {
    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_response_decoding() {
        let response: ItemResponse = serde_json::from_value(json!({
            "id": "abc123",
            "item": {
                "name": "Storm Song",
                "typeLine": "Gemini Bow",
                "baseType": "Gemini Bow",
                "rarity": "Rare",
                "ilvl": 79,
                "properties": [
                    {"name": "Physical Damage", "values": [["40-80", 1]], "displayMode": 0}
                ],
                "explicitMods": ["+15 to Dexterity"],
                "extended": {
                    "dps": 120.5,
                    "pdps": "n/a",
                    "mods": {
                        "explicit": [
                            {"name": "of the Fox", "tier": "S4", "level": 33,
                             "magnitudes": [
                                 {"hash": "explicit.stat_3261801346", "min": "13", "max": 16}
                             ]}
                        ]
                    },
                    "hashes": {
                        "explicit": [
                            ["explicit.stat_3261801346", [0]],
                            ["explicit.stat_1", null],
                            "junk"
                        ]
                    }
                }
            },
            "listing": {
                "price": {"amount": 5, "currency": "exalted"},
                "account": {"name": "seller"},
                "indexed": "2025-01-10T12:30:00Z"
            }
        }))
        .unwrap();

        let item = &response.item;
        assert_eq!(item.display_name(), "Storm Song Gemini Bow");
        assert_eq!(item.extended.dps, Some(120.5));
        assert_eq!(item.extended.pdps, None);
        assert!(item.implicit_mods.is_empty());

        let magnitude = &item.extended.mods.explicit[0].magnitudes.as_ref().unwrap()[0];
        assert_eq!(magnitude.min, 13.0);
        assert_eq!(magnitude.max, 16.0);

        let hashes = &item.extended.hashes.explicit;
        assert_eq!(hashes[0].parts(), Some(("explicit.stat_3261801346", &[0i64][..])));
        assert_eq!(hashes[1].parts(), None);
        assert_eq!(hashes[2], HashEntry::default());

        let price = response.listing.unwrap().price.unwrap();
        assert_eq!(price.amount, Some(5.0));
    }

    #[test]
    fn test_non_numeric_bounds_decode_as_nan() {
        let magnitude: Magnitude =
            serde_json::from_value(json!({"hash": "explicit.stat_1", "min": "abc"})).unwrap();
        assert!(magnitude.min.is_nan());
        assert!(magnitude.max.is_nan());
    }

    #[test]
    fn test_null_collections_decode_as_empty() {
        let item: ItemData = serde_json::from_value(json!({
            "typeLine": "Crown Mace",
            "explicitMods": null,
            "extended": {"mods": null, "hashes": {"explicit": null}}
        }))
        .unwrap();
        assert!(item.explicit_mods.is_empty());
        assert!(item.extended.hashes.explicit.is_empty());
        assert_eq!(item.display_name(), "Crown Mace");
    }

    #[test]
    fn test_bad_display_fields_decode_as_absent() {
        let item: ItemData = serde_json::from_value(json!({
            "typeLine": "Gemini Bow",
            "rarity": 3,
            "frameType": "2",
            "ilvl": "82",
            "properties": [{"name": null, "values": null}, {"name": 7, "values": []}]
        }))
        .unwrap();
        assert_eq!(item.rarity, None);
        assert_eq!(item.frame_type, Some(2));
        assert_eq!(item.ilvl, Some(82));
        assert_eq!(item.properties[0].name, "");
        assert!(item.properties[0].values.is_empty());
        assert_eq!(item.properties[1].name, "7");

        let item: ItemData = serde_json::from_value(json!({"ilvl": -1, "frameType": 2.5})).unwrap();
        assert_eq!(item.ilvl, None);
        assert_eq!(item.frame_type, None);

        let listing: ListingData = serde_json::from_value(json!({
            "indexed": 1700000000,
            "account": {"name": ["x"]},
            "price": {"amount": 2, "currency": 5}
        }))
        .unwrap();
        assert_eq!(listing.indexed, None);
        assert_eq!(listing.account.unwrap().name, None);
        assert_eq!(listing.price.unwrap().currency, None);
    }

    #[test]
    fn test_property_values() {
        let property: Property = serde_json::from_value(json!({
            "name": "Elemental Damage",
            "values": [["5-10", 4], [12, 5], "broken"]
        }))
        .unwrap();
        assert_eq!(property.value_strings(), vec!["5-10".to_string(), "12".to_string()]);
        let speed = Property::new("Attacks per Second", &["1.5"]);
        assert_eq!(speed.first_value(), Some("1.5".to_string()));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut item = ItemData::default();
        assert_eq!(item.display_name(), "Unknown Item");
        item.base_type = "Razor Quarterstaff".to_string();
        assert_eq!(item.display_name(), "Razor Quarterstaff");
        item.name = "Razor".to_string();
        item.type_line = "Razor Quarterstaff".to_string();
        assert_eq!(item.display_name(), "Razor Quarterstaff");
    }
}
