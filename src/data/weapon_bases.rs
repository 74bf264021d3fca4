use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AnalyzerError, Result};
use crate::models::WeaponClass;

const BUILTIN_BASES: &str = include_str!("../../data/weapon_bases.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponBase {
    pub name: String,
    pub class: WeaponClass,
    pub phys_min: f64,
    pub phys_max: f64,
    pub attacks_per_second: f64,
    pub crit_chance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ele_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implicit_mods: Vec<String>,
}

impl WeaponBase {
    pub fn base_pdps(&self) -> f64 {
        (self.phys_min + self.phys_max) / 2.0 * self.attacks_per_second
    }
}

/// Known weapon bases in table order. Lookups scan in that order, so a
/// longer name listed first wins a partial match.
#[derive(Debug, Clone, Default)]
pub struct WeaponBaseDatabase {
    bases: Vec<WeaponBase>,
}

impl WeaponBaseDatabase {
    pub fn new(bases: Vec<WeaponBase>) -> Result<Self> {
        for base in &bases {
            if base.attacks_per_second <= 0.0 {
                return Err(AnalyzerError::Validation(format!(
                    "weapon base '{}' has non-positive attack speed",
                    base.name
                )));
            }
            if base.phys_min > base.phys_max {
                return Err(AnalyzerError::Validation(format!(
                    "weapon base '{}' has physical min above max",
                    base.name
                )));
            }
        }
        Ok(Self { bases })
    }

    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_BASES)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let bases: Vec<WeaponBase> = serde_json::from_str(json)?;
        Self::new(bases)
    }

    pub async fn load_from_file(path: &str) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let database = Self::from_json(&content)?;
        debug!(path, bases = database.len(), "loaded weapon bases");
        Ok(database)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponBase> {
        self.bases.iter()
    }

    pub fn get(&self, name: &str) -> Option<&WeaponBase> {
        self.bases.iter().find(|b| b.name == name)
    }

    /// Exact name, then the first base whose name appears in `base_type`,
    /// then a representative base for the weapon class keywords.
    pub fn find(&self, base_type: &str) -> Option<&WeaponBase> {
        if base_type.is_empty() {
            return None;
        }

        self.get(base_type)
            .or_else(|| self.bases.iter().find(|b| base_type.contains(b.name.as_str())))
            .or_else(|| {
                WeaponClass::from_keywords(base_type)
                    .and_then(|class| self.get(class.representative_base()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let db = WeaponBaseDatabase::builtin().unwrap();
        assert_eq!(db.len(), 37);

        let bolting = db.get("Bolting Quarterstaff").unwrap();
        assert_eq!(bolting.ele_type.as_deref(), Some("lightning"));
        assert_eq!(bolting.base_pdps(), 0.0);
    }

    #[test]
    fn test_find_exact_partial_and_class_fallback() {
        let db = WeaponBaseDatabase::builtin().unwrap();

        assert_eq!(db.find("Gemini Crossbow").unwrap().name, "Gemini Crossbow");
        assert_eq!(db.find("Superior Gemini Bow").unwrap().name, "Gemini Bow");
        assert_eq!(db.find("Expert Rattling Crossbow").unwrap().name, "Engraved Crossbow");
        assert_eq!(db.find("Some Odd Greathammer").unwrap().name, "Sacred Maul");
        assert_eq!(db.find("War Hammer").unwrap().name, "Crown Mace");
        assert!(db.find("Leather Vest").is_none());
        assert!(db.find("").is_none());
    }

    #[test]
    fn test_rejects_bad_bases() {
        let json = r#"[{"name":"Broken","class":"bow","phys_min":5,"phys_max":1,
            "attacks_per_second":1.2,"crit_chance":5}]"#;
        assert!(matches!(
            WeaponBaseDatabase::from_json(json),
            Err(AnalyzerError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_missing_file() {
        let result = WeaponBaseDatabase::load_from_file("/definitely/not/here.json").await;
        assert!(matches!(result, Err(AnalyzerError::Io(_))));
    }
}
