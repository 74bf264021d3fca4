use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemRarity {
    Normal,
    Magic,
    Rare,
    Unique,
    Other,
}

impl ItemRarity {
    /// Reads the `rarity` string first, then the numeric `frameType`.
    pub fn from_listing(rarity: Option<&str>, frame_type: Option<i32>) -> Self {
        if let Some(rarity) = rarity {
            match rarity.to_lowercase().as_str() {
                "normal" => return ItemRarity::Normal,
                "magic" => return ItemRarity::Magic,
                "rare" => return ItemRarity::Rare,
                "unique" => return ItemRarity::Unique,
                _ => {}
            }
        }

        match frame_type {
            Some(0) => ItemRarity::Normal,
            Some(1) => ItemRarity::Magic,
            Some(2) => ItemRarity::Rare,
            Some(3) => ItemRarity::Unique,
            _ => ItemRarity::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponClass {
    Quarterstaff,
    TwoHandedMace,
    Crossbow,
    Bow,
    Spear,
    OneHandedMace,
}

impl WeaponClass {
    /// Guesses the class from keywords in a base type name. Crossbow is
    /// checked before bow and great hammers before plain hammers.
    pub fn from_keywords(base_type: &str) -> Option<Self> {
        let name = base_type.to_lowercase();

        if name.contains("quarterstaff") {
            Some(WeaponClass::Quarterstaff)
        } else if name.contains("crossbow") {
            Some(WeaponClass::Crossbow)
        } else if name.contains("bow") {
            Some(WeaponClass::Bow)
        } else if name.contains("spear") {
            Some(WeaponClass::Spear)
        } else if name.contains("maul") || (name.contains("hammer") && name.contains("great")) {
            Some(WeaponClass::TwoHandedMace)
        } else if name.contains("mace") || name.contains("hammer") {
            Some(WeaponClass::OneHandedMace)
        } else {
            None
        }
    }

    /// Base used when only the class is known.
    pub fn representative_base(&self) -> &'static str {
        match self {
            WeaponClass::Quarterstaff => "Quarterstaff",
            WeaponClass::TwoHandedMace => "Sacred Maul",
            WeaponClass::Crossbow => "Engraved Crossbow",
            WeaponClass::Bow => "Cavalry Bow",
            WeaponClass::Spear => "Pronged Spear",
            WeaponClass::OneHandedMace => "Crown Mace",
        }
    }
}
