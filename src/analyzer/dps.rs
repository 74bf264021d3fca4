//! DPS estimation from whatever an item carries.
//!
//! Values the trade API supplied win. Missing physical DPS is then read from
//! the item's properties, and anything still missing is derived from the
//! weapon base and the item's modifier lines. Property values that fail to
//! parse are ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::data::{WeaponBase, WeaponBaseDatabase};
use crate::errors::Result;
use crate::models::{DpsEstimate, ItemData, Property};

static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)%").unwrap());
static ADDS_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Adds (\d+(?:\.\d+)?) to (\d+(?:\.\d+)?)").unwrap());

const ELEMENT_NAMES: [&str; 4] = ["Fire Damage", "Cold Damage", "Lightning Damage", "Chaos Damage"];

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn estimate_dps(item: &ItemData, bases: &WeaponBaseDatabase) -> DpsEstimate {
    let extended = &item.extended;
    let mut estimate = DpsEstimate {
        dps: extended.dps,
        pdps: extended.pdps,
        edps: extended.edps,
    };

    if estimate.pdps.is_none() {
        estimate.pdps = physical_dps_from_properties(&item.properties);
    }
    if estimate.edps.is_none() {
        estimate.edps = elemental_dps_from_properties(&item.properties);
    }

    if estimate.pdps.is_none() || estimate.dps.is_none() {
        if let Some(base) = bases.find(item.base_type_or_type_line()) {
            match derive_from_base(base, item) {
                Ok(derived) => {
                    debug!(base = %base.name, "filling dps from weapon base");
                    estimate.pdps = estimate.pdps.or(derived.pdps);
                    estimate.edps = estimate.edps.or(derived.edps);
                }
                Err(e) => debug!(base = %base.name, "could not derive dps: {}", e),
            }
        }
    }

    if estimate.dps.is_none() {
        estimate.dps = match (estimate.pdps, estimate.edps) {
            (Some(pdps), Some(edps)) => Some(round1(pdps + edps)),
            (Some(pdps), None) => Some(pdps),
            _ => None,
        };
    }

    estimate
}

/// Physical DPS from a damage property and an attack speed property. The
/// last matching property of each kind wins.
pub fn physical_dps_from_properties(properties: &[Property]) -> Option<f64> {
    let mut damage: Option<(f64, f64)> = None;
    let mut attack_speed: Option<f64> = None;

    for property in properties {
        let name = property.name.to_lowercase();
        let Some(value) = property.first_value() else {
            continue;
        };

        if is_physical_damage_property(&name) {
            if let Some(range) = parse_damage_value(&value) {
                damage = Some(range);
            }
        } else if name.contains("attacks per second") || name.contains("attack speed") {
            if let Ok(speed) = value.trim().trim_start_matches('+').parse::<f64>() {
                attack_speed = Some(speed);
            }
        }
    }

    let (min, max) = damage?;
    let speed = attack_speed.filter(|s| *s > 0.0)?;
    Some(round1((min + max) / 2.0 * speed))
}

/// Elemental DPS from an "Elemental Damage" property listing one range per
/// element.
pub fn elemental_dps_from_properties(properties: &[Property]) -> Option<f64> {
    let speed = properties
        .iter()
        .filter(|p| {
            let name = p.name.to_lowercase();
            name.contains("attacks per second") || name.contains("attack speed")
        })
        .filter_map(|p| p.first_value())
        .filter_map(|v| v.trim().trim_start_matches('+').parse::<f64>().ok())
        .last()
        .filter(|s| *s > 0.0)?;

    let property = properties
        .iter()
        .find(|p| p.name.to_lowercase().contains("elemental damage"))?;

    let total: f64 = property
        .value_strings()
        .iter()
        .filter_map(|v| parse_damage_value(v))
        .map(|(min, max)| (min + max) / 2.0)
        .sum();

    if total > 0.0 {
        Some(round1(total * speed))
    } else {
        None
    }
}

fn is_physical_damage_property(name: &str) -> bool {
    name.contains("physical damage")
        || (name.contains("damage")
            && !["elemental", "chaos", "spell"].iter().any(|x| name.contains(x)))
}

/// `"10-20"` or a flat `"15"`.
fn parse_damage_value(value: &str) -> Option<(f64, f64)> {
    let value = value.trim();
    match value.split_once('-') {
        Some((low, high)) => {
            let low = low.trim().parse::<f64>().ok()?;
            let high = high.trim().parse::<f64>().ok()?;
            Some((low, high))
        }
        None => {
            let flat = value.parse::<f64>().ok()?;
            Some((flat, flat))
        }
    }
}

#[derive(Debug, Default)]
struct ModifierTotals {
    increased_physical: f64,
    added_physical: (f64, f64),
    added_elemental: (f64, f64),
    increased_attack_speed: f64,
}

fn modifier_totals(item: &ItemData) -> Result<ModifierTotals> {
    let mut totals = ModifierTotals::default();

    for line in item.explicit_mods.iter().chain(item.implicit_mods.iter()) {
        if line.contains("increased Physical Damage") {
            if let Some(caps) = PERCENT_RE.captures(line) {
                totals.increased_physical = caps[1].parse()?;
            }
        }

        if line.contains("Adds") && line.contains("Physical Damage") {
            if let Some(caps) = ADDS_RANGE_RE.captures(line) {
                totals.added_physical = (caps[1].parse()?, caps[2].parse()?);
            }
        }

        if line.contains("Adds") && ELEMENT_NAMES.iter().any(|e| line.contains(e)) {
            if let Some(caps) = ADDS_RANGE_RE.captures(line) {
                totals.added_elemental.0 += caps[1].parse::<f64>()?;
                totals.added_elemental.1 += caps[2].parse::<f64>()?;
            }
        }

        if line.contains("increased Attack Speed") {
            if let Some(caps) = PERCENT_RE.captures(line) {
                totals.increased_attack_speed = caps[1].parse()?;
            }
        }
    }

    Ok(totals)
}

/// Applies the item's damage and attack speed modifiers to its base.
pub fn derive_from_base(base: &WeaponBase, item: &ItemData) -> Result<DpsEstimate> {
    let totals = modifier_totals(item)?;

    let multiplier = 1.0 + totals.increased_physical / 100.0;
    let phys_min = base.phys_min * multiplier + totals.added_physical.0;
    let phys_max = base.phys_max * multiplier + totals.added_physical.1;
    let attack_speed = base.attacks_per_second * (1.0 + totals.increased_attack_speed / 100.0);

    let ele_min = base.ele_min.unwrap_or(0.0) + totals.added_elemental.0;
    let ele_max = base.ele_max.unwrap_or(0.0) + totals.added_elemental.1;

    let pdps = (phys_min + phys_max) / 2.0 * attack_speed;
    let edps = (ele_min + ele_max) / 2.0 * attack_speed;

    Ok(DpsEstimate {
        dps: Some(round1(pdps + edps)),
        pdps: Some(round1(pdps)),
        edps: if edps > 0.0 { Some(round1(edps)) } else { None },
    })
}
