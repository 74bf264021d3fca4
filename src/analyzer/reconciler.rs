//! Pairs the structured mod data of a listing with its display lines.
//!
//! Every hash entry names a stat and the descriptors contributing to it. The
//! descriptors' magnitude ranges are summed into one range per value slot,
//! then the first unused text line whose numbers fit that range is taken as
//! the display form of the stat. Lines no stat claimed are reported as well,
//! so every visible modifier shows up in the output.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::analyzer::format::tier_suffix;
use crate::analyzer::potential;
use crate::analyzer::text_scan;
use crate::errors::Result;
use crate::models::{
    ItemData, ModInfo, ModScope, ModStatus, ModifierAnalysis, Potential, Severity, SkipReason,
    SkippedStat,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Reconciliation {
    pub analyses: Vec<ModifierAnalysis>,
    pub skipped: Vec<SkippedStat>,
}

#[derive(Debug, Clone, PartialEq)]
struct SummedRange {
    min_values: Vec<f64>,
    max_values: Vec<f64>,
    tiers: Vec<String>,
}

enum EntryOutcome {
    Analysis(ModifierAnalysis),
    Skipped(SkipReason),
}

/// Reconciles every hash entry of both scopes, then appends the lines that
/// no entry consumed. Pure: the same item always yields the same result.
pub fn reconcile(item: &ItemData) -> Reconciliation {
    let mut result = Reconciliation::default();
    let mut consumed: HashMap<ModScope, HashSet<usize>> = HashMap::new();

    for scope in ModScope::ALL {
        let lines = item.mod_lines(scope);
        let descriptors = item.extended.mods.for_scope(scope);
        let scope_consumed = consumed.entry(scope).or_default();

        for entry in item.extended.hashes.for_scope(scope) {
            let Some((stat_id, components)) = entry.parts() else {
                debug!(scope = scope.as_str(), ?entry, "ignoring malformed hash entry");
                continue;
            };

            let outcome =
                reconcile_entry(scope, stat_id, components, descriptors, lines, scope_consumed);
            record_outcome(&mut result, scope, stat_id, outcome);
        }
    }

    for scope in ModScope::ALL {
        let scope_consumed = consumed.get(&scope);
        for (index, line) in item.mod_lines(scope).iter().enumerate() {
            if scope_consumed.map_or(false, |c| c.contains(&index)) {
                continue;
            }
            result.analyses.push(unmatched_text(scope, line));
        }
    }

    result
}

/// Files one entry's outcome. A failed entry becomes an `error_processing`
/// record and does not affect the others.
fn record_outcome(
    result: &mut Reconciliation,
    scope: ModScope,
    stat_id: &str,
    outcome: Result<EntryOutcome>,
) {
    match outcome {
        Ok(EntryOutcome::Analysis(analysis)) => result.analyses.push(analysis),
        Ok(EntryOutcome::Skipped(reason)) => {
            debug!(scope = scope.as_str(), stat_id, ?reason, "skipping stat");
            result.skipped.push(SkippedStat {
                scope,
                stat_id: stat_id.to_string(),
                reason,
            });
        }
        Err(err) => {
            warn!(scope = scope.as_str(), stat_id, error = %err, "failed to reconcile stat");
            result.analyses.push(processing_error(scope, stat_id));
        }
    }
}

fn reconcile_entry(
    scope: ModScope,
    stat_id: &str,
    components: &[i64],
    descriptors: &[ModInfo],
    lines: &[String],
    consumed: &mut HashSet<usize>,
) -> Result<EntryOutcome> {
    let mut parts = Vec::with_capacity(components.len());
    for &index in components {
        match usize::try_from(index).ok().and_then(|i| descriptors.get(i)) {
            Some(descriptor) => parts.push(descriptor),
            None => return Ok(EntryOutcome::Skipped(SkipReason::MissingComponent { index })),
        }
    }

    let range = match sum_ranges(stat_id, &parts) {
        Ok(range) => range,
        Err(reason) => return Ok(EntryOutcome::Skipped(reason)),
    };

    let found =
        text_scan::find_matching_line(lines, consumed, &range.min_values, &range.max_values)?;

    let analysis = match found {
        Some(text_match) => {
            consumed.insert(text_match.line_index);
            let potential =
                potential::score(&range.min_values, &range.max_values, &text_match.values);

            ModifierAnalysis {
                scope,
                stat_id: Some(stat_id.to_string()),
                text: lines[text_match.line_index].clone(),
                tiers: range.tiers,
                min_values: range.min_values,
                max_values: range.max_values,
                current_values: text_match.values,
                status: potential::status_for(&potential),
                severity: potential::severity(&potential),
                potential,
                damage_relevant: false,
            }
        }
        None => ModifierAnalysis {
            scope,
            stat_id: Some(stat_id.to_string()),
            text: fallback_label(stat_id, parts[0], &range.tiers),
            tiers: range.tiers,
            min_values: range.min_values,
            max_values: range.max_values,
            current_values: Vec::new(),
            status: ModStatus::NoTextMatch,
            potential: Potential::Unknown,
            severity: Severity::NoText,
            damage_relevant: false,
        },
    };

    Ok(EntryOutcome::Analysis(analysis))
}

/// Sums each magnitude slot across descriptors. The first descriptor that
/// carries the stat fixes how many slots there are.
fn sum_ranges(stat_id: &str, parts: &[&ModInfo]) -> std::result::Result<SummedRange, SkipReason> {
    let mut tiers = BTreeSet::new();
    let mut sums: Option<(Vec<f64>, Vec<f64>)> = None;

    for part in parts {
        let Some(magnitudes) = &part.magnitudes else {
            return Err(SkipReason::MissingMagnitudes);
        };

        if let Some(tier) = text_scan::tier_label(&part.tier) {
            tiers.insert(tier);
        }

        let matching: Vec<_> = magnitudes.iter().filter(|m| m.hash == stat_id).collect();
        if matching.is_empty() {
            continue;
        }

        let (mins, maxs) = sums.get_or_insert_with(|| {
            (vec![0.0; matching.len()], vec![0.0; matching.len()])
        });

        if matching.len() != mins.len() {
            return Err(SkipReason::ArityMismatch {
                expected: mins.len(),
                found: matching.len(),
            });
        }

        for (slot, magnitude) in matching.iter().enumerate() {
            if !magnitude.min.is_finite() || !magnitude.max.is_finite() {
                return Err(SkipReason::NonNumericBound);
            }
            mins[slot] += magnitude.min;
            maxs[slot] += magnitude.max;
        }
    }

    let (min_values, max_values) = sums.ok_or(SkipReason::NoMagnitudes)?;

    Ok(SummedRange {
        min_values,
        max_values,
        tiers: tiers.into_iter().collect(),
    })
}

fn fallback_label(stat_id: &str, first: &ModInfo, tiers: &[String]) -> String {
    if first.name.trim().is_empty() {
        return format!("Stat: {}", stat_id);
    }
    if first.name == stat_id && !tiers.is_empty() {
        return format!("{}{}", first.name, tier_suffix(tiers));
    }
    first.name.clone()
}

fn unmatched_text(scope: ModScope, line: &str) -> ModifierAnalysis {
    ModifierAnalysis {
        scope,
        stat_id: None,
        text: line.to_string(),
        tiers: Vec::new(),
        min_values: Vec::new(),
        max_values: Vec::new(),
        current_values: text_scan::display_values(line).unwrap_or_default(),
        status: ModStatus::UnmatchedText,
        potential: Potential::Unknown,
        severity: Severity::Unknown,
        damage_relevant: false,
    }
}

fn processing_error(scope: ModScope, stat_id: &str) -> ModifierAnalysis {
    ModifierAnalysis {
        scope,
        stat_id: Some(stat_id.to_string()),
        text: format!("Failed to analyze stat {}", stat_id),
        tiers: Vec::new(),
        min_values: Vec::new(),
        max_values: Vec::new(),
        current_values: Vec::new(),
        status: ModStatus::ErrorProcessing,
        potential: Potential::Invalid,
        severity: Severity::Error,
        damage_relevant: false,
    }
}
