use crate::models::{ModifierAnalysis, PotentialDps};

/// How strongly the average modifier potential is assumed to turn into DPS.
/// `avg` must not exceed `max` for the projection to stay ordered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Damping {
    pub avg: f64,
    pub max: f64,
}

impl Default for Damping {
    fn default() -> Self {
        Self { avg: 0.4, max: 0.8 }
    }
}

/// Heuristic DPS range after rerolling. The minimum assumes no improvement;
/// the average and maximum scale the current value by the mean potential
/// of the damage-relevant `ok` modifiers.
pub fn estimate_potential_dps(
    dps: Option<f64>,
    pdps: Option<f64>,
    candidates: &[&ModifierAnalysis],
    damping: Damping,
) -> PotentialDps {
    let Some(current) = dps.or(pdps).filter(|v| v.is_finite() && *v >= 0.0) else {
        return PotentialDps::default();
    };

    let potentials: Vec<f64> = candidates
        .iter()
        .filter(|a| a.counts_for_verdict())
        .filter_map(|a| a.potential_pct())
        .collect();

    let fraction = if potentials.is_empty() {
        0.0
    } else {
        potentials.iter().sum::<f64>() / potentials.len() as f64 / 100.0
    };

    let avg_factor = damping.avg.max(0.0);
    let max_factor = damping.max.max(avg_factor);

    PotentialDps {
        min_dps: Some(current),
        avg_dps: Some(current * (1.0 + fraction * avg_factor)),
        max_dps: Some(current * (1.0 + fraction * max_factor)),
    }
}

/// Rough DPS gain in percent: the best damage-modifier potential scaled by
/// `gain_factor`.
pub fn estimated_gain_pct(candidates: &[&ModifierAnalysis], gain_factor: f64) -> f64 {
    candidates
        .iter()
        .filter(|a| a.counts_for_verdict())
        .filter_map(|a| a.potential_pct())
        .fold(0.0_f64, f64::max)
        * gain_factor
}
