use crate::models::{ModStatus, Potential, Severity};

/// Absorbs float rounding when comparing rolled values to bounds.
pub const TOLERANCE: f64 = 1e-6;
pub const GOOD_THRESHOLD: f64 = 65.0;
pub const MEDIUM_THRESHOLD: f64 = 35.0;

/// Scores how far the current roll sits below the max of its range.
///
/// Each rollable component contributes `(max - current) / (max - min) * 100`
/// (0 once at max); the sum is averaged over all components and clamped to
/// `[0, 100]`. Zero-width components are fixed and contribute nothing.
pub fn score(min_values: &[f64], max_values: &[f64], current_values: &[f64]) -> Potential {
    let components = current_values.len();
    if components == 0 || min_values.len() != components || max_values.len() != components {
        return Potential::Invalid;
    }

    let mut total = 0.0;
    let mut all_fixed = true;
    let mut all_maxed = true;

    for ((&current, &min), &max) in current_values.iter().zip(min_values).zip(max_values) {
        if current.is_nan() || min.is_nan() || max.is_nan() {
            return Potential::Invalid;
        }

        let range = max - min;
        if range.abs() < TOLERANCE {
            continue;
        }

        all_fixed = false;
        if current < max - TOLERANCE {
            total += ((max - current) / range).max(0.0) * 100.0;
            all_maxed = false;
        }
    }

    if all_fixed {
        Potential::Fixed
    } else if all_maxed {
        Potential::Maxed
    } else {
        Potential::Rollable((total / components as f64).clamp(0.0, 100.0))
    }
}

pub fn severity(potential: &Potential) -> Severity {
    match *potential {
        Potential::Rollable(pct) if pct >= GOOD_THRESHOLD => Severity::Good,
        Potential::Rollable(pct) if pct >= MEDIUM_THRESHOLD => Severity::Medium,
        Potential::Rollable(_) => Severity::Bad,
        Potential::Maxed | Potential::Fixed => Severity::Max,
        Potential::Unknown => Severity::NoText,
        Potential::Invalid => Severity::Error,
    }
}

/// Status of a matched modifier once scored.
pub fn status_for(potential: &Potential) -> ModStatus {
    match potential {
        Potential::Invalid => ModStatus::CalcError,
        _ => ModStatus::Ok,
    }
}
