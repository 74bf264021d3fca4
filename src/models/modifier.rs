use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModScope {
    Implicit,
    Explicit,
}

impl ModScope {
    /// Processing order for hash entries and leftover text lines.
    pub const ALL: [ModScope; 2] = [ModScope::Explicit, ModScope::Implicit];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModScope::Implicit => "implicit",
            ModScope::Explicit => "explicit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModStatus {
    /// Range known and current roll read from a text line.
    Ok,
    /// Range known, no text line matched it.
    NoTextMatch,
    /// Text line with no structured counterpart.
    UnmatchedText,
    /// Matched, but the potential could not be computed.
    CalcError,
    /// Processing the stat entry failed.
    ErrorProcessing,
}

impl ModStatus {
    /// Display priority: lower sorts first.
    pub fn priority(&self) -> u8 {
        match self {
            ModStatus::Ok => 0,
            ModStatus::NoTextMatch => 1,
            ModStatus::UnmatchedText => 2,
            ModStatus::CalcError => 3,
            ModStatus::ErrorProcessing => 4,
        }
    }
}

/// How much room a modifier has left to roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "pct", rename_all = "snake_case")]
pub enum Potential {
    /// Average distance from max, in percent of the range.
    Rollable(f64),
    /// Every rollable component sits at its max.
    Maxed,
    /// Every component has min == max.
    Fixed,
    /// Current value unknown.
    Unknown,
    /// Values could not be compared (NaN or length mismatch).
    Invalid,
}

impl Potential {
    /// Numeric potential. `Maxed` is 0, `Fixed` and `Unknown` have none.
    pub fn pct(&self) -> Option<f64> {
        match self {
            Potential::Rollable(pct) => Some(*pct),
            Potential::Maxed => Some(0.0),
            Potential::Fixed | Potential::Unknown | Potential::Invalid => None,
        }
    }
}

/// Coarse display band. Carries no business meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Good,
    Medium,
    Bad,
    Max,
    NoText,
    Unknown,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierAnalysis {
    pub scope: ModScope,
    pub stat_id: Option<String>,
    pub text: String,
    pub tiers: Vec<String>,
    pub min_values: Vec<f64>,
    pub max_values: Vec<f64>,
    pub current_values: Vec<f64>,
    pub status: ModStatus,
    pub potential: Potential,
    pub severity: Severity,
    pub damage_relevant: bool,
}

impl ModifierAnalysis {
    pub fn potential_pct(&self) -> Option<f64> {
        match self.status {
            ModStatus::Ok => self.potential.pct(),
            _ => None,
        }
    }

    /// Damage-relevant `ok` modifier with a numeric potential.
    pub fn counts_for_verdict(&self) -> bool {
        self.damage_relevant && self.status == ModStatus::Ok && self.potential_pct().is_some()
    }
}

/// Why a hash entry produced no analysis record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    MissingComponent { index: i64 },
    MissingMagnitudes,
    NoMagnitudes,
    ArityMismatch { expected: usize, found: usize },
    NonNumericBound,
}

impl SkipReason {
    /// Everything except a dangling component index means the range is unusable.
    pub fn is_no_range(&self) -> bool {
        !matches!(self, SkipReason::MissingComponent { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedStat {
    pub scope: ModScope,
    pub stat_id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_potential_pct_distinguishes_fixed_from_maxed() {
        assert_eq!(Potential::Maxed.pct(), Some(0.0));
        assert_eq!(Potential::Fixed.pct(), None);
        assert_eq!(Potential::Unknown.pct(), None);
        assert_eq!(Potential::Rollable(42.0).pct(), Some(42.0));
    }

    #[test]
    fn test_status_priority_order() {
        let mut statuses = vec![
            ModStatus::ErrorProcessing,
            ModStatus::UnmatchedText,
            ModStatus::CalcError,
            ModStatus::Ok,
            ModStatus::NoTextMatch,
        ];
        statuses.sort_by_key(|s| s.priority());
        assert_eq!(
            statuses,
            vec![
                ModStatus::Ok,
                ModStatus::NoTextMatch,
                ModStatus::UnmatchedText,
                ModStatus::CalcError,
                ModStatus::ErrorProcessing,
            ]
        );
    }

    #[test]
    fn test_skip_reason_serialization() {
        let skipped = SkippedStat {
            scope: ModScope::Explicit,
            stat_id: "explicit.stat_1".to_string(),
            reason: SkipReason::ArityMismatch { expected: 2, found: 1 },
        };
        let value = serde_json::to_value(&skipped).unwrap();
        assert_eq!(value["reason"], "arity_mismatch");
        assert_eq!(value["expected"], 2);
        assert!(skipped.reason.is_no_range());
    }
}
