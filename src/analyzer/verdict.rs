use std::cmp::Ordering;

use crate::analyzer::relevance::DamageRelevance;
use crate::models::{ItemVerdict, ModScope, ModifierAnalysis};

/// Potential stand-in when sorting modifiers that have none.
const NO_POTENTIAL: f64 = -2.0;

/// Decides whether an item is worth rerolling from its damage-relevant
/// modifiers.
pub struct VerdictAggregator<'a> {
    relevance: &'a DamageRelevance,
    worth_threshold: f64,
}

impl<'a> VerdictAggregator<'a> {
    pub fn new(relevance: &'a DamageRelevance, worth_threshold: f64) -> Self {
        Self {
            relevance,
            worth_threshold,
        }
    }

    pub fn mark_relevance(&self, analyses: &mut [ModifierAnalysis]) {
        for analysis in analyses.iter_mut() {
            analysis.damage_relevant = self.relevance.is_relevant(analysis);
        }
    }

    /// Expects `damage_relevant` to be set already.
    pub fn verdict(&self, analyses: &[ModifierAnalysis]) -> ItemVerdict {
        let best = |only_damage: bool| {
            analyses
                .iter()
                .filter(|a| !only_damage || a.damage_relevant)
                .filter_map(|a| a.potential_pct())
                .fold(0.0_f64, f64::max)
        };

        let worth_rerolling = analyses
            .iter()
            .filter(|a| a.counts_for_verdict())
            .filter_map(|a| a.potential_pct())
            .any(|pct| pct > self.worth_threshold);

        ItemVerdict {
            worth_rerolling,
            max_chance: best(true),
            max_overall_chance: best(false),
        }
    }

    /// Marks relevance, sorts for display and returns the verdict.
    pub fn aggregate(&self, analyses: &mut [ModifierAnalysis]) -> ItemVerdict {
        self.mark_relevance(analyses);
        sort_for_display(analyses);
        self.verdict(analyses)
    }
}

/// Damage-relevant first, implicit before explicit, then by status, then
/// highest potential first.
pub fn sort_for_display(analyses: &mut [ModifierAnalysis]) {
    analyses.sort_by(display_order);
}

fn display_order(a: &ModifierAnalysis, b: &ModifierAnalysis) -> Ordering {
    b.damage_relevant
        .cmp(&a.damage_relevant)
        .then_with(|| scope_rank(a.scope).cmp(&scope_rank(b.scope)))
        .then_with(|| a.status.priority().cmp(&b.status.priority()))
        .then_with(|| {
            let pa = a.potential_pct().unwrap_or(NO_POTENTIAL);
            let pb = b.potential_pct().unwrap_or(NO_POTENTIAL);
            pb.total_cmp(&pa)
        })
}

fn scope_rank(scope: ModScope) -> u8 {
    match scope {
        ModScope::Implicit => 0,
        ModScope::Explicit => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModStatus, Potential, Severity};

    fn analysis(stat_id: Option<&str>, text: &str, potential: Potential) -> ModifierAnalysis {
        ModifierAnalysis {
            scope: ModScope::Explicit,
            stat_id: stat_id.map(str::to_string),
            text: text.to_string(),
            tiers: Vec::new(),
            min_values: vec![0.0],
            max_values: vec![100.0],
            current_values: vec![0.0],
            status: ModStatus::Ok,
            potential,
            severity: Severity::Unknown,
            damage_relevant: false,
        }
    }

    fn with_status(mut analysis: ModifierAnalysis, status: ModStatus) -> ModifierAnalysis {
        analysis.status = status;
        analysis
    }

    fn damage(mut analysis: ModifierAnalysis) -> ModifierAnalysis {
        analysis.damage_relevant = true;
        analysis
    }

    #[test]
    fn test_non_damage_modifier_does_not_raise_score() {
        let table = DamageRelevance::default();
        let aggregator = VerdictAggregator::new(&table, 0.1);
        let life = "explicit.stat_3299347043";
        let attack_speed = "explicit.stat_210067635";
        let mut analyses = vec![
            analysis(Some(life), "+90 to maximum Life", Potential::Rollable(90.0)),
            analysis(Some(attack_speed), "10% increased Attack Speed", Potential::Rollable(50.0)),
        ];

        let verdict = aggregator.aggregate(&mut analyses);
        assert!(verdict.worth_rerolling);
        assert_eq!(verdict.max_chance, 50.0);
        assert_eq!(verdict.max_overall_chance, 90.0);
        assert_eq!(analyses[0].stat_id.as_deref(), Some(attack_speed));
    }

    #[test]
    fn test_unknown_potential_is_not_zero_and_not_worth() {
        let table = DamageRelevance::default();
        let aggregator = VerdictAggregator::new(&table, 0.1);
        let unmatched = analysis(
            Some("explicit.stat_210067635"),
            "Attack Speed",
            Potential::Unknown,
        );
        let mut analyses = vec![
            with_status(unmatched, ModStatus::NoTextMatch),
            analysis(Some("explicit.stat_1509134228"), "Physical", Potential::Fixed),
        ];

        let verdict = aggregator.aggregate(&mut analyses);
        assert!(!verdict.worth_rerolling);
        assert_eq!(verdict.max_chance, 0.0);
    }

    #[test]
    fn test_threshold_is_strict() {
        let table = DamageRelevance::default();
        let aggregator = VerdictAggregator::new(&table, 15.0);
        let mut analyses = vec![analysis(
            Some("explicit.stat_210067635"),
            "Attack Speed",
            Potential::Rollable(15.0),
        )];
        assert!(!aggregator.aggregate(&mut analyses).worth_rerolling);
    }

    #[test]
    fn test_text_only_modifier_uses_keywords() {
        let table = DamageRelevance::default();
        let aggregator = VerdictAggregator::new(&table, 0.1);
        let text_only = analysis(None, "Adds 3 to 9 Lightning Damage", Potential::Unknown);
        let mut analyses = vec![with_status(text_only, ModStatus::UnmatchedText)];
        aggregator.mark_relevance(&mut analyses);
        assert!(analyses[0].damage_relevant);
        assert!(!aggregator.verdict(&analyses).worth_rerolling);
    }

    #[test]
    fn test_display_order() {
        let mut implicit = analysis(Some("implicit.stat_1"), "implicit", Potential::Rollable(5.0));
        implicit.scope = ModScope::Implicit;
        let damage_low = damage(analysis(
            Some("explicit.stat_a"),
            "damage low",
            Potential::Rollable(10.0),
        ));
        let damage_high = damage(analysis(
            Some("explicit.stat_b"),
            "damage high",
            Potential::Rollable(80.0),
        ));
        let damage_unmatched = damage(with_status(
            analysis(None, "damage text", Potential::Unknown),
            ModStatus::NoTextMatch,
        ));
        let fixed = analysis(Some("explicit.stat_c"), "fixed", Potential::Fixed);
        let maxed = analysis(Some("explicit.stat_d"), "maxed", Potential::Maxed);
        let unmatched = with_status(
            analysis(None, "unmatched", Potential::Unknown),
            ModStatus::UnmatchedText,
        );
        let failed = with_status(
            analysis(Some("explicit.stat_e"), "failed", Potential::Invalid),
            ModStatus::ErrorProcessing,
        );

        let mut analyses = vec![
            failed,
            unmatched,
            fixed,
            maxed,
            damage_unmatched,
            implicit,
            damage_low,
            damage_high,
        ];
        sort_for_display(&mut analyses);

        let order: Vec<&str> = analyses.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "damage high",
                "damage low",
                "damage text",
                "implicit",
                "maxed",
                "fixed",
                "unmatched",
                "failed",
            ]
        );
    }
}
