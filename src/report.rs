use std::fmt::Write;

use crate::analyzer::format::{format_number, listing_time_text, modifier_line};
use crate::data::WeaponBase;
use crate::models::{ItemDetails, Recommendation, RowTag};

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".to_string())
}

fn row_tag_label(tag: RowTag) -> &'static str {
    match tag {
        RowTag::WorthGood => "WORTH (good)",
        RowTag::WorthMedium => "WORTH (medium)",
        RowTag::WorthBad => "WORTH (low)",
        RowTag::NotWorth => "not worth",
    }
}

/// Multi-line text summary of one analyzed item.
pub fn render_item(details: &ItemDetails, currency: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} [{}]", details.name, details.id);
    let _ = writeln!(
        out,
        "  price: {} | seller: {} | listed: {}",
        details.price_text,
        details.seller.as_deref().unwrap_or("Unknown"),
        listing_time_text(details.listed_at.as_ref()),
    );

    if let Some(error) = &details.error {
        let _ = writeln!(out, "  verdict: unknown ({})", error);
        return out;
    }

    let _ = writeln!(
        out,
        "  dps: {} | pdps: {} | edps: {}",
        optional_number(details.dps.dps),
        optional_number(details.dps.pdps),
        optional_number(details.dps.edps),
    );

    if let Some(verdict) = &details.verdict {
        let _ = writeln!(
            out,
            "  verdict: {} | best damage mod: {:.1}% | best overall: {:.1}%",
            row_tag_label(details.row_tag),
            verdict.max_chance,
            verdict.max_overall_chance,
        );
    }

    match details.recommendation {
        Some(Recommendation::Recommended) => {
            let _ = writeln!(
                out,
                "  recommended, estimated gain +{:.1}% dps",
                details.dps_gain_pct
            );
        }
        Some(Recommendation::Consider) => {
            let _ = writeln!(
                out,
                "  consider it, estimated gain +{:.1}% dps",
                details.dps_gain_pct
            );
        }
        Some(Recommendation::NotRecommended) => {
            let _ = writeln!(out, "  not recommended, little room left");
        }
        None => {}
    }

    let projection = &details.potential_dps;
    if projection.max_dps.is_some() {
        let _ = writeln!(
            out,
            "  potential dps: {} / {} / {}",
            optional_number(projection.min_dps),
            optional_number(projection.avg_dps),
            optional_number(projection.max_dps),
        );
    }

    if let Some(cost) = details.cost_per_potential_point {
        let _ = writeln!(
            out,
            "  reroll cost: {} {} ({:.2} per potential point)",
            format_number(details.reroll_cost),
            currency,
            cost,
        );
    }

    for modifier in &details.modifiers {
        let marker = if modifier.damage_relevant { "*" } else { " " };
        let _ = writeln!(out, "  {} {}", marker, modifier_line(modifier));
    }

    if !details.skipped.is_empty() {
        let _ = writeln!(out, "  ({} malformed stats skipped)", details.skipped.len());
    }

    out
}

pub fn render_base(base: &WeaponBase) -> String {
    let mut line = format!(
        "{:<24} {:>4}-{:<4} {:.2} aps  {:.1}% crit  {:>6.1} pdps",
        base.name,
        format_number(base.phys_min),
        format_number(base.phys_max),
        base.attacks_per_second,
        base.crit_chance,
        base.base_pdps(),
    );

    if let (Some(min), Some(max)) = (base.ele_min, base.ele_max) {
        let _ = write!(
            line,
            "  +{}-{} {}",
            format_number(min),
            format_number(max),
            base.ele_type.as_deref().unwrap_or("elemental"),
        );
    }

    line
}
