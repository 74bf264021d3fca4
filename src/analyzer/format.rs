use chrono::{DateTime, Utc};

use crate::models::{ModifierAnalysis, Potential};

/// Whole numbers print without decimals, others with one, trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "?".to_string();
    }
    if value.fract() == 0.0 {
        return format!("{}", value as i64);
    }
    let text = format!("{:.1}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// `[10–20]`, `[5–7 to 10–12]` or `[N/A]`.
pub fn range_display(min_values: &[f64], max_values: &[f64]) -> String {
    if min_values.is_empty() || min_values.len() != max_values.len() {
        return "[N/A]".to_string();
    }

    let parts: Vec<String> = min_values
        .iter()
        .zip(max_values)
        .map(|(&min, &max)| format!("{}–{}", format_number(min), format_number(max)))
        .collect();

    if parts.len() == 2 {
        format!("[{} to {}]", parts[0], parts[1])
    } else {
        format!("[{}]", parts.join(" / "))
    }
}

pub fn current_display(values: &[f64]) -> String {
    if values.is_empty() {
        return "?".to_string();
    }
    values
        .iter()
        .map(|&v| format_number(v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// ` (T1/T3)`, or empty without tiers.
pub fn tier_suffix(tiers: &[String]) -> String {
    if tiers.is_empty() {
        String::new()
    } else {
        format!(" ({})", tiers.join("/"))
    }
}

pub fn potential_label(potential: &Potential) -> String {
    match potential {
        Potential::Rollable(pct) => format!("{:.1}%", pct),
        Potential::Maxed => "MAX".to_string(),
        Potential::Fixed => "FIXO".to_string(),
        Potential::Unknown => "N/A".to_string(),
        Potential::Invalid => "ERR".to_string(),
    }
}

/// One line per modifier: text, tiers, current value, range and potential.
pub fn modifier_line(analysis: &ModifierAnalysis) -> String {
    format!(
        "{}{} | now {} | range {} | {}",
        analysis.text,
        tier_suffix(&analysis.tiers),
        current_display(&analysis.current_values),
        range_display(&analysis.min_values, &analysis.max_values),
        potential_label(&analysis.potential),
    )
}

/// `1,250 exalted`, `2.5 divine`; "No price" without amount or currency.
pub fn price_text(amount: Option<f64>, currency: Option<&str>) -> String {
    match (amount, currency) {
        (Some(amount), Some(currency)) if amount != 0.0 && !currency.is_empty() => {
            let amount = (amount * 100.0).round() / 100.0;
            let number = if amount.fract() == 0.0 {
                group_thousands(amount as i64)
            } else {
                let whole = group_thousands(amount.trunc() as i64);
                let decimals = format!("{:.2}", amount.fract().abs());
                let decimals = decimals.trim_start_matches('0').trim_end_matches('0');
                format!("{}{}", whole, decimals.trim_end_matches('.'))
            };
            format!("{} {}", number, currency)
        }
        _ => "No price".to_string(),
    }
}

/// `dd/mm HH:MM`, or "N/A" without a timestamp.
pub fn listing_time_text(listed_at: Option<&DateTime<Utc>>) -> String {
    listed_at
        .map(|t| t.format("%d/%m %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
