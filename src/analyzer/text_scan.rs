//! Number extraction from modifier text lines.
//!
//! The patterns are public so they can be checked on their own; the scanning
//! functions layer the positional checks the reconciler relies on.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyzer::potential::TOLERANCE;
use crate::errors::Result;

/// A signed integer or decimal.
pub const NUMBER_PATTERN: &str = r"[-+]?\d+(?:\.\d+)?";
/// "Adds X to Y ..." with both numbers captured.
pub const ADDS_PATTERN: &str = r"[aA]dds\s+([-+]?\d+(?:\.\d+)?)\s+to\s+([-+]?\d+(?:\.\d+)?)";
/// Descriptor tier labels such as "S4", "P1" or "7".
pub const TIER_PATTERN: &str = r"^[SP]?(\d+)$";

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(NUMBER_PATTERN).unwrap());
static ADDS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(ADDS_PATTERN).unwrap());
static TIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(TIER_PATTERN).unwrap());

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberToken {
    pub value: f64,
    pub start: usize,
    pub end: usize,
}

/// A text line accepted as the display form of a stat.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMatch {
    pub line_index: usize,
    pub values: Vec<f64>,
}

pub fn number_tokens(text: &str) -> Result<Vec<NumberToken>> {
    NUMBER_RE
        .find_iter(text)
        .map(|m| {
            Ok(NumberToken {
                value: m.as_str().parse::<f64>()?,
                start: m.start(),
                end: m.end(),
            })
        })
        .collect()
}

/// The two numbers of an "Adds X to Y" phrase, if the line has one.
pub fn adds_pair(text: &str) -> Result<Option<[f64; 2]>> {
    match ADDS_RE.captures(text) {
        Some(caps) => {
            let low = caps[1].parse::<f64>()?;
            let high = caps[2].parse::<f64>()?;
            Ok(Some([low, high]))
        }
        None => Ok(None),
    }
}

/// True when the token stands alone: preceded by whitespace, a sign or the
/// start of the line, and followed by whitespace, `%` or the end of the line.
pub fn has_boundary_context(text: &str, token: &NumberToken) -> bool {
    let before = text[..token.start].chars().next_back();
    let after = text[token.end..].chars().next();

    let before_ok = match before {
        None => true,
        Some(c) => c.is_whitespace() || c == '+' || c == '-',
    };
    let after_ok = match after {
        None => true,
        Some(c) => c.is_whitespace() || c == '%',
    };

    before_ok && after_ok
}

/// Reads the currently rolled values of a line for a stat of the given arity.
pub fn extract_rolled_values(text: &str, arity: usize) -> Result<Option<Vec<f64>>> {
    let tokens = number_tokens(text)?;

    if arity == 2 && tokens.len() >= 2 {
        if let Some(pair) = adds_pair(text)? {
            return Ok(Some(pair.to_vec()));
        }
    }

    if arity == 0 || tokens.len() != arity {
        return Ok(None);
    }

    if tokens.iter().all(|token| has_boundary_context(text, token)) {
        Ok(Some(tokens.iter().map(|t| t.value).collect()))
    } else {
        Ok(None)
    }
}

/// Every value lies inside its `[min, max]` bound, within tolerance.
pub fn within_range(values: &[f64], min_values: &[f64], max_values: &[f64]) -> bool {
    if values.len() != min_values.len() || values.len() != max_values.len() {
        return false;
    }

    values
        .iter()
        .zip(min_values.iter().zip(max_values.iter()))
        .all(|(&value, (&min, &max))| {
            let low = min.min(max) - TOLERANCE;
            let high = min.max(max) + TOLERANCE;
            low <= value && value <= high
        })
}

/// First unconsumed line whose rolled values fit the summed range.
pub fn find_matching_line(
    lines: &[String],
    consumed: &HashSet<usize>,
    min_values: &[f64],
    max_values: &[f64],
) -> Result<Option<TextMatch>> {
    let arity = min_values.len();

    for (line_index, line) in lines.iter().enumerate() {
        if consumed.contains(&line_index) {
            continue;
        }

        let Some(values) = extract_rolled_values(line, arity)? else {
            continue;
        };

        if within_range(&values, min_values, max_values) {
            return Ok(Some(TextMatch { line_index, values }));
        }
    }

    Ok(None)
}

/// Values shown for a line nothing structured explained.
pub fn display_values(text: &str) -> Result<Vec<f64>> {
    let tokens = number_tokens(text)?;

    if tokens.len() >= 2 {
        if let Some(pair) = adds_pair(text)? {
            return Ok(pair.to_vec());
        }
    }

    Ok(tokens.into_iter().map(|t| t.value).collect())
}

/// "S4" -> "T4".
pub fn tier_label(tier: &str) -> Option<String> {
    TIER_RE
        .captures(tier.trim())
        .map(|caps| format!("T{}", &caps[1]))
}
