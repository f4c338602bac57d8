//! Conversions from raw field input to stored values.
//!
//! Absence is the only representation of "no answer": empty input maps to
//! `None`, never to `0` or a non-finite number.

use crate::document::FieldValue;

pub const PERCENT_MIN: f64 = 0.0;
pub const PERCENT_MAX: f64 = 100.0;

/// Parse user text into a number. Empty, unparsable and non-finite input is `None`.
#[must_use]
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[must_use]
pub fn clamp_percent(value: Option<f64>) -> Option<f64> {
    value.map(|n| n.clamp(PERCENT_MIN, PERCENT_MAX))
}

#[must_use]
pub fn parse_percent(raw: &str) -> Option<f64> {
    clamp_percent(parse_number(raw))
}

/// Free text; an empty string clears the field.
#[must_use]
pub fn text_value(raw: &str) -> Option<FieldValue> {
    if raw.is_empty() {
        None
    } else {
        Some(FieldValue::Text(raw.to_string()))
    }
}

/// Render a stored number the way it would be typed back in.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Toggle `option` in a multi-select value.
///
/// Present options are removed; absent options are appended at the end, so a
/// re-added option does not return to its earlier position.
#[must_use]
pub fn toggle_choice(current: &[String], option: &str) -> Vec<String> {
    if current.iter().any(|c| c == option) {
        current.iter().filter(|c| *c != option).cloned().collect()
    } else {
        let mut next = current.to_vec();
        next.push(option.to_string());
        next
    }
}
