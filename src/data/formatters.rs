//! Named value formatters.
//!
//! Inline configurations may reference formatters with strings such as
//! `"function compact"` or `"function:grouped"`. Only names registered here are
//! accepted; function bodies are never compiled.

use crate::data::error::{DataError, DataResult};
use serde::{Deserialize, Serialize};

/// Marker that turns a string value into a callable reference
pub const CALLABLE_MARKER: &str = "function";

/// Formats stage totals for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormatter {
    /// Thousands separators, up to two decimals: `138,028`
    #[default]
    Grouped,
    /// Suffixed short form: `138K`, `1.2M`
    Compact,
    /// The number as is
    Raw,
    /// One decimal place: `12.5`
    Fixed1,
}

impl ValueFormatter {
    pub fn all() -> &'static [ValueFormatter] {
        &[
            ValueFormatter::Grouped,
            ValueFormatter::Compact,
            ValueFormatter::Raw,
            ValueFormatter::Fixed1,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueFormatter::Grouped => "grouped",
            ValueFormatter::Compact => "compact",
            ValueFormatter::Raw => "raw",
            ValueFormatter::Fixed1 => "fixed1",
        }
    }

    /// Look a formatter up by its registered name.
    pub fn from_name(name: &str) -> Option<ValueFormatter> {
        Self::all().iter().copied().find(|f| f.name() == name)
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        match self {
            ValueFormatter::Grouped => format_grouped(value),
            ValueFormatter::Compact => format_compact(value),
            ValueFormatter::Raw => value.to_string(),
            ValueFormatter::Fixed1 => format!("{value:.1}"),
        }
    }
}

/// Interpret a string value from an inline configuration.
///
/// Returns `None` when the string is not a callable reference, and an error when
/// it is one but names no registered formatter (or is an anonymous function body).
pub fn parse_callable(value: &str) -> Option<DataResult<ValueFormatter>> {
    let rest = value.trim_start().strip_prefix(CALLABLE_MARKER)?;
    let rest = rest.trim_start().trim_start_matches(':').trim_start();
    if rest.starts_with('(') {
        return Some(Err(DataError::InlineConfig(format!(
            "anonymous function bodies are not supported: {value}"
        ))));
    }

    let name: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    Some(ValueFormatter::from_name(&name).ok_or(DataError::UnknownFormatter(name)))
}

fn format_compact(value: f64) -> String {
    // 999_999 rounds to 1000K, which reads better as 1.0M
    if value >= 1_000_000.0 || (value / 1_000.0).round() >= 1_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.0}K", value / 1_000.0)
    } else {
        value.to_string()
    }
}

fn format_grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3 + 4);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    if value < 0.0 && grouped.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{grouped}")
    } else {
        grouped
    }
}
