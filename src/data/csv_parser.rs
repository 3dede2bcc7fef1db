//! CSV parsing into canonical funnel data
//!
//! Expected layout:
//! ```text
//! Stage,US,EU
//! Awareness,100,50
//! Interest,60,20
//! ```
//! The first header cell is ignored, the remaining header cells become sub-labels.
//! Every following row contributes one stage: its first cell is the label, the
//! remaining cells are the stage's values.

use crate::data::colors::ColorPolicy;
use crate::data::error::{DataError, DataResult};
use crate::types::FunnelData;

/// Parse CSV text into funnel data.
///
/// Never fails: non-numeric cells become `NaN` and ragged rows are kept as they
/// are, so callers should check [`FunnelData::shape_issues`] before rendering.
/// Colors are synthesized with `colors`.
pub fn parse_csv(text: &str, colors: &ColorPolicy) -> FunnelData {
    let mut lines = text.trim().lines().filter(|line| !line.trim().is_empty());

    let sub_labels: Vec<String> = lines
        .next()
        .map(|header| {
            split_csv_line(header, ',')
                .into_iter()
                .skip(1)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let mut labels = Vec::new();
    let mut values = Vec::new();
    for line in lines {
        let mut cells = split_csv_line(line, ',').into_iter();
        labels.push(cells.next().unwrap_or_default().to_string());
        values.push(cells.map(parse_number).collect::<Vec<f64>>());
    }

    let mut data = FunnelData {
        labels,
        sub_labels,
        values,
        colors: None,
    };
    colors.ensure_colors(&mut data);
    data
}

/// Parse a fetched CSV file, rejecting files without a header or without stages.
pub fn parse_csv_source(text: &str, colors: &ColorPolicy) -> DataResult<FunnelData> {
    if text.trim().is_empty() {
        return Err(DataError::EmptyFile);
    }
    let data = parse_csv(text, colors);
    if data.labels.is_empty() {
        return Err(DataError::Csv("header row without stage rows".to_string()));
    }
    Ok(data)
}

/// Numeric cell value; empty cells read as zero, anything else unparsable as NaN.
fn parse_number(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0.0;
    }
    cell.parse::<f64>().unwrap_or(f64::NAN)
}

/// Split a CSV line respecting quoted fields
fn split_csv_line(line: &str, delimiter: char) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;

    for (i, c) in line.char_indices() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            result.push(unquote(&line[start..i]));
            start = i + c.len_utf8();
        }
    }

    // Add the last field
    result.push(unquote(&line[start..]));
    result
}

/// Remove surrounding quotes from a field
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
