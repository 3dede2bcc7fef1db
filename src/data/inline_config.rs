//! Inline chart configuration embedded as an HTML comment inside a container.
//!
//! ```html
//! <div id="funnel-signups">
//!   <!-- { "data": { "labels": ["Visit", "Signup"], "values": [120, 30] },
//!          "valueFormatter": "function compact" } -->
//! </div>
//! ```
//!
//! String values beginning with `function` are callable references and are looked
//! up in the formatter registry (see [`parse_callable`]).

use crate::data::error::{DataError, DataResult};
use crate::data::formatters::{ValueFormatter, parse_callable};
use crate::types::{Direction, FunnelData};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chart options an inline configuration may override.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ChartOverrides {
    pub direction: Option<Direction>,
    pub gradient_direction: Option<Direction>,
    pub display_percent: Option<bool>,
    pub value_formatter: Option<ValueFormatter>,
}

/// A parsed inline configuration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InlineConfig {
    /// Data payload; only configurations carrying one take part in resolution
    pub data: Option<FunnelData>,
    /// Option overrides for the chart
    pub overrides: ChartOverrides,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInlineConfig {
    #[serde(default)]
    data: Option<FunnelData>,
    #[serde(default)]
    direction: Option<Direction>,
    #[serde(default)]
    gradient_direction: Option<Direction>,
    #[serde(default)]
    display_percent: Option<bool>,
    #[serde(default)]
    value_formatter: Option<String>,
}

/// Parse an inline configuration, returning `None` on any failure.
///
/// `None` is the ordinary "no inline override here" answer, so failures are only
/// logged at debug level.
pub fn parse_inline_config(text: &str) -> Option<InlineConfig> {
    match try_parse_inline_config(text) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::debug!("Ignoring inline config: {}", e);
            None
        }
    }
}

/// Parse an inline configuration, reporting why it was rejected.
pub fn try_parse_inline_config(text: &str) -> DataResult<InlineConfig> {
    let scrubbed: String = text
        .chars()
        .filter(|c| !matches!(c, '\r' | '\n' | '\t'))
        .collect();

    let mut value: Value = serde_json::from_str(scrubbed.trim())?;
    if !value.is_object() {
        return Err(DataError::InlineConfig(
            "configuration must be a JSON object".to_string(),
        ));
    }

    resolve_callables(&mut value)?;

    let raw: RawInlineConfig = serde_json::from_value(value)?;
    let value_formatter = raw
        .value_formatter
        .map(|name| ValueFormatter::from_name(&name).ok_or(DataError::UnknownFormatter(name)))
        .transpose()?;

    Ok(InlineConfig {
        data: raw.data,
        overrides: ChartOverrides {
            direction: raw.direction,
            gradient_direction: raw.gradient_direction,
            display_percent: raw.display_percent,
            value_formatter,
        },
    })
}

/// Replace callable references with their registered formatter names.
///
/// A reference anywhere in the document must name a registered formatter, but
/// only `valueFormatter` feeds the chart options.
fn resolve_callables(value: &mut Value) -> DataResult<()> {
    match value {
        Value::String(s) => {
            if let Some(formatter) = parse_callable(s) {
                *s = formatter?.name().to_string();
            }
        }
        Value::Array(items) => items.iter_mut().try_for_each(resolve_callables)?,
        Value::Object(map) => map.values_mut().try_for_each(resolve_callables)?,
        _ => {}
    }
    Ok(())
}
