//! JSON data parsing
//!
//! Fetched JSON files are expected to hold canonical funnel data directly.

use crate::data::error::{DataError, DataResult};
use crate::types::FunnelData;

/// Parse JSON content holding a canonical funnel data object
pub fn parse_json_source(json: &str) -> DataResult<FunnelData> {
    if json.trim().is_empty() {
        return Err(DataError::EmptyFile);
    }
    Ok(serde_json::from_str(json)?)
}

/// Serialize funnel data in the canonical JSON layout
pub fn write_json_content(data: &FunnelData) -> DataResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}
