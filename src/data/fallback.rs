//! Built-in sample data served for the `default` data source.
//!
//! Keeps a deck demonstrable without any backing files.

use crate::types::FunnelData;
use once_cell::sync::Lazy;
use std::sync::Arc;

static DEFAULT_FUNNEL: Lazy<Arc<FunnelData>> = Lazy::new(|| {
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    Arc::new(FunnelData {
        labels: strings(&["Awareness", "Interest", "Desire", "Action"]),
        sub_labels: strings(&["US", "India", "Canada"]),
        values: vec![
            vec![138028.0, 29415.0, 23488.0],
            vec![91878.0, 19516.0, 15805.0],
            vec![10098.0, 2112.0, 1759.0],
            vec![6827.0, 1422.0, 1226.0],
        ],
        colors: Some(vec![
            strings(&["#FFB178", "#FF78B1", "#FF3C8E"]),
            strings(&["#A0BBFF", "#EC77FF"]),
            strings(&["#A0F9FF"]),
        ]),
    })
});

/// The four-stage sample funnel.
pub fn default_funnel() -> Arc<FunnelData> {
    Arc::clone(&DEFAULT_FUNNEL)
}
