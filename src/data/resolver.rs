//! Data resolution for a chart container.
//!
//! Sources are tried in order, first success wins:
//! 1. inline configuration in the container's comments
//! 2. the cache, keyed by `(data_source_id, format)`
//! 3. the data file, `data/json/<id>.json` or `data/csv/<id>.csv`
//! 4. the built-in sample funnel, for the `default` data source only
//!
//! Fetched data is written into the cache before it is returned.

use crate::constants::{CSV_DIR, DEFAULT_DATA_SOURCE, JSON_DIR};
use crate::data::cache::{CacheKey, DataCache};
use crate::data::colors::ColorPolicy;
use crate::data::csv_parser::parse_csv_source;
use crate::data::error::DataResult;
use crate::data::fallback::default_funnel;
use crate::data::fetch::DataFetcher;
use crate::data::inline_config::{ChartOverrides, parse_inline_config};
use crate::data::json_parser::parse_json_source;
use crate::types::{ContainerDescriptor, FunnelData, SourceFormat};
use std::sync::Arc;

/// Where data files live, relative to the fetcher's root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLayout {
    pub json_dir: String,
    pub csv_dir: String,
}

impl Default for SourceLayout {
    fn default() -> Self {
        Self {
            json_dir: JSON_DIR.to_string(),
            csv_dir: CSV_DIR.to_string(),
        }
    }
}

impl SourceLayout {
    pub fn path_for(&self, data_source_id: &str, format: SourceFormat) -> String {
        let dir = match format {
            SourceFormat::Json => &self.json_dir,
            SourceFormat::Csv => &self.csv_dir,
        };
        format!(
            "{}/{}.{}",
            dir.trim_end_matches('/'),
            data_source_id,
            format.extension()
        )
    }
}

/// Which source answered a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataOrigin {
    Inline,
    Cache,
    Fetched,
    Fallback,
}

/// Canonical data plus where it came from.
#[derive(Clone, Debug)]
pub struct ResolvedData {
    pub data: Arc<FunnelData>,
    pub origin: DataOrigin,
    /// Option overrides from the inline configuration, if one supplied the data
    pub overrides: ChartOverrides,
}

impl ResolvedData {
    fn new(data: Arc<FunnelData>, origin: DataOrigin) -> Self {
        Self {
            data,
            origin,
            overrides: ChartOverrides::default(),
        }
    }
}

pub struct DataResolver<F> {
    fetcher: F,
    cache: DataCache,
    layout: SourceLayout,
    colors: ColorPolicy,
}

impl<F: DataFetcher> DataResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            cache: DataCache::new(),
            layout: SourceLayout::default(),
            colors: ColorPolicy::default(),
        }
    }

    pub fn with_layout(mut self, layout: SourceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Color policy applied to parsed CSV files
    pub fn with_color_policy(mut self, colors: ColorPolicy) -> Self {
        self.colors = colors;
        self
    }

    pub fn cache(&self) -> &DataCache {
        &self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn layout(&self) -> &SourceLayout {
        &self.layout
    }

    /// Resolve the data for a container, or `None` when no source has any.
    pub async fn resolve(&self, container: &ContainerDescriptor) -> Option<ResolvedData> {
        for comment in &container.inline_comments {
            let Some(config) = parse_inline_config(comment) else {
                continue;
            };
            if let Some(data) = config.data {
                tracing::debug!("Container {} uses inline data", container.id);
                return Some(ResolvedData {
                    data: Arc::new(data),
                    origin: DataOrigin::Inline,
                    overrides: config.overrides,
                });
            }
        }

        let resolved = self
            .resolve_source(&container.data_source_id, container.format)
            .await;
        if resolved.is_none() {
            tracing::error!(
                "No data available for funnel chart {} (source {})",
                container.id,
                container.data_source_id
            );
        }
        resolved
    }

    /// Resolve a data set by id and format, without inline configuration.
    pub async fn resolve_source(
        &self,
        data_source_id: &str,
        format: SourceFormat,
    ) -> Option<ResolvedData> {
        let key = CacheKey::new(data_source_id, format);
        if let Some(data) = self.cache.get(&key) {
            tracing::debug!("Cache hit for {} ({})", data_source_id, format);
            return Some(ResolvedData::new(data, DataOrigin::Cache));
        }

        match self.fetch_and_decode(data_source_id, format).await {
            Ok(data) => {
                let data = self.cache.insert(key, data);
                return Some(ResolvedData::new(data, DataOrigin::Fetched));
            }
            Err(e) => {
                tracing::warn!("Error loading funnel data ({}): {}", data_source_id, e);
            }
        }

        if data_source_id == DEFAULT_DATA_SOURCE {
            return Some(ResolvedData::new(default_funnel(), DataOrigin::Fallback));
        }
        None
    }

    async fn fetch_and_decode(
        &self,
        data_source_id: &str,
        format: SourceFormat,
    ) -> DataResult<FunnelData> {
        let path = self.layout.path_for(data_source_id, format);
        let text = self.fetcher.fetch_text(&path).await?;
        match format {
            SourceFormat::Json => parse_json_source(&text),
            SourceFormat::Csv => parse_csv_source(&text, &self.colors),
        }
    }
}
