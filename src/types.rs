//! Core types shared by the data layer, the chart lifecycle and the deck model.
//!
//! `FunnelData` is the single normalized shape every source converges to;
//! `ContainerDescriptor` describes one chart mount point as authored in the deck.

use crate::constants::{DEFAULT_CHART_SIZE, DEFAULT_DATA_SOURCE};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Canonical Funnel Data
// ============================================================================

/// Normalized funnel data: stages, sub-segments, one value vector per stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelData {
    /// Stage names, in funnel order
    pub labels: Vec<String>,
    /// Sub-segment names (cohorts, regions); empty for a single-segment funnel
    #[serde(default)]
    pub sub_labels: Vec<String>,
    /// One vector per stage, one number per sub-segment
    #[serde(deserialize_with = "deserialize_values")]
    pub values: Vec<Vec<f64>>,
    /// One color vector per stage, aligned to sub-segments
    #[serde(
        default,
        deserialize_with = "deserialize_colors",
        skip_serializing_if = "Option::is_none"
    )]
    pub colors: Option<Vec<Vec<String>>>,
}

/// A violation of the `FunnelData` shape invariants.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeIssue {
    /// No stages at all
    NoStages,
    /// `values` and `labels` disagree on the number of stages
    StageCount { labels: usize, values: usize },
    /// A stage has a different number of values than there are segments
    SegmentCount { stage: usize, expected: usize, found: usize },
    /// A value is NaN or infinite
    NonFinite { stage: usize, segment: usize },
}

impl fmt::Display for ShapeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeIssue::NoStages => write!(f, "no stages"),
            ShapeIssue::StageCount { labels, values } => {
                write!(f, "{labels} labels but {values} value rows")
            }
            ShapeIssue::SegmentCount { stage, expected, found } => {
                write!(f, "stage {stage} has {found} values, expected {expected}")
            }
            ShapeIssue::NonFinite { stage, segment } => {
                write!(f, "stage {stage} segment {segment} is not a finite number")
            }
        }
    }
}

impl FunnelData {
    /// Number of stages (labels)
    pub fn stage_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of sub-segments per stage (1 when there are no sub-labels)
    pub fn segment_count(&self) -> usize {
        self.sub_labels.len().max(1)
    }

    /// Whether colors are present for every stage
    pub fn has_colors(&self) -> bool {
        self.colors
            .as_ref()
            .is_some_and(|c| !c.is_empty() && c.iter().all(|stage| !stage.is_empty()))
    }

    /// Value at `(stage, segment)`, with missing and non-finite cells read as zero
    pub fn value_or_zero(&self, stage: usize, segment: usize) -> f64 {
        self.values
            .get(stage)
            .and_then(|row| row.get(segment))
            .copied()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// Sum of a stage's finite values
    pub fn stage_total(&self, stage: usize) -> f64 {
        (0..self.segment_count())
            .map(|segment| self.value_or_zero(stage, segment))
            .sum()
    }

    /// Check the shape invariants without rejecting anything.
    pub fn shape_issues(&self) -> Vec<ShapeIssue> {
        let mut issues = Vec::new();
        if self.labels.is_empty() {
            issues.push(ShapeIssue::NoStages);
        }
        if self.values.len() != self.labels.len() {
            issues.push(ShapeIssue::StageCount {
                labels: self.labels.len(),
                values: self.values.len(),
            });
        }
        let expected = self.segment_count();
        for (stage, row) in self.values.iter().enumerate() {
            if row.len() != expected {
                issues.push(ShapeIssue::SegmentCount {
                    stage,
                    expected,
                    found: row.len(),
                });
            }
            for (segment, value) in row.iter().enumerate() {
                if !value.is_finite() {
                    issues.push(ShapeIssue::NonFinite { stage, segment });
                }
            }
        }
        issues
    }
}

/// A stage's values: a bare number for single-segment funnels, or one per segment.
///
/// `null` reads as NaN, which is how serde_json writes a non-finite cell.
#[derive(Deserialize)]
#[serde(untagged)]
enum StageValues {
    Single(Option<f64>),
    Split(Vec<Option<f64>>),
}

fn deserialize_values<'de, D>(deserializer: D) -> Result<Vec<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let stages: Vec<StageValues> = Vec::deserialize(deserializer)?;
    Ok(stages
        .into_iter()
        .map(|stage| match stage {
            StageValues::Single(v) => vec![v.unwrap_or(f64::NAN)],
            StageValues::Split(vs) => vs.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
        })
        .collect())
}

/// A stage's colors: one color string or a list aligned to segments.
#[derive(Deserialize)]
#[serde(untagged)]
enum StageColors {
    One(String),
    Many(Vec<String>),
}

fn deserialize_colors<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let stages: Option<Vec<StageColors>> = Option::deserialize(deserializer)?;
    Ok(stages.map(|stages| {
        stages
            .into_iter()
            .map(|stage| match stage {
                StageColors::One(c) => vec![c],
                StageColors::Many(cs) => cs,
            })
            .collect()
    }))
}

// ============================================================================
// Options
// ============================================================================

/// File format a data source is stored in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    #[default]
    Json,
    Csv,
}

impl SourceFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            SourceFormat::Json => "json",
            SourceFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(SourceFormat::Json),
            "csv" => Ok(SourceFormat::Csv),
            other => Err(format!("unknown data format '{other}'")),
        }
    }
}

/// Axis along which funnel stages (or color gradients) progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Horizontal => "horizontal",
            Direction::Vertical => "vertical",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Direction::Horizontal),
            "vertical" => Ok(Direction::Vertical),
            other => Err(format!("unknown direction '{other}'")),
        }
    }
}

/// Width and height in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are positive
    pub fn is_measured(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// The host window's inner size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Position of a slide: `h` is the horizontal stack, `v` the slide within it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlideRef {
    pub h: usize,
    pub v: usize,
}

impl SlideRef {
    pub fn new(h: usize, v: usize) -> Self {
        Self { h, v }
    }

    /// Whether moving from `self` to `other` stays within one vertical stack
    pub fn same_stack(&self, other: &SlideRef) -> bool {
        self.h == other.h
    }
}

impl fmt::Display for SlideRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.h, self.v)
    }
}

impl FromStr for SlideRef {
    type Err = String;

    /// Parses `h` or `h/v`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, '/');
        let h = parts
            .next()
            .unwrap_or_default()
            .parse::<usize>()
            .map_err(|e| format!("invalid slide '{s}': {e}"))?;
        let v = match parts.next() {
            Some(v) => v
                .parse::<usize>()
                .map_err(|e| format!("invalid slide '{s}': {e}"))?,
            None => 0,
        };
        Ok(Self { h, v })
    }
}

// ============================================================================
// Containers
// ============================================================================

/// A chart mount point as authored in the deck markup.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContainerDescriptor {
    /// Unique element id, key of the record map
    pub id: String,
    /// Data set identifier (`data-data-source`)
    pub data_source_id: String,
    /// File format of the data set
    pub format: SourceFormat,
    /// Explicit funnel direction; derived from the viewport when absent
    pub direction: Option<Direction>,
    /// Direction of the color gradients
    pub gradient_direction: Direction,
    /// Whether stage percentages are shown
    pub display_percent: bool,
    /// Chart width at initialization time
    pub width: f64,
    /// Chart height at initialization time
    pub height: f64,
    /// Bodies of the HTML comments found inside the container
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inline_comments: Vec<String>,
}

impl ContainerDescriptor {
    /// A container with every attribute at its default.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_source_id: DEFAULT_DATA_SOURCE.to_string(),
            format: SourceFormat::Json,
            direction: None,
            gradient_direction: Direction::Horizontal,
            display_percent: true,
            width: DEFAULT_CHART_SIZE.0,
            height: DEFAULT_CHART_SIZE.1,
            inline_comments: Vec::new(),
        }
    }

    /// Build a descriptor from the element's attributes and contained comments.
    ///
    /// `measured` is the rendered box of the mount point; when it is empty the
    /// explicit `data-width`/`data-height` attributes are used, then the default size.
    pub fn from_attributes(
        id: impl Into<String>,
        attributes: &BTreeMap<String, String>,
        inline_comments: Vec<String>,
        measured: Size,
    ) -> Self {
        let fallback = Size::new(DEFAULT_CHART_SIZE.0, DEFAULT_CHART_SIZE.1);
        Self::from_attributes_or(id, attributes, inline_comments, measured, fallback)
    }

    /// Like [`ContainerDescriptor::from_attributes`], with `fallback` as the last size resort.
    pub fn from_attributes_or(
        id: impl Into<String>,
        attributes: &BTreeMap<String, String>,
        inline_comments: Vec<String>,
        measured: Size,
        fallback: Size,
    ) -> Self {
        let mut container = Self::new(id);
        let attr = |name: &str| attributes.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(source) = attr("data-data-source") {
            container.data_source_id = source.to_string();
        }

        container.format = match attr("data-format") {
            Some(format) => format.parse().unwrap_or_else(|e| {
                tracing::warn!("Container {}: {}, using json", container.id, e);
                SourceFormat::Json
            }),
            None if attr("data-use-json") == Some("false") => SourceFormat::Csv,
            None => SourceFormat::Json,
        };

        container.direction = attr("data-direction").and_then(|d| match d.parse() {
            Ok(direction) => Some(direction),
            Err(e) => {
                tracing::warn!("Container {}: {}", container.id, e);
                None
            }
        });
        container.gradient_direction = attr("data-gradient-direction")
            .and_then(|d| d.parse().ok())
            .unwrap_or_default();
        container.display_percent = attr("data-display-percent") != Some("false");

        let explicit = Size::new(
            attr("data-width").and_then(|w| w.parse().ok()).unwrap_or(0.0),
            attr("data-height").and_then(|h| h.parse().ok()).unwrap_or(0.0),
        );
        let size = if measured.is_measured() {
            measured
        } else if explicit.is_measured() {
            explicit
        } else {
            fallback
        };
        container.width = size.width;
        container.height = size.height;
        container.inline_comments = inline_comments;
        container
    }

    pub fn with_data_source(mut self, id: impl Into<String>, format: SourceFormat) -> Self {
        self.data_source_id = id.into();
        self.format = format;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.inline_comments.push(comment.into());
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }
}
