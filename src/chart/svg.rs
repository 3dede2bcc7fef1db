//! SVG funnel renderer.
//!
//! Draws one stacked area per sub-segment along the main axis. Stage `i`
//! occupies the column `[i * L / n, (i + 1) * L / n]`; its thickness is its total
//! relative to the largest stage, and the thickness interpolates linearly to the
//! next stage across the column. Each sub-segment is filled with a gradient
//! through its per-stage colors.

use crate::chart::mount::MountPoint;
use crate::chart::renderer::{DrawOptions, FunnelOptions, RenderError, Renderer};
use crate::constants::STAGE_PALETTE;
use crate::profile_scope;
use crate::types::{Direction, FunnelData};
use std::fmt::Write as _;

/// Share of the cross axis the widest stage fills
const FILL_RATIO: f64 = 0.7;

/// Line height of stage captions
const CAPTION_LINE: f64 = 18.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct SvgFunnelRenderer;

/// A funnel chart ready to be drawn as SVG.
#[derive(Clone, Debug)]
pub struct SvgFunnel {
    pub options: FunnelOptions,
    /// Number of completed draws
    pub draw_count: u32,
}

impl Renderer for SvgFunnelRenderer {
    type Instance = SvgFunnel;

    fn create(&self, options: FunnelOptions) -> Result<SvgFunnel, RenderError> {
        if options.data.labels.is_empty() {
            return Err(RenderError::EmptyData(options.container_id.clone()));
        }
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(options.width) || !valid(options.height) {
            return Err(RenderError::InvalidSize {
                width: options.width,
                height: options.height,
            });
        }
        Ok(SvgFunnel {
            options,
            draw_count: 0,
        })
    }

    fn draw(
        &self,
        instance: &mut SvgFunnel,
        mount: &mut dyn MountPoint,
        options: DrawOptions,
    ) -> Result<(), RenderError> {
        profile_scope!("svg_draw");
        mount.set_content(render_svg(&instance.options, options));
        instance.draw_count += 1;
        Ok(())
    }
}

/// Render a funnel to an SVG document.
pub fn render_svg(options: &FunnelOptions, draw: DrawOptions) -> String {
    let data = options.data.as_ref();
    let geometry = Geometry::new(options);
    let stages = data.stage_count();
    let segments = data.segment_count();
    let id = escape(&options.container_id);

    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="funnel-graph funnel-{dir}" id="{id}-svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" data-stages="{stages}">"#,
        dir = options.direction.label(),
        w = num(options.width),
        h = num(options.height),
    );

    out.push_str("<defs>");
    for segment in 0..segments {
        let (x2, y2) = match options.gradient_direction {
            Direction::Horizontal => (1, 0),
            Direction::Vertical => (0, 1),
        };
        let _ = write!(
            out,
            r#"<linearGradient id="{id}-seg{segment}" x1="0" y1="0" x2="{x2}" y2="{y2}">"#
        );
        for stage in 0..stages {
            let offset = if stages > 1 {
                stage as f64 / (stages - 1) as f64 * 100.0
            } else {
                0.0
            };
            let _ = write!(
                out,
                r#"<stop offset="{}%" stop-color="{}"/>"#,
                num(offset),
                escape(color_at(data, stage, segment))
            );
        }
        out.push_str("</linearGradient>");
    }
    out.push_str("</defs>");

    for segment in 0..segments {
        let _ = write!(
            out,
            r#"<path class="funnel-segment" d="{}" fill="url(#{id}-seg{segment})""#,
            geometry.segment_path(data, segment)
        );
        if draw.animation {
            let _ = write!(
                out,
                r#"><animate attributeName="opacity" from="0" to="1" dur="{}ms" fill="freeze"/></path>"#,
                draw.animation_duration.as_millis()
            );
        } else {
            out.push_str("/>");
        }
    }

    let first_total = data.stage_total(0);
    for stage in 0..stages {
        let total = data.stage_total(stage);
        let (x, y) = geometry.caption_origin(stage);
        let mut lines = vec![
            ("funnel-label", data.labels[stage].clone()),
            ("funnel-value", options.value_formatter.format(total)),
        ];
        if options.display_percent {
            let percent = if first_total > 0.0 {
                total / first_total * 100.0
            } else {
                0.0
            };
            lines.push(("funnel-percent", format!("{percent:.0}%")));
        }
        for (line, (class, text)) in lines.iter().enumerate() {
            let _ = write!(
                out,
                r#"<text class="{class}" x="{}" y="{}">{}</text>"#,
                num(x),
                num(y + line as f64 * CAPTION_LINE),
                escape(text)
            );
        }
    }

    if !data.sub_labels.is_empty() {
        let legend_y = options.height - 8.0;
        for (segment, label) in data.sub_labels.iter().enumerate() {
            let x = 8.0 + segment as f64 * 100.0;
            let _ = write!(
                out,
                r#"<rect class="funnel-legend-swatch" x="{}" y="{}" width="10" height="10" fill="{}"/><text class="funnel-legend" x="{}" y="{}">{}</text>"#,
                num(x),
                num(legend_y - 10.0),
                escape(color_at(data, 0, segment)),
                num(x + 14.0),
                num(legend_y),
                escape(label)
            );
        }
    }

    out.push_str("</svg>");
    out
}

/// Maps main-axis/cross-axis positions to SVG coordinates.
struct Geometry {
    direction: Direction,
    main_len: f64,
    cross_len: f64,
    stages: usize,
    max_total: f64,
}

impl Geometry {
    fn new(options: &FunnelOptions) -> Self {
        let (main_len, cross_len) = match options.direction {
            Direction::Horizontal => (options.width, options.height),
            Direction::Vertical => (options.height, options.width),
        };
        let data = options.data.as_ref();
        let max_total = (0..data.stage_count())
            .map(|stage| data.stage_total(stage))
            .fold(0.0_f64, f64::max);
        Self {
            direction: options.direction,
            main_len,
            cross_len,
            stages: data.stage_count().max(1),
            max_total: if max_total > 0.0 { max_total } else { 1.0 },
        }
    }

    fn point(&self, main: f64, cross: f64) -> (f64, f64) {
        match self.direction {
            Direction::Horizontal => (main, cross),
            Direction::Vertical => (cross, main),
        }
    }

    fn edge(&self, index: usize) -> f64 {
        index as f64 * self.main_len / self.stages as f64
    }

    /// Cross-axis position of the boundary above `segment` within `stage`.
    fn boundary(&self, data: &FunnelData, stage: usize, segment: usize) -> f64 {
        let total = data.stage_total(stage);
        let thickness = total / self.max_total * self.cross_len * FILL_RATIO;
        let top = (self.cross_len - thickness) / 2.0;
        if total <= 0.0 {
            return top;
        }
        let before: f64 = (0..segment).map(|s| data.value_or_zero(stage, s)).sum();
        top + before / total * thickness
    }

    fn segment_path(&self, data: &FunnelData, segment: usize) -> String {
        let stage_at = |edge: usize| edge.min(self.stages - 1);
        let mut points = Vec::with_capacity(2 * (self.stages + 1));
        for edge in 0..=self.stages {
            let cross = self.boundary(data, stage_at(edge), segment);
            points.push(self.point(self.edge(edge), cross));
        }
        for edge in (0..=self.stages).rev() {
            let cross = self.boundary(data, stage_at(edge), segment + 1);
            points.push(self.point(self.edge(edge), cross));
        }

        let mut d = String::new();
        for (i, (x, y)) in points.iter().enumerate() {
            let _ = write!(d, "{}{},{} ", if i == 0 { "M" } else { "L" }, num(*x), num(*y));
        }
        d.push('Z');
        d
    }

    fn caption_origin(&self, stage: usize) -> (f64, f64) {
        let main = self.edge(stage) + 8.0;
        match self.direction {
            Direction::Horizontal => (main, CAPTION_LINE + 4.0),
            Direction::Vertical => (8.0, main + CAPTION_LINE),
        }
    }
}

/// Color of `segment` at `stage`, falling back to the stage's last color, the
/// last stage's colors, then the palette.
fn color_at(data: &FunnelData, stage: usize, segment: usize) -> &str {
    let colors = data.colors.as_deref().unwrap_or_default();
    colors
        .get(stage)
        .or_else(|| colors.last())
        .and_then(|stage_colors| stage_colors.get(segment).or_else(|| stage_colors.last()))
        .map(String::as_str)
        .unwrap_or(STAGE_PALETTE[(stage + segment) % STAGE_PALETTE.len()])
}

/// Two-decimal number with trailing zeros removed
fn num(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
