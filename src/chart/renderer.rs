//! The renderer capability the lifecycle manager drives.
//!
//! Renderers have no obligation to support an explicit destroy: the default
//! [`Renderer::teardown`] clears the mount point, which is all a renderer without
//! teardown support needs.

use crate::chart::mount::MountPoint;
use crate::data::ValueFormatter;
use crate::types::{Direction, FunnelData};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Everything a renderer needs to build one chart instance.
#[derive(Clone, Debug, PartialEq)]
pub struct FunnelOptions {
    pub container_id: String,
    /// Canonical data, colors already present
    pub data: Arc<FunnelData>,
    pub width: f64,
    pub height: f64,
    pub direction: Direction,
    pub gradient_direction: Direction,
    pub display_percent: bool,
    pub value_formatter: ValueFormatter,
}

/// Per-draw options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOptions {
    pub animation: bool,
    pub animation_duration: Duration,
}

#[derive(Error, Debug)]
pub enum RenderError {
    /// The data has no stages
    #[error("No stages to render for {0}")]
    EmptyData(String),

    /// The chart box is empty or not finite
    #[error("Invalid chart size {width}x{height}")]
    InvalidSize { width: f64, height: f64 },
}

pub trait Renderer {
    /// Opaque per-chart state
    type Instance;

    /// Build an instance; nothing is rendered until [`Renderer::draw`].
    fn create(&self, options: FunnelOptions) -> Result<Self::Instance, RenderError>;

    /// Render (or re-render) the instance into its mount point.
    fn draw(
        &self,
        instance: &mut Self::Instance,
        mount: &mut dyn MountPoint,
        options: DrawOptions,
    ) -> Result<(), RenderError>;

    /// Dispose of an instance that is being replaced.
    fn teardown(&self, instance: &mut Self::Instance, mount: &mut dyn MountPoint) {
        let _ = instance;
        mount.clear();
    }
}
