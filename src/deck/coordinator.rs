//! Navigation and resize coordination.
//!
//! The `Coordinator` owns the data resolver (and with it the data cache) and the
//! chart lifecycle manager. Hosts feed it presentation events; for each event it
//! enumerates the funnel containers of the relevant slide in document order and
//! runs `ensure_chart` followed by `draw` on each. A container that cannot be
//! initialized or drawn is skipped and never stops its siblings.

use crate::chart::{ChartLifecycle, MountPoint, Renderer};
use crate::constants::{CONTAINER_PREFIX, SLOW_CONTAINER_MS};
use crate::data::{DataFetcher, DataResolver};
use crate::perf::ScopedTimer;
use crate::settings::FunnelSettings;
use crate::types::{ContainerDescriptor, SlideRef, Viewport};
use serde::{Deserialize, Serialize};

// ============================================================================
// Host Interface
// ============================================================================

/// What the coordinator needs from a presentation host.
pub trait Presentation {
    fn current_slide(&self) -> SlideRef;

    fn viewport(&self) -> Viewport;

    /// Chart containers of `slide`, in document order
    fn containers(&self, slide: SlideRef) -> Vec<ContainerDescriptor>;

    fn container(&self, container_id: &str) -> Option<ContainerDescriptor>;

    fn mount_point(&mut self, container_id: &str) -> Option<&mut dyn MountPoint>;
}

/// Presentation lifecycle events.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeckEvent {
    /// The first slide is shown
    Ready { current: SlideRef },
    /// Navigation happened; `previous` is absent when the host cannot tell
    SlideChanged {
        previous: Option<SlideRef>,
        current: SlideRef,
    },
    /// The viewport changed size
    Resize { viewport: Viewport },
}

/// When slide changes force a container's chart to be rebuilt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPolicy {
    /// Rebuild on every slide change
    #[default]
    AlwaysReinit,
    /// Rebuild only when leaving another horizontal stack; vertical moves reuse charts
    ReinitOnHorizontal,
}

impl NavigationPolicy {
    pub fn force_reinit(&self, previous: Option<SlideRef>, current: SlideRef) -> bool {
        match self {
            NavigationPolicy::AlwaysReinit => true,
            NavigationPolicy::ReinitOnHorizontal => is_horizontal_navigation(previous, current),
        }
    }
}

/// True when navigation crossed into a different horizontal stack, or the origin is unknown.
pub fn is_horizontal_navigation(previous: Option<SlideRef>, current: SlideRef) -> bool {
    match previous {
        Some(previous) => !previous.same_stack(&current),
        None => true,
    }
}

/// Outcome of processing one event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub slide: Option<SlideRef>,
    /// Container ids found on the slide
    pub found: Vec<String>,
    /// Container ids whose chart was drawn
    pub drawn: Vec<String>,
    /// Container ids that were skipped
    pub skipped: Vec<String>,
}

impl ProcessReport {
    fn for_slide(slide: SlideRef) -> Self {
        Self {
            slide: Some(slide),
            ..Default::default()
        }
    }
}

// ============================================================================
// Coordinator
// ============================================================================

pub struct Coordinator<F, R: Renderer> {
    resolver: DataResolver<F>,
    charts: ChartLifecycle<R>,
    navigation: NavigationPolicy,
    prefix: String,
}

impl<F: DataFetcher, R: Renderer> Coordinator<F, R> {
    pub fn new(resolver: DataResolver<F>, charts: ChartLifecycle<R>) -> Self {
        Self {
            resolver,
            charts,
            navigation: NavigationPolicy::default(),
            prefix: CONTAINER_PREFIX.to_string(),
        }
    }

    /// Wire a coordinator from persisted settings.
    pub fn from_settings(fetcher: F, renderer: R, settings: &FunnelSettings) -> Self {
        let resolver = DataResolver::new(fetcher)
            .with_layout(settings.source_layout())
            .with_color_policy(settings.colors);
        let charts = ChartLifecycle::with_settings(renderer, settings.lifecycle());
        Self::new(resolver, charts)
            .with_navigation(settings.navigation)
            .with_prefix(settings.container_prefix.clone())
    }

    pub fn with_navigation(mut self, navigation: NavigationPolicy) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn resolver(&self) -> &DataResolver<F> {
        &self.resolver
    }

    pub fn charts(&self) -> &ChartLifecycle<R> {
        &self.charts
    }

    pub fn navigation(&self) -> NavigationPolicy {
        self.navigation
    }

    pub async fn handle<P: Presentation>(&self, presentation: &mut P, event: DeckEvent) -> ProcessReport {
        match event {
            DeckEvent::Ready { current } => self.on_ready(presentation, current).await,
            DeckEvent::SlideChanged { previous, current } => {
                self.on_slide_changed(presentation, previous, current).await
            }
            DeckEvent::Resize { viewport } => self.on_resize(presentation, viewport).await,
        }
    }

    pub async fn on_ready<P: Presentation>(&self, presentation: &mut P, current: SlideRef) -> ProcessReport {
        let viewport = presentation.viewport();
        self.process_slide(presentation, current, viewport, true).await
    }

    pub async fn on_slide_changed<P: Presentation>(
        &self,
        presentation: &mut P,
        previous: Option<SlideRef>,
        current: SlideRef,
    ) -> ProcessReport {
        let force = self.navigation.force_reinit(previous, current);
        let viewport = presentation.viewport();
        self.process_slide(presentation, current, viewport, force).await
    }

    /// Rebuild the current slide's charts for a new viewport.
    pub async fn on_resize<P: Presentation>(&self, presentation: &mut P, viewport: Viewport) -> ProcessReport {
        let current = presentation.current_slide();
        self.process_slide(presentation, current, viewport, true).await
    }

    /// Ensure and draw every funnel container of `slide`, one after another.
    pub async fn process_slide<P: Presentation>(
        &self,
        presentation: &mut P,
        slide: SlideRef,
        viewport: Viewport,
        force_reinit: bool,
    ) -> ProcessReport {
        let containers: Vec<ContainerDescriptor> = presentation
            .containers(slide)
            .into_iter()
            .filter(|c| c.id.starts_with(&self.prefix))
            .collect();

        let mut report = ProcessReport::for_slide(slide);
        if containers.is_empty() {
            tracing::debug!("No funnel containers on slide {}", slide);
            return report;
        }
        tracing::info!("Slide {}: {} funnel containers", slide, containers.len());

        for container in containers {
            report.found.push(container.id.clone());
            let _timer = ScopedTimer::new(format!("container {}", container.id), SLOW_CONTAINER_MS);

            if self
                .process_container(presentation, &container, viewport, force_reinit)
                .await
            {
                report.drawn.push(container.id);
            } else {
                report.skipped.push(container.id);
            }
        }
        report
    }

    /// Host entry point: initialize one container's chart. Returns whether a record exists afterwards.
    pub async fn initialize_chart<P: Presentation>(
        &self,
        presentation: &mut P,
        container_id: &str,
        force_reinit: bool,
    ) -> bool {
        let Some(container) = presentation.container(container_id) else {
            tracing::warn!("Unknown container {}", container_id);
            return false;
        };
        let viewport = presentation.viewport();
        let Some(mount) = presentation.mount_point(container_id) else {
            tracing::warn!("Container {} has no mount point", container_id);
            return false;
        };
        self.charts
            .ensure_chart(&self.resolver, &container, mount, viewport, force_reinit)
            .await
            .is_some()
    }

    /// Host entry point: draw one container's chart if it has one.
    pub fn draw_chart<P: Presentation>(&self, presentation: &mut P, container_id: &str) -> bool {
        let viewport = presentation.viewport();
        match presentation.mount_point(container_id) {
            Some(mount) => self.charts.draw(container_id, mount, viewport),
            None => false,
        }
    }

    async fn process_container<P: Presentation>(
        &self,
        presentation: &mut P,
        container: &ContainerDescriptor,
        viewport: Viewport,
        force_reinit: bool,
    ) -> bool {
        let Some(mount) = presentation.mount_point(&container.id) else {
            tracing::warn!("Container {} has no mount point, skipping", container.id);
            return false;
        };

        let record = self
            .charts
            .ensure_chart(&self.resolver, container, &mut *mount, viewport, force_reinit)
            .await;
        if record.is_none() {
            tracing::debug!(
                "Skipping {}: no chart for data source {}",
                container.id,
                container.data_source_id
            );
            return false;
        }

        self.charts.draw(&container.id, mount, viewport)
    }
}
