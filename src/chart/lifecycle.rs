//! Chart lifecycle: one instance record per container id.
//!
//! `ensure_chart` creates or replaces a container's chart instance, `draw`
//! renders it. Replacing an instance goes through [`Renderer::teardown`], which
//! by default clears the mount point, since renderers are not required to
//! support an explicit destroy.

use crate::chart::mount::MountPoint;
use crate::chart::renderer::{DrawOptions, FunnelOptions, Renderer};
use crate::constants::{ANIMATION_DURATION_MS, VERTICAL_BREAKPOINT};
use crate::data::{ColorPolicy, DataFetcher, DataResolver, ResolvedData};
use crate::types::{ContainerDescriptor, Direction, Viewport};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Preferred funnel direction for a viewport width: vertical at or below the breakpoint.
pub fn preferred_direction(viewport_width: f64, breakpoint: f64) -> Direction {
    if viewport_width <= breakpoint {
        Direction::Vertical
    } else {
        Direction::Horizontal
    }
}

/// Preferred direction with the default breakpoint.
pub fn get_preferred_direction(viewport_width: f64) -> Direction {
    preferred_direction(viewport_width, VERTICAL_BREAKPOINT)
}

/// What to do with a resolution that finishes after a newer one for the same container started.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Drop it; the newer resolution owns the record
    #[default]
    DiscardStale,
    /// Install it anyway, possibly replacing newer state
    LastWriteWins,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LifecycleSettings {
    pub vertical_breakpoint: f64,
    pub animation_duration: Duration,
    /// Used for data that reaches the renderer without colors
    pub colors: ColorPolicy,
    pub stale: StalePolicy,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            vertical_breakpoint: VERTICAL_BREAKPOINT,
            animation_duration: Duration::from_millis(ANIMATION_DURATION_MS),
            colors: ColorPolicy::default(),
            stale: StalePolicy::default(),
        }
    }
}

/// A container's chart instance.
#[derive(Debug)]
pub struct ChartInstanceRecord<I> {
    pub container_id: String,
    /// Serial number, unique per constructed instance
    pub instance_id: u64,
    pub instance: I,
    /// Options the instance was built with
    pub options: FunnelOptions,
    pub has_drawn: bool,
}

pub type SharedRecord<I> = Arc<Mutex<ChartInstanceRecord<I>>>;

pub struct ChartLifecycle<R: Renderer> {
    renderer: R,
    settings: LifecycleSettings,
    records: Mutex<HashMap<String, SharedRecord<R::Instance>>>,
    generations: Mutex<HashMap<String, u64>>,
    next_instance: AtomicU64,
}

impl<R: Renderer> ChartLifecycle<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_settings(renderer, LifecycleSettings::default())
    }

    pub fn with_settings(renderer: R, settings: LifecycleSettings) -> Self {
        Self {
            renderer,
            settings,
            records: Mutex::new(HashMap::new()),
            generations: Mutex::new(HashMap::new()),
            next_instance: AtomicU64::new(1),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Preferred direction for the current viewport, recomputed on every call.
    pub fn preferred_direction(&self, viewport: Viewport) -> Direction {
        preferred_direction(viewport.width, self.settings.vertical_breakpoint)
    }

    pub fn record(&self, container_id: &str) -> Option<SharedRecord<R::Instance>> {
        self.records.lock().get(container_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Make sure `container` has a chart instance.
    ///
    /// Without `force_reinit` an existing record is returned unchanged. Otherwise
    /// the data is resolved and a new instance replaces the previous one. When no
    /// data resolves (or the renderer refuses it) `None` is returned and the
    /// previous record, if any, stays in place.
    pub async fn ensure_chart<F: DataFetcher>(
        &self,
        resolver: &DataResolver<F>,
        container: &ContainerDescriptor,
        mount: &mut dyn MountPoint,
        viewport: Viewport,
        force_reinit: bool,
    ) -> Option<SharedRecord<R::Instance>> {
        if !force_reinit {
            if let Some(record) = self.record(&container.id) {
                tracing::debug!("Reusing chart for {}", container.id);
                return Some(record);
            }
        }

        let generation = self.begin_generation(&container.id);
        let resolved = resolver.resolve(container).await?;

        if self.settings.stale == StalePolicy::DiscardStale
            && !self.is_current_generation(&container.id, generation)
        {
            tracing::debug!("Discarding stale resolution for {}", container.id);
            return None;
        }

        let options = self.build_options(container, resolved, viewport);
        for issue in options.data.shape_issues() {
            tracing::warn!("Funnel data for {}: {}", container.id, issue);
        }

        let instance = match self.renderer.create(options.clone()) {
            Ok(instance) => instance,
            Err(e) => {
                tracing::error!("Cannot create chart for {}: {}", container.id, e);
                return None;
            }
        };

        let prior = self.records.lock().remove(&container.id);
        if let Some(prior) = prior {
            let mut prior = prior.lock();
            tracing::debug!(
                "Tearing down chart instance {} of {}",
                prior.instance_id,
                container.id
            );
            self.renderer.teardown(&mut prior.instance, mount);
        }

        let record = Arc::new(Mutex::new(ChartInstanceRecord {
            container_id: container.id.clone(),
            instance_id: self.next_instance.fetch_add(1, Ordering::Relaxed),
            instance,
            options,
            has_drawn: false,
        }));
        self.records
            .lock()
            .insert(container.id.clone(), Arc::clone(&record));
        Some(record)
    }

    /// Draw the container's chart. Returns false when there is no record or drawing failed.
    ///
    /// Animation is only enabled while the preferred direction is horizontal.
    pub fn draw(&self, container_id: &str, mount: &mut dyn MountPoint, viewport: Viewport) -> bool {
        let Some(record) = self.record(container_id) else {
            return false;
        };

        let options = DrawOptions {
            animation: self.preferred_direction(viewport) == Direction::Horizontal,
            animation_duration: self.settings.animation_duration,
        };

        let mut record = record.lock();
        match self.renderer.draw(&mut record.instance, mount, options) {
            Ok(()) => {
                record.has_drawn = true;
                true
            }
            Err(e) => {
                tracing::error!("Drawing chart {} failed: {}", container_id, e);
                false
            }
        }
    }

    /// Tear down and forget the container's chart.
    pub fn remove(&self, container_id: &str, mount: &mut dyn MountPoint) -> bool {
        let prior = self.records.lock().remove(container_id);
        match prior {
            Some(prior) => {
                self.renderer.teardown(&mut prior.lock().instance, mount);
                true
            }
            None => false,
        }
    }

    fn build_options(
        &self,
        container: &ContainerDescriptor,
        resolved: ResolvedData,
        viewport: Viewport,
    ) -> FunnelOptions {
        let overrides = resolved.overrides;
        let data = if resolved.data.has_colors() {
            resolved.data
        } else {
            let mut data = (*resolved.data).clone();
            self.settings.colors.ensure_colors(&mut data);
            Arc::new(data)
        };

        FunnelOptions {
            container_id: container.id.clone(),
            data,
            width: container.width,
            height: container.height,
            direction: overrides
                .direction
                .or(container.direction)
                .unwrap_or_else(|| self.preferred_direction(viewport)),
            gradient_direction: overrides
                .gradient_direction
                .unwrap_or(container.gradient_direction),
            display_percent: overrides
                .display_percent
                .unwrap_or(container.display_percent),
            value_formatter: overrides.value_formatter.unwrap_or_default(),
        }
    }

    fn begin_generation(&self, container_id: &str) -> u64 {
        let mut generations = self.generations.lock();
        let generation = generations.entry(container_id.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn is_current_generation(&self, container_id: &str, generation: u64) -> bool {
        self.generations.lock().get(container_id).copied() == Some(generation)
    }
}
