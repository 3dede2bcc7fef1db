//! A static deck: scanned markup plus navigation state and string-backed mount points.

use crate::chart::{HtmlMount, MountPoint};
use crate::constants::{CONTAINER_PREFIX, DEFAULT_CHART_SIZE};
use crate::deck::coordinator::{DeckEvent, Presentation};
use crate::deck::error::{DeckError, DeckResult};
use crate::deck::markup::{ScannedContainer, inject_markup, scan_deck};
use crate::types::{ContainerDescriptor, Size, SlideRef, Viewport};
use std::collections::HashMap;
use std::path::Path;

pub struct Deck {
    source: String,
    slides: Vec<SlideRef>,
    containers: Vec<ScannedContainer>,
    mounts: HashMap<String, HtmlMount>,
    current: SlideRef,
    viewport: Viewport,
    default_size: Size,
}

impl Deck {
    /// Parse a deck, treating elements whose id starts with `prefix` as funnel containers.
    pub fn parse(html: impl Into<String>, prefix: &str) -> DeckResult<Self> {
        let source = html.into();
        let scan = scan_deck(&source, prefix)?;
        let Some(&first) = scan.slides.first() else {
            return Err(DeckError::NoSlides);
        };

        let mut mounts = HashMap::new();
        for container in &scan.containers {
            if mounts.contains_key(&container.id) {
                tracing::warn!("Duplicate container id {}; only the first is rendered", container.id);
                continue;
            }
            mounts.insert(container.id.clone(), HtmlMount::new(container.id.clone()));
        }

        tracing::info!(
            "Parsed deck: {} slides, {} funnel containers",
            scan.slides.len(),
            mounts.len()
        );

        Ok(Self {
            source,
            slides: scan.slides,
            containers: scan.containers,
            mounts,
            current: first,
            viewport: Viewport::default(),
            default_size: Size::new(DEFAULT_CHART_SIZE.0, DEFAULT_CHART_SIZE.1),
        })
    }

    pub fn from_file(path: &Path, prefix: &str) -> DeckResult<Self> {
        let html = std::fs::read_to_string(path)?;
        Self::parse(html, prefix)
    }

    /// Parse with the default container prefix.
    pub fn from_html(html: impl Into<String>) -> DeckResult<Self> {
        Self::parse(html, CONTAINER_PREFIX)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Chart size for containers without explicit `data-width`/`data-height`.
    pub fn with_default_size(mut self, size: Size) -> Self {
        self.default_size = size;
        self
    }

    pub fn slides(&self) -> &[SlideRef] {
        &self.slides
    }

    /// The event a host emits once the first slide is shown.
    pub fn ready(&self) -> DeckEvent {
        DeckEvent::Ready {
            current: self.current,
        }
    }

    /// Move to `slide`, returning the matching slide-changed event.
    pub fn navigate(&mut self, slide: SlideRef) -> DeckResult<DeckEvent> {
        if !self.slides.contains(&slide) {
            return Err(DeckError::UnknownSlide(slide.to_string()));
        }
        let previous = std::mem::replace(&mut self.current, slide);
        Ok(DeckEvent::SlideChanged {
            previous: Some(previous),
            current: slide,
        })
    }

    /// Change the viewport, returning the matching resize event.
    pub fn resize(&mut self, viewport: Viewport) -> DeckEvent {
        self.viewport = viewport;
        DeckEvent::Resize { viewport }
    }

    pub fn mount(&self, container_id: &str) -> Option<&HtmlMount> {
        self.mounts.get(container_id)
    }

    /// The deck markup with every non-empty mount point written into its container.
    pub fn to_html(&self) -> DeckResult<String> {
        let rendered: HashMap<String, String> = self
            .mounts
            .iter()
            .filter(|(_, mount)| !mount.is_empty())
            .map(|(id, mount)| (id.clone(), mount.content().to_string()))
            .collect();
        if rendered.is_empty() {
            return Ok(self.source.clone());
        }

        let preserved: HashMap<String, Vec<String>> = self
            .containers
            .iter()
            .filter(|c| rendered.contains_key(&c.id) && !c.comments.is_empty())
            .map(|c| (c.id.clone(), c.comments.clone()))
            .collect();

        inject_markup(&self.source, &rendered, &preserved)
    }

    fn describe(&self, container: &ScannedContainer) -> ContainerDescriptor {
        let measured = self
            .mounts
            .get(&container.id)
            .map(|m| m.measured_size())
            .unwrap_or(Size::ZERO);
        ContainerDescriptor::from_attributes_or(
            container.id.clone(),
            &container.attributes,
            container.comments.clone(),
            measured,
            self.default_size,
        )
    }
}

impl Presentation for Deck {
    fn current_slide(&self) -> SlideRef {
        self.current
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn containers(&self, slide: SlideRef) -> Vec<ContainerDescriptor> {
        self.containers
            .iter()
            .filter(|c| c.slide == slide)
            .map(|c| self.describe(c))
            .collect()
    }

    fn container(&self, container_id: &str) -> Option<ContainerDescriptor> {
        self.containers
            .iter()
            .find(|c| c.id == container_id)
            .map(|c| self.describe(c))
    }

    fn mount_point(&mut self, container_id: &str) -> Option<&mut dyn MountPoint> {
        self.mounts
            .get_mut(container_id)
            .map(|m| m as &mut dyn MountPoint)
    }
}
