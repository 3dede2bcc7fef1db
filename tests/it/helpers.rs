//! Test helpers and builders for reducing boilerplate in tests.
//!
//! This module provides:
//! - `MemoryFetcher` - in-memory data files that count every fetch
//! - `GatedFetcher` - holds its first fetch until a second one arrives
//! - `RecordingRenderer` - a renderer that logs create/draw/teardown calls
//! - `TestDeckBuilder` - builder for reveal-style deck markup

use funnel_deck::chart::{
    ChartLifecycle, DrawOptions, FunnelOptions, MountPoint, RenderError, Renderer,
};
use funnel_deck::data::{DataFetcher, DataResolver, FetchError};
use funnel_deck::deck::{Coordinator, Deck};
use futures::channel::oneshot;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// The CSV of the `sales` data set used across scenarios.
pub const SALES_CSV: &str = "Stage,US,EU\nTop,100,50\nMid,60,20";

// ============================================================================
// Fetchers
// ============================================================================

/// Serves data files from memory; unknown paths answer 404.
#[derive(Default)]
pub struct MemoryFetcher {
    files: HashMap<String, String>,
    fetches: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// `data/csv/sales.csv` holding [`SALES_CSV`].
    pub fn with_sales() -> Self {
        Self::new().with_file("data/csv/sales.csv", SALES_CSV)
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

impl DataFetcher for MemoryFetcher {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::not_found(path))
    }
}

/// Serves one file; the first fetch stays pending until the second fetch starts.
pub struct GatedFetcher {
    content: String,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    opener: Mutex<Option<oneshot::Sender<()>>>,
    fetches: AtomicUsize,
}

impl GatedFetcher {
    pub fn new(content: impl Into<String>) -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            content: content.into(),
            gate: Mutex::new(Some(rx)),
            opener: Mutex::new(Some(tx)),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl DataFetcher for GatedFetcher {
    async fn fetch_text(&self, _path: &str) -> Result<String, FetchError> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
        } else {
            let opener = self.opener.lock().take();
            if let Some(opener) = opener {
                let _ = opener.send(());
            }
        }
        Ok(self.content.clone())
    }
}

// ============================================================================
// Renderer
// ============================================================================

/// Chart instance built by [`RecordingRenderer`].
#[derive(Debug)]
pub struct RecordedChart {
    pub options: FunnelOptions,
    pub draws: Vec<DrawOptions>,
}

/// Renders a one-line placeholder and logs every call as `"<call> <container id>"`.
#[derive(Default)]
pub struct RecordingRenderer {
    events: Mutex<Vec<String>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|e| e.split(' ').next() == Some(call))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    type Instance = RecordedChart;

    fn create(&self, options: FunnelOptions) -> Result<RecordedChart, RenderError> {
        if options.data.labels.is_empty() {
            return Err(RenderError::EmptyData(options.container_id));
        }
        self.events
            .lock()
            .push(format!("create {}", options.container_id));
        Ok(RecordedChart {
            options,
            draws: Vec::new(),
        })
    }

    fn draw(
        &self,
        instance: &mut RecordedChart,
        mount: &mut dyn MountPoint,
        options: DrawOptions,
    ) -> Result<(), RenderError> {
        instance.draws.push(options);
        let id = &instance.options.container_id;
        self.events.lock().push(format!("draw {id}"));
        mount.set_content(format!(
            "<chart id=\"{id}\" direction=\"{}\" draw=\"{}\"/>",
            instance.options.direction.label(),
            instance.draws.len()
        ));
        Ok(())
    }

    fn teardown(&self, instance: &mut RecordedChart, mount: &mut dyn MountPoint) {
        self.events
            .lock()
            .push(format!("teardown {}", instance.options.container_id));
        mount.clear();
    }
}

// ============================================================================
// Wiring
// ============================================================================

pub type TestCoordinator<F> = Coordinator<F, RecordingRenderer>;

/// Coordinator with default settings over `fetcher` and a recording renderer.
pub fn coordinator<F: DataFetcher>(fetcher: F) -> TestCoordinator<F> {
    Coordinator::new(
        DataResolver::new(fetcher),
        ChartLifecycle::new(RecordingRenderer::default()),
    )
}

// ============================================================================
// TestDeckBuilder - Builder pattern for deck markup
// ============================================================================

/// Builder for reveal-style deck markup.
///
/// # Example
/// ```ignore
/// let deck = TestDeckBuilder::new()
///     .with_slide(&funnel("funnel-a", &[("data-data-source", "sales")]))
///     .with_stack(&["<p>one</p>", "<p>two</p>"])
///     .build();
/// ```
#[derive(Default)]
pub struct TestDeckBuilder {
    sections: Vec<String>,
}

impl TestDeckBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a horizontal slide with the given body.
    pub fn with_slide(mut self, body: &str) -> Self {
        self.sections.push(format!("<section>{body}</section>"));
        self
    }

    /// Add a vertical stack with one nested slide per body.
    pub fn with_stack(mut self, bodies: &[&str]) -> Self {
        let nested: String = bodies
            .iter()
            .map(|body| format!("<section>{body}</section>"))
            .collect();
        self.sections.push(format!("<section>{nested}</section>"));
        self
    }

    pub fn build_html(&self) -> String {
        format!(
            "<div class=\"reveal\"><div class=\"slides\">{}</div></div>",
            self.sections.concat()
        )
    }

    pub fn build(&self) -> Deck {
        Deck::from_html(self.build_html()).expect("test deck should parse")
    }
}

/// A container element with attributes.
pub fn funnel(id: &str, attributes: &[(&str, &str)]) -> String {
    funnel_with_comment(id, attributes, None)
}

/// A container element with attributes and an optional inline comment.
pub fn funnel_with_comment(id: &str, attributes: &[(&str, &str)], comment: Option<&str>) -> String {
    let attrs: String = attributes
        .iter()
        .map(|(name, value)| format!(" {name}=\"{value}\""))
        .collect();
    let comment = comment.map(|c| format!("<!--{c}-->")).unwrap_or_default();
    format!("<div id=\"{id}\"{attrs}>{comment}</div>")
}
