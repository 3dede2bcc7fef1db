//! Mount points: the part of a container that holds rendered chart markup.

use crate::types::Size;

/// A container's rendered content, as seen by renderers and the lifecycle manager.
pub trait MountPoint {
    /// Element id of the container
    fn id(&self) -> &str;

    /// Rendered box of the container; [`Size::ZERO`] when nothing was laid out
    fn measured_size(&self) -> Size;

    /// Current rendered markup
    fn content(&self) -> &str;

    /// Replace the rendered markup
    fn set_content(&mut self, markup: String);

    /// Remove all rendered markup
    fn clear(&mut self) {
        self.set_content(String::new());
    }

    fn is_empty(&self) -> bool {
        self.content().is_empty()
    }
}

/// A mount point backed by a string buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HtmlMount {
    id: String,
    measured: Size,
    content: String,
}

impl HtmlMount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            measured: Size::ZERO,
            content: String::new(),
        }
    }

    pub fn with_measured_size(mut self, size: Size) -> Self {
        self.measured = size;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

impl MountPoint for HtmlMount {
    fn id(&self) -> &str {
        &self.id
    }

    fn measured_size(&self) -> Size {
        self.measured
    }

    fn content(&self) -> &str {
        &self.content
    }

    fn set_content(&mut self, markup: String) {
        self.content = markup;
    }
}
