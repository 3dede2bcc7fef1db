//! Chart instances: the renderer capability, mount points, the SVG renderer and
//! the lifecycle manager that owns one instance per container.

mod lifecycle;
mod mount;
mod renderer;
mod svg;

pub use lifecycle::*;
pub use mount::*;
pub use renderer::*;
pub use svg::*;
