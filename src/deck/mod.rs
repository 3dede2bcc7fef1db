//! The presentation side: deck markup, the static deck model and the event coordinator.

mod coordinator;
mod error;
mod markup;
mod model;

pub use coordinator::*;
pub use error::*;
pub use markup::*;
pub use model::*;
