//! Funnel data pipeline
//!
//! Everything between a container's declared source and canonical
//! [`FunnelData`](crate::types::FunnelData):
//!
//! - parsers for CSV files, fetched JSON files and inline comment configurations
//! - named value formatters referenced from inline configurations
//! - color synthesis for sources without colors
//! - the fetcher abstraction and a filesystem implementation
//! - the per-identifier cache and the resolver that ties them together
//!
//! ## Error Handling
//!
//! Parsing and fetching return `DataResult<T>` / `FetchError`. The resolver never
//! propagates them: a failed source is logged and the next one is tried.

mod cache;
mod colors;
mod csv_parser;
mod error;
mod fallback;
mod fetch;
mod formatters;
mod inline_config;
mod json_parser;
mod resolver;

pub use cache::*;
pub use colors::*;
pub use csv_parser::*;
pub use error::*;
pub use fallback::*;
pub use fetch::*;
pub use formatters::*;
pub use inline_config::*;
pub use json_parser::*;
pub use resolver::*;
