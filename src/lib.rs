//! Funnel charts for slide decks.
//!
//! Data comes from inline comment configuration, JSON files or CSV files and is
//! normalized into [`types::FunnelData`]. The [`deck::Coordinator`] reacts to
//! presentation events by resolving data for the funnel containers of the active
//! slide and driving one chart instance per container through [`chart::ChartLifecycle`].

pub mod chart;
pub mod constants;
pub mod data;
pub mod deck;
pub mod perf;
pub mod settings;
pub mod types;
