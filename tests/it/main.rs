//! Single test binary entry point.
//!
//! This consolidates all tests into a single binary, reducing linking overhead.
//!
//! Structure:
//! - helpers: Fetchers, a recording renderer and deck builders shared by all tests
//! - integration: Coordinator and deck workflows end-to-end
//! - unit: Single-component unit tests

mod helpers;
mod unit;
