//! Unit tests for funnel-deck.

mod fetch_tests;
mod settings_tests;
