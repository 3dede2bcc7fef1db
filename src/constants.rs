//! Crate-wide constants.
//!
//! Centralizes breakpoints, default sizes and naming conventions so the
//! data layer, the lifecycle manager and the deck model agree on them.

// ============================================================================
// Containers
// ============================================================================

/// Id prefix marking an element as a funnel chart container
pub const CONTAINER_PREFIX: &str = "funnel-";

/// Data source id used when a container declares none
pub const DEFAULT_DATA_SOURCE: &str = "default";

/// Size used when neither a measured box nor explicit attributes are available
pub const DEFAULT_CHART_SIZE: (f64, f64) = (600.0, 400.0);

// ============================================================================
// Layout & Timing
// ============================================================================

/// Viewports at or below this width prefer vertical funnels
pub const VERTICAL_BREAKPOINT: f64 = 768.0;

/// Duration of the draw animation in milliseconds
pub const ANIMATION_DURATION_MS: u64 = 1000;

/// Timer threshold above which container processing is reported
pub const SLOW_CONTAINER_MS: f64 = 50.0;

// ============================================================================
// Data Files
// ============================================================================

/// Directory holding `<id>.json` files, relative to the data root
pub const JSON_DIR: &str = "data/json";

/// Directory holding `<id>.csv` files, relative to the data root
pub const CSV_DIR: &str = "data/csv";

// ============================================================================
// Colors
// ============================================================================

/// Palette cycled over stages when synthesizing colors
pub const STAGE_PALETTE: [&str; 4] = ["#016391", "#e24a38", "#feb929", "#d9bbf9"];

/// Saturation and lightness of randomly generated segment colors
pub const RANDOM_SATURATION: u8 = 70;
pub const RANDOM_LIGHTNESS: u8 = 60;
