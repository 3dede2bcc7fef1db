//! Timing instrumentation.
//!
//! `ScopedTimer` measures a block RAII-style and reports it through `tracing`:
//! `warn!` when it exceeds its threshold, `trace!` otherwise.
//!
//! ```ignore
//! use funnel_deck::profile_scope;
//!
//! fn draw() {
//!     profile_scope!("svg_draw");  // compiled out without the `profiling` feature
//!     // ... work ...
//! }
//! ```

use std::time::Instant;
use tracing::{trace, warn};

/// Default threshold for [`profile_scope!`] timers, in milliseconds
pub const PROFILE_THRESHOLD_MS: f64 = 16.0;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $crate::perf::PROFILE_THRESHOLD_MS);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
}

/// Times the enclosing scope and logs on drop.
pub struct ScopedTimer {
    name: String,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    pub fn new(name: impl Into<String>, threshold_ms: f64) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Milliseconds since the timer started
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed_ms();
        if elapsed > self.threshold_ms {
            warn!("{} took {:.2}ms (threshold {:.2}ms)", self.name, elapsed, self.threshold_ms);
        } else {
            trace!("{} took {:.2}ms", self.name, elapsed);
        }
    }
}
