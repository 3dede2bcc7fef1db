//! Color synthesis for funnel data that arrives without colors.
//!
//! Two policies are supported: a fixed palette cycled over stages, and random
//! hues at fixed saturation/lightness (optionally seeded for reproducible output).

use crate::constants::{RANDOM_LIGHTNESS, RANDOM_SATURATION, STAGE_PALETTE};
use crate::types::FunnelData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How colors are generated when a data source provides none.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorPolicy {
    /// Cycle the fixed stage palette
    #[default]
    Palette,
    /// Uniform random hue per segment; seeded when `seed` is set
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl ColorPolicy {
    /// Produce `stages` color vectors of `segments` entries each.
    pub fn generate(&self, stages: usize, segments: usize) -> Vec<Vec<String>> {
        match self {
            ColorPolicy::Palette => palette_colors(stages, segments),
            ColorPolicy::Random { seed: Some(seed) } => {
                random_colors(&mut StdRng::seed_from_u64(*seed), stages, segments)
            }
            ColorPolicy::Random { seed: None } => {
                random_colors(&mut rand::thread_rng(), stages, segments)
            }
        }
    }

    /// Fill in colors when `data` has none.
    pub fn ensure_colors(&self, data: &mut FunnelData) {
        if !data.has_colors() {
            data.colors = Some(self.generate(data.stage_count(), data.segment_count()));
        }
    }
}

/// Stage `i`, segment `j` gets `palette[(i + j) % len]`.
fn palette_colors(stages: usize, segments: usize) -> Vec<Vec<String>> {
    (0..stages)
        .map(|stage| {
            (0..segments)
                .map(|segment| STAGE_PALETTE[(stage + segment) % STAGE_PALETTE.len()].to_string())
                .collect()
        })
        .collect()
}

fn random_colors<R: Rng>(rng: &mut R, stages: usize, segments: usize) -> Vec<Vec<String>> {
    (0..stages)
        .map(|_| {
            (0..segments)
                .map(|_| {
                    let hue: f64 = rng.gen_range(0.0..360.0);
                    format!("hsl({hue:.1}, {RANDOM_SATURATION}%, {RANDOM_LIGHTNESS}%)")
                })
                .collect()
        })
        .collect()
}
