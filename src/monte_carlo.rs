//! Quarter-circle Monte Carlo estimate of pi, drawn in batches.

use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PiSample {
    pub point: Vec2,
    pub inside: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub samples: Vec<PiSample>,
    pub inside: usize,
    /// Running totals after this batch.
    pub total_inside: usize,
    pub total: usize,
    pub estimate: f32,
}

/// Points uniform on `[0, r]²`; the fraction under the quarter circle tends to `pi / 4`.
#[derive(Clone, Debug)]
pub struct PiEstimator {
    radius: f32,
    rng: StdRng,
    inside: usize,
    total: usize,
}

impl PiEstimator {
    pub fn new(radius: f32, seed: u64) -> Self {
        Self {
            radius,
            rng: StdRng::seed_from_u64(seed),
            inside: 0,
            total: 0,
        }
    }

    pub fn sample_batch(&mut self, count: usize) -> Batch {
        let r = self.radius;
        let samples: Vec<PiSample> = (0..count)
            .map(|_| {
                let point = Vec2::new(self.rng.random_range(0.0..=r), self.rng.random_range(0.0..=r));
                PiSample {
                    point,
                    inside: point.length_squared() <= r * r,
                }
            })
            .collect();

        let inside = samples.iter().filter(|s| s.inside).count();
        self.inside += inside;
        self.total += count;

        Batch {
            samples,
            inside,
            total_inside: self.inside,
            total: self.total,
            estimate: self.estimate(),
        }
    }

    /// `4 * inside / total`, with `total` floored at 1.
    pub fn estimate(&self) -> f32 {
        4.0 * self.inside as f32 / self.total.max(1) as f32
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn inside(&self) -> usize {
        self.inside
    }
}
