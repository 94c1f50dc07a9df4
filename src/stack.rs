//! Triangular stack of circles that is released under gravity.

use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::physics::{Body, BodySet, Bounds, PhysicsConfig};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriangleStack {
    /// Circles in the bottom row; each row above has one fewer.
    pub base_count: usize,
    pub radius: f32,
    /// Horizontal gap between neighbours in a row.
    pub gap: f32,
    /// Center height of the bottom row.
    pub base_y: f32,
    /// Initial horizontal speed is drawn from `±spread`.
    pub spread: f32,
    pub restitution: [f32; 2],
}

impl Default for TriangleStack {
    fn default() -> Self {
        Self {
            base_count: 12,
            radius: 0.18,
            gap: 0.06,
            base_y: -1.2,
            spread: 0.25,
            restitution: [0.58, 0.75],
        }
    }
}

impl TriangleStack {
    /// Circle centers, bottom row first, each row left to right.
    pub fn layout(&self) -> Vec<Vec<Vec2>> {
        let diameter = 2.0 * self.radius;
        let dx = diameter + self.gap;
        let dy = 0.5 * 3f32.sqrt() * diameter;

        (0..self.base_count)
            .map(|row| {
                let count = self.base_count - row;
                let y = self.base_y + row as f32 * dy;
                let x0 = -0.5 * (count - 1) as f32 * dx;
                (0..count).map(|j| Vec2::new(x0 + j as f32 * dx, y)).collect()
            })
            .collect()
    }

    /// Total number of circles, apex included.
    pub fn len(&self) -> usize {
        self.base_count * (self.base_count + 1) / 2
    }

    pub fn is_empty(&self) -> bool {
        self.base_count == 0
    }

    /// The single circle of the top row. It is held in place while the rest fall.
    pub fn apex(&self) -> Option<Vec2> {
        self.layout().last().and_then(|row| row.first().copied())
    }

    /// Every circle except the apex, with randomized kick and bounciness.
    pub fn spawn_bodies<R: Rng>(&self, rng: &mut R) -> Vec<Body> {
        let mut rows = self.layout();
        rows.pop();
        let [lo, hi] = self.restitution;

        rows.into_iter()
            .flatten()
            .map(|center| {
                let vx = if self.spread > 0.0 {
                    rng.random_range(-self.spread..self.spread)
                } else {
                    0.0
                };
                let restitution = if lo < hi { rng.random_range(lo..hi) } else { lo };
                Body::new(center, self.radius, restitution).with_velocity(Vec2::new(vx, 0.0))
            })
            .collect()
    }

    /// Spawns the falling bodies and hands them to a [`BodySet`] seeded with `seed`.
    pub fn body_set(&self, seed: u64, bounds: Bounds, config: PhysicsConfig) -> BodySet {
        let mut rng = StdRng::seed_from_u64(seed);
        let bodies = self.spawn_bodies(&mut rng);
        // separate stream for bounce jitter
        BodySet::new(bodies, bounds, config, seed.wrapping_add(1))
    }
}
