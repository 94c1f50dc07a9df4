//! Domain-to-scene coordinate mapping.

use bevy_math::Vec2;
use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::{Result, SceneError};

/// Maps domain coordinates onto a drawing surface.
///
/// Implemented by [`Axes`] and by any closure `Fn(f32, f32) -> (f32, f32)`, so
/// a render loop can hand in whatever mapping it uses for the current frame.
pub trait CoordinateMap {
    fn coordinate_to_pixel(&self, x: f32, y: f32) -> (f32, f32);

    #[inline]
    fn c2p(&self, x: f32, y: f32) -> Vec2 {
        let (px, py) = self.coordinate_to_pixel(x, y);
        Vec2::new(px, py)
    }
}

impl<F> CoordinateMap for F
where
    F: Fn(f32, f32) -> (f32, f32),
{
    #[inline]
    fn coordinate_to_pixel(&self, x: f32, y: f32) -> (f32, f32) {
        self(x, y)
    }
}

/// A linear x/y frame of `x_length × y_length` scene units centered on `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
    pub x_length: f32,
    pub y_length: f32,
    pub center: Vec2,
}

impl Axes {
    pub fn new(x_range: [f32; 2], y_range: [f32; 2], x_length: f32, y_length: f32) -> Result<Self> {
        check_range("x", x_range)?;
        check_range("y", y_range)?;
        for (name, len) in [("x_length", x_length), ("y_length", y_length)] {
            if !len.is_finite() || len <= 0.0 {
                return Err(Report::new(SceneError::Configuration)
                    .attach(format!("{name} must be positive and finite, got {len}")));
            }
        }
        Ok(Self {
            x_range,
            y_range,
            x_length,
            y_length,
            center: Vec2::ZERO,
        })
    }

    /// Frame used by the theta / z density scenes: [-4, 4] × [0, 0.4] on a 10 × 5 box.
    pub fn default_density() -> Self {
        Self {
            x_range: [-4.0, 4.0],
            y_range: [0.0, 0.4],
            x_length: 10.0,
            y_length: 5.0,
            center: Vec2::ZERO,
        }
    }

    pub fn centered_at(mut self, center: Vec2) -> Self {
        self.center = center;
        self
    }

    /// Top of the visible y range, used as the histogram ceiling.
    #[inline]
    pub fn y_max(&self) -> f32 {
        self.y_range[1]
    }

    /// Scene units per domain unit along x.
    #[inline]
    pub fn x_unit(&self) -> f32 {
        self.x_length / (self.x_range[1] - self.x_range[0])
    }

    /// Scene units per domain unit along y.
    #[inline]
    pub fn y_unit(&self) -> f32 {
        self.y_length / (self.y_range[1] - self.y_range[0])
    }

    /// Inverse of [`CoordinateMap::c2p`].
    pub fn p2c(&self, point: Vec2) -> Vec2 {
        let local = point - self.center;
        Vec2::new(
            self.x_range[0] + (local.x / self.x_length + 0.5) * (self.x_range[1] - self.x_range[0]),
            self.y_range[0] + (local.y / self.y_length + 0.5) * (self.y_range[1] - self.y_range[0]),
        )
    }
}

impl CoordinateMap for Axes {
    fn coordinate_to_pixel(&self, x: f32, y: f32) -> (f32, f32) {
        let tx = (x - self.x_range[0]) / (self.x_range[1] - self.x_range[0]);
        let ty = (y - self.y_range[0]) / (self.y_range[1] - self.y_range[0]);
        (
            self.center.x + (tx - 0.5) * self.x_length,
            self.center.y + (ty - 0.5) * self.y_length,
        )
    }
}

fn check_range(axis: &str, range: [f32; 2]) -> Result<()> {
    let [lo, hi] = range;
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(Report::new(SceneError::Configuration)
            .attach(format!("{axis} range must be finite and increasing, got [{lo}, {hi}]")));
    }
    Ok(())
}
