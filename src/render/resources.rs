use bevy::prelude::*;

use crate::histogram::FrameTimeline;
use crate::physics::BodySet;

/// Largest step fed to the integrator; longer frames are clipped.
pub const MAX_STEP_SECS: f32 = 1.0 / 30.0;

#[derive(Resource)]
pub struct BounceRes {
    pub bodies: BodySet,
    /// Simulated seconds per wall-clock second.
    pub speed: f32,
}

impl BounceRes {
    pub fn new(bodies: BodySet) -> Self {
        Self { bodies, speed: 1.0 }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

#[derive(Resource)]
pub struct TimelineRes {
    pub timeline: FrameTimeline,
    pub elapsed: f32,
    /// Extra seconds on the last frame before starting over.
    pub pause_secs: f32,
}

impl TimelineRes {
    pub fn new(timeline: FrameTimeline) -> Self {
        Self {
            timeline,
            elapsed: 0.0,
            pause_secs: 1.0,
        }
    }

    /// Advances the clock, wrapping once the timeline and pause are over.
    pub fn tick(&mut self, dt: f32) -> f32 {
        let period = self.timeline.duration() + self.pause_secs;
        self.elapsed += dt;
        if period > 0.0 && self.elapsed >= period {
            self.elapsed %= period;
        }
        self.elapsed
    }
}
