pub mod components;
pub mod resources;
pub mod systems;

pub use resources::*;
use systems::*;

use bevy::prelude::*;

/// Scene units to world pixels.
pub const PIXELS_PER_UNIT: f32 = 80.0;

/// Steps a [`BounceRes`] every frame and draws one circle per body.
#[derive(Default)]
pub struct BouncePreviewPlugin;

impl Plugin for BouncePreviewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_bodies))
            .add_systems(Update, (step_bodies, sync_bodies).chain());
    }
}

/// Plays a [`TimelineRes`] in a loop, one quad per bin.
#[derive(Default)]
pub struct HistogramPreviewPlugin;

impl Plugin for HistogramPreviewPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera, spawn_bars))
            .add_systems(Update, animate_bars);
    }
}
