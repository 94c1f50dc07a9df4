use bevy::prelude::*;

use crate::histogram::FrameTimeline;
use crate::physics::BodySet;
use crate::render::{BouncePreviewPlugin, BounceRes, HistogramPreviewPlugin, TimelineRes};

fn window_plugin(title: &str) -> WindowPlugin {
    WindowPlugin {
        primary_window: Some(Window {
            title: title.to_string(),
            ..default()
        }),
        ..default()
    }
}

/// Opens a window and lets `bodies` fall in real time. Blocks until it is closed.
pub fn run_bounce_preview(bodies: BodySet, speed: f32) {
    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(BounceRes::new(bodies).with_speed(speed))
        .add_plugins((DefaultPlugins.set(window_plugin("psyviz: bounce")), BouncePreviewPlugin))
        .run();
}

/// Loops `timeline` in a window. Blocks until it is closed.
pub fn run_histogram_preview(timeline: FrameTimeline) {
    App::new()
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(TimelineRes::new(timeline))
        .add_plugins((
            DefaultPlugins.set(window_plugin("psyviz: histogram")),
            HistogramPreviewPlugin,
        ))
        .run();
}
