use bevy::prelude::*;

use super::PIXELS_PER_UNIT;
use super::components::{BarSprite, BodySprite};
use super::resources::{BounceRes, MAX_STEP_SECS, TimelineRes};
use crate::histogram::BarRect;

#[inline]
fn to_world(p: Vec2, z: f32) -> Vec3 {
    (p * PIXELS_PER_UNIT).extend(z)
}

fn bar_transform(rect: &BarRect) -> Transform {
    Transform {
        translation: to_world(rect.center, 0.0),
        scale: Vec3::new(rect.width * PIXELS_PER_UNIT, rect.height * PIXELS_PER_UNIT, 1.0),
        ..default()
    }
}

fn bar_color(rect: &BarRect) -> Color {
    rect.fill.with_a(rect.opacity).into()
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn spawn_bodies(
    mut commands: Commands,
    state: Res<BounceRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    // unit diameter, scaled per body
    let circle = meshes.add(Circle::new(0.5));
    let fill = materials.add(ColorMaterial::from(Color::from(crate::core::Color::BLUE)));

    for frame in state.bodies.snapshot() {
        commands.spawn((
            Mesh2d(circle.clone()),
            MeshMaterial2d(fill.clone()),
            Transform {
                translation: to_world(frame.center, 1.0),
                scale: Vec3::splat(2.0 * frame.radius * PIXELS_PER_UNIT),
                ..default()
            },
            BodySprite { index: frame.index },
        ));
    }
    info!(bodies = state.bodies.len(), "spawned bodies");
}

pub fn step_bodies(time: Res<Time>, mut state: ResMut<BounceRes>) {
    let dt = (time.delta_secs() * state.speed).min(MAX_STEP_SECS);
    if dt > 0.0 {
        state.bodies.step_all(dt);
    }
}

pub fn sync_bodies(state: Res<BounceRes>, mut sprites: Query<(&BodySprite, &mut Transform)>) {
    let bodies = state.bodies.bodies();
    for (sprite, mut transform) in &mut sprites {
        if let Some(body) = bodies.get(sprite.index) {
            transform.translation = to_world(body.position, transform.translation.z);
        }
    }
}

pub fn spawn_bars(
    mut commands: Commands,
    state: Res<TimelineRes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    for rect in state.timeline.sample(0.0) {
        // own material per bar so the color can follow the morph
        let material = materials.add(ColorMaterial::from(bar_color(&rect)));
        commands.spawn((
            Mesh2d(quad.clone()),
            MeshMaterial2d(material),
            bar_transform(&rect),
            BarSprite {
                bin_index: rect.bin_index,
            },
        ));
    }
    info!(
        frames = state.timeline.frames().len(),
        duration = state.timeline.duration(),
        "spawned histogram bars"
    );
}

pub fn animate_bars(
    time: Res<Time>,
    mut state: ResMut<TimelineRes>,
    mut bars: Query<(&BarSprite, &mut Transform, &MeshMaterial2d<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let t = state.tick(time.delta_secs());
    let rects = state.timeline.sample(t);
    for (sprite, mut transform, material) in &mut bars {
        let Some(rect) = rects.get(sprite.bin_index) else {
            continue;
        };
        *transform = bar_transform(rect);
        if let Some(mat) = materials.get_mut(&material.0) {
            mat.color = bar_color(rect);
        }
    }
}
