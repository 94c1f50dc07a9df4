//! Per-frame gravity and boundary reflection for independent circles.
//!
//! Bodies never interact with each other. The only randomness is the small
//! horizontal kick on a floor bounce, drawn from a caller-owned generator so a
//! fixed seed replays the same trajectories.

use bevy_math::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    /// Fraction of speed kept after hitting the floor or a wall.
    pub restitution: f32,
}

impl Body {
    pub fn new(position: Vec2, radius: f32, restitution: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius,
            restitution,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y - self.radius
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.position.x - self.radius
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.position.x + self.radius
    }
}

/// Floor and side walls. There is no ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub floor_y: f32,
    pub left_x: f32,
    pub right_x: f32,
}

impl Bounds {
    /// Walls inset by `margin` from a `width × height` frame centered on the origin.
    pub fn from_frame(width: f32, height: f32, margin: f32) -> Self {
        Self {
            floor_y: -0.5 * height + margin,
            left_x: -0.5 * width + margin,
            right_x: 0.5 * width - margin,
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::from_frame(128.0 / 9.0, 8.0, 0.1)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: f32,
    /// Horizontal velocity multiplier applied on every floor contact.
    pub floor_friction: f32,
    /// Half-width of the uniform horizontal kick added on a floor bounce.
    pub bounce_jitter: f32,
    /// Vertical speed under which a body on the floor is put to rest.
    pub rest_speed: f32,
    /// How close the bottom edge must be to the floor to count as resting.
    pub rest_tolerance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 5.2,
            floor_friction: 0.985,
            bounce_jitter: 0.5,
            rest_speed: 0.02,
            rest_tolerance: 1e-3,
        }
    }
}

/// Advance `body` by one explicit Euler step of `dt`.
///
/// Order: gravity, position, floor, left wall, right wall, rest snap. Floor and
/// wall corrections are independent, so a body in a corner gets both.
pub fn step<R: Rng>(body: &mut Body, bounds: &Bounds, config: &PhysicsConfig, dt: f32, rng: &mut R) {
    body.velocity.y -= config.gravity * dt;
    body.position += body.velocity * dt;

    if body.bottom() <= bounds.floor_y {
        body.position.y = bounds.floor_y + body.radius;
        if body.velocity.y < 0.0 {
            body.velocity.y = -body.velocity.y * body.restitution;
            if config.bounce_jitter > 0.0 {
                body.velocity.x += rng.random_range(-config.bounce_jitter..config.bounce_jitter);
            }
        }
        body.velocity.x *= config.floor_friction;
    }

    if body.left() <= bounds.left_x {
        body.position.x = bounds.left_x + body.radius;
        if body.velocity.x < 0.0 {
            body.velocity.x = -body.velocity.x * body.restitution;
        }
    }

    if body.right() >= bounds.right_x {
        body.position.x = bounds.right_x - body.radius;
        if body.velocity.x > 0.0 {
            body.velocity.x = -body.velocity.x * body.restitution;
        }
    }

    if body.velocity.y.abs() < config.rest_speed && (body.bottom() - bounds.floor_y).abs() < config.rest_tolerance {
        body.velocity.y = 0.0;
    }
}

/// Value-in, value-out form of [`step`].
pub fn advance<R: Rng>(mut body: Body, bounds: &Bounds, config: &PhysicsConfig, dt: f32, rng: &mut R) -> Body {
    step(&mut body, bounds, config, dt, rng);
    body
}

/// Where to draw one body this frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyFrame {
    pub index: usize,
    pub center: Vec2,
    pub radius: f32,
}

/// Bodies sharing one set of bounds, one config and one seeded generator.
#[derive(Clone, Debug)]
pub struct BodySet {
    bodies: Vec<Body>,
    bounds: Bounds,
    config: PhysicsConfig,
    rng: StdRng,
    elapsed: f32,
}

impl BodySet {
    pub fn new(bodies: Vec<Body>, bounds: Bounds, config: PhysicsConfig, seed: u64) -> Self {
        Self {
            bodies,
            bounds,
            config,
            rng: StdRng::seed_from_u64(seed),
            elapsed: 0.0,
        }
    }

    /// Steps every body in index order; call once per rendered frame.
    pub fn step_all(&mut self, dt: f32) {
        for body in &mut self.bodies {
            step(body, &self.bounds, &self.config, dt, &mut self.rng);
        }
        self.elapsed += dt;
    }

    pub fn snapshot(&self) -> Vec<BodyFrame> {
        self.bodies
            .iter()
            .enumerate()
            .map(|(index, b)| BodyFrame {
                index,
                center: b.position,
                radius: b.radius,
            })
            .collect()
    }

    #[inline]
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    #[inline]
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Simulated seconds since creation.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_fall_follows_euler_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Bounds::default();
        let config = PhysicsConfig::default();
        let body = Body::new(Vec2::new(0.0, 2.0), 0.18, 0.65).with_velocity(Vec2::new(1.0, 0.0));

        let next = advance(body, &bounds, &config, 0.1, &mut rng);
        // velocity is updated before position
        assert!((next.velocity.y + 0.52).abs() < 1e-6);
        assert!((next.position.y - (2.0 - 0.052)).abs() < 1e-6);
        assert!((next.position.x - 0.1).abs() < 1e-6);
        assert_eq!(next.velocity.x, 1.0);
    }

    #[test]
    fn walls_reflect_with_restitution_and_no_jitter() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Bounds { floor_y: -100.0, left_x: -1.0, right_x: 1.0 };
        let config = PhysicsConfig { gravity: 0.0, ..PhysicsConfig::default() };

        let mut left = Body::new(Vec2::new(-0.85, 0.0), 0.1, 0.5).with_velocity(Vec2::new(-2.0, 0.0));
        step(&mut left, &bounds, &config, 0.1, &mut rng);
        assert!((left.position.x + 0.9).abs() < 1e-6);
        assert!((left.velocity.x - 1.0).abs() < 1e-6);

        let mut right = Body::new(Vec2::new(0.85, 0.0), 0.1, 0.5).with_velocity(Vec2::new(2.0, 0.0));
        step(&mut right, &bounds, &config, 0.1, &mut rng);
        assert!((right.position.x - 0.9).abs() < 1e-6);
        assert!((right.velocity.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn floor_friction_applies_without_bounce() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Bounds { floor_y: 0.0, left_x: -10.0, right_x: 10.0 };
        let config = PhysicsConfig { gravity: 0.0, ..PhysicsConfig::default() };
        // moving up while touching the floor: clamped, no reflection, still damped
        let mut body = Body::new(Vec2::new(0.0, 0.05), 0.1, 0.5).with_velocity(Vec2::new(1.0, 0.1));
        step(&mut body, &bounds, &config, 0.01, &mut rng);
        assert!((body.position.y - 0.1).abs() < 1e-6);
        assert!((body.velocity.y - 0.1).abs() < 1e-6);
        assert!((body.velocity.x - 0.985).abs() < 1e-6);
    }

    #[test]
    fn slow_body_on_floor_comes_to_rest() {
        let mut rng = StdRng::seed_from_u64(1);
        let bounds = Bounds { floor_y: 0.0, left_x: -10.0, right_x: 10.0 };
        let config = PhysicsConfig::default();
        let mut body = Body::new(Vec2::new(0.0, 0.1), 0.1, 0.1);
        step(&mut body, &bounds, &config, 0.01, &mut rng);
        // reflected speed 0.052 * 0.1 falls under the rest threshold
        assert_eq!(body.velocity.y, 0.0);
        assert!((body.bottom() - bounds.floor_y).abs() < 1e-6);
    }
}
