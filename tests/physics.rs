use psyviz::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DT: f32 = 1.0 / 600.0;

#[test]
fn resting_body_bounces_back_onto_floor() {
    let bounds = Bounds::default();
    let config = PhysicsConfig::default();
    let mut rng = StdRng::seed_from_u64(42);
    let mut body = Body::new(Vec2::new(0.0, bounds.floor_y + 0.18), 0.18, 0.65);

    step(&mut body, &bounds, &config, 0.01, &mut rng);

    assert_eq!(body.position.y, bounds.floor_y + 0.18);
    let expected = config.gravity * 0.01 * 0.65;
    assert!((body.velocity.y - expected).abs() < 1e-6);
    assert!(body.velocity.y > config.rest_speed);
    // jitter is bounded and then damped by friction
    assert!(body.velocity.x.abs() <= config.bounce_jitter * config.floor_friction);
}

#[test]
fn bounce_apexes_strictly_decrease() {
    let bounds = Bounds::default();
    let config = PhysicsConfig::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut body = Body::new(Vec2::new(0.0, 2.0), 0.18, 0.65);

    let mut apexes = vec![body.position.y];
    let mut prev_vy = body.velocity.y;
    for _ in 0..20_000 {
        step(&mut body, &bounds, &config, DT, &mut rng);
        if prev_vy > 0.0 && body.velocity.y <= 0.0 {
            apexes.push(body.position.y);
        }
        prev_vy = body.velocity.y;
        if apexes.len() == 5 {
            break;
        }
    }

    assert_eq!(apexes.len(), 5, "expected four rebounds, got {apexes:?}");
    for pair in apexes.windows(2) {
        assert!(pair[1] < pair[0], "apex heights not decreasing: {apexes:?}");
    }
}

#[test]
fn vertical_motion_ignores_jitter_seed() {
    let bounds = Bounds::default();
    let config = PhysicsConfig::default();
    let start = Body::new(Vec2::new(0.0, 1.0), 0.18, 0.7);

    let mut a = start;
    let mut b = start;
    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(2);
    for _ in 0..3_000 {
        step(&mut a, &bounds, &config, DT, &mut rng_a);
        step(&mut b, &bounds, &config, DT, &mut rng_b);
        assert_eq!(a.position.y, b.position.y);
        assert_eq!(a.velocity.y, b.velocity.y);
    }
}

#[test]
fn bodies_stay_inside_bounds() {
    let bounds = Bounds { floor_y: -2.0, left_x: -1.5, right_x: 1.5 };
    let config = PhysicsConfig::default();
    let mut rng = StdRng::seed_from_u64(9);

    let bodies: Vec<Body> = (0..40)
        .map(|_| {
            let r = rng.random_range(0.05..0.3);
            Body::new(Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..3.0)), r, 0.9)
                .with_velocity(Vec2::new(rng.random_range(-30.0..30.0), rng.random_range(-30.0..30.0)))
        })
        .collect();
    let mut set = BodySet::new(bodies, bounds, config, 9);

    for _ in 0..1_200 {
        set.step_all(1.0 / 60.0);
        for b in set.bodies() {
            assert!(b.left() >= bounds.left_x - 1e-4, "{b:?} left of wall");
            assert!(b.right() <= bounds.right_x + 1e-4, "{b:?} right of wall");
            assert!(b.bottom() >= bounds.floor_y - 1e-4, "{b:?} below floor");
        }
    }
    assert!((set.elapsed() - 20.0).abs() < 1e-2);
}

#[test]
fn corner_contact_gets_both_corrections() {
    let bounds = Bounds { floor_y: 0.0, left_x: 0.0, right_x: 10.0 };
    let config = PhysicsConfig { bounce_jitter: 0.0, ..PhysicsConfig::default() };
    let mut rng = StdRng::seed_from_u64(0);
    let mut body = Body::new(Vec2::new(0.11, 0.11), 0.1, 0.5).with_velocity(Vec2::new(-2.0, -2.0));

    step(&mut body, &bounds, &config, 0.01, &mut rng);

    assert_eq!(body.position, Vec2::new(0.1, 0.1));
    assert!(body.velocity.y > 0.0);
    // friction first, then wall reflection
    assert!((body.velocity.x - 2.0 * 0.985 * 0.5).abs() < 1e-6);
}

#[test]
fn same_seed_same_trajectories() {
    let stack = TriangleStack::default();
    let mut a = stack.body_set(7, Bounds::default(), PhysicsConfig::default());
    let mut b = stack.body_set(7, Bounds::default(), PhysicsConfig::default());
    for _ in 0..600 {
        a.step_all(1.0 / 60.0);
        b.step_all(1.0 / 60.0);
    }
    assert_eq!(a.snapshot(), b.snapshot());
    assert_eq!(a.len(), 77);
}
