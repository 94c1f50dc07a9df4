use psyviz::prelude::*;

fn rasch_ladder() -> ItemPool {
    // b = -3.0, -2.9, ..., 3.0
    ItemPool::new((0..=60).map(|i| ItemParams::rasch(-3.0 + 0.1 * i as f32)))
}

#[test]
fn session_homes_in_on_deterministic_examinee() {
    let true_theta = 1.0;
    let mut session = AdaptiveSession::new(rasch_ladder(), 0.0);
    let rounds = session.run(25, |item| item.params.difficulty < true_theta);

    assert_eq!(rounds.len(), 25);
    assert_eq!(session.pool().len(), 61 - 25);
    assert_eq!(session.responses().len(), 25);
    assert!((session.theta() - true_theta).abs() < 0.5, "theta = {}", session.theta());

    // first pick is the item at the starting estimate
    assert!(rounds[0].selected.item.params.difficulty.abs() < 1e-3);
    // every later pick targets the estimate of the round before
    for pair in rounds.windows(2) {
        let theta = pair[0].theta;
        let picked = pair[1].selected;
        assert!(
            session
                .pool()
                .items()
                .iter()
                .all(|left| item_information(theta, &left.params) <= picked.information + 1e-6)
        );
    }
}

#[test]
fn information_curve_samples() {
    let item = ItemParams::three_pl(1.5, 0.5, 0.2);
    let curve = sample_curve(|t| item_information(t, &item), THETA_BOUNDS, 161).unwrap();
    let peak = curve.iter().copied().fold(Vec2::new(0.0, f32::MIN), |a, b| if b.y > a.y { b } else { a });
    // guessing pushes the peak above the difficulty
    assert!(peak.x > 0.5 && peak.x < 1.5);
    assert!(curve.iter().all(|p| p.y >= 0.0));
}
