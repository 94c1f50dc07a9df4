//! Item response curves and the other closed-form functions the scenes plot.

use bevy_math::Vec2;
use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::{Result, SceneError};

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[inline]
pub fn normal_pdf(x: f32, mu: f32, sigma: f32) -> f32 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp() / (sigma * (2.0 * std::f32::consts::PI).sqrt())
}

/// Parameters of a 1PL / 2PL / 3PL logistic item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemParams {
    /// `b`
    pub difficulty: f32,
    /// `a`
    pub discrimination: f32,
    /// `c`, the lower asymptote
    pub guessing: f32,
}

impl ItemParams {
    pub const fn rasch(difficulty: f32) -> Self {
        Self {
            difficulty,
            discrimination: 1.0,
            guessing: 0.0,
        }
    }

    pub const fn two_pl(discrimination: f32, difficulty: f32) -> Self {
        Self {
            difficulty,
            discrimination,
            guessing: 0.0,
        }
    }

    pub const fn three_pl(discrimination: f32, difficulty: f32, guessing: f32) -> Self {
        Self {
            difficulty,
            discrimination,
            guessing,
        }
    }
}

/// Probability of a correct response: `c + (1 - c) σ(a (θ - b))`.
#[inline]
pub fn icc(theta: f32, item: &ItemParams) -> f32 {
    let p = sigmoid(item.discrimination * (theta - item.difficulty));
    item.guessing + (1.0 - item.guessing) * p
}

/// Fisher information of `item` at `theta`.
///
/// For a Rasch item this is `p (1 - p)`.
pub fn item_information(theta: f32, item: &ItemParams) -> f32 {
    let p = icc(theta, item);
    let c = item.guessing;
    if p <= 0.0 || p >= 1.0 || c >= 1.0 {
        return 0.0;
    }
    let a = item.discrimination;
    let ratio = (p - c) / (1.0 - c);
    a * a * ((1.0 - p) / p) * ratio * ratio
}

/// `n` evenly spaced points of `f` over `[x0, x1]`, endpoints included.
pub fn sample_curve<F>(f: F, range: [f32; 2], n: usize) -> Result<Vec<Vec2>>
where
    F: Fn(f32) -> f32,
{
    let [x0, x1] = range;
    if n < 2 {
        return Err(Report::new(SceneError::Configuration).attach(format!("need at least 2 curve samples, got {n}")));
    }
    if !x0.is_finite() || !x1.is_finite() || x0 >= x1 {
        return Err(Report::new(SceneError::Configuration)
            .attach(format!("curve range must be finite and increasing, got [{x0}, {x1}]")));
    }

    let step = (x1 - x0) / (n - 1) as f32;
    Ok((0..n)
        .map(|i| {
            let x = if i == n - 1 { x1 } else { x0 + i as f32 * step };
            Vec2::new(x, f(x))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigmoid_is_centered() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(3.0) + sigmoid(-3.0), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn icc_passes_through_midpoint_at_difficulty() {
        let item = ItemParams::two_pl(1.7, 0.5);
        assert_relative_eq!(icc(0.5, &item), 0.5);

        let guess = ItemParams::three_pl(1.0, 0.0, 0.2);
        assert_relative_eq!(icc(0.0, &guess), 0.6, epsilon = 1e-6);
        assert!(icc(-20.0, &guess) >= 0.2);
    }

    #[test]
    fn rasch_information_is_p_one_minus_p() {
        let item = ItemParams::rasch(-0.3);
        for theta in [-2.0, -0.3, 0.0, 1.5] {
            let p = icc(theta, &item);
            assert_relative_eq!(item_information(theta, &item), p * (1.0 - p), epsilon = 1e-6);
        }
        assert_relative_eq!(item_information(-0.3, &item), 0.25);
    }

    #[test]
    fn information_peaks_near_difficulty() {
        let item = ItemParams::two_pl(2.0, 1.0);
        let at_b = item_information(1.0, &item);
        assert!(at_b > item_information(0.0, &item));
        assert!(at_b > item_information(2.0, &item));
        assert_relative_eq!(at_b, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn normal_pdf_peak() {
        assert_relative_eq!(normal_pdf(0.0, 0.0, 1.0), 0.398_942_3, epsilon = 1e-6);
    }

    #[test]
    fn sample_curve_hits_endpoints() {
        let pts = sample_curve(sigmoid, [-10.0, 10.0], 201).unwrap();
        assert_eq!(pts.len(), 201);
        assert_eq!(pts[0].x, -10.0);
        assert_eq!(pts[200].x, 10.0);
        assert!(pts.windows(2).all(|w| w[0].y <= w[1].y));

        assert!(sample_curve(sigmoid, [0.0, 1.0], 1).is_err());
        assert!(sample_curve(sigmoid, [1.0, 0.0], 10).is_err());
    }
}
