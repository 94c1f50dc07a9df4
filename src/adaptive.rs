//! Adaptive testing with maximum Fisher information item selection.
//!
//! Each round picks the remaining item that is most informative at the current
//! ability estimate, removes it from the pool, records the response and
//! re-estimates ability by maximum likelihood.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::curves::{ItemParams, icc, item_information};

/// Ability estimates are kept inside this interval.
pub const THETA_BOUNDS: [f32; 2] = [-4.0, 4.0];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolItem {
    pub id: usize,
    pub params: ItemParams,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Selected {
    pub item: PoolItem,
    /// Information of the item at the ability it was selected for.
    pub information: f32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ItemPool {
    items: Vec<PoolItem>,
}

impl ItemPool {
    /// Items get ids in iteration order.
    pub fn new(items: impl IntoIterator<Item = ItemParams>) -> Self {
        Self {
            items: items
                .into_iter()
                .enumerate()
                .map(|(id, params)| PoolItem { id, params })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[PoolItem] {
        &self.items
    }

    /// Most informative remaining item at `theta` without removing it.
    /// Ties go to the lowest id.
    pub fn peek_best(&self, theta: f32) -> Option<Selected> {
        let mut best: Option<Selected> = None;
        for item in &self.items {
            let information = item_information(theta, &item.params);
            if best.is_none_or(|b| information > b.information) {
                best = Some(Selected { item: *item, information });
            }
        }
        best
    }

    /// Like [`peek_best`](Self::peek_best) but takes the item out of the pool.
    pub fn select_next(&mut self, theta: f32) -> Option<Selected> {
        let selected = self.peek_best(theta)?;
        self.items.retain(|i| i.id != selected.item.id);
        debug!(
            item = selected.item.id,
            theta,
            information = selected.information,
            remaining = self.items.len(),
            "selected item"
        );
        Some(selected)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub item: ItemParams,
    pub correct: bool,
}

/// Maximum likelihood ability via Fisher scoring, clamped to `bounds`.
///
/// All-correct or all-wrong patterns have no interior maximum and end up on
/// the corresponding bound.
pub fn estimate_theta(responses: &[Response], start: f32, bounds: [f32; 2], iterations: usize) -> f32 {
    let [lo, hi] = bounds;
    let mut theta = start.clamp(lo, hi);

    for _ in 0..iterations {
        let mut score = 0.0f32;
        let mut information = 0.0f32;
        for r in responses {
            let p = icc(theta, &r.item);
            let c = r.item.guessing;
            if p <= 0.0 || p >= 1.0 {
                continue;
            }
            let u = if r.correct { 1.0 } else { 0.0 };
            score += r.item.discrimination * (p - c) * (u - p) / (p * (1.0 - c));
            information += item_information(theta, &r.item);
        }
        if information <= f32::EPSILON {
            break;
        }

        let next = (theta + score / information).clamp(lo, hi);
        let delta = (next - theta).abs();
        theta = next;
        if delta < 1e-5 {
            break;
        }
    }
    theta
}

/// One answered round of an [`AdaptiveSession`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub selected: Selected,
    pub correct: bool,
    /// Ability estimate after this response.
    pub theta: f32,
}

#[derive(Clone, Debug)]
pub struct AdaptiveSession {
    pool: ItemPool,
    theta: f32,
    responses: Vec<Response>,
}

impl AdaptiveSession {
    pub fn new(pool: ItemPool, initial_theta: f32) -> Self {
        Self {
            pool,
            theta: initial_theta,
            responses: vec![],
        }
    }

    #[inline]
    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn pool(&self) -> &ItemPool {
        &self.pool
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    /// Select, ask `answer`, record and re-estimate. `None` once the pool is empty.
    pub fn round<F>(&mut self, answer: F) -> Option<Round>
    where
        F: FnOnce(&PoolItem) -> bool,
    {
        let selected = self.pool.select_next(self.theta)?;
        let correct = answer(&selected.item);
        self.responses.push(Response {
            item: selected.item.params,
            correct,
        });
        self.theta = estimate_theta(&self.responses, self.theta, THETA_BOUNDS, 50);
        debug!(item = selected.item.id, correct, theta = self.theta, "recorded response");
        Some(Round {
            selected,
            correct,
            theta: self.theta,
        })
    }

    /// Up to `rounds` rounds, stopping early when the pool runs out.
    pub fn run<F>(&mut self, rounds: usize, mut answer: F) -> Vec<Round>
    where
        F: FnMut(&PoolItem) -> bool,
    {
        (0..rounds).map_while(|_| self.round(&mut answer)).collect()
    }
}
