//! Density histograms with a fixed bar layout.
//!
//! Every call against the same [`BinEdges`] yields the same number of bars in
//! the same order, empty bins included, so consecutive frames can be morphed
//! bar-by-bar instead of inserting or removing shapes.

use bevy_math::Vec2;
use error_stack::Report;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::axes::{Axes, CoordinateMap};
use crate::core::{BarStyle, Color};
use crate::{Result, SceneError};

/// Largest bin count [`BinEdges::uniform`] accepts.
pub const MAX_BINS: usize = 10_000;

/// Strictly increasing bin edges; `len() + 1` edges bound `len()` bins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    edges: Vec<f32>,
}

impl BinEdges {
    /// Bins of `width` tiling `[lower, upper]`, at most [`MAX_BINS`] of them.
    pub fn uniform(lower: f32, upper: f32, width: f32) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || !width.is_finite() {
            return Err(Report::new(SceneError::Configuration)
                .attach(format!("bin bounds must be finite: lower={lower}, upper={upper}, width={width}")));
        }
        if width <= 0.0 || upper <= lower {
            return Err(Report::new(SceneError::Configuration)
                .attach(format!("empty bin domain: lower={lower}, upper={upper}, width={width}")));
        }

        let span = f64::from(upper) - f64::from(lower);
        let bins = span / f64::from(width);
        let count = bins.round();
        if count > MAX_BINS as f64 {
            return Err(Report::new(SceneError::Configuration).attach(format!(
                "width {width} over [{lower}, {upper}] gives {count} bins, limit is {MAX_BINS}"
            )));
        }
        if count < 1.0 || (bins - count).abs() > 1e-4 {
            return Err(Report::new(SceneError::Configuration).attach(format!(
                "width {width} does not tile [{lower}, {upper}] ({bins:.6} bins)"
            )));
        }

        let edges = (0..=count as usize)
            .map(|i| (f64::from(lower) + span * i as f64 / count) as f32)
            .collect();
        Ok(Self { edges })
    }

    /// Arbitrary edges; widths may differ per bin.
    pub fn from_edges(edges: Vec<f32>) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Report::new(SceneError::Configuration)
                .attach(format!("need at least 2 bin edges, got {}", edges.len())));
        }
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(Report::new(SceneError::Configuration).attach(format!("non-finite bin edge {bad}")));
        }
        if let Some(i) = edges.windows(2).position(|w| w[0] >= w[1]) {
            return Err(Report::new(SceneError::Configuration).attach(format!(
                "bin edges must be strictly increasing: edges[{i}]={} >= edges[{}]={}",
                edges[i],
                i + 1,
                edges[i + 1]
            )));
        }
        Ok(Self { edges })
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    #[inline]
    pub fn lower(&self) -> f32 {
        self.edges[0]
    }

    #[inline]
    pub fn upper(&self) -> f32 {
        self.edges[self.edges.len() - 1]
    }

    #[inline]
    pub fn width(&self, bin: usize) -> f32 {
        self.edges[bin + 1] - self.edges[bin]
    }

    #[inline]
    pub fn center(&self, bin: usize) -> f32 {
        0.5 * (self.edges[bin] + self.edges[bin + 1])
    }

    /// Bin holding `x`. Bins are half-open `[a, b)` except the last, which
    /// also takes its upper edge. Values outside the domain map to `None`.
    pub fn bin_of(&self, x: f32) -> Option<usize> {
        if !(x >= self.lower() && x <= self.upper()) {
            return None;
        }
        if x == self.upper() {
            return Some(self.len() - 1);
        }
        Some(self.edges.partition_point(|&e| e <= x) - 1)
    }
}

/// Probability density per bin: `count / (in_domain_total * bin_width)`.
///
/// Samples outside the edge domain are ignored, so the bar areas always sum to 1.
pub fn density(samples: &[f32], edges: &BinEdges) -> Result<Vec<f32>> {
    if samples.is_empty() {
        return Err(Report::new(SceneError::InvalidInput).attach("density is undefined for zero samples"));
    }
    if let Some(i) = samples.iter().position(|s| !s.is_finite()) {
        return Err(Report::new(SceneError::InvalidInput)
            .attach(format!("sample {i} is not finite: {}", samples[i])));
    }

    let mut counts = vec![0usize; edges.len()];
    let mut total = 0usize;
    for &s in samples {
        if let Some(bin) = edges.bin_of(s) {
            counts[bin] += 1;
            total += 1;
        }
    }

    if total == 0 {
        return Err(Report::new(SceneError::InvalidInput).attach(format!(
            "none of {} samples fall inside [{}, {}]",
            samples.len(),
            edges.lower(),
            edges.upper()
        )));
    }

    Ok(counts
        .iter()
        .enumerate()
        .map(|(i, &c)| c as f32 / (total as f32 * edges.width(i)))
        .collect())
}

/// One bar per bin, in domain units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub bin_index: usize,
    pub center_x: f32,
    pub width: f32,
    /// Density after any ceiling rescale; zero for empty bins.
    pub height: f32,
    pub is_empty: bool,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl BarGeometry {
    /// Scene-space rectangle standing on the `y = 0` baseline of `map`.
    pub fn project<M: CoordinateMap + ?Sized>(&self, map: &M, style: &BarStyle) -> BarRect {
        let half = 0.5 * self.width;
        let left = map.c2p(self.center_x - half, 0.0);
        let right = map.c2p(self.center_x + half, 0.0);
        let base = map.c2p(self.center_x, 0.0);

        // +1 when the mapped y axis grows upward, -1 for pixel-style maps
        let up = (map.c2p(self.center_x, 1.0).y - base.y).signum();

        let height = if self.is_empty {
            style.min_height
        } else {
            (map.c2p(self.center_x, self.height).y - base.y).abs().max(style.min_height)
        };

        BarRect {
            bin_index: self.bin_index,
            center: Vec2::new(base.x, base.y + up * 0.5 * height),
            width: (right.x - left.x).abs(),
            height,
            fill: if self.is_empty { style.empty_fill() } else { style.fill },
            opacity: self.opacity,
            stroke_width: self.stroke_width,
        }
    }
}

/// A bar ready to draw, in scene units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarRect {
    pub bin_index: usize,
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
    pub opacity: f32,
    pub stroke_width: f32,
}

impl BarRect {
    /// In-place interpolation toward `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: &BarRect, t: f32) -> BarRect {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a * (1.0 - t) + b * t;
        BarRect {
            bin_index: other.bin_index,
            center: Vec2::new(mix(self.center.x, other.center.x), mix(self.center.y, other.center.y)),
            width: mix(self.width, other.width),
            height: mix(self.height, other.height),
            fill: Color::rgba(
                mix(self.fill.r, other.fill.r),
                mix(self.fill.g, other.fill.g),
                mix(self.fill.b, other.fill.b),
                mix(self.fill.a, other.fill.a),
            ),
            opacity: mix(self.opacity, other.opacity),
            stroke_width: mix(self.stroke_width, other.stroke_width),
        }
    }
}

/// Interpolate two frames built from the same bin layout.
pub fn morph(from: &[BarRect], to: &[BarRect], t: f32) -> Result<Vec<BarRect>> {
    if from.len() != to.len() {
        return Err(Report::new(SceneError::Configuration).attach(format!(
            "cannot morph {} bars into {} bars; frames must share bin edges",
            from.len(),
            to.len()
        )));
    }
    Ok(from.iter().zip(to).map(|(a, b)| a.lerp(b, t)).collect())
}

/// Builds bar frames against a fixed bin layout and vertical ceiling.
///
/// The ceiling never moves between frames: when the tallest density exceeds
/// it, the whole frame is scaled so that bar lands at `ceiling * headroom`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DensityHistogram {
    edges: BinEdges,
    ceiling: f32,
    style: BarStyle,
}

impl DensityHistogram {
    pub fn new(edges: BinEdges, ceiling: f32, style: BarStyle) -> Result<Self> {
        if !ceiling.is_finite() || ceiling <= 0.0 {
            return Err(Report::new(SceneError::Configuration)
                .attach(format!("vertical ceiling must be positive and finite, got {ceiling}")));
        }
        if !style.headroom.is_finite() || style.headroom <= 0.0 {
            return Err(Report::new(SceneError::Configuration)
                .attach(format!("headroom must be positive and finite, got {}", style.headroom)));
        }
        Ok(Self { edges, ceiling, style })
    }

    /// Ceiling taken from the top of the axes' y range.
    pub fn for_axes(edges: BinEdges, axes: &Axes, style: BarStyle) -> Result<Self> {
        Self::new(edges, axes.y_max(), style)
    }

    #[inline]
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    #[inline]
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    #[inline]
    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    pub fn with_style(mut self, style: BarStyle) -> Self {
        self.style = style;
        self
    }

    pub fn build(&self, samples: &[f32]) -> Result<Vec<BarGeometry>> {
        let mut densities = density(samples, &self.edges)?;

        let max_density = densities.iter().copied().fold(0.0f32, f32::max);
        if max_density > self.ceiling {
            let target = self.ceiling * self.style.headroom;
            debug!(max_density, ceiling = self.ceiling, target, "rescaling histogram under ceiling");
            // normalize first so the tallest bar lands on `target` exactly
            for d in &mut densities {
                *d = *d / max_density * target;
            }
        }

        Ok(densities
            .iter()
            .enumerate()
            .map(|(i, &d)| {
                let is_empty = d <= 0.0;
                BarGeometry {
                    bin_index: i,
                    center_x: self.edges.center(i),
                    width: self.edges.width(i),
                    height: d,
                    is_empty,
                    opacity: if is_empty { self.style.empty_opacity } else { self.style.opacity },
                    stroke_width: if is_empty { 0.0 } else { self.style.stroke_width },
                }
            })
            .collect())
    }

    pub fn project<M: CoordinateMap + ?Sized>(&self, bars: &[BarGeometry], map: &M) -> Vec<BarRect> {
        bars.iter().map(|b| b.project(map, &self.style)).collect()
    }

    /// One projected frame per iteration of samples, all on the same bins.
    pub fn frames<'a, I, M>(&self, iterations: I, map: &M) -> Result<Vec<Vec<BarRect>>>
    where
        I: IntoIterator<Item = &'a [f32]>,
        M: CoordinateMap + ?Sized,
    {
        iterations
            .into_iter()
            .enumerate()
            .map(|(i, samples)| {
                self.frame(samples, map)
                    .map_err(|e| e.attach(format!("while building frame for iteration {i}")))
            })
            .collect()
    }

    /// [`build`](Self::build) followed by [`project`](Self::project).
    pub fn frame<M: CoordinateMap + ?Sized>(&self, samples: &[f32], map: &M) -> Result<Vec<BarRect>> {
        let bars = self.build(samples)?;
        Ok(self.project(&bars, map))
    }
}

/// Histogram frames played back one after another, each morphing into the next.
///
/// Each step spends `morph_secs` interpolating and `hold_secs` resting on the
/// target frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameTimeline {
    frames: Vec<Vec<BarRect>>,
    morph_secs: f32,
    hold_secs: f32,
}

impl FrameTimeline {
    pub fn new(frames: Vec<Vec<BarRect>>, morph_secs: f32, hold_secs: f32) -> Result<Self> {
        let Some(first) = frames.first() else {
            return Err(Report::new(SceneError::InvalidInput).attach("timeline needs at least one frame"));
        };
        if let Some(i) = frames.iter().position(|f| f.len() != first.len()) {
            return Err(Report::new(SceneError::Configuration).attach(format!(
                "frame {i} has {} bars, frame 0 has {}",
                frames[i].len(),
                first.len()
            )));
        }
        for (name, secs) in [("morph_secs", morph_secs), ("hold_secs", hold_secs)] {
            if !secs.is_finite() || secs < 0.0 {
                return Err(Report::new(SceneError::Configuration)
                    .attach(format!("{name} must be finite and non-negative, got {secs}")));
            }
        }
        if morph_secs + hold_secs <= 0.0 {
            return Err(Report::new(SceneError::Configuration).attach("morph_secs + hold_secs must be positive"));
        }
        Ok(Self {
            frames,
            morph_secs,
            hold_secs,
        })
    }

    pub fn frames(&self) -> &[Vec<BarRect>] {
        &self.frames
    }

    /// Seconds until the last frame is fully shown.
    pub fn duration(&self) -> f32 {
        (self.frames.len() - 1) as f32 * (self.morph_secs + self.hold_secs)
    }

    /// Bars at `t` seconds; clamps to the first and last frame outside the timeline.
    pub fn sample(&self, t: f32) -> Vec<BarRect> {
        let last = self.frames.len() - 1;
        if last == 0 || t <= 0.0 {
            return self.frames[0].clone();
        }

        let segment = self.morph_secs + self.hold_secs;
        let index = (t / segment).floor() as usize;
        if index >= last {
            return self.frames[last].clone();
        }

        let local = t - index as f32 * segment;
        let progress = if self.morph_secs > 0.0 {
            (local / self.morph_secs).min(1.0)
        } else {
            1.0
        };
        self.frames[index]
            .iter()
            .zip(&self.frames[index + 1])
            .map(|(a, b)| a.lerp(b, progress))
            .collect()
    }
}
