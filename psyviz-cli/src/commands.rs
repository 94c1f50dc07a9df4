//! Subcommand bodies. Each writes JSON to `out` so they can be driven from tests.

use std::io::{self, Read, Write};

use anyhow::Context;
use error_stack::Report;
use psyviz::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::{BounceArgs, HistogramArgs, PiArgs, SelectArgs};

/// Flattens a library report, keeping its attachments in the message.
pub fn report(err: Report<SceneError>) -> anyhow::Error {
    anyhow::anyhow!("{err:?}")
}

pub fn read_stdin() -> anyhow::Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text).context("reading stdin")?;
    Ok(text)
}

pub fn parse_samples(text: &str) -> anyhow::Result<Vec<f32>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token
                .parse::<f32>()
                .with_context(|| format!("sample {i} is not a number: {token:?}"))
        })
        .collect()
}

/// One iteration per non-blank line.
pub fn parse_iterations(text: &str) -> anyhow::Result<Vec<Vec<f32>>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| parse_samples(line).with_context(|| format!("line {}", n + 1)))
        .collect()
}

pub fn histogram(args: &HistogramArgs, samples: &[f32], out: &mut impl Write) -> anyhow::Result<()> {
    info!(samples = samples.len(), width = args.width, "building histogram");
    let edges = BinEdges::uniform(args.lower, args.upper, args.width).map_err(report)?;
    let hist = DensityHistogram::new(edges, args.ceiling, BarStyle::default()).map_err(report)?;

    if args.rects {
        let axes = Axes::new([args.lower, args.upper], [0.0, args.ceiling], 10.0, 5.0).map_err(report)?;
        let rects = hist.frame(samples, &axes).map_err(report)?;
        serde_json::to_writer(&mut *out, &rects)?;
    } else {
        let bars = hist.build(samples).map_err(report)?;
        serde_json::to_writer(&mut *out, &bars)?;
    }
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct BounceLine<'a> {
    frame: usize,
    elapsed: f32,
    bodies: &'a [BodyFrame],
}

pub fn bounce(args: &BounceArgs, seed: u64, out: &mut impl Write) -> anyhow::Result<()> {
    anyhow::ensure!(args.dt.is_finite() && args.dt > 0.0, "--dt must be positive, got {}", args.dt);

    let stack = TriangleStack {
        base_count: args.base_count,
        ..Default::default()
    };
    let mut set = stack.body_set(seed, Bounds::default(), PhysicsConfig::default());
    info!(bodies = set.len(), frames = args.frames, dt = args.dt, "dropping stack");

    let every = args.every.max(1);
    for frame in 0..=args.frames {
        if frame > 0 {
            set.step_all(args.dt);
        }
        if frame % every == 0 {
            let bodies = set.snapshot();
            let line = BounceLine {
                frame,
                elapsed: set.elapsed(),
                bodies: &bodies,
            };
            serde_json::to_writer(&mut *out, &line)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

pub fn pi(args: &PiArgs, seed: u64, out: &mut impl Write) -> anyhow::Result<()> {
    anyhow::ensure!(args.batch > 0, "--batch must be at least 1");
    anyhow::ensure!(
        args.radius.is_finite() && args.radius > 0.0,
        "--radius must be positive, got {}",
        args.radius
    );

    let mut estimator = PiEstimator::new(args.radius, seed);
    let mut remaining = args.points;
    while remaining > 0 {
        let batch = estimator.sample_batch(remaining.min(args.batch));
        remaining -= batch.samples.len();
        if args.with_points {
            serde_json::to_writer(&mut *out, &batch)?;
        } else {
            let line = json!({
                "inside": batch.inside,
                "total_inside": batch.total_inside,
                "total": batch.total,
                "estimate": batch.estimate,
            });
            serde_json::to_writer(&mut *out, &line)?;
        }
        writeln!(out)?;
        debug!(total = batch.total, estimate = batch.estimate, "batch");
    }
    info!(estimate = estimator.estimate(), total = estimator.total(), "pi estimate");
    Ok(())
}

/// 2PL items with difficulties spread evenly over `[-3, 3]` and random discriminations.
pub fn generate_pool<R: Rng>(items: usize, rng: &mut R) -> ItemPool {
    let step = if items > 1 { 6.0 / (items - 1) as f32 } else { 0.0 };
    let start = if items > 1 { -3.0 } else { 0.0 };
    ItemPool::new((0..items).map(|i| ItemParams::two_pl(rng.random_range(0.8..2.0), start + i as f32 * step)))
}

pub fn select(args: &SelectArgs, seed: u64, out: &mut impl Write) -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let pool = generate_pool(args.items, &mut rng);
    let mut session = AdaptiveSession::new(pool, 0.0);

    let true_theta = args.true_theta;
    let rounds = session.run(args.rounds, |item| rng.random::<f32>() < icc(true_theta, &item.params));
    for round in &rounds {
        serde_json::to_writer(&mut *out, round)?;
        writeln!(out)?;
    }
    info!(
        rounds = rounds.len(),
        theta = session.theta(),
        true_theta,
        "adaptive session finished"
    );
    Ok(())
}

#[cfg(feature = "preview")]
pub fn preview(scene: &crate::config::PreviewScene, seed: u64) -> anyhow::Result<()> {
    use crate::config::PreviewScene;

    match scene {
        PreviewScene::Bounce { speed } => {
            let set = TriangleStack::default().body_set(seed, Bounds::default(), PhysicsConfig::default());
            run_bounce_preview(set, *speed);
        }
        PreviewScene::Histogram { width } => {
            let iterations = parse_iterations(&read_stdin()?)?;
            let axes = Axes::default_density();
            let edges = BinEdges::uniform(axes.x_range[0], axes.x_range[1], *width).map_err(report)?;
            let hist = DensityHistogram::for_axes(edges, &axes, BarStyle::default()).map_err(report)?;
            let frames = hist.frames(iterations.iter().map(Vec::as_slice), &axes).map_err(report)?;
            let timeline = FrameTimeline::new(frames, 1.0, 0.1).map_err(report)?;
            run_histogram_preview(timeline);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(out: &[u8]) -> Vec<serde_json::Value> {
        std::str::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn parses_whitespace_separated_samples() {
        assert_eq!(parse_samples(" 1 -2.5\n3e-1\t4 ").unwrap(), vec![1.0, -2.5, 0.3, 4.0]);
        assert!(parse_samples("").unwrap().is_empty());
        let err = parse_samples("1 two 3").unwrap_err();
        assert!(err.to_string().contains("sample 1"));
    }

    #[test]
    fn iterations_skip_blank_lines() {
        let iterations = parse_iterations("0 1\n\n  \n2 3 4\n").unwrap();
        assert_eq!(iterations, vec![vec![0.0, 1.0], vec![2.0, 3.0, 4.0]]);
        let err = parse_iterations("0\nx\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn histogram_prints_one_bar_per_bin() {
        let args = HistogramArgs {
            lower: -4.0,
            upper: 4.0,
            width: 1.0,
            ceiling: 10.0,
            rects: false,
        };
        let mut out = Vec::new();
        histogram(&args, &[-3.0, -3.0, -3.0, 3.0, 3.0, 3.0], &mut out).unwrap();
        let bars = &lines(&out)[0];
        assert_eq!(bars.as_array().unwrap().len(), 8);
        assert_eq!(bars[1]["height"], 0.5);
        assert_eq!(bars[0]["is_empty"], true);

        let mut out = Vec::new();
        histogram(&HistogramArgs { rects: true, ..args.clone() }, &[0.5], &mut out).unwrap();
        assert_eq!(lines(&out)[0].as_array().unwrap().len(), 8);
    }

    #[test]
    fn histogram_reports_library_errors() {
        let args = HistogramArgs {
            lower: -4.0,
            upper: 4.0,
            width: 0.3,
            ceiling: 0.4,
            rects: false,
        };
        let err = histogram(&args, &[0.0], &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));

        let tiny = HistogramArgs { width: 1e-7, ..args.clone() };
        let err = histogram(&tiny, &[0.0], &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("limit is"));

        let args = HistogramArgs { width: 0.2, ..args };
        let err = histogram(&args, &[], &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("invalid input data"));
    }

    #[test]
    fn bounce_prints_every_nth_frame() {
        let args = BounceArgs {
            frames: 10,
            dt: 1.0 / 60.0,
            every: 5,
            base_count: 4,
        };
        let mut out = Vec::new();
        bounce(&args, 1, &mut out).unwrap();
        let frames = lines(&out);
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[2]["frame"], 10);
        // 4 + 3 + 2 + 1 circles, apex held back
        assert_eq!(frames[0]["bodies"].as_array().unwrap().len(), 9);

        let err = bounce(&BounceArgs { dt: 0.0, ..args }, 1, &mut Vec::new()).unwrap_err();
        assert!(err.to_string().contains("--dt"));
    }

    #[test]
    fn pi_splits_points_into_batches() {
        let args = PiArgs {
            points: 250,
            batch: 100,
            radius: 4.0,
            with_points: false,
        };
        let mut out = Vec::new();
        pi(&args, 3, &mut out).unwrap();
        let batches = lines(&out);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[2]["total"], 250);
        assert!(batches[0].get("samples").is_none());

        let mut out = Vec::new();
        pi(&PiArgs { with_points: true, ..args }, 3, &mut out).unwrap();
        assert_eq!(lines(&out)[2]["samples"].as_array().unwrap().len(), 50);
    }

    #[test]
    fn generated_pool_spans_difficulties() {
        let mut rng = StdRng::seed_from_u64(0);
        let pool = generate_pool(7, &mut rng);
        assert_eq!(pool.len(), 7);
        assert_eq!(pool.items()[0].params.difficulty, -3.0);
        assert!((pool.items()[6].params.difficulty - 3.0).abs() < 1e-6);
        for item in pool.items() {
            assert!((0.8..2.0).contains(&item.params.discrimination));
        }

        let single = generate_pool(1, &mut rng);
        assert_eq!(single.items()[0].params.difficulty, 0.0);
    }

    #[test]
    fn select_stops_when_pool_runs_out() {
        let args = SelectArgs {
            items: 4,
            rounds: 10,
            true_theta: 1.0,
        };
        let mut out = Vec::new();
        select(&args, 5, &mut out).unwrap();
        let rounds = lines(&out);
        assert_eq!(rounds.len(), 4);
        for round in &rounds {
            let theta = round["theta"].as_f64().unwrap();
            assert!((-4.0..=4.0).contains(&theta));
        }
    }
}
