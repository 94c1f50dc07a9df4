//! Command line configuration

use clap::{Args, Parser, Subcommand};

/// Geometry and simulation streams for psychometrics explainer scenes.
///
/// Every subcommand writes JSON to stdout; logs go to stderr.
#[derive(Parser, Clone, Debug)]
#[command(name = "psyviz-cli")]
#[command(about = "Emit histogram, physics and IRT scene data as JSON")]
pub struct Config {
    /// Seed for every random stream
    #[arg(long, global = true, default_value = "0")]
    pub seed: u64,

    /// Log filter (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Density histogram of whitespace-separated samples read from stdin
    Histogram(HistogramArgs),
    /// Drop the triangle stack and print one JSON line per frame
    Bounce(BounceArgs),
    /// Quarter-circle Monte Carlo estimate of pi, one JSON line per batch
    Pi(PiArgs),
    /// Simulated adaptive test over a generated item pool
    Select(SelectArgs),
    /// Open a live preview window
    #[cfg(feature = "preview")]
    #[command(subcommand)]
    Preview(PreviewScene),
}

#[derive(Args, Clone, Debug)]
pub struct HistogramArgs {
    /// Left edge of the first bin
    #[arg(long, default_value_t = -4.0, allow_negative_numbers = true)]
    pub lower: f32,

    /// Right edge of the last bin
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    pub upper: f32,

    /// Bin width; must divide the range evenly
    #[arg(long, default_value_t = 0.2)]
    pub width: f32,

    /// Densities above this are rescaled to fit under it
    #[arg(long, default_value_t = 0.4)]
    pub ceiling: f32,

    /// Print projected rectangles on the default axes instead of raw bars
    #[arg(long)]
    pub rects: bool,
}

#[derive(Args, Clone, Debug)]
pub struct BounceArgs {
    /// Number of integration steps
    #[arg(long, default_value_t = 600)]
    pub frames: usize,

    /// Step length in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    pub dt: f32,

    /// Print every n-th frame only
    #[arg(long, default_value_t = 1)]
    pub every: usize,

    /// Circles in the bottom row of the stack
    #[arg(long, default_value_t = 12)]
    pub base_count: usize,
}

#[derive(Args, Clone, Debug)]
pub struct PiArgs {
    /// Total number of points
    #[arg(long, default_value_t = 2000)]
    pub points: usize,

    /// Points per batch
    #[arg(long, default_value_t = 100)]
    pub batch: usize,

    /// Side of the sampling square
    #[arg(long, default_value_t = 4.0)]
    pub radius: f32,

    /// Include the sampled points in every line
    #[arg(long)]
    pub with_points: bool,
}

#[derive(Args, Clone, Debug)]
pub struct SelectArgs {
    /// Number of items in the generated pool
    #[arg(long, default_value_t = 30)]
    pub items: usize,

    /// Rounds to administer
    #[arg(long, default_value_t = 10)]
    pub rounds: usize,

    /// Ability of the simulated examinee
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub true_theta: f32,
}

#[cfg(feature = "preview")]
#[derive(Subcommand, Clone, Debug)]
pub enum PreviewScene {
    /// Triangle stack falling under gravity
    Bounce {
        /// Simulated seconds per wall-clock second
        #[arg(long, default_value_t = 1.0)]
        speed: f32,
    },
    /// Morph through histograms, one line of samples per iteration on stdin
    Histogram {
        #[arg(long, default_value_t = 0.2)]
        width: f32,
    },
}
