//! psyviz command line driver
//!
//! Streams scene geometry as JSON for an external animation driver.

mod commands;
mod config;

use std::io::{self, BufWriter, Write};

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Command, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // stdout carries the JSON, so logs go to stderr
    let filter = match &config.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| "psyviz=info,psyviz_cli=info".into()),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    info!(seed = config.seed, "starting psyviz-cli");

    let mut out = BufWriter::new(io::stdout().lock());
    match &config.command {
        Command::Histogram(args) => {
            let samples = commands::parse_samples(&commands::read_stdin()?)?;
            commands::histogram(args, &samples, &mut out)?;
        }
        Command::Bounce(args) => commands::bounce(args, config.seed, &mut out)?,
        Command::Pi(args) => commands::pi(args, config.seed, &mut out)?,
        Command::Select(args) => commands::select(args, config.seed, &mut out)?,
        #[cfg(feature = "preview")]
        Command::Preview(scene) => commands::preview(scene, config.seed)?,
    }
    out.flush()?;
    Ok(())
}
