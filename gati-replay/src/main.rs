//! GATI replay - run scripted depth scenarios through a drive controller
//!
//! Feeds every frame of a scenario YAML through a fresh controller and
//! prints the resulting mode and command per tick, or writes them as CSV.
//!
//! Usage:
//!   gati-replay --scenario scenarios/obstacle_approach.yaml
//!   gati-replay --scenario scenarios/wall_parking.yaml --csv trace.csv
//!   gati-replay --scenario scenarios/ramp.yaml --behavior avoidance
//!
//! Per-tick mode transitions are logged at debug level:
//!   RUST_LOG=gati_core=debug gati-replay --scenario scenarios/ramp.yaml

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use gati_core::{BehaviorKind, GatiConfig, GatiError, Result, Scenario, Trace, replay};
use tracing::{error, info};

/// Deterministic scenario replay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario YAML file
    #[arg(short, long)]
    scenario: PathBuf,

    /// Configuration file (defaults to configs/gati.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Behavior to run, overriding the scenario's own choice
    #[arg(short, long, value_enum)]
    behavior: Option<BehaviorKind>,

    /// Write the trace as CSV instead of printing it
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gati_replay=info".parse().unwrap())
                .add_directive("gati_core=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            GatiConfig::load(path)?
        }
        None => GatiConfig::load_default()?,
    };

    let scenario = Scenario::load(&args.scenario)?;
    let behavior = args
        .behavior
        .or(scenario.behavior)
        .ok_or_else(|| {
            GatiError::Scenario(format!(
                "{}: no behavior in scenario, pass --behavior",
                scenario.name
            ))
        })?;

    let trace = replay(&scenario, &config, behavior)?;

    match &args.csv {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            trace.write_csv(&mut out)?;
            out.flush()?;
            info!("Wrote {} ticks to {:?}", trace.rows.len(), path);
        }
        None => print_trace(&scenario, &trace),
    }

    Ok(())
}

fn print_trace(scenario: &Scenario, trace: &Trace) {
    println!("=== {} ({}) ===", scenario.name, trace.behavior.as_str());
    if !scenario.description.is_empty() {
        println!("{}", scenario.description);
    }
    println!();
    println!("{:>5}  {:>5}  {:<16} {:>8} {:>8}", "tick", "frame", "mode", "speed", "angle");

    let mut previous = None;
    for row in &trace.rows {
        let marker = if previous.is_some_and(|p| p != row.mode) { "*" } else { "" };
        println!(
            "{:>5}  {:>5}  {:<16} {:>8.3} {:>8.3} {}",
            row.tick, row.frame, row.mode, row.command.speed, row.command.angle, marker
        );
        previous = Some(row.mode);
    }
}
