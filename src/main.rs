// src/main.rs - Command line front end for the laser motion planner
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use laser_planner::config::{Config, load_config};
use laser_planner::motion::{MotionPlan, MotionPlanner};
use laser_planner::path::load_path;

/// Laser cutter motion planner and job time estimator
#[derive(Parser, Debug)]
#[command(name = "laser-planner", about = "Plans feasible motion along a laser path and estimates job time.")]
struct Cli {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Plan a path and print the estimated job time
    Plan {
        /// JSON path file
        path: PathBuf,
        /// Write the full plan as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Sample the planned motion over time into a CSV file
    Trace {
        /// JSON path file
        path: PathBuf,
        /// CSV output file
        #[arg(short, long)]
        output: PathBuf,
        /// Samples per second (overrides the config)
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Print the effective configuration
    Settings,
}

fn format_duration(seconds: f64) -> String {
    let whole = seconds.max(0.0) as u64;
    format!("{} min. {} sec.", whole / 60, whole % 60)
}

fn plan_file(config: &Config, path: &Path) -> Result<MotionPlan, Box<dyn std::error::Error>> {
    let waypoints = load_path(path)?;
    let planner = MotionPlanner::new(config.machine.to_settings())?;
    let plan = planner.plan(&waypoints, config.planner.start_position()).map_err(|e| {
        tracing::error!("Planning '{}' failed: {}", path.display(), e);
        e
    })?;
    Ok(plan)
}

fn write_trace(plan: &MotionPlan, output: &Path, rate: f64) -> Result<usize, Box<dyn std::error::Error>> {
    let samples = plan.timeline().samples(rate);
    let mut wtr = csv::Writer::from_path(output)?;
    wtr.write_record(["time", "x", "y", "speed"])?;
    for sample in &samples {
        wtr.write_record(&[
            format!("{:.6}", sample.time),
            format!("{:.6}", sample.position.x),
            format!("{:.6}", sample.position.y),
            format!("{:.6}", sample.speed),
        ])?;
    }
    wtr.flush()?;
    Ok(samples.len())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(&path.to_string_lossy())?
        }
        None => Config::default(),
    };

    match cli.command {
        Commands::Plan { path, json } => {
            let plan = plan_file(&config, &path)?;
            tracing::info!(
                "{} junctions, {} primitives, {:.1} mm, peak {:.1} mm/s",
                plan.junctions.len(),
                plan.primitives.len(),
                plan.path_length(),
                plan.peak_speed()
            );
            if let Some(json_path) = json {
                std::fs::write(&json_path, serde_json::to_string_pretty(&plan)?)?;
                tracing::info!("Plan written to {}", json_path.display());
            }
            println!("{}", format_duration(plan.estimated_time));
        }
        Commands::Trace { path, output, rate } => {
            let plan = plan_file(&config, &path)?;
            let rate = rate.unwrap_or(config.trace.sample_rate);
            if !(rate.is_finite() && rate > 0.0) {
                return Err(format!("Sample rate must be > 0, got {}", rate).into());
            }
            let rows = write_trace(&plan, &output, rate)?;
            tracing::info!("Wrote {} samples to {}", rows, output.display());
        }
        Commands::Settings => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
