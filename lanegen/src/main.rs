//! # lanegen
//!
//! Command-line entry point. `generate` records one run of labeled camera
//! frames; `consolidate` merges finished runs into a single dataset.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use lanegen::app::{self, GenerateArgs, RoadChoice};

#[derive(Parser, Debug)]
#[command(name = "lanegen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive the autopilot and record samples into a run directory
    Generate {
        /// Scenario JSON; built-in defaults when omitted
        #[arg(long)]
        config: Option<PathBuf>,
        /// Road type, overriding the scenario
        #[arg(long, value_enum)]
        road: Option<RoadChoice>,
        /// Number of samples to record
        #[arg(long)]
        samples: Option<u64>,
        /// Random seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
        /// Run directory receiving `images/` and `labels.csv`
        #[arg(long)]
        out: Option<PathBuf>,
        /// Hold the loop to this frame rate
        #[arg(long)]
        pace_fps: Option<f64>,
        /// Stop gracefully after this many seconds
        #[arg(long)]
        time_limit_secs: Option<f64>,
    },
    /// Merge `run_*` directories into `all_images/` and `combined_labels.csv`
    Consolidate {
        /// Directory holding the runs
        #[arg(long, default_value = "data")]
        root: PathBuf,
        /// Destination; defaults to the root
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    app::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate {
            config,
            road,
            samples,
            seed,
            out,
            pace_fps,
            time_limit_secs,
        } => {
            let args = GenerateArgs {
                config,
                road,
                samples,
                seed,
                out,
                pace_fps,
                time_limit_secs,
            };
            app::generate(&args)?;
        }
        Command::Consolidate { root, out } => {
            let out = out.unwrap_or_else(|| root.clone());
            app::consolidate(&root, &out)?;
        }
    }
    Ok(())
}
