//! # lanegen Application Logic
//!
//! [`generate`] loads a scenario, applies command-line overrides, opens a
//! dataset directory and runs the generator until the target sample count is
//! reached or the time limit expires. A watchdog thread raises the shared stop
//! flag on timeout; the generator notices it between frames, so the ledger
//! and images on disk always agree.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use autopilot::{RunOptions, RunSummary};
use clap::ValueEnum;
use dataset::{ConsolidationSummary, DatasetWriter};
use physics::RoadKind;
use scenario::{RoadSpec, Scenario};
use tracing_subscriber::EnvFilter;

/// Installs the `fmt` subscriber, honouring `RUST_LOG` and defaulting to
/// `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RoadChoice {
    Straight,
    #[value(alias = "curved")]
    Arc,
}

impl RoadChoice {
    fn kind(self) -> RoadKind {
        match self {
            RoadChoice::Straight => RoadKind::Straight,
            RoadChoice::Arc => RoadKind::Arc,
        }
    }
}

/// Overrides for `generate`; `None` keeps the scenario's value.
#[derive(Clone, Debug, Default)]
pub struct GenerateArgs {
    pub config: Option<PathBuf>,
    pub road: Option<RoadChoice>,
    pub samples: Option<u64>,
    pub seed: Option<u64>,
    pub out: Option<PathBuf>,
    pub pace_fps: Option<f64>,
    pub time_limit_secs: Option<f64>,
}

/// Loads the scenario named by `args` (or the defaults) and applies the
/// command-line overrides.
///
/// # Errors
///
/// Fails if the scenario file cannot be read or parsed.
pub fn load_scenario(args: &GenerateArgs) -> Result<Scenario> {
    let mut scenario = match &args.config {
        Some(path) => Scenario::from_path(path)
            .with_context(|| format!("loading scenario {}", path.display()))?,
        None => Scenario::default(),
    };

    if let Some(road) = args.road {
        if scenario.build_road().kind() != road.kind() {
            scenario.road = match road {
                RoadChoice::Straight => RoadSpec::straight(),
                RoadChoice::Arc => RoadSpec::arc(),
            };
        }
    }
    if let Some(samples) = args.samples {
        scenario.run.samples = samples;
    }
    if let Some(seed) = args.seed {
        scenario.run.seed = Some(seed);
    }
    if let Some(out) = &args.out {
        scenario.run.output_dir.clone_from(out);
    }
    if let Some(fps) = args.pace_fps {
        scenario.run.pace_fps = Some(fps);
    }
    Ok(scenario)
}

/// Raises `stop` once `limit` has elapsed. The thread exits early when the
/// flag is raised by someone else.
fn spawn_watchdog(stop: Arc<AtomicBool>, limit: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let deadline = Instant::now() + limit;
        while !stop.load(Ordering::Relaxed) {
            let now = Instant::now();
            if now >= deadline {
                tracing::info!("Time limit of {:.1}s reached, stopping", limit.as_secs_f64());
                stop.store(true, Ordering::Relaxed);
                break;
            }
            thread::sleep((deadline - now).min(Duration::from_millis(50)));
        }
    })
}

/// Runs one generation and returns its summary.
///
/// # Errors
///
/// Fails on invalid scenarios, on dataset I/O errors and when the generator
/// stalls.
pub fn generate(args: &GenerateArgs) -> Result<RunSummary> {
    let time_limit = args
        .time_limit_secs
        .map(|secs| {
            Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid time limit {secs}s"))
        })
        .transpose()?;
    let scenario = load_scenario(args)?;
    let mut generator = scenario
        .build_generator()
        .context("building generator from scenario")?;
    let mut writer = DatasetWriter::create(&scenario.run.output_dir).with_context(|| {
        format!("creating run directory {}", scenario.run.output_dir.display())
    })?;

    let stop = Arc::new(AtomicBool::new(false));
    let watchdog = time_limit.map(|limit| spawn_watchdog(Arc::clone(&stop), limit));

    let options = RunOptions {
        target_samples: scenario.run.samples,
        pace_fps: scenario.run.pace_fps,
    };
    let result = generator.run(&mut writer, &options, &stop);

    stop.store(true, Ordering::Relaxed);
    if let Some(handle) = watchdog {
        if handle.join().is_err() {
            tracing::error!("Watchdog thread panicked");
        }
    }

    let summary = result.context("generation failed")?;
    tracing::info!(
        "Saved {} samples to {}{}",
        writer.samples_written(),
        writer.root().display(),
        if summary.cancelled { " (stopped early)" } else { "" }
    );
    Ok(summary)
}

/// Merges every run under `root` into `out`.
///
/// # Errors
///
/// Fails on I/O errors while reading runs or writing the combined set.
pub fn consolidate(root: &Path, out: &Path) -> Result<ConsolidationSummary> {
    let summary = dataset::consolidate(root, out)
        .with_context(|| format!("consolidating runs under {}", root.display()))?;
    tracing::info!(
        "Consolidation complete: {} images, {} missing, {} runs without ledger",
        summary.copied,
        summary.missing_images,
        summary.skipped_runs
    );
    Ok(summary)
}
