//! `hjb`: solve HJB control problems from the command line.
//!
//! # Commands
//!
//! - `hjb solve --config <file.json>`: run a PDE or MDP solve through the
//!   job service, optionally followed by a rollout, and print each job record
//!   as JSON
//!
//! A solve config names the mode and carries the matching submission:
//!
//! ```json
//! {
//!   "mode": "pde",
//!   "outputDir": "out/hjb",
//!   "pde": { "grid": { ... }, "dynamics": { ... }, "cost": { ... }, "horizon": 2 },
//!   "rollout": { "start": [-3, 0], "steps": 40, "dt": 0.05 }
//! }
//! ```

mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use hjb_jobs::{
    Caller, HjbJob, JobKind, JobService, JobStatus, Role, RolloutRequest, ServiceSettings,
};
use tracing::{Level, info};

use crate::config::{Mode, SolveConfig};

/// Hamilton-Jacobi-Bellman optimal control solver.
#[derive(Parser)]
#[command(name = "hjb")]
#[command(about = "Solve HJB optimal control problems", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a PDE or MDP problem described by a JSON config
    Solve {
        /// Path to the solve config
        #[arg(long)]
        config: PathBuf,

        /// Path to service settings (TOML)
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Role to submit jobs as
        #[arg(long, default_value = "operator")]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Solve {
            config,
            settings,
            role,
        } => solve(&config, settings.as_deref(), Caller::new(role)).await,
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn solve(
    config_path: &Path,
    settings_path: Option<&Path>,
    caller: Caller,
) -> Result<()> {
    let config = SolveConfig::load(config_path)?;

    let mut settings = match settings_path {
        Some(path) => ServiceSettings::load(path)?,
        None => ServiceSettings::default(),
    };
    if let Some(dir) = &config.output_dir {
        settings.artifact_dir = Some(dir.clone());
    }
    let service = JobService::new(settings);

    let (kind, payload) = match config.mode {
        Mode::Pde => (JobKind::Pde, config.pde.clone()),
        Mode::Mdp => (JobKind::Mdp, config.mdp.clone()),
    };
    let payload = payload.with_context(|| {
        format!(
            "config mode is `{}` but has no `{}` section",
            config.mode, config.mode
        )
    })?;

    let job = service.submit(&caller, kind, payload)?;
    info!(job = %job.id, "waiting for solve");
    let solved = finished(service.wait(&caller, job.id).await?)?;

    if let Some(rollout) = &config.rollout {
        let request = RolloutRequest {
            job_id: solved.id,
            start: rollout.start.clone(),
            steps: rollout.steps,
            dt: rollout.dt,
        };
        let job = service.submit_rollout(&caller, &request)?;
        finished(service.wait(&caller, job.id).await?)?;
    }
    Ok(())
}

/// Prints a finished job and turns a failure into an error.
fn finished(job: HjbJob) -> Result<HjbJob> {
    println!("{}", serde_json::to_string_pretty(&job)?);
    if job.status == JobStatus::Failed {
        bail!(
            "{} job {} failed: {}",
            job.kind.as_str(),
            job.id,
            job.error.as_deref().unwrap_or("unknown error")
        );
    }
    Ok(job)
}
