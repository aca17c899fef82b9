//! Ristretto host simulator
//!
//! Pulls simulated espresso shots from the command line:
//!
//! ```bash
//! ristretto-sim run --profile "LM Leva" --json
//! ristretto-sim profiles --profile Classic
//! ```

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use embassy_executor::Spawner;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ristretto_core::controller::BrewController;
use ristretto_core::profile::ProfileKey;
use ristretto_sim::catalog;
use ristretto_sim::config::{self, SimConfig};
use ristretto_sim::documents::JsonProfileDocuments;
use ristretto_sim::runner::{run_realtime, RunOptions, ShotRunner};

/// Espresso brew simulator
#[derive(Parser, Debug)]
#[command(name = "ristretto-sim", version)]
#[command(about = "Simulates espresso shots from multi-phase extraction profiles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pull one shot and print its telemetry
    Run(RunArgs),
    /// List the built-in profiles
    Profiles {
        /// Profile to highlight in the carousel
        #[arg(short, long)]
        profile: Option<String>,

        /// Directory holding the `data/p/*.json` profile documents
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Profile name (defaults to the one in the configuration file)
    #[arg(short, long)]
    profile: Option<String>,

    /// Configuration file
    #[arg(short, long, env = "RISTRETTO_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the `data/p/*.json` profile documents
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// Stop the shot at this cup weight (g)
    #[arg(long, value_name = "GRAMS")]
    target_weight: Option<f32>,

    /// Print one JSON telemetry record per tick
    #[arg(long)]
    json: bool,

    /// Tick at wall-clock pace instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Stop shots still running after this many seconds
    #[arg(long, default_value = "120")]
    max_shot: f32,
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ristretto_sim=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run(args) => brew(args).await,
        Commands::Profiles { profile, data_dir } => list_profiles(profile, data_dir),
    }
}

async fn brew(args: RunArgs) -> Result<()> {
    let config = config::load(args.config.as_deref()).context("Failed to load configuration")?;
    let SimConfig {
        simulation,
        adjustments,
        brew,
    } = config;

    let mut brew_config = brew.brew_config();
    if let Some(target) = args.target_weight {
        brew_config.volumetric = true;
        brew_config.target_weight_g = target;
    }

    let documents = JsonProfileDocuments::new(&args.data_dir);
    let mut ctrl = BrewController::new(documents, simulation, adjustments, brew_config);

    let name = args.profile.unwrap_or(brew.profile);
    if ProfileKey::from_name(&name).is_none() {
        warn!("Unknown profile {:?}, brewing from the adjustments", name);
    }
    ctrl.select_name(&name);

    let options = RunOptions {
        tick_ms: simulation.tick_ms,
        json: args.json,
        max_shot_s: args.max_shot,
    };
    let mut runner = ShotRunner::new(io::stdout().lock(), options);

    let report = if args.realtime {
        run_realtime(&mut runner, &mut ctrl).await
    } else {
        runner.run(&mut ctrl)
    }
    .context("Shot failed")?;

    info!(
        "{}: {} in {} ticks, {:.1} g",
        report.profile,
        report.stop_reason.label(),
        report.ticks,
        report.telemetry.weight_g
    );
    Ok(())
}

fn list_profiles(profile: Option<String>, data_dir: PathBuf) -> Result<()> {
    let selected = profile.as_deref().and_then(ProfileKey::from_name);
    if let (Some(name), None) = (&profile, selected) {
        warn!("Unknown profile {:?}, nothing highlighted", name);
    }

    let mut documents = JsonProfileDocuments::new(data_dir);
    let invalid = catalog::write_profiles(&mut io::stdout().lock(), &mut documents, selected)
        .context("Failed to list profiles")?;
    if invalid > 0 {
        warn!("{} profile(s) failed validation", invalid);
    }
    Ok(())
}
