// courtfit entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries JSON only)
// 2. Load config (copying defaults on first run)
// 3. Load the reference population
// 4. Load the scoring request, rank candidates, print results

use courtfit_app::request::{run_request, ScoringRequest};
use courtfit_core::config;
use courtfit_core::{FitEngine, ReferenceTable};

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(author, version, about = "Rank players by fit with a team scheme and lineup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score and rank the candidates in a JSON request.
    Score {
        /// Path to the scoring request JSON.
        #[arg(long)]
        request: PathBuf,
        /// Directory holding config/ and defaults/.
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
        /// Reference population CSV; overrides `[data]` in engine.toml.
        #[arg(long)]
        reference: Option<PathBuf>,
        /// Print only the best `n` candidates.
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        pretty: bool,
    },
    /// Load and validate the configuration, then exit.
    CheckConfig {
        #[arg(long, default_value = ".")]
        base_dir: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;
    info!("courtfit starting up");

    match cli.command {
        Command::Score {
            request,
            base_dir,
            reference,
            top,
            pretty,
        } => {
            // 2. Load config
            let config = config::load_config(&base_dir).context("failed to load configuration")?;

            // 3. Reference population
            let reference_path = reference
                .unwrap_or_else(|| base_dir.join(&config.data.reference_population));
            let table = ReferenceTable::load(&reference_path)
                .context("failed to load reference population")?;
            info!("Reference population: {} players", table.len());

            // 4. Score
            let request = ScoringRequest::load(&request).context("failed to load request")?;
            let engine = FitEngine::new(&config, table);
            let today = chrono::Local::now().date_naive();
            let mut ranked =
                run_request(&engine, request, today).context("failed to score request")?;
            if let Some(n) = top {
                ranked.truncate(n);
            }

            let out = if pretty {
                serde_json::to_string_pretty(&ranked)
            } else {
                serde_json::to_string(&ranked)
            }
            .context("failed to serialize results")?;
            println!("{out}");
        }
        Command::CheckConfig { base_dir } => {
            let config = config::load_config(&base_dir).context("failed to load configuration")?;
            println!(
                "config ok: {} position overrides, {} known ages, reference {}",
                config.position_overrides.len(),
                config.known_ages.len(),
                config.data.reference_population
            );
        }
    }

    info!("courtfit finished");
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for results).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("courtfit.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtfit=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
