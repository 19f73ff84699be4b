//! Mood Bistro - Terminal Front-End
//!
//! Runs one evening at the bistro on stdin/stdout. Baron's lines and
//! narration are printed as they arrive; every served cocktail is written as
//! an SVG file into the output directory, next to `baron.svg`, a portrait that
//! follows Baron's state.
//!
//! # Usage
//!
//! ```bash
//! # Start with defaults (GEMINI_API_KEY must be set)
//! mood-bistro
//!
//! # With config file and a music player
//! mood-bistro --config ~/bistro.toml --player "mpv --no-video --loop=inf --volume={volume} {url}"
//!
//! # Verbose logging
//! RUST_LOG=debug mood-bistro
//! ```
//!
//! # Commands
//!
//! - `/reveal`: turn over the latest cocktail card
//! - `/music`: toggle the background music
//! - `/quit`: leave the bistro

mod surface;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};

use bistro_core::config::{load_config, ConfigOverrides};
use bistro_core::{
    AudioHandle, Conductor, GeminiBackend, HistoryPolicy, NoAudio, PlayerProcess, TokioPacer,
};

/// Mood Bistro - talk to Baron, get a cocktail for your mood
#[derive(Parser, Debug)]
#[command(name = "mood-bistro")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "BISTRO_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model to use (overrides config file and BISTRO_MODEL)
    #[arg(short = 'm', long, value_name = "MODEL")]
    model: Option<String>,

    /// Which earlier messages Baron sees (plain_only, include_artifacts)
    #[arg(long, value_name = "POLICY")]
    history_policy: Option<HistoryPolicy>,

    /// Directory for cocktail illustrations
    #[arg(short = 'o', long, default_value = "cocktails", value_name = "DIR")]
    out_dir: PathBuf,

    /// Music player command template ({url} and {volume} are substituted)
    #[arg(long, value_name = "COMMAND")]
    player: Option<String>,

    /// Never play music
    #[arg(long)]
    no_music: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "BISTRO_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

/// Initialize logging with the specified level
///
/// Logs go to stderr so they never interleave with the conversation on stdout.
fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("bistro_daemon={level},bistro_core={level}"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level);

    info!("Mood Bistro starting");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let overrides = ConfigOverrides {
        config_path: args.config,
        model: args.model,
        history_policy: args.history_policy,
        player: args.player,
        no_music: args.no_music,
    };
    let config = load_config(&overrides).context("Failed to load configuration")?;

    if let Some(ref path) = config.config_file_path {
        info!(config_path = ?path, "Config file");
    }
    info!(
        model = %config.backend.model,
        source = %config.source("backend.model"),
        "Model"
    );

    let backend = GeminiBackend::from_settings(&config.backend)
        .context("Failed to set up the Gemini backend")?;

    let audio: Box<dyn AudioHandle> = match config.audio.player {
        Some(ref template) => Box::new(
            PlayerProcess::from_template(template, &config.audio.track_url, config.audio.volume)
                .context("Invalid player command")?,
        ),
        None => Box::new(NoAudio),
    };

    tokio::fs::create_dir_all(&args.out_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {:?}", args.out_dir))?;
    info!(out_dir = ?args.out_dir, "Output directory");

    let (tx, rx) = mpsc::channel(256);
    let conductor = Conductor::with_components(
        backend,
        config.conductor,
        Arc::new(TokioPacer),
        audio,
        tx,
    );

    let printer = surface::Printer::new(args.out_dir);
    let printer_task = tokio::spawn(printer.run(rx));

    let result = surface::run_stdin(conductor).await;

    if let Err(e) = printer_task.await {
        error!(error = %e, "Printer task failed");
    }

    match result {
        Ok(()) => {
            info!("Good night");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Stopped with error");
            Err(e)
        }
    }
}
