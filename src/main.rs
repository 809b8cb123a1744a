// src/main.rs
mod app;
mod data;
mod error;
mod gesture;
mod outfits;
mod tracking;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use app::{AppSettings, MirrorApp};
use data::RecordedSession;
use gesture::GestureConfig;
use tracking::{HandSource, ReplaySource, SimulatedHands, Viewport, SIMULATION_CYCLE};

#[derive(Parser, Debug)]
#[command(name = "toon_mirror", about = "Gesture-driven avatar mirror")]
struct Cli {
    /// Replay a recorded landmark session (JSON) instead of the simulation
    #[arg(long)]
    session: Option<PathBuf>,

    /// Gesture threshold overrides (JSON, partial files allowed)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after N ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// Ticks per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Viewport width in pixels (simulation only)
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in pixels (simulation only)
    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Where session exports are written
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Session name (default: timestamped)
    #[arg(long)]
    name: Option<String>,

    /// Pace ticks in real time
    #[arg(long)]
    realtime: bool,

    /// Save the landmarks fed to the controller for later replay
    #[arg(long)]
    record: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toon_mirror=info".into()),
        )
        .init();

    info!("toon_mirror v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => app::load_gesture_config(path)?,
        None => GestureConfig::default(),
    };

    let mut settings = AppSettings {
        ticks_per_second: cli.fps,
        realtime: cli.realtime,
        max_ticks: cli.ticks,
        record_session: cli.record,
        ..AppSettings::default()
    };
    if let Some(dir) = cli.output_dir {
        settings.output_directory = dir;
    }

    let source: Box<dyn HandSource> = match &cli.session {
        Some(path) => {
            let session = RecordedSession::load(path)
                .with_context(|| format!("Failed to load session {}", path.display()))?;
            settings.viewport = session.viewport;
            let frames = session
                .into_frames()
                .with_context(|| format!("Malformed session {}", path.display()))?;
            let replay = ReplaySource::new(path.display().to_string(), frames);
            info!("replaying {} frames from {}", replay.remaining(), path.display());
            Box::new(replay)
        }
        None => {
            settings.viewport = Viewport::new(cli.width, cli.height)?;
            if settings.max_ticks.is_none() && !settings.realtime {
                settings.max_ticks = Some(SIMULATION_CYCLE);
            }
            Box::new(SimulatedHands::new(settings.viewport, config.button_inset_px))
        }
    };

    let mut mirror = MirrorApp::new(source, config, settings, cli.name)?;
    let summary = mirror.run().await?;

    println!(
        "{}: {} ticks, outfit {}, scale {:.2}",
        summary.session_name, summary.total_ticks, summary.final_outfit, summary.final_scale
    );
    Ok(())
}
