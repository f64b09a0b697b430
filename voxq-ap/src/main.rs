//! voxq Audio Player (voxq-ap) - Main entry point
//!
//! Loads configuration, starts the playback worker and serves the HTTP API
//! until SIGINT/SIGTERM.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxq_ap::api::{self, AppState};
use voxq_ap::audio::CpalSink;
use voxq_ap::config::{Config, ConfigOverrides};
use voxq_ap::tts::StreamElementsProvider;
use voxq_ap::PlaybackController;

/// Polls (50 ms apart) spent waiting for the worker after shutdown
const WORKER_EXIT_POLLS: u32 = 20;

/// Command-line arguments for voxq-ap
#[derive(Parser, Debug)]
#[command(name = "voxq-ap")]
#[command(about = "Text-to-speech API server with a local playback queue")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "VOXQ_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Directory generated audio is written to
    #[arg(short, long, env = "VOXQ_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Output device name
    #[arg(short, long, env = "VOXQ_AUDIO_DEVICE")]
    device: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = ConfigOverrides {
        port: args.port,
        output_dir: args.output_dir,
        device: args.device,
    };
    let config = Config::load(args.config.as_deref(), overrides)
        .await
        .context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting voxq Audio Player {} ({}, {} build, built {}) on port {}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_PROFILE"),
        env!("BUILD_TIMESTAMP"),
        config.port
    );
    match &config.source {
        Some(path) => info!("Configuration: {}", path.display()),
        None => info!("Configuration: built-in defaults"),
    }

    voxq_common::config::ensure_output_dir(&config.output_dir).with_context(|| {
        format!("Failed to create output directory {}", config.output_dir.display())
    })?;
    info!("Output directory: {}", config.output_dir.display());

    let sink = Arc::new(CpalSink::new(
        config.audio.device.clone(),
        config.audio.buffer_frames,
    ));
    let controller = Arc::new(
        PlaybackController::start(sink, config.playback_options())
            .context("Failed to start playback worker")?,
    );

    let tts = Arc::new(
        StreamElementsProvider::new(config.stream_elements())
            .context("Failed to initialize TTS provider")?,
    );

    let app = api::create_router(AppState {
        controller: Arc::clone(&controller),
        tts,
        output_dir: config.output_dir.clone(),
        port: config.port,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    controller.shutdown();
    for _ in 0..WORKER_EXIT_POLLS {
        if controller.worker_finished() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    if !controller.worker_finished() {
        warn!("Playback worker still running at exit");
    }

    served.context("Server error")?;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
