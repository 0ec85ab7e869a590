//! ghostlap
//!
//! Loads a track, builds its surface and telemetry, and plays it back at a
//! fixed cadence until interrupted.

use anyhow::{Context, Result};
use ghostlap_core::Config;
use ghostlap_player::readout::DashReadout;
use ghostlap_player::{driver, loader, state};
use std::path::PathBuf;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args_os().skip(1);
    let track_path: PathBuf = args
        .next()
        .map(PathBuf::from)
        .context("usage: ghostlap <track.json> [config.json]")?;
    let config_path = args.next().map(PathBuf::from);

    let config = match &config_path {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    }
    .with_env();

    info!("Starting ghostlap");

    let track = loader::load_track(&track_path)?;
    let state = state::PlayerState::new(config)?;
    let session = state.load_track(Some(track)).await?;
    info!(
        "Playing {:?}: {} samples, {} triangles",
        session.track_name, session.samples, session.triangles
    );

    let mut frames = state.subscribe();
    let cancel = CancellationToken::new();
    let driver = tokio::spawn(driver::run(state.clone(), cancel.clone()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
            frame = frames.recv() => match frame {
                Ok(frame) => {
                    let dash = DashReadout::new(&frame.sample, frame.lap_time);
                    debug!(
                        "{} km/h  {} rpm  gear {}  {}",
                        dash.speed_kph, dash.rpm, dash.gear, dash.lap_time
                    );
                }
                Err(RecvError::Lagged(n)) => warn!("Display lagged, skipped {} frames", n),
                Err(RecvError::Closed) => break,
            },
        }
    }

    cancel.cancel();
    driver.await?;
    Ok(())
}
