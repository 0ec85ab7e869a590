//! Fixed-cadence playback driver
//!
//! This module handles:
//! - Ticking the active session at the configured interval
//! - Broadcasting each new frame to subscribers
//! - Stopping when the cancellation token fires
//!
//! Late ticks are delayed rather than bunched, so every tick moves the cursor
//! exactly one sample.

use crate::readout::format_lap_time;
use crate::state::PlayerState;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

const MIN_TICK: Duration = Duration::from_millis(1);

/// Main driver loop
pub async fn run(state: PlayerState, cancel: CancellationToken) {
    // tokio intervals reject a zero period
    let period = state.config.playback.tick_interval().max(MIN_TICK);
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick of a tokio interval completes immediately
    ticker.tick().await;

    info!("Playback driver started ({:?} per tick)", period);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Playback driver stopped");
                break;
            }
            _ = ticker.tick() => tick_cycle(&state).await,
        }
    }
}

/// Advance the active session and broadcast the frame
async fn tick_cycle(state: &PlayerState) {
    let Some(frame) = state.advance().await else {
        // Paused, idle or no session loaded
        return;
    };

    if let Some(lap) = frame.completed_lap {
        info!("Lap {} completed in {}", frame.laps_completed, format_lap_time(lap));
    }
    debug!("Frame {} at lap time {:.3}s", frame.index, frame.lap_time.0);

    // Ignore error if no receivers (they'll get the next frame)
    let _ = state.frame_tx.send(frame);
}

