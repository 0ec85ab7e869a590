//! Dashboard and ghost-comparison values for the HUD

use ghostlap_core::model::TelemetrySample;
use ghostlap_core::units::Seconds;
use serde::Serialize;

/// `m:ss.sss`, minutes unpadded
pub fn format_lap_time(time: Seconds) -> String {
    let ms = (time.0.max(0.0) * 1000.0).round() as u64;
    let (mins, ms) = (ms / 60_000, ms % 60_000);
    format!("{}:{:02}.{:03}", mins, ms / 1000, ms % 1000)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashReadout {
    pub speed_kph: i32,
    pub rpm: i32,
    pub gear: u8,
    pub lap_time: String,
}

impl DashReadout {
    pub fn new(sample: &TelemetrySample, lap_time: Seconds) -> Self {
        Self {
            speed_kph: sample.speed.0.round() as i32,
            rpm: sample.rpm.0.round() as i32,
            gear: sample.gear,
            lap_time: format_lap_time(lap_time),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GhostComparison {
    pub player_lap_time: Seconds,
    pub ghost_lap_time: Seconds,
    /// Positive when the player is behind the ghost
    pub delta: Seconds,
}

impl GhostComparison {
    pub fn new(live: &TelemetrySample, ghost: &TelemetrySample) -> Self {
        Self {
            player_lap_time: live.timestamp,
            ghost_lap_time: ghost.timestamp,
            delta: Seconds(live.timestamp.0 - ghost.timestamp.0),
        }
    }

    pub fn delta_text(&self) -> String {
        let sign = if self.delta.0 > 0.0 { "+" } else { "" };
        format!("{}{:.3}s", sign, self.delta.0)
    }
}
