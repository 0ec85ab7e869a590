//! Tunables for surface building, telemetry synthesis and playback
//!
//! Every section defaults to the stock values, so a config file only needs
//! the keys it changes. Environment variables are applied on top of the file.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_TRACK_WIDTH: &str = "GHOSTLAP_TRACK_WIDTH";
pub const ENV_SEGMENTS: &str = "GHOSTLAP_SEGMENTS";
pub const ENV_TICK_MS: &str = "GHOSTLAP_TICK_MS";
pub const ENV_GHOST_OFFSET: &str = "GHOSTLAP_GHOST_OFFSET";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub surface: SurfaceConfig,
    pub telemetry: TelemetryConfig,
    pub playback: PlaybackConfig,
}

/// Ribbon extrusion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Full width of the ribbon in world units
    pub track_width: f32,
    /// Number of curve segments; the mesh has `segments + 1` cross-sections
    pub segments: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            track_width: 20.0,
            segments: 500,
        }
    }
}

/// Constants of the position-to-telemetry heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Assumed capture rate of the source points
    pub source_rate_hz: f32,
    pub speed_min_kph: f32,
    pub speed_max_kph: f32,
    /// Upshift points in km/h; gear = 1 + thresholds strictly exceeded
    pub gear_thresholds_kph: Vec<f32>,
    pub rpm_per_kph: f32,
    pub rpm_base: f32,
    pub rpm_ceiling: f32,
    pub steering_gain: f32,
    /// Lap time step between consecutive synthesized samples
    pub sample_interval_secs: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            source_rate_hz: 60.0,
            speed_min_kph: 60.0,
            speed_max_kph: 250.0,
            gear_thresholds_kph: vec![40.0, 80.0, 120.0, 160.0, 200.0],
            rpm_per_kph: 50.0,
            rpm_base: 2000.0,
            rpm_ceiling: 8000.0,
            steering_gain: 100.0,
            sample_interval_secs: 0.05,
        }
    }
}

/// Cursor cadence and ghost comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub tick_interval_ms: u64,
    /// Index offset of the ghost cursor; 0 disables the ghost
    pub ghost_offset: i64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
            ghost_offset: 0,
        }
    }
}

impl PlaybackConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Config {
    /// Read a JSON config file; missing keys fall back to defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GHOSTLAP_*` overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&lookup, ENV_TRACK_WIDTH) {
            self.surface.track_width = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_SEGMENTS) {
            self.surface.segments = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_TICK_MS) {
            self.playback.tick_interval_ms = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_GHOST_OFFSET) {
            self.playback.ghost_offset = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.surface;
        if s.segments == 0 {
            return Err(ConfigError::invalid("surface.segments", "must be at least 1"));
        }
        if !s.track_width.is_finite() || s.track_width < 0.0 {
            return Err(ConfigError::invalid(
                "surface.track_width",
                format!("must be a non-negative number, got {}", s.track_width),
            ));
        }

        let t = &self.telemetry;
        if !(t.speed_min_kph <= t.speed_max_kph) {
            return Err(ConfigError::invalid(
                "telemetry.speed_min_kph",
                format!(
                    "{} exceeds speed_max_kph {}",
                    t.speed_min_kph, t.speed_max_kph
                ),
            ));
        }
        if t.gear_thresholds_kph.windows(2).any(|w| !(w[0] <= w[1])) {
            return Err(ConfigError::invalid(
                "telemetry.gear_thresholds_kph",
                "must be sorted ascending",
            ));
        }

        if self.playback.tick_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "playback.tick_interval_ms",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

fn parse_override<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
