//! Telemetry synthesized from waypoint spacing and heading
//!
//! Produces one sample per waypoint, index-aligned with the track. The
//! mapping is a dashboard heuristic, not a vehicle model: speed comes from
//! the planar step to the next waypoint, RPM and gear follow from speed, and
//! steering follows the heading change across the waypoint.

use ghostlap_core::config::TelemetryConfig;
use ghostlap_core::model::{validate_points, TelemetrySample, Track, Waypoint};
use ghostlap_core::source::{AuthoredTelemetry, TelemetrySource};
use ghostlap_core::units::*;
use ghostlap_core::TrackError;
use tracing::debug;

// =============================================================================
// Per-sample formulas
// =============================================================================

/// 1 + number of thresholds strictly exceeded
///
/// Sitting exactly on a threshold stays in the lower gear.
pub fn gear_for_speed(speed: Kph, thresholds: &[f32]) -> u8 {
    let exceeded = thresholds.iter().filter(|&&th| speed.0 > th).count();
    1 + exceeded as u8
}

pub fn rpm_for_speed(speed: Kph, config: &TelemetryConfig) -> Rpm {
    Rpm((speed.0 * config.rpm_per_kph + config.rpm_base).min(config.rpm_ceiling))
}

/// Step speed toward `next`, clamped to the configured envelope
pub fn speed_for_step(point: &Waypoint, next: &Waypoint, config: &TelemetryConfig) -> Kph {
    Kph::from_step(point.planar_distance(next), config.source_rate_hz).clamp(
        Kph(config.speed_min_kph),
        Kph(config.speed_max_kph),
    )
}

/// Signed heading change from the incoming to the outgoing step, scaled by gain
pub fn steering_for_turn(prev: &Waypoint, point: &Waypoint, next: &Waypoint, gain: f32) -> f32 {
    let incoming = prev.planar_heading(point);
    let outgoing = point.planar_heading(next);
    Radians(outgoing.0 - incoming.0).wrapped().0 * gain
}

// =============================================================================
// Synthesizer
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: TelemetryConfig,
}

impl Synthesizer {
    pub fn new(config: TelemetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    /// Derive samples from the point sequence alone, ignoring authored data
    pub fn derive(&self, points: &[Waypoint]) -> Result<Vec<TelemetrySample>, TrackError> {
        validate_points(points)?;
        let cfg = &self.config;
        let n = points.len();

        let samples = (0..n)
            .map(|i| {
                let prev = &points[(i + n - 1) % n];
                let point = &points[i];
                let next = &points[(i + 1) % n];

                let speed = speed_for_step(point, next, cfg);
                TelemetrySample {
                    position: *point,
                    speed,
                    rpm: rpm_for_speed(speed, cfg),
                    gear: gear_for_speed(speed, &cfg.gear_thresholds_kph),
                    steering_angle: steering_for_turn(prev, point, next, cfg.steering_gain),
                    timestamp: Seconds(i as f32 * cfg.sample_interval_secs),
                    throttle: None,
                    brake: None,
                }
            })
            .collect();

        Ok(samples)
    }
}

impl TelemetrySource for Synthesizer {
    fn name(&self) -> &str {
        "synthesized"
    }

    fn accepts(&self, _track: &Track) -> bool {
        true
    }

    fn produce(&self, track: &Track) -> Result<Vec<TelemetrySample>, TrackError> {
        self.derive(&track.points)
    }
}

/// Telemetry for `track`: authored samples when present, otherwise synthesized
pub fn synthesize(track: &Track, config: &TelemetryConfig) -> Result<Vec<TelemetrySample>, TrackError> {
    let synthesizer = Synthesizer::new(config.clone());
    let sources: [&dyn TelemetrySource; 2] = [&AuthoredTelemetry, &synthesizer];

    let source = sources
        .into_iter()
        .find(|s| s.accepts(track))
        .unwrap_or(&synthesizer);

    let samples = source.produce(track)?;
    debug!(
        "Telemetry for {:?}: {} samples ({})",
        track.name,
        samples.len(),
        source.name()
    );
    Ok(samples)
}
