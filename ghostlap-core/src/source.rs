//! Telemetry source trait definition

use crate::error::TrackError;
use crate::model::{TelemetrySample, Track};

/// A way of obtaining the telemetry sequence for a track
///
/// Each source is responsible for:
/// - Deciding whether it can serve a given track
/// - Producing a complete, index-ordered sample sequence, or an error
///
/// Sources never return a partially populated sequence.
pub trait TelemetrySource: Send + Sync {
    /// Get the name of this source (e.g., "authored", "synthesized")
    fn name(&self) -> &str;

    /// Check whether this source can produce telemetry for `track`
    ///
    /// This should be a lightweight check that does no derivation work.
    fn accepts(&self, track: &Track) -> bool;

    /// Produce the telemetry sequence for `track`
    fn produce(&self, track: &Track) -> Result<Vec<TelemetrySample>, TrackError>;
}

/// Pass-through for telemetry shipped with the track file
///
/// Authored samples are returned verbatim; nothing beyond non-emptiness is
/// checked. Producing from a track without authored samples is `MissingTrack`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuthoredTelemetry;

impl TelemetrySource for AuthoredTelemetry {
    fn name(&self) -> &str {
        "authored"
    }

    fn accepts(&self, track: &Track) -> bool {
        track.authored_telemetry().is_some()
    }

    fn produce(&self, track: &Track) -> Result<Vec<TelemetrySample>, TrackError> {
        track
            .authored_telemetry()
            .map(<[TelemetrySample]>::to_vec)
            .ok_or(TrackError::MissingTrack)
    }
}
