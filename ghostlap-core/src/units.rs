//! Type-safe wrappers for the telemetry units
//!
//! Newtypes around f32 keep km/h, RPM and seconds from being mixed up when
//! samples are passed between the synthesizer, the cursor and the HUD.
//!
//! All unit types serialize with 4 decimal places to reduce JSON payload size.

use serde::{Deserialize, Serialize};

/// Round f32 to 4 decimal places for compact JSON serialization
fn round4<S: serde::Serializer>(val: &f32, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f32((*val * 10000.0).round() / 10000.0)
}

/// Kilometres per hour
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Kph(#[serde(serialize_with = "round4")] pub f32);

impl Kph {
    /// Speed implied by covering `distance` units every source frame at `rate_hz`
    pub fn from_step(distance: f32, rate_hz: f32) -> Self {
        // units/frame * frames/s = m/s, * 3.6 = km/h
        Self(distance * rate_hz * 3.6)
    }

    /// Clamp into `[min, max]`; never panics, `max` wins if the bounds cross
    pub fn clamp(self, min: Kph, max: Kph) -> Self {
        Self(self.0.max(min.0).min(max.0))
    }
}

/// Revolutions per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Rpm(#[serde(serialize_with = "round4")] pub f32);

/// Seconds (timestamps, lap times)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Seconds(#[serde(serialize_with = "round4")] pub f32);

impl Seconds {
    pub fn from_duration(d: std::time::Duration) -> Self {
        Self(d.as_secs_f32())
    }
}

/// Radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Radians(#[serde(serialize_with = "round4")] pub f32);

impl Radians {
    /// Wrap into (-PI, PI]
    pub fn wrapped(self) -> Self {
        use std::f32::consts::{PI, TAU};
        let mut a = self.0 % TAU;
        if a > PI {
            a -= TAU;
        } else if a <= -PI {
            a += TAU;
        }
        Self(a)
    }
}

/// Percentage (0.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Percentage(#[serde(serialize_with = "round4")] pub f32);

impl Percentage {
    /// Create a new percentage, clamping to [0.0, 1.0]
    pub fn new(value: f32) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get as percentage (0-100)
    pub fn as_percent(&self) -> f32 {
        self.0 * 100.0
    }
}
