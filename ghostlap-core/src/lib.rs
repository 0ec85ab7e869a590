//! ghostlap Core Library
//!
//! This crate provides the shared data model, unit types, error taxonomy,
//! configuration and telemetry source trait for building and replaying
//! circuit laps.

pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod units;

pub use config::Config;
pub use error::{ConfigError, TrackError};
pub use model::{SurfaceMesh, TelemetrySample, Track, Waypoint};
pub use source::TelemetrySource;
