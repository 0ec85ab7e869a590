//! Track geometry and telemetry derivation for ghostlap
//!
//! The surface builder and the telemetry synthesizer are independent; both
//! only read the waypoint sequence.

pub mod curve;
pub mod prepare;
pub mod surface;
pub mod synth;

pub use curve::ClosedCurve;
pub use surface::{build_surface, SurfaceBuilder};
pub use synth::{synthesize, Synthesizer};
