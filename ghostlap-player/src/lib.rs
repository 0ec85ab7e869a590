//! ghostlap player
//!
//! Session management and the fixed-cadence playback driver, exposed as a
//! library for integration testing.

pub mod cache;
pub mod clock;
pub mod driver;
pub mod loader;
pub mod playback;
pub mod readout;
pub mod session;
pub mod state;
