//! Playback cursor and ghost offset
//!
//! The cursor walks a cyclic telemetry sequence one index per tick and keeps
//! the lap timer. The ghost is a read-only view of the same sequence shifted
//! by a fixed number of samples.

use crate::clock::Clock;
use ghostlap_core::units::Seconds;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    Playing,
    Paused,
}

/// Result of one cursor advance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub index: usize,
    /// Set on the tick that wrapped past the last sample
    pub completed_lap: Option<Seconds>,
}

/// Cursor over a cyclic telemetry sequence of `len` samples
pub struct PlaybackCursor {
    clock: Arc<dyn Clock>,
    len: usize,
    index: usize,
    playing: bool,
    lap_start: Instant,
    accumulated: Duration,
    laps_completed: u32,
}

impl PlaybackCursor {
    /// A new cursor starts playing at index 0
    pub fn new(len: usize, clock: Arc<dyn Clock>) -> Self {
        let lap_start = clock.now();
        Self {
            clock,
            len,
            index: 0,
            playing: true,
            lap_start,
            accumulated: Duration::ZERO,
            laps_completed: 0,
        }
    }

    /// No samples to play; ticks do nothing and there is no current index
    pub fn is_idle(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn index(&self) -> Option<usize> {
        (!self.is_idle()).then_some(self.index)
    }

    pub fn state(&self) -> PlaybackState {
        if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn laps_completed(&self) -> u32 {
        self.laps_completed
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.lap_start = self.clock.now();
            self.playing = true;
        }
    }

    /// Stop advancing; the lap timer freezes until `play`
    pub fn pause(&mut self) {
        if self.playing {
            self.accumulated += self.clock.now().saturating_duration_since(self.lap_start);
            self.playing = false;
        }
    }

    pub fn toggle(&mut self) -> PlaybackState {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
        self.state()
    }

    /// Advance exactly one index
    ///
    /// Returns `None` while paused or idle. Stepping past the last sample
    /// wraps to 0 and restarts the lap timer.
    pub fn tick(&mut self) -> Option<Tick> {
        if !self.playing || self.is_idle() {
            return None;
        }

        if self.index + 1 >= self.len {
            let lap_time = self.lap_time();
            self.index = 0;
            self.accumulated = Duration::ZERO;
            self.lap_start = self.clock.now();
            self.laps_completed += 1;
            return Some(Tick {
                index: 0,
                completed_lap: Some(lap_time),
            });
        }

        self.index += 1;
        Some(Tick {
            index: self.index,
            completed_lap: None,
        })
    }

    /// Time on the current lap
    pub fn lap_time(&self) -> Seconds {
        let running = if self.playing {
            self.clock.now().saturating_duration_since(self.lap_start)
        } else {
            Duration::ZERO
        };
        Seconds::from_duration(self.accumulated + running)
    }

    pub fn ghost_index(&self, offset: GhostOffset) -> Option<usize> {
        offset.apply(self.index()?, self.len)
    }

    pub fn info(&self) -> CursorInfo {
        CursorInfo {
            index: self.index(),
            len: self.len,
            state: self.state(),
            lap_time: self.lap_time(),
            laps_completed: self.laps_completed,
        }
    }
}

/// Index shift of the ghost cursor; 0 disables the ghost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GhostOffset(pub i64);

impl GhostOffset {
    pub fn is_enabled(&self) -> bool {
        self.0 != 0
    }

    /// `(live + offset) mod len`, or `None` when disabled or empty
    pub fn apply(&self, live: usize, len: usize) -> Option<usize> {
        if !self.is_enabled() || len == 0 {
            return None;
        }
        let len = len as i64;
        Some((live as i64 + self.0).rem_euclid(len) as usize)
    }
}

/// Serializable cursor snapshot
#[derive(Debug, Clone, Serialize)]
pub struct CursorInfo {
    pub index: Option<usize>,
    pub len: usize,
    pub state: PlaybackState,
    pub lap_time: Seconds,
    pub laps_completed: u32,
}
