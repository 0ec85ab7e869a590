//! A loaded track ready for playback
//!
//! Owns the derived artifacts (mesh, telemetry) and the cursor. Everything a
//! renderer needs per frame is available through the query methods; only
//! `tick` and the play/pause controls mutate state.

use crate::cache::SurfaceCache;
use crate::clock::Clock;
use crate::playback::{CursorInfo, GhostOffset, PlaybackCursor, PlaybackState};
use crate::readout::{DashReadout, GhostComparison};
use chrono::{DateTime, Utc};
use ghostlap_core::model::{SurfaceMesh, TelemetrySample, Track};
use ghostlap_core::units::Seconds;
use ghostlap_core::{Config, TrackError};
use ghostlap_track::synthesize;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub struct PlaybackSession {
    track: Track,
    mesh: Arc<SurfaceMesh>,
    telemetry: Arc<Vec<TelemetrySample>>,
    telemetry_source: &'static str,
    cursor: PlaybackCursor,
    ghost: GhostOffset,
    session_id: String,
}

impl PlaybackSession {
    /// Build mesh and telemetry for `track`
    ///
    /// Either both artifacts are produced or an error is returned; nothing
    /// half-built escapes.
    pub fn build(
        track: Track,
        config: &Config,
        cache: &mut SurfaceCache,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TrackError> {
        let mesh = cache.get_or_build(&track.points, &config.surface)?;
        let telemetry = synthesize(&track, &config.telemetry)?;
        let telemetry_source = if track.authored_telemetry().is_some() {
            "authored"
        } else {
            "synthesized"
        };

        let session_id = format!("{:016x}", track.points_fingerprint());
        let cursor = PlaybackCursor::new(telemetry.len(), clock);

        info!(
            "Session {} ready: {:?}, {} waypoints, {} samples ({}), {} triangles",
            session_id,
            track.name,
            track.points.len(),
            telemetry.len(),
            telemetry_source,
            mesh.triangle_count()
        );

        Ok(Self {
            track,
            mesh,
            telemetry: Arc::new(telemetry),
            telemetry_source,
            cursor,
            ghost: GhostOffset(config.playback.ghost_offset),
            session_id,
        })
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn current_mesh(&self) -> &Arc<SurfaceMesh> {
        &self.mesh
    }

    pub fn telemetry(&self) -> &Arc<Vec<TelemetrySample>> {
        &self.telemetry
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    pub fn ghost_offset(&self) -> GhostOffset {
        self.ghost
    }

    pub fn set_ghost_offset(&mut self, offset: GhostOffset) {
        self.ghost = offset;
    }

    pub fn current_sample(&self) -> Option<&TelemetrySample> {
        self.telemetry.get(self.cursor.index()?)
    }

    /// Ghost sample, only when the ghost offset is non-zero
    pub fn ghost_sample(&self) -> Option<&TelemetrySample> {
        self.telemetry.get(self.cursor.ghost_index(self.ghost)?)
    }

    pub fn lap_time(&self) -> Seconds {
        self.cursor.lap_time()
    }

    pub fn is_playing(&self) -> bool {
        self.cursor.is_playing()
    }

    pub fn play(&mut self) {
        self.cursor.play();
    }

    pub fn pause(&mut self) {
        self.cursor.pause();
    }

    pub fn toggle(&mut self) -> PlaybackState {
        self.cursor.toggle()
    }

    /// Advance one sample and return the new frame
    pub fn tick(&mut self) -> Option<PlaybackFrame> {
        let tick = self.cursor.tick()?;
        let mut frame = self.frame()?;
        frame.completed_lap = tick.completed_lap;
        Some(frame)
    }

    /// Snapshot of the current position; `None` when there is nothing to play
    pub fn frame(&self) -> Option<PlaybackFrame> {
        let index = self.cursor.index()?;
        let sample = self.telemetry.get(index)?.clone();
        let ghost = self.cursor.ghost_index(self.ghost).and_then(|gi| {
            self.telemetry.get(gi).map(|s| GhostFrame {
                index: gi,
                sample: s.clone(),
            })
        });

        Some(PlaybackFrame {
            timestamp: Utc::now(),
            index,
            sample,
            ghost,
            lap_time: self.cursor.lap_time(),
            laps_completed: self.cursor.laps_completed(),
            completed_lap: None,
        })
    }

    pub fn dash(&self) -> Option<DashReadout> {
        Some(DashReadout::new(self.current_sample()?, self.lap_time()))
    }

    pub fn comparison(&self) -> Option<GhostComparison> {
        Some(GhostComparison::new(
            self.current_sample()?,
            self.ghost_sample()?,
        ))
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.session_id.clone(),
            track_name: self.track.name.clone(),
            waypoints: self.track.points.len(),
            samples: self.telemetry.len(),
            telemetry_source: self.telemetry_source.to_string(),
            vertices: self.mesh.vertex_count(),
            triangles: self.mesh.triangle_count(),
            degenerate_sections: self.mesh.degenerate_sections,
            ghost_offset: self.ghost.0,
            cursor: self.cursor.info(),
        }
    }
}

/// Per-tick output handed to the renderer
#[derive(Debug, Clone, Serialize)]
pub struct PlaybackFrame {
    /// Wall-clock time the frame was produced
    pub timestamp: DateTime<Utc>,
    pub index: usize,
    pub sample: TelemetrySample,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ghost: Option<GhostFrame>,
    pub lap_time: Seconds,
    pub laps_completed: u32,
    /// Lap time of the lap that finished on this frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_lap: Option<Seconds>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GhostFrame {
    pub index: usize,
    pub sample: TelemetrySample,
}

/// Serializable session summary
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub track_name: String,
    pub waypoints: usize,
    pub samples: usize,
    pub telemetry_source: String,
    pub vertices: usize,
    pub triangles: usize,
    pub degenerate_sections: usize,
    pub ghost_offset: i64,
    pub cursor: CursorInfo,
}
