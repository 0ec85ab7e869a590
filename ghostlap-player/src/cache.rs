//! Memoized surface geometry
//!
//! Holds the last mesh built and the identity it was built from. A rebuild
//! only happens when the point sequence or surface settings change.

use ghostlap_core::config::SurfaceConfig;
use ghostlap_core::model::{points_fingerprint, SurfaceMesh, Waypoint};
use ghostlap_core::TrackError;
use ghostlap_track::build_surface;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct SurfaceCache {
    entry: Option<(u64, Arc<SurfaceMesh>)>,
    hits: u64,
    misses: u64,
}

impl SurfaceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        points: &[Waypoint],
        config: &SurfaceConfig,
    ) -> Result<Arc<SurfaceMesh>, TrackError> {
        let key = cache_key(points, config);
        if let Some((cached, mesh)) = &self.entry {
            if *cached == key {
                self.hits += 1;
                debug!("Surface cache hit ({:016x})", key);
                return Ok(mesh.clone());
            }
        }

        self.misses += 1;
        let mesh = Arc::new(build_surface(points, config)?);
        self.entry = Some((key, mesh.clone()));
        Ok(mesh)
    }

    pub fn needs_rebuild(&self, points: &[Waypoint], config: &SurfaceConfig) -> bool {
        match &self.entry {
            None => true,
            Some((cached, _)) => *cached != cache_key(points, config),
        }
    }

    pub fn clear(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

fn cache_key(points: &[Waypoint], config: &SurfaceConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    points_fingerprint(points).hash(&mut hasher);
    config.track_width.to_bits().hash(&mut hasher);
    config.segments.hash(&mut hasher);
    hasher.finish()
}
