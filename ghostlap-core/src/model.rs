//! Track and telemetry data model
//!
//! Defines the shapes exchanged between the loader, the surface builder,
//! the telemetry synthesizer and the playback session.
//!
//! Coordinate system: right-handed, world space
//! - X: east
//! - Y: up (ignored by all planar measurements)
//! - Z: north

use crate::error::TrackError;
use crate::units::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// Fewest waypoints that still describe a closed loop
pub const MIN_WAYPOINTS: usize = 3;

/// A single 3D sample point on a track's path
///
/// Serialized as a bare `[x, y, z]` array, the format track files use.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Waypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Waypoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Euclidean distance in the horizontal (x/z) plane
    pub fn planar_distance(&self, other: &Waypoint) -> f32 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Planar heading of the step from `self` to `other`
    pub fn planar_heading(&self, other: &Waypoint) -> Radians {
        Radians((other.z - self.z).atan2(other.x - self.x))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Waypoint {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Waypoint> for [f32; 3] {
    fn from(w: Waypoint) -> Self {
        w.to_array()
    }
}

/// A named closed circuit
///
/// Insertion order of `points` is the driving direction; the last point
/// connects back to the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    pub name: String,

    pub points: Vec<Waypoint>,

    /// Pre-authored telemetry; takes precedence over synthesis when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telemetry: Option<Vec<TelemetrySample>>,

    /// Free-form loader metadata (point counts, data source, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Track {
    pub fn new(name: impl Into<String>, points: Vec<Waypoint>) -> Self {
        Self {
            name: name.into(),
            points,
            telemetry: None,
            metadata: HashMap::new(),
        }
    }

    pub fn with_telemetry(mut self, telemetry: Vec<TelemetrySample>) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Authored telemetry, if any was supplied and it is non-empty
    pub fn authored_telemetry(&self) -> Option<&[TelemetrySample]> {
        self.telemetry.as_deref().filter(|t| !t.is_empty())
    }

    /// Check the point count and coordinates without building anything
    pub fn validate_points(&self) -> Result<(), TrackError> {
        validate_points(&self.points)
    }

    /// Hash of the point sequence, used as the cache identity of derived geometry
    pub fn points_fingerprint(&self) -> u64 {
        points_fingerprint(&self.points)
    }
}

/// Reject sequences that cannot form a closed loop
pub fn validate_points(points: &[Waypoint]) -> Result<(), TrackError> {
    if points.len() < MIN_WAYPOINTS {
        return Err(TrackError::InsufficientPoints {
            found: points.len(),
            required: MIN_WAYPOINTS,
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(TrackError::NonFiniteWaypoint { index });
    }
    Ok(())
}

/// Bitwise hash of a point sequence (f32 has no `Hash`, so hash the bits)
pub fn points_fingerprint(points: &[Waypoint]) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    points.len().hash(&mut hasher);
    for p in points {
        p.x.to_bits().hash(&mut hasher);
        p.y.to_bits().hash(&mut hasher);
        p.z.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

/// One instant of derived vehicle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    pub position: Waypoint,

    /// Speed in km/h
    pub speed: Kph,

    #[serde(default)]
    pub rpm: Rpm,

    /// Forward gear, 1-based
    #[serde(default = "default_gear")]
    pub gear: u8,

    /// Signed steering input, positive = turning toward increasing heading
    #[serde(default)]
    pub steering_angle: f32,

    /// Elapsed time along the lap
    #[serde(default, alias = "lapTime")]
    pub timestamp: Seconds,

    /// Throttle input (0.0 to 1.0), authored data only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<Percentage>,

    /// Brake input (0.0 to 1.0), authored data only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brake: Option<Percentage>,
}

fn default_gear() -> u8 {
    1
}

/// Renderable ribbon geometry for a closed track
///
/// `positions` and `normals` are flat xyz triples, `indices` are triangle
/// triples into them. Each cross-section contributes a left then a right
/// vertex, so vertex `2i` / `2i + 1` are the edges of sample `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,

    /// Curve positions at the sample parameters; visual reference only
    pub centerline: Vec<Waypoint>,

    /// Cross-sections whose edge vertices coincide (zero horizontal tangent)
    pub degenerate_sections: usize,
}

impl SurfaceMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of cross-sections (curve samples), segments + 1
    pub fn section_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn vertex(&self, index: usize) -> Option<[f32; 3]> {
        let start = index * 3;
        let v = self.positions.get(start..start + 3)?;
        Some([v[0], v[1], v[2]])
    }

    /// Left and right edge vertices of a cross-section
    pub fn cross_section(&self, section: usize) -> Option<([f32; 3], [f32; 3])> {
        Some((self.vertex(section * 2)?, self.vertex(section * 2 + 1)?))
    }

    pub fn is_finite(&self) -> bool {
        self.positions.iter().all(|v| v.is_finite()) && self.normals.iter().all(|v| v.is_finite())
    }

    /// Strict check for callers that cannot tolerate zero-area sections
    pub fn ensure_non_degenerate(&self) -> Result<(), TrackError> {
        if self.degenerate_sections > 0 {
            return Err(TrackError::DegenerateGeometry {
                sections: self.degenerate_sections,
            });
        }
        Ok(())
    }
}
