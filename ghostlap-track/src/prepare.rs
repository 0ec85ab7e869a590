//! Turning raw GPS laps into track waypoints
//!
//! Logged laps carry thousands of noisy fixes; tracks want a few hundred
//! smooth points in a local metric frame.

use ghostlap_core::model::Waypoint;
use tracing::debug;

/// Mean Earth radius in metres
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const DEFAULT_TARGET_POINTS: usize = 500;
pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// A GPS fix in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsFix {
    pub lat: f64,
    pub lon: f64,
}

impl GpsFix {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Equirectangular projection around the first fix
///
/// x is metres east, z is metres north, y is 0 (flat track). Accurate enough
/// for areas the size of a circuit.
pub fn project_gps(fixes: &[GpsFix]) -> Vec<Waypoint> {
    let Some(origin) = fixes.first() else {
        return Vec::new();
    };
    let origin_lat = origin.lat.to_radians();
    let origin_lon = origin.lon.to_radians();
    let cos_lat = origin_lat.cos();

    fixes
        .iter()
        .map(|fix| {
            let x = EARTH_RADIUS_M * (fix.lon.to_radians() - origin_lon) * cos_lat;
            let z = EARTH_RADIUS_M * (fix.lat.to_radians() - origin_lat);
            Waypoint::new(x as f32, 0.0, z as f32)
        })
        .collect()
}

/// Keep `target` points at evenly spaced indices
pub fn downsample(points: &[Waypoint], target: usize) -> Vec<Waypoint> {
    if target == 0 || points.len() <= target {
        return points.to_vec();
    }
    let len = points.len();
    (0..target).map(|i| points[i * len / target]).collect()
}

/// Centered moving average; the window shrinks at either end of the sequence
pub fn smooth(points: &[Waypoint], window: usize) -> Vec<Waypoint> {
    if window == 0 || points.len() < window {
        return points.to_vec();
    }
    let half = window / 2;
    (0..points.len())
        .map(|i| {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(points.len());
            let slice = &points[start..end];
            let n = slice.len() as f32;
            let (x, y, z) = slice
                .iter()
                .fold((0.0, 0.0, 0.0), |(x, y, z), p| (x + p.x, y + p.y, z + p.z));
            Waypoint::new(x / n, y / n, z / n)
        })
        .collect()
}

/// Drop a trailing copy of the first point
///
/// Older track files close the loop explicitly; the curve closes itself and a
/// repeated point would leave a zero-length span at the seam.
pub fn strip_closing_duplicate(mut points: Vec<Waypoint>) -> Vec<Waypoint> {
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Downsample, smooth and de-duplicate a raw lap
pub fn prepare_points(raw: &[Waypoint], target: usize, window: usize) -> Vec<Waypoint> {
    let points = downsample(raw, target);
    let points = smooth(&points, window);
    let points = strip_closing_duplicate(points);
    debug!("Prepared {} raw points into {} waypoints", raw.len(), points.len());
    points
}
