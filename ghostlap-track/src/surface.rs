//! Drivable ribbon extrusion along the closed track curve
//!
//! Samples the curve at `segments + 1` evenly spaced parameters, emits a
//! left/right vertex pair per sample and stitches consecutive pairs with two
//! triangles. Output is a pure function of the points and the config, so the
//! same input always yields the same buffers in the same order.

use crate::curve::{to_waypoint, ClosedCurve};
use ghostlap_core::config::SurfaceConfig;
use ghostlap_core::model::{SurfaceMesh, Waypoint};
use ghostlap_core::TrackError;
use glam::Vec3;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct SurfaceBuilder {
    config: SurfaceConfig,
}

impl SurfaceBuilder {
    pub fn new(config: SurfaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn build(&self, points: &[Waypoint]) -> Result<SurfaceMesh, TrackError> {
        build_surface(points, &self.config)
    }
}

pub fn build_surface(points: &[Waypoint], config: &SurfaceConfig) -> Result<SurfaceMesh, TrackError> {
    let curve = ClosedCurve::new(points)?;
    let segments = config.segments.max(1);
    let half_width = config.track_width / 2.0;

    let sections = segments + 1;
    let mut positions = Vec::with_capacity(sections * 2 * 3);
    let mut centerline = Vec::with_capacity(sections);
    let mut degenerate_sections = 0;

    for sample in curve.samples(segments) {
        // horizontal perpendicular: tangent x up
        let perpendicular = sample.tangent.cross(Vec3::Y).normalize_or_zero();
        if perpendicular == Vec3::ZERO {
            degenerate_sections += 1;
        }

        // first vertex of each pair is offset along +perpendicular
        let left_edge = sample.position + perpendicular * half_width;
        let right_edge = sample.position - perpendicular * half_width;
        positions.extend_from_slice(&left_edge.to_array());
        positions.extend_from_slice(&right_edge.to_array());
        centerline.push(to_waypoint(sample.position));
    }

    let indices = ribbon_indices(segments);
    let normals = vertex_normals(&positions, &indices, segments);

    if degenerate_sections > 0 {
        warn!(
            "Surface has {} of {} zero-area cross-sections (degenerate waypoints)",
            degenerate_sections, sections
        );
    }
    debug!(
        "Built surface: {} waypoints, {} vertices, {} triangles",
        points.len(),
        positions.len() / 3,
        indices.len() / 3
    );

    Ok(SurfaceMesh {
        positions,
        normals,
        indices,
        centerline,
        degenerate_sections,
    })
}

/// Two triangles per segment between cross-sections `i` and `i + 1`
fn ribbon_indices(segments: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(segments * 6);
    for i in 0..segments as u32 {
        let base = i * 2;
        indices.extend_from_slice(&[base, base + 1, base + 2]);
        indices.extend_from_slice(&[base + 1, base + 3, base + 2]);
    }
    indices
}

/// Area-weighted average of adjacent face normals, oriented to the up side
///
/// The first and last cross-sections coincide on a closed loop, so their
/// accumulators are merged to keep lighting continuous across the seam.
fn vertex_normals(positions: &[f32], indices: &[u32], segments: usize) -> Vec<f32> {
    let vertex = |i: u32| {
        let s = i as usize * 3;
        Vec3::new(positions[s], positions[s + 1], positions[s + 2])
    };

    let mut acc = vec![Vec3::ZERO; positions.len() / 3];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (vertex(tri[0]), vertex(tri[1]), vertex(tri[2]));
        let face = (b - a).cross(c - a);
        for &i in tri {
            acc[i as usize] += face;
        }
    }

    let last = segments * 2;
    for side in 0..2 {
        let merged = acc[side] + acc[last + side];
        acc[side] = merged;
        acc[last + side] = merged;
    }

    let mut normals = Vec::with_capacity(positions.len());
    for n in acc {
        let mut n = n.normalize_or_zero();
        if n == Vec3::ZERO {
            n = Vec3::Y;
        } else if n.y < 0.0 {
            n = -n;
        }
        normals.extend_from_slice(&n.to_array());
    }
    normals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Waypoint> {
        vec![
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(100.0, 0.0, 0.0),
            Waypoint::new(100.0, 0.0, 100.0),
            Waypoint::new(0.0, 0.0, 100.0),
        ]
    }

    #[test]
    fn test_ribbon_indices_layout() {
        assert_eq!(ribbon_indices(2), vec![0, 1, 2, 1, 3, 2, 2, 3, 4, 3, 5, 4]);
    }

    #[test]
    fn test_edges_are_track_width_apart() {
        let config = SurfaceConfig {
            track_width: 20.0,
            segments: 40,
        };
        let mesh = build_surface(&square(), &config).unwrap();
        for s in 0..mesh.section_count() {
            let (l, r) = mesh.cross_section(s).unwrap();
            let width = Vec3::from_array(l).distance(Vec3::from_array(r));
            assert!((width - 20.0).abs() < 1e-3, "section {} width {}", s, width);
        }
    }

    #[test]
    fn test_centerline_is_midpoint_of_edges() {
        let mesh = build_surface(&square(), &SurfaceConfig::default()).unwrap();
        assert_eq!(mesh.centerline.len(), mesh.section_count());
        for (s, c) in mesh.centerline.iter().enumerate().step_by(37) {
            let (l, r) = mesh.cross_section(s).unwrap();
            let mid = (Vec3::from_array(l) + Vec3::from_array(r)) / 2.0;
            assert!(mid.distance(Vec3::new(c.x, c.y, c.z)) < 1e-3);
        }
    }

    #[test]
    fn test_flat_track_normals_point_up() {
        let mesh = build_surface(&square(), &SurfaceConfig::default()).unwrap();
        assert_eq!(mesh.normals.len(), mesh.positions.len());
        for n in mesh.normals.chunks_exact(3) {
            assert!((n[1] - 1.0).abs() < 1e-4, "normal {:?}", n);
        }
    }

    #[test]
    fn test_coincident_points_degrade_without_failing() {
        let p = Waypoint::new(1.0, 2.0, 3.0);
        let config = SurfaceConfig {
            track_width: 20.0,
            segments: 10,
        };
        let mesh = build_surface(&[p, p, p], &config).unwrap();
        assert_eq!(mesh.vertex_count(), 22);
        assert_eq!(mesh.degenerate_sections, 11);
        assert!(mesh.is_finite());
        assert!(mesh.ensure_non_degenerate().is_err());
    }

    #[test]
    fn test_vertical_line_is_degenerate() {
        // tangent parallel to up: no horizontal right vector
        let points = [
            Waypoint::new(0.0, 0.0, 0.0),
            Waypoint::new(0.0, 10.0, 0.0),
            Waypoint::new(0.0, 20.0, 0.0),
        ];
        let mesh = build_surface(&points, &SurfaceConfig::default()).unwrap();
        assert!(mesh.degenerate_sections > 0);
        assert!(mesh.is_finite());
    }

    #[test]
    fn test_builder_uses_config() {
        let builder = SurfaceBuilder::new(SurfaceConfig {
            track_width: 8.0,
            segments: 12,
        });
        let mesh = builder.build(&square()).unwrap();
        assert_eq!(mesh.triangle_count(), 24);
        assert_eq!(builder.config().track_width, 8.0);
    }
}
