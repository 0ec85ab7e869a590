//! Closed centripetal Catmull-Rom curve through a waypoint loop
//!
//! The parameter `t` runs over `[0, 1]` and is split evenly between the
//! control-point spans: `t * N` selects span `floor(t * N)` and the local
//! weight inside it. `t = 0` and `t = 1` both land on the first waypoint, so
//! the loop closes exactly.

use ghostlap_core::model::{validate_points, Waypoint};
use ghostlap_core::TrackError;
use glam::Vec3;

/// Knot spacings below this fall back to a unit spacing
const MIN_KNOT_SPACING: f32 = 1e-4;

/// Position and unit tangent at a curve parameter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    /// Unit direction of travel, or zero where the derivative vanishes
    pub tangent: Vec3,
}

#[derive(Debug, Clone)]
pub struct ClosedCurve {
    points: Vec<Vec3>,
}

impl ClosedCurve {
    pub fn new(waypoints: &[Waypoint]) -> Result<Self, TrackError> {
        validate_points(waypoints)?;
        Ok(Self {
            points: waypoints.iter().map(|w| to_vec3(*w)).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn sample(&self, t: f32) -> CurveSample {
        let (span, weight) = self.span(t);
        let cubic = self.span_cubic(span);
        CurveSample {
            position: cubic.position(weight),
            tangent: cubic.derivative(weight).normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        let (span, weight) = self.span(t);
        self.span_cubic(span).position(weight)
    }

    /// `count + 1` samples at `i / count`, both ends included
    pub fn samples(&self, count: usize) -> impl Iterator<Item = CurveSample> + '_ {
        (0..=count).map(move |i| self.sample(i as f32 / count as f32))
    }

    fn span(&self, t: f32) -> (usize, f32) {
        let n = self.points.len();
        let p = n as f32 * t;
        let whole = p.floor();
        let weight = p - whole;
        ((whole as i64).rem_euclid(n as i64) as usize, weight)
    }

    fn span_cubic(&self, span: usize) -> Cubic {
        let n = self.points.len();
        let p0 = self.points[(span + n - 1) % n];
        let p1 = self.points[span];
        let p2 = self.points[(span + 1) % n];
        let p3 = self.points[(span + 2) % n];

        // centripetal: knot spacing is sqrt of the chord length
        let mut dt0 = p0.distance_squared(p1).powf(0.25);
        let mut dt1 = p1.distance_squared(p2).powf(0.25);
        let mut dt2 = p2.distance_squared(p3).powf(0.25);

        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        Cubic::nonuniform(p0, p1, p2, p3, dt0, dt1, dt2)
    }
}

pub fn to_vec3(w: Waypoint) -> Vec3 {
    Vec3::new(w.x, w.y, w.z)
}

pub fn to_waypoint(v: Vec3) -> Waypoint {
    Waypoint::new(v.x, v.y, v.z)
}

/// `c0 + c1 w + c2 w^2 + c3 w^3` over one span
#[derive(Debug, Clone, Copy)]
struct Cubic {
    c0: Vec3,
    c1: Vec3,
    c2: Vec3,
    c3: Vec3,
}

impl Cubic {
    /// Hermite segment from `x0` to `x1` with end tangents `t0`, `t1`
    fn hermite(x0: Vec3, x1: Vec3, t0: Vec3, t1: Vec3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    /// Segment between `x1` and `x2` with non-uniform knot spacings
    fn nonuniform(
        x0: Vec3,
        x1: Vec3,
        x2: Vec3,
        x3: Vec3,
        dt0: f32,
        dt1: f32,
        dt2: f32,
    ) -> Self {
        let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
        let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;

        // rescale tangents from knot space to [0, 1]
        Self::hermite(x1, x2, t1 * dt1, t2 * dt1)
    }

    fn position(&self, w: f32) -> Vec3 {
        let w2 = w * w;
        self.c0 + self.c1 * w + self.c2 * w2 + self.c3 * w2 * w
    }

    fn derivative(&self, w: f32) -> Vec3 {
        self.c1 + 2.0 * self.c2 * w + 3.0 * self.c3 * w * w
    }
}
