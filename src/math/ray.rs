use super::{cross, definitely_less, nearly_equal, normalize_angle, Point2, Vector2};
use std::f64::consts::PI;

/// A directed half-line: a contour edge direction or a vertex bisector.
///
/// The angle is always kept in `(-π, π]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point2,
    angle: f64,
}

impl Ray {
    /// Creates a ray from an origin and an angle (normalized on the way in).
    #[must_use]
    pub fn new(origin: Point2, angle: f64) -> Self {
        Self {
            origin,
            angle: normalize_angle(angle),
        }
    }

    /// Creates a ray starting at `origin` pointing along `dir`.
    #[must_use]
    pub fn from_direction(origin: Point2, dir: &Vector2) -> Self {
        Self::new(origin, dir.y.atan2(dir.x))
    }

    /// Creates a ray starting at `from` and passing through `to`.
    #[must_use]
    pub fn through(from: Point2, to: &Point2) -> Self {
        Self::from_direction(from, &(to - from))
    }

    /// The normalized angle of this ray.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Unit direction vector.
    #[must_use]
    pub fn direction(&self) -> Vector2 {
        Vector2::new(self.angle.cos(), self.angle.sin())
    }

    /// The same supporting line traversed the other way.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.origin, self.angle + PI)
    }

    /// Point at arc length `t` along the ray.
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.origin + self.direction() * t
    }

    /// Signed perpendicular distance from `p` to the supporting line.
    ///
    /// Positive on the left of the ray.
    #[must_use]
    pub fn signed_distance(&self, p: &Point2) -> f64 {
        cross(&self.direction(), &(p - self.origin))
    }

    /// Arc-length parameter of the projection of `p` onto the supporting line.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        self.direction().dot(&(p - self.origin))
    }
}

/// Returns `true` if the two rays are parallel or antiparallel.
#[must_use]
pub fn is_colinear(a: &Ray, b: &Ray) -> bool {
    let diff = normalize_angle(a.angle - b.angle).abs();
    nearly_equal(diff, 0.0) || nearly_equal(diff, PI)
}

/// Returns `true` if `p` lies on the ray (not behind its origin).
#[must_use]
pub fn point_on_ray(p: &Point2, r: &Ray) -> bool {
    nearly_equal(r.signed_distance(p), 0.0) && !definitely_less(r.project(p), 0.0)
}

/// Non-negative perpendicular distance from `p` to the ray's supporting line.
#[must_use]
pub fn distance_to_ray(p: &Point2, r: &Ray) -> f64 {
    r.signed_distance(p).abs()
}

/// Intersection of two rays.
///
/// Returns `None` if they are colinear, diverge, or would only meet behind
/// either origin.
#[must_use]
pub fn intersect(a: &Ray, b: &Ray) -> Option<Point2> {
    let (t, u) = line_parameters(a, b)?;
    if definitely_less(t, 0.0) || definitely_less(u, 0.0) {
        return None;
    }
    Some(a.point_at(t.max(0.0)))
}

/// Intersection of the two supporting lines, ignoring ray direction.
#[must_use]
pub fn intersect_unbounded(a: &Ray, b: &Ray) -> Option<Point2> {
    let (t, _) = line_parameters(a, b)?;
    Some(a.point_at(t))
}

/// Arc-length parameters `(t, u)` with `a(t) == b(u)`.
fn line_parameters(a: &Ray, b: &Ray) -> Option<(f64, f64)> {
    if is_colinear(a, b) {
        return None;
    }
    let da = a.direction();
    let db = b.direction();
    let denom = cross(&da, &db);
    let delta = b.origin - a.origin;
    let t = cross(&delta, &db) / denom;
    let u = cross(&delta, &da) / denom;
    Some((t, u))
}
