use crate::math::{definitely_less, points_nearly_equal, Point2, Vector2};

use super::face::Face;

/// A directed 2D segment of an offset path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2 {
    pub start: Point2,
    pub end: Point2,
}

impl Segment2 {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Same endpoints, in either direction.
    #[must_use]
    pub fn coincides(&self, other: &Self) -> bool {
        (points_nearly_equal(&self.start, &other.start) && points_nearly_equal(&self.end, &other.end))
            || (points_nearly_equal(&self.start, &other.end)
                && points_nearly_equal(&self.end, &other.start))
    }
}

/// Cuts `face` at sweep height `distance`.
///
/// The cut runs parallel to the face's contour edge, oriented along
/// `direction` (the contour edge direction) so the remaining interior stays
/// on its left. A non-convex face may yield several pieces. Face vertices
/// within tolerance of `distance` count as reached, so a cut at exactly a
/// ridge height follows the ridge.
#[must_use]
pub fn level_segments(face: &Face, direction: &Vector2, distance: f64) -> Vec<Segment2> {
    let n = face.polygon.len();
    if n < 3 {
        return Vec::new();
    }

    let reached = |h: f64| !definitely_less(h, distance);
    let mut crossings: Vec<Point2> = Vec::new();
    for i in 0..n {
        let j = (i + 1) % n;
        let (hi, hj) = (face.heights[i], face.heights[j]);
        if reached(hi) == reached(hj) {
            continue;
        }
        let t = ((distance - hi) / (hj - hi)).clamp(0.0, 1.0);
        let (pi, pj) = (face.polygon[i], face.polygon[j]);
        crossings.push(pi + (pj - pi) * t);
    }

    let along = |p: &Point2| direction.dot(&p.coords);
    crossings.sort_by(|a, b| along(a).total_cmp(&along(b)));

    crossings
        .chunks_exact(2)
        .map(|pair| Segment2::new(pair[0], pair[1]))
        .filter(|s| !points_nearly_equal(&s.start, &s.end))
        .collect()
}

/// Drops segments that repeat an earlier one.
#[must_use]
pub fn dedup_segments(segments: Vec<Segment2>) -> Vec<Segment2> {
    let mut unique: Vec<Segment2> = Vec::with_capacity(segments.len());
    for segment in segments {
        if !unique.iter().any(|u| u.coincides(&segment)) {
            unique.push(segment);
        }
    }
    unique
}
