//! Input contour normalization.
//!
//! Raw caller polygons are copied, cleaned of repeated and straight
//! vertices, and oriented so that the polygon interior always lies to the
//! left of every edge (outer boundary counter-clockwise, holes clockwise).
//! The caller's point lists are never modified.

use tracing::warn;

use crate::error::ContourError;
use crate::math::polygon_2d::{point_in_polygon, signed_area_2d};
use crate::math::{cross, nearly_equal, points_nearly_equal, Point2};

/// A normalized closed contour (no closing duplicate point).
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    points: Vec<Point2>,
    hole: bool,
}

impl Contour {
    /// Normalizes a raw point list.
    ///
    /// `hole` selects the target orientation: clockwise for holes,
    /// counter-clockwise for the outer boundary.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Degenerate` if fewer than 3 distinct,
    /// non-colinear points remain.
    pub fn normalize(index: usize, raw: &[Point2], hole: bool) -> Result<Self, ContourError> {
        let mut points = raw.to_vec();
        while remove_redundant(&mut points) {}

        if points.len() < 3 {
            return Err(ContourError::Degenerate {
                index,
                reason: format!("{} usable points after normalization", points.len()),
            });
        }

        let area = signed_area_2d(&points);
        if nearly_equal(area, 0.0) {
            return Err(ContourError::Degenerate {
                index,
                reason: "zero enclosed area".to_owned(),
            });
        }
        if (area > 0.0) == hole {
            points.reverse();
        }

        Ok(Self { points, hole })
    }

    /// The normalized points, interior on the left of each edge.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Whether this contour bounds a hole.
    #[must_use]
    pub fn is_hole(&self) -> bool {
        self.hole
    }

    /// Number of vertices (and edges) of the contour.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a successfully normalized contour.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The normalized input of one skeleton computation.
///
/// The first contour is the outer boundary; the rest are holes.
#[derive(Debug, Clone, Default)]
pub struct ContourSet {
    contours: Vec<Contour>,
}

impl ContourSet {
    /// Normalizes every contour, skipping degenerate holes and holes that
    /// lie outside the outer boundary.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Empty` if `raw` is empty, and
    /// `ContourError::Degenerate` if the outer boundary is degenerate.
    pub fn normalize(raw: &[Vec<Point2>]) -> Result<Self, ContourError> {
        let Some((outer, holes)) = raw.split_first() else {
            return Err(ContourError::Empty);
        };

        let outer = Contour::normalize(0, outer, false)?;
        let mut contours = Vec::with_capacity(raw.len());

        for (i, hole) in holes.iter().enumerate() {
            match Contour::normalize(i + 1, hole, true) {
                Ok(c) if !point_in_polygon(&c.points[0], &outer.points) => {
                    warn!(index = i + 1, "skipping hole outside the outer boundary");
                }
                Ok(c) => contours.push(c),
                Err(err) => warn!(%err, "skipping degenerate hole"),
            }
        }
        contours.insert(0, outer);

        Ok(Self { contours })
    }

    /// The normalized contours, outer boundary first.
    #[must_use]
    pub fn contours(&self) -> &[Contour] {
        &self.contours
    }

    /// Total number of contour vertices across all contours.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.contours.iter().map(Contour::len).sum()
    }
}

/// Removes one pass of duplicate points and straight or spike vertices.
///
/// Returns `true` if anything was removed.
fn remove_redundant(points: &mut Vec<Point2>) -> bool {
    let before = points.len();

    points.dedup_by(|b, a| points_nearly_equal(a, b));
    while points.len() > 1 && points_nearly_equal(&points[0], &points[points.len() - 1]) {
        points.pop();
    }

    let n = points.len();
    if n >= 3 {
        let keep: Vec<bool> = (0..n)
            .map(|i| {
                let prev = points[(i + n - 1) % n];
                let next = points[(i + 1) % n];
                let d_in = (points[i] - prev).normalize();
                let d_out = (next - points[i]).normalize();
                !nearly_equal(cross(&d_in, &d_out), 0.0)
            })
            .collect();
        let mut flags = keep.iter();
        points.retain(|_| flags.next().copied().unwrap_or(true));
    }

    points.len() != before
}
