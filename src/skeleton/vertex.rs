use crate::math::ray::is_colinear;
use crate::math::{normalize_angle, Point2, Ray, Vector2};

use super::edge::Wing;
use super::store::{EdgeId, VertexId};

/// A vertex of the shrinking wavefront (or a finished skeleton node).
///
/// Contour vertices are created at height 0 with no parents. Event
/// vertices carry the two vertices whose lines they inherit: the left line
/// comes from `left_parent`, the right line from `right_parent`.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// Sequential id, stable across the computation and in the output graph.
    pub id: usize,
    pub point: Point2,
    /// Sweep time at which the vertex was created.
    pub height: f64,
    /// Bisector along which the vertex travels.
    pub axis: Ray,
    /// Contour edge index of the incoming wavefront edge.
    pub left_edge: usize,
    /// Contour edge index of the outgoing wavefront edge.
    pub right_edge: usize,
    pub reflex: bool,
    pub prev: Option<VertexId>,
    pub next: Option<VertexId>,
    pub left_parent: Option<VertexId>,
    pub right_parent: Option<VertexId>,
    /// The vertex this one collapsed into.
    pub higher: Option<VertexId>,
    pub done: bool,
    /// Slot to patch (and neighbor to reference) on the left face when this
    /// vertex's advancing edge is created.
    pub left_wing: Option<Wing>,
    /// Same as `left_wing`, for the right face.
    pub right_wing: Option<Wing>,
    pub advancing_edge: Option<EdgeId>,
}

impl Vertex {
    /// Creates an active wavefront vertex between two contour edge lines.
    #[must_use]
    pub fn new(
        point: Point2,
        height: f64,
        (left_edge, left_line): (usize, &Ray),
        (right_edge, right_line): (usize, &Ray),
    ) -> Self {
        let (axis, reflex) = bisector(point, left_line, right_line);
        Self {
            id: 0,
            point,
            height,
            axis,
            left_edge,
            right_edge,
            reflex,
            prev: None,
            next: None,
            left_parent: None,
            right_parent: None,
            higher: None,
            done: false,
            left_wing: None,
            right_wing: None,
            advancing_edge: None,
        }
    }

    /// Creates a finished skeleton node (apex or split hub).
    ///
    /// Nodes never join a LAV; they only anchor skeleton edges.
    #[must_use]
    pub fn node(point: Point2, height: f64, left_edge: usize, right_edge: usize) -> Self {
        Self {
            id: 0,
            point,
            height,
            axis: Ray::new(point, 0.0),
            left_edge,
            right_edge,
            reflex: false,
            prev: None,
            next: None,
            left_parent: None,
            right_parent: None,
            higher: None,
            done: true,
            left_wing: None,
            right_wing: None,
            advancing_edge: None,
        }
    }

    /// Sets the parent back-references.
    #[must_use]
    pub fn with_parents(mut self, left: VertexId, right: VertexId) -> Self {
        self.left_parent = Some(left);
        self.right_parent = Some(right);
        self
    }
}

/// Computes the inward bisector of a wavefront vertex.
///
/// `left` is the incoming edge line, `right` the outgoing one; the interior
/// lies to the left of both. Returns the axis and whether the vertex is
/// reflex.
///
/// - Lines meeting ahead (convex turn): bisector toward the interior corner.
/// - Lines meeting behind (reflex turn): the same bisector reversed.
/// - Antiparallel lines: the axis runs along the shared outgoing direction.
/// - Straight continuation: the axis is the inward normal.
#[must_use]
pub fn bisector(point: Point2, left: &Ray, right: &Ray) -> (Ray, bool) {
    let dl = left.direction();
    let dr = right.direction();

    if is_colinear(left, right) {
        let dir = if dl.dot(&dr) < 0.0 {
            dr
        } else {
            Vector2::new(-dl.y, dl.x)
        };
        return (Ray::from_direction(point, &dir), false);
    }

    let reflex = normalize_angle(right.angle() - left.angle()) < 0.0;
    let mut dir = dr - dl;
    if reflex {
        dir = -dir;
    }
    (Ray::from_direction(point, &dir), reflex)
}
