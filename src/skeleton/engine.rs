//! Event computation for wavefront vertices.
//!
//! Candidates are derived once, when the vertices involved come into
//! existence: an edge event for every pair of LAV neighbors, and for every
//! reflex vertex one split candidate per contour edge it could run into.
//! Trajectories never change, so a candidate stays exact for as long as
//! its participants are alive; validity is decided at dequeue time against
//! the live wavefront. Heights are absolute sweep times, i.e. distances to
//! the originating contour edge lines.

use crate::error::GraphError;
use crate::math::ray::{distance_to_ray, intersect, is_colinear, point_on_ray};
use crate::math::{angle_nearly_equal, cross, definitely_less, nearly_equal, Point2, Ray};

use super::event::{Event, EventKind};
use super::store::{SkeletonStore, VertexId};
use super::vertex::Vertex;

/// Edge event of the LAV neighbors `left -> right`, if their trajectories
/// meet no lower than `sweep`.
///
/// # Errors
///
/// Returns an error if either vertex or the shared contour edge is stale.
pub fn edge_event(
    store: &SkeletonStore,
    left: VertexId,
    right: VertexId,
    sweep: f64,
) -> Result<Option<Event>, GraphError> {
    let a = store.vertex(left)?;
    let b = store.vertex(right)?;
    let shared = store.line(a.right_edge)?;
    Ok(meet(a, b, &shared)
        .filter(|&(_, height)| !definitely_less(height, sweep))
        .map(|(position, height)| Event {
            position,
            height,
            kind: EventKind::Edge { left, right },
        }))
}

/// Where the trajectories of `a` and `b` meet, with the height measured
/// against `shared`, the wavefront edge between them.
fn meet(a: &Vertex, b: &Vertex, shared: &Ray) -> Option<(Point2, f64)> {
    if let Some(x) = intersect(&a.axis, &b.axis) {
        return Some((x, distance_to_ray(&x, shared)));
    }
    if is_colinear(&a.axis, &b.axis) && angle_nearly_equal(a.axis.angle(), b.axis.angle()) {
        // One vertex trails the other on the same line and meets it at its origin.
        if point_on_ray(&b.point, &a.axis) {
            return Some((b.point, distance_to_ray(&b.point, shared)));
        }
        if point_on_ray(&a.point, &b.axis) {
            return Some((a.point, distance_to_ray(&a.point, shared)));
        }
        return None;
    }
    facing_meet(a, b, shared)
}

/// Meeting point of two vertices travelling toward each other on one line.
fn facing_meet(a: &Vertex, b: &Vertex, shared: &Ray) -> Option<(Point2, f64)> {
    if !is_colinear(&a.axis, &b.axis)
        || !angle_nearly_equal(a.axis.angle(), b.axis.angle() + std::f64::consts::PI)
        || !nearly_equal(a.axis.signed_distance(&b.point), 0.0)
    {
        return None;
    }
    let gap = a.axis.project(&b.point);
    if definitely_less(gap, 0.0) {
        return None;
    }

    let ha = distance_to_ray(&a.point, shared);
    let hb = distance_to_ray(&b.point, shared);
    let sa = climb_rate(&a.axis, shared);
    let sb = climb_rate(&b.axis, shared);

    let t = if nearly_equal(sa + sb, 0.0) {
        if !nearly_equal(ha, hb) {
            return None;
        }
        gap * 0.5
    } else {
        ((hb + sb * gap - ha) / (sa + sb)).clamp(0.0, gap.max(0.0))
    };
    Some((a.axis.point_at(t), ha + sa * t))
}

/// Height gained per unit of travel along `axis`, relative to `line`.
fn climb_rate(axis: &Ray, line: &Ray) -> f64 {
    cross(&line.direction(), &axis.direction()).abs()
}

/// Every point where the reflex vertex `v` could reach a contour edge's
/// wavefront strictly after its own creation.
///
/// One candidate per contour edge that lies ahead of `v` and closes in on
/// it; `v`'s own two edges are skipped. Whether the edge still has a live
/// wavefront segment there is decided by [`locate_opposite`] at dequeue.
///
/// # Errors
///
/// Returns an error if the vertex or a contour edge reference is stale.
pub fn split_events(store: &SkeletonStore, v: VertexId) -> Result<Vec<Event>, GraphError> {
    let vertex = store.vertex(v)?;
    if !vertex.reflex {
        return Ok(Vec::new());
    }
    let p = vertex.point;
    let u = vertex.axis.direction();
    let h0 = vertex.height;
    let own_rate = cross(&store.line(vertex.left_edge)?.direction(), &u);

    let mut events = Vec::new();
    for (index, edge) in store.contour_edges().iter().enumerate() {
        if index == vertex.left_edge || index == vertex.right_edge {
            continue;
        }
        let line = &edge.line;

        // The opposite wavefront must still lie ahead of v.
        let ahead = line.signed_distance(&p);
        if definitely_less(ahead, h0) {
            continue;
        }
        let closing = own_rate - cross(&line.direction(), &u);
        if !definitely_less(0.0, closing) {
            continue;
        }
        let t = (ahead - h0) / closing;
        if !definitely_less(0.0, t) {
            continue;
        }
        events.push(Event {
            position: p + u * t,
            height: h0 + own_rate * t,
            kind: EventKind::Split {
                vertex: v,
                edge: index,
            },
        });
    }
    Ok(events)
}

/// Active vertex whose outgoing wavefront edge carries the split point.
///
/// The candidate edge `(x, x.next)` must descend from the event's contour
/// edge and the point must lie inside the wedge bounded by the bisectors
/// of `x` and `x.next`. `None` means the edge no longer has a live
/// segment there and the split is stale.
///
/// # Errors
///
/// Returns an error if a vertex or LAV link is stale.
pub fn locate_opposite(store: &SkeletonStore, event: &Event) -> Result<Option<VertexId>, GraphError> {
    let EventKind::Split { edge, .. } = event.kind else {
        return Ok(None);
    };
    for x in store.active_vertices() {
        let xv = store.vertex(x)?;
        if xv.right_edge != edge {
            continue;
        }
        let yv = store.vertex(store.next_of(x)?)?;
        let side_x = cross(&xv.axis.direction(), &(event.position - xv.point));
        let side_y = cross(&yv.axis.direction(), &(event.position - yv.point));
        if !definitely_less(0.0, side_x) && !definitely_less(side_y, 0.0) {
            return Ok(Some(x));
        }
    }
    Ok(None)
}
