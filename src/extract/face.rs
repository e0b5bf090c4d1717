use crate::error::GraphError;
use crate::graph::SkeletonGraph;
use crate::math::{points_nearly_equal, Point2};

/// The roof face rising from one contour edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    /// Contour vertex the face's contour edge starts at.
    pub vertex: usize,
    /// Index of the contour edge the face belongs to.
    pub contour_edge: usize,
    /// Node ids in walk order: up from `vertex`, across the roof, and down
    /// to the next contour vertex.
    pub nodes: Vec<usize>,
    /// Counter-clockwise outline starting at `vertex`, repeated points removed.
    pub polygon: Vec<Point2>,
    /// Sweep height of each polygon point.
    pub heights: Vec<f64>,
}

/// Walks the winged graph around the face to the left of `vertex`'s
/// outgoing contour edge.
///
/// Going up an edge the face lies on its right, so the walk continues with
/// `higher_right`; going down it continues with `lower_left`. The walk ends
/// when a lower end carries no wing, i.e. at the next contour vertex.
///
/// # Errors
///
/// Returns `GraphError::Integrity` if `vertex` has no advancing edge, an
/// edge lacks an endpoint, a wing does not touch the current node, or the
/// walk revisits an edge.
pub fn trace_face(graph: &SkeletonGraph, vertex: usize) -> Result<Vec<usize>, GraphError> {
    let start = graph.vertex(vertex)?.advancing_edge.ok_or_else(|| {
        GraphError::Integrity(format!("vertex {vertex} has no advancing edge"))
    })?;

    let mut visited = vec![false; graph.edge_count()];
    let mut nodes = vec![vertex];
    let mut current = start;
    let mut upward = true;

    loop {
        let seen = visited
            .get_mut(current)
            .ok_or_else(|| GraphError::EntityNotFound(format!("edge {current}")))?;
        if *seen {
            return Err(GraphError::Integrity(format!(
                "face walk from vertex {vertex} revisits edge {current}"
            )));
        }
        *seen = true;

        let edge = graph.edge(current)?;
        let (node, next) = if upward {
            (edge.higher, edge.higher_right)
        } else {
            (edge.lower, edge.lower_left)
        };
        let node = node
            .ok_or_else(|| GraphError::Integrity(format!("edge {current} lacks an endpoint")))?;
        nodes.push(node);

        let Some(next) = next else {
            break;
        };
        let wing = graph.edge(next)?;
        upward = if wing.lower == Some(node) {
            true
        } else if wing.higher == Some(node) {
            false
        } else {
            return Err(GraphError::Integrity(format!(
                "edge {next} does not touch node {node}"
            )));
        };
        current = next;
    }

    Ok(nodes)
}

/// Traces the face of `vertex` and resolves its outline.
///
/// `heights` holds the sweep height of every graph vertex by id.
///
/// # Errors
///
/// Propagates [`trace_face`] errors; returns `GraphError::EntityNotFound`
/// if a node has no height.
pub fn build_face(
    graph: &SkeletonGraph,
    heights: &[f64],
    vertex: usize,
    contour_edge: usize,
) -> Result<Face, GraphError> {
    let nodes = trace_face(graph, vertex)?;

    // Walk order keeps the face on the right; flip it to counter-clockwise.
    let ccw = nodes.first().into_iter().chain(nodes[1..].iter().rev());

    let mut polygon: Vec<Point2> = Vec::with_capacity(nodes.len());
    let mut face_heights = Vec::with_capacity(nodes.len());
    for &id in ccw {
        let point = graph.vertex(id)?.point;
        let height = *heights
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound(format!("height of vertex {id}")))?;
        if polygon.last().is_some_and(|last| points_nearly_equal(last, &point)) {
            continue;
        }
        polygon.push(point);
        face_heights.push(height);
    }
    if polygon.len() > 1 && points_nearly_equal(&polygon[0], &polygon[polygon.len() - 1]) {
        polygon.pop();
        face_heights.pop();
    }

    Ok(Face {
        vertex,
        contour_edge,
        nodes,
        polygon,
        heights: face_heights,
    })
}
