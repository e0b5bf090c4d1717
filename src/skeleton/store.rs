use slotmap::SlotMap;

use crate::error::GraphError;
use crate::math::{Point2, Ray};

use super::edge::{SkeletonEdge, Wing};
use super::vertex::Vertex;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the skeleton store.
    pub struct VertexId;
}

slotmap::new_key_type! {
    /// Unique identifier for a skeleton edge in the skeleton store.
    pub struct EdgeId;
}

/// One edge of the normalized input contours.
#[derive(Debug, Clone, Copy)]
pub struct ContourEdge {
    pub start: Point2,
    pub end: Point2,
    /// Directed supporting line, interior on the left.
    pub line: Ray,
}

impl ContourEdge {
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self {
            start,
            end,
            line: Ray::through(start, &end),
        }
    }
}

/// Arena owning every vertex and skeleton edge of one computation.
///
/// Vertices and edges reference each other via typed keys, which lets the
/// winged graph be wired before all of its members exist.
#[derive(Debug, Default)]
pub struct SkeletonStore {
    vertices: SlotMap<VertexId, Vertex>,
    edges: SlotMap<EdgeId, SkeletonEdge>,
    contour_edges: Vec<ContourEdge>,
}

impl SkeletonStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Contour edges ---

    /// Registers a contour edge and returns its index.
    pub fn add_contour_edge(&mut self, edge: ContourEdge) -> usize {
        self.contour_edges.push(edge);
        self.contour_edges.len() - 1
    }

    /// Returns the contour edge at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn contour_edge(&self, index: usize) -> Result<&ContourEdge, GraphError> {
        self.contour_edges
            .get(index)
            .ok_or_else(|| GraphError::EntityNotFound(format!("contour edge {index}")))
    }

    /// Supporting line of the contour edge at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range.
    pub fn line(&self, index: usize) -> Result<Ray, GraphError> {
        Ok(self.contour_edge(index)?.line)
    }

    /// All contour edges in registration order.
    #[must_use]
    pub fn contour_edges(&self) -> &[ContourEdge] {
        &self.contour_edges
    }

    // --- Vertex operations ---

    /// Inserts a vertex, assigns it the next sequential id, and returns its key.
    pub fn push_vertex(&mut self, mut vertex: Vertex) -> VertexId {
        vertex.id = self.vertices.len();
        self.vertices.insert(vertex)
    }

    /// Returns a reference to the vertex, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("vertex".into()))
    }

    /// Returns a mutable reference to the vertex, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex, GraphError> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| GraphError::EntityNotFound("vertex".into()))
    }

    /// Iterates over all vertices in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &Vertex)> {
        self.vertices.iter()
    }

    /// Number of vertices created so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Keys of all vertices that are still part of a wavefront.
    #[must_use]
    pub fn active_vertices(&self) -> Vec<VertexId> {
        self.vertices
            .iter()
            .filter(|(_, v)| !v.done)
            .map(|(k, _)| k)
            .collect()
    }

    /// Walks the LAV containing `start` and returns its members in order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Integrity` if the ring is broken or does not
    /// close within the number of stored vertices.
    pub fn lav(&self, start: VertexId) -> Result<Vec<VertexId>, GraphError> {
        let mut members = vec![start];
        let mut current = self.next_of(start)?;
        while current != start {
            if members.len() > self.vertices.len() {
                return Err(GraphError::Integrity("LAV does not close".to_owned()));
            }
            members.push(current);
            current = self.next_of(current)?;
        }
        Ok(members)
    }

    /// LAV successor of `id`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Integrity` if the vertex has no successor.
    pub fn next_of(&self, id: VertexId) -> Result<VertexId, GraphError> {
        self.vertex(id)?
            .next
            .ok_or_else(|| GraphError::Integrity("LAV vertex without successor".to_owned()))
    }

    /// LAV predecessor of `id`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Integrity` if the vertex has no predecessor.
    pub fn prev_of(&self, id: VertexId) -> Result<VertexId, GraphError> {
        self.vertex(id)?
            .prev
            .ok_or_else(|| GraphError::Integrity("LAV vertex without predecessor".to_owned()))
    }

    /// Links `a -> b` in the LAV.
    ///
    /// # Errors
    ///
    /// Returns an error if either key is stale.
    pub fn link(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        self.vertex_mut(a)?.next = Some(b);
        self.vertex_mut(b)?.prev = Some(a);
        Ok(())
    }

    // --- Edge operations ---

    /// Inserts a skeleton edge, assigns it the next sequential id, and
    /// returns its key.
    pub fn add_edge(&mut self, mut edge: SkeletonEdge) -> EdgeId {
        edge.id = self.edges.len();
        self.edges.insert(edge)
    }

    /// Returns a reference to the edge, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn edge(&self, id: EdgeId) -> Result<&SkeletonEdge, GraphError> {
        self.edges
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound("edge".into()))
    }

    /// Returns a mutable reference to the edge, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is stale.
    pub fn edge_mut(&mut self, id: EdgeId) -> Result<&mut SkeletonEdge, GraphError> {
        self.edges
            .get_mut(id)
            .ok_or_else(|| GraphError::EntityNotFound("edge".into()))
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &SkeletonEdge)> {
        self.edges.iter()
    }

    /// Fills the wing slot named by `wing` with `value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the wing's edge is stale.
    pub fn patch_wing(&mut self, wing: Wing, value: EdgeId) -> Result<(), GraphError> {
        *self.edge_mut(wing.edge)?.slot_mut(wing.end, wing.side) = Some(value);
        Ok(())
    }
}
