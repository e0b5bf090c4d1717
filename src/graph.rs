//! Frozen winged skeleton graph and its text dump.
//!
//! The dump lists the vertex count, one `x y advancingEdgeId` line per
//! vertex, the edge count, then one
//! `lowerVertexId higherVertexId lowerLeftId lowerRightId higherLeftId higherRightId`
//! line per edge. Missing references are written as `-1`.

use std::fmt;
use std::str::FromStr;

use crate::error::GraphError;
use crate::math::Point2;
use crate::skeleton::store::SkeletonStore;

/// A skeleton node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphVertex {
    pub point: Point2,
    /// The edge leaving this vertex upward, if it ever moved.
    pub advancing_edge: Option<usize>,
}

/// A winged skeleton edge referencing vertices and edges by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphEdge {
    pub lower: Option<usize>,
    pub higher: Option<usize>,
    pub lower_left: Option<usize>,
    pub lower_right: Option<usize>,
    pub higher_left: Option<usize>,
    pub higher_right: Option<usize>,
}

/// Immutable skeleton graph with sequential vertex and edge ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonGraph {
    pub vertices: Vec<GraphVertex>,
    pub edges: Vec<GraphEdge>,
}

impl SkeletonGraph {
    /// Freezes the arena of a finished sweep.
    ///
    /// # Errors
    ///
    /// Returns `GraphError` if a vertex or edge reference is stale.
    pub fn from_store(store: &SkeletonStore) -> Result<Self, GraphError> {
        let mut vertices = vec![
            GraphVertex {
                point: Point2::origin(),
                advancing_edge: None,
            };
            store.vertex_count()
        ];
        for (_, v) in store.vertices() {
            let advancing_edge = v
                .advancing_edge
                .map(|e| store.edge(e).map(|e| e.id))
                .transpose()?;
            let slot = vertices
                .get_mut(v.id)
                .ok_or_else(|| GraphError::Integrity(format!("vertex id {} out of range", v.id)))?;
            *slot = GraphVertex {
                point: v.point,
                advancing_edge,
            };
        }

        let vertex_id = |k| store.vertex(k).map(|v| v.id);
        let edge_id = |k| store.edge(k).map(|e| e.id);
        let mut edges = vec![GraphEdge::default(); store.edges().count()];
        for (_, e) in store.edges() {
            let slot = edges
                .get_mut(e.id)
                .ok_or_else(|| GraphError::Integrity(format!("edge id {} out of range", e.id)))?;
            *slot = GraphEdge {
                lower: e.lower.vertex.map(vertex_id).transpose()?,
                higher: e.higher.vertex.map(vertex_id).transpose()?,
                lower_left: e.lower.left.map(edge_id).transpose()?,
                lower_right: e.lower.right.map(edge_id).transpose()?,
                higher_left: e.higher.left.map(edge_id).transpose()?,
                higher_right: e.higher.right.map(edge_id).transpose()?,
            };
        }

        Ok(Self { vertices, edges })
    }

    /// # Errors
    ///
    /// Returns `GraphError::EntityNotFound` if `id` is out of range.
    pub fn vertex(&self, id: usize) -> Result<&GraphVertex, GraphError> {
        self.vertices
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound(format!("vertex {id}")))
    }

    /// # Errors
    ///
    /// Returns `GraphError::EntityNotFound` if `id` is out of range.
    pub fn edge(&self, id: usize) -> Result<&GraphEdge, GraphError> {
        self.edges
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound(format!("edge {id}")))
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

struct Id(Option<usize>);

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{id}"),
            None => write!(f, "-1"),
        }
    }
}

impl fmt::Display for SkeletonGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.vertices.len())?;
        for v in &self.vertices {
            writeln!(f, "{} {} {}", v.point.x, v.point.y, Id(v.advancing_edge))?;
        }
        writeln!(f, "{}", self.edges.len())?;
        for e in &self.edges {
            writeln!(
                f,
                "{} {} {} {} {} {}",
                Id(e.lower),
                Id(e.higher),
                Id(e.lower_left),
                Id(e.lower_right),
                Id(e.higher_left),
                Id(e.higher_right)
            )?;
        }
        Ok(())
    }
}

/// Line-oriented reader over a dump, skipping blank lines.
struct DumpReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> DumpReader<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            lines: s.lines().enumerate(),
            line: 0,
        }
    }

    fn error(&self, reason: impl Into<String>) -> GraphError {
        GraphError::Parse {
            line: self.line,
            reason: reason.into(),
        }
    }

    fn fields(&mut self) -> Result<Vec<&'a str>, GraphError> {
        for (i, text) in self.lines.by_ref() {
            self.line = i + 1;
            let fields: Vec<&str> = text.split_whitespace().collect();
            if !fields.is_empty() {
                return Ok(fields);
            }
        }
        Err(self.error("unexpected end of dump"))
    }

    fn expect_fields(&mut self, n: usize) -> Result<Vec<&'a str>, GraphError> {
        let fields = self.fields()?;
        if fields.len() != n {
            return Err(self.error(format!("expected {n} fields, found {}", fields.len())));
        }
        Ok(fields)
    }

    fn count(&mut self) -> Result<usize, GraphError> {
        let fields = self.expect_fields(1)?;
        fields[0]
            .parse()
            .map_err(|_| self.error(format!("invalid count `{}`", fields[0])))
    }

    fn coordinate(&self, field: &str) -> Result<f64, GraphError> {
        field
            .parse()
            .map_err(|_| self.error(format!("invalid coordinate `{field}`")))
    }

    fn id(&self, field: &str, bound: usize) -> Result<Option<usize>, GraphError> {
        if field == "-1" {
            return Ok(None);
        }
        let id: usize = field
            .parse()
            .map_err(|_| self.error(format!("invalid id `{field}`")))?;
        if id >= bound {
            return Err(self.error(format!("id {id} out of range")));
        }
        Ok(Some(id))
    }
}

impl FromStr for SkeletonGraph {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut reader = DumpReader::new(s);

        let vertex_rows = (0..reader.count()?)
            .map(|_| reader.expect_fields(3))
            .collect::<Result<Vec<_>, _>>()?;
        let edge_count = reader.count()?;

        let mut vertices = Vec::with_capacity(vertex_rows.len());
        for row in &vertex_rows {
            vertices.push(GraphVertex {
                point: Point2::new(reader.coordinate(row[0])?, reader.coordinate(row[1])?),
                advancing_edge: reader.id(row[2], edge_count)?,
            });
        }

        let vertex_count = vertices.len();
        let mut edges = Vec::with_capacity(edge_count);
        for _ in 0..edge_count {
            let row = reader.expect_fields(6)?;
            edges.push(GraphEdge {
                lower: reader.id(row[0], vertex_count)?,
                higher: reader.id(row[1], vertex_count)?,
                lower_left: reader.id(row[2], edge_count)?,
                lower_right: reader.id(row[3], edge_count)?,
                higher_left: reader.id(row[4], edge_count)?,
                higher_right: reader.id(row[5], edge_count)?,
            });
        }

        Ok(Self { vertices, edges })
    }
}
