use super::store::{EdgeId, VertexId};

/// Which endpoint of a skeleton edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Lower,
    Higher,
}

/// Which face of a skeleton edge, looking from the lower to the higher end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A wing slot on an existing edge: `(edge, end, side)` names the neighbor
/// reference that still has to be filled in once the adjacent edge exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wing {
    pub edge: EdgeId,
    pub end: End,
    pub side: Side,
}

impl Wing {
    #[must_use]
    pub fn new(edge: EdgeId, end: End, side: Side) -> Self {
        Self { edge, end, side }
    }
}

/// One endpoint of a skeleton edge with its two wings.
///
/// `left` is the neighboring edge bounding this edge's left face at this
/// endpoint, `right` the one bounding its right face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeEnd {
    pub vertex: Option<VertexId>,
    pub left: Option<EdgeId>,
    pub right: Option<EdgeId>,
}

impl EdgeEnd {
    #[must_use]
    pub fn at(vertex: VertexId) -> Self {
        Self {
            vertex: Some(vertex),
            left: None,
            right: None,
        }
    }
}

/// A winged skeleton edge.
///
/// Traversed from `lower` to `higher`, the left face belongs to the lower
/// vertex's left contour edge and the right face to its right contour edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonEdge {
    pub id: usize,
    pub lower: EdgeEnd,
    pub higher: EdgeEnd,
}

impl SkeletonEdge {
    #[must_use]
    pub fn new(lower: EdgeEnd, higher: EdgeEnd) -> Self {
        Self {
            id: 0,
            lower,
            higher,
        }
    }

    /// Mutable access to one wing slot.
    pub fn slot_mut(&mut self, end: End, side: Side) -> &mut Option<EdgeId> {
        let e = match end {
            End::Lower => &mut self.lower,
            End::Higher => &mut self.higher,
        };
        match side {
            Side::Left => &mut e.left,
            Side::Right => &mut e.right,
        }
    }
}
