use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::math::Point2;

use super::store::VertexId;

/// What a collapse event consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Two LAV neighbors meet; `left` is the predecessor of `right`.
    Edge { left: VertexId, right: VertexId },
    /// A reflex vertex reaches the wavefront descended from contour edge `edge`.
    Split { vertex: VertexId, edge: usize },
}

/// A candidate collapse at a given sweep height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub position: Point2,
    pub height: f64,
    pub kind: EventKind,
}

impl Event {
    /// The vertices whose state decides whether the event is still current.
    #[must_use]
    pub fn vertices(&self) -> (VertexId, Option<VertexId>) {
        match self.kind {
            EventKind::Edge { left, right } => (left, Some(right)),
            EventKind::Split { vertex, .. } => (vertex, None),
        }
    }

    #[must_use]
    pub fn is_split(&self) -> bool {
        matches!(self.kind, EventKind::Split { .. })
    }
}

/// Heap entry: lowest height first, then insertion order.
#[derive(Debug)]
struct Queued {
    event: Event,
    seq: u64,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Queued {
    // Reversed so that `BinaryHeap` (a max-heap) yields the minimum.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .height
            .total_cmp(&self.event.height)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue of events keyed by height.
///
/// Events of equal height come out in insertion order.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Queued>,
    seq: u64,
}

impl EventQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueues `event`. Events without a finite height are dropped.
    pub fn push(&mut self, event: Event) {
        if !event.height.is_finite() {
            return;
        }
        self.heap.push(Queued {
            event,
            seq: self.seq,
        });
        self.seq += 1;
    }

    /// Removes and returns the lowest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|q| q.event)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
