use tracing::{debug, trace};

use crate::contour::ContourSet;
use crate::error::{EventError, GraphError, SkeletonError};
use crate::math::ray::{distance_to_ray, point_on_ray};
use crate::math::{definitely_less, nearly_equal, points_nearly_equal, Point2};

use super::edge::{EdgeEnd, End, Side, SkeletonEdge, Wing};
use super::engine;
use super::event::{Event, EventKind, EventQueue};
use super::store::{ContourEdge, EdgeId, SkeletonStore, VertexId};
use super::vertex::Vertex;

/// Lifecycle of a [`SkeletonBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Seeding,
    Running,
    Done,
}

/// Counters collected while the wavefront is swept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkeletonStats {
    /// Edge events that created a new wavefront vertex.
    pub edge_events: usize,
    /// Split events that divided (or merged) a LAV.
    pub split_events: usize,
    /// LAVs that collapsed into an apex or were closed as a pair.
    pub collapses: usize,
    /// Events dropped at dequeue because the wavefront moved past them.
    pub stale_events: usize,
}

/// A dequeued event resolved against the live wavefront.
#[derive(Debug, Clone, Copy)]
enum Current {
    Edge {
        left: VertexId,
        right: VertexId,
    },
    Split {
        vertex: VertexId,
        opposite: VertexId,
        edge: usize,
    },
}

/// Per-computation context owning every vertex, edge and pending event.
#[derive(Debug)]
pub struct SkeletonBuilder {
    store: SkeletonStore,
    queue: EventQueue,
    state: BuildState,
    stats: SkeletonStats,
    /// Height of the last processed event; never decreases.
    sweep: f64,
    /// Processed events allowed before the sweep is declared stuck.
    budget: usize,
}

impl Default for SkeletonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SkeletonBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: SkeletonStore::new(),
            queue: EventQueue::new(),
            state: BuildState::Seeding,
            stats: SkeletonStats::default(),
            sweep: 0.0,
            budget: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> BuildState {
        self.state
    }

    #[must_use]
    pub fn store(&self) -> &SkeletonStore {
        &self.store
    }

    /// Height of the last processed event.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.sweep
    }

    /// Builds one LAV per contour and enqueues the edge event of every
    /// neighbor pair and the split candidates of every reflex vertex.
    ///
    /// Contour vertices receive ids `0..N` in contour order.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder is not in the seeding state or the
    /// arena is inconsistent.
    pub fn seed(&mut self, contours: &ContourSet) -> Result<(), SkeletonError> {
        if self.state != BuildState::Seeding {
            return Err(EventError::Unresolved("builder already seeded".to_owned()).into());
        }

        for contour in contours.contours() {
            let points = contour.points();
            let n = points.len();
            let base = self.store.contour_edges().len();
            for (i, p) in points.iter().enumerate() {
                self.store
                    .add_contour_edge(ContourEdge::new(*p, points[(i + 1) % n]));
            }

            let mut ids = Vec::with_capacity(n);
            for (i, p) in points.iter().enumerate() {
                let left = base + (i + n - 1) % n;
                let right = base + i;
                let vertex = Vertex::new(
                    *p,
                    0.0,
                    (left, &self.store.line(left)?),
                    (right, &self.store.line(right)?),
                );
                ids.push(self.store.push_vertex(vertex));
            }
            for (i, &id) in ids.iter().enumerate() {
                self.store.link(id, ids[(i + 1) % n])?;
            }
        }

        for v in self.store.active_vertices() {
            self.enqueue_pair(v, self.store.next_of(v)?)?;
            self.enqueue_splits(v)?;
        }
        self.budget = event_budget(self.store.vertex_count());
        debug!(
            contours = contours.contours().len(),
            vertices = self.store.vertex_count(),
            events = self.queue.len(),
            "seeded wavefront"
        );
        Ok(())
    }

    /// Sweeps the wavefront until the event queue is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Unresolved` if a vertex never collapses, an
    /// event violates the equidistance invariant, an event lies below the
    /// sweep height, or the sweep exceeds its event budget; `GraphError` if
    /// the arena is inconsistent.
    pub fn run(&mut self) -> Result<(), SkeletonError> {
        self.state = BuildState::Running;
        debug!(state = ?self.state, queued = self.queue.len(), budget = self.budget, "sweep started");

        let mut processed = 0usize;
        while let Some(event) = self.queue.pop() {
            if definitely_less(event.height, self.sweep) {
                return Err(EventError::Unresolved(format!(
                    "event at height {} lies below the sweep at {}",
                    event.height, self.sweep
                ))
                .into());
            }
            trace!(height = event.height, kind = ?event.kind, "dequeued");

            let Some(current) = self.current(&event)? else {
                self.stats.stale_events += 1;
                continue;
            };

            processed += 1;
            if processed > self.budget {
                return Err(EventError::Unresolved(format!(
                    "sweep did not terminate within {} events",
                    self.budget
                ))
                .into());
            }
            self.sweep = self.sweep.max(event.height);

            match current {
                Current::Edge { left, right } => self.handle_edge(&event, left, right)?,
                Current::Split {
                    vertex,
                    opposite,
                    edge,
                } => self.split_event(&event, vertex, opposite, edge)?,
            }
        }

        self.state = BuildState::Done;
        if let Some(&v) = self.store.active_vertices().first() {
            let id = self.store.vertex(v)?.id;
            return Err(EventError::Unresolved(format!("vertex {id} never collapsed")).into());
        }
        debug!(state = ?self.state, stats = ?self.stats, "sweep finished");
        Ok(())
    }

    /// Hands over the finished arena and statistics.
    ///
    /// # Errors
    ///
    /// Returns `EventError::Unresolved` if the sweep has not completed.
    pub fn finish(self) -> Result<(SkeletonStore, SkeletonStats), SkeletonError> {
        if self.state != BuildState::Done {
            return Err(EventError::Unresolved("sweep not completed".to_owned()).into());
        }
        Ok((self.store, self.stats))
    }

    /// Queues the edge event of the new LAV neighbors `a -> b`.
    fn enqueue_pair(&mut self, a: VertexId, b: VertexId) -> Result<(), GraphError> {
        if let Some(event) = engine::edge_event(&self.store, a, b, self.sweep)? {
            trace!(height = event.height, kind = ?event.kind, "enqueued");
            self.queue.push(event);
        }
        Ok(())
    }

    /// Queues every split candidate of a newly created reflex vertex.
    fn enqueue_splits(&mut self, v: VertexId) -> Result<(), GraphError> {
        for event in engine::split_events(&self.store, v)? {
            trace!(height = event.height, kind = ?event.kind, "enqueued");
            self.queue.push(event);
        }
        Ok(())
    }

    /// Queues the events of a vertex that just joined a LAV.
    fn enqueue_vertex(&mut self, v: VertexId) -> Result<(), GraphError> {
        let prev = self.store.prev_of(v)?;
        let next = self.store.next_of(v)?;
        self.enqueue_pair(prev, v)?;
        self.enqueue_pair(v, next)?;
        self.enqueue_splits(v)
    }

    /// Checks a dequeued event against the live wavefront.
    ///
    /// An edge event holds while both vertices are alive and adjacent; a
    /// split holds while its vertex is alive and the opposite contour edge
    /// still has a wavefront segment under the split point.
    fn current(&self, event: &Event) -> Result<Option<Current>, GraphError> {
        match event.kind {
            EventKind::Edge { left, right } => {
                let (a, b) = (self.store.vertex(left)?, self.store.vertex(right)?);
                let live = !a.done && !b.done && a.next == Some(right);
                Ok(live.then_some(Current::Edge { left, right }))
            }
            EventKind::Split { vertex, edge } => {
                if self.store.vertex(vertex)?.done {
                    return Ok(None);
                }
                Ok(engine::locate_opposite(&self.store, event)?.map(|opposite| Current::Split {
                    vertex,
                    opposite,
                    edge,
                }))
            }
        }
    }

    fn handle_edge(&mut self, event: &Event, a: VertexId, b: VertexId) -> Result<(), SkeletonError> {
        let lav = self.store.lav(a)?;
        if lav.len() <= 3 || self.converges(&lav, event)? {
            self.collapse(&lav, event)
        } else {
            self.edge_event(a, b, event)
        }
    }

    /// Whether every vertex of `lav` reaches the event point at its height.
    fn converges(&self, lav: &[VertexId], event: &Event) -> Result<bool, GraphError> {
        for &u in lav {
            let vertex = self.store.vertex(u)?;
            let line = self.store.line(vertex.left_edge)?;
            if !point_on_ray(&event.position, &vertex.axis)
                || !nearly_equal(distance_to_ray(&event.position, &line), event.height)
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Emits the skeleton edge leaving `u` toward `higher` and retires `u`.
    ///
    /// The new edge fills the wing slots `u` was carrying and takes them as
    /// its own lower wings.
    fn advance(&mut self, u: VertexId, higher: VertexId) -> Result<EdgeId, GraphError> {
        let vertex = self.store.vertex(u)?;
        let (left_wing, right_wing) = (vertex.left_wing, vertex.right_wing);
        let lower = EdgeEnd {
            vertex: Some(u),
            left: left_wing.map(|w| w.edge),
            right: right_wing.map(|w| w.edge),
        };
        let edge = self
            .store
            .add_edge(SkeletonEdge::new(lower, EdgeEnd::at(higher)));
        if let Some(wing) = left_wing {
            self.store.patch_wing(wing, edge)?;
        }
        if let Some(wing) = right_wing {
            self.store.patch_wing(wing, edge)?;
        }

        let vertex = self.store.vertex_mut(u)?;
        vertex.done = true;
        vertex.higher = Some(higher);
        vertex.advancing_edge = Some(edge);
        Ok(edge)
    }

    fn edge_event(&mut self, a: VertexId, b: VertexId, event: &Event) -> Result<(), SkeletonError> {
        let left_edge = self.store.vertex(a)?.left_edge;
        let right_edge = self.store.vertex(b)?.right_edge;
        let prev = self.store.prev_of(a)?;
        let next = self.store.next_of(b)?;
        self.check_equidistant(event.position, event.height, left_edge, right_edge)?;

        let vertex = Vertex::new(
            event.position,
            event.height,
            (left_edge, &self.store.line(left_edge)?),
            (right_edge, &self.store.line(right_edge)?),
        )
        .with_parents(a, b);
        let n = self.store.push_vertex(vertex);

        let ea = self.advance(a, n)?;
        let eb = self.advance(b, n)?;
        self.store.edge_mut(ea)?.higher.right = Some(eb);
        self.store.edge_mut(eb)?.higher.left = Some(ea);

        let vertex = self.store.vertex_mut(n)?;
        vertex.left_wing = Some(Wing::new(ea, End::Higher, Side::Left));
        vertex.right_wing = Some(Wing::new(eb, End::Higher, Side::Right));

        self.store.link(prev, n)?;
        self.store.link(n, next)?;
        self.stats.edge_events += 1;
        debug!(
            height = event.height,
            x = event.position.x,
            y = event.position.y,
            "edge event"
        );
        Ok(self.enqueue_vertex(n)?)
    }

    /// Collapses a whole LAV into a single apex.
    ///
    /// A LAV member created at the event point and height already is the
    /// apex; otherwise a new node is added there.
    fn collapse(&mut self, lav: &[VertexId], event: &Event) -> Result<(), SkeletonError> {
        let (Some(&head), Some(&tail)) = (lav.first(), lav.last()) else {
            return Err(GraphError::Integrity("empty LAV".to_owned()).into());
        };
        let apex = match self.resident(lav, event)? {
            Some(apex) => apex,
            None => {
                let first = self.store.vertex(head)?;
                let node = Vertex::node(
                    event.position,
                    event.height,
                    first.left_edge,
                    first.right_edge,
                )
                .with_parents(head, tail);
                self.store.push_vertex(node)
            }
        };

        // Incoming edges at the apex, as (left-most, right-most) per member.
        let mut entries = Vec::with_capacity(lav.len());
        for &u in lav {
            if u == apex {
                let vertex = self.store.vertex(u)?;
                let (Some(left), Some(right)) = (vertex.left_wing, vertex.right_wing) else {
                    return Err(GraphError::Integrity("apex without wings".to_owned()).into());
                };
                entries.push((left.edge, right.edge));
            } else {
                let e = self.advance(u, apex)?;
                entries.push((e, e));
            }
        }
        for (i, &(_, right)) in entries.iter().enumerate() {
            let (left, _) = entries[(i + 1) % entries.len()];
            self.store.edge_mut(right)?.higher.right = Some(left);
            self.store.edge_mut(left)?.higher.left = Some(right);
        }
        self.store.vertex_mut(apex)?.done = true;

        self.stats.collapses += 1;
        debug!(
            height = event.height,
            vertices = lav.len(),
            x = event.position.x,
            y = event.position.y,
            "LAV collapsed"
        );
        Ok(())
    }

    /// LAV member that was itself created at the event point and height.
    fn resident(&self, lav: &[VertexId], event: &Event) -> Result<Option<VertexId>, GraphError> {
        for &u in lav {
            let vertex = self.store.vertex(u)?;
            if vertex.left_wing.is_some()
                && vertex.right_wing.is_some()
                && points_nearly_equal(&vertex.point, &event.position)
                && nearly_equal(vertex.height, event.height)
            {
                return Ok(Some(u));
            }
        }
        Ok(None)
    }

    /// Splits the wavefront at a reflex vertex hitting an opposite edge.
    ///
    /// The split point becomes a hub node joined to the reflex vertex's
    /// skeleton edge and to two zero-length bridges, one per new LAV vertex.
    fn split_event(
        &mut self,
        event: &Event,
        v: VertexId,
        w: VertexId,
        opposite_edge: usize,
    ) -> Result<(), SkeletonError> {
        let (position, height) = (event.position, event.height);

        let reflex = self.store.vertex(v)?;
        let (left_edge, right_edge) = (reflex.left_edge, reflex.right_edge);
        let prev = self.store.prev_of(v)?;
        let next = self.store.next_of(v)?;
        let y = self.store.next_of(w)?;
        self.check_equidistant(position, height, left_edge, opposite_edge)?;

        let left_line = self.store.line(left_edge)?;
        let right_line = self.store.line(right_edge)?;
        let opposite_line = self.store.line(opposite_edge)?;

        let hub = self.store.push_vertex(
            Vertex::node(position, height, left_edge, right_edge).with_parents(v, w),
        );
        let v1 = self.store.push_vertex(
            Vertex::new(
                position,
                height,
                (left_edge, &left_line),
                (opposite_edge, &opposite_line),
            )
            .with_parents(v, w),
        );
        let v2 = self.store.push_vertex(
            Vertex::new(
                position,
                height,
                (opposite_edge, &opposite_line),
                (right_edge, &right_line),
            )
            .with_parents(w, v),
        );

        let ev = self.advance(v, hub)?;
        let b1 = self
            .store
            .add_edge(SkeletonEdge::new(EdgeEnd::at(hub), EdgeEnd::at(v1)));
        let b2 = self
            .store
            .add_edge(SkeletonEdge::new(EdgeEnd::at(hub), EdgeEnd::at(v2)));

        let edge = self.store.edge_mut(ev)?;
        edge.higher.left = Some(b1);
        edge.higher.right = Some(b2);
        let bridge = self.store.edge_mut(b1)?;
        bridge.lower.left = Some(ev);
        bridge.lower.right = Some(b2);
        let bridge = self.store.edge_mut(b2)?;
        bridge.lower.left = Some(b1);
        bridge.lower.right = Some(ev);

        for (vertex, bridge) in [(v1, b1), (v2, b2)] {
            let vertex = self.store.vertex_mut(vertex)?;
            vertex.left_wing = Some(Wing::new(bridge, End::Higher, Side::Left));
            vertex.right_wing = Some(Wing::new(bridge, End::Higher, Side::Right));
        }

        self.store.link(prev, v1)?;
        self.store.link(v1, y)?;
        self.store.link(w, v2)?;
        self.store.link(v2, next)?;
        self.stats.split_events += 1;
        debug!(
            height,
            x = position.x,
            y = position.y,
            "split event"
        );

        for vertex in [v1, v2] {
            if self.store.vertex(vertex)?.done {
                continue;
            }
            let lav = self.store.lav(vertex)?;
            if let [_, other] = lav[..] {
                self.close_pair(other, vertex)?;
            } else {
                self.enqueue_vertex(vertex)?;
            }
        }
        Ok(())
    }

    /// Closes a LAV that shrank to the two vertices `lower` and `upper`.
    ///
    /// Both wavefront edges coincide, so a single skeleton edge joins the
    /// two vertices and finishes both faces.
    fn close_pair(&mut self, lower: VertexId, upper: VertexId) -> Result<(), SkeletonError> {
        let vertex = self.store.vertex(upper)?;
        let (Some(left_wing), Some(right_wing)) = (vertex.left_wing, vertex.right_wing) else {
            return Err(GraphError::Integrity("closing vertex without wings".to_owned()).into());
        };

        let e = self.advance(lower, upper)?;
        let edge = self.store.edge_mut(e)?;
        edge.higher.left = Some(right_wing.edge);
        edge.higher.right = Some(left_wing.edge);
        self.store.patch_wing(right_wing, e)?;
        self.store.patch_wing(left_wing, e)?;
        self.store.vertex_mut(upper)?.done = true;

        self.stats.collapses += 1;
        debug!("closed two-vertex LAV");
        Ok(())
    }

    /// The event point must lie at the event height from both lines.
    fn check_equidistant(
        &self,
        position: Point2,
        height: f64,
        left_edge: usize,
        right_edge: usize,
    ) -> Result<(), SkeletonError> {
        let dl = distance_to_ray(&position, &self.store.line(left_edge)?);
        let dr = distance_to_ray(&position, &self.store.line(right_edge)?);
        if !nearly_equal(dl, height) || !nearly_equal(dr, height) {
            return Err(EventError::Unresolved(format!(
                "event at ({}, {}) is {dl} and {dr} from its edges, expected {height}",
                position.x, position.y
            ))
            .into());
        }
        Ok(())
    }
}

/// Upper bound on processed events for `n` contour vertices.
///
/// Every edge event retires two wavefront vertices for one, every split
/// adds one and is bounded by the reflex vertices, and each LAV collapses
/// once, so a correct sweep stays linear in `n`.
fn event_budget(n: usize) -> usize {
    4 * n + 16
}
