//! Straight skeleton construction by wavefront propagation.
//!
//! Every contour edge moves inward at unit speed. Vertices travel along
//! their bisectors and are consumed by edge events (two neighbors meet)
//! and split events (a reflex vertex runs into an opposite edge). Each
//! consumed vertex leaves a skeleton edge behind; the edges are wired into
//! a winged graph as they are created.

pub mod builder;
pub mod edge;
pub mod engine;
pub mod event;
pub mod store;
pub mod vertex;

pub use builder::{BuildState, SkeletonBuilder, SkeletonStats};

use tracing::{debug, trace};

use crate::contour::ContourSet;
use crate::error::{GraphError, OffsetError, Result};
use crate::extract::face::{build_face, Face};
use crate::extract::offset::{dedup_segments, level_segments, Segment2};
use crate::extract::stitch::{connect, Polyline};
use crate::graph::SkeletonGraph;
use crate::math::Point2;

use store::{ContourEdge, SkeletonStore};

/// Per-vertex metadata kept alongside the graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInfo {
    /// Sweep time at which the vertex was created.
    pub height: f64,
    pub left_parent: Option<usize>,
    pub right_parent: Option<usize>,
    /// Contour edge bounding the vertex's left face.
    pub left_edge: usize,
    /// Contour edge bounding the vertex's right face.
    pub right_edge: usize,
}

/// A finished straight skeleton.
#[derive(Debug, Clone)]
pub struct Skeleton {
    graph: SkeletonGraph,
    info: Vec<VertexInfo>,
    contour_edges: Vec<ContourEdge>,
    contour_vertices: usize,
    stats: SkeletonStats,
}

impl Skeleton {
    /// Freezes the arena of a completed sweep.
    fn freeze(
        store: &SkeletonStore,
        stats: SkeletonStats,
        contour_vertices: usize,
    ) -> std::result::Result<Self, GraphError> {
        let graph = SkeletonGraph::from_store(store)?;

        let mut info = vec![None; store.vertex_count()];
        for (_, v) in store.vertices() {
            let parent = |p| store.vertex(p).map(|p| p.id);
            let slot = info
                .get_mut(v.id)
                .ok_or_else(|| GraphError::Integrity(format!("vertex id {} out of range", v.id)))?;
            *slot = Some(VertexInfo {
                height: v.height,
                left_parent: v.left_parent.map(parent).transpose()?,
                right_parent: v.right_parent.map(parent).transpose()?,
                left_edge: v.left_edge,
                right_edge: v.right_edge,
            });
        }
        let info = info
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| GraphError::Integrity("vertex ids are not contiguous".to_owned()))?;

        Ok(Self {
            graph,
            info,
            contour_edges: store.contour_edges().to_vec(),
            contour_vertices,
            stats,
        })
    }

    #[must_use]
    pub fn graph(&self) -> &SkeletonGraph {
        &self.graph
    }

    #[must_use]
    pub fn stats(&self) -> SkeletonStats {
        self.stats
    }

    /// Number of contour vertices; they occupy ids `0..contour_vertex_count()`.
    #[must_use]
    pub fn contour_vertex_count(&self) -> usize {
        self.contour_vertices
    }

    /// The normalized contour edges, indexed as in [`VertexInfo`].
    #[must_use]
    pub fn contour_edges(&self) -> &[ContourEdge] {
        &self.contour_edges
    }

    /// # Errors
    ///
    /// Returns `GraphError::EntityNotFound` if `id` is out of range.
    pub fn vertex_info(&self, id: usize) -> std::result::Result<&VertexInfo, GraphError> {
        self.info
            .get(id)
            .ok_or_else(|| GraphError::EntityNotFound(format!("vertex {id}")))
    }

    /// Roof face of the contour edge leaving contour vertex `vertex`.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::EntityNotFound` if `vertex` is not a contour
    /// vertex and `GraphError::Integrity` if the face walk fails.
    pub fn face(&self, vertex: usize) -> std::result::Result<Face, GraphError> {
        if vertex >= self.contour_vertices {
            return Err(GraphError::EntityNotFound(format!("contour vertex {vertex}")));
        }
        let heights = self.heights();
        build_face(&self.graph, &heights, vertex, self.info[vertex].right_edge)
    }

    /// Roof faces of every contour edge, in contour vertex order.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::Integrity` if any face walk fails.
    pub fn faces(&self) -> std::result::Result<Vec<Face>, GraphError> {
        let heights = self.heights();
        self.info[..self.contour_vertices]
            .iter()
            .enumerate()
            .map(|(vertex, info)| build_face(&self.graph, &heights, vertex, info.right_edge))
            .collect()
    }

    /// Inward offset of the contours at `distance`, as unordered segments.
    ///
    /// Each roof face is cut at height `distance`; the faces tile the
    /// polygon, so the cuts are already clipped to it.
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::InvalidDistance` unless `distance` is positive
    /// and finite, and `GraphError` if a face walk fails.
    pub fn offset_segments(&self, distance: f64) -> Result<Vec<Segment2>> {
        if !distance.is_finite() || distance <= 0.0 {
            return Err(OffsetError::InvalidDistance(distance).into());
        }

        let mut segments = Vec::new();
        for face in self.faces()? {
            let edge = self
                .contour_edges
                .get(face.contour_edge)
                .ok_or_else(|| GraphError::EntityNotFound(format!("contour edge {}", face.contour_edge)))?;
            segments.extend(level_segments(&face, &edge.line.direction(), distance));
        }
        let segments = dedup_segments(segments);
        trace!(distance, segments = segments.len(), "offset cut");
        Ok(segments)
    }

    /// Inward offset of the contours at `distance`, stitched into polylines.
    ///
    /// # Errors
    ///
    /// Same as [`Skeleton::offset_segments`].
    pub fn offset_polylines(&self, distance: f64) -> Result<Vec<Polyline>> {
        Ok(connect(&self.offset_segments(distance)?))
    }

    fn heights(&self) -> Vec<f64> {
        self.info.iter().map(|i| i.height).collect()
    }
}

/// Computes the straight skeleton of a polygon with optional holes.
///
/// The first contour is the outer boundary, the rest are holes. Input
/// orientation does not matter. Contours must be simple and must not
/// intersect each other; self-intersecting input is not detected and the
/// result is undefined.
#[derive(Debug)]
pub struct StraightSkeleton2D {
    contours: Vec<Vec<Point2>>,
}

impl StraightSkeleton2D {
    /// Creates a new skeleton operation.
    #[must_use]
    pub fn new(contours: Vec<Vec<Point2>>) -> Self {
        Self { contours }
    }

    /// Executes the sweep.
    ///
    /// # Errors
    ///
    /// - `ContourError::Empty` if no contour is given
    /// - `ContourError::Degenerate` if the outer boundary is degenerate
    /// - `EventError::Unresolved` if the sweep cannot consume every vertex
    /// - `GraphError` if the winged graph is inconsistent
    pub fn execute(&self) -> Result<Skeleton> {
        let contours = ContourSet::normalize(&self.contours)?;

        let mut builder = SkeletonBuilder::new();
        builder.seed(&contours)?;
        builder.run()?;
        let (store, stats) = builder.finish()?;

        let skeleton = Skeleton::freeze(&store, stats, contours.vertex_count())?;
        debug!(
            vertices = skeleton.graph.vertex_count(),
            edges = skeleton.graph.edge_count(),
            "skeleton complete"
        );
        Ok(skeleton)
    }
}

/// Shorthand for `StraightSkeleton2D::new(contours.to_vec()).execute()`.
///
/// # Errors
///
/// Same as [`StraightSkeleton2D::execute`].
pub fn compute_skeleton(contours: &[Vec<Point2>]) -> Result<Skeleton> {
    StraightSkeleton2D::new(contours.to_vec()).execute()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ContourError, SkeletonError};
    use crate::math::polygon_2d::signed_area_2d;
    use crate::math::ray::distance_to_ray;
    use approx::assert_abs_diff_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| Point2::new(x, y)).collect()
    }

    fn skeleton(contours: &[&[(f64, f64)]]) -> Skeleton {
        init_tracing();
        let contours: Vec<Vec<Point2>> = contours.iter().map(|c| pts(c)).collect();
        compute_skeleton(&contours).unwrap()
    }

    /// Every vertex created by an event sits at its height from both lines.
    fn assert_equidistant(sk: &Skeleton) {
        for id in sk.contour_vertex_count()..sk.graph().vertex_count() {
            let info = sk.vertex_info(id).unwrap();
            let p = sk.graph().vertex(id).unwrap().point;
            for edge in [info.left_edge, info.right_edge] {
                let d = distance_to_ray(&p, &sk.contour_edges()[edge].line);
                assert_abs_diff_eq!(d, info.height, epsilon = 1e-6);
            }
        }
    }

    fn assert_every_contour_vertex_advances(sk: &Skeleton) {
        for id in 0..sk.contour_vertex_count() {
            let v = sk.graph().vertex(id).unwrap();
            assert!(v.advancing_edge.is_some(), "vertex {id} has no advancing edge");
        }
    }

    fn find(parent: &mut [usize], mut x: usize) -> usize {
        while parent[x] != x {
            parent[x] = parent[parent[x]];
            x = parent[x];
        }
        x
    }

    fn assert_connected(sk: &Skeleton) {
        let n = sk.graph().vertex_count();
        let mut parent: Vec<usize> = (0..n).collect();
        for e in &sk.graph().edges {
            let (a, b) = (find(&mut parent, e.lower.unwrap()), find(&mut parent, e.higher.unwrap()));
            parent[a] = b;
        }
        let root = find(&mut parent, 0);
        assert!((0..n).all(|v| find(&mut parent, v) == root));
    }

    #[test]
    fn square_meets_at_center() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]]);
        let graph = sk.graph();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 4);

        let apex = graph.vertex(4).unwrap().point;
        assert_abs_diff_eq!(apex.x, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apex.y, 2.0, epsilon = 1e-9);
        assert!(graph.edges.iter().all(|e| e.higher == Some(4)));
        assert_eq!(sk.stats().collapses, 1);
        assert_every_contour_vertex_advances(&sk);
    }

    #[test]
    fn square_offset_is_inner_square() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]]);
        let lines = sk.offset_polylines(1.0).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].closed);
        let expected = [(1.0, 1.0), (3.0, 1.0), (3.0, 3.0), (1.0, 3.0)];
        assert_eq!(lines[0].points.len(), expected.len());
        for (p, &(x, y)) in lines[0].points.iter().zip(&expected) {
            assert_abs_diff_eq!(p.x, x, epsilon = 1e-9);
            assert_abs_diff_eq!(p.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn offset_beyond_apex_is_empty() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]]);
        assert!(sk.offset_segments(2.5).unwrap().is_empty());
    }

    #[test]
    fn invalid_offset_distance() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]]);
        for d in [0.0, -1.0, f64::NAN] {
            assert!(matches!(
                sk.offset_segments(d),
                Err(SkeletonError::Offset(OffsetError::InvalidDistance(_)))
            ));
        }
    }

    #[test]
    fn triangle_collapses_without_events() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]]);
        assert_eq!(sk.graph().edge_count(), 3);
        let stats = sk.stats();
        assert_eq!(stats.edge_events, 0);
        assert_eq!(stats.split_events, 0);
        assert_eq!(stats.collapses, 1);

        // Incenter of the 3-4-5 triangle.
        let apex = sk.graph().vertex(3).unwrap().point;
        assert_abs_diff_eq!(apex.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apex.y, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sk.vertex_info(3).unwrap().height, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn regular_hexagon_has_single_apex() {
        let hexagon: Vec<(f64, f64)> = (0..6_i32)
            .map(|k| {
                let a = f64::from(k) * std::f64::consts::FRAC_PI_3;
                (2.0 * a.cos(), 2.0 * a.sin())
            })
            .collect();
        let sk = skeleton(&[hexagon.as_slice()]);
        let graph = sk.graph();
        assert_eq!(graph.vertex_count(), 7);
        assert_eq!(graph.edge_count(), 6);
        assert!(graph.edges.iter().all(|e| e.higher == Some(6)));

        let apex = graph.vertex(6).unwrap().point;
        assert_abs_diff_eq!(apex.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(apex.y, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sk.vertex_info(6).unwrap().height, 3.0_f64.sqrt(), epsilon = 1e-9);
        for edge in sk.contour_edges() {
            assert_abs_diff_eq!(distance_to_ray(&apex, &edge.line), 3.0_f64.sqrt(), epsilon = 1e-9);
        }
    }

    #[test]
    fn rectangle_has_ridge() {
        let sk = skeleton(&[&[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (0.0, 2.0)]]);
        assert_eq!(sk.graph().edge_count(), 5);
        assert_eq!(sk.graph().vertex_count(), 6);
        assert_eq!(sk.stats().edge_events, 1);
        assert_eq!(sk.stats().collapses, 1);

        let ridge: Vec<Point2> = (4..6).map(|id| sk.graph().vertex(id).unwrap().point).collect();
        let mut xs: Vec<f64> = ridge.iter().map(|p| p.x).collect();
        xs.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(xs[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(xs[1], 3.0, epsilon = 1e-9);
        assert!(ridge.iter().all(|p| (p.y - 1.0).abs() < 1e-9));
        assert_equidistant(&sk);
    }

    #[test]
    fn clockwise_input_is_reoriented() {
        let sk = skeleton(&[&[(0.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)]]);
        assert_eq!(sk.graph().edge_count(), 4);
        for face in sk.faces().unwrap() {
            assert!(signed_area_2d(&face.polygon) > 0.0);
        }
    }

    const NOTCHED: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 0.0), (10.0, 6.0), (5.0, 2.0), (0.0, 6.0)];

    #[test]
    fn notch_splits_the_wavefront() {
        let sk = skeleton(&[NOTCHED]);
        let stats = sk.stats();
        assert_eq!(stats.split_events, 1);
        assert_eq!(stats.collapses, 2);
        assert_eq!(sk.graph().edge_count(), 9);

        // Split hub lies under the notch on the floor's wavefront.
        let hub = sk.graph().vertex(5).unwrap().point;
        let expected = 10.0 / (41.0_f64.sqrt() + 5.0);
        assert_abs_diff_eq!(hub.x, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hub.y, expected, epsilon = 1e-9);

        // The left split vertex joins the notch edge with the floor.
        let v1 = sk.vertex_info(6).unwrap();
        assert_eq!((v1.left_edge, v1.right_edge), (2, 0));
        assert_eq!((v1.left_parent, v1.right_parent), (Some(3), Some(0)));

        assert_every_contour_vertex_advances(&sk);
        assert_equidistant(&sk);
        assert_connected(&sk);
    }

    #[test]
    fn notch_faces_tile_the_polygon() {
        let sk = skeleton(&[NOTCHED]);
        let faces = sk.faces().unwrap();
        assert_eq!(faces.len(), 5);
        let total: f64 = faces.iter().map(|f| signed_area_2d(&f.polygon)).sum();
        assert_abs_diff_eq!(total, signed_area_2d(&pts(NOTCHED)), epsilon = 1e-6);

        let floor = &faces[0];
        assert_eq!(floor.polygon.len(), 5);
        assert_eq!(floor.nodes.first(), Some(&0));
        assert_eq!(floor.nodes.last(), Some(&1));
    }

    #[test]
    fn notch_offset_separates_into_two_loops() {
        let sk = skeleton(&[NOTCHED]);
        let lines = sk.offset_polylines(1.0).unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.closed && l.points.len() == 3));

        // Below the split height the offset is still one loop.
        let lines = sk.offset_polylines(0.5).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].points.len(), 5);
    }

    #[test]
    fn hole_merges_into_outer_wavefront() {
        let sk = skeleton(&[
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
            &[(3.0, 2.0), (6.0, 3.0), (4.0, 5.0)],
        ]);
        assert_eq!(sk.contour_vertex_count(), 7);
        assert!(sk.stats().split_events >= 2);
        assert_every_contour_vertex_advances(&sk);
        assert_equidistant(&sk);
        assert_connected(&sk);

        let faces = sk.faces().unwrap();
        assert_eq!(faces.len(), 7);
        assert!(faces.iter().all(|f| f.polygon.len() >= 3));
        let total: f64 = faces.iter().map(|f| signed_area_2d(&f.polygon)).sum();
        assert_abs_diff_eq!(total, 100.0 - 4.0, epsilon = 1e-6);
    }

    /// Faces tile the polygon: their areas add up to outer minus holes.
    fn assert_faces_tile(sk: &Skeleton, contours: &[Vec<Point2>]) {
        let expected: f64 = contours
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let a = signed_area_2d(c).abs();
                if i == 0 { a } else { -a }
            })
            .sum();
        let faces = sk.faces().unwrap();
        assert_eq!(faces.len(), sk.contour_vertex_count());
        let total: f64 = faces.iter().map(|f| signed_area_2d(&f.polygon)).sum();
        assert_abs_diff_eq!(total, expected, epsilon = 1e-6 * expected.max(1.0));
    }

    /// Every structural property a finished skeleton must satisfy.
    fn assert_sound(contours: &[Vec<Point2>]) -> Skeleton {
        init_tracing();
        let sk = compute_skeleton(contours).unwrap();
        assert_every_contour_vertex_advances(&sk);
        assert_equidistant(&sk);
        assert_connected(&sk);
        assert_faces_tile(&sk, contours);
        sk
    }

    const L_SYMMETRIC: &[(f64, f64)] =
        &[(0.0, 0.0), (4.0, 0.0), (4.0, 2.0), (2.0, 2.0), (2.0, 4.0), (0.0, 4.0)];
    const L_ASYMMETRIC: &[(f64, f64)] =
        &[(0.0, 0.0), (6.0, 0.0), (6.0, 2.0), (3.0, 2.0), (3.0, 5.0), (0.0, 5.0)];
    const L_LONG: &[(f64, f64)] =
        &[(0.0, 0.0), (8.0, 0.0), (8.0, 2.0), (2.0, 2.0), (2.0, 6.0), (0.0, 6.0)];

    #[test]
    fn l_shapes_split_at_the_inner_corner() {
        for shape in [L_SYMMETRIC, L_ASYMMETRIC, L_LONG] {
            let sk = assert_sound(&[pts(shape)]);
            let stats = sk.stats();
            assert_eq!(stats.split_events, 1, "{shape:?}");
            assert_eq!(stats.edge_events, 2, "{shape:?}");
            assert_eq!(stats.collapses, 2, "{shape:?}");

            // The split joins the reflex corner's incoming edge to the
            // floor, which are not neighbors on the contour.
            let joins_far_edges = (sk.contour_vertex_count()..sk.graph().vertex_count()).any(|id| {
                let info = sk.vertex_info(id).unwrap();
                (info.left_edge, info.right_edge) == (2, 0)
            });
            assert!(joins_far_edges, "{shape:?}");
        }
    }

    #[test]
    fn l_shape_split_lands_under_the_reflex_corner() {
        let sk = skeleton(&[L_ASYMMETRIC]);
        let split = (sk.contour_vertex_count()..sk.graph().vertex_count())
            .find(|&id| {
                let info = sk.vertex_info(id).unwrap();
                info.left_edge == 2 && info.right_edge == 0
            })
            .unwrap();
        let p = sk.graph().vertex(split).unwrap().point;
        assert_abs_diff_eq!(p.x, 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(sk.vertex_info(split).unwrap().height, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn l_shape_collapses_onto_existing_vertices() {
        let sk = skeleton(&[L_SYMMETRIC]);
        // Six contour vertices, two ridge ends, and the split hub with its
        // two wavefront vertices that both arms collapse into.
        assert_eq!(sk.graph().vertex_count(), 11);
        assert_eq!(sk.graph().edge_count(), 10);
        let corner = Point2::new(1.0, 1.0);
        let at_corner = sk
            .graph()
            .vertices
            .iter()
            .filter(|v| crate::math::points_nearly_equal(&v.point, &corner))
            .count();
        assert_eq!(at_corner, 3);
    }

    #[test]
    fn skewed_heptagon_resolves() {
        let heptagon = pts(&[
            (6.0, 0.0),
            (1.0, 1.5),
            (-2.0, 9.0),
            (-7.0, 3.5),
            (-4.5, -2.0),
            (-0.5, -3.0),
            (6.0, -8.0),
        ]);
        let sk = assert_sound(&[heptagon]);
        assert_eq!(sk.stats().split_events, 1);
        assert_eq!(sk.graph().edge_count(), 13);
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point2> {
        pts(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    #[test]
    fn hole_stays_an_island_until_it_meets_the_outer_wavefront() {
        let contours = vec![
            square(0.0, 0.0, 10.0, 10.0),
            pts(&[(3.0, 2.0), (6.0, 3.0), (4.0, 5.0)]),
        ];
        let sk = assert_sound(&contours);

        // The hole's corner at (3, 2) reaches the floor's wavefront first.
        let first_contact = (sk.contour_vertex_count()..sk.graph().vertex_count())
            .map(|id| sk.vertex_info(id).unwrap().height)
            .fold(f64::INFINITY, f64::min);
        assert!(first_contact > 0.7 && first_contact < 0.8);

        let before = sk.offset_polylines(0.5).unwrap();
        assert_eq!(before.len(), 2);
        assert!(before.iter().all(|l| l.closed));

        let after = sk.offset_polylines(1.0).unwrap();
        assert_eq!(after.len(), 1);
        assert!(after[0].closed);
    }

    #[test]
    fn square_hole_off_center() {
        let contours = vec![square(0.0, 0.0, 10.0, 10.0), square(3.0, 2.0, 5.0, 4.0)];
        let sk = assert_sound(&contours);
        assert_eq!(sk.stats().split_events, 3);
        assert_eq!(sk.stats().collapses, 3);
    }

    #[test]
    fn two_holes_merge_into_one_roof() {
        let contours = vec![
            square(0.0, 0.0, 12.0, 8.0),
            pts(&[(2.0, 2.0), (4.0, 2.5), (3.0, 5.0)]),
            pts(&[(7.0, 3.0), (10.0, 2.0), (9.0, 6.0)]),
        ];
        let sk = assert_sound(&contours);
        assert_eq!(sk.contour_vertex_count(), 10);
        assert!(sk.stats().split_events >= 2);
    }

    /// Deterministic generator for test polygons.
    struct Lcg(u64);

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            (self.0 >> 11) as f64 / (1_u64 << 53) as f64
        }

        fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
            lo + (hi - lo) * self.next_f64()
        }

        fn below(&mut self, n: usize) -> usize {
            (self.next_f64() * n as f64) as usize
        }
    }

    /// Star-shaped polygon with one vertex per angular sector, hence simple.
    #[allow(clippy::cast_precision_loss)]
    fn star(rng: &mut Lcg, n: usize, radii: (f64, f64), center: (f64, f64)) -> Vec<Point2> {
        let step = std::f64::consts::TAU / n as f64;
        (0..n)
            .map(|k| {
                let a = (k as f64 + rng.uniform(0.1, 0.9)) * step;
                let r = rng.uniform(radii.0, radii.1);
                Point2::new(center.0 + r * a.cos(), center.1 + r * a.sin())
            })
            .collect()
    }

    /// Outer star alone, with one centered hole, or with two side holes;
    /// radii keep every hole clear of the outer boundary and of each other.
    fn random_polygon(seed: u64) -> Vec<Vec<Point2>> {
        let mut rng = Lcg(seed);
        let n = 5 + rng.below(20);
        match seed % 3 {
            0 => vec![star(&mut rng, n, (3.0, 10.0), (0.0, 0.0))],
            1 => {
                let outer = star(&mut rng, n.max(8), (6.0, 10.0), (0.0, 0.0));
                let m = 3 + rng.below(6);
                vec![outer, star(&mut rng, m, (0.5, 2.5), (0.0, 0.0))]
            }
            _ => {
                let outer = star(&mut rng, n.max(8), (7.0, 10.0), (0.0, 0.0));
                let m = 3 + rng.below(4);
                let dy = rng.uniform(-0.5, 0.5);
                let left = star(&mut rng, m, (0.3, 1.2), (-3.5, dy));
                let m = 3 + rng.below(4);
                let dy = rng.uniform(-0.5, 0.5);
                let right = star(&mut rng, m, (0.3, 1.2), (3.5, dy));
                vec![outer, left, right]
            }
        }
    }

    #[test]
    fn random_polygons_resolve() {
        let mut splits = 0;
        for seed in 0..90 {
            let contours = random_polygon(seed);
            let sk = compute_skeleton(&contours)
                .unwrap_or_else(|err| panic!("seed {seed}: {err}"));
            assert_every_contour_vertex_advances(&sk);
            assert_equidistant(&sk);
            assert_connected(&sk);
            assert_faces_tile(&sk, &contours);
            splits += sk.stats().split_events;
        }
        // Concave stars and holes exercise plenty of splits.
        assert!(splits > 300);
    }

    #[test]
    fn degenerate_hole_is_skipped() {
        let sk = skeleton(&[
            &[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)],
            &[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)],
        ]);
        assert_eq!(sk.contour_vertex_count(), 4);
        assert_eq!(sk.graph().edge_count(), 4);
    }

    #[test]
    fn degenerate_outer_contour_is_fatal() {
        let err = compute_skeleton(&[pts(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)])]).unwrap_err();
        assert!(matches!(
            err,
            SkeletonError::Contour(ContourError::Degenerate { index: 0, .. })
        ));
        assert!(matches!(
            compute_skeleton(&[]),
            Err(SkeletonError::Contour(ContourError::Empty))
        ));
    }

    #[test]
    fn dump_round_trips_a_real_skeleton() {
        let sk = skeleton(&[NOTCHED]);
        let text = sk.graph().to_string();
        let parsed: SkeletonGraph = text.parse().unwrap();
        assert_eq!(&parsed, sk.graph());
        assert!(text.starts_with(&format!("{}\n", sk.graph().vertex_count())));
    }

    #[test]
    fn caller_points_are_untouched() {
        let input = vec![pts(&[(0.0, 4.0), (4.0, 4.0), (4.0, 4.0), (4.0, 0.0), (0.0, 0.0)])];
        let before = input.clone();
        let op = StraightSkeleton2D::new(input.clone());
        op.execute().unwrap();
        assert_eq!(input, before);
    }
}
