use crate::math::polygon_2d::rotate_to_canonical_start;
use crate::math::{angle_nearly_equal, points_nearly_equal, Point2};

use super::offset::Segment2;

/// A chain of stitched offset segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point2>,
    /// `true` if the last point connects back to the first.
    pub closed: bool,
}

/// Stitches directed segments into polylines by matching endpoints.
///
/// Greedy: each chain is extended with the nearest unused segment whose
/// start coincides with the chain's end. Closed chains drop their repeated
/// closing point and are rotated to a canonical start; chains that cannot
/// be closed are returned open.
#[must_use]
pub fn connect(segments: &[Segment2]) -> Vec<Polyline> {
    let n = segments.len();
    let mut used = vec![false; n];
    let mut results = Vec::new();

    for start in 0..n {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut chain = vec![segments[start].start, segments[start].end];

        loop {
            let Some(&end) = chain.last() else { break };

            let nearest = segments
                .iter()
                .enumerate()
                .filter(|&(i, s)| !used[i] && points_nearly_equal(&s.start, &end))
                .min_by(|(_, a), (_, b)| {
                    (a.start - end)
                        .norm_squared()
                        .total_cmp(&(b.start - end).norm_squared())
                });

            let Some((next, _)) = nearest else { break };
            used[next] = true;
            let point = segments[next].end;
            // A straight continuation replaces the shared point.
            if chain.len() >= 2 && is_straight(&chain[chain.len() - 2], &end, &point) {
                chain.pop();
            }
            chain.push(point);
        }

        let closed = chain.len() > 2 && points_nearly_equal(&chain[0], &chain[chain.len() - 1]);
        if closed {
            chain.pop();
            if chain.len() >= 3 && is_straight(&chain[chain.len() - 1], &chain[0], &chain[1]) {
                chain.remove(0);
            }
            results.push(Polyline {
                points: rotate_to_canonical_start(&chain),
                closed,
            });
        } else {
            results.push(Polyline {
                points: chain,
                closed,
            });
        }
    }

    results
}

/// `b` lies on the straight run from `a` to `c`.
fn is_straight(a: &Point2, b: &Point2, c: &Point2) -> bool {
    if points_nearly_equal(a, b) || points_nearly_equal(b, c) {
        return true;
    }
    let (ab, bc) = (b - a, c - b);
    angle_nearly_equal(ab.y.atan2(ab.x), bc.y.atan2(bc.x))
}
