//! Straight skeletons of polygons with holes.
//!
//! [`StraightSkeleton2D`] sweeps the inward wavefront of the input contours
//! and returns a [`Skeleton`]: a winged skeleton graph together with roof
//! face and offset path queries.

pub mod contour;
pub mod error;
pub mod extract;
pub mod graph;
pub mod math;
pub mod skeleton;

pub use error::{Result, SkeletonError};
pub use graph::SkeletonGraph;
pub use skeleton::{compute_skeleton, Skeleton, SkeletonStats, StraightSkeleton2D};
