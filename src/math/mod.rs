pub mod polygon_2d;
pub mod ray;

use std::f64::consts::{PI, TAU};

pub use ray::Ray;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global absolute tolerance for skeleton comparisons.
///
/// Every precision-sensitive comparison in the crate goes through
/// [`nearly_equal`], [`definitely_less`], [`angle_nearly_equal`] or
/// [`points_nearly_equal`] with this value.
pub const EPSILON: f64 = 5e-7;

/// Returns `true` if `a` and `b` differ by less than [`EPSILON`].
#[must_use]
pub fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Returns `true` if `a` is less than `b` by more than [`EPSILON`].
#[must_use]
pub fn definitely_less(a: f64, b: f64) -> bool {
    a < b - EPSILON
}

/// Returns `true` if two angles denote the same direction (modulo 2π).
#[must_use]
pub fn angle_nearly_equal(a: f64, b: f64) -> bool {
    nearly_equal(normalize_angle(a - b), 0.0)
}

/// Maps an angle into `(-π, π]`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

/// Euclidean distance between two points.
#[must_use]
pub fn distance(p: &Point2, q: &Point2) -> f64 {
    (q - p).norm()
}

/// Returns `true` if both coordinates agree within [`EPSILON`].
#[must_use]
pub fn points_nearly_equal(p: &Point2, q: &Point2) -> bool {
    nearly_equal(p.x, q.x) && nearly_equal(p.y, q.y)
}

/// 2D cross product (z component of the 3D cross product).
#[must_use]
pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
    a.x * b.y - a.y * b.x
}
