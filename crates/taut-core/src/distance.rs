//! Distance metrics on the vertex lattice.

use crate::geom::Point;

/// Absolute tolerance for straight-path equality comparisons.
///
/// Octile sums are compared within this epsilon, never with exact floating
/// equality.
pub const EPSILON: f64 = 1e-5;

/// Octile distance between two vertices: diagonal steps cost √2, axis
/// steps cost 1.
///
/// This is the admissible lower-bound metric for any-angle movement on a
/// unit grid, used throughout pruning and shortcut insertion.
#[inline]
pub fn octile(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    f64::from(lo) * std::f64::consts::SQRT_2 + f64::from(hi - lo)
}
