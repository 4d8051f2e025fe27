//! The grid-map collaborator contract.
//!
//! The subgoal graph never owns or inspects tiles directly; everything it
//! needs from the map goes through [`TileGrid`]. Implementations are
//! expected to be cheap per call — the construction algorithms issue these
//! queries in tight scan loops.

use crate::distance;
use crate::geom::Point;

/// Read access to a bounded grid of blocked/unblocked unit tiles.
///
/// A grid of `size_x() x size_y()` tiles has a vertex lattice spanning
/// `(0..=size_x, 0..=size_y)`. Every query takes vertex coordinates; each
/// vertex touches up to four tiles, one per compass quadrant (+y is
/// north). Tiles outside the grid bounds must be reported as blocked, so
/// scans terminate at the map edge without separate bounds checks.
pub trait TileGrid {
    /// Width of the grid in tiles.
    fn size_x(&self) -> i32;

    /// Height of the grid in tiles.
    fn size_y(&self) -> i32;

    /// Is the tile north-east of vertex `p` blocked?
    fn blocked_ne(&self, p: Point) -> bool;

    /// Is the tile north-west of vertex `p` blocked?
    fn blocked_nw(&self, p: Point) -> bool;

    /// Is the tile south-east of vertex `p` blocked?
    fn blocked_se(&self, p: Point) -> bool;

    /// Is the tile south-west of vertex `p` blocked?
    fn blocked_sw(&self, p: Point) -> bool;

    /// Quadrant predicate for a diagonal direction: the tile touching `p`
    /// in the (`dx`, `dy`) quadrant, with `dx` and `dy` in `{-1, 1}`.
    #[inline]
    fn blocked_toward(&self, p: Point, dx: i32, dy: i32) -> bool {
        match (dx > 0, dy > 0) {
            (true, true) => self.blocked_ne(p),
            (false, true) => self.blocked_nw(p),
            (true, false) => self.blocked_se(p),
            (false, false) => self.blocked_sw(p),
        }
    }

    /// Is vertex `p` an outer corner — a convex corner of blocked terrain
    /// reachable from open space? Outer corners are the subgoal candidates.
    fn is_outer_corner(&self, p: Point) -> bool;

    /// Does an unobstructed straight segment exist between vertices `a`
    /// and `b`?
    fn line_of_sight(&self, a: Point, b: Point) -> bool;

    /// Octile distance between two vertices.
    #[inline]
    fn octile_distance(&self, a: Point, b: Point) -> f64 {
        distance::octile(a, b)
    }
}
