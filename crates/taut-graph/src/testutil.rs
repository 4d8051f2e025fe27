//! Shared test fixtures: a bitmap grid implementing [`TileGrid`] and a
//! Dijkstra-based necessity checker.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use taut_core::{EPSILON, Point, TileGrid, octile};

use crate::graph::{NodeId, SubgoalGraph};
use crate::prune::{NecessityChecker, TiePolicy};

// ---------------------------------------------------------------------------
// TestGrid
// ---------------------------------------------------------------------------

/// A blocked/unblocked tile bitmap. Out-of-bounds tiles read as blocked.
pub(crate) struct TestGrid {
    sx: i32,
    sy: i32,
    blocked: Vec<bool>,
}

impl TestGrid {
    pub(crate) fn open(sx: i32, sy: i32) -> Self {
        Self {
            sx,
            sy,
            blocked: vec![false; (sx * sy).max(0) as usize],
        }
    }

    /// Parse an ASCII map: `#` is blocked, `.` open. The first row is the
    /// northernmost (highest y).
    pub(crate) fn parse(rows: &[&str]) -> Self {
        let sy = rows.len() as i32;
        let sx = rows[0].len() as i32;
        let mut grid = Self::open(sx, sy);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len() as i32, sx, "ragged map row");
            let ty = sy - 1 - i as i32;
            for (tx, c) in row.bytes().enumerate() {
                if c == b'#' {
                    grid.blocked[(ty * sx) as usize + tx] = true;
                }
            }
        }
        grid
    }

    /// 10x10 open map with one 3x3 blocked square at tiles (3..6, 3..6).
    pub(crate) fn blocked_square_10x10() -> Self {
        let mut grid = Self::open(10, 10);
        for ty in 3..6 {
            for tx in 3..6 {
                grid.blocked[(ty * 10 + tx) as usize] = true;
            }
        }
        grid
    }

    /// Each tile blocked independently with probability `fill`.
    pub(crate) fn random(sx: i32, sy: i32, fill: f64, rng: &mut impl rand::Rng) -> Self {
        use rand::RngExt;
        let mut grid = Self::open(sx, sy);
        for tile in grid.blocked.iter_mut() {
            *tile = rng.random::<f64>() < fill;
        }
        grid
    }

    fn blocked(&self, tx: i32, ty: i32) -> bool {
        if tx < 0 || tx >= self.sx || ty < 0 || ty >= self.sy {
            return true;
        }
        self.blocked[(ty * self.sx + tx) as usize]
    }
}

impl TileGrid for TestGrid {
    fn size_x(&self) -> i32 {
        self.sx
    }

    fn size_y(&self) -> i32 {
        self.sy
    }

    fn blocked_ne(&self, p: Point) -> bool {
        self.blocked(p.x, p.y)
    }

    fn blocked_nw(&self, p: Point) -> bool {
        self.blocked(p.x - 1, p.y)
    }

    fn blocked_se(&self, p: Point) -> bool {
        self.blocked(p.x, p.y - 1)
    }

    fn blocked_sw(&self, p: Point) -> bool {
        self.blocked(p.x - 1, p.y - 1)
    }

    fn is_outer_corner(&self, p: Point) -> bool {
        let blocked_quadrants = [
            self.blocked_ne(p),
            self.blocked_nw(p),
            self.blocked_se(p),
            self.blocked_sw(p),
        ]
        .iter()
        .filter(|&&b| b)
        .count();
        blocked_quadrants == 1
    }

    /// Vertex-to-vertex line of sight (the Theta* grid check).
    fn line_of_sight(&self, a: Point, b: Point) -> bool {
        let (mut x0, mut y0) = (a.x, a.y);
        let (x1, y1) = (b.x, b.y);
        let mut dx = x1 - x0;
        let mut dy = y1 - y0;
        let sx = if dx < 0 {
            dx = -dx;
            -1
        } else {
            1
        };
        let sy = if dy < 0 {
            dy = -dy;
            -1
        } else {
            1
        };
        // Offsets picking the tile entered when stepping in (sx, sy).
        let ox = (sx - 1) / 2;
        let oy = (sy - 1) / 2;

        let mut f = 0;
        if dx >= dy {
            while x0 != x1 {
                f += dy;
                if f >= dx {
                    if self.blocked(x0 + ox, y0 + oy) {
                        return false;
                    }
                    y0 += sy;
                    f -= dx;
                }
                if f != 0 && self.blocked(x0 + ox, y0 + oy) {
                    return false;
                }
                if dy == 0 && self.blocked(x0 + ox, y0) && self.blocked(x0 + ox, y0 - 1) {
                    return false;
                }
                x0 += sx;
            }
        } else {
            while y0 != y1 {
                f += dx;
                if f >= dy {
                    if self.blocked(x0 + ox, y0 + oy) {
                        return false;
                    }
                    x0 += sx;
                    f -= dy;
                }
                if f != 0 && self.blocked(x0 + ox, y0 + oy) {
                    return false;
                }
                if dx == 0 && self.blocked(x0, y0 + oy) && self.blocked(x0 - 1, y0 + oy) {
                    return false;
                }
                y0 += sy;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Necessity checkers
// ---------------------------------------------------------------------------

/// A checker that never finds a detour: necessity then reduces to "some
/// neighbor pair lacks line of sight".
pub(crate) struct NeverShorter;

impl NecessityChecker for NeverShorter {
    fn has_shorter_path(
        &mut self,
        _graph: &SubgoalGraph,
        _from: NodeId,
        _to: NodeId,
        _through: NodeId,
    ) -> bool {
        false
    }
}

/// Min-heap entry ordered by distance (reversed for `BinaryHeap`).
#[derive(PartialEq)]
struct HeapEntry {
    dist: f64,
    node: NodeId,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reference [`NecessityChecker`]: bounded Dijkstra over the graph's
/// current edges with octile weights, skipping the through node.
pub(crate) struct DijkstraChecker {
    tie: TiePolicy,
    dist: Vec<f64>,
}

impl DijkstraChecker {
    pub(crate) fn new(tie: TiePolicy) -> Self {
        Self {
            tie,
            dist: Vec::new(),
        }
    }
}

impl NecessityChecker for DijkstraChecker {
    fn has_shorter_path(
        &mut self,
        graph: &SubgoalGraph,
        from: NodeId,
        to: NodeId,
        through: NodeId,
    ) -> bool {
        let bound = octile(graph.position(from), graph.position(through))
            + octile(graph.position(through), graph.position(to));

        self.dist.clear();
        self.dist.resize(graph.size(), f64::INFINITY);
        self.dist[from] = 0.0;

        let mut open = BinaryHeap::new();
        open.push(HeapEntry {
            dist: 0.0,
            node: from,
        });

        let mut best = f64::INFINITY;
        while let Some(HeapEntry { dist, node }) = open.pop() {
            if dist > self.dist[node] {
                continue;
            }
            if dist > bound + EPSILON {
                break;
            }
            if node == to {
                best = dist;
                break;
            }
            for &next in graph.neighbors(node) {
                if next == through {
                    continue;
                }
                let nd = dist + octile(graph.position(node), graph.position(next));
                if nd < self.dist[next] {
                    self.dist[next] = nd;
                    open.push(HeapEntry {
                        dist: nd,
                        node: next,
                    });
                }
            }
        }

        match self.tie {
            TiePolicy::Keep => best < bound - EPSILON,
            TiePolicy::Prune => best <= bound + EPSILON,
        }
    }
}

// ---------------------------------------------------------------------------
// Assertions
// ---------------------------------------------------------------------------

/// Is there an edge between the subgoals at `a` and `b`?
pub(crate) fn has_edge(graph: &SubgoalGraph, a: Point, b: Point) -> bool {
    let (Some(a), Some(b)) = (graph.node_at(a), graph.node_at(b)) else {
        panic!("has_edge called with a non-subgoal vertex");
    };
    graph.neighbors(a).contains(&b)
}

/// Every edge must appear in both endpoint lists the same number of
/// times.
pub(crate) fn assert_symmetric(graph: &SubgoalGraph) {
    for a in 0..graph.size() {
        for &b in graph.neighbors(a) {
            let fwd = graph.neighbors(a).iter().filter(|&&n| n == b).count();
            let back = graph.neighbors(b).iter().filter(|&&n| n == a).count();
            assert_eq!(
                fwd,
                back,
                "asymmetric edge between {} and {}",
                graph.position(a),
                graph.position(b),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_of_sight_in_the_open() {
        let g = TestGrid::open(6, 6);
        assert!(g.line_of_sight(Point::new(0, 0), Point::new(6, 6)));
        assert!(g.line_of_sight(Point::new(1, 5), Point::new(4, 0)));
        assert!(g.line_of_sight(Point::new(2, 2), Point::new(2, 2)));
    }

    #[test]
    fn line_of_sight_blocked_by_walls() {
        let g = TestGrid::parse(&[
            ".....", //
            "..#..",
            ".....",
            ".....",
            ".....",
        ]);
        // Straight through the tile.
        assert!(!g.line_of_sight(Point::new(0, 4), Point::new(5, 3)));
        // Across the blocked tile's diagonal.
        assert!(!g.line_of_sight(Point::new(2, 3), Point::new(3, 4)));
        // Around it.
        assert!(g.line_of_sight(Point::new(0, 0), Point::new(5, 0)));
    }

    #[test]
    fn line_of_sight_grazes_wall_faces() {
        let g = TestGrid::parse(&[
            ".....", //
            "..#..",
            ".....",
            ".....",
            ".....",
        ]);
        // Sliding along the south face of the blocked tile is fine,
        assert!(g.line_of_sight(Point::new(0, 3), Point::new(5, 3)));
        // and so are its corner vertices seen from the side.
        assert!(g.line_of_sight(Point::new(0, 3), Point::new(2, 3)));
    }

    #[test]
    fn outer_corner_counts_single_blocked_quadrants() {
        let g = TestGrid::parse(&[
            ".....", //
            "..#..",
            "..#..",
            ".....",
            ".....",
        ]);
        // Corners of the 1x2 wall (tiles (2, 2) and (2, 3)).
        assert!(g.is_outer_corner(Point::new(2, 2)));
        assert!(g.is_outer_corner(Point::new(3, 2)));
        assert!(g.is_outer_corner(Point::new(2, 4)));
        assert!(g.is_outer_corner(Point::new(3, 4)));
        // Mid-face vertices touch two blocked tiles.
        assert!(!g.is_outer_corner(Point::new(2, 3)));
        assert!(!g.is_outer_corner(Point::new(3, 3)));
        // Open space and map corners are not subgoals.
        assert!(!g.is_outer_corner(Point::new(0, 0)));
        assert!(!g.is_outer_corner(Point::new(4, 4)));
    }
}
