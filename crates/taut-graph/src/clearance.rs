//! Directional clearance tables.
//!
//! For every lattice vertex and cardinal direction these tables answer in
//! O(1): how many steps can a scan take in that direction before hitting a
//! fully walled boundary *or* the nearest subgoal, whichever is closer.
//! The value is clipped to 1 immediately after a sweep passes a subgoal,
//! so a scan walking its recorded clearance can never skip over an
//! existing node.

use taut_core::{Point, TileGrid};

use crate::graph::{NO_NODE, NodeId, SubgoalGraph};

/// The four per-direction distance tables.
///
/// West/east values are stored row-major, north/south column-major, so
/// each sweep writes (and each scan reads) contiguously.
#[derive(Default, Debug)]
pub(crate) struct Clearance {
    x_len: usize,
    y_len: usize,
    west: Vec<i32>,
    east: Vec<i32>,
    south: Vec<i32>,
    north: Vec<i32>,
}

impl Clearance {
    /// Clearance from `p` toward the axis direction (`dx`, `dy`), exactly
    /// one of which is nonzero.
    #[inline]
    pub(crate) fn toward(&self, p: Point, dx: i32, dy: i32) -> i32 {
        let row = p.y as usize * self.x_len + p.x as usize;
        let col = p.x as usize * self.y_len + p.y as usize;
        match (dx, dy) {
            (-1, 0) => self.west[row],
            (1, 0) => self.east[row],
            (0, -1) => self.south[col],
            (0, 1) => self.north[col],
            _ => unreachable!("({dx}, {dy}) is not an axis direction"),
        }
    }

    /// Run all four sweeps over the lattice. `node_index` must already
    /// hold the subgoal ids — the clip-to-1 rule depends on them.
    fn compute<G: TileGrid>(grid: &G, node_index: &[NodeId], x_len: usize, y_len: usize) -> Self {
        let len = x_len * y_len;
        let mut west = vec![0i32; len];
        let mut east = vec![0i32; len];
        let mut south = vec![0i32; len];
        let mut north = vec![0i32; len];

        // Row sweeps. A horizontal step is walled off when both tiles on
        // that side of the vertex (north and south of the lattice line)
        // are blocked.
        for y in 0..y_len {
            let mut ext = 0i32;
            for x in 0..x_len {
                let p = Point::new(x as i32, y as i32);
                if grid.blocked_nw(p) && grid.blocked_sw(p) {
                    ext = 0;
                }
                west[y * x_len + x] = ext;
                ext += 1;
                if node_index[y * x_len + x] != NO_NODE {
                    ext = 1;
                }
            }

            let mut ext = 0i32;
            for x in (0..x_len).rev() {
                let p = Point::new(x as i32, y as i32);
                if grid.blocked_ne(p) && grid.blocked_se(p) {
                    ext = 0;
                }
                east[y * x_len + x] = ext;
                ext += 1;
                if node_index[y * x_len + x] != NO_NODE {
                    ext = 1;
                }
            }
        }

        // Column sweeps.
        for x in 0..x_len {
            let mut ext = 0i32;
            for y in 0..y_len {
                let p = Point::new(x as i32, y as i32);
                if grid.blocked_se(p) && grid.blocked_sw(p) {
                    ext = 0;
                }
                south[x * y_len + y] = ext;
                ext += 1;
                if node_index[y * x_len + x] != NO_NODE {
                    ext = 1;
                }
            }

            let mut ext = 0i32;
            for y in (0..y_len).rev() {
                let p = Point::new(x as i32, y as i32);
                if grid.blocked_ne(p) && grid.blocked_nw(p) {
                    ext = 0;
                }
                north[x * y_len + y] = ext;
                ext += 1;
                if node_index[y * x_len + x] != NO_NODE {
                    ext = 1;
                }
            }
        }

        Self {
            x_len,
            y_len,
            west,
            east,
            south,
            north,
        }
    }
}

impl SubgoalGraph {
    pub(crate) fn compute_clearances<G: TileGrid>(&mut self, grid: &G) {
        self.clearance = Clearance::compute(grid, &self.node_index, self.x_len, self.y_len);
    }
}
