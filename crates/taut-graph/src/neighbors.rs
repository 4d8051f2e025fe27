//! Subgoal detection and taut-edge neighbor construction.
//!
//! Detection assigns dense ids to every outer corner in row-major scan
//! order. The neighbor builder then connects each node to the subgoals
//! reachable by a taut path: straight cardinal walks resolved in O(1)
//! through the clearance tables, plus a propagation scan per diagonal
//! quadrant that finds both the direct diagonal neighbor and every
//! neighbor reachable by a diagonal-then-straight "L" — together exactly
//! the edge set an any-angle search needs for optimality.

use taut_core::{Point, TileGrid};

use crate::graph::{NO_NODE, NodeId, SubgoalGraph};

impl SubgoalGraph {
    /// Scan the lattice for outer corners and index them. Sizes every
    /// per-node array to `original_size + 2`, reserving the transient
    /// start/end slots.
    pub(crate) fn detect_subgoals<G: TileGrid>(&mut self, grid: &G) {
        self.node_index = vec![NO_NODE; self.x_len * self.y_len];
        self.positions.clear();

        for y in 0..self.y_len as i32 {
            for x in 0..self.x_len as i32 {
                let p = Point::new(x, y);
                if grid.is_outer_corner(p) {
                    let i = self.idx(p);
                    self.node_index[i] = self.positions.len();
                    self.positions.push(p);
                }
            }
        }

        self.original_size = self.positions.len();
        self.size = self.original_size;

        let max_size = self.max_size();
        self.positions.resize(max_size, Point::ZERO);
        self.neighbors = vec![Vec::new(); max_size];
        self.levels = vec![0; max_size];
        self.relevant = vec![false; max_size];
        self.edge_to_goal = vec![false; max_size];
    }

    /// Connect `index` to its full taut neighbor set.
    ///
    /// Appends one-directionally; running this twice for the same node is
    /// the only way to produce duplicate entries and must not happen.
    pub(crate) fn compute_neighbors<G: TileGrid>(&mut self, grid: &G, index: NodeId) {
        let p = self.positions[index];

        // Cardinal neighbors: the clearance value either stops at a wall
        // or lands exactly on the nearest subgoal.
        for (dx, dy) in [(-1, 0), (1, 0), (0, 1), (0, -1)] {
            let ext = self.clearance.toward(p, dx, dy);
            if ext == 0 {
                continue;
            }
            let t = p.shift(dx * ext, dy * ext);
            if self.node_id_at(t) != NO_NODE {
                self.push_neighbor(index, t);
            }
        }

        for (dx, dy) in [(-1, 1), (1, 1), (-1, -1), (1, -1)] {
            self.diagonal_neighbors(grid, index, dx, dy);
        }
    }

    /// One diagonal quadrant of the propagation scan.
    fn diagonal_neighbors<G: TileGrid>(&mut self, grid: &G, index: NodeId, dx: i32, dy: i32) {
        let p = self.positions[index];

        // Walk the 45° diagonal while the quadrant tile stays open. A
        // subgoal on the diagonal is the direct diagonal neighbor and ends
        // the walk early.
        let mut diag = 0;
        let mut q = p;
        while !grid.blocked_toward(q, dx, dy) {
            diag += 1;
            q = q.shift(dx, dy);
            if self.node_id_at(q) != NO_NODE {
                self.push_neighbor(index, q);
                diag -= 1;
                break;
            }
        }

        // Replay the walk against both orthogonal axes.
        self.replay_axis(index, diag, dx, dy, 0, dy);
        self.replay_axis(index, diag, dx, dy, dx, 0);
    }

    /// Replay the diagonal walk of quadrant (`dx`, `dy`), probing the axis
    /// direction (`ax`, `ay`) at every step.
    ///
    /// `max` starts from the clearance at the origin and shrinks whenever
    /// a subgoal is exposed, so each found neighbor shadows everything
    /// behind it — only taut connections survive.
    fn replay_axis(&mut self, index: NodeId, diag: i32, dx: i32, dy: i32, ax: i32, ay: i32) {
        let p = self.positions[index];
        let mut max = self.clearance.toward(p, ax, ay);
        if self.node_id_at(p.shift(ax * max, ay * max)) != NO_NODE {
            max -= 1;
        }

        let mut q = p;
        for _ in 0..diag {
            q = q.shift(dx, dy);
            let mut ext = self.clearance.toward(q, ax, ay);
            if ext <= max {
                let t = q.shift(ax * ext, ay * ext);
                if self.node_id_at(t) != NO_NODE {
                    self.push_neighbor(index, t);
                    ext -= 1;
                }
                max = ext;
            }
        }
    }
}
