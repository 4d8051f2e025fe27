//! Level pruning.
//!
//! Every permanent node starts at the top level. Each pass demotes the
//! nodes that no neighbor pair actually needs — a pair needs its middle
//! node when the two endpoints lack line of sight *and* the necessity
//! checker finds no detour within the through-path length. Demotion
//! inserts shortcut edges for the pairs the node sat exactly between, so
//! the coarsened levels stay faithful shortest-path structures. Passes
//! repeat until one completes without a demotion.

use taut_core::{EPSILON, TileGrid};

use crate::graph::{NodeId, SubgoalGraph};

/// External collaborator deciding whether a node is dispensable for a
/// given neighbor pair.
///
/// Implementations typically run a bounded shortest-path search over the
/// graph; `&mut self` lets them own their scratch state across calls.
pub trait NecessityChecker {
    /// Report whether a path from `from` to `to` that avoids `through`
    /// exists within the length of the path through it.
    ///
    /// How a detour of exactly the through-path length (within
    /// [`EPSILON`]) is treated is the implementation's [`TiePolicy`].
    fn has_shorter_path(
        &mut self,
        graph: &SubgoalGraph,
        from: NodeId,
        to: NodeId,
        through: NodeId,
    ) -> bool;
}

/// How a [`NecessityChecker`] treats a detour whose length ties with the
/// through-path at the epsilon boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiePolicy {
    /// A tie does not count as a detour: the through node stays
    /// necessary. Equal-length alternatives around an obstacle then keep
    /// every corner at the top level.
    #[default]
    Keep,
    /// A tie counts as a detour, favoring demotion.
    Prune,
}

impl SubgoalGraph {
    /// Run the pruning passes and initialise the default relevance flags.
    pub(crate) fn prune<G: TileGrid, C: NecessityChecker>(&mut self, grid: &G, checker: &mut C) {
        let max_level = self.max_level;
        for level in self.levels.iter_mut() {
            *level = max_level;
        }

        let mut passes = 0u32;
        for level in 2..=max_level {
            let previous = level - 1;
            let mut demoted = 0usize;

            for curr in 0..self.size {
                if self.levels[curr] < level {
                    continue;
                }
                if self.is_necessary(grid, checker, curr, previous) {
                    continue;
                }
                self.levels[curr] = previous;
                demoted += 1;
                self.insert_shortcuts(grid, checker, curr, previous);
            }

            passes += 1;
            log::trace!("prune pass {level}: demoted {demoted} nodes to level {previous}");
            if demoted == 0 {
                break;
            }
        }
        log::debug!("pruning converged after {passes} passes");

        for i in 0..self.original_size {
            self.relevant[i] = self.levels[i] == max_level;
        }
    }

    /// Does any neighbor pair of `curr` (both at level >= `previous`)
    /// depend on `curr` for an optimal connection?
    fn is_necessary<G: TileGrid, C: NecessityChecker>(
        &self,
        grid: &G,
        checker: &mut C,
        curr: NodeId,
        previous: u32,
    ) -> bool {
        let n = self.neighbors[curr].len();
        for i in 0..n {
            let n1 = self.neighbors[curr][i];
            if self.levels[n1] < previous {
                continue;
            }
            for j in i + 1..n {
                let n2 = self.neighbors[curr][j];
                if self.levels[n2] < previous {
                    continue;
                }
                if !grid.line_of_sight(self.positions[n1], self.positions[n2])
                    && !checker.has_shorter_path(self, n1, n2, curr)
                {
                    return true;
                }
            }
        }
        false
    }

    /// After demoting `curr`, reconnect the neighbor pairs it sat exactly
    /// between: octile-collinear pairs with no checker-approved detour get
    /// a direct mutual edge.
    fn insert_shortcuts<G: TileGrid, C: NecessityChecker>(
        &mut self,
        grid: &G,
        checker: &mut C,
        curr: NodeId,
        previous: u32,
    ) {
        let pc = self.positions[curr];
        let n = self.neighbors[curr].len();
        for i in 0..n {
            let n1 = self.neighbors[curr][i];
            if self.levels[n1] < previous {
                continue;
            }
            for j in i + 1..n {
                let n2 = self.neighbors[curr][j];
                if self.levels[n2] < previous {
                    continue;
                }
                let p1 = self.positions[n1];
                let p2 = self.positions[n2];
                let through = grid.octile_distance(p1, pc) + grid.octile_distance(pc, p2);
                if (through - grid.octile_distance(p1, p2)).abs() < EPSILON
                    && !checker.has_shorter_path(&*self, n1, n2, curr)
                {
                    self.connect(n1, n2);
                }
            }
        }
    }
}
