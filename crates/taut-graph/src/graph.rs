use taut_core::{Point, TileGrid};

use crate::clearance::Clearance;
use crate::error::{GraphError, Result};
use crate::prune::NecessityChecker;

/// Dense node identifier. Permanent subgoals occupy `0..original_size`;
/// the two slots above are reserved for the transient start/end nodes.
pub type NodeId = usize;

/// Sentinel meaning "no node at this vertex" in the position lookup.
pub const NO_NODE: NodeId = usize::MAX;

/// Summary of a built graph, for logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStats {
    /// Number of permanent subgoal nodes.
    pub nodes: usize,
    /// Number of undirected edges.
    pub edges: usize,
    /// Node count per level, indexed by level (index 0 is always empty
    /// for permanent nodes).
    pub level_counts: Vec<usize>,
}

// ---------------------------------------------------------------------------
// SubgoalGraph
// ---------------------------------------------------------------------------

/// A multi-level any-angle subgoal graph over a blocked/unblocked grid.
///
/// The graph owns every per-node array in flat storage: the vertex→node
/// lookup, positions, levels, the taut-edge neighbor lists, the
/// query-scoped flags, and the directional clearance tables used to build
/// the edges. Construction runs once ([`SubgoalGraph::build`]); afterwards
/// the only mutation is the per-query insertion and exact removal of
/// transient start/end nodes (see `add_start_and_end` /
/// `restore_original_graph`).
#[derive(Debug)]
pub struct SubgoalGraph {
    /// Vertex lattice width (`size_x + 1`).
    pub(crate) x_len: usize,
    /// Vertex lattice height (`size_y + 1`).
    pub(crate) y_len: usize,
    pub(crate) max_level: u32,

    /// Vertex → node id, row-major over the lattice. `NO_NODE` if absent.
    pub(crate) node_index: Vec<NodeId>,
    pub(crate) positions: Vec<Point>,
    /// Per-node owned neighbor lists. Growth is geometric and never
    /// truncates.
    pub(crate) neighbors: Vec<Vec<NodeId>>,
    pub(crate) levels: Vec<u32>,
    pub(crate) relevant: Vec<bool>,
    pub(crate) edge_to_goal: Vec<bool>,
    pub(crate) clearance: Clearance,

    pub(crate) size: usize,
    pub(crate) original_size: usize,

    // Query-scoped state.
    pub(crate) start: NodeId,
    pub(crate) end: NodeId,
    /// Permanent nodes holding mirrored edges to a live transient node.
    pub(crate) touched: Vec<NodeId>,
    /// Reusable flood-fill worklist, sized by high-water mark.
    pub(crate) queue: Vec<NodeId>,
}

impl SubgoalGraph {
    /// Build the complete graph for `grid`: detect subgoals, compute the
    /// clearance tables, connect every taut edge, then prune the node set
    /// into `levels` levels using `checker` to decide necessity.
    pub fn build<G: TileGrid, C: NecessityChecker>(
        grid: &G,
        levels: u32,
        checker: &mut C,
    ) -> Result<Self> {
        if levels == 0 {
            return Err(GraphError::LevelCount(levels));
        }
        let (sx, sy) = (grid.size_x(), grid.size_y());
        if sx <= 0 || sy <= 0 {
            return Err(GraphError::Dimensions(sx, sy));
        }

        let mut graph = Self {
            x_len: (sx + 1) as usize,
            y_len: (sy + 1) as usize,
            max_level: levels,
            node_index: Vec::new(),
            positions: Vec::new(),
            neighbors: Vec::new(),
            levels: Vec::new(),
            relevant: Vec::new(),
            edge_to_goal: Vec::new(),
            clearance: Clearance::default(),
            size: 0,
            original_size: 0,
            start: NO_NODE,
            end: NO_NODE,
            touched: Vec::new(),
            queue: Vec::new(),
        };

        // Clearance resets depend on subgoal positions, so detection runs
        // first.
        graph.detect_subgoals(grid);
        graph.compute_clearances(grid);
        for i in 0..graph.size {
            graph.compute_neighbors(grid, i);
        }
        graph.prune(grid, checker);

        let stats = graph.stats();
        log::debug!(
            "built subgoal graph: {} nodes, {} edges, levels {:?}",
            stats.nodes,
            stats.edges,
            stats.level_counts,
        );
        Ok(graph)
    }

    // -----------------------------------------------------------------------
    // Coordinate helpers
    // -----------------------------------------------------------------------

    /// Flat lattice index of a vertex. `p` must be inside the lattice.
    #[inline]
    pub(crate) fn idx(&self, p: Point) -> usize {
        debug_assert!(
            p.x >= 0 && (p.x as usize) < self.x_len && p.y >= 0 && (p.y as usize) < self.y_len,
            "vertex {p} outside the lattice",
        );
        p.y as usize * self.x_len + p.x as usize
    }

    /// Node id at a vertex, or [`NO_NODE`].
    #[inline]
    pub(crate) fn node_id_at(&self, p: Point) -> NodeId {
        self.node_index[self.idx(p)]
    }

    // -----------------------------------------------------------------------
    // Edge operations
    // -----------------------------------------------------------------------

    /// Append the node at `to` onto `from`'s neighbor list (one direction).
    ///
    /// Bulk construction runs the neighbor scan once per node, so the
    /// symmetric counterpart is discovered by `to`'s own scan.
    pub(crate) fn push_neighbor(&mut self, from: NodeId, to: Point) {
        let target = self.node_id_at(to);
        debug_assert!(target != NO_NODE, "neighbor target {to} is not a subgoal");
        self.neighbors[from].push(target);
    }

    /// Insert a mutual edge between two existing nodes.
    pub(crate) fn connect(&mut self, a: NodeId, b: NodeId) {
        self.neighbors[a].push(b);
        self.neighbors[b].push(a);
    }

    // -----------------------------------------------------------------------
    // Read surface
    // -----------------------------------------------------------------------

    /// Current node count, including any live transient nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of permanent subgoals.
    #[inline]
    pub fn original_size(&self) -> usize {
        self.original_size
    }

    /// Capacity including the two reserved transient slots.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.original_size + 2
    }

    /// The level count this graph was built with; nodes at this level are
    /// never pruned.
    #[inline]
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// A node's level. 0 only for transient start/end nodes.
    #[inline]
    pub fn level(&self, id: NodeId) -> u32 {
        self.levels[id]
    }

    /// A node's vertex position.
    #[inline]
    pub fn position(&self, id: NodeId) -> Point {
        self.positions[id]
    }

    /// A node's taut-edge neighbors.
    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        &self.neighbors[id]
    }

    /// Whether the node participates in the current query (always true
    /// for top-level nodes).
    #[inline]
    pub fn is_relevant(&self, id: NodeId) -> bool {
        self.relevant[id]
    }

    /// Whether the node is a direct neighbor of the active end node.
    #[inline]
    pub fn has_edge_to_goal(&self, id: NodeId) -> bool {
        self.edge_to_goal[id]
    }

    /// Node id occupying a vertex, if any.
    #[inline]
    pub fn node_at(&self, p: Point) -> Option<NodeId> {
        match self.node_id_at(p) {
            NO_NODE => None,
            id => Some(id),
        }
    }

    /// The active query's start node, if one is inserted.
    #[inline]
    pub fn start_node(&self) -> Option<NodeId> {
        (self.start != NO_NODE).then_some(self.start)
    }

    /// The active query's end node, if one is inserted.
    #[inline]
    pub fn end_node(&self) -> Option<NodeId> {
        (self.end != NO_NODE).then_some(self.end)
    }

    /// Node, edge and level summary over the current node set.
    pub fn stats(&self) -> GraphStats {
        let mut level_counts = vec![0usize; self.max_level as usize + 1];
        let mut half_edges = 0usize;
        for id in 0..self.size {
            level_counts[self.levels[id] as usize] += 1;
            half_edges += self.neighbors[id].len();
        }
        GraphStats {
            nodes: self.size,
            edges: half_edges / 2,
            level_counts,
        }
    }
}
