//! Per-query transient nodes.
//!
//! A query inserts up to two transient nodes (start and end) into the
//! otherwise immutable graph, floods query-relevance flags outward from
//! both, and must undo all of it — bit-exactly — before the next query
//! begins. [`QueryScope`] wraps the insert/restore pair so the restore
//! step runs exactly once even when the consuming search exits early.

use std::ops::Deref;

use taut_core::{Point, TileGrid};

use crate::graph::{NO_NODE, NodeId, SubgoalGraph};

impl SubgoalGraph {
    /// Insert the transient start and end nodes for a query.
    ///
    /// An endpoint that coincides with an existing subgoal reuses its
    /// node; otherwise a level-0 node is allocated in a reserved slot and
    /// wired into the graph with mutual taut edges. A freshly allocated
    /// end node additionally flags `has_edge_to_goal` on each of its
    /// direct neighbors. Finally, relevance is flood-marked from both
    /// endpoints along strictly level-increasing edges.
    ///
    /// Exactly one query may be live at a time; the matching
    /// [`restore_original_graph`](Self::restore_original_graph) must run
    /// before the next insertion.
    pub fn add_start_and_end<G: TileGrid>(&mut self, grid: &G, start: Point, end: Point) {
        assert!(
            self.start == NO_NODE && self.end == NO_NODE,
            "query nodes already inserted",
        );

        self.start = self.insert_query_node(grid, start);
        self.mark_relevant(self.start, true);

        let fresh_end = self.node_id_at(end) == NO_NODE;
        self.end = self.insert_query_node(grid, end);
        if fresh_end {
            self.mark_edge_to_goal(true);
        }
        self.mark_relevant(self.end, true);
    }

    /// Reverse the matching [`add_start_and_end`](Self::add_start_and_end)
    /// call, restoring every permanent array bit to its pre-insertion
    /// value.
    ///
    /// Calling this without a live insertion is a contract violation and
    /// panics.
    pub fn restore_original_graph(&mut self) {
        assert!(
            self.start != NO_NODE && self.end != NO_NODE,
            "restore without a matching query insertion",
        );

        if self.start >= self.original_size {
            let i = self.idx(self.positions[self.start]);
            self.node_index[i] = NO_NODE;
        }
        self.mark_relevant(self.start, false);

        if self.end >= self.original_size {
            let i = self.idx(self.positions[self.end]);
            self.node_index[i] = NO_NODE;
            self.mark_edge_to_goal(false);
        }
        self.mark_relevant(self.end, false);

        // Mirrored transient edges sit at the tail of each touched
        // permanent list; pop them back off.
        let mut touched = std::mem::take(&mut self.touched);
        for &n in &touched {
            while self.neighbors[n].last().is_some_and(|&t| t >= self.original_size) {
                self.neighbors[n].pop();
            }
        }
        touched.clear();
        self.touched = touched;

        self.size = self.original_size;
        self.start = NO_NODE;
        self.end = NO_NODE;
    }

    /// Insert the endpoint at `p`, reusing an existing subgoal when one
    /// occupies the vertex.
    fn insert_query_node<G: TileGrid>(&mut self, grid: &G, p: Point) -> NodeId {
        let existing = self.node_id_at(p);
        if existing != NO_NODE {
            return existing;
        }

        let id = self.size;
        debug_assert!(id < self.max_size(), "both transient slots in use");
        self.size += 1;

        let i = self.idx(p);
        self.node_index[i] = id;
        self.positions[id] = p;
        self.levels[id] = 0;
        self.neighbors[id].clear();
        self.compute_neighbors(grid, id);

        // Mirror the new edges so the neighbor relation stays symmetric
        // while the node is live.
        for k in 0..self.neighbors[id].len() {
            let n = self.neighbors[id][k];
            self.neighbors[n].push(id);
            if n < self.original_size {
                self.touched.push(n);
            }
        }
        id
    }

    /// Flood `relevant = value` from `source` through strictly
    /// level-increasing edges below `max_level`.
    ///
    /// Top-level nodes are relevant by default and are never touched, so
    /// the flood terminates at them for free. The unmark flood retraces
    /// exactly the set its mark flood claimed: a mark BFS only ever
    /// crosses nodes it newly marked.
    fn mark_relevant(&mut self, source: NodeId, value: bool) {
        self.queue.clear();
        self.queue.push(source);
        if self.levels[source] < self.max_level {
            self.relevant[source] = value;
        }

        let mut head = 0;
        while head < self.queue.len() {
            let cur = self.queue[head];
            head += 1;
            let cur_level = self.levels[cur];

            for k in 0..self.neighbors[cur].len() {
                let next = self.neighbors[cur][k];
                if self.relevant[next] != value
                    && cur_level < self.levels[next]
                    && self.levels[next] < self.max_level
                {
                    self.relevant[next] = value;
                    self.queue.push(next);
                }
            }
        }
    }

    /// Set or clear the goal-adjacency flag on every direct neighbor of
    /// the end node.
    fn mark_edge_to_goal(&mut self, value: bool) {
        for k in 0..self.neighbors[self.end].len() {
            let n = self.neighbors[self.end][k];
            self.edge_to_goal[n] = value;
        }
    }

    /// Run a query scope: inserts the endpoints now, restores on drop.
    pub fn query_scope<G: TileGrid>(
        &mut self,
        grid: &G,
        start: Point,
        end: Point,
    ) -> QueryScope<'_> {
        self.add_start_and_end(grid, start, end);
        QueryScope { graph: self }
    }
}

// ---------------------------------------------------------------------------
// QueryScope
// ---------------------------------------------------------------------------

/// Scoped access to a graph with live query nodes.
///
/// Dereferences to the graph for the consuming search;
/// [`SubgoalGraph::restore_original_graph`] runs exactly once when the
/// scope drops.
pub struct QueryScope<'a> {
    graph: &'a mut SubgoalGraph,
}

impl Deref for QueryScope<'_> {
    type Target = SubgoalGraph;

    fn deref(&self) -> &SubgoalGraph {
        self.graph
    }
}

impl Drop for QueryScope<'_> {
    fn drop(&mut self) {
        self.graph.restore_original_graph();
    }
}
