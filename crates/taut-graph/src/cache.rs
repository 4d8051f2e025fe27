//! Caller-owned graph cache.
//!
//! Construction is expensive, so built graphs are cached and handed back
//! whenever the same (grid identity, level count) pair is requested
//! again. The cache is an explicit object — there is no process-wide
//! singleton — and it holds a single slot, matching the access pattern of
//! a search service working one map at a time.

use taut_core::TileGrid;

use crate::error::Result;
use crate::graph::SubgoalGraph;
use crate::prune::NecessityChecker;

struct CacheSlot {
    grid_id: u64,
    levels: u32,
    graph: SubgoalGraph,
}

/// Single-slot cache of built subgoal graphs.
///
/// `grid_id` is the caller's notion of map identity — typically a
/// revision counter bumped whenever tiles change. Any change of identity
/// or level count replaces the slot.
#[derive(Default)]
pub struct GraphCache {
    slot: Option<CacheSlot>,
    builds: u64,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached graph for (`grid_id`, `levels`), building it
    /// first if the slot holds anything else.
    pub fn get_or_build<G: TileGrid, C: NecessityChecker>(
        &mut self,
        grid: &G,
        grid_id: u64,
        levels: u32,
        checker: &mut C,
    ) -> Result<&mut SubgoalGraph> {
        let hit = matches!(
            &self.slot,
            Some(slot) if slot.grid_id == grid_id && slot.levels == levels
        );
        if hit {
            return Ok(&mut self.slot.as_mut().unwrap().graph);
        }
        log::debug!("graph cache miss for grid {grid_id} at {levels} levels");
        let graph = SubgoalGraph::build(grid, levels, checker)?;
        self.builds += 1;
        let slot = self.slot.insert(CacheSlot {
            grid_id,
            levels,
            graph,
        });
        Ok(&mut slot.graph)
    }

    /// Drop the cached graph.
    ///
    /// Must not be called while a query's transient state is live; doing
    /// so is a contract violation and panics.
    pub fn invalidate(&mut self) {
        if let Some(slot) = &self.slot {
            assert!(
                slot.graph.start_node().is_none(),
                "cache invalidated while a query is live",
            );
        }
        self.slot = None;
    }

    /// Number of graph builds this cache has performed. A repeated
    /// request with an unchanged key does not increment it.
    pub fn builds(&self) -> u64 {
        self.builds
    }
}
