//! Multi-level any-angle subgoal graphs.
//!
//! This crate builds and maintains the preprocessing structure that
//! accelerates any-angle shortest-path search on blocked/unblocked grid
//! maps:
//!
//! - **Subgoal detection** — every outer corner of blocked terrain
//!   becomes a node ([`SubgoalGraph::build`])
//! - **Clearance tables** — O(1) directional distance-to-obstruction
//!   lookups, clipped at subgoals
//! - **Taut-edge neighbors** — cardinal walks plus per-quadrant diagonal
//!   propagation scans
//! - **Level pruning** — an iterative fixpoint pass demoting dispensable
//!   nodes and patching in shortcut edges
//! - **Query overlay** — transient start/end nodes inserted per query and
//!   removed bit-exactly ([`SubgoalGraph::add_start_and_end`],
//!   [`QueryScope`])
//!
//! The underlying grid is consumed through [`taut_core::TileGrid`]; the
//! shortest-path necessity test used while pruning is delegated to a
//! [`NecessityChecker`]. Built graphs can be memoised with [`GraphCache`].
//!
//! Construction is strictly single-threaded and batch: nothing here
//! blocks, and one query's insert/restore pair must complete before the
//! next begins.

mod cache;
mod clearance;
mod error;
mod graph;
mod neighbors;
mod prune;
mod query;

#[cfg(test)]
pub(crate) mod testutil;

pub use cache::GraphCache;
pub use error::{GraphError, Result};
pub use graph::{GraphStats, NO_NODE, NodeId, SubgoalGraph};
pub use prune::{NecessityChecker, TiePolicy};
pub use query::QueryScope;
