//! graph-query-core: In-memory query engine for weighted directed graphs.
//!
//! A pure Rust library that holds one graph snapshot as interned adjacency
//! lists and answers three kinds of query over it: all simple paths between
//! two nodes, the cheapest path between two nodes (Dijkstra), and all
//! elementary cycles in canonical form (Johnson). No I/O: snapshots are
//! built from node and edge records supplied by a graph store.
//!
//! A snapshot is built once per query session, read by any number of
//! queries, and dropped. Nothing in this crate mutates it after
//! construction, so independent sessions need no coordination.

mod cycles;
mod graph;
mod path;

pub use cycles::{canonicalize, Cycle, CycleEnumerator};
pub use graph::{Edge, EdgeRecord, Graph, NodeId, NodeInfo, NodeRecord};
pub use path::{CheapestPath, PathFinder};
