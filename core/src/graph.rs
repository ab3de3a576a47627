use std::collections::HashMap;

use tracing::debug;

/// Dense internal node index, assigned in insertion order.
pub type NodeId = u32;

/// Metadata about a node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// User-facing identifier, unique within the graph.
    pub id: String,
    pub name: String,
}

/// A directed, weighted edge in the adjacency list.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub target: NodeId,
    pub cost: f64,
}

/// A node as delivered by the graph store.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    pub id: String,
    pub name: String,
}

impl NodeRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// An edge as delivered by the graph store. Endpoints are user-facing
/// identifiers; `id` is bookkeeping only and is not kept in the snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub cost: f64,
}

impl EdgeRecord {
    pub fn new(
        id: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        cost: f64,
    ) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            cost,
        }
    }
}

/// In-memory snapshot of one graph: interned node identifiers plus
/// outgoing adjacency lists.
///
/// Every declared node has an adjacency slot, so a sink (empty slot) is
/// distinguishable from an identifier that is not in the graph at all.
/// Built once per query session and only read afterwards.
#[derive(Debug, Clone)]
pub struct Graph {
    graph_id: String,
    nodes: Vec<NodeInfo>,
    index: HashMap<String, NodeId>,
    outgoing: Vec<Vec<Edge>>,
}

impl Graph {
    pub fn new(graph_id: impl Into<String>) -> Self {
        Self {
            graph_id: graph_id.into(),
            nodes: Vec::new(),
            index: HashMap::new(),
            outgoing: Vec::new(),
        }
    }

    /// Pre-allocate for a known graph size.
    pub fn with_capacity(graph_id: impl Into<String>, node_count: usize) -> Self {
        Self {
            graph_id: graph_id.into(),
            nodes: Vec::with_capacity(node_count),
            index: HashMap::with_capacity(node_count),
            outgoing: Vec::with_capacity(node_count),
        }
    }

    /// Build a snapshot from the store's node and edge lists.
    pub fn from_records<N, E>(graph_id: impl Into<String>, nodes: N, edges: E) -> Self
    where
        N: IntoIterator<Item = NodeRecord>,
        E: IntoIterator<Item = EdgeRecord>,
    {
        let mut graph = Self::new(graph_id);
        graph.load_nodes(nodes);
        graph.load_edges(edges);
        graph
    }

    pub fn graph_id(&self) -> &str {
        &self.graph_id
    }

    /// Register a node. Re-registering an identifier keeps the first entry
    /// and returns its existing index.
    pub fn add_node(&mut self, id: impl Into<String>, name: impl Into<String>) -> NodeId {
        let id = id.into();
        if let Some(&existing) = self.index.get(&id) {
            return existing;
        }
        let idx = self.nodes.len() as NodeId;
        self.index.insert(id.clone(), idx);
        self.nodes.push(NodeInfo {
            id,
            name: name.into(),
        });
        self.outgoing.push(Vec::new());
        idx
    }

    /// Add a directed edge between two registered nodes. An edge naming an
    /// index this graph never handed out is dropped.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, cost: f64) {
        if to as usize >= self.nodes.len() {
            debug!(graph = %self.graph_id, from, to, "skipping edge to unregistered node");
            return;
        }
        match self.outgoing.get_mut(from as usize) {
            Some(edges) => edges.push(Edge { target: to, cost }),
            None => debug!(graph = %self.graph_id, from, to, "skipping edge from unregistered node"),
        }
    }

    pub fn load_nodes<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = NodeRecord>,
    {
        for node in nodes {
            self.add_node(node.id, node.name);
        }
    }

    /// Bulk load edges by identifier. Edges whose endpoints were never
    /// declared are dropped; the store guarantees this does not happen.
    pub fn load_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = EdgeRecord>,
    {
        for edge in edges {
            match (self.resolve(&edge.from), self.resolve(&edge.to)) {
                (Some(from), Some(to)) => self.add_edge(from, to, edge.cost),
                _ => debug!(
                    graph = %self.graph_id,
                    edge = %edge.id,
                    from = %edge.from,
                    to = %edge.to,
                    "skipping edge with undeclared endpoint"
                ),
            }
        }
    }

    /// Look up a node by its user-facing identifier.
    pub fn resolve(&self, id: &str) -> Option<NodeId> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Get node metadata.
    pub fn node(&self, id: NodeId) -> Option<&NodeInfo> {
        self.nodes.get(id as usize)
    }

    /// User-facing identifier of an interned node.
    ///
    /// Panics if `id` was not handed out by this graph.
    pub fn ident(&self, id: NodeId) -> &str {
        &self.nodes[id as usize].id
    }

    /// Get outgoing edges for a node.
    pub fn neighbors_out(&self, id: NodeId) -> &[Edge] {
        self.outgoing
            .get(id as usize)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Adjacency view for one node: `(neighbor identifier, cost)` pairs in
    /// edge insertion order. `None` means the node is not in this graph;
    /// a sink yields an empty iterator.
    pub fn neighbors(&self, id: &str) -> Option<impl Iterator<Item = (&str, f64)> + '_> {
        let idx = self.resolve(id)?;
        Some(
            self.neighbors_out(idx)
                .iter()
                .map(move |e| (self.ident(e.target), e.cost)),
        )
    }

    pub fn nodes_iter(&self) -> impl Iterator<Item = (NodeId, &NodeInfo)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, info)| (i as NodeId, info))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.iter().map(|v| v.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let strings: usize = self
            .nodes
            .iter()
            .map(|n| n.id.len() * 2 + n.name.len())
            .sum();
        let nodes_mem = self.nodes.len()
            * (size_of::<NodeInfo>() + size_of::<Vec<Edge>>() + size_of::<String>() + 16);
        let edges_mem: usize = self
            .outgoing
            .iter()
            .map(|v| v.capacity() * size_of::<Edge>())
            .sum();

        nodes_mem + strings + edges_mem
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Graph {
        Graph::from_records(
            "g1",
            vec![
                NodeRecord::new("a", "Node A"),
                NodeRecord::new("b", "Node B"),
                NodeRecord::new("c", "Node C"),
            ],
            vec![
                EdgeRecord::new("e1", "a", "b", 1.0),
                EdgeRecord::new("e2", "a", "c", 2.5),
                EdgeRecord::new("e3", "b", "c", 0.0),
            ],
        )
    }

    #[test]
    fn test_counts() {
        let g = sample();
        assert_eq!(g.graph_id(), "g1");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 3);
        assert!(!g.is_empty());
    }

    #[test]
    fn test_neighbors_in_insertion_order() {
        let g = sample();
        let out: Vec<(&str, f64)> = g.neighbors("a").unwrap().collect();
        assert_eq!(out, vec![("b", 1.0), ("c", 2.5)]);
    }

    #[test]
    fn test_sink_distinct_from_unknown() {
        let g = sample();
        assert_eq!(g.neighbors("c").unwrap().count(), 0);
        assert!(g.neighbors("zzz").is_none());
        assert!(g.contains("c"));
        assert!(!g.contains("zzz"));
    }

    #[test]
    fn test_isolated_node_present() {
        let mut g = Graph::new("g");
        g.add_node("lonely", "Lonely");
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert!(g.neighbors("lonely").is_some());
    }

    #[test]
    fn test_parallel_edges_kept() {
        let g = Graph::from_records(
            "g",
            vec![NodeRecord::new("a", "A"), NodeRecord::new("b", "B")],
            vec![
                EdgeRecord::new("e1", "a", "b", 1.0),
                EdgeRecord::new("e2", "a", "b", 4.0),
            ],
        );
        assert_eq!(g.edge_count(), 2);
        let costs: Vec<f64> = g.neighbors("a").unwrap().map(|(_, c)| c).collect();
        assert_eq!(costs, vec![1.0, 4.0]);
    }

    #[test]
    fn test_undeclared_endpoint_skipped() {
        let g = Graph::from_records(
            "g",
            vec![NodeRecord::new("a", "A")],
            vec![EdgeRecord::new("e1", "a", "ghost", 1.0)],
        );
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.edge_count(), 0);
        assert!(!g.contains("ghost"));
    }

    #[test]
    fn test_duplicate_node_keeps_first() {
        let mut g = Graph::new("g");
        let first = g.add_node("a", "First");
        let second = g.add_node("a", "Second");
        assert_eq!(first, second);
        assert_eq!(g.node(first).unwrap().name, "First");
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_resolve_and_ident() {
        let g = sample();
        let b = g.resolve("b").unwrap();
        assert_eq!(g.ident(b), "b");
        assert_eq!(g.node(b).unwrap().name, "Node B");
        assert!(g.resolve("nope").is_none());
    }

    #[test]
    fn test_self_loop_in_adjacency() {
        let g = Graph::from_records(
            "g",
            vec![NodeRecord::new("a", "A")],
            vec![EdgeRecord::new("e1", "a", "a", 1.0)],
        );
        let out: Vec<(&str, f64)> = g.neighbors("a").unwrap().collect();
        assert_eq!(out, vec![("a", 1.0)]);
    }

    #[test]
    fn test_add_edge_unregistered_index_dropped() {
        let mut g = Graph::new("g");
        let a = g.add_node("a", "A");
        let b = g.add_node("b", "B");
        g.add_edge(a, 7, 1.0);
        g.add_edge(7, b, 1.0);
        g.add_edge(a, b, 2.0);

        assert_eq!(g.edge_count(), 1);
        let out: Vec<(&str, f64)> = g.neighbors("a").unwrap().collect();
        assert_eq!(out, vec![("b", 2.0)]);
    }

    #[test]
    fn test_memory_usage_nonzero() {
        let g = sample();
        assert!(g.memory_usage() > 0);
        assert!(Graph::new("empty").memory_usage() == 0);
    }
}
