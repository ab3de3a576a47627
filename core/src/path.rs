use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::debug;

use crate::graph::{Graph, NodeId};

/// Result of a cheapest-path query.
#[derive(Debug, Clone, PartialEq)]
pub struct CheapestPath {
    /// Node identifiers from start to end, both included.
    pub nodes: Vec<String>,
    /// Sum of the traversed edge costs.
    pub cost: f64,
}

/// Path queries over one graph snapshot.
///
/// A path must traverse at least one edge: queries with `start == end`
/// return no result, as do queries naming a node that is not in the graph.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g> {
    graph: &'g Graph,
}

impl<'g> PathFinder<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Every simple path from `start` to `end`.
    ///
    /// Exhaustive DFS with a visited set scoped to the current path, so no
    /// node repeats within a path but nodes are reusable across paths.
    /// Parallel edges are distinct edges and yield one entry each. The
    /// result count is unbounded; on dense cyclic graphs it grows
    /// combinatorially.
    pub fn find_all_simple_paths(&self, start: &str, end: &str) -> Vec<Vec<String>> {
        let (Some(start_id), Some(end_id)) = (self.graph.resolve(start), self.graph.resolve(end))
        else {
            return Vec::new();
        };
        if start_id == end_id {
            return Vec::new();
        }

        let mut on_path = vec![false; self.graph.node_count()];
        let mut path: Vec<NodeId> = vec![start_id];
        // Parallel to `path`: index of the next outgoing edge to try.
        let mut cursors: Vec<usize> = vec![0];
        let mut paths = Vec::new();
        on_path[start_id as usize] = true;

        while let Some(cursor) = cursors.last_mut() {
            let current = path[path.len() - 1];
            let edges = self.graph.neighbors_out(current);

            if *cursor >= edges.len() {
                cursors.pop();
                if let Some(done) = path.pop() {
                    on_path[done as usize] = false;
                }
                continue;
            }

            let next = edges[*cursor].target;
            *cursor += 1;

            if on_path[next as usize] {
                continue;
            }
            if next == end_id {
                let mut found: Vec<String> =
                    path.iter().map(|&n| self.graph.ident(n).to_string()).collect();
                found.push(end.to_string());
                paths.push(found);
                continue;
            }

            on_path[next as usize] = true;
            path.push(next);
            cursors.push(0);
        }

        debug!(
            graph = self.graph.graph_id(),
            start,
            end,
            found = paths.len(),
            "enumerated simple paths"
        );
        paths
    }

    /// Minimum-cost path from `start` to `end` (Dijkstra).
    ///
    /// Edge costs must be non-negative. Ties between equal-cost routes are
    /// broken arbitrarily.
    pub fn find_cheapest_path(&self, start: &str, end: &str) -> Option<CheapestPath> {
        let start_id = self.graph.resolve(start)?;
        let end_id = self.graph.resolve(end)?;
        if start_id == end_id {
            return None;
        }

        let n = self.graph.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut pred: Vec<Option<NodeId>> = vec![None; n];
        let mut frontier = BinaryHeap::new();

        dist[start_id as usize] = 0.0;
        frontier.push(Frontier {
            cost: 0.0,
            node: start_id,
        });

        while let Some(Frontier { cost, node }) = frontier.pop() {
            if cost > dist[node as usize] {
                continue;
            }
            if node == end_id {
                let nodes = self.reconstruct(&pred, start_id, end_id);
                debug!(
                    graph = self.graph.graph_id(),
                    start,
                    end,
                    cost,
                    hops = nodes.len() - 1,
                    "found cheapest path"
                );
                return Some(CheapestPath { nodes, cost });
            }

            for edge in self.graph.neighbors_out(node) {
                let candidate = cost + edge.cost;
                let slot = edge.target as usize;
                if candidate < dist[slot] {
                    dist[slot] = candidate;
                    pred[slot] = Some(node);
                    frontier.push(Frontier {
                        cost: candidate,
                        node: edge.target,
                    });
                }
            }
        }

        debug!(graph = self.graph.graph_id(), start, end, "no path");
        None
    }

    /// Walk predecessors from `end` back to `start`, then reverse.
    fn reconstruct(&self, pred: &[Option<NodeId>], start: NodeId, end: NodeId) -> Vec<String> {
        let mut path = vec![self.graph.ident(end).to_string()];
        let mut current = end;
        while current != start {
            match pred[current as usize] {
                Some(p) => {
                    path.push(self.graph.ident(p).to_string());
                    current = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Min-heap entry for Dijkstra: `BinaryHeap` is a max-heap, so the
/// ordering on cost is reversed.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    cost: f64,
    node: NodeId,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeRecord, NodeRecord};

    fn graph(nodes: &[&str], edges: &[(&str, &str, f64)]) -> Graph {
        Graph::from_records(
            "test",
            nodes.iter().map(|&n| NodeRecord::new(n, n.to_uppercase())),
            edges
                .iter()
                .enumerate()
                .map(|(i, &(f, t, c))| EdgeRecord::new(format!("e{}", i + 1), f, t, c)),
        )
    }

    fn diamond() -> Graph {
        graph(
            &["a", "b", "c", "d", "e"],
            &[
                ("a", "b", 1.0),
                ("b", "e", 2.0),
                ("a", "c", 2.0),
                ("c", "d", 1.0),
                ("d", "e", 3.0),
            ],
        )
    }

    fn sorted(mut paths: Vec<Vec<String>>) -> Vec<Vec<String>> {
        paths.sort();
        paths
    }

    fn p(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    // --- All simple paths ---

    #[test]
    fn test_all_paths_diamond() {
        let g = diamond();
        let paths = PathFinder::new(&g).find_all_simple_paths("a", "e");
        assert_eq!(
            sorted(paths),
            vec![p(&["a", "b", "e"]), p(&["a", "c", "d", "e"])]
        );
    }

    #[test]
    fn test_all_paths_same_node() {
        let g = graph(&["a", "b"], &[("a", "b", 1.0), ("b", "a", 1.0)]);
        assert!(PathFinder::new(&g).find_all_simple_paths("a", "a").is_empty());
    }

    #[test]
    fn test_all_paths_unknown_nodes() {
        let g = diamond();
        let finder = PathFinder::new(&g);
        assert!(finder.find_all_simple_paths("zzz", "e").is_empty());
        assert!(finder.find_all_simple_paths("a", "zzz").is_empty());
    }

    #[test]
    fn test_all_paths_unreachable() {
        let g = diamond();
        assert!(PathFinder::new(&g).find_all_simple_paths("e", "a").is_empty());
    }

    #[test]
    fn test_all_paths_ignores_cycles() {
        // a -> b -> c -> b is a loop; only a -> b -> c -> d is simple.
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "b", 1.0),
                ("b", "c", 1.0),
                ("c", "b", 1.0),
                ("c", "d", 1.0),
            ],
        );
        let paths = PathFinder::new(&g).find_all_simple_paths("a", "d");
        assert_eq!(paths, vec![p(&["a", "b", "c", "d"])]);
    }

    #[test]
    fn test_all_paths_through_start_not_revisited() {
        let g = graph(
            &["a", "b", "c"],
            &[("a", "b", 1.0), ("b", "a", 1.0), ("b", "c", 1.0)],
        );
        let paths = PathFinder::new(&g).find_all_simple_paths("a", "c");
        assert_eq!(paths, vec![p(&["a", "b", "c"])]);
    }

    #[test]
    fn test_all_paths_does_not_continue_past_end() {
        // a -> e -> x -> e would revisit e; the path stops at the first arrival.
        let g = graph(
            &["a", "e", "x"],
            &[("a", "e", 1.0), ("e", "x", 1.0), ("x", "e", 1.0)],
        );
        let paths = PathFinder::new(&g).find_all_simple_paths("a", "e");
        assert_eq!(paths, vec![p(&["a", "e"])]);
    }

    #[test]
    fn test_all_paths_parallel_edges() {
        let g = graph(&["a", "b"], &[("a", "b", 1.0), ("a", "b", 5.0)]);
        let paths = PathFinder::new(&g).find_all_simple_paths("a", "b");
        assert_eq!(paths, vec![p(&["a", "b"]), p(&["a", "b"])]);
    }

    #[test]
    fn test_all_paths_complete_graph_count() {
        // K4 directed both ways: simple paths 0->3 = 1 + 2 + 2 = 5.
        let ids = ["n0", "n1", "n2", "n3"];
        let mut edges = Vec::new();
        for a in ids {
            for b in ids {
                if a != b {
                    edges.push((a, b, 1.0));
                }
            }
        }
        let g = graph(&ids, &edges);
        let paths = PathFinder::new(&g).find_all_simple_paths("n0", "n3");
        assert_eq!(paths.len(), 5);
        for path in &paths {
            assert_eq!(path.first().map(String::as_str), Some("n0"));
            assert_eq!(path.last().map(String::as_str), Some("n3"));
        }
    }

    // --- Cheapest path ---

    #[test]
    fn test_cheapest_diamond() {
        let g = diamond();
        let best = PathFinder::new(&g).find_cheapest_path("a", "e").unwrap();
        assert_eq!(best.nodes, p(&["a", "b", "e"]));
        assert_eq!(best.cost, 3.0);
    }

    #[test]
    fn test_cheapest_prefers_more_hops_when_cheaper() {
        let g = graph(
            &["a", "b", "c", "d"],
            &[
                ("a", "d", 10.0),
                ("a", "b", 1.0),
                ("b", "c", 1.0),
                ("c", "d", 1.0),
            ],
        );
        let best = PathFinder::new(&g).find_cheapest_path("a", "d").unwrap();
        assert_eq!(best.nodes, p(&["a", "b", "c", "d"]));
        assert_eq!(best.cost, 3.0);
    }

    #[test]
    fn test_cheapest_picks_cheaper_parallel_edge() {
        let g = graph(&["a", "b"], &[("a", "b", 7.0), ("a", "b", 2.0)]);
        let best = PathFinder::new(&g).find_cheapest_path("a", "b").unwrap();
        assert_eq!(best.nodes, p(&["a", "b"]));
        assert_eq!(best.cost, 2.0);
    }

    #[test]
    fn test_cheapest_zero_cost_edges() {
        let g = graph(&["a", "b", "c"], &[("a", "b", 0.0), ("b", "c", 0.0)]);
        let best = PathFinder::new(&g).find_cheapest_path("a", "c").unwrap();
        assert_eq!(best.nodes, p(&["a", "b", "c"]));
        assert_eq!(best.cost, 0.0);
    }

    #[test]
    fn test_cheapest_same_node() {
        let g = graph(&["a", "b"], &[("a", "b", 1.0), ("b", "a", 1.0)]);
        assert!(PathFinder::new(&g).find_cheapest_path("a", "a").is_none());
    }

    #[test]
    fn test_cheapest_unknown_nodes() {
        let g = diamond();
        let finder = PathFinder::new(&g);
        assert!(finder.find_cheapest_path("zzz", "a").is_none());
        assert!(finder.find_cheapest_path("a", "zzz").is_none());
    }

    #[test]
    fn test_cheapest_unreachable() {
        let g = graph(&["a", "b"], &[]);
        assert!(PathFinder::new(&g).find_cheapest_path("a", "b").is_none());
    }

    #[test]
    fn test_cheapest_with_cycle() {
        let g = graph(
            &["a", "b", "c"],
            &[("a", "b", 1.0), ("b", "a", 1.0), ("b", "c", 1.0)],
        );
        let best = PathFinder::new(&g).find_cheapest_path("a", "c").unwrap();
        assert_eq!(best.nodes, p(&["a", "b", "c"]));
    }

    #[test]
    fn test_frontier_is_min_heap() {
        let mut heap = BinaryHeap::new();
        for (cost, node) in [(3.0, 0), (1.0, 1), (2.0, 2)] {
            heap.push(Frontier { cost, node });
        }
        let order: Vec<NodeId> = std::iter::from_fn(|| heap.pop().map(|f| f.node)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
