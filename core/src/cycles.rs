//! Elementary cycle enumeration (Johnson's algorithm).
//!
//! Nodes are ranked by identifier so that the start vertex of every search
//! round is the smallest member of any cycle it finds. Each round takes the
//! strongly connected component containing the start vertex within the
//! subgraph of nodes ranked at or above it, then enumerates circuits through
//! the start vertex with Johnson's blocking scheme. Circuits therefore come
//! out already rotated to their smallest identifier, and each elementary
//! cycle is produced once.
//!
//! Self-loops are dropped and parallel edges collapsed before the search:
//! a cycle's identity is its node sequence.

use std::collections::BTreeSet;

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use crate::graph::Graph;

/// A closed node sequence: first and last entries are the same node.
pub type Cycle = Vec<String>;

/// Enumerates the elementary cycles of one graph snapshot.
#[derive(Debug, Clone)]
pub struct CycleEnumerator<'g> {
    graph: &'g Graph,
    /// Graph node index for each rank (ranks ordered by identifier).
    order: Vec<u32>,
    /// Deduplicated successor ranks, self-loops removed.
    succ: Vec<Vec<usize>>,
}

impl<'g> CycleEnumerator<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        let mut order: Vec<u32> = graph.nodes_iter().map(|(id, _)| id).collect();
        order.sort_by(|&a, &b| graph.ident(a).cmp(graph.ident(b)));

        let mut rank = vec![0usize; order.len()];
        for (r, &id) in order.iter().enumerate() {
            rank[id as usize] = r;
        }

        let succ = order
            .iter()
            .enumerate()
            .map(|(r, &id)| {
                let mut next: Vec<usize> = graph
                    .neighbors_out(id)
                    .iter()
                    .map(|e| rank[e.target as usize])
                    .filter(|&t| t != r)
                    .collect();
                next.sort_unstable();
                next.dedup();
                next
            })
            .collect();

        Self { graph, order, succ }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Every elementary cycle, canonically rotated, sorted and deduplicated.
    ///
    /// Each cycle lists its nodes in edge direction starting from its
    /// lexicographically smallest identifier, with that identifier repeated
    /// at the end. Direction is part of identity: `a→b→c→a` and `a→c→b→a`
    /// are different cycles.
    pub fn find_cycles(&self) -> Vec<Cycle> {
        let n = self.order.len();
        let mut found: BTreeSet<Cycle> = BTreeSet::new();
        let mut search = CircuitSearch::new(n);

        for s in 0..n {
            if self.succ[s].is_empty() {
                continue;
            }
            let component = self.component_of(s);
            if component.len() < 2 {
                continue;
            }
            search.run(s, &component, &self.succ, |circuit| {
                let ids: Vec<&str> = circuit.iter().map(|&r| self.ident(r)).collect();
                found.insert(canonicalize(&ids));
            });
        }

        debug!(
            graph = self.graph.graph_id(),
            cycles = found.len(),
            "enumerated elementary cycles"
        );
        found.into_iter().collect()
    }

    /// Whether the graph has at least one elementary cycle.
    ///
    /// Agrees with `!self.find_cycles().is_empty()`: self-loops alone do
    /// not count.
    pub fn detect_has_cycle(&self) -> bool {
        let mut g: DiGraph<(), ()> = DiGraph::with_capacity(self.order.len(), 0);
        let handles: Vec<NodeIndex> = (0..self.order.len()).map(|_| g.add_node(())).collect();
        for (from, targets) in self.succ.iter().enumerate() {
            for &to in targets {
                g.add_edge(handles[from], handles[to], ());
            }
        }
        is_cyclic_directed(&g)
    }

    fn ident(&self, rank: usize) -> &'g str {
        self.graph.ident(self.order[rank])
    }

    /// Membership mask of the strongly connected component containing `s`
    /// in the subgraph induced by ranks `s..n`. Returns the member ranks.
    fn component_of(&self, s: usize) -> Vec<usize> {
        let n = self.order.len();
        let mut sub: DiGraph<usize, ()> = DiGraph::with_capacity(n - s, 0);
        let handles: Vec<NodeIndex> = (s..n).map(|r| sub.add_node(r)).collect();
        for r in s..n {
            for &t in &self.succ[r] {
                if t >= s {
                    sub.add_edge(handles[r - s], handles[t - s], ());
                }
            }
        }

        tarjan_scc(&sub)
            .into_iter()
            .find(|scc| scc.contains(&handles[0]))
            .map(|scc| scc.into_iter().map(|ix| sub[ix]).collect())
            .unwrap_or_default()
    }
}

/// Rotate a cycle (given without its closing repetition) to start at its
/// smallest identifier, then close it.
pub fn canonicalize(cycle: &[&str]) -> Cycle {
    let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    else {
        return Vec::new();
    };

    let mut out: Cycle = cycle[min_pos..]
        .iter()
        .chain(cycle[..min_pos].iter())
        .map(|s| s.to_string())
        .collect();
    out.push(cycle[min_pos].to_string());
    out
}

/// Reusable state for Johnson's circuit search.
struct CircuitSearch {
    in_component: Vec<bool>,
    blocked: Vec<bool>,
    /// `blocked_by[w]`: nodes to unblock once `w` is unblocked.
    blocked_by: Vec<Vec<usize>>,
}

struct Frame {
    node: usize,
    next: usize,
    closed: bool,
}

impl CircuitSearch {
    fn new(n: usize) -> Self {
        Self {
            in_component: vec![false; n],
            blocked: vec![false; n],
            blocked_by: vec![Vec::new(); n],
        }
    }

    /// Emit every circuit through `s` inside `component`. Each circuit is
    /// passed as the node ranks starting at `s`, without the closing `s`.
    fn run<F>(&mut self, s: usize, component: &[usize], succ: &[Vec<usize>], mut emit: F)
    where
        F: FnMut(&[usize]),
    {
        for &v in component {
            self.in_component[v] = true;
            self.blocked[v] = false;
            self.blocked_by[v].clear();
        }

        let mut path = vec![s];
        let mut frames = vec![Frame {
            node: s,
            next: 0,
            closed: false,
        }];
        self.blocked[s] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.node;
            if let Some(&w) = succ[v].get(frame.next) {
                frame.next += 1;
                if !self.in_component[w] {
                    continue;
                }
                if w == s {
                    emit(&path);
                    frame.closed = true;
                } else if !self.blocked[w] {
                    self.blocked[w] = true;
                    path.push(w);
                    frames.push(Frame {
                        node: w,
                        next: 0,
                        closed: false,
                    });
                }
                continue;
            }

            let closed = frame.closed;
            frames.pop();
            path.pop();
            if closed {
                self.unblock(v);
            } else {
                for &w in &succ[v] {
                    if self.in_component[w] && !self.blocked_by[w].contains(&v) {
                        self.blocked_by[w].push(v);
                    }
                }
            }
            if let Some(parent) = frames.last_mut() {
                parent.closed |= closed;
            }
        }

        for &v in component {
            self.in_component[v] = false;
        }
    }

    fn unblock(&mut self, u: usize) {
        let mut pending = vec![u];
        while let Some(x) = pending.pop() {
            self.blocked[x] = false;
            for w in std::mem::take(&mut self.blocked_by[x]) {
                if self.blocked[w] {
                    pending.push(w);
                }
            }
        }
    }
}
