use graph_query_core::{CycleEnumerator, Graph, NodeId, PathFinder};
use std::collections::VecDeque;
use std::time::Instant;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");
    let node_count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);

    if mode == "help" || mode == "--help" {
        println!("Usage: graph-query-bench [mode] [node_count]");
        println!();
        println!("Modes:");
        println!("  all         Run every generator, then the enumeration suite (default)");
        println!("  lsystem     Fractal branching tree (deep paths, acyclic)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  random      Erdos-Renyi uniform random edges");
        println!("  dla         Diffusion-limited aggregation (organic branching)");
        println!("  enumerate   Simple-path and cycle enumeration on small graphs");
        println!();
        println!("Default node_count: 1000000 (ignored by enumerate)");
        return;
    }

    println!("graph-query-bench");
    println!("=================");
    println!();

    let generators: Vec<(&str, fn(u64) -> Graph)> = match mode {
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "dla" => vec![("DLA (organic branching)", gen_dla)],
        "enumerate" => vec![],
        "all" => vec![
            ("L-system tree", gen_lsystem as fn(u64) -> Graph),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("DLA (organic branching)", gen_dla),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }

    if mode == "all" || mode == "enumerate" {
        run_enumeration();
    }
}

fn ms(t: Instant) -> f64 {
    t.elapsed().as_secs_f64() * 1000.0
}

/// Whole-graph operations that stay polynomial: cheapest path and the
/// has-cycle check.
fn run_benchmark(name: &str, generator: fn(u64) -> Graph, node_count: u64) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    println!(
        "Generated in {:.2}s, {} nodes, {} edges, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.edge_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    if graph.is_empty() {
        println!();
        return;
    }

    let finder = PathFinder::new(&graph);
    let first = graph.ident(0).to_string();
    let last = graph.ident(graph.node_count() as NodeId - 1).to_string();
    let mid = graph.ident(graph.node_count() as NodeId / 2).to_string();

    println!();
    for (from, to) in [(&first, &last), (&first, &mid), (&last, &first)] {
        let t = Instant::now();
        let best = finder.find_cheapest_path(from, to);
        let elapsed = ms(t);
        match best {
            Some(p) => println!(
                "Cheapest {} → {}: {} hops, cost {:.2} in {:.1}ms",
                from,
                to,
                p.nodes.len() - 1,
                p.cost,
                elapsed
            ),
            None => println!("Cheapest {} → {}: no path ({:.1}ms)", from, to, elapsed),
        }
    }

    let t = Instant::now();
    let has_cycle = CycleEnumerator::new(&graph).detect_has_cycle();
    println!("Has cycle: {} ({:.1}ms)", has_cycle, ms(t));
    println!();
}

/// Enumeration is exponential in general, so these graphs are sized to keep
/// the output countable.
fn run_enumeration() {
    println!("--- Enumeration ---");
    println!();
    println!("{:>16} {:>8} {:>8} {:>12} {:>10}", "graph", "nodes", "edges", "paths", "time");
    println!("{:->16} {:->8} {:->8} {:->12} {:->10}", "", "", "", "", "");

    for (width, depth) in [(2u64, 10u64), (3, 8), (4, 7), (5, 6)] {
        let graph = gen_layered(width, depth);
        let finder = PathFinder::new(&graph);
        let last = graph.ident(graph.node_count() as NodeId - 1).to_string();

        let t = Instant::now();
        let paths = finder.find_all_simple_paths("src", &last);
        println!(
            "{:>16} {:>8} {:>8} {:>12} {:>8.1}ms",
            format!("layered {}x{}", width, depth),
            graph.node_count(),
            graph.edge_count(),
            paths.len(),
            ms(t)
        );
    }

    println!();
    println!("{:>16} {:>8} {:>8} {:>12} {:>10}", "graph", "nodes", "edges", "cycles", "time");
    println!("{:->16} {:->8} {:->8} {:->12} {:->10}", "", "", "", "", "");

    for n in [4u64, 5, 6, 7] {
        let graph = gen_complete(n);
        bench_cycles(&format!("complete K{}", n), &graph);
    }
    for (n, per_node) in [(1000u64, 1u64), (20, 2), (40, 2), (25, 3)] {
        let graph = gen_sparse(n, per_node);
        bench_cycles(&format!("sparse {}/{}", n, per_node), &graph);
    }
    println!();
}

fn bench_cycles(label: &str, graph: &Graph) {
    let t = Instant::now();
    let cycles = CycleEnumerator::new(graph).find_cycles();
    println!(
        "{:>16} {:>8} {:>8} {:>12} {:>8.1}ms",
        label,
        graph.node_count(),
        graph.edge_count(),
        cycles.len(),
        ms(t)
    );
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + edges), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
    /// Edge cost in [0, 10).
    fn cost(&mut self) -> f64 {
        self.next_f64() * 10.0
    }
}

fn add_numbered(graph: &mut Graph, i: u64) -> NodeId {
    graph.add_node(format!("n{}", i), format!("Node {}", i))
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each node spawns `branching` children. Produces deep paths (log depth)
/// with exponential width. No cycles.
fn gen_lsystem(node_count: u64) -> Graph {
    let mut graph = Graph::with_capacity("lsystem", node_count as usize);
    let mut rng = FastRng::new(42);

    let branching = 3u64;
    add_numbered(&mut graph, 0);

    let mut next_id: u64 = 1;
    let mut frontier: Vec<NodeId> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                let child = add_numbered(&mut graph, next_id);
                next_id += 1;
                graph.add_edge(parent, child, rng.cost());
                next_frontier.push(child);
            }
        }
        frontier = next_frontier;
    }

    graph
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each node links forward to its K nearest ring neighbors, and each link is
/// rewired to a random target with probability p.
fn gen_small_world(node_count: u64) -> Graph {
    let k = 10u64;
    let p = 0.05f64;
    let mut graph = Graph::with_capacity("smallworld", node_count as usize);
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        add_numbered(&mut graph, i);
    }

    for i in 0..node_count {
        for j in 1..=k {
            let mut target = (i + j) % node_count;
            if rng.next_f64() < p {
                let rewired = rng.next(node_count);
                if rewired != i {
                    target = rewired;
                }
            }
            let cost = rng.cost();
            graph.add_edge(i as NodeId, target as NodeId, cost);
        }
    }

    graph
}

/// Erdos-Renyi: ~10 uniform random edges per node, no structure.
fn gen_random(node_count: u64) -> Graph {
    let target_edges = node_count * 10;
    let mut graph = Graph::with_capacity("random", node_count as usize);
    let mut rng = FastRng::new(54321);

    for i in 0..node_count {
        add_numbered(&mut graph, i);
    }

    for _ in 0..target_edges {
        let from = rng.next(node_count);
        let to = rng.next(node_count);
        if from != to {
            let cost = rng.cost();
            graph.add_edge(from as NodeId, to as NodeId, cost);
        }
    }

    graph
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new node attaches to a random recent "surface" node, with occasional
/// long-range links that close loops.
fn gen_dla(node_count: u64) -> Graph {
    let mut graph = Graph::with_capacity("dla", node_count as usize);
    let mut rng = FastRng::new(77777);

    add_numbered(&mut graph, 0);

    let surface_max = 10000usize;
    let mut surface: VecDeque<u64> = VecDeque::with_capacity(surface_max + 1);
    surface.push_back(0);

    for new_node in 1..node_count {
        add_numbered(&mut graph, new_node);

        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        let cost = rng.cost();
        graph.add_edge(attach_to as NodeId, new_node as NodeId, cost);

        // 10% chance of a back-link, which creates cycles
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node);
            let cost = rng.cost();
            graph.add_edge(new_node as NodeId, other as NodeId, cost);
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    graph
}

/// Layered DAG: `src`, then `depth` layers of `width` nodes each fully
/// linked to the next layer, then `dst`. Has width^depth simple paths.
fn gen_layered(width: u64, depth: u64) -> Graph {
    let mut graph = Graph::with_capacity("layered", (width * depth + 2) as usize);
    let mut rng = FastRng::new(31337);

    let src = graph.add_node("src", "Source");
    let mut prev: Vec<NodeId> = vec![src];
    for layer in 0..depth {
        let current: Vec<NodeId> = (0..width)
            .map(|i| graph.add_node(format!("l{}_{}", layer, i), "Layer"))
            .collect();
        for &from in &prev {
            for &to in &current {
                graph.add_edge(from, to, rng.cost());
            }
        }
        prev = current;
    }
    let dst = graph.add_node("dst", "Sink");
    for &from in &prev {
        graph.add_edge(from, dst, rng.cost());
    }

    graph
}

/// Complete digraph on n nodes: every ordered pair linked.
fn gen_complete(n: u64) -> Graph {
    let mut graph = Graph::with_capacity("complete", n as usize);
    for i in 0..n {
        add_numbered(&mut graph, i);
    }
    for i in 0..n {
        for j in 0..n {
            if i != j {
                graph.add_edge(i as NodeId, j as NodeId, 1.0);
            }
        }
    }
    graph
}

/// Sparse random digraph with `per_node` outgoing edges per node.
fn gen_sparse(n: u64, per_node: u64) -> Graph {
    let mut graph = Graph::with_capacity("sparse", n as usize);
    let mut rng = FastRng::new(2024);
    for i in 0..n {
        add_numbered(&mut graph, i);
    }
    for i in 0..n {
        for _ in 0..per_node {
            let to = rng.next(n);
            let cost = rng.cost();
            graph.add_edge(i as NodeId, to as NodeId, cost);
        }
    }
    graph
}
