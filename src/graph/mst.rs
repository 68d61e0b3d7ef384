use crate::error::SegResult;
use crate::graph::{Tree, WeightedGraph};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;
use tracing::{debug, warn};

/// Heap entry ordered by weight, then by vertex index so ties are stable.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    key: f32,
    vertex: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key
            .total_cmp(&other.key)
            .then_with(|| self.vertex.cmp(&other.vertex))
    }
}

/// Prim's algorithm from `start`.
///
/// Vertices outside the component of `start` stay detached in the returned
/// tree; see [`Tree::unreachable_nodes`].
pub fn minimum_spanning_tree(graph: &WeightedGraph, start: usize) -> SegResult<Tree> {
    let n = graph.num_vertices();
    let mut tree = Tree::new(start, n)?;
    let timer = Instant::now();

    let mut key = vec![f32::INFINITY; n];
    let mut via: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];
    let mut heap = BinaryHeap::new();

    key[start] = 0.0;
    heap.push(Reverse(Candidate {
        key: 0.0,
        vertex: start,
    }));

    while let Some(Reverse(Candidate { key: k, vertex: u })) = heap.pop() {
        // Stale entry superseded by a cheaper relaxation.
        if in_tree[u] || k > key[u] {
            continue;
        }
        in_tree[u] = true;
        if let Some(p) = via[u] {
            tree.set_parent(u, p)?;
        }

        for conn in graph.connections(u) {
            let v = conn.vertex;
            if !in_tree[v] && conn.weight < key[v] {
                key[v] = conn.weight;
                via[v] = Some(u);
                heap.push(Reverse(Candidate {
                    key: conn.weight,
                    vertex: v,
                }));
            }
        }
    }

    let unreachable = n - in_tree.iter().filter(|&&t| t).count();
    if unreachable > 0 {
        warn!(
            "MST from {} left {} of {} vertices unreachable",
            start, unreachable, n
        );
    }
    debug!(
        "Built minimum spanning tree over {} vertices in {:.2} ms",
        n,
        timer.elapsed().as_secs_f64() * 1000.0
    );

    Ok(tree)
}
