pub mod mst;
pub mod tree;

pub use self::mst::minimum_spanning_tree;
pub use self::tree::Tree;

/// One direction of an undirected edge: the far vertex and the edge weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedConnection {
    pub vertex: usize,
    pub weight: f32,
}

/// Undirected weighted graph stored as adjacency lists.
///
/// Every edge is stored twice, once per endpoint, so `neighbors(u)` and
/// `neighbors(v)` both see it with the same weight.
#[derive(Debug, Clone, Default)]
pub struct WeightedGraph {
    connections: Vec<Vec<WeightedConnection>>,
    edge_count: usize,
}

impl WeightedGraph {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            connections: vec![Vec::new(); num_vertices],
            edge_count: 0,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.connections.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edge_count
    }

    /// Registers the symmetric edge `u <-> v`.
    ///
    /// Panics if either endpoint is out of range, like slice indexing.
    pub fn add_edge(&mut self, u: usize, v: usize, weight: f32) {
        debug_assert!(weight >= 0.0, "edge weights must be non-negative");
        self.connections[u].push(WeightedConnection { vertex: v, weight });
        self.connections[v].push(WeightedConnection { vertex: u, weight });
        self.edge_count += 1;
    }

    pub fn neighbors(&self, u: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.connections[u].iter().map(|c| (c.vertex, c.weight))
    }

    pub fn connections(&self, u: usize) -> &[WeightedConnection] {
        &self.connections[u]
    }

    /// Weight of the first `u -> v` edge, if any.
    pub fn weight(&self, u: usize, v: usize) -> Option<f32> {
        self.connections[u]
            .iter()
            .find(|c| c.vertex == v)
            .map(|c| c.weight)
    }
}
