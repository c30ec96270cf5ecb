//! Undirected simple graphs over dense vertex indices.

use crate::error::PlanarError;

/// An undirected simple graph on vertices `0..vertex_count`.
///
/// Self-loops and parallel edges are silently ignored on insertion, and
/// each adjacency list is kept in ascending order so every algorithm
/// driven by it is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndirectedGraph {
    adj: Vec<Vec<usize>>,
    edge_count: usize,
}

impl UndirectedGraph {
    /// A graph with `vertex_count` isolated vertices.
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adj: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Build a graph from an edge list.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, PlanarError> {
        let mut g = Self::new(vertex_count);
        for (u, v) in edges {
            g.add_edge(u, v)?;
        }
        Ok(g)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Insert the edge `{u, v}`.
    ///
    /// Returns `Ok(true)` if the edge was new, `Ok(false)` for a self-loop
    /// or an edge already present.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<bool, PlanarError> {
        let n = self.adj.len();
        for vertex in [u, v] {
            if vertex >= n {
                return Err(PlanarError::VertexOutOfRange {
                    vertex,
                    vertex_count: n,
                });
            }
        }
        if u == v {
            return Ok(false);
        }
        match self.adj[u].binary_search(&v) {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.adj[u].insert(pos, v);
                if let Err(pos) = self.adj[v].binary_search(&u) {
                    self.adj[v].insert(pos, u);
                }
                self.edge_count += 1;
                Ok(true)
            }
        }
    }

    /// Neighbours of `v` in ascending order.
    pub fn neighbours(&self, v: usize) -> &[usize] {
        &self.adj[v]
    }

    /// Number of edges incident to `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.adj[v].len()
    }

    /// Whether `{u, v}` is an edge.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj
            .get(u)
            .is_some_and(|nb| nb.binary_search(&v).is_ok())
    }

    /// All edges as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adj
            .iter()
            .enumerate()
            .flat_map(|(u, nb)| nb.iter().filter(move |&&v| v > u).map(move |&v| (u, v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_edge_ignores_loops_and_duplicates() {
        let mut g = UndirectedGraph::new(3);
        assert!(g.add_edge(0, 1).unwrap());
        assert!(!g.add_edge(1, 0).unwrap());
        assert!(!g.add_edge(2, 2).unwrap());
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.degree(2), 0);
    }

    #[test]
    fn add_edge_rejects_out_of_range() {
        let mut g = UndirectedGraph::new(2);
        assert_eq!(
            g.add_edge(0, 5),
            Err(PlanarError::VertexOutOfRange {
                vertex: 5,
                vertex_count: 2
            })
        );
    }

    #[test]
    fn adjacency_sorted_and_edges_canonical() {
        let g = UndirectedGraph::from_edges(4, [(3, 0), (2, 0), (1, 0), (2, 1)]).unwrap();
        assert_eq!(g.neighbours(0), &[1, 2, 3]);
        assert_eq!(g.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (0, 3), (1, 2)]);
        assert!(g.has_edge(1, 2) && g.has_edge(2, 1));
        assert!(!g.has_edge(1, 3));
        assert!(!g.has_edge(9, 1));
    }
}
