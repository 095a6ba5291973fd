// graph.rs - Undirected simple graph with the torus initializer and the
// path/clustering measurements the growth and equilibrium loops depend on.

use std::collections::VecDeque;

use crate::error::{PrestigeError, Result};

/// An undirected simple graph over the fixed node set `0..n`.
///
/// Nodes are dense integer ids assigned at construction and never renumbered;
/// a "removed" node (see [`Graph::isolate`]) keeps its id and simply loses its
/// edges. Self-loops and parallel edges are never stored.
#[derive(Debug, Clone)]
pub struct Graph {
    adj: Vec<Vec<usize>>,
    edges: usize,
}

impl Graph {
    /// An edgeless graph on `n` isolated nodes.
    pub fn with_nodes(n: usize) -> Self {
        Self {
            adj: vec![Vec::new(); n],
            edges: 0,
        }
    }

    /// Build a `rows x cols` grid with periodic boundaries in both
    /// dimensions: cell `(i, j)` becomes node `i * cols + j` and connects to
    /// its North, South, East and West neighbours, wrapping at the edges.
    ///
    /// For `rows, cols >= 3` every node has degree exactly 4 and the graph is
    /// connected. Degenerate dimensions (1 or 2) are allowed; the wrap edges
    /// then collapse onto each other and degrees come out lower.
    pub fn torus(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PrestigeError::InvalidParameter(format!(
                "torus dimensions must be positive, got {rows}x{cols}"
            )));
        }

        let mut g = Self::with_nodes(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                let here = i * cols + j;
                let south = ((i + 1) % rows) * cols + j;
                let east = i * cols + (j + 1) % cols;
                g.add_edge(here, south);
                g.add_edge(here, east);
            }
        }
        Ok(g)
    }

    /// Build the complete graph on `n` nodes.
    pub fn complete(n: usize) -> Self {
        let mut g = Self::with_nodes(n);
        for i in 0..n {
            for j in (i + 1)..n {
                g.add_edge(i, j);
            }
        }
        g
    }

    /// Number of nodes.
    #[inline]
    pub fn n(&self) -> usize {
        self.adj.len()
    }

    /// Number of edges.
    #[inline]
    pub fn m(&self) -> usize {
        self.edges
    }

    /// Degree of `u`.
    #[inline]
    pub fn degree(&self, u: usize) -> usize {
        self.adj[u].len()
    }

    /// Degrees of all nodes, indexed by node id.
    pub fn degrees(&self) -> Vec<usize> {
        self.adj.iter().map(Vec::len).collect()
    }

    /// Neighbours of `u`, in insertion order.
    #[inline]
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.adj[u]
    }

    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adj[u].contains(&v)
    }

    /// Insert the undirected edge `(u, v)`. Returns whether the edge is new;
    /// self-loops and duplicates are ignored.
    pub fn add_edge(&mut self, u: usize, v: usize) -> bool {
        if u == v || self.has_edge(u, v) {
            return false;
        }
        self.adj[u].push(v);
        self.adj[v].push(u);
        self.edges += 1;
        true
    }

    /// Remove the undirected edge `(u, v)` if present.
    pub fn remove_edge(&mut self, u: usize, v: usize) -> bool {
        let Some(pos) = self.adj[u].iter().position(|&x| x == v) else {
            return false;
        };
        self.adj[u].swap_remove(pos);
        if let Some(pos) = self.adj[v].iter().position(|&x| x == u) {
            self.adj[v].swap_remove(pos);
        }
        self.edges -= 1;
        true
    }

    /// Drop every edge incident to `u`, leaving it in the graph as an
    /// isolated node with the same id. Returns the former neighbour list.
    pub fn isolate(&mut self, u: usize) -> Vec<usize> {
        let former = std::mem::take(&mut self.adj[u]);
        for &nbr in &former {
            if let Some(pos) = self.adj[nbr].iter().position(|&x| x == u) {
                self.adj[nbr].swap_remove(pos);
            }
        }
        self.edges -= former.len();
        former
    }

    /// Count the neighbours `u` and `v` have in common.
    pub fn common_neighbors(&self, u: usize, v: usize) -> usize {
        self.adj[u]
            .iter()
            .filter(|&&w| w != v && self.has_edge(v, w))
            .count()
    }

    /// Unweighted shortest-path distances from `source` to every node;
    /// `None` marks nodes `source` cannot reach.
    pub fn bfs_distances(&self, source: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.n()];
        dist[source] = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back(source);
        while let Some(u) = queue.pop_front() {
            let d = dist[u].unwrap_or(0);
            for &v in &self.adj[u] {
                if dist[v].is_none() {
                    dist[v] = Some(d + 1);
                    queue.push_back(v);
                }
            }
        }
        dist
    }

    /// Whether every node is reachable from every other. The empty and the
    /// one-node graph count as connected.
    pub fn is_connected(&self) -> bool {
        if self.n() < 2 {
            return true;
        }
        self.bfs_distances(0).iter().all(Option::is_some)
    }

    /// Connected components as node lists. Isolated nodes form their own
    /// singleton components.
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut component = vec![usize::MAX; self.n()];
        let mut out: Vec<Vec<usize>> = Vec::new();

        for start in 0..self.n() {
            if component[start] != usize::MAX {
                continue;
            }
            let id = out.len();
            let mut members = vec![start];
            component[start] = id;

            let mut queue = VecDeque::new();
            queue.push_back(start);
            while let Some(u) = queue.pop_front() {
                for &v in &self.adj[u] {
                    if component[v] == usize::MAX {
                        component[v] = id;
                        members.push(v);
                        queue.push_back(v);
                    }
                }
            }
            out.push(members);
        }
        out
    }

    /// Mean shortest-path distance over all node pairs (the geodesic).
    ///
    /// Requires at least two nodes and a connected graph; disconnected input
    /// is an error here, never a partial average.
    pub fn average_shortest_path_length(&self) -> Result<f64> {
        let n = self.n();
        if n < 2 {
            return Err(PrestigeError::InvalidParameter(
                "average shortest path length needs at least two nodes".into(),
            ));
        }

        let mut total = 0usize;
        for source in 0..n {
            for d in self.bfs_distances(source) {
                total += d.ok_or(PrestigeError::Disconnected)?;
            }
        }
        // Each unordered pair is counted in both directions; the ratio of
        // ordered-pair sum to ordered-pair count is the same mean.
        Ok(total as f64 / (n * (n - 1)) as f64)
    }

    /// Mean local clustering coefficient: for each node, the fraction of its
    /// neighbour pairs that are themselves connected (0 for degree < 2),
    /// averaged over all nodes.
    pub fn average_clustering(&self) -> f64 {
        let n = self.n();
        if n == 0 {
            return 0.0;
        }

        let mut total = 0.0;
        for u in 0..n {
            let nbrs = &self.adj[u];
            let k = nbrs.len();
            if k < 2 {
                continue;
            }
            let mut closed = 0usize;
            for a in 0..k {
                for b in (a + 1)..k {
                    if self.has_edge(nbrs[a], nbrs[b]) {
                        closed += 1;
                    }
                }
            }
            total += 2.0 * closed as f64 / (k * (k - 1)) as f64;
        }
        total / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn torus_rejects_zero_dimension() {
        assert!(matches!(
            Graph::torus(0, 5),
            Err(PrestigeError::InvalidParameter(_))
        ));
        assert!(matches!(
            Graph::torus(5, 0),
            Err(PrestigeError::InvalidParameter(_))
        ));
    }

    #[test]
    fn torus_is_four_regular() {
        let g = Graph::torus(5, 7).unwrap();
        assert_eq!(g.n(), 35);
        assert_eq!(g.m(), 2 * 35, "torus has 2*n edges");
        assert!(g.degrees().iter().all(|&d| d == 4));
        assert!(g.is_connected());
    }

    #[test]
    fn degenerate_torus_dimensions_collapse() {
        // A 1xC torus is a cycle (self-loops skipped), a 2xC torus merges
        // the North/South wrap edges.
        let ring = Graph::torus(1, 6).unwrap();
        assert!(ring.degrees().iter().all(|&d| d == 2));
        let ladder = Graph::torus(2, 6).unwrap();
        assert!(ladder.degrees().iter().all(|&d| d == 3));
        assert!(ring.is_connected() && ladder.is_connected());
    }

    #[test]
    fn add_edge_ignores_self_loops_and_duplicates() {
        let mut g = Graph::with_nodes(3);
        assert!(!g.add_edge(1, 1));
        assert!(g.add_edge(0, 1));
        assert!(!g.add_edge(1, 0));
        assert_eq!(g.m(), 1);
    }

    #[test]
    fn isolate_keeps_identity_and_drops_edges() {
        let mut g = Graph::torus(3, 3).unwrap();
        let former = g.isolate(4);
        assert_eq!(former.len(), 4);
        assert_eq!(g.degree(4), 0);
        assert_eq!(g.n(), 9);
        assert_eq!(g.m(), 18 - 4);
        assert!(former.iter().all(|&nbr| !g.has_edge(4, nbr)));
    }

    #[test]
    fn common_neighbors_counts_shared_adjacency() {
        let mut g = Graph::with_nodes(5);
        g.add_edge(0, 2);
        g.add_edge(0, 3);
        g.add_edge(1, 2);
        g.add_edge(1, 3);
        g.add_edge(0, 1);
        // 0 and 1 share 2 and 3; the 0-1 edge itself must not count.
        assert_eq!(g.common_neighbors(0, 1), 2);
    }

    #[test]
    fn bfs_distances_on_a_path() {
        let mut g = Graph::with_nodes(4);
        g.add_edge(0, 1);
        g.add_edge(1, 2);
        let dist = g.bfs_distances(0);
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);
        assert!(!g.is_connected());
        assert_eq!(g.components().len(), 2);
    }

    #[test]
    fn geodesic_of_the_4x4_torus() {
        let g = Graph::torus(4, 4).unwrap();
        // Distances on C4 x C4 sum to 32 per node over the 15 other nodes.
        let expected = 32.0 / 15.0;
        let got = g.average_shortest_path_length().unwrap();
        assert!((got - expected).abs() < 1e-12, "geodesic {got} != {expected}");
    }

    #[test]
    fn geodesic_requires_connectivity() {
        let mut g = Graph::with_nodes(3);
        g.add_edge(0, 1);
        assert_eq!(
            g.average_shortest_path_length(),
            Err(PrestigeError::Disconnected)
        );
    }

    #[test]
    fn clustering_of_cliques_and_grids() {
        assert_eq!(Graph::complete(4).average_clustering(), 1.0);
        // The torus is triangle-free.
        assert_eq!(Graph::torus(4, 4).unwrap().average_clustering(), 0.0);
    }
}
