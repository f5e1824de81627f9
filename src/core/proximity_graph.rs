//! Weighted 1-skeleton of a point cloud under a distance threshold.
//!
//! Vertices are the point indices `0..n`. The edge `{i, j}` is present iff
//! `distance(p_i, p_j) ≤ threshold`, and carries the distance as its weight. Every unordered
//! pair is evaluated once, so construction costs `n(n-1)/2` distance calls.
//!
//! A weight that does not compare (NaN) never yields an edge. Such pairs are recorded
//! instead, see [`ProximityGraph::non_comparable_pairs`].
//!
//! Neighbor lists and the edge-weight index are derived from the edge list on first use.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::core::collections::{FastHashMap, fast_hash_map_with_capacity};
use crate::core::filtration::{FiltrationValue, VertexHandle};

/// One edge of a [`ProximityGraph`], with `u < v`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge<F> {
    /// Smaller endpoint.
    pub u: VertexHandle,
    /// Larger endpoint.
    pub v: VertexHandle,
    /// Distance between the endpoints.
    pub weight: F,
}

/// Threshold graph over `num_vertices` points.
///
/// Edges are stored in lexicographic `(u, v)` order.
///
/// # Examples
///
/// ```rust
/// use vietoris::core::proximity_graph::ProximityGraph;
/// use vietoris::geometry::distance::euclidean_distance;
///
/// let points = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![5.0, 0.0]];
/// let graph = ProximityGraph::from_points(&points, 2.0, euclidean_distance);
///
/// assert_eq!(graph.num_vertices(), 3);
/// assert_eq!(graph.num_edges(), 1);
/// assert_eq!(graph.edge_weight(1, 0), Some(1.0));
/// assert_eq!(graph.edge_weight(0, 2), None);
/// ```
#[derive(Clone, Debug)]
pub struct ProximityGraph<F: FiltrationValue> {
    num_vertices: usize,
    edges: Vec<WeightedEdge<F>>,
    non_comparable: Vec<(VertexHandle, VertexHandle)>,
    index: OnceLock<EdgeIndex<F>>,
}

/// Lookup structures over the edge list.
#[derive(Clone, Debug)]
struct EdgeIndex<F> {
    adjacency: Vec<Vec<(VertexHandle, F)>>,
    weights: FastHashMap<(VertexHandle, VertexHandle), F>,
}

impl<F: FiltrationValue> EdgeIndex<F> {
    fn build(num_vertices: usize, edges: &[WeightedEdge<F>]) -> Self {
        let mut adjacency = vec![Vec::new(); num_vertices];
        let mut weights = fast_hash_map_with_capacity(edges.len());
        for edge in edges {
            adjacency[edge.u].push((edge.v, edge.weight));
            adjacency[edge.v].push((edge.u, edge.weight));
            weights.insert((edge.u, edge.v), edge.weight);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable_by_key(|&(neighbor, _)| neighbor);
        }
        Self { adjacency, weights }
    }
}

impl<F: FiltrationValue> ProximityGraph<F> {
    /// Builds the graph from a point cloud and a distance function.
    ///
    /// Vertex `i` is `points[i]`. Duplicate points are allowed and produce zero-weight edges.
    pub fn from_points<P, D>(points: &[P], threshold: F, distance: D) -> Self
    where
        D: Fn(&P, &P) -> F,
    {
        Self::from_oracle(points.len(), threshold, |i, j| distance(&points[i], &points[j]))
    }

    /// Builds the graph over `num_vertices` vertices from a pairwise oracle.
    ///
    /// `oracle(i, j)` is called exactly once for every pair with `i < j`. Pairs whose weight
    /// is NaN get no edge and are listed by [`non_comparable_pairs`](Self::non_comparable_pairs).
    pub fn from_oracle<O>(num_vertices: usize, threshold: F, oracle: O) -> Self
    where
        O: Fn(VertexHandle, VertexHandle) -> F,
    {
        let mut edges = Vec::new();
        let mut non_comparable = Vec::new();
        for u in 0..num_vertices {
            for v in (u + 1)..num_vertices {
                let weight = oracle(u, v);
                if weight.is_nan() {
                    non_comparable.push((u, v));
                } else if weight <= threshold {
                    edges.push(WeightedEdge { u, v, weight });
                }
            }
        }

        if !non_comparable.is_empty() {
            tracing::debug!(
                count = non_comparable.len(),
                first = ?non_comparable.first(),
                "distance oracle returned NaN"
            );
        }
        tracing::debug!(
            num_vertices,
            num_edges = edges.len(),
            threshold = ?threshold,
            "built proximity graph"
        );

        Self {
            num_vertices,
            edges,
            non_comparable,
            index: OnceLock::new(),
        }
    }

    fn index(&self) -> &EdgeIndex<F> {
        self.index
            .get_or_init(|| EdgeIndex::build(self.num_vertices, &self.edges))
    }

    /// Number of vertices (points).
    #[must_use]
    pub const fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Number of edges within the threshold.
    #[must_use]
    pub const fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no vertex.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.num_vertices == 0
    }

    /// All edges, ordered by `(u, v)`.
    #[must_use]
    pub fn edges(&self) -> &[WeightedEdge<F>] {
        &self.edges
    }

    /// Vertex pairs whose distance was NaN, in `(u, v)` order with `u < v`.
    #[must_use]
    pub fn non_comparable_pairs(&self) -> &[(VertexHandle, VertexHandle)] {
        &self.non_comparable
    }

    /// Neighbors of `vertex` with edge weights, ascending by neighbor handle.
    ///
    /// Empty for an out-of-range vertex.
    #[must_use]
    pub fn neighbors(&self, vertex: VertexHandle) -> &[(VertexHandle, F)] {
        self.index()
            .adjacency
            .get(vertex)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Weight of the edge `{u, v}`, in either argument order.
    #[must_use]
    pub fn edge_weight(&self, u: VertexHandle, v: VertexHandle) -> Option<F> {
        self.index().weights.get(&(u.min(v), u.max(v))).copied()
    }
}
