//! Vietoris–Rips complex construction.
//!
//! A [`RipsComplex`] holds the weighted threshold graph of a point cloud. It materializes
//! filtered complexes on demand: [`RipsComplex::create_complex`] writes the vertices (at
//! filtration 0) and the edges (at their lengths) into an empty [`SimplexTree`], then runs the
//! [flag expansion](crate::core::algorithms::flag_expansion) up to the requested dimension.
//!
//! The resulting filtration value of every simplex is the largest pairwise distance among
//! its vertices.
//!
//! The graph is computed once, at construction. Any number of trees can be filled from the
//! same complex at different dimensions without affecting it.
//!
//! # Examples
//!
//! ```rust
//! use vietoris::core::rips_complex::RipsComplex;
//! use vietoris::core::simplex_tree::SimplexTree;
//! use vietoris::geometry::distance::euclidean_distance;
//!
//! let points = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0], vec![5.0, 5.0]];
//! let rips = RipsComplex::new(&points, 1.5, euclidean_distance);
//!
//! let mut st = SimplexTree::new();
//! assert!(rips.create_complex(&mut st, 2));
//!
//! // Four vertices, three edges, one triangle.
//! assert_eq!(st.num_simplices(), 8);
//! assert_eq!(st.dimension(), Some(2));
//!
//! // A second call on the same tree is refused.
//! assert!(!rips.create_complex(&mut st, 2));
//! ```

use std::cmp::Ordering;

use thiserror::Error;

use crate::core::algorithms::flag_expansion::ExpansionStatistics;
use crate::core::filtration::{FiltrationValue, VertexHandle};
use crate::core::proximity_graph::ProximityGraph;
use crate::core::simplex_tree::{SimplexTree, SimplexTreeError};

/// Reasons a Rips complex cannot be built or materialized.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RipsComplexError {
    /// The target tree already holds simplices.
    #[error("Target simplex tree is not empty ({num_simplices} simplices)")]
    NonEmptyTree {
        /// Number of simplices found in the target tree.
        num_simplices: usize,
    },
    /// The distance function returned a negative value for an edge within the threshold.
    #[error("Negative distance {distance} between vertices {u} and {v}")]
    NegativeDistance {
        /// Smaller endpoint.
        u: VertexHandle,
        /// Larger endpoint.
        v: VertexHandle,
        /// Debug representation of the offending distance.
        distance: String,
    },
    /// The distance between two vertices is NaN, typically from points of different
    /// dimension or a NaN coordinate.
    #[error("Distance between vertices {u} and {v} does not compare (NaN)")]
    NonComparableDistance {
        /// Smaller endpoint.
        u: VertexHandle,
        /// Larger endpoint.
        v: VertexHandle,
    },
    /// A distance matrix row is too short to hold its lower-triangular part.
    #[error("Distance matrix row {row} has {len} entries, expected at least {expected}")]
    NonSquareDistanceMatrix {
        /// Index of the short row.
        row: usize,
        /// Number of entries in that row.
        len: usize,
        /// Minimum number of entries required.
        expected: usize,
    },
    /// Writing into the simplex tree failed.
    #[error("Simplex insertion failed: {0}")]
    Insertion(#[from] SimplexTreeError),
}

/// The threshold graph of a point cloud, ready to be expanded into simplex trees.
#[derive(Clone, Debug)]
pub struct RipsComplex<F: FiltrationValue = f64> {
    graph: ProximityGraph<F>,
    threshold: F,
}

impl<F: FiltrationValue> RipsComplex<F> {
    /// Builds the complex from points, a distance threshold, and a distance function.
    ///
    /// `distance` may be any dissimilarity (it is called once per unordered pair), as long
    /// as it is symmetric and non-negative on the pairs within `threshold`. Pairs it maps to
    /// NaN, such as points of different dimension under the functions in
    /// [`geometry::distance`](crate::geometry::distance), make
    /// [`create_complex`](Self::create_complex) fail.
    pub fn new<P, D>(points: &[P], threshold: F, distance: D) -> Self
    where
        D: Fn(&P, &P) -> F,
    {
        Self {
            graph: ProximityGraph::from_points(points, threshold, distance),
            threshold,
        }
    }

    /// Builds the complex from a precomputed distance matrix.
    ///
    /// Only the strictly lower triangle is read: the distance between `i < j` is
    /// `matrix[j][i]`. Row `j` therefore needs at least `j` entries, so both full square
    /// matrices and ragged lower-triangular ones are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`RipsComplexError::NonSquareDistanceMatrix`] if a row is too short.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vietoris::core::rips_complex::RipsComplex;
    ///
    /// let lower: Vec<Vec<f64>> = vec![vec![], vec![1.0], vec![4.0, 2.0]];
    /// let rips = RipsComplex::from_distance_matrix(&lower, 3.0).unwrap();
    /// assert_eq!(rips.graph().num_edges(), 2);
    /// ```
    pub fn from_distance_matrix<R>(matrix: &[R], threshold: F) -> Result<Self, RipsComplexError>
    where
        R: AsRef<[F]>,
    {
        for (row, entries) in matrix.iter().enumerate() {
            let len = entries.as_ref().len();
            if len < row {
                return Err(RipsComplexError::NonSquareDistanceMatrix {
                    row,
                    len,
                    expected: row,
                });
            }
        }

        let graph = ProximityGraph::from_oracle(matrix.len(), threshold, |u, v| {
            matrix[v].as_ref()[u]
        });
        Ok(Self { graph, threshold })
    }

    /// Starts a [`RipsComplexBuilder`] over `points`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vietoris::core::rips_complex::RipsComplex;
    /// use vietoris::geometry::distance::manhattan_distance;
    ///
    /// let points = vec![[0.0, 0.0], [1.0, 1.0], [9.0, 9.0]];
    ///
    /// // Without a threshold every pair is connected.
    /// let rips: RipsComplex<f64> = RipsComplex::builder(&points).build(manhattan_distance);
    /// assert_eq!(rips.graph().num_edges(), 3);
    ///
    /// let rips: RipsComplex<f64> = RipsComplex::builder(&points)
    ///     .threshold(2.0)
    ///     .build(manhattan_distance);
    /// assert_eq!(rips.graph().num_edges(), 1);
    /// ```
    #[must_use]
    pub fn builder<P>(points: &[P]) -> RipsComplexBuilder<'_, P, F> {
        RipsComplexBuilder::new(points)
    }

    /// The weighted 1-skeleton.
    #[must_use]
    pub const fn graph(&self) -> &ProximityGraph<F> {
        &self.graph
    }

    /// Largest distance for which an edge is kept.
    #[must_use]
    pub const fn threshold(&self) -> F {
        self.threshold
    }

    /// Fills an empty simplex tree with the Rips complex up to `max_dimension`.
    ///
    /// All vertices and all graph edges are inserted whatever `max_dimension` is; expansion
    /// then adds simplices of dimension 2 up to `max_dimension`.
    ///
    /// Returns `false` if the tree was not empty on entry, or if construction failed for any
    /// other reason reported by [`try_create_complex`](Self::try_create_complex). The tree is
    /// not cleared in that case.
    pub fn create_complex(&self, tree: &mut SimplexTree<F>, max_dimension: usize) -> bool {
        match self.try_create_complex(tree, max_dimension) {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, max_dimension, "Rips complex construction refused");
                false
            }
        }
    }

    /// Fills an empty simplex tree, reporting why construction failed.
    ///
    /// Vertices are inserted with filtration 0 and edges with their weights. The flag
    /// expansion then adds higher simplices up to `max_dimension`.
    ///
    /// # Errors
    ///
    /// - [`RipsComplexError::NonEmptyTree`] if `tree` holds any simplex. Nothing is written.
    /// - [`RipsComplexError::NonComparableDistance`] if some pair of vertices has a NaN
    ///   distance. Nothing is written.
    /// - [`RipsComplexError::NegativeDistance`] if an edge has a negative weight. Nothing is
    ///   written.
    /// - [`RipsComplexError::Insertion`] if the tree rejects a simplex.
    pub fn try_create_complex(
        &self,
        tree: &mut SimplexTree<F>,
        max_dimension: usize,
    ) -> Result<ExpansionStatistics, RipsComplexError> {
        if !tree.is_empty() {
            return Err(RipsComplexError::NonEmptyTree {
                num_simplices: tree.num_simplices(),
            });
        }
        if let Some(&(u, v)) = self.graph.non_comparable_pairs().first() {
            return Err(RipsComplexError::NonComparableDistance { u, v });
        }
        if let Some(edge) = self
            .graph
            .edges()
            .iter()
            .find(|edge| edge.weight.filtration_cmp(&F::zero()) == Ordering::Less)
        {
            return Err(RipsComplexError::NegativeDistance {
                u: edge.u,
                v: edge.v,
                distance: format!("{:?}", edge.weight),
            });
        }

        for vertex in 0..self.graph.num_vertices() {
            tree.insert_simplex(&[vertex], F::zero())?;
        }
        for edge in self.graph.edges() {
            tree.insert_simplex(&[edge.u, edge.v], edge.weight)?;
        }

        let statistics = tree.expansion(max_dimension);
        tracing::debug!(
            num_vertices = tree.num_vertices(),
            num_simplices = tree.num_simplices(),
            max_dimension,
            "created Rips complex"
        );
        Ok(statistics)
    }
}

/// Fluent construction of a [`RipsComplex`] from a point cloud.
///
/// The threshold defaults to `F::infinity()`, i.e. the complete graph.
#[derive(Clone, Debug)]
pub struct RipsComplexBuilder<'a, P, F: FiltrationValue> {
    points: &'a [P],
    threshold: F,
}

impl<'a, P, F: FiltrationValue> RipsComplexBuilder<'a, P, F> {
    /// Creates a builder with an unbounded threshold.
    #[must_use]
    pub fn new(points: &'a [P]) -> Self {
        Self {
            points,
            threshold: F::infinity(),
        }
    }

    /// Sets the largest distance for which an edge is kept.
    #[must_use]
    pub fn threshold(mut self, threshold: F) -> Self {
        self.threshold = threshold;
        self
    }

    /// Computes the threshold graph with `distance`.
    pub fn build<D>(self, distance: D) -> RipsComplex<F>
    where
        D: Fn(&P, &P) -> F,
    {
        RipsComplex::new(self.points, self.threshold, distance)
    }
}
