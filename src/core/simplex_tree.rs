//! Filtered simplicial complexes stored as an ordered trie.
//!
//! This module provides the [`SimplexTree`], a memory-efficient representation of an
//! arbitrary finite simplicial complex in which every simplex carries a filtration value.
//!
//! # Structure
//!
//! Each simplex `{v₀ < v₁ < … < v_k}` is the path `v₀ → v₁ → … → v_k` from the (virtual)
//! root. Nodes live in a slotmap arena and are addressed by [`NodeKey`]; a node stores its
//! own vertex handle, filtration value, parent key, dimension, and an ordered map from child
//! vertex handle to child key. Siblings are therefore ordered by vertex handle, and a
//! depth-first walk visits simplices in lexicographic order.
//!
//! # Invariants
//!
//! - **Closure** – every facet of a stored simplex is stored. Insertion restores this by
//!   inserting missing faces first.
//! - **Canonical order** – children keys are strictly greater than every ancestor's vertex.
//! - **Dimension bookkeeping** – each node's stored dimension equals its depth, and the
//!   tree-level dimension equals the maximum over all nodes.
//!
//! The filtration is expected to be monotone (`filtration(F) ≤ filtration(S)` for each
//! facet `F` of `S`). Insertion keeps it monotone as long as callers insert faces no later
//! than cofaces; [`SimplexTree::validate`] reports violations, and
//! [`SimplexTree::make_filtration_non_decreasing`] repairs them.
//!
//! # Examples
//!
//! ```rust
//! use vietoris::core::simplex_tree::SimplexTree;
//!
//! let mut st: SimplexTree<f64> = SimplexTree::new();
//! assert!(st.insert_simplex(&[0, 1, 2], 1.5).unwrap());
//!
//! // The triangle brings its three edges and three vertices along.
//! assert_eq!(st.num_simplices(), 7);
//! assert_eq!(st.num_vertices(), 3);
//! assert_eq!(st.dimension(), Some(2));
//!
//! let triangle = st.find(&[2, 0, 1]).unwrap();
//! assert_eq!(st.filtration(triangle), Some(1.5));
//! assert_eq!(st.filtration(st.find(&[0, 2]).unwrap()), Some(0.0));
//! ```

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slotmap::new_key_type;
use thiserror::Error;

use crate::core::collections::{
    MAX_PRACTICAL_DIMENSION_SIZE, SimplexVertexBuffer, SmallBuffer, StorageMap,
};
use crate::core::filtration::{FiltrationValue, VertexHandle, max_filtration};

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while mutating a [`SimplexTree`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SimplexTreeError {
    /// A simplex needs at least one vertex.
    #[error("Cannot insert an empty simplex")]
    EmptySimplex,
    /// NaN cannot be ordered against other filtration values.
    #[error("Filtration value {filtration} is not comparable (NaN)")]
    NonComparableFiltration {
        /// Debug representation of the rejected value.
        filtration: String,
    },
    /// The given key does not address a simplex of this tree.
    #[error("Simplex key does not belong to this simplex tree (stale or foreign key)")]
    NotFound,
    /// Internal trie links are inconsistent.
    #[error("Internal data structure inconsistency: {message}")]
    InconsistentDataStructure {
        /// Description of the inconsistency.
        message: String,
    },
}

/// Errors reported by [`SimplexTree::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimplexTreeValidationError {
    /// A stored simplex has a facet that is not stored.
    #[error("Simplex {simplex:?} is missing its facet {facet:?}")]
    MissingFacet {
        /// Vertices of the simplex whose facet is missing.
        simplex: Vec<VertexHandle>,
        /// Vertices of the missing facet.
        facet: Vec<VertexHandle>,
    },
    /// A facet has a larger filtration value than one of its cofacets.
    #[error(
        "Filtration is not monotone: facet {facet:?} has {facet_filtration}, simplex {simplex:?} has {simplex_filtration}"
    )]
    NonMonotoneFiltration {
        /// Vertices of the simplex.
        simplex: Vec<VertexHandle>,
        /// Vertices of the offending facet.
        facet: Vec<VertexHandle>,
        /// Debug representation of the simplex filtration value.
        simplex_filtration: String,
        /// Debug representation of the facet filtration value.
        facet_filtration: String,
    },
    /// The stored dimension does not match the trie depth.
    #[error("Dimension bookkeeping mismatch: stored {stored:?}, computed {computed:?}")]
    InconsistentDimension {
        /// Dimension recorded by the tree or node.
        stored: Option<usize>,
        /// Dimension recomputed from the trie.
        computed: Option<usize>,
    },
}

/// Classifies the kind of invariant that failed during validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InvariantKind {
    /// Every facet of a stored simplex is stored.
    Closure,
    /// Facets never have a larger filtration value than their cofacets.
    FiltrationMonotonicity,
    /// Node depth and tree dimension bookkeeping.
    Dimension,
}

/// A single invariant violation recorded during validation diagnostics.
#[derive(Clone, Debug)]
pub struct InvariantViolation {
    /// The kind of invariant that failed.
    pub kind: InvariantKind,
    /// The detailed validation error explaining the failure.
    pub error: SimplexTreeValidationError,
}

/// Aggregate report of one or more validation failures.
#[derive(Clone, Debug)]
pub struct SimplexTreeValidationReport {
    /// The ordered list of invariant violations that occurred.
    pub violations: Vec<InvariantViolation>,
}

impl SimplexTreeValidationReport {
    /// Returns `true` if no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Configuration options for [`SimplexTree::validation_report`].
#[derive(Clone, Copy, Debug)]
pub struct ValidationOptions {
    /// Whether to check that filtration values never decrease from facet to simplex.
    pub check_filtration_monotonicity: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            check_filtration_monotonicity: true,
        }
    }
}

// =============================================================================
// KEYS AND NODES
// =============================================================================

new_key_type! {
    /// Handle to one simplex stored in a [`SimplexTree`].
    ///
    /// Keys stay valid until the simplex is removed (see
    /// [`SimplexTree::prune_above_filtration`]); a stale key makes accessors return `None`.
    pub struct NodeKey;
}

/// One trie node, i.e. one simplex.
#[derive(Clone, Debug)]
pub(crate) struct Node<F> {
    /// Largest vertex of the simplex (the label of the edge leading to this node).
    pub(crate) vertex: VertexHandle,
    pub(crate) filtration: F,
    /// `None` for vertices (children of the virtual root).
    pub(crate) parent: Option<NodeKey>,
    pub(crate) dimension: usize,
    pub(crate) children: BTreeMap<VertexHandle, NodeKey>,
}

// =============================================================================
// SIMPLEX TREE
// =============================================================================

/// An ordered trie storing a filtered simplicial complex.
///
/// See the [module documentation](self) for the layout and invariants.
///
/// # Examples
///
/// ```rust
/// use vietoris::core::simplex_tree::SimplexTree;
///
/// let mut st = SimplexTree::new();
/// st.insert_simplex(&[0], 0.0).unwrap();
/// st.insert_simplex(&[1], 0.0).unwrap();
/// st.insert_simplex(&[0, 1], 2.0).unwrap();
///
/// // Re-inserting never changes an existing simplex.
/// assert!(!st.insert_simplex(&[0, 1], 0.5).unwrap());
/// assert_eq!(st.filtration(st.find(&[0, 1]).unwrap()), Some(2.0));
/// ```
#[derive(Clone, Debug)]
pub struct SimplexTree<F: FiltrationValue = f64> {
    pub(crate) nodes: StorageMap<NodeKey, Node<F>>,
    /// Children of the virtual root: one entry per vertex.
    pub(crate) root: BTreeMap<VertexHandle, NodeKey>,
    /// Largest simplex dimension present, `None` when empty.
    pub(crate) dimension: Option<usize>,
}

impl<F: FiltrationValue> Default for SimplexTree<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: FiltrationValue> SimplexTree<F> {
    /// Creates an empty simplex tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: StorageMap::with_key(),
            root: BTreeMap::new(),
            dimension: None,
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns `true` if the tree stores no simplex.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of simplices of every dimension.
    #[must_use]
    pub fn num_simplices(&self) -> usize {
        self.nodes.len()
    }

    /// Number of 0-simplices.
    #[must_use]
    pub fn num_vertices(&self) -> usize {
        self.root.len()
    }

    /// Largest dimension of a stored simplex, or `None` for an empty tree.
    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Vertex handles in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexHandle> + '_ {
        self.root.keys().copied()
    }

    /// Key of the 0-simplex `{vertex}`, if present.
    #[must_use]
    pub fn find_vertex(&self, vertex: VertexHandle) -> Option<NodeKey> {
        self.root.get(&vertex).copied()
    }

    /// Exact-match lookup of a simplex by its vertex set.
    ///
    /// The vertices may be given in any order; duplicates are ignored. Returns `None`
    /// when the simplex (or any prefix of it) is absent, or when `vertices` is empty.
    #[must_use]
    pub fn find(&self, vertices: &[VertexHandle]) -> Option<NodeKey> {
        let simplex = canonical_simplex(vertices);
        self.find_canonical(&simplex)
    }

    /// Lookup for a vertex list already sorted ascending without duplicates.
    pub(crate) fn find_canonical(&self, simplex: &[VertexHandle]) -> Option<NodeKey> {
        let (first, rest) = simplex.split_first()?;
        let mut key = *self.root.get(first)?;
        for vertex in rest {
            key = *self.nodes.get(key)?.children.get(vertex)?;
        }
        Some(key)
    }

    /// Filtration value of a simplex, `None` for a stale key.
    #[must_use]
    pub fn filtration(&self, key: NodeKey) -> Option<F> {
        self.nodes.get(key).map(|node| node.filtration)
    }

    /// Dimension of a simplex (number of vertices minus one), `None` for a stale key.
    #[must_use]
    pub fn simplex_dimension(&self, key: NodeKey) -> Option<usize> {
        self.nodes.get(key).map(|node| node.dimension)
    }

    /// Vertices of a simplex in ascending order.
    #[must_use]
    pub fn simplex_vertices(&self, key: NodeKey) -> Option<SimplexVertexBuffer> {
        self.nodes.get(key)?;
        let mut vertices: SimplexVertexBuffer = self.simplex_vertex_range(key).collect();
        vertices.reverse();
        Some(vertices)
    }

    /// Keys of all facets of a simplex.
    ///
    /// Empty for vertices and for stale keys. Facets are listed by the position of the
    /// removed vertex, starting with the facet that omits the smallest vertex.
    #[must_use]
    pub fn boundary_simplex_range(
        &self,
        key: NodeKey,
    ) -> SmallBuffer<NodeKey, MAX_PRACTICAL_DIMENSION_SIZE> {
        let mut boundary = SmallBuffer::new();
        let Some(vertices) = self.simplex_vertices(key) else {
            return boundary;
        };
        if vertices.len() < 2 {
            return boundary;
        }

        let mut facet = SimplexVertexBuffer::new();
        for skipped in 0..vertices.len() {
            fill_facet(&vertices, skipped, &mut facet);
            if let Some(facet_key) = self.find_canonical(&facet) {
                boundary.push(facet_key);
            }
        }
        boundary
    }

    // -------------------------------------------------------------------------
    // Insertion
    // -------------------------------------------------------------------------

    /// Inserts a simplex together with all of its missing faces.
    ///
    /// The simplex receives `filtration`. Faces that were missing receive `min(0, filtration)`;
    /// faces that already exist keep their value.
    ///
    /// Returns `Ok(true)` if the simplex was inserted and `Ok(false)` if it already existed,
    /// in which case nothing changes (its filtration value is preserved).
    ///
    /// # Errors
    ///
    /// - [`SimplexTreeError::EmptySimplex`] if `vertices` is empty.
    /// - [`SimplexTreeError::NonComparableFiltration`] if `filtration` is NaN.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vietoris::core::simplex_tree::SimplexTree;
    ///
    /// let mut st = SimplexTree::new();
    /// assert!(st.insert_simplex(&[3, 1], 4.0).unwrap());
    /// assert_eq!(st.filtration(st.find(&[1]).unwrap()), Some(0.0));
    /// assert_eq!(st.filtration(st.find(&[1, 3]).unwrap()), Some(4.0));
    /// ```
    pub fn insert_simplex(
        &mut self,
        vertices: &[VertexHandle],
        filtration: F,
    ) -> Result<bool, SimplexTreeError> {
        check_comparable(filtration)?;
        let face_filtration = F::zero().min(filtration);
        self.insert_canonical(vertices, filtration, face_filtration)
    }

    /// Inserts a simplex and gives every missing face the same filtration value.
    ///
    /// Existing faces keep their value. Return value and errors match
    /// [`insert_simplex`](Self::insert_simplex).
    ///
    /// # Errors
    ///
    /// Same as [`insert_simplex`](Self::insert_simplex).
    pub fn insert_simplex_and_subfaces(
        &mut self,
        vertices: &[VertexHandle],
        filtration: F,
    ) -> Result<bool, SimplexTreeError> {
        check_comparable(filtration)?;
        self.insert_canonical(vertices, filtration, filtration)
    }

    fn insert_canonical(
        &mut self,
        vertices: &[VertexHandle],
        filtration: F,
        face_filtration: F,
    ) -> Result<bool, SimplexTreeError> {
        let simplex = canonical_simplex(vertices);
        if simplex.is_empty() {
            return Err(SimplexTreeError::EmptySimplex);
        }
        self.insert_with_faces(&simplex, filtration, face_filtration)
    }

    fn insert_with_faces(
        &mut self,
        simplex: &[VertexHandle],
        filtration: F,
        face_filtration: F,
    ) -> Result<bool, SimplexTreeError> {
        if self.find_canonical(simplex).is_some() {
            return Ok(false);
        }

        if simplex.len() > 1 {
            let mut facet = SimplexVertexBuffer::new();
            for skipped in 0..simplex.len() {
                fill_facet(simplex, skipped, &mut facet);
                self.insert_with_faces(&facet, face_filtration, face_filtration)?;
            }
        }

        let Some((&vertex, prefix)) = simplex.split_last() else {
            return Err(SimplexTreeError::EmptySimplex);
        };
        let parent = if prefix.is_empty() {
            None
        } else {
            let parent = self.find_canonical(prefix).ok_or_else(|| {
                SimplexTreeError::InconsistentDataStructure {
                    message: format!("prefix {prefix:?} missing after face insertion"),
                }
            })?;
            Some(parent)
        };
        self.attach_child(parent, vertex, filtration);
        Ok(true)
    }

    /// Creates a node below `parent` (or below the root). The caller guarantees that the
    /// child does not exist yet and that `vertex` exceeds every vertex on the parent path.
    pub(crate) fn attach_child(
        &mut self,
        parent: Option<NodeKey>,
        vertex: VertexHandle,
        filtration: F,
    ) -> NodeKey {
        let dimension = parent
            .and_then(|key| self.nodes.get(key))
            .map_or(0, |node| node.dimension + 1);
        let key = self.nodes.insert(Node {
            vertex,
            filtration,
            parent,
            dimension,
            children: BTreeMap::new(),
        });

        match parent.and_then(|parent_key| self.nodes.get_mut(parent_key)) {
            Some(parent_node) => {
                parent_node.children.insert(vertex, key);
            }
            None => {
                self.root.insert(vertex, key);
            }
        }
        self.dimension = Some(self.dimension.map_or(dimension, |d| d.max(dimension)));
        key
    }

    // -------------------------------------------------------------------------
    // Filtration maintenance
    // -------------------------------------------------------------------------

    /// Overrides the filtration value of one simplex.
    ///
    /// The caller is responsible for keeping the filtration monotone; see
    /// [`make_filtration_non_decreasing`](Self::make_filtration_non_decreasing).
    ///
    /// # Errors
    ///
    /// - [`SimplexTreeError::NotFound`] for a stale key.
    /// - [`SimplexTreeError::NonComparableFiltration`] if `filtration` is NaN.
    pub fn assign_filtration(&mut self, key: NodeKey, filtration: F) -> Result<(), SimplexTreeError> {
        check_comparable(filtration)?;
        let node = self.nodes.get_mut(key).ok_or(SimplexTreeError::NotFound)?;
        node.filtration = filtration;
        Ok(())
    }

    /// Raises every simplex whose filtration is below one of its facets' to the maximum
    /// over its facets.
    ///
    /// Returns `true` if any value changed.
    pub fn make_filtration_non_decreasing(&mut self) -> bool {
        let mut keys: Vec<NodeKey> = self.nodes.keys().collect();
        // Facets must be settled before their cofacets.
        keys.sort_by_key(|&key| self.nodes.get(key).map_or(0, |node| node.dimension));

        let mut modified = false;
        for key in keys {
            let Some(current) = self.filtration(key) else {
                continue;
            };
            let facet_max = self
                .boundary_simplex_range(key)
                .into_iter()
                .filter_map(|facet| self.filtration(facet))
                .fold(current, max_filtration);
            if facet_max.filtration_cmp(&current) == Ordering::Greater
                && let Some(node) = self.nodes.get_mut(key)
            {
                node.filtration = facet_max;
                modified = true;
            }
        }
        modified
    }

    /// Removes every simplex whose filtration value is strictly greater than `threshold`.
    ///
    /// Subtrees below a removed node are removed with it, so the closure property holds
    /// afterwards for monotone filtrations. Returns `true` if anything was removed.
    ///
    /// Comparison uses [`FiltrationValue::filtration_cmp`], so a NaN threshold sorts above
    /// every stored value and removes nothing.
    pub fn prune_above_filtration(&mut self, threshold: F) -> bool {
        let doomed: Vec<NodeKey> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.filtration.filtration_cmp(&threshold) == Ordering::Greater)
            .map(|(key, _)| key)
            .collect();
        if doomed.is_empty() {
            return false;
        }

        let before = self.nodes.len();
        for key in doomed {
            self.remove_subtree(key);
        }
        self.recompute_dimension();
        tracing::debug!(
            removed = before - self.nodes.len(),
            remaining = self.nodes.len(),
            "pruned simplex tree above filtration threshold"
        );
        true
    }

    fn remove_subtree(&mut self, key: NodeKey) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };
        let (vertex, parent) = (node.vertex, node.parent);
        match parent.and_then(|parent_key| self.nodes.get_mut(parent_key)) {
            Some(parent_node) => {
                parent_node.children.remove(&vertex);
            }
            None => {
                self.root.remove(&vertex);
            }
        }

        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(removed) = self.nodes.remove(current) {
                stack.extend(removed.children.into_values());
            }
        }
    }

    fn recompute_dimension(&mut self) {
        self.dimension = self.nodes.values().map(|node| node.dimension).max();
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Checks the closure property, filtration monotonicity, and dimension bookkeeping.
    ///
    /// Returns only the first failure; use
    /// [`validation_report`](Self::validation_report) for full diagnostics.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimplexTreeValidationError`] encountered.
    pub fn validate(&self) -> Result<(), SimplexTreeValidationError> {
        match self.validation_report(ValidationOptions::default()) {
            Ok(()) => Ok(()),
            Err(report) => report
                .violations
                .into_iter()
                .next()
                .map_or(Ok(()), |violation| Err(violation.error)),
        }
    }

    /// Runs every structural check and collects all violations.
    ///
    /// # Errors
    ///
    /// Returns a [`SimplexTreeValidationReport`] listing every violation found.
    pub fn validation_report(
        &self,
        options: ValidationOptions,
    ) -> Result<(), SimplexTreeValidationReport> {
        let mut violations = Vec::new();

        let computed = self.nodes.values().map(|node| node.dimension).max();
        if computed != self.dimension {
            violations.push(InvariantViolation {
                kind: InvariantKind::Dimension,
                error: SimplexTreeValidationError::InconsistentDimension {
                    stored: self.dimension,
                    computed,
                },
            });
        }

        let mut facet = SimplexVertexBuffer::new();
        for (key, node) in &self.nodes {
            let Some(vertices) = self.simplex_vertices(key) else {
                continue;
            };
            if vertices.len() != node.dimension + 1 {
                violations.push(InvariantViolation {
                    kind: InvariantKind::Dimension,
                    error: SimplexTreeValidationError::InconsistentDimension {
                        stored: Some(node.dimension),
                        computed: vertices.len().checked_sub(1),
                    },
                });
            }
            if vertices.len() < 2 {
                continue;
            }

            for skipped in 0..vertices.len() {
                fill_facet(&vertices, skipped, &mut facet);
                match self.find_canonical(&facet).and_then(|k| self.filtration(k)) {
                    None => violations.push(InvariantViolation {
                        kind: InvariantKind::Closure,
                        error: SimplexTreeValidationError::MissingFacet {
                            simplex: vertices.to_vec(),
                            facet: facet.to_vec(),
                        },
                    }),
                    Some(facet_filtration)
                        if options.check_filtration_monotonicity
                            && facet_filtration.filtration_cmp(&node.filtration)
                                == Ordering::Greater =>
                    {
                        violations.push(InvariantViolation {
                            kind: InvariantKind::FiltrationMonotonicity,
                            error: SimplexTreeValidationError::NonMonotoneFiltration {
                                simplex: vertices.to_vec(),
                                facet: facet.to_vec(),
                                simplex_filtration: format!("{:?}", node.filtration),
                                facet_filtration: format!("{facet_filtration:?}"),
                            },
                        });
                    }
                    Some(_) => {}
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SimplexTreeValidationReport { violations })
        }
    }
}

// =============================================================================
// EQUALITY
// =============================================================================

/// Two trees are equal when they store the same simplices with the same filtration values.
impl<F: FiltrationValue> PartialEq for SimplexTree<F> {
    fn eq(&self, other: &Self) -> bool {
        self.num_simplices() == other.num_simplices()
            && self.nodes.keys().all(|key| {
                self.simplex_vertices(key)
                    .and_then(|vertices| other.find_canonical(&vertices))
                    .and_then(|other_key| other.filtration(other_key))
                    == self.filtration(key)
            })
    }
}

// =============================================================================
// SERIALIZATION
// =============================================================================

/// Wire form of one simplex.
#[derive(Serialize, Deserialize)]
struct SerializedSimplex<F> {
    vertices: Vec<VertexHandle>,
    filtration: F,
}

/// Serializes the tree as a sequence of `{ vertices, filtration }` records in filtration order.
impl<F: FiltrationValue> Serialize for SimplexTree<F> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.num_simplices()))?;
        for key in self.filtration_simplex_range() {
            if let (Some(vertices), Some(filtration)) =
                (self.simplex_vertices(key), self.filtration(key))
            {
                seq.serialize_element(&SerializedSimplex {
                    vertices: vertices.to_vec(),
                    filtration,
                })?;
            }
        }
        seq.end()
    }
}

impl<'de, F: FiltrationValue> Deserialize<'de> for SimplexTree<F> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SimplexTreeVisitor<F>(PhantomData<F>);

        impl<'de, F: FiltrationValue> Visitor<'de> for SimplexTreeVisitor<F> {
            type Value = SimplexTree<F>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of simplices with filtration values")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut records: Vec<SerializedSimplex<F>> = Vec::new();
                while let Some(record) = seq.next_element()? {
                    records.push(record);
                }
                // Faces go in before cofaces so that every record keeps its own value.
                records.sort_by_key(|record| record.vertices.len());

                let mut tree = SimplexTree::new();
                for record in records {
                    tree.insert_simplex(&record.vertices, record.filtration)
                        .map_err(de::Error::custom)?;
                }
                Ok(tree)
            }
        }

        deserializer.deserialize_seq(SimplexTreeVisitor(PhantomData))
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Sorts and de-duplicates a vertex list.
#[must_use]
pub fn canonical_simplex(vertices: &[VertexHandle]) -> SimplexVertexBuffer {
    let mut simplex: SimplexVertexBuffer = vertices.iter().copied().collect();
    simplex.sort_unstable();
    simplex.dedup();
    simplex
}

/// Writes `simplex` without the vertex at position `skipped` into `facet`.
fn fill_facet(simplex: &[VertexHandle], skipped: usize, facet: &mut SimplexVertexBuffer) {
    facet.clear();
    facet.extend(
        simplex
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != skipped)
            .map(|(_, &vertex)| vertex),
    );
}

fn check_comparable<F: FiltrationValue>(filtration: F) -> Result<(), SimplexTreeError> {
    if filtration.is_nan() {
        return Err(SimplexTreeError::NonComparableFiltration {
            filtration: format!("{filtration:?}"),
        });
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn hollow_triangle() -> SimplexTree<f64> {
        let mut st = SimplexTree::new();
        for v in 0..3 {
            st.insert_simplex(&[v], 0.0).unwrap();
        }
        st.insert_simplex(&[0, 1], 1.0).unwrap();
        st.insert_simplex(&[1, 2], 2.0).unwrap();
        st.insert_simplex(&[0, 2], 3.0).unwrap();
        st
    }

    #[test]
    fn test_empty_tree() {
        let st: SimplexTree<f64> = SimplexTree::new();
        assert!(st.is_empty());
        assert_eq!(st.num_simplices(), 0);
        assert_eq!(st.num_vertices(), 0);
        assert_eq!(st.dimension(), None);
        assert_eq!(st.find(&[0]), None);
        assert!(st.validate().is_ok());
    }

    #[test]
    fn test_insert_rejects_empty_and_nan() {
        let mut st: SimplexTree<f64> = SimplexTree::new();
        assert_eq!(st.insert_simplex(&[], 1.0), Err(SimplexTreeError::EmptySimplex));
        assert!(matches!(
            st.insert_simplex(&[0], f64::NAN),
            Err(SimplexTreeError::NonComparableFiltration { .. })
        ));
        assert!(st.is_empty());
    }

    #[test]
    fn test_insert_fills_missing_faces_with_zero() {
        let mut st = SimplexTree::new();
        assert!(st.insert_simplex(&[0, 1, 2, 3], 5.0).unwrap());

        // 4 vertices + 6 edges + 4 triangles + 1 tetrahedron
        assert_eq!(st.num_simplices(), 15);
        assert_eq!(st.dimension(), Some(3));
        assert_eq!(st.filtration(st.find(&[0, 1, 2, 3]).unwrap()), Some(5.0));
        assert_eq!(st.filtration(st.find(&[1, 2, 3]).unwrap()), Some(0.0));
        assert!(st.validate().is_ok());
    }

    #[test]
    fn test_negative_filtration_keeps_faces_monotone() {
        let mut st = SimplexTree::new();
        st.insert_simplex(&[4, 7], -2.0).unwrap();
        assert_eq!(st.filtration(st.find(&[4]).unwrap()), Some(-2.0));
        assert!(st.validate().is_ok());
    }

    #[test]
    fn test_insert_and_subfaces_propagates_value() {
        let mut st = SimplexTree::new();
        st.insert_simplex(&[0], 0.0).unwrap();
        st.insert_simplex_and_subfaces(&[0, 1, 2], 3.0).unwrap();
        assert_eq!(st.filtration(st.find(&[0]).unwrap()), Some(0.0));
        assert_eq!(st.filtration(st.find(&[1]).unwrap()), Some(3.0));
        assert_eq!(st.filtration(st.find(&[1, 2]).unwrap()), Some(3.0));
    }

    #[test]
    fn test_reinsertion_is_idempotent() {
        let mut st = hollow_triangle();
        let count = st.num_simplices();
        assert!(!st.insert_simplex(&[1, 0], 9.0).unwrap());
        assert!(!st.insert_simplex(&[2], -1.0).unwrap());
        assert_eq!(st.num_simplices(), count);
        assert_eq!(st.filtration(st.find(&[0, 1]).unwrap()), Some(1.0));
        assert_eq!(st.filtration(st.find(&[2]).unwrap()), Some(0.0));
    }

    #[test]
    fn test_find_is_order_insensitive_and_exact() {
        let st = hollow_triangle();
        assert_eq!(st.find(&[2, 1]), st.find(&[1, 2]));
        assert_eq!(st.find(&[1, 1, 2]), st.find(&[1, 2]));
        assert!(st.find(&[0, 1, 2]).is_none());
        assert!(st.find(&[5]).is_none());
        assert!(st.find(&[]).is_none());
    }

    #[test]
    fn test_simplex_vertices_and_dimension() {
        let mut st = SimplexTree::new();
        st.insert_simplex(&[9, 2, 5], 1.0).unwrap();
        let key = st.find(&[2, 5, 9]).unwrap();
        assert_eq!(st.simplex_vertices(key).unwrap().as_slice(), &[2, 5, 9]);
        assert_eq!(st.simplex_dimension(key), Some(2));
        assert_eq!(st.vertices().collect::<Vec<_>>(), vec![2, 5, 9]);
    }

    #[test]
    fn test_boundary_simplex_range() {
        let mut st = SimplexTree::new();
        st.insert_simplex(&[0, 1, 2], 1.0).unwrap();
        let triangle = st.find(&[0, 1, 2]).unwrap();
        let boundary = st.boundary_simplex_range(triangle);
        let expected = [st.find(&[1, 2]), st.find(&[0, 2]), st.find(&[0, 1])];
        assert_eq!(boundary.len(), 3);
        for (facet, expected) in boundary.iter().zip(expected) {
            assert_eq!(Some(*facet), expected);
        }
        assert!(st.boundary_simplex_range(st.find(&[0]).unwrap()).is_empty());
    }

    #[test]
    fn test_make_filtration_non_decreasing() {
        let mut st = hollow_triangle();
        st.insert_simplex(&[0, 1, 2], 0.5).unwrap();
        assert!(matches!(
            st.validate(),
            Err(SimplexTreeValidationError::NonMonotoneFiltration { .. })
        ));

        assert!(st.make_filtration_non_decreasing());
        assert_eq!(st.filtration(st.find(&[0, 1, 2]).unwrap()), Some(3.0));
        assert!(st.validate().is_ok());
        assert!(!st.make_filtration_non_decreasing());
    }

    #[test]
    fn test_prune_above_filtration() {
        let mut st = hollow_triangle();
        st.insert_simplex(&[0, 1, 2], 3.0).unwrap();
        let stale = st.find(&[0, 1, 2]).unwrap();

        assert!(st.prune_above_filtration(1.5));
        assert_eq!(st.num_simplices(), 4);
        assert_eq!(st.dimension(), Some(1));
        assert_eq!(st.filtration(stale), None);
        assert!(st.find(&[0, 2]).is_none());
        assert!(st.validate().is_ok());

        assert!(!st.prune_above_filtration(1.5));
        assert!(st.prune_above_filtration(-1.0));
        assert!(st.is_empty());
        assert_eq!(st.dimension(), None);
    }

    #[test]
    fn test_prune_with_nan_threshold_keeps_everything() {
        let mut st = hollow_triangle();
        st.insert_simplex(&[0, 1, 2], 3.0).unwrap();
        let before = st.clone();

        assert!(!st.prune_above_filtration(f64::NAN));
        assert_eq!(st, before);
        assert_eq!(st.dimension(), Some(2));
    }

    #[test]
    fn test_assign_filtration_and_stale_keys() {
        let mut st = hollow_triangle();
        let edge = st.find(&[0, 1]).unwrap();
        st.assign_filtration(edge, 7.0).unwrap();
        assert_eq!(st.filtration(edge), Some(7.0));

        st.prune_above_filtration(5.0);
        assert_eq!(st.assign_filtration(edge, 1.0), Err(SimplexTreeError::NotFound));
        assert!(st.boundary_simplex_range(edge).is_empty());
    }

    #[test]
    fn test_validation_report_collects_all_violations() {
        let mut st = hollow_triangle();
        st.insert_simplex(&[0, 1, 2], 0.0).unwrap();
        let report = st.validation_report(ValidationOptions::default()).unwrap_err();
        // Edges {0,1}, {1,2} and {0,2} all exceed the triangle's value.
        assert_eq!(report.violations.len(), 3);
        assert!(
            report
                .violations
                .iter()
                .all(|v| v.kind == InvariantKind::FiltrationMonotonicity)
        );

        let relaxed = ValidationOptions {
            check_filtration_monotonicity: false,
        };
        assert!(st.validation_report(relaxed).is_ok());
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let mut a = SimplexTree::new();
        a.insert_simplex(&[0, 1], 1.0).unwrap();
        a.insert_simplex(&[2], 0.0).unwrap();

        let mut b = SimplexTree::new();
        b.insert_simplex(&[2], 0.0).unwrap();
        b.insert_simplex(&[1], 0.0).unwrap();
        b.insert_simplex(&[0, 1], 1.0).unwrap();

        assert_eq!(a, b);
        b.insert_simplex(&[1, 2], 1.0).unwrap();
        assert_ne!(a, b);
    }
}
