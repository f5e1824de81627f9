//! Lazy, restartable traversals of a [`SimplexTree`].
//!
//! Every range is produced by a method on [`SimplexTree`] and borrows the tree immutably;
//! calling the method again restarts the traversal from the beginning.
//!
//! | Method | Order | Cost |
//! |---|---|---|
//! | [`SimplexTree::skeleton_simplex_range`] | depth-first, lexicographic | lazy |
//! | [`SimplexTree::complex_simplex_range`] | depth-first, lexicographic | lazy |
//! | [`SimplexTree::filtration_simplex_range`] | filtration, then dimension, then lexicographic | sorts all simplices up front |
//! | [`SimplexTree::simplex_vertex_range`] | vertices from largest to smallest | lazy |

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::core::filtration::{FiltrationValue, VertexHandle};
use crate::core::simplex_tree::{NodeKey, SimplexTree};

// =============================================================================
// SKELETON (DEPTH-FIRST) RANGE
// =============================================================================

/// Depth-first iterator over all simplices up to a given dimension.
///
/// Simplices are visited in lexicographic order of their ascending vertex lists:
/// `{0}, {0,1}, {0,1,2}, {0,2}, {1}, …`.
#[derive(Clone, Debug)]
pub struct SkeletonSimplexIter<'a, F: FiltrationValue> {
    tree: &'a SimplexTree<F>,
    stack: Vec<NodeKey>,
    max_dimension: usize,
}

impl<F: FiltrationValue> Iterator for SkeletonSimplexIter<'_, F> {
    type Item = NodeKey;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(key) = self.stack.pop() {
            let Some(node) = self.tree.nodes.get(key) else {
                continue;
            };
            if node.dimension < self.max_dimension {
                self.stack.extend(node.children.values().rev().copied());
            }
            return Some(key);
        }
        None
    }
}

impl<F: FiltrationValue> FusedIterator for SkeletonSimplexIter<'_, F> {}

// =============================================================================
// FILTRATION-ORDERED RANGE
// =============================================================================

/// Iterator over every simplex in filtration order.
///
/// The order is total and reproducible: filtration value ascending, then dimension
/// ascending, then lexicographic order of the ascending vertex lists.
#[derive(Clone, Debug)]
pub struct FiltrationSimplexIter {
    keys: std::vec::IntoIter<NodeKey>,
}

impl Iterator for FiltrationSimplexIter {
    type Item = NodeKey;

    fn next(&mut self) -> Option<Self::Item> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl DoubleEndedIterator for FiltrationSimplexIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.keys.next_back()
    }
}

impl ExactSizeIterator for FiltrationSimplexIter {}

impl FusedIterator for FiltrationSimplexIter {}

// =============================================================================
// SIMPLEX VERTEX RANGE
// =============================================================================

/// Walks from a simplex node up to the root, yielding its vertices from largest to smallest.
#[derive(Clone, Debug)]
pub struct SimplexVertexIter<'a, F: FiltrationValue> {
    tree: &'a SimplexTree<F>,
    next: Option<NodeKey>,
}

impl<F: FiltrationValue> Iterator for SimplexVertexIter<'_, F> {
    type Item = VertexHandle;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.nodes.get(self.next?)?;
        self.next = node.parent;
        Some(node.vertex)
    }
}

impl<F: FiltrationValue> FusedIterator for SimplexVertexIter<'_, F> {}

// =============================================================================
// RANGE CONSTRUCTORS
// =============================================================================

impl<F: FiltrationValue> SimplexTree<F> {
    /// All simplices of dimension ≤ `dimension`, depth-first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vietoris::core::simplex_tree::SimplexTree;
    ///
    /// let mut st = SimplexTree::new();
    /// st.insert_simplex(&[0, 1, 2], 1.0).unwrap();
    ///
    /// assert_eq!(st.skeleton_simplex_range(0).count(), 3);
    /// assert_eq!(st.skeleton_simplex_range(1).count(), 6);
    /// assert_eq!(st.skeleton_simplex_range(5).count(), 7);
    /// ```
    #[must_use]
    pub fn skeleton_simplex_range(&self, dimension: usize) -> SkeletonSimplexIter<'_, F> {
        SkeletonSimplexIter {
            tree: self,
            stack: self.root.values().rev().copied().collect(),
            max_dimension: dimension,
        }
    }

    /// Every simplex, depth-first.
    #[must_use]
    pub fn complex_simplex_range(&self) -> SkeletonSimplexIter<'_, F> {
        self.skeleton_simplex_range(usize::MAX)
    }

    /// Every simplex sorted by filtration value, then dimension, then vertices.
    ///
    /// This is the order persistence algorithms consume. All keys are materialized and
    /// sorted when the range is created.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use vietoris::core::simplex_tree::SimplexTree;
    ///
    /// let mut st = SimplexTree::new();
    /// st.insert_simplex(&[0, 1], 2.0).unwrap();
    /// st.insert_simplex(&[1, 2], 1.0).unwrap();
    ///
    /// let order: Vec<Vec<usize>> = st
    ///     .filtration_simplex_range()
    ///     .map(|key| st.simplex_vertices(key).unwrap().to_vec())
    ///     .collect();
    /// assert_eq!(
    ///     order,
    ///     vec![vec![0], vec![1], vec![2], vec![1, 2], vec![0, 1]]
    /// );
    /// ```
    #[must_use]
    pub fn filtration_simplex_range(&self) -> FiltrationSimplexIter {
        // The depth-first walk is already lexicographic, so a stable sort on
        // (filtration, dimension) yields the full tie-break order.
        let mut entries: Vec<(F, usize, NodeKey)> = self
            .complex_simplex_range()
            .filter_map(|key| {
                let node = self.nodes.get(key)?;
                Some((node.filtration, node.dimension, key))
            })
            .collect();
        entries.sort_by(|a, b| match a.0.filtration_cmp(&b.0) {
            Ordering::Equal => a.1.cmp(&b.1),
            unequal => unequal,
        });

        FiltrationSimplexIter {
            keys: entries
                .into_iter()
                .map(|(_, _, key)| key)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// Vertices of a simplex, from its largest vertex down to its smallest.
    ///
    /// Empty for a stale key. Use [`simplex_vertices`](Self::simplex_vertices) for an
    /// ascending buffer.
    #[must_use]
    pub fn simplex_vertex_range(&self, key: NodeKey) -> SimplexVertexIter<'_, F> {
        SimplexVertexIter {
            tree: self,
            next: Some(key),
        }
    }
}
