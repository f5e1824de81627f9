//! Flag (clique) complex expansion of a simplex tree.
//!
//! Given a simplex tree holding a graph (vertices and edges), expansion adds every simplex
//! of dimension ≤ `max_dimension` whose vertices are pairwise connected, and nothing else.
//!
//! # Algorithm
//!
//! The expansion works on *sibling sets*: the children of one node, i.e. all simplices
//! `σ ∪ {u}` that share the prefix `σ`. For a sibling `σ ∪ {u}` the candidate extensions are
//! the later siblings `σ ∪ {w}` (`w > u`) for which the edge `{u, w}` exists. Those are
//! exactly the vertices adjacent to every vertex of `σ ∪ {u}` and larger than `u`, so each
//! clique is generated once, through its vertices in ascending order, and every facet of
//! the new simplex is already present.
//!
//! The new simplex `σ ∪ {u, w}` receives
//!
//! ```text
//! max( f(σ ∪ {u}), f(σ ∪ {w}), f({u, w}) )
//! ```
//!
//! which is the maximum over its facets. On a Rips graph this equals the largest pairwise
//! distance among its vertices. Recursion descends into the freshly created sibling set and
//! stops at `max_dimension` or when no candidates remain.
//!
//! The cost is proportional to the number of simplices produced, plus one sorted-map lookup
//! per candidate pair.

use crate::core::filtration::{FiltrationValue, VertexHandle, max_filtration};
use crate::core::simplex_tree::{NodeKey, SimplexTree};

/// Outcome of one expansion pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpansionStatistics {
    /// Number of simplices created by the expansion.
    pub simplices_added: usize,
    /// Tree dimension after the expansion.
    pub dimension: Option<usize>,
}

/// Expands the tree in place to its flag complex up to `max_dimension`.
///
/// Simplices that already exist are kept (with their filtration values) and expansion
/// continues below them, so running the expansion twice adds nothing the second time.
///
/// `max_dimension` ≤ 1 leaves the tree unchanged.
///
/// # Examples
///
/// ```rust
/// use vietoris::core::algorithms::flag_expansion::expand_flag_complex;
/// use vietoris::core::simplex_tree::SimplexTree;
///
/// // A 4-cycle with one diagonal: two triangles, no tetrahedron.
/// let mut st = SimplexTree::new();
/// for (u, v, w) in [(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (0, 3, 1.0), (0, 2, 2.0)] {
///     st.insert_simplex(&[u, v], w).unwrap();
/// }
///
/// let stats = expand_flag_complex(&mut st, 3);
/// assert_eq!(stats.simplices_added, 2);
/// assert_eq!(st.dimension(), Some(2));
/// assert_eq!(st.filtration(st.find(&[0, 1, 2]).unwrap()), Some(2.0));
/// ```
pub fn expand_flag_complex<F: FiltrationValue>(
    tree: &mut SimplexTree<F>,
    max_dimension: usize,
) -> ExpansionStatistics {
    let before = tree.num_simplices();
    if max_dimension >= 2 {
        let vertex_keys: Vec<NodeKey> = tree.root.values().copied().collect();
        for vertex_key in vertex_keys {
            let edges = children_of(tree, vertex_key);
            if edges.len() > 1 {
                expand_siblings(tree, &edges, 1, max_dimension);
            }
        }
    }

    let statistics = ExpansionStatistics {
        simplices_added: tree.num_simplices() - before,
        dimension: tree.dimension(),
    };
    tracing::debug!(
        max_dimension,
        simplices_added = statistics.simplices_added,
        dimension = ?statistics.dimension,
        "flag expansion finished"
    );
    statistics
}

/// Grows the children of every node in `siblings`, which all have dimension
/// `sibling_dimension` and share the same parent.
fn expand_siblings<F: FiltrationValue>(
    tree: &mut SimplexTree<F>,
    siblings: &[(VertexHandle, NodeKey)],
    sibling_dimension: usize,
    max_dimension: usize,
) {
    if sibling_dimension >= max_dimension {
        return;
    }

    for (position, &(vertex, key)) in siblings.iter().enumerate() {
        let candidates = extension_candidates(tree, vertex, key, &siblings[position + 1..]);
        if candidates.is_empty() {
            continue;
        }

        let mut extended = Vec::with_capacity(candidates.len());
        for (candidate, filtration) in candidates {
            let existing = tree
                .nodes
                .get(key)
                .and_then(|node| node.children.get(&candidate).copied());
            let child =
                existing.unwrap_or_else(|| tree.attach_child(Some(key), candidate, filtration));
            extended.push((candidate, child));
        }

        if extended.len() > 1 {
            expand_siblings(tree, &extended, sibling_dimension + 1, max_dimension);
        }
    }
}

/// Intersects the later siblings of `σ ∪ {vertex}` with the neighbors of `vertex`,
/// returning each surviving vertex with the filtration value of the new simplex.
fn extension_candidates<F: FiltrationValue>(
    tree: &SimplexTree<F>,
    vertex: VertexHandle,
    key: NodeKey,
    later_siblings: &[(VertexHandle, NodeKey)],
) -> Vec<(VertexHandle, F)> {
    let Some(simplex_filtration) = tree.filtration(key) else {
        return Vec::new();
    };
    let Some(neighbors) = tree
        .find_vertex(vertex)
        .and_then(|vertex_key| tree.nodes.get(vertex_key))
        .map(|node| &node.children)
    else {
        return Vec::new();
    };
    if neighbors.is_empty() {
        return Vec::new();
    }

    later_siblings
        .iter()
        .filter_map(|&(candidate, sibling_key)| {
            let edge_filtration = tree.filtration(*neighbors.get(&candidate)?)?;
            let sibling_filtration = tree.filtration(sibling_key)?;
            Some((
                candidate,
                max_filtration(
                    max_filtration(simplex_filtration, sibling_filtration),
                    edge_filtration,
                ),
            ))
        })
        .collect()
}

fn children_of<F: FiltrationValue>(
    tree: &SimplexTree<F>,
    key: NodeKey,
) -> Vec<(VertexHandle, NodeKey)> {
    tree.nodes.get(key).map_or_else(Vec::new, |node| {
        node.children
            .iter()
            .map(|(&vertex, &child)| (vertex, child))
            .collect()
    })
}

impl<F: FiltrationValue> SimplexTree<F> {
    /// Expands the tree to its flag complex up to `max_dimension`.
    ///
    /// See [`expand_flag_complex`] for the algorithm and guarantees.
    pub fn expansion(&mut self, max_dimension: usize) -> ExpansionStatistics {
        expand_flag_complex(self, max_dimension)
    }
}
