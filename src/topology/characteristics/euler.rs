//! Euler characteristic of a simplicial complex.
//!
//! χ = Σ(-1)^k · `f_k`, where `f_k` is the number of `k`-simplices.
//!
//! For a Rips complex built at a threshold large enough to connect every pair, the complex
//! is a full simplex (contractible), so χ = 1 at every expansion dimension. That makes χ a
//! cheap sanity check on expansion output.
//!
//! # Examples
//!
//! ```rust
//! use vietoris::core::simplex_tree::SimplexTree;
//! use vietoris::topology::characteristics::euler;
//!
//! let mut st = SimplexTree::new();
//! st.insert_simplex(&[0, 1, 2, 3], 1.0).unwrap();
//!
//! let counts = euler::count_simplices(&st);
//! assert_eq!(counts.by_dim, vec![4, 6, 4, 1]);
//! assert_eq!(euler::euler_characteristic(&counts), 1);
//! ```

use crate::core::filtration::FiltrationValue;
use crate::core::simplex_tree::SimplexTree;

/// Counts of k-simplices for all dimensions `0 ≤ k ≤ dim`.
///
/// In the topology literature this is commonly called the **f-vector**.
///
/// # Examples
///
/// ```rust
/// use vietoris::topology::characteristics::euler::FVector;
///
/// // Hollow triangle: 3 vertices, 3 edges
/// let counts = FVector { by_dim: vec![3, 3] };
///
/// assert_eq!(counts.count(1), 3);
/// assert_eq!(counts.count(2), 0);
/// assert_eq!(counts.dimension(), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FVector {
    /// `by_dim[k]` = `f_k` = number of `k`-simplices
    pub by_dim: Vec<usize>,
}

impl FVector {
    /// Number of `k`-simplices, 0 if `k` is out of range.
    #[must_use]
    #[inline]
    pub fn count(&self, k: usize) -> usize {
        self.by_dim.get(k).copied().unwrap_or(0)
    }

    /// Largest `k` with a stored entry, `None` for the empty complex.
    #[must_use]
    pub const fn dimension(&self) -> Option<usize> {
        self.by_dim.len().checked_sub(1)
    }

    /// Total number of simplices.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_dim.iter().sum()
    }
}

/// Counts the simplices of every dimension stored in `tree`.
#[must_use]
pub fn count_simplices<F: FiltrationValue>(tree: &SimplexTree<F>) -> FVector {
    let mut by_dim = vec![0; tree.dimension().map_or(0, |d| d + 1)];
    for key in tree.complex_simplex_range() {
        if let Some(count) = tree
            .simplex_dimension(key)
            .and_then(|dimension| by_dim.get_mut(dimension))
        {
            *count += 1;
        }
    }
    FVector { by_dim }
}

/// Alternating sum χ = f₀ - f₁ + f₂ - …
///
/// # Examples
///
/// ```rust
/// use vietoris::topology::characteristics::euler::{FVector, euler_characteristic};
///
/// // Hollow triangle (a circle): χ = 3 - 3 = 0
/// assert_eq!(euler_characteristic(&FVector { by_dim: vec![3, 3] }), 0);
/// ```
#[must_use]
#[allow(clippy::cast_possible_wrap)] // Simplex counts won't exceed isize::MAX in practice
pub fn euler_characteristic(counts: &FVector) -> isize {
    counts
        .by_dim
        .iter()
        .enumerate()
        .map(|(k, &f_k)| {
            let sign = if k % 2 == 0 { 1 } else { -1 };
            sign * (f_k as isize)
        })
        .sum()
}
