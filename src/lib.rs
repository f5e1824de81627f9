//! # vietoris
//!
//! This is a library for building [Vietoris–Rips complexes](https://en.wikipedia.org/wiki/Vietoris%E2%80%93Rips_complex)
//! of finite point clouds and storing them, with filtration values, in a
//! [simplex tree](https://hal.inria.fr/hal-00707901) ready for persistent homology.
//!
//! # Features
//!
//! - Any point type and any distance function (or a precomputed distance matrix)
//! - Flag-complex expansion to an arbitrary dimension
//! - A generic simplex tree with lexicographic and filtration-ordered traversals
//! - Generic floating-point filtration values (`f32`, `f64`, see [`FiltrationValue`](core::filtration::FiltrationValue))
//! - Serialization/Deserialization with [serde](https://serde.rs)
//! - An OFF point-cloud reader
//!
//! # Basic Usage
//!
//! ```rust
//! use vietoris::prelude::*;
//!
//! let points = vec![
//!     vec![1.0, 1.0],
//!     vec![7.0, 0.0],
//!     vec![4.0, 6.0],
//!     vec![9.0, 6.0],
//!     vec![0.0, 14.0],
//!     vec![2.0, 19.0],
//!     vec![9.0, 17.0],
//! ];
//!
//! let rips = RipsComplex::new(&points, 12.0, euclidean_distance);
//! let mut st = SimplexTree::new();
//! assert!(rips.create_complex(&mut st, 2));
//!
//! assert_eq!(st.num_vertices(), 7);
//! assert_eq!(st.num_simplices(), 23);
//! assert_eq!(st.dimension(), Some(2));
//!
//! // Filtration values never decrease along the traversal.
//! let values: Vec<f64> = st
//!     .filtration_simplex_range()
//!     .filter_map(|key| st.filtration(key))
//!     .collect();
//! assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
//! ```
//!
//! # Construction
//!
//! A [`RipsComplex`](core::rips_complex::RipsComplex) computes its threshold graph once.
//! [`create_complex`](core::rips_complex::RipsComplex::create_complex) then fills an empty
//! [`SimplexTree`](core::simplex_tree::SimplexTree):
//!
//! 1. every vertex at filtration 0,
//! 2. every edge at its length,
//! 3. the [flag expansion](core::algorithms::flag_expansion) up to `max_dimension`.
//!
//! The filtration value of each simplex is the largest pairwise distance among its vertices.
//!
//! # Simplex Tree Invariants
//!
//! The simplex tree maintains the following invariants, checked by
//! [`SimplexTree::validate`](core::simplex_tree::SimplexTree::validate) and
//! [`SimplexTree::validation_report`](core::simplex_tree::SimplexTree::validation_report):
//!
//! | Invariant | Meaning |
//! |---|---|
//! | Closure | every facet of a stored simplex is stored |
//! | Filtration monotonicity | `filtration(facet) ≤ filtration(simplex)` |
//! | Dimension bookkeeping | stored node and tree dimensions match the trie |
//!
//! Insertion restores closure by inserting missing faces first. Monotonicity is preserved by
//! every construction path in this crate; explicit overrides through
//! [`assign_filtration`](core::simplex_tree::SimplexTree::assign_filtration) can be repaired
//! with [`make_filtration_non_decreasing`](core::simplex_tree::SimplexTree::make_filtration_non_decreasing).
//!
//! # Logging
//!
//! Diagnostics are emitted through [`tracing`](https://docs.rs/tracing). The library never
//! installs a subscriber.

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

/// The `core` module contains the simplex tree, the Rips construction, and the algorithms
/// connecting them.
pub mod core {
    /// Algorithms operating on simplex trees
    pub mod algorithms {
        /// Flag (clique) complex expansion
        pub mod flag_expansion;
    }
    /// High-performance collection types used by the simplex tree
    pub mod collections;
    pub mod filtration;
    pub mod proximity_graph;
    pub mod rips_complex;
    pub mod simplex_tree;
    pub mod traversal;

    // Re-export the `core` modules.
    pub use algorithms::flag_expansion::*;
    pub use filtration::*;
    pub use proximity_graph::*;
    pub use rips_complex::*;
    pub use simplex_tree::*;
    pub use traversal::*;
    // Note: collections module not re-exported here to avoid namespace pollution
}

/// Distance functions and point-cloud generation.
pub mod geometry {
    pub mod distance;
    pub mod point_generation;
    pub use distance::*;
    pub use point_generation::*;
}

/// Point-cloud input.
pub mod io {
    pub mod off;
    pub use off::*;
}

/// Topological diagnostics for simplicial complexes.
pub mod topology {
    /// Topological invariants
    pub mod characteristics {
        pub mod euler;
    }
}

/// A prelude module that re-exports commonly used types.
/// This makes it easier to import the most commonly used items from the crate.
pub mod prelude {
    pub use crate::core::{
        algorithms::flag_expansion::{ExpansionStatistics, expand_flag_complex},
        filtration::{FiltrationValue, VertexHandle},
        proximity_graph::{ProximityGraph, WeightedEdge},
        rips_complex::{RipsComplex, RipsComplexBuilder, RipsComplexError},
        simplex_tree::{
            NodeKey, SimplexTree, SimplexTreeError, SimplexTreeValidationError, ValidationOptions,
        },
    };

    pub use crate::core::collections::{FastHashMap, SimplexVertexBuffer, SmallBuffer};

    pub use crate::geometry::distance::{
        chebyshev_distance, euclidean_distance, manhattan_distance, squared_euclidean_distance,
    };
    pub use crate::io::off::{OffReaderError, read_off_points, read_off_points_from_path};
    pub use crate::topology::characteristics::euler::{
        FVector, count_simplices, euler_characteristic,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
