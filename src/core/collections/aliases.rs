use rustc_hash::FxHashMap;
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

use crate::core::filtration::VertexHandle;

// =============================================================================
// STORAGE BACKEND
// =============================================================================

/// Internal storage backend for simplex tree nodes.
///
/// This type alias abstracts over the concrete arena implementation,
/// allowing the choice between `DenseSlotMap` (**default**) and `SlotMap`
/// (when built with `--no-default-features`) without exposing the choice
/// in public APIs.
///
/// # Feature Flags
///
/// - **default**: Uses `DenseSlotMap` (enabled via the default `dense-slotmap` feature)
/// - **--no-default-features**: Uses `SlotMap` for comparison and experimentation
///
/// # Internal Use Only
///
/// Public methods hand out [`NodeKey`](crate::core::simplex_tree::NodeKey)s and
/// iterators, never the arena itself.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Node arena backed by `DenseSlotMap` (default).
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

// =============================================================================
// CORE OPTIMIZED TYPES
// =============================================================================

/// Optimized `HashMap` type for performance-critical operations.
/// Uses `rustc_hash::FxHasher` for faster hashing in non-cryptographic contexts.
///
/// # Security Warning
///
/// ⚠️ **Not DoS-resistant**: Do not use with attacker-controlled keys.
///
/// # Examples
///
/// ```rust
/// use vietoris::core::collections::FastHashMap;
///
/// let mut map: FastHashMap<usize, f64> = FastHashMap::default();
/// map.insert(3, 0.5);
/// assert_eq!(map.get(&3), Some(&0.5));
/// ```
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Small-optimized Vec that uses stack allocation for small collections.
///
/// Stays on the stack for ≤ N elements and spills to the heap afterwards.
///
/// # Examples
///
/// ```rust
/// use vietoris::core::collections::SmallBuffer;
///
/// let mut buffer: SmallBuffer<usize, 8> = SmallBuffer::new();
/// buffer.extend([0, 1, 2]);
/// assert!(!buffer.spilled());
/// ```
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

// =============================================================================
// SEMANTIC SIZE CONSTANTS AND TYPE ALIASES
// =============================================================================

/// Inline capacity for per-simplex vertex buffers.
///
/// Rips complexes are almost always expanded to dimension ≤ 7, so eight handles
/// keep every realistic simplex on the stack.
pub const MAX_PRACTICAL_DIMENSION_SIZE: usize = 8;

/// Canonical (ascending) vertex list of one simplex.
pub type SimplexVertexBuffer = SmallBuffer<VertexHandle, MAX_PRACTICAL_DIMENSION_SIZE>;

/// Creates a [`FastHashMap`] with at least the given capacity.
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
