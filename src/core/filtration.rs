//! Support types shared by the simplex tree and the Rips construction.
//!
//! - [`VertexHandle`]: the 0-based integer identifier of a vertex, assigned in point-cloud order.
//! - [`FiltrationValue`]: the scalar attached to every simplex.

use std::cmp::Ordering;
use std::fmt::Debug;

use num_traits::Float;
use ordered_float::OrderedFloat;
use serde::{Serialize, de::DeserializeOwned};

/// Identifier of a vertex in a simplicial complex.
///
/// Handles are assigned by insertion order of the point cloud, starting at 0,
/// and stay stable for the lifetime of one complex.
pub type VertexHandle = usize;

/// Scalar type usable as a filtration value.
///
/// Implemented for `f32` and `f64`.
///
/// # Examples
///
/// ```
/// use vietoris::core::filtration::FiltrationValue;
///
/// fn largest<F: FiltrationValue>(values: &[F]) -> F {
///     values.iter().copied().fold(F::neg_infinity(), F::max)
/// }
///
/// assert_eq!(largest(&[0.5_f64, 2.0, 1.0]), 2.0);
/// ```
pub trait FiltrationValue:
    Float + Default + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Total order used for every filtration comparison in this crate.
    ///
    /// Follows [`OrderedFloat`]: NaN compares equal to itself and greater than every
    /// other value, including infinity.
    fn filtration_cmp(&self, other: &Self) -> Ordering;
}

macro_rules! impl_filtration_value {
    ($($t:ty),*) => {
        $(
            impl FiltrationValue for $t {
                #[inline]
                fn filtration_cmp(&self, other: &Self) -> Ordering {
                    OrderedFloat(*self).cmp(&OrderedFloat(*other))
                }
            }
        )*
    };
}

impl_filtration_value!(f32, f64);

/// Returns the larger of two filtration values.
#[inline]
#[must_use]
pub fn max_filtration<F: FiltrationValue>(a: F, b: F) -> F {
    if a.filtration_cmp(&b) == Ordering::Less { b } else { a }
}
