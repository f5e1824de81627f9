//! Distance functions over coordinate slices.
//!
//! Every function accepts anything that views as a coordinate slice (`Vec<T>`, `[T; D]`,
//! `&[T]`), so they can be passed directly as the distance oracle of
//! [`RipsComplex`](crate::core::rips_complex::RipsComplex).
//!
//! Points of different lengths have no distance: every function returns NaN for them, and a
//! NaN coordinate makes the result NaN as well. The Rips construction refuses such pairs.

use num_traits::Float;

/// Coordinate-wise differences, or `None` when the lengths disagree.
fn differences<'a, T: Float>(a: &'a [T], b: &'a [T]) -> Option<impl Iterator<Item = T> + 'a> {
    (a.len() == b.len()).then(|| a.iter().zip(b).map(|(&x, &y)| x - y))
}

/// Maximum that lets NaN through, unlike [`Float::max`].
fn nan_max<T: Float>(acc: T, value: T) -> T {
    if value > acc || value.is_nan() { value } else { acc }
}

/// Sum of squared coordinate differences.
///
/// Cheaper than [`euclidean_distance`] and orders point pairs identically, so thresholds
/// can be squared instead of taking roots.
///
/// # Examples
///
/// ```
/// use vietoris::geometry::distance::squared_euclidean_distance;
///
/// assert_eq!(squared_euclidean_distance(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), 2.0);
/// ```
#[must_use]
pub fn squared_euclidean_distance<T, P>(a: &P, b: &P) -> T
where
    T: Float,
    P: AsRef<[T]> + ?Sized,
{
    differences(a.as_ref(), b.as_ref())
        .map_or_else(T::nan, |diffs| diffs.fold(T::zero(), |acc, d| acc + d * d))
}

/// Euclidean (L2) distance.
///
/// Coordinates are scaled by the largest absolute difference before squaring, which
/// avoids overflow and underflow for extreme magnitudes.
///
/// # Examples
///
/// ```
/// use vietoris::geometry::distance::euclidean_distance;
///
/// assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// assert_eq!(euclidean_distance(&[1e200, 0.0], &[-1e200, 0.0]), 2e200);
/// ```
#[must_use]
pub fn euclidean_distance<T, P>(a: &P, b: &P) -> T
where
    T: Float,
    P: AsRef<[T]> + ?Sized,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    let max_abs = chebyshev_distance(a, b);
    if max_abs == T::zero() || !max_abs.is_finite() {
        return max_abs;
    }
    let scaled = differences(a, b).map_or_else(T::nan, |diffs| {
        diffs.fold(T::zero(), |acc, d| {
            let d = d / max_abs;
            acc + d * d
        })
    });
    max_abs * scaled.sqrt()
}

/// Manhattan (L1) distance.
#[must_use]
pub fn manhattan_distance<T, P>(a: &P, b: &P) -> T
where
    T: Float,
    P: AsRef<[T]> + ?Sized,
{
    differences(a.as_ref(), b.as_ref())
        .map_or_else(T::nan, |diffs| diffs.fold(T::zero(), |acc, d| acc + d.abs()))
}

/// Chebyshev (L∞) distance.
#[must_use]
pub fn chebyshev_distance<T, P>(a: &P, b: &P) -> T
where
    T: Float,
    P: AsRef<[T]> + ?Sized,
{
    differences(a.as_ref(), b.as_ref())
        .map_or_else(T::nan, |diffs| diffs.fold(T::zero(), |acc, d| nan_max(acc, d.abs())))
}
