//! Random point cloud generation.
//!
//! Point clouds are `Vec<Vec<T>>` with a runtime dimension, the same shape the
//! [OFF reader](crate::io::off) produces, so they feed straight into
//! [`RipsComplex::new`](crate::core::rips_complex::RipsComplex::new).

use std::cmp::Ordering;

use num_traits::Float;
use rand::Rng;
use rand::distr::uniform::SampleUniform;
use thiserror::Error;

/// Errors that can occur during random point generation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RandomPointGenerationError {
    /// The coordinate range is empty or not ordered.
    #[error("Invalid coordinate range: minimum {min} must be less than maximum {max}")]
    InvalidRange {
        /// Debug representation of the lower bound.
        min: String,
        /// Debug representation of the upper bound.
        max: String,
    },
}

/// Generates `n_points` points in `dimension`-dimensional space with coordinates drawn
/// uniformly from `[range.0, range.1)`.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] unless `range.0 < range.1`.
///
/// # Examples
///
/// ```
/// use vietoris::geometry::point_generation::generate_random_point_cloud;
///
/// let points = generate_random_point_cloud::<f64>(100, 3, (-10.0, 10.0)).unwrap();
/// assert_eq!(points.len(), 100);
/// assert!(points.iter().all(|p| p.len() == 3));
///
/// assert!(generate_random_point_cloud::<f64>(10, 2, (1.0, 1.0)).is_err());
/// ```
pub fn generate_random_point_cloud<T>(
    n_points: usize,
    dimension: usize,
    range: (T, T),
) -> Result<Vec<Vec<T>>, RandomPointGenerationError>
where
    T: Float + SampleUniform + std::fmt::Debug,
{
    validate_range(range)?;
    Ok(sample_points(&mut rand::rng(), n_points, dimension, range))
}

/// Seeded variant of [`generate_random_point_cloud`]; the same seed always yields the same
/// cloud.
///
/// # Errors
///
/// Returns [`RandomPointGenerationError::InvalidRange`] unless `range.0 < range.1`.
///
/// # Examples
///
/// ```
/// use vietoris::geometry::point_generation::generate_random_point_cloud_seeded;
///
/// let a = generate_random_point_cloud_seeded::<f64>(20, 4, (0.0, 1.0), 42).unwrap();
/// let b = generate_random_point_cloud_seeded::<f64>(20, 4, (0.0, 1.0), 42).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn generate_random_point_cloud_seeded<T>(
    n_points: usize,
    dimension: usize,
    range: (T, T),
    seed: u64,
) -> Result<Vec<Vec<T>>, RandomPointGenerationError>
where
    T: Float + SampleUniform + std::fmt::Debug,
{
    use rand::SeedableRng;

    validate_range(range)?;
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    Ok(sample_points(&mut rng, n_points, dimension, range))
}

fn validate_range<T>(range: (T, T)) -> Result<(), RandomPointGenerationError>
where
    T: Float + std::fmt::Debug,
{
    // NaN bounds compare as `None` and are rejected too.
    if range.0.partial_cmp(&range.1) != Some(Ordering::Less) {
        return Err(RandomPointGenerationError::InvalidRange {
            min: format!("{:?}", range.0),
            max: format!("{:?}", range.1),
        });
    }
    Ok(())
}

fn sample_points<T, R>(rng: &mut R, n_points: usize, dimension: usize, range: (T, T)) -> Vec<Vec<T>>
where
    T: Float + SampleUniform,
    R: Rng,
{
    (0..n_points)
        .map(|_| {
            (0..dimension)
                .map(|_| rng.random_range(range.0..range.1))
                .collect()
        })
        .collect()
}
