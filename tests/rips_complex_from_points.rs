//! Rips complexes of explicit point lists, custom distances, and distance matrices.

use approx::assert_relative_eq;
use vietoris::prelude::*;

/// The four unit basis vectors of R⁴: pairwise squared distance 2.
fn basis_simplex() -> Vec<Vec<f64>> {
    (0..4)
        .map(|i| (0..4).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
        .collect()
}

#[test]
fn test_regular_simplex_with_squared_distance() {
    let points = basis_simplex();
    let rips = RipsComplex::new(&points, 2.0, squared_euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 3));

    assert_eq!(st.num_simplices(), 15);
    assert_eq!(st.dimension(), Some(3));
    assert_eq!(st.num_vertices(), 4);

    for key in st.complex_simplex_range() {
        let filtration = st.filtration(key).unwrap();
        if st.simplex_dimension(key) == Some(0) {
            assert_eq!(filtration, 0.0);
        } else {
            assert_relative_eq!(filtration, 2.0);
        }
    }
}

#[test]
fn test_threshold_just_below_excludes_everything() {
    let points = basis_simplex();
    let rips = RipsComplex::new(&points, 1.999, squared_euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 3));
    assert_eq!(st.num_simplices(), 4);
    assert_eq!(st.dimension(), Some(0));
}

#[test]
fn test_non_empty_tree_yields_false() {
    let points = basis_simplex();
    let rips = RipsComplex::new(&points, 2.0, squared_euclidean_distance);

    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 3));
    assert!(!rips.create_complex(&mut st, 3));
    assert_eq!(st.num_simplices(), 15);

    let mut other = SimplexTree::new();
    other.insert_simplex(&[0, 1], 0.5).unwrap();
    assert!(matches!(
        rips.try_create_complex(&mut other, 1),
        Err(RipsComplexError::NonEmptyTree { num_simplices: 3 })
    ));
}

#[test]
fn test_points_of_different_dimension_are_refused() {
    let points = vec![vec![0.0, 0.0], vec![1.0], vec![0.0, 1.0]];
    let rips = RipsComplex::new(&points, 5.0, euclidean_distance);
    assert_eq!(rips.graph().non_comparable_pairs(), &[(0, 1), (1, 2)]);

    let mut st = SimplexTree::new();
    assert!(!rips.create_complex(&mut st, 2));
    assert!(st.is_empty());
    assert_eq!(
        rips.try_create_complex(&mut st, 2),
        Err(RipsComplexError::NonComparableDistance { u: 0, v: 1 })
    );
}

#[test]
fn test_nan_coordinate_is_refused() {
    let points = vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![f64::NAN, 0.0]];
    let distances: [fn(&Vec<f64>, &Vec<f64>) -> f64; 4] = [
        euclidean_distance,
        squared_euclidean_distance,
        manhattan_distance,
        chebyshev_distance,
    ];
    for distance in distances {
        let rips = RipsComplex::new(&points, 5.0, distance);
        let mut st = SimplexTree::new();
        assert!(!rips.create_complex(&mut st, 2));
        assert!(st.is_empty());
        assert!(matches!(
            rips.try_create_complex(&mut st, 2),
            Err(RipsComplexError::NonComparableDistance { u: 0, v: 2 })
        ));
    }
}

#[test]
fn test_max_dimension_zero_yields_one_skeleton() {
    let points = basis_simplex();
    let rips = RipsComplex::new(&points, 2.0, squared_euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 0));
    assert_eq!(st.num_simplices(), 10);
    assert_eq!(st.dimension(), Some(1));
}

#[test]
fn test_zero_threshold_and_duplicate_points() {
    let points = vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![2.0, 2.0]];
    let rips = RipsComplex::new(&points, 0.0, euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 2));

    assert_eq!(st.num_simplices(), 4);
    assert_eq!(st.filtration(st.find(&[0, 1]).unwrap()), Some(0.0));
}

#[test]
fn test_custom_point_type_and_distance() {
    // Points on a circle of circumference 12, distance along the arc.
    let angles: Vec<u32> = vec![0, 3, 6, 9];
    let arc = |a: &u32, b: &u32| {
        let d = a.abs_diff(*b);
        f64::from(d.min(12 - d))
    };
    let rips = RipsComplex::new(&angles, 3.0, arc);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 2));

    // A square: four edges, no diagonals, no triangles.
    assert_eq!(rips.graph().num_edges(), 4);
    assert_eq!(st.dimension(), Some(1));
    assert_eq!(euler_characteristic(&count_simplices(&st)), 0);
}

#[test]
fn test_f32_filtration_values() {
    let points: Vec<[f32; 2]> = vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
    let rips = RipsComplex::new(&points, 2.0_f32, euclidean_distance);
    let mut st: SimplexTree<f32> = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 2));
    assert_relative_eq!(
        st.filtration(st.find(&[0, 1, 2]).unwrap()).unwrap(),
        2.0_f32.sqrt()
    );
}

#[test]
fn test_lower_triangular_distance_matrix() {
    let matrix: Vec<Vec<f64>> = vec![
        vec![],
        vec![1.0],
        vec![1.0, 1.0],
        vec![3.0, 1.0, 2.0],
    ];
    let rips = RipsComplex::from_distance_matrix(&matrix, 2.0).unwrap();
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 3));

    assert_eq!(rips.graph().num_vertices(), 4);
    assert_eq!(rips.graph().num_edges(), 5);
    assert_eq!(st.filtration(st.find(&[1, 2, 3]).unwrap()), Some(2.0));
    assert_eq!(st.filtration(st.find(&[0, 1, 2]).unwrap()), Some(1.0));
    assert!(st.find(&[0, 3]).is_none());
    assert_eq!(st.dimension(), Some(2));
}

#[test]
fn test_builder_with_threshold() {
    let points = basis_simplex();
    let rips = RipsComplex::builder(&points)
        .threshold(2.0)
        .build(squared_euclidean_distance);
    assert_relative_eq!(rips.threshold(), 2.0);
    assert_eq!(rips.graph().num_edges(), 6);
}
