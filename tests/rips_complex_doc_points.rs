//! Rips complexes of the seven-point reference cloud in `tests/data/alphacomplexdoc.off`.
//!
//! At threshold 12.0 the Euclidean threshold graph has 11 edges. It contains five
//! triangles (`{0,1,2}`, `{0,1,3}`, `{0,2,3}`, `{1,2,3}`, `{4,5,6}`) and one
//! tetrahedron (`{0,1,2,3}`).

use approx::assert_relative_eq;
use vietoris::prelude::*;

const THRESHOLD: f64 = 12.0;

fn reference_points() -> Vec<Vec<f64>> {
    read_off_points_from_path(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/data/alphacomplexdoc.off"
    ))
    .unwrap()
}

fn build(max_dimension: usize) -> (Vec<Vec<f64>>, SimplexTree<f64>) {
    let points = reference_points();
    let rips = RipsComplex::new(&points, THRESHOLD, euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, max_dimension));
    (points, st)
}

fn filtration_of(st: &SimplexTree<f64>, vertices: &[VertexHandle]) -> f64 {
    let key = st
        .find(vertices)
        .unwrap_or_else(|| panic!("simplex {vertices:?} should be present"));
    st.filtration(key).unwrap()
}

// =============================================================================
// DIMENSION 1
// =============================================================================

#[test]
fn test_one_skeleton() {
    let (points, st) = build(1);
    assert_eq!(st.dimension(), Some(1));
    assert_eq!(st.num_vertices(), 7);
    assert_eq!(st.num_simplices(), 18);

    for key in st.skeleton_simplex_range(0) {
        assert_eq!(st.filtration(key), Some(0.0));
    }

    let mut edges = 0;
    for key in st.skeleton_simplex_range(1) {
        if st.simplex_dimension(key) != Some(1) {
            continue;
        }
        edges += 1;
        let vertices: Vec<VertexHandle> = st.simplex_vertex_range(key).collect();
        assert_eq!(vertices.len(), 2);
        let expected = euclidean_distance(&points[vertices[0]], &points[vertices[1]]);
        assert_relative_eq!(st.filtration(key).unwrap(), expected, epsilon = 1e-12);
    }
    assert_eq!(edges, 11);
}

#[test]
fn test_edges_match_threshold_graph() {
    let points = reference_points();
    let rips = RipsComplex::new(&points, THRESHOLD, euclidean_distance);
    let pairs: Vec<(VertexHandle, VertexHandle)> =
        rips.graph().edges().iter().map(|e| (e.u, e.v)).collect();
    assert_eq!(
        pairs,
        vec![
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 2),
            (1, 3),
            (2, 3),
            (2, 4),
            (3, 6),
            (4, 5),
            (4, 6),
            (5, 6),
        ]
    );
    assert_relative_eq!(rips.graph().edge_weight(3, 6).unwrap(), 11.0);
}

// =============================================================================
// DIMENSION 2
// =============================================================================

#[test]
fn test_two_skeleton() {
    let (_, st) = build(2);
    assert_eq!(st.dimension(), Some(2));
    assert_eq!(st.num_vertices(), 7);
    assert_eq!(st.num_simplices(), 23);

    for (triangle, edges) in [
        ([0, 1, 2], [[0, 1], [0, 2], [1, 2]]),
        ([4, 5, 6], [[4, 5], [5, 6], [4, 6]]),
    ] {
        let expected = edges
            .iter()
            .map(|edge| filtration_of(&st, edge))
            .fold(f64::NEG_INFINITY, f64::max);
        assert_relative_eq!(filtration_of(&st, &triangle), expected);
    }

    assert!(st.find(&[0, 1, 2, 3]).is_none());
    assert!(st.find(&[2, 3, 4]).is_none());
}

// =============================================================================
// DIMENSION 3
// =============================================================================

#[test]
fn test_three_skeleton() {
    let (_, st) = build(3);
    assert_eq!(st.dimension(), Some(3));
    assert_eq!(st.num_vertices(), 7);
    assert_eq!(st.num_simplices(), 24);

    let expected = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]]
        .iter()
        .map(|triangle| filtration_of(&st, triangle))
        .fold(f64::NEG_INFINITY, f64::max);
    assert_relative_eq!(filtration_of(&st, &[0, 1, 2, 3]), expected);
}

#[test]
fn test_higher_max_dimension_stops_early() {
    let (_, st) = build(6);
    assert_eq!(st.dimension(), Some(3));
    assert_eq!(st.num_simplices(), 24);
    assert_eq!(count_simplices(&st), FVector { by_dim: vec![7, 11, 5, 1] });
    assert!(st.validate().is_ok());
}

#[test]
fn test_filtration_order_is_monotone_and_faces_first() {
    let (_, st) = build(3);
    let order: Vec<NodeKey> = st.filtration_simplex_range().collect();
    assert_eq!(order.len(), st.num_simplices());

    let position = |key: NodeKey| order.iter().position(|&k| k == key).unwrap();
    for (index, &key) in order.iter().enumerate() {
        for facet in st.boundary_simplex_range(key) {
            assert!(position(facet) < index);
        }
        if index > 0 {
            assert!(st.filtration(order[index - 1]) <= st.filtration(key));
        }
    }
}
