//! Serde round trips of simplex trees through JSON.

use vietoris::prelude::*;

#[test]
fn test_json_layout_is_filtration_ordered() {
    let mut st = SimplexTree::new();
    st.insert_simplex(&[0, 1], 2.5).unwrap();
    st.insert_simplex(&[2], 0.0).unwrap();

    let json = serde_json::to_value(&st).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "vertices": [0], "filtration": 0.0 },
            { "vertices": [1], "filtration": 0.0 },
            { "vertices": [2], "filtration": 0.0 },
            { "vertices": [0, 1], "filtration": 2.5 },
        ])
    );
}

#[test]
fn test_rips_complex_survives_round_trip() {
    let points = vec![
        vec![0.0, 0.0],
        vec![1.0, 0.0],
        vec![0.0, 1.0],
        vec![1.0, 1.0],
        vec![4.0, 4.0],
    ];
    let rips = RipsComplex::new(&points, 1.5, euclidean_distance);
    let mut st = SimplexTree::new();
    assert!(rips.create_complex(&mut st, 3));

    let json = serde_json::to_string(&st).unwrap();
    let restored: SimplexTree<f64> = serde_json::from_str(&json).unwrap();

    assert_eq!(restored, st);
    assert_eq!(restored.dimension(), st.dimension());
    assert!(restored.validate().is_ok());
}

#[test]
fn test_deserialization_keeps_face_values_from_any_record_order() {
    // Cofaces listed before their faces must not overwrite the faces' values.
    let json = r#"[
        { "vertices": [0, 1], "filtration": 3.0 },
        { "vertices": [1], "filtration": 0.5 },
        { "vertices": [0], "filtration": 0.25 }
    ]"#;
    let st: SimplexTree<f64> = serde_json::from_str(json).unwrap();
    assert_eq!(st.filtration(st.find(&[0]).unwrap()), Some(0.25));
    assert_eq!(st.filtration(st.find(&[1]).unwrap()), Some(0.5));
    assert_eq!(st.filtration(st.find(&[0, 1]).unwrap()), Some(3.0));
}

#[test]
fn test_deserialization_rejects_empty_simplex() {
    let json = r#"[{ "vertices": [], "filtration": 1.0 }]"#;
    assert!(serde_json::from_str::<SimplexTree<f64>>(json).is_err());
}

#[test]
fn test_weighted_edges_serialize() {
    let points = vec![vec![0.0], vec![2.0]];
    let rips = RipsComplex::new(&points, 5.0, euclidean_distance);
    let json = serde_json::to_string(rips.graph().edges()).unwrap();
    let edges: Vec<WeightedEdge<f64>> = serde_json::from_str(&json).unwrap();
    assert_eq!(edges, vec![WeightedEdge { u: 0, v: 1, weight: 2.0 }]);
}
