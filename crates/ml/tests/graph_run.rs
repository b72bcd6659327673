use ml::{Graph, MlError, Tensor, TensorStore};

#[test]
fn graph_run_matches_eager_results() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();

    let a = Tensor::from_vec(vec![3], vec![1.0, 2.0, 3.0]);
    let b = Tensor::from_vec(vec![3], vec![4.0, 5.0, 6.0]);

    let c = a.add(&b, &mut g, &mut tensors);
    let d = c.mul(&b, &mut g, &mut tensors);
    let e = d.softplus(&mut g, &mut tensors).reduce_sum(&mut g, &mut tensors);

    let expected_c = c.data.clone();
    let expected_d = d.data.clone();
    let expected_e = e.data.clone();

    for id in [c.id, d.id, e.id] {
        tensors.get_mut(&id).unwrap().data.fill(0.0);
    }

    g.run(&mut tensors).unwrap();

    assert_eq!(tensors[&c.id].data, expected_c);
    assert_eq!(tensors[&d.id].data, expected_d);
    assert_eq!(tensors[&e.id].data, expected_e);
}

#[test]
fn graph_run_picks_up_changed_inputs() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();
    let a = Tensor::from_vec(vec![2], vec![-1.0, 1.0]);
    let b = a.relu(&mut g, &mut tensors);

    tensors.get_mut(&a.id).unwrap().data = vec![3.0, -3.0];
    g.run(&mut tensors).unwrap();

    assert_eq!(tensors[&b.id].data, vec![3.0, 0.0]);
}

#[test]
fn graph_run_reports_missing_tensor() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();
    let a = Tensor::from_vec(vec![1], vec![1.0]);
    let _ = a.exp(&mut g, &mut tensors);
    tensors.remove(&a.id);

    let err = g.run(&mut tensors).unwrap_err();
    assert!(matches!(err, MlError::MissingTensor(id) if id == a.id));
}
