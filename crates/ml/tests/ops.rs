use ml::{Dense, Graph, Tensor, TensorStore};

fn close(a: &[f32], b: &[f32]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (*x - *y).abs() < 1e-5)
}

#[test]
fn dense_forward_known_case() {
    let w = vec![1.0, 0.5, -1.0,
                 2.0, 0.2, 0.2];
    let b = vec![0.1, -0.1];
    let dense = Dense::new(w, b, 3, 2);
    let x = Tensor::from_vec(vec![1, 3], vec![1.0, 2.0, 3.0]);
    let mut tensors = TensorStore::new();
    let y = dense.forward(&x, &mut Graph::new(), &mut tensors);
    assert_eq!(y.shape, vec![1, 2]);
    assert!(close(y.data(), &[1.0 + 1.0 - 3.0 + 0.1, 2.0 + 0.4 + 0.6 - 0.1]));
}

#[test]
fn dense_forward_batches_rows_independently() {
    let dense = Dense::new(vec![1.0, -1.0], vec![0.5], 2, 1);
    let x = Tensor::from_vec(vec![3, 2], vec![1.0, 0.0, 0.0, 1.0, 2.0, 2.0]);
    let mut tensors = TensorStore::new();
    let y = dense.forward(&x, &mut Graph::new(), &mut tensors);
    assert_eq!(y.shape, vec![3, 1]);
    assert!(close(y.data(), &[1.5, -0.5, 0.5]));
}

#[test]
fn dense_random_respects_glorot_limit() {
    let mut rng = fastrand::Rng::with_seed(7);
    let dense = Dense::random(36, 36, &mut rng);
    let limit = (6.0f32 / 72.0).sqrt();
    assert_eq!(dense.w.shape, vec![36, 36]);
    assert!(dense.w.data.iter().all(|w| w.abs() <= limit));
    assert!(dense.b.data.iter().all(|&b| b == 0.0));
    assert!(dense.w.requires_grad && dense.b.requires_grad);
}

#[test]
fn activations_forward() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();
    let x = Tensor::from_vec(vec![3], vec![-1.0, 0.0, 2.0]);

    assert!(close(x.relu(&mut g, &mut tensors).data(), &[0.0, 0.0, 2.0]));
    assert!(close(
        x.tanh(&mut g, &mut tensors).data(),
        &[(-1.0f32).tanh(), 0.0, 2.0f32.tanh()]
    ));
    let sp: Vec<f32> = [-1.0f32, 0.0, 2.0].iter().map(|v| (1.0 + v.exp()).ln()).collect();
    assert!(close(x.softplus(&mut g, &mut tensors).data(), &sp));
    assert!(close(x.square(&mut g, &mut tensors).data(), &[1.0, 0.0, 4.0]));
    assert!(close(x.clamp(-0.5, 1.0, &mut g, &mut tensors).data(), &[-0.5, 0.0, 1.0]));
}

#[test]
fn softplus_is_stable_for_large_inputs() {
    let mut tensors = TensorStore::new();
    let x = Tensor::from_vec(vec![2], vec![200.0, -200.0]);
    let y = x.softplus(&mut Graph::new(), &mut tensors);
    assert!((y.data[0] - 200.0).abs() < 1e-3);
    assert!(y.data[1] >= 0.0 && y.data[1] < 1e-6);
}

#[test]
fn scalar_ops_and_reductions() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();
    let x = Tensor::from_vec(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]);
    assert!(close(x.add_scalar(0.5, &mut g, &mut tensors).data(), &[1.5, 2.5, 3.5, 4.5]));
    assert!(close(x.mul_scalar(-2.0, &mut g, &mut tensors).data(), &[-2.0, -4.0, -6.0, -8.0]));
    assert!(close(x.reduce_sum(&mut g, &mut tensors).data(), &[10.0]));
    assert!(close(x.reduce_mean(&mut g, &mut tensors).data(), &[2.5]));
}

#[test]
fn ops_register_inputs_and_outputs_in_store() {
    let mut g = Graph::new();
    let mut tensors = TensorStore::new();
    let a = Tensor::from_vec(vec![2], vec![1.0, 2.0]);
    let b = Tensor::from_vec(vec![2], vec![3.0, 4.0]);
    let c = a.div(&b, &mut g, &mut tensors);
    assert!(tensors.contains_key(&a.id));
    assert!(tensors.contains_key(&b.id));
    assert!(tensors.contains_key(&c.id));
    assert_eq!(g_len(&g), 1);
}

fn g_len(g: &Graph) -> usize {
    use ml::Recorder;
    g.nodes().len()
}

#[test]
#[should_panic]
fn elementwise_shape_mismatch_panics() {
    let mut tensors = TensorStore::new();
    let a = Tensor::from_vec(vec![2], vec![1.0, 2.0]);
    let b = Tensor::from_vec(vec![3], vec![1.0, 2.0, 3.0]);
    let _ = a.add(&b, &mut Graph::new(), &mut tensors);
}
