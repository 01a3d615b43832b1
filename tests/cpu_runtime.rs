//! CPU runtime dense operations

mod common;

use common::{assert_allclose_f32, create_cpu_client, pattern};
use ndarray::{Array1, Array2};
use numbench::error::Error;
use numbench::ops::DenseOps;

fn reference_matmul(a: &[f32], b: &[f32], m: usize, k: usize, n: usize) -> Vec<f32> {
    let mut c = vec![0.0f32; m * n];
    for i in 0..m {
        for j in 0..n {
            c[i * n + j] = (0..k).map(|p| a[i * k + p] * b[p * n + j]).sum();
        }
    }
    c
}

#[test]
fn test_add_matches_elementwise_sum() {
    let client = create_cpu_client();
    let (a, b) = (pattern(64, 1), pattern(64, 2));
    let am = client
        .upload_matrix(Array2::from_shape_vec((8, 8), a.clone()).unwrap())
        .unwrap();
    let bm = client
        .upload_matrix(Array2::from_shape_vec((8, 8), b.clone()).unwrap())
        .unwrap();

    let c = client.add(&am, &bm).unwrap();
    let expected: Vec<f32> = a.iter().zip(&b).map(|(x, y)| x + y).collect();
    assert_eq!(client.matrix_to_vec(&c).unwrap(), expected);
}

#[test]
fn test_matmul_rectangular() {
    let client = create_cpu_client();
    let (m, k, n) = (5, 7, 3);
    let (a, b) = (pattern(m * k, 3), pattern(k * n, 4));
    let am = Array2::from_shape_vec((m, k), a.clone()).unwrap();
    let bm = Array2::from_shape_vec((k, n), b.clone()).unwrap();

    let c = client.matmul(&am, &bm).unwrap();
    assert_allclose_f32(
        &client.matrix_to_vec(&c).unwrap(),
        &reference_matmul(&a, &b, m, k, n),
        1e-5,
        1e-6,
        "cpu matmul",
    );
}

#[test]
fn test_matmul_inner_dimension_mismatch() {
    let client = create_cpu_client();
    let a = Array2::<f32>::zeros((4, 3));
    let b = Array2::<f32>::zeros((4, 3));
    assert!(matches!(
        client.matmul(&a, &b),
        Err(Error::ShapeMismatch { .. })
    ));
}

#[test]
fn test_matvec() {
    let client = create_cpu_client();
    let (m, n) = (6, 9);
    let (a, x) = (pattern(m * n, 5), pattern(n, 6));
    let am = Array2::from_shape_vec((m, n), a.clone()).unwrap();
    let xv = Array1::from_vec(x.clone());

    let y = client.matvec(&am, &xv).unwrap();
    assert_allclose_f32(
        &client.vector_to_vec(&y).unwrap(),
        &reference_matmul(&a, &x, m, n, 1),
        1e-5,
        1e-6,
        "cpu matvec",
    );
}
