//! WebGPU results against the CPU runtime
#![cfg(feature = "wgpu")]

mod common;

use common::{assert_allclose_f32, create_cpu_client, create_wgpu_client, pattern};
use ndarray::{Array1, Array2};
use numbench::bench::data::HostData;
use numbench::ops::{DenseOps, SparseOps};
use numbench::runtime::RuntimeClient;

fn matrix(rows: usize, cols: usize, salt: usize) -> Array2<f32> {
    Array2::from_shape_vec((rows, cols), pattern(rows * cols, salt)).unwrap()
}

#[test]
fn test_add_parity() {
    let Some(gpu) = create_wgpu_client() else {
        println!("No GPU available, skipping test");
        return;
    };
    let cpu = create_cpu_client();
    let (a, b) = (matrix(33, 47, 1), matrix(33, 47, 2));

    let expected = cpu.matrix_to_vec(&cpu.add(&a, &b).unwrap()).unwrap();
    let ga = gpu.upload_matrix(a).unwrap();
    let gb = gpu.upload_matrix(b).unwrap();
    let gc = gpu.add(&ga, &gb).unwrap();
    gpu.synchronize().unwrap();

    assert_allclose_f32(&gpu.matrix_to_vec(&gc).unwrap(), &expected, 1e-6, 1e-7, "add");
}

#[test]
fn test_matmul_parity_non_tile_multiple() {
    let Some(gpu) = create_wgpu_client() else {
        println!("No GPU available, skipping test");
        return;
    };
    let cpu = create_cpu_client();
    let (a, b) = (matrix(37, 21, 3), matrix(21, 50, 4));

    let expected = cpu.matrix_to_vec(&cpu.matmul(&a, &b).unwrap()).unwrap();
    let gc = gpu
        .matmul(&gpu.upload_matrix(a).unwrap(), &gpu.upload_matrix(b).unwrap())
        .unwrap();

    assert_allclose_f32(&gpu.matrix_to_vec(&gc).unwrap(), &expected, 1e-4, 1e-5, "matmul");
}

#[test]
fn test_matvec_parity() {
    let Some(gpu) = create_wgpu_client() else {
        println!("No GPU available, skipping test");
        return;
    };
    let cpu = create_cpu_client();
    let a = matrix(300, 513, 5);
    let x = Array1::from_vec(pattern(513, 6));

    let expected = cpu.vector_to_vec(&cpu.matvec(&a, &x).unwrap()).unwrap();
    let gy = gpu
        .matvec(&gpu.upload_matrix(a).unwrap(), &gpu.upload_vector(x).unwrap())
        .unwrap();

    assert_allclose_f32(&gpu.vector_to_vec(&gy).unwrap(), &expected, 1e-4, 1e-4, "matvec");
}

#[test]
fn test_spmv_parity() {
    let Some(gpu) = create_wgpu_client() else {
        println!("No GPU available, skipping test");
        return;
    };
    let cpu = create_cpu_client();
    let mut data = HostData::new(Some(21));
    let csr = data.sparse(1000, 0.01).unwrap().to_csr().unwrap();
    let x = data.vector(1000).unwrap();

    let expected = cpu
        .spmv(&cpu.upload_csr(csr.clone()).unwrap(), &x)
        .unwrap()
        .to_vec();
    let gy = gpu
        .spmv(&gpu.upload_csr(csr).unwrap(), &gpu.upload_vector(x).unwrap())
        .unwrap();

    assert_allclose_f32(&gpu.vector_to_vec(&gy).unwrap(), &expected, 1e-4, 1e-5, "spmv");
}
