//! Sparse formats and CPU SpMV

mod common;

use common::{assert_allclose_f32, create_cpu_client};
use ndarray::Array1;
use numbench::bench::data::HostData;
use numbench::error::Error;
use numbench::ops::SparseOps;
use numbench::sparse::{CooMatrix, CsrMatrix};

fn dense_spmv(coo: &CooMatrix, x: &[f32]) -> Vec<f32> {
    let mut y = vec![0.0f32; coo.shape()[0]];
    for ((&r, &c), &v) in coo
        .row_indices()
        .iter()
        .zip(coo.col_indices())
        .zip(coo.values())
    {
        y[r] += v * x[c];
    }
    y
}

#[test]
fn test_coo_to_csr_sorts_rows() {
    let coo = CooMatrix::new(
        [3, 3],
        vec![2, 0, 1, 0],
        vec![1, 2, 0, 0],
        vec![4.0, 2.0, 3.0, 1.0],
    )
    .unwrap();
    let csr = coo.to_csr().unwrap();
    assert_eq!(csr.row_ptrs(), &[0, 2, 3, 4]);
    assert_eq!(csr.col_indices(), &[0, 2, 0, 1]);
    assert_eq!(csr.values(), &[1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_duplicate_entries_are_summed() {
    let coo = CooMatrix::new([2, 2], vec![0, 0], vec![1, 1], vec![1.5, 2.5]).unwrap();
    let csr = coo.to_csr().unwrap();
    assert_eq!(csr.nnz(), 2);
    assert_eq!(csr.spmv(&[0.0, 2.0]).unwrap(), vec![8.0, 0.0]);
}

#[test]
fn test_coo_rejects_out_of_bounds() {
    let err = CooMatrix::new([2, 2], vec![2], vec![0], vec![1.0]).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "row_indices", .. }));
}

#[test]
fn test_random_matrix_spmv_matches_dense_reference() {
    let mut data = HostData::new(Some(11));
    let coo = data.sparse(300, 0.05).unwrap();
    let x = data.vector(300).unwrap();

    let client = create_cpu_client();
    let a = client.upload_csr(coo.to_csr().unwrap()).unwrap();
    let y = client.spmv(&a, &x).unwrap();

    assert_allclose_f32(
        &y.to_vec(),
        &dense_spmv(&coo, x.as_slice().unwrap()),
        1e-5,
        1e-5,
        "cpu spmv",
    );
}

#[test]
fn test_spmv_vector_length_mismatch() {
    let client = create_cpu_client();
    let csr = CsrMatrix::new([2, 3], vec![0, 1, 1], vec![2], vec![1.0]).unwrap();
    let a = client.upload_csr(csr).unwrap();
    let x = Array1::<f32>::zeros(2);
    assert!(matches!(
        client.spmv(&a, &x),
        Err(Error::ShapeMismatch { .. })
    ));
}
