//! Operation traits implemented by each runtime
//!
//! The harness only needs four statements, so the surface is small:
//!
//! - [`DenseOps`]: elementwise add, matrix-matrix and matrix-vector products
//! - [`SparseOps`]: CSR sparse matrix-vector product
//!
//! Operands are uploaded once during setup and then reused by every timed
//! repetition. Every operation returns a freshly allocated result, the same
//! way `C = A + B` allocates `C` on each call.

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::runtime::Runtime;
use crate::sparse::CsrMatrix;

/// Dense matrix resident on a runtime's device.
pub trait DeviceMatrix {
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// `[rows, cols]`
    fn shape(&self) -> [usize; 2] {
        [self.rows(), self.cols()]
    }
}

/// Dense vector resident on a runtime's device.
pub trait DeviceVector {
    /// Number of elements
    fn numel(&self) -> usize;
}

/// Dense linear-algebra operations.
pub trait DenseOps<R: Runtime> {
    /// Move a host matrix onto the device.
    fn upload_matrix(&self, host: Array2<f32>) -> Result<R::Matrix>;

    /// Move a host vector onto the device.
    fn upload_vector(&self, host: Array1<f32>) -> Result<R::Vector>;

    /// Elementwise `a + b`.
    fn add(&self, a: &R::Matrix, b: &R::Matrix) -> Result<R::Matrix>;

    /// Matrix product `a @ b`.
    fn matmul(&self, a: &R::Matrix, b: &R::Matrix) -> Result<R::Matrix>;

    /// Matrix-vector product `a @ x`.
    fn matvec(&self, a: &R::Matrix, x: &R::Vector) -> Result<R::Vector>;

    /// Copy a device matrix back to the host in row-major order.
    fn matrix_to_vec(&self, m: &R::Matrix) -> Result<Vec<f32>>;

    /// Copy a device vector back to the host.
    fn vector_to_vec(&self, v: &R::Vector) -> Result<Vec<f32>>;
}

/// Sparse linear-algebra operations.
pub trait SparseOps<R: Runtime> {
    /// Device representation of a CSR matrix
    type SparseMatrix;

    /// Move a host CSR matrix onto the device.
    fn upload_csr(&self, host: CsrMatrix) -> Result<Self::SparseMatrix>;

    /// Sparse matrix-vector product `a @ x`.
    fn spmv(&self, a: &Self::SparseMatrix, x: &R::Vector) -> Result<R::Vector>;
}

/// Validate operands of an elementwise binary operation.
pub fn validate_same_shape(a: [usize; 2], b: [usize; 2]) -> Result<()> {
    if a != b {
        return Err(Error::shape_mismatch(&a, &b));
    }
    Ok(())
}

/// Validate operands of `a @ b` and return the output shape `[m, n]`.
pub fn matmul_output_shape(a: [usize; 2], b: [usize; 2]) -> Result<[usize; 2]> {
    let [m, k] = a;
    let [kb, n] = b;
    if k != kb {
        return Err(Error::shape_mismatch(&[k], &[kb]));
    }
    Ok([m, n])
}

/// Validate operands of `a @ x` and return the output length.
pub fn matvec_output_len(a: [usize; 2], x_len: usize) -> Result<usize> {
    let [m, n] = a;
    if n != x_len {
        return Err(Error::shape_mismatch(&[n], &[x_len]));
    }
    Ok(m)
}

impl DeviceMatrix for Array2<f32> {
    fn rows(&self) -> usize {
        self.nrows()
    }

    fn cols(&self) -> usize {
        self.ncols()
    }
}

impl DeviceVector for Array1<f32> {
    fn numel(&self) -> usize {
        self.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matmul_output_shape() {
        assert_eq!(matmul_output_shape([2, 3], [3, 4]).unwrap(), [2, 4]);
        assert!(matmul_output_shape([2, 3], [2, 4]).is_err());
    }

    #[test]
    fn test_matmul_mismatch_reports_inner_dims() {
        match matmul_output_shape([2, 3], [5, 4]).unwrap_err() {
            Error::ShapeMismatch { expected, got } => {
                assert_eq!(expected, vec![3]);
                assert_eq!(got, vec![5]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matvec_output_len() {
        assert_eq!(matvec_output_len([5, 3], 3).unwrap(), 5);
        let err = matvec_output_len([5, 3], 4).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_validate_same_shape() {
        assert!(validate_same_shape([4, 4], [4, 4]).is_ok());
        assert!(validate_same_shape([4, 4], [4, 5]).is_err());
    }
}
