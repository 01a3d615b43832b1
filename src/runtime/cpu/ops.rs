//! Dense and sparse operations for the CPU runtime

use ndarray::{Array1, Array2};

use super::{CpuClient, CpuRuntime};
use crate::error::Result;
use crate::ops::{
    DenseOps, DeviceMatrix, DeviceVector, SparseOps, matmul_output_shape, matvec_output_len,
    validate_same_shape,
};
use crate::sparse::CsrMatrix;

impl DenseOps<CpuRuntime> for CpuClient {
    fn upload_matrix(&self, host: Array2<f32>) -> Result<Array2<f32>> {
        Ok(host)
    }

    fn upload_vector(&self, host: Array1<f32>) -> Result<Array1<f32>> {
        Ok(host)
    }

    fn add(&self, a: &Array2<f32>, b: &Array2<f32>) -> Result<Array2<f32>> {
        validate_same_shape(DeviceMatrix::shape(a), DeviceMatrix::shape(b))?;
        Ok(a + b)
    }

    fn matmul(&self, a: &Array2<f32>, b: &Array2<f32>) -> Result<Array2<f32>> {
        matmul_output_shape(DeviceMatrix::shape(a), DeviceMatrix::shape(b))?;
        Ok(a.dot(b))
    }

    fn matvec(&self, a: &Array2<f32>, x: &Array1<f32>) -> Result<Array1<f32>> {
        matvec_output_len(DeviceMatrix::shape(a), x.numel())?;
        Ok(a.dot(x))
    }

    fn matrix_to_vec(&self, m: &Array2<f32>) -> Result<Vec<f32>> {
        Ok(m.iter().copied().collect())
    }

    fn vector_to_vec(&self, v: &Array1<f32>) -> Result<Vec<f32>> {
        Ok(v.to_vec())
    }
}

impl SparseOps<CpuRuntime> for CpuClient {
    type SparseMatrix = CsrMatrix;

    fn upload_csr(&self, host: CsrMatrix) -> Result<CsrMatrix> {
        Ok(host)
    }

    fn spmv(&self, a: &CsrMatrix, x: &Array1<f32>) -> Result<Array1<f32>> {
        let y = match x.as_slice() {
            Some(x) => a.spmv(x)?,
            None => a.spmv(&x.to_vec())?,
        };
        Ok(Array1::from_vec(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::runtime::cpu::CpuDevice;
    use ndarray::array;

    fn client() -> CpuClient {
        CpuClient::new(CpuDevice::new())
    }

    #[test]
    fn test_add() {
        let c = client();
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];
        let b = array![[10.0f32, 20.0], [30.0, 40.0]];
        let out = c.add(&a, &b).unwrap();
        assert_eq!(c.matrix_to_vec(&out).unwrap(), vec![11.0, 22.0, 33.0, 44.0]);
    }

    #[test]
    fn test_add_shape_mismatch() {
        let c = client();
        let a = Array2::<f32>::zeros((2, 2));
        let b = Array2::<f32>::zeros((2, 3));
        assert!(matches!(c.add(&a, &b), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn test_matmul() {
        let c = client();
        let a = array![[1.0f32, 2.0], [3.0, 4.0]];
        let b = array![[5.0f32, 6.0], [7.0, 8.0]];
        let out = c.matmul(&a, &b).unwrap();
        assert_eq!(c.matrix_to_vec(&out).unwrap(), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_matvec() {
        let c = client();
        let a = array![[1.0f32, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let x = array![1.0f32, 0.0, -1.0];
        let y = c.matvec(&a, &x).unwrap();
        assert_eq!(c.vector_to_vec(&y).unwrap(), vec![-2.0, -2.0]);
    }

    #[test]
    fn test_matvec_shape_mismatch() {
        let c = client();
        let a = Array2::<f32>::zeros((2, 3));
        let x = Array1::<f32>::zeros(2);
        assert!(c.matvec(&a, &x).is_err());
    }

    #[test]
    fn test_spmv() {
        let c = client();
        let csr = CsrMatrix::new([2, 2], vec![0, 1, 2], vec![1, 0], vec![2.0, 3.0]).unwrap();
        let a = c.upload_csr(csr).unwrap();
        let y = c.spmv(&a, &array![1.0f32, 4.0]).unwrap();
        assert_eq!(y.to_vec(), vec![8.0, 3.0]);
    }
}
