//! Dense operations for the CUDA runtime
//!
//! Addition is a hand-written kernel; GEMM and GEMV go through cuBLAS. No
//! sparse operations: the CUDA platform only times dense statements.

use cudarc::cublas::sys::cublasOperation_t;
use cudarc::cublas::{Gemm, GemmConfig, Gemv, GemvConfig};
use ndarray::{Array1, Array2};

use super::client::CudaClient;
use super::device::CudaError;
use super::kernels::launch_add;
use super::runtime::CudaRuntime;
use super::storage::{CudaMatrix, CudaVector};
use crate::error::{Error, Result};
use crate::ops::{
    DenseOps, DeviceMatrix, DeviceVector, matmul_output_shape, matvec_output_len,
    validate_same_shape,
};

/// cuBLAS takes i32 dimensions.
fn to_i32(value: usize, op: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        Error::backend_limitation("cuda", op, format!("{} does not fit in an i32", value))
    })
}

impl DenseOps<CudaRuntime> for CudaClient {
    fn upload_matrix(&self, host: Array2<f32>) -> Result<CudaMatrix> {
        let [rows, cols] = DeviceMatrix::shape(&host);
        let data = match host.as_slice() {
            Some(data) => self.upload(data)?,
            None => self.upload(&host.iter().copied().collect::<Vec<_>>())?,
        };
        Ok(CudaMatrix { data, rows, cols })
    }

    fn upload_vector(&self, host: Array1<f32>) -> Result<CudaVector> {
        let len = host.len();
        let data = self.upload(&host.to_vec())?;
        Ok(CudaVector { data, len })
    }

    fn add(&self, a: &CudaMatrix, b: &CudaMatrix) -> Result<CudaMatrix> {
        validate_same_shape(a.shape(), b.shape())?;
        let numel = a.rows * a.cols;
        let mut out = self.alloc_f32(numel)?;
        launch_add(
            &self.context,
            &self.stream,
            self.device.index,
            &a.data,
            &b.data,
            &mut out,
            numel,
        )?;
        Ok(CudaMatrix {
            data: out,
            rows: a.rows,
            cols: a.cols,
        })
    }

    fn matmul(&self, a: &CudaMatrix, b: &CudaMatrix) -> Result<CudaMatrix> {
        let [m, n] = matmul_output_shape(a.shape(), b.shape())?;
        let k = a.cols;
        let (mi, ki, ni) = (to_i32(m, "matmul")?, to_i32(k, "matmul")?, to_i32(n, "matmul")?);

        // Row-major C = A @ B is column-major C^T = B^T @ A^T, so cuBLAS
        // gets B first with m and n swapped and no transpose flags.
        let cfg = GemmConfig {
            transa: cublasOperation_t::CUBLAS_OP_N,
            transb: cublasOperation_t::CUBLAS_OP_N,
            m: ni,
            n: mi,
            k: ki,
            alpha: 1.0f32,
            lda: ni,
            ldb: ki,
            beta: 0.0f32,
            ldc: ni,
        };

        let mut out = self.alloc_f32(m * n)?;
        // SAFETY: dimensions and leading dimensions match the buffer sizes
        // checked by matmul_output_shape.
        unsafe { self.cublas.gemm(cfg, &b.data, &a.data, &mut out) }
            .map_err(|e| CudaError::CublasError(format!("SGEMM failed: {:?}", e)))?;

        Ok(CudaMatrix {
            data: out,
            rows: m,
            cols: n,
        })
    }

    fn matvec(&self, a: &CudaMatrix, x: &CudaVector) -> Result<CudaVector> {
        let m = matvec_output_len(a.shape(), x.numel())?;
        let rows = to_i32(a.rows, "matvec")?;
        let cols = to_i32(a.cols, "matvec")?;

        // Row-major A is column-major A^T with shape [cols, rows]
        let cfg = GemvConfig {
            trans: cublasOperation_t::CUBLAS_OP_T,
            m: cols,
            n: rows,
            alpha: 1.0f32,
            lda: cols,
            incx: 1,
            beta: 0.0f32,
            incy: 1,
        };

        let mut y = self.alloc_f32(m)?;
        // SAFETY: A holds rows * cols elements, x holds cols, y holds rows.
        unsafe { self.cublas.gemv(cfg, &a.data, &x.data, &mut y) }
            .map_err(|e| CudaError::CublasError(format!("SGEMV failed: {:?}", e)))?;

        Ok(CudaVector { data: y, len: m })
    }

    fn matrix_to_vec(&self, m: &CudaMatrix) -> Result<Vec<f32>> {
        self.download(&m.data, m.rows * m.cols)
    }

    fn vector_to_vec(&self, v: &CudaVector) -> Result<Vec<f32>> {
        self.download(&v.data, v.len)
    }
}
