//! Dense and sparse operations for the WebGPU runtime
//!
//! Every operation allocates its output buffer, records one compute pass and
//! submits it. Nothing waits here; callers synchronize through the client.

use bytemuck::{Pod, Zeroable};
use ndarray::{Array1, Array2};

use super::client::WgpuClient;
use super::runtime::WgpuRuntime;
use super::shaders::{launch_add, launch_csr_spmv, launch_matmul, launch_matvec};
use super::storage::{WgpuCsrMatrix, WgpuMatrix, WgpuVector};
use crate::error::{Error, Result};
use crate::ops::{
    DenseOps, DeviceMatrix, DeviceVector, SparseOps, matmul_output_shape, matvec_output_len,
    validate_same_shape,
};
use crate::sparse::CsrMatrix;

// ============================================================================
// Shader Parameters
// ============================================================================

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct AddParams {
    numel: u32,
    _pad: [u32; 3],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MatmulParams {
    m: u32,
    k: u32,
    n: u32,
    _pad: u32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct MatvecParams {
    m: u32,
    n: u32,
    _pad: [u32; 2],
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct SpmvParams {
    nrows: u32,
    ncols: u32,
    _pad: [u32; 2],
}

/// Shader indices are u32.
fn to_u32(value: usize, op: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        Error::backend_limitation("wgpu", op, format!("{} does not fit in a u32 index", value))
    })
}

impl WgpuClient {
    fn max_per_dim(&self) -> u32 {
        self.device_id.max_workgroups_per_dimension()
    }

    fn alloc_f32(&self, label: &str, len: usize) -> Result<wgpu::Buffer> {
        let bytes = len
            .checked_mul(std::mem::size_of::<f32>())
            .ok_or_else(|| Error::out_of_memory::<f32>(len))?;
        self.create_storage_buffer(label, bytes as u64)
    }
}

impl DenseOps<WgpuRuntime> for WgpuClient {
    fn upload_matrix(&self, host: Array2<f32>) -> Result<WgpuMatrix> {
        let [rows, cols] = DeviceMatrix::shape(&host);
        let buffer = match host.as_slice() {
            Some(data) => self.upload("matrix", data)?,
            None => self.upload("matrix", &host.iter().copied().collect::<Vec<_>>())?,
        };
        Ok(WgpuMatrix { buffer, rows, cols })
    }

    fn upload_vector(&self, host: Array1<f32>) -> Result<WgpuVector> {
        let len = host.len();
        let buffer = self.upload("vector", &host.to_vec())?;
        Ok(WgpuVector { buffer, len })
    }

    fn add(&self, a: &WgpuMatrix, b: &WgpuMatrix) -> Result<WgpuMatrix> {
        validate_same_shape(a.shape(), b.shape())?;
        let numel = a.rows * a.cols;
        let params = AddParams {
            numel: to_u32(numel, "add")?,
            _pad: [0; 3],
        };

        let out = self.alloc_f32("add_out", numel)?;
        let params_buffer = self.create_uniform("add_params", &params)?;
        launch_add(
            self.pipeline_cache(),
            self.wgpu_queue(),
            &a.buffer,
            &b.buffer,
            &out,
            &params_buffer,
            numel,
            self.max_per_dim(),
        )?;

        Ok(WgpuMatrix {
            buffer: out,
            rows: a.rows,
            cols: a.cols,
        })
    }

    fn matmul(&self, a: &WgpuMatrix, b: &WgpuMatrix) -> Result<WgpuMatrix> {
        let [m, n] = matmul_output_shape(a.shape(), b.shape())?;
        let params = MatmulParams {
            m: to_u32(m, "matmul")?,
            k: to_u32(a.cols, "matmul")?,
            n: to_u32(n, "matmul")?,
            _pad: 0,
        };

        let out = self.alloc_f32("matmul_out", m * n)?;
        let params_buffer = self.create_uniform("matmul_params", &params)?;
        launch_matmul(
            self.pipeline_cache(),
            self.wgpu_queue(),
            &a.buffer,
            &b.buffer,
            &out,
            &params_buffer,
            m,
            n,
            self.max_per_dim(),
        )?;

        Ok(WgpuMatrix {
            buffer: out,
            rows: m,
            cols: n,
        })
    }

    fn matvec(&self, a: &WgpuMatrix, x: &WgpuVector) -> Result<WgpuVector> {
        let m = matvec_output_len(a.shape(), x.numel())?;
        let params = MatvecParams {
            m: to_u32(m, "matvec")?,
            n: to_u32(a.cols, "matvec")?,
            _pad: [0; 2],
        };

        let out = self.alloc_f32("matvec_out", m)?;
        let params_buffer = self.create_uniform("matvec_params", &params)?;
        launch_matvec(
            self.pipeline_cache(),
            self.wgpu_queue(),
            &a.buffer,
            &x.buffer,
            &out,
            &params_buffer,
            m,
            self.max_per_dim(),
        )?;

        Ok(WgpuVector {
            buffer: out,
            len: m,
        })
    }

    fn matrix_to_vec(&self, m: &WgpuMatrix) -> Result<Vec<f32>> {
        self.read_buffer(&m.buffer, m.rows * m.cols)
    }

    fn vector_to_vec(&self, v: &WgpuVector) -> Result<Vec<f32>> {
        self.read_buffer(&v.buffer, v.len)
    }
}

impl SparseOps<WgpuRuntime> for WgpuClient {
    type SparseMatrix = WgpuCsrMatrix;

    fn upload_csr(&self, host: CsrMatrix) -> Result<WgpuCsrMatrix> {
        let row_ptrs = host
            .row_ptrs()
            .iter()
            .map(|&p| to_u32(p, "spmv"))
            .collect::<Result<Vec<u32>>>()?;
        // Column indices are bounded by ncols, so one check covers them all
        to_u32(host.ncols(), "spmv")?;
        let col_indices: Vec<u32> = host.col_indices().iter().map(|&c| c as u32).collect();

        Ok(WgpuCsrMatrix {
            row_ptrs: self.upload("csr_row_ptrs", &row_ptrs)?,
            col_indices: self.upload("csr_col_indices", &col_indices)?,
            values: self.upload("csr_values", host.values())?,
            nrows: host.nrows(),
            ncols: host.ncols(),
        })
    }

    fn spmv(&self, a: &WgpuCsrMatrix, x: &WgpuVector) -> Result<WgpuVector> {
        if x.len != a.ncols {
            return Err(Error::shape_mismatch(&[a.ncols], &[x.len]));
        }
        let params = SpmvParams {
            nrows: to_u32(a.nrows, "spmv")?,
            ncols: to_u32(a.ncols, "spmv")?,
            _pad: [0; 2],
        };

        let y = self.alloc_f32("spmv_out", a.nrows)?;
        let params_buffer = self.create_uniform("spmv_params", &params)?;
        launch_csr_spmv(
            self.pipeline_cache(),
            self.wgpu_queue(),
            &a.row_ptrs,
            &a.col_indices,
            &a.values,
            &x.buffer,
            &y,
            &params_buffer,
            a.nrows,
            self.max_per_dim(),
        )?;

        Ok(WgpuVector {
            buffer: y,
            len: a.nrows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_uniform_aligned() {
        assert_eq!(std::mem::size_of::<AddParams>(), 16);
        assert_eq!(std::mem::size_of::<MatmulParams>(), 16);
        assert_eq!(std::mem::size_of::<MatvecParams>(), 16);
        assert_eq!(std::mem::size_of::<SpmvParams>(), 16);
    }

    #[test]
    fn test_to_u32_rejects_large_values() {
        assert_eq!(to_u32(7, "add").unwrap(), 7);
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            to_u32(usize::MAX, "add"),
            Err(Error::BackendLimitation { .. })
        ));
    }
}
