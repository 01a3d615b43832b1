//! Device-resident operands for the WebGPU runtime

use wgpu::Buffer;

use crate::ops::{DeviceMatrix, DeviceVector};

/// Dense row-major f32 matrix in a storage buffer
#[derive(Debug)]
pub struct WgpuMatrix {
    pub(crate) buffer: Buffer,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl DeviceMatrix for WgpuMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

/// Dense f32 vector in a storage buffer
#[derive(Debug)]
pub struct WgpuVector {
    pub(crate) buffer: Buffer,
    pub(crate) len: usize,
}

impl DeviceVector for WgpuVector {
    fn numel(&self) -> usize {
        self.len
    }
}

/// CSR matrix with u32 row pointers and column indices
#[derive(Debug)]
pub struct WgpuCsrMatrix {
    pub(crate) row_ptrs: Buffer,
    pub(crate) col_indices: Buffer,
    pub(crate) values: Buffer,
    pub(crate) nrows: usize,
    pub(crate) ncols: usize,
}
