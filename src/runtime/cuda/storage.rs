//! Device-resident operands for the CUDA runtime

use cudarc::driver::safe::CudaSlice;

use crate::ops::{DeviceMatrix, DeviceVector};

/// Dense row-major f32 matrix in device memory
pub struct CudaMatrix {
    pub(crate) data: CudaSlice<f32>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl DeviceMatrix for CudaMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }
}

/// Dense f32 vector in device memory
pub struct CudaVector {
    pub(crate) data: CudaSlice<f32>,
    pub(crate) len: usize,
}

impl DeviceVector for CudaVector {
    fn numel(&self) -> usize {
        self.len
    }
}
