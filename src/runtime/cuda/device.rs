//! CUDA Device implementation
//!
//! Provides CUDA device abstraction using cudarc for direct GPU control.

use thiserror::Error;

use crate::runtime::Device;

/// CUDA Device using cudarc
#[derive(Clone, Debug)]
pub struct CudaDevice {
    /// Index of the GPU device (0, 1, 2, ...)
    pub(crate) index: usize,
}

impl CudaDevice {
    /// Create a new CUDA device
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Device for CudaDevice {
    fn id(&self) -> usize {
        self.index
    }

    fn name(&self) -> String {
        format!("cuda:{}", self.index)
    }
}

impl Default for CudaDevice {
    fn default() -> Self {
        Self::new(0)
    }
}

/// CUDA-specific errors
#[derive(Error, Debug, Clone)]
pub enum CudaError {
    /// Memory allocation error
    #[error("CUDA allocation error: {0}")]
    AllocationError(String),
    /// Memory copy error
    #[error("CUDA copy error: {0}")]
    CopyError(String),
    /// Kernel load or launch error
    #[error("CUDA kernel error: {0}")]
    KernelError(String),
    /// Synchronization error
    #[error("CUDA sync error: {0}")]
    SyncError(String),
    /// cuBLAS error
    #[error("cuBLAS error: {0}")]
    CublasError(String),
    /// Context error
    #[error("CUDA context error: {0}")]
    ContextError(String),
}
