//! CUDA Client implementation
//!
//! CudaClient owns the context, one stream and a cuBLAS handle bound to it.
//!
//! # Thread Safety
//!
//! `CudaClient` is `Clone`; the context and stream are reference-counted via
//! `Arc`. CUDA calls must run on a thread with the context bound.

use cudarc::cublas::CudaBlas;
use cudarc::driver::safe::{CudaContext, CudaSlice, CudaStream};
use std::sync::Arc;

use super::CudaRuntime;
use super::device::{CudaDevice, CudaError};
use crate::error::Result;
use crate::runtime::RuntimeClient;

/// CUDA Runtime Client
///
/// All operations launch on `self.stream()` so they execute in order.
#[derive(Clone)]
pub struct CudaClient {
    /// GPU device index
    pub(crate) device: CudaDevice,

    /// CUDA context for this device
    pub(crate) context: Arc<CudaContext>,

    /// Stream on which all kernels launch
    pub(crate) stream: Arc<CudaStream>,

    /// cuBLAS handle for GEMM and GEMV
    pub(crate) cublas: Arc<CudaBlas>,
}

impl std::fmt::Debug for CudaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CudaClient")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl CudaClient {
    /// Create a new CUDA client for a device.
    ///
    /// # Errors
    ///
    /// Returns an error if context creation, stream creation or cuBLAS
    /// initialization fails.
    pub fn new(device: CudaDevice) -> std::result::Result<Self, CudaError> {
        let context = CudaContext::new(device.index).map_err(|e| {
            CudaError::ContextError(format!(
                "Failed to create CUDA context for device {}: {:?}",
                device.index, e
            ))
        })?;

        context.bind_to_thread().map_err(|e| {
            CudaError::ContextError(format!("Failed to bind CUDA context to thread: {:?}", e))
        })?;

        let stream = context.new_stream().map_err(|e| {
            CudaError::ContextError(format!("Failed to create CUDA stream: {:?}", e))
        })?;

        let cublas = CudaBlas::new(stream.clone())
            .map_err(|e| CudaError::CublasError(format!("Failed to initialize cuBLAS: {:?}", e)))?;

        log::info!("created CUDA client on {}", device.index);

        Ok(Self {
            device,
            context,
            stream,
            cublas: Arc::new(cublas),
        })
    }

    /// Get reference to the CUDA stream.
    #[inline]
    pub fn stream(&self) -> &Arc<CudaStream> {
        &self.stream
    }

    /// Copy host data into a new device allocation.
    pub fn upload(&self, data: &[f32]) -> Result<CudaSlice<f32>> {
        Ok(self
            .stream
            .memcpy_stod(data)
            .map_err(|e| CudaError::CopyError(format!("host to device: {:?}", e)))?)
    }

    /// Allocate `len` uninitialized f32 elements on the stream.
    pub fn alloc_f32(&self, len: usize) -> Result<CudaSlice<f32>> {
        // SAFETY: every output buffer is fully written by the kernel or
        // cuBLAS call it is handed to before it is read.
        let slice = unsafe { self.stream.alloc::<f32>(len.max(1)) }.map_err(|e| {
            CudaError::AllocationError(format!("{} f32 elements: {:?}", len, e))
        })?;
        Ok(slice)
    }

    /// Copy a device allocation back to the host.
    pub fn download(&self, slice: &CudaSlice<f32>, len: usize) -> Result<Vec<f32>> {
        let mut out = self
            .stream
            .memcpy_dtov(slice)
            .map_err(|e| CudaError::CopyError(format!("device to host: {:?}", e)))?;
        out.truncate(len);
        Ok(out)
    }
}

impl RuntimeClient<CudaRuntime> for CudaClient {
    fn device(&self) -> &CudaDevice {
        &self.device
    }

    fn synchronize(&self) -> Result<()> {
        self.stream
            .synchronize()
            .map_err(|e| CudaError::SyncError(format!("{:?}", e)))?;
        Ok(())
    }
}
