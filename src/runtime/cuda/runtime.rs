//! CUDA runtime implementation

use super::cache::get_or_create_client;
use super::client::CudaClient;
use super::device::CudaDevice;
use super::storage::{CudaMatrix, CudaVector};
use crate::error::Result;
use crate::runtime::Runtime;

/// CUDA Runtime adapter
///
/// Implements the generic Runtime trait for the CUDA backend via cudarc.
#[derive(Clone, Debug, Default)]
pub struct CudaRuntime;

impl Runtime for CudaRuntime {
    type Device = CudaDevice;
    type Client = CudaClient;
    type Matrix = CudaMatrix;
    type Vector = CudaVector;

    fn name() -> &'static str {
        "cuda"
    }

    fn default_device() -> Self::Device {
        CudaDevice::new(0)
    }

    fn default_client(device: &Self::Device) -> Result<Self::Client> {
        Ok(get_or_create_client(device)?)
    }
}

/// Check if CUDA is usable on this machine.
///
/// Creates (and caches) a client for device 0. cudarc panics when the
/// driver library cannot be loaded, so the probe catches unwinds.
pub fn is_cuda_available() -> bool {
    std::panic::catch_unwind(|| get_or_create_client(&CudaDevice::new(0)).is_ok())
        .unwrap_or(false)
}
