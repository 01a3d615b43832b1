//! WebGPU runtime implementation

use super::cache::get_or_create_client;
use super::client::WgpuClient;
use super::device::{WgpuDevice, query_adapter_info_blocking};
use super::storage::{WgpuMatrix, WgpuVector};
use crate::error::Result;
use crate::runtime::Runtime;

/// WebGPU Runtime adapter
///
/// Implements the generic Runtime trait for the WebGPU backend.
#[derive(Clone, Debug, Default)]
pub struct WgpuRuntime;

impl Runtime for WgpuRuntime {
    type Device = WgpuDevice;
    type Client = WgpuClient;
    type Matrix = WgpuMatrix;
    type Vector = WgpuVector;

    fn name() -> &'static str {
        "wgpu"
    }

    fn default_device() -> Self::Device {
        WgpuDevice::new(0)
    }

    fn default_client(device: &Self::Device) -> Result<Self::Client> {
        Ok(get_or_create_client(device)?)
    }
}

/// Check if any WebGPU adapter is present.
///
/// Not used to gate the GPU platform: a missing adapter surfaces as the
/// first size's error instead.
pub fn is_wgpu_available() -> bool {
    query_adapter_info_blocking(0).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeClient;

    #[test]
    fn test_wgpu_runtime_name() {
        assert_eq!(WgpuRuntime::name(), "wgpu");
    }

    #[test]
    fn test_client_is_cached() {
        if !is_wgpu_available() {
            println!("No GPU available, skipping test");
            return;
        }
        let device = WgpuRuntime::default_device();
        let a = WgpuRuntime::default_client(&device).unwrap();
        let b = WgpuRuntime::default_client(&device).unwrap();
        assert!(std::sync::Arc::ptr_eq(&a.wgpu_device, &b.wgpu_device));
        a.synchronize().unwrap();
    }
}
