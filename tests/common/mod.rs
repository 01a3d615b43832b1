//! Common test utilities
#![allow(dead_code)]

use numbench::runtime::Runtime;
use numbench::runtime::cpu::{CpuClient, CpuRuntime};
#[cfg(feature = "cuda")]
use numbench::runtime::cuda::{CudaClient, CudaRuntime};
#[cfg(feature = "wgpu")]
use numbench::runtime::wgpu::{WgpuClient, WgpuRuntime};

/// Create a CPU client for testing
pub fn create_cpu_client() -> CpuClient {
    let device = CpuRuntime::default_device();
    CpuRuntime::default_client(&device).expect("CPU client")
}

/// Create a WebGPU client, returning None if WebGPU is unavailable
#[cfg(feature = "wgpu")]
pub fn create_wgpu_client() -> Option<WgpuClient> {
    if !numbench::runtime::wgpu::is_wgpu_available() {
        return None;
    }
    let device = WgpuRuntime::default_device();
    WgpuRuntime::default_client(&device).ok()
}

/// Create a CUDA client, returning None if CUDA is unavailable
#[cfg(feature = "cuda")]
pub fn create_cuda_client() -> Option<CudaClient> {
    if !numbench::runtime::cuda::is_cuda_available() {
        return None;
    }
    let device = CudaRuntime::default_device();
    CudaRuntime::default_client(&device).ok()
}

/// Assert two f32 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f32(a: &[f32], b: &[f32], rtol: f32, atol: f32, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Deterministic values in [0, 1)
pub fn pattern(n: usize, salt: usize) -> Vec<f32> {
    (0..n)
        .map(|i| ((i * 17 + salt * 31 + 3) % 1000) as f32 / 1000.0)
        .collect()
}
