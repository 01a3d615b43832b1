//! CUDA runtime implementation (requires `cuda` feature)
//!
//! Native GPU execution via cudarc: a PTX kernel for elementwise addition and
//! cuBLAS for GEMM and GEMV. The harness probes availability with
//! [`is_cuda_available`] before scheduling any CUDA sweep.

mod cache;
mod client;
mod device;
mod kernels;
mod ops;
mod runtime;
mod storage;

pub use client::CudaClient;
pub use device::{CudaDevice, CudaError};
pub use runtime::{CudaRuntime, is_cuda_available};
pub use storage::{CudaMatrix, CudaVector};
