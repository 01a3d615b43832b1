//! WebGPU runtime implementation (requires `wgpu` feature)
//!
//! Cross-platform GPU execution via WebGPU (Vulkan, Metal, DX12).
//! All kernels are native WGSL compute shaders operating on f32.
//!
//! # Example
//!
//! ```ignore
//! use numbench::prelude::*;
//! use numbench::runtime::wgpu::WgpuRuntime;
//!
//! let device = WgpuRuntime::default_device();
//! let client = WgpuRuntime::default_client(&device)?;
//! ```

mod cache;
mod client;
mod device;
mod ops;
mod runtime;
pub mod shaders;
mod storage;

pub use client::WgpuClient;
pub use device::{WgpuDevice, WgpuError};
pub use runtime::{WgpuRuntime, is_wgpu_available};
pub use storage::{WgpuCsrMatrix, WgpuMatrix, WgpuVector};
