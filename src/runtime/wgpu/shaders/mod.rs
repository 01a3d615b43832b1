//! WGSL compute shaders and their launchers
//!
//! Each kernel lives in its own shader module so bindings never overlap:
//!
//! - `elementwise`: `add_f32`
//! - `matmul`: tiled `matmul_f32`
//! - `matvec`: `matvec_f32` (one workgroup per row)
//! - `csr_spmv`: `csr_spmv_f32` (one thread per row)
//!
//! F32 only; WebGPU has no portable f64 support.

pub mod elementwise;
pub mod elementwise_wgsl;
pub mod matmul;
pub mod matmul_wgsl;
pub mod pipeline;
pub mod sparse_spmv_launcher;
pub mod sparse_wgsl;

pub use elementwise::launch_add;
pub use matmul::{launch_matmul, launch_matvec};
pub use pipeline::{LayoutKey, PipelineCache, WORKGROUP_SIZE, grid_2d, workgroup_count};
pub use sparse_spmv_launcher::launch_csr_spmv;
