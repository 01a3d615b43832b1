//! CPU runtime implementation
//!
//! Dense operations run on `ndarray` arrays (`Array2<f32>` / `Array1<f32>`),
//! whose `dot` dispatches to an optimized GEMM. Sparse operations use the
//! crate's CSR format with row-parallel SpMV.
//!
//! All CPU work is synchronous: an operation has completed when it returns,
//! so `flush` and `synchronize` are no-ops.

mod client;
mod device;
mod ops;
mod runtime;

pub use client::CpuClient;
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
