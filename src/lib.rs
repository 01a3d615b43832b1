//! # numbench
//!
//! **Timing harness for dense and sparse linear algebra across CPU and GPU backends.**
//!
//! numbench measures mean per-call latency of four statements over a sweep
//! of problem sizes:
//!
//! - dense elementwise addition (`C = A + B`)
//! - dense matrix-matrix multiplication (`C = A @ B`)
//! - dense matrix-vector multiplication (`y = A @ x`)
//! - sparse matrix-vector multiplication (`y = S @ x`, CSR)
//!
//! ## Backends
//!
//! - CPU: `ndarray` for dense operands, in-crate CSR with rayon for sparse
//! - WebGPU (`wgpu` feature, default): native WGSL compute shaders
//! - CUDA (`cuda` feature): PTX kernel and cuBLAS through cudarc
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use numbench::prelude::*;
//!
//! let config = BenchConfig::default();
//! let caps = Capabilities::probe();
//! run_suite(&config, &caps, &mut std::io::stdout().lock())?;
//! # Ok::<(), numbench::error::Error>(())
//! ```
//!
//! Individual sweeps can be driven directly:
//!
//! ```rust
//! use numbench::bench::{SweepOptions, run_sweep};
//!
//! let mut out = Vec::new();
//! let timings = run_sweep(
//!     |_size| Ok(|| -> numbench::error::Result<()> { Ok(()) }),
//!     &[8, 16],
//!     SweepOptions::new(1, 0)?,
//!     &mut out,
//! )?;
//! assert_eq!(timings.len(), 2);
//! # Ok::<(), numbench::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `wgpu` (default): WebGPU backend
//! - `rayon` (default): multi-threaded CPU SpMV
//! - `cuda`: NVIDIA CUDA backend (needs `nvcc` at build time)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bench;
pub mod config;
pub mod error;
pub mod ops;
pub mod runtime;
pub mod sparse;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::bench::{
        Capabilities, Operation, Platform, SweepOptions, Timing, Workload, run_suite, run_sweep,
    };
    pub use crate::config::BenchConfig;
    pub use crate::error::{Error, Result};
    pub use crate::ops::{DenseOps, SparseOps};
    pub use crate::runtime::cpu::CpuRuntime;
    pub use crate::runtime::{Device, Runtime, RuntimeClient};
    pub use crate::sparse::{CooMatrix, CsrMatrix};

    #[cfg(feature = "cuda")]
    pub use crate::runtime::cuda::CudaRuntime;

    #[cfg(feature = "wgpu")]
    pub use crate::runtime::wgpu::WgpuRuntime;
}
