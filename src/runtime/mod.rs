//! Runtime backends for the benchmarked operations
//!
//! This module defines the `Runtime` trait and provides implementations
//! for the compute backends the harness can time (CPU, WebGPU, CUDA).
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity)
//! ├── Device (identifies a specific GPU/CPU)
//! ├── Client (dispatches operations, owns stream/queue)
//! └── Matrix / Vector (device-resident operands)
//! ```
//!
//! Operations live in [`crate::ops`] and are implemented on the client.

pub mod allocator;
pub mod cpu;

#[cfg(feature = "cuda")]
pub mod cuda;

#[cfg(feature = "wgpu")]
pub mod wgpu;

use crate::error::Result;
use crate::ops::{DeviceMatrix, DeviceVector};

/// Core trait for compute backends
///
/// `Runtime` abstracts over different compute devices (CPU, GPU, etc.).
/// It uses static dispatch via generics so each sweep is monomorphized
/// for the backend it times.
pub trait Runtime: Sized + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Dense matrix stored on the device
    type Matrix: DeviceMatrix;

    /// Dense vector stored on the device
    type Vector: DeviceVector;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the client for a device
    ///
    /// GPU runtimes cache clients per device, so repeated calls are cheap
    /// after the first one.
    fn default_client(device: &Self::Device) -> Result<Self::Client>;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + std::fmt::Debug + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime> {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Submit any work the client has recorded but not yet handed to the device
    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Wait for all submitted work to complete
    fn synchronize(&self) -> Result<()>;
}
