//! WebGPU Client implementation.
//!
//! `WgpuClient` owns the WebGPU device and queue for operation dispatch.
//!
//! # Thread Safety
//!
//! `WgpuClient` is `Clone`; clones share the device, queue and pipeline cache.

use std::sync::Arc;
use std::time::Duration;
use wgpu::{Buffer, BufferDescriptor, BufferUsages, Device, Queue};

use super::WgpuRuntime;
use super::device::{WgpuDevice, WgpuError, query_adapter_info_blocking};
use super::shaders::PipelineCache;
use crate::error::{Error, Result};
use crate::runtime::RuntimeClient;

/// Upper bound on a blocking wait for the GPU
const POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// WebGPU Runtime Client.
///
/// Operands live in storage buffers; staging buffers are only created for
/// readback.
#[derive(Clone)]
pub struct WgpuClient {
    /// GPU device identifier (with adapter info)
    pub(crate) device_id: WgpuDevice,

    /// WebGPU device handle
    pub(crate) wgpu_device: Arc<Device>,

    /// WebGPU queue for command submission
    pub(crate) queue: Arc<Queue>,

    /// Pipeline cache for compute shaders
    pub(crate) pipeline_cache: Arc<PipelineCache>,
}

impl std::fmt::Debug for WgpuClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WgpuClient")
            .field("device", &self.device_id)
            .finish_non_exhaustive()
    }
}

impl WgpuClient {
    /// Create a new WebGPU client for a device.
    ///
    /// Requests the adapter's own limits so large operands are not capped
    /// by the conservative WebGPU defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable adapter is found or device creation
    /// fails.
    pub fn new(device: WgpuDevice) -> std::result::Result<Self, WgpuError> {
        let (adapter, info) = query_adapter_info_blocking(device.index)?;

        let (wgpu_device, queue) = pollster::block_on(async {
            adapter
                .request_device(&wgpu::DeviceDescriptor {
                    label: Some("numbench WebGPU Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: adapter.limits(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    trace: wgpu::Trace::Off,
                    experimental_features: wgpu::ExperimentalFeatures::default(),
                })
                .await
        })
        .map_err(|e| WgpuError::DeviceError(format!("{:?}", e)))?;

        let wgpu_device = Arc::new(wgpu_device);
        let pipeline_cache = Arc::new(PipelineCache::new(wgpu_device.clone()));
        let device_id = WgpuDevice::with_info(device.index, info);

        log::info!(
            "created WebGPU client on {} ({:?})",
            device_id.adapter_name(),
            device_id.backend()
        );

        Ok(Self {
            device_id,
            wgpu_device,
            queue: Arc::new(queue),
            pipeline_cache,
        })
    }

    /// Get reference to the WebGPU queue.
    #[inline]
    pub fn wgpu_queue(&self) -> &Queue {
        &self.queue
    }

    /// Get reference to the pipeline cache.
    #[inline]
    pub fn pipeline_cache(&self) -> &PipelineCache {
        &self.pipeline_cache
    }

    /// Run `f` inside an out-of-memory error scope.
    ///
    /// Allocation failures raised by `f` are returned as
    /// [`Error::OutOfMemory`] instead of reaching the uncaptured-error handler.
    fn with_oom_scope<T>(&self, size: u64, f: impl FnOnce() -> T) -> Result<T> {
        let scope = self
            .wgpu_device
            .push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        let value = f();
        oom_checked(value, pollster::block_on(scope.pop()), size)
    }

    /// Create a storage buffer of `size` bytes.
    ///
    /// Fails with [`Error::BackendLimitation`] when the buffer cannot be
    /// bound as a storage buffer on this adapter, and with
    /// [`Error::OutOfMemory`] when the driver refuses the allocation.
    pub fn create_storage_buffer(&self, label: &str, size: u64) -> Result<Buffer> {
        let max = self.device_id.max_storage_buffer_size();
        if size > max {
            return Err(Error::backend_limitation(
                "wgpu",
                "allocate",
                format!(
                    "buffer '{}' needs {} bytes, adapter binds at most {}",
                    label, size, max
                ),
            ));
        }

        // Zero-sized bindings are invalid
        let size = size.max(4);
        self.with_oom_scope(size, || {
            self.wgpu_device.create_buffer(&BufferDescriptor {
                label: Some(label),
                size,
                usage: BufferUsages::STORAGE | BufferUsages::COPY_DST | BufferUsages::COPY_SRC,
                mapped_at_creation: false,
            })
        })
    }

    /// Create a storage buffer and fill it with `data`.
    pub fn upload<T: bytemuck::Pod>(&self, label: &str, data: &[T]) -> Result<Buffer> {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let size = bytes.len() as u64;
        let buffer = self.create_storage_buffer(label, size)?;
        // Staging memory for the write is allocated here, not at submit
        self.with_oom_scope(size, || self.write_buffer(&buffer, data))?;
        Ok(buffer)
    }

    /// Create a staging buffer for CPU readback.
    pub fn create_staging_buffer(&self, label: &str, size: u64) -> Buffer {
        self.wgpu_device.create_buffer(&BufferDescriptor {
            label: Some(label),
            size,
            usage: BufferUsages::MAP_READ | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Create a uniform buffer holding `params`.
    pub fn create_uniform<T: bytemuck::Pod>(&self, label: &str, params: &T) -> Result<Buffer> {
        let size = std::mem::size_of::<T>() as u64;
        self.with_oom_scope(size, || {
            let buffer = self.wgpu_device.create_buffer(&BufferDescriptor {
                label: Some(label),
                size,
                usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            self.write_buffer(&buffer, std::slice::from_ref(params));
            buffer
        })
    }

    /// Write data to a buffer.
    ///
    /// The write is staged and lands with the next queue submission.
    pub fn write_buffer<T: bytemuck::Pod>(&self, buffer: &Buffer, data: &[T]) {
        self.queue.write_buffer(buffer, 0, bytemuck::cast_slice(data));
    }

    /// Copy the first `len` elements of a storage buffer back to the host.
    pub fn read_buffer<T: bytemuck::Pod>(&self, buffer: &Buffer, len: usize) -> Result<Vec<T>> {
        let bytes = (len * std::mem::size_of::<T>()) as u64;
        if bytes == 0 {
            return Ok(Vec::new());
        }

        let staging = self.create_staging_buffer("readback_staging", bytes);
        let mut encoder = self
            .wgpu_device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback"),
            });
        encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, bytes);
        let submission = self.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });

        self.wgpu_device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(submission),
                timeout: Some(POLL_TIMEOUT),
            })
            .map_err(|e| WgpuError::PollError(format!("buffer read: {e}")))?;

        receiver
            .recv()
            .map_err(|_| WgpuError::BufferError("map_async callback was not invoked".into()))?
            .map_err(|e| WgpuError::BufferError(format!("map_async failed: {e}")))?;

        let out = {
            let data = slice.get_mapped_range();
            bytemuck::cast_slice::<u8, T>(&data).to_vec()
        };
        staging.unmap();
        Ok(out)
    }
}

impl RuntimeClient<WgpuRuntime> for WgpuClient {
    fn device(&self) -> &WgpuDevice {
        &self.device_id
    }

    fn flush(&self) -> Result<()> {
        // An empty submission still flushes pending `write_buffer` calls
        self.queue.submit(std::iter::empty());
        Ok(())
    }

    fn synchronize(&self) -> Result<()> {
        self.wgpu_device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(POLL_TIMEOUT),
            })
            .map_err(|e| WgpuError::PollError(e.to_string()))?;
        Ok(())
    }
}

/// Map the error popped from an out-of-memory scope onto the crate error.
fn oom_checked<T>(value: T, error: Option<wgpu::Error>, size: u64) -> Result<T> {
    match error {
        None => Ok(value),
        Some(wgpu::Error::OutOfMemory { .. }) => Err(Error::OutOfMemory {
            size: usize::try_from(size).unwrap_or(usize::MAX),
        }),
        Some(e) => Err(WgpuError::BufferError(e.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::wgpu::is_wgpu_available;

    #[test]
    fn test_oom_checked_passes_value_through() {
        assert_eq!(oom_checked(7u32, None, 64).unwrap(), 7);
    }

    #[test]
    fn test_oom_checked_maps_out_of_memory() {
        let error = wgpu::Error::OutOfMemory {
            source: Box::new(std::io::Error::other("device memory exhausted")),
        };
        match oom_checked((), Some(error), 1 << 20) {
            Err(Error::OutOfMemory { size }) => assert_eq!(size, 1 << 20),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_storage_buffer_over_binding_limit() {
        if !is_wgpu_available() {
            println!("No GPU available, skipping test");
            return;
        }
        let client = WgpuClient::new(WgpuDevice::new(0)).unwrap();
        let too_big = client.device_id.max_storage_buffer_size() + 4;
        let err = client.create_storage_buffer("too_big", too_big).unwrap_err();
        assert!(matches!(err, Error::BackendLimitation { .. }));
    }

    #[test]
    fn test_upload_and_uniform_inside_error_scope() {
        if !is_wgpu_available() {
            println!("No GPU available, skipping test");
            return;
        }
        let client = WgpuClient::new(WgpuDevice::new(0)).unwrap();
        let buffer = client.upload("values", &[1.0f32, 2.0, 3.0]).unwrap();
        client.create_uniform("params", &[4u32; 4]).unwrap();
        client.flush().unwrap();
        assert_eq!(client.read_buffer::<f32>(&buffer, 3).unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
