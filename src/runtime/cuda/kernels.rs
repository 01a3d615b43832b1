//! CUDA kernel loading and launching
//!
//! PTX is compiled from `kernels/*.cu` by build.rs; modules are loaded on
//! first use and cached per device.

use cudarc::driver::PushKernelArg;
use cudarc::driver::safe::{CudaContext, CudaModule, CudaSlice, CudaStream, LaunchConfig};
use cudarc::nvrtc::Ptx;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use super::device::CudaError;
use crate::error::{Error, Result};

/// Directory containing compiled PTX files (set by build.rs)
const KERNEL_DIR: &str = env!("CUDA_KERNEL_DIR");

/// Module holding the elementwise kernels
pub const ELEMENTWISE_MODULE: &str = "elementwise";

/// Threads per block for 1-D kernels
pub const BLOCK_SIZE: u32 = 256;

/// Cache for loaded CUDA modules, keyed by (device_index, module_name)
static MODULE_CACHE: OnceLock<Mutex<HashMap<(usize, &'static str), Arc<CudaModule>>>> =
    OnceLock::new();

fn load_ptx(name: &str) -> Ptx {
    Ptx::from_file(format!("{}/{}.ptx", KERNEL_DIR, name))
}

/// Get or load a CUDA module from PTX.
pub fn get_or_load_module(
    context: &Arc<CudaContext>,
    device_index: usize,
    module_name: &'static str,
) -> Result<Arc<CudaModule>> {
    let cache = MODULE_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut guard = cache.lock().unwrap_or_else(|e| e.into_inner());

    let key = (device_index, module_name);
    if let Some(module) = guard.get(&key) {
        return Ok(module.clone());
    }

    let module = context.load_module(load_ptx(module_name)).map_err(|e| {
        CudaError::KernelError(format!(
            "Failed to load CUDA module '{}': {:?}",
            module_name, e
        ))
    })?;

    guard.insert(key, module.clone());
    Ok(module)
}

/// Launch `out = a + b` over `numel` elements.
pub fn launch_add(
    context: &Arc<CudaContext>,
    stream: &CudaStream,
    device_index: usize,
    a: &CudaSlice<f32>,
    b: &CudaSlice<f32>,
    out: &mut CudaSlice<f32>,
    numel: usize,
) -> Result<()> {
    let n = u32::try_from(numel).map_err(|_| {
        Error::backend_limitation("cuda", "add", format!("{} elements exceed u32", numel))
    })?;

    let module = get_or_load_module(context, device_index, ELEMENTWISE_MODULE)?;
    let func = module
        .load_function("add_f32")
        .map_err(|e| CudaError::KernelError(format!("add_f32 not found: {:?}", e)))?;

    let cfg = LaunchConfig {
        grid_dim: (n.div_ceil(BLOCK_SIZE).max(1), 1, 1),
        block_dim: (BLOCK_SIZE, 1, 1),
        shared_mem_bytes: 0,
    };

    let mut builder = stream.launch_builder(&func);
    builder.arg(a);
    builder.arg(b);
    builder.arg(out);
    builder.arg(&n);

    // SAFETY: add_f32 takes (const float*, const float*, float*, uint) and
    // all three buffers hold at least `numel` elements.
    unsafe { builder.launch(cfg) }
        .map_err(|e| CudaError::KernelError(format!("add_f32 launch failed: {:?}", e)))?;

    Ok(())
}
