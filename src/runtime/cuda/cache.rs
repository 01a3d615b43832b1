//! Global client cache for CUDA runtime

use super::client::CudaClient;
use super::device::{CudaDevice, CudaError};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Global client cache: device index -> cached CudaClient
static CLIENT_CACHE: OnceLock<Mutex<HashMap<usize, CudaClient>>> = OnceLock::new();

/// Get or create a cached CudaClient for a device.
///
/// The context is rebound to the calling thread on every lookup.
pub(super) fn get_or_create_client(device: &CudaDevice) -> Result<CudaClient, CudaError> {
    let cache = CLIENT_CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache_guard = cache.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(client) = cache_guard.get(&device.index) {
        client.context.bind_to_thread().map_err(|e| {
            CudaError::ContextError(format!("Failed to bind CUDA context to thread: {:?}", e))
        })?;
        return Ok(client.clone());
    }

    let client = CudaClient::new(device.clone())?;
    cache_guard.insert(device.index, client.clone());

    Ok(client)
}
