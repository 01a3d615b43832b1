//! Error types for numbench

use thiserror::Error;

/// Result type alias using numbench's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or running a benchmark
#[derive(Error, Debug)]
pub enum Error {
    /// Shape mismatch between operands
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Configuration value outside its valid range
    #[error("Invalid configuration '{field}': {reason}")]
    InvalidConfig {
        /// Offending field, dotted path as written in the config file
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Out of memory
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },

    /// Backend limitation - operation valid but exceeds backend capabilities
    #[error("{backend} limitation: {operation} - {reason}")]
    BackendLimitation {
        /// The backend that has the limitation
        backend: &'static str,
        /// The operation being attempted
        operation: &'static str,
        /// Description of the limitation
        reason: String,
    },

    /// WebGPU-specific error
    #[cfg(feature = "wgpu")]
    #[error(transparent)]
    Wgpu(#[from] crate::runtime::wgpu::WgpuError),

    /// CUDA-specific error
    #[cfg(feature = "cuda")]
    #[error(transparent)]
    Cuda(#[from] crate::runtime::cuda::CudaError),

    /// Malformed configuration file
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// I/O failure while reading configuration or writing the report
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: &[usize], got: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a backend limitation error
    pub fn backend_limitation(
        backend: &'static str,
        operation: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::BackendLimitation {
            backend,
            operation,
            reason: reason.into(),
        }
    }

    /// Create an out-of-memory error for `len` elements of `T`
    pub fn out_of_memory<T>(len: usize) -> Self {
        Self::OutOfMemory {
            size: len.saturating_mul(std::mem::size_of::<T>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_memory_reports_bytes() {
        let err = Error::out_of_memory::<f32>(10);
        assert_eq!(err.to_string(), "Out of memory: failed to allocate 40 bytes");
    }

    #[test]
    fn test_out_of_memory_saturates() {
        let err = Error::out_of_memory::<u64>(usize::MAX);
        match err {
            Error::OutOfMemory { size } => assert_eq!(size, usize::MAX),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_backend_limitation_message() {
        let err = Error::backend_limitation("wgpu", "matmul", "buffer too large");
        assert_eq!(err.to_string(), "wgpu limitation: matmul - buffer too large");
    }
}
