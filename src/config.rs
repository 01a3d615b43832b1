//! Benchmark configuration
//!
//! A [`BenchConfig`] is built once (defaults, then an optional TOML file,
//! then command-line overrides) and passed to the suite by reference.
//!
//! ```toml
//! repetitions = 5
//! sparsity = 0.01
//!
//! [platforms]
//! cuda = false
//!
//! [sizes]
//! gemm = [64, 128, 256]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::bench::driver::{DEFAULT_REPETITIONS, DEFAULT_WARMUP};
use crate::bench::{Operation, Platform};
use crate::error::{Error, Result};

/// Default fill fraction of sparse matrices
pub const DEFAULT_SPARSITY: f64 = 0.02;

fn powers(base: usize, exponents: std::ops::Range<u32>) -> Vec<usize> {
    exponents.map(|e| base.pow(e)).collect()
}

/// Which platforms to time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlatformToggles {
    /// WebGPU runtime
    pub gpu: bool,
    /// ndarray and CPU CSR
    pub cpu: bool,
    /// CUDA runtime (only if compiled in and a device is present)
    pub cuda: bool,
}

impl Default for PlatformToggles {
    fn default() -> Self {
        Self {
            gpu: true,
            cpu: true,
            cuda: true,
        }
    }
}

impl PlatformToggles {
    /// Whether `platform` is enabled
    pub fn enabled(&self, platform: Platform) -> bool {
        match platform {
            Platform::Gpu => self.gpu,
            Platform::Cpu => self.cpu,
            Platform::Cuda => self.cuda,
        }
    }

    /// Enable exactly the listed platforms.
    pub fn only(platforms: &[Platform]) -> Self {
        Self {
            gpu: platforms.contains(&Platform::Gpu),
            cpu: platforms.contains(&Platform::Cpu),
            cuda: platforms.contains(&Platform::Cuda),
        }
    }
}

/// Which operations to time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OperationToggles {
    /// Dense elementwise addition
    pub add: bool,
    /// Dense matrix-matrix multiplication
    pub gemm: bool,
    /// Dense matrix-vector multiplication
    pub gemv: bool,
    /// Sparse matrix-vector multiplication
    pub spgemv: bool,
}

impl Default for OperationToggles {
    fn default() -> Self {
        Self {
            add: true,
            gemm: true,
            gemv: true,
            spgemv: true,
        }
    }
}

impl OperationToggles {
    /// Whether `op` is enabled
    pub fn enabled(&self, op: Operation) -> bool {
        match op {
            Operation::Add => self.add,
            Operation::Gemm => self.gemm,
            Operation::Gemv => self.gemv,
            Operation::Spgemv => self.spgemv,
        }
    }

    /// Enable exactly the listed operations.
    pub fn only(ops: &[Operation]) -> Self {
        Self {
            add: ops.contains(&Operation::Add),
            gemm: ops.contains(&Operation::Gemm),
            gemv: ops.contains(&Operation::Gemv),
            spgemv: ops.contains(&Operation::Spgemv),
        }
    }
}

/// Problem sizes per operation, measured in order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeLists {
    /// Matrix edge lengths for addition
    pub add: Vec<usize>,
    /// Matrix edge lengths for GEMM
    pub gemm: Vec<usize>,
    /// Matrix edge lengths for GEMV
    pub gemv: Vec<usize>,
    /// Matrix edge lengths for sparse SpMV
    pub spgemv: Vec<usize>,
}

impl Default for SizeLists {
    fn default() -> Self {
        Self {
            add: powers(2, 3..15),
            gemm: powers(2, 3..13),
            gemv: powers(2, 3..13),
            spgemv: powers(10, 2..9),
        }
    }
}

impl SizeLists {
    /// Sizes for `op`
    pub fn for_operation(&self, op: Operation) -> &[usize] {
        match op {
            Operation::Add => &self.add,
            Operation::Gemm => &self.gemm,
            Operation::Gemv => &self.gemv,
            Operation::Spgemv => &self.spgemv,
        }
    }
}

/// Full benchmark configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    /// Platform enables
    pub platforms: PlatformToggles,
    /// Operation enables
    pub operations: OperationToggles,
    /// Sizes per operation
    pub sizes: SizeLists,
    /// Fraction of nonzero entries in sparse matrices, in (0, 1]
    pub sparsity: f64,
    /// Timed executions per size
    pub repetitions: u32,
    /// Untimed executions per size, after setup
    pub warmup: u32,
    /// RNG seed for operand generation; OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            platforms: PlatformToggles::default(),
            operations: OperationToggles::default(),
            sizes: SizeLists::default(),
            sparsity: DEFAULT_SPARSITY,
            repetitions: DEFAULT_REPETITIONS,
            warmup: DEFAULT_WARMUP,
            seed: None,
        }
    }
}

impl BenchConfig {
    /// Parse a TOML document; missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check every value the suite relies on.
    pub fn validate(&self) -> Result<()> {
        if self.repetitions == 0 {
            return Err(Error::invalid_config("repetitions", "must be at least 1"));
        }
        if !(self.sparsity > 0.0 && self.sparsity <= 1.0) {
            return Err(Error::invalid_config(
                "sparsity",
                format!("must be in (0, 1], got {}", self.sparsity),
            ));
        }
        for op in Operation::ALL {
            if !self.operations.enabled(op) {
                continue;
            }
            let sizes = self.sizes.for_operation(op);
            let field = format!("sizes.{}", op);
            if sizes.is_empty() {
                return Err(Error::invalid_config(field, "no sizes for an enabled operation"));
            }
            if sizes.contains(&0) {
                return Err(Error::invalid_config(field, "sizes must be positive"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let sizes = SizeLists::default();
        assert_eq!(sizes.add.len(), 12);
        assert_eq!(sizes.add.first(), Some(&8));
        assert_eq!(sizes.add.last(), Some(&16384));
        assert_eq!(sizes.gemm.last(), Some(&4096));
        assert_eq!(sizes.gemv, sizes.gemm);
        assert_eq!(sizes.spgemv.first(), Some(&100));
        assert_eq!(sizes.spgemv.last(), Some(&100_000_000));
    }

    #[test]
    fn test_default_is_valid() {
        BenchConfig::default().validate().unwrap();
    }

    #[test]
    fn test_toggles_only() {
        let p = PlatformToggles::only(&[Platform::Cpu]);
        assert!(p.enabled(Platform::Cpu));
        assert!(!p.enabled(Platform::Gpu));
        assert!(!p.enabled(Platform::Cuda));

        let o = OperationToggles::only(&[Operation::Gemv, Operation::Spgemv]);
        assert!(!o.enabled(Operation::Add));
        assert!(o.enabled(Operation::Spgemv));
    }

    #[test]
    fn test_disabled_operation_skips_size_check() {
        let mut config = BenchConfig::default();
        config.sizes.add.clear();
        assert!(config.validate().is_err());
        config.operations.add = false;
        config.validate().unwrap();
    }
}
