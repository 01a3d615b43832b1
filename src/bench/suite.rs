//! The benchmark suite
//!
//! Operations run in a fixed order (addition, GEMM, GEMV, sparse SpMV) and,
//! within each operation, platforms run as GPU, CPU, CUDA. Every sweep is
//! framed by a header and a trailing blank line:
//!
//! ```text
//! Dense matrix multiplication -- ndarray
//! 8 1.2e-6
//! 16 3.4e-6
//!
//! ```

use std::fmt;
use std::io::Write;

use super::driver::{SweepOptions, Timing, run_sweep};
use super::workload::{DenseStatement, dense_setup, sparse_setup};
use crate::config::BenchConfig;
use crate::error::{Error, Result};
use crate::runtime::cpu::CpuRuntime;

/// A timed linear-algebra operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Operation {
    /// Dense elementwise addition
    Add,
    /// Dense matrix-matrix multiplication
    Gemm,
    /// Dense matrix-vector multiplication
    Gemv,
    /// Sparse matrix-vector multiplication
    Spgemv,
}

impl Operation {
    /// Every operation, in suite order
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Gemm,
        Operation::Gemv,
        Operation::Spgemv,
    ];

    /// Section title
    pub fn title(self) -> &'static str {
        match self {
            Operation::Add => "Dense matrix elementwise addition",
            Operation::Gemm => "Dense matrix multiplication",
            Operation::Gemv => "Dense matrix-vector multiplication",
            Operation::Spgemv => "Sparse matrix-vector multiplication",
        }
    }

    /// Whether the operation takes a sparse operand
    pub fn is_sparse(self) -> bool {
        matches!(self, Operation::Spgemv)
    }

    fn dense_statement(self) -> Option<DenseStatement> {
        match self {
            Operation::Add => Some(DenseStatement::Add),
            Operation::Gemm => Some(DenseStatement::Matmul),
            Operation::Gemv => Some(DenseStatement::Matvec),
            Operation::Spgemv => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Add => "add",
            Operation::Gemm => "gemm",
            Operation::Gemv => "gemv",
            Operation::Spgemv => "spgemv",
        })
    }
}

/// A backend family the suite can time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Platform {
    /// WebGPU compute
    Gpu,
    /// ndarray for dense, in-crate CSR for sparse
    Cpu,
    /// CUDA via cudarc; dense operations only
    Cuda,
}

impl Platform {
    /// Every platform, in suite order
    pub const ALL: [Platform; 3] = [Platform::Gpu, Platform::Cpu, Platform::Cuda];

    /// Backend label printed after the operation title
    pub fn label(self, op: Operation) -> &'static str {
        match (self, op.is_sparse()) {
            (Platform::Gpu, _) => "wgpu",
            (Platform::Cpu, false) => "ndarray",
            (Platform::Cpu, true) => "CSR (CPU)",
            (Platform::Cuda, _) => "cudarc (CUDA)",
        }
    }

    /// Whether this platform has a sweep for `op`
    pub fn supports(self, op: Operation) -> bool {
        !(self == Platform::Cuda && op.is_sparse())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Platform::Gpu => "gpu",
            Platform::Cpu => "cpu",
            Platform::Cuda => "cuda",
        })
    }
}

/// Platforms usable in this process, decided once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Compiled with the `wgpu` feature. The adapter itself is not probed.
    pub gpu: bool,
    /// Compiled with the `cuda` feature and a CUDA context could be created
    pub cuda: bool,
}

impl Capabilities {
    /// Detect what this build and machine support.
    pub fn probe() -> Self {
        let caps = Self {
            gpu: cfg!(feature = "wgpu"),
            cuda: probe_cuda(),
        };
        log::info!("capabilities: gpu={} cuda={}", caps.gpu, caps.cuda);
        caps
    }

    /// Only the CPU platform.
    pub fn cpu_only() -> Self {
        Self {
            gpu: false,
            cuda: false,
        }
    }

    /// Whether `platform` can run here
    pub fn supports(&self, platform: Platform) -> bool {
        match platform {
            Platform::Gpu => self.gpu,
            Platform::Cpu => true,
            Platform::Cuda => self.cuda,
        }
    }
}

#[cfg(feature = "cuda")]
fn probe_cuda() -> bool {
    crate::runtime::cuda::is_cuda_available()
}

#[cfg(not(feature = "cuda"))]
fn probe_cuda() -> bool {
    false
}

/// One sweep of the suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepPlan {
    /// Operation timed
    pub operation: Operation,
    /// Platform it runs on
    pub platform: Platform,
}

impl SweepPlan {
    /// `"<operation title> -- <backend label>"`
    pub fn header(&self) -> String {
        format!(
            "{} -- {}",
            self.operation.title(),
            self.platform.label(self.operation)
        )
    }
}

/// Sweeps to run for `config` on a machine with `caps`, in suite order.
pub fn plan(config: &BenchConfig, caps: &Capabilities) -> Vec<SweepPlan> {
    let mut plan = Vec::new();
    for operation in Operation::ALL {
        if !config.operations.enabled(operation) {
            continue;
        }
        for platform in Platform::ALL {
            if !config.platforms.enabled(platform) || !platform.supports(operation) {
                continue;
            }
            if !caps.supports(platform) {
                log::info!("skipping {} on {}: platform unavailable", operation, platform);
                continue;
            }
            plan.push(SweepPlan {
                operation,
                platform,
            });
        }
    }
    plan
}

fn run_entry<O: Write + ?Sized>(
    entry: SweepPlan,
    config: &BenchConfig,
    options: SweepOptions,
    out: &mut O,
) -> Result<Vec<Timing>> {
    let sizes = config.sizes.for_operation(entry.operation);
    let seed = config.seed;

    match (entry.platform, entry.operation.dense_statement()) {
        (Platform::Cpu, Some(statement)) => run_sweep(
            dense_setup::<CpuRuntime>(statement, seed),
            sizes,
            options,
            out,
        ),
        (Platform::Cpu, None) => run_sweep(
            sparse_setup::<CpuRuntime>(config.sparsity, seed),
            sizes,
            options,
            out,
        ),
        #[cfg(feature = "wgpu")]
        (Platform::Gpu, Some(statement)) => run_sweep(
            dense_setup::<crate::runtime::wgpu::WgpuRuntime>(statement, seed),
            sizes,
            options,
            out,
        ),
        #[cfg(feature = "wgpu")]
        (Platform::Gpu, None) => run_sweep(
            sparse_setup::<crate::runtime::wgpu::WgpuRuntime>(config.sparsity, seed),
            sizes,
            options,
            out,
        ),
        #[cfg(feature = "cuda")]
        (Platform::Cuda, Some(statement)) => run_sweep(
            dense_setup::<crate::runtime::cuda::CudaRuntime>(statement, seed),
            sizes,
            options,
            out,
        ),
        (platform, _) => Err(Error::backend_limitation(
            "suite",
            "sweep",
            format!("{} is not available for {}", platform, entry.operation),
        )),
    }
}

/// Run every planned sweep, writing the report to `out`.
///
/// The first failing size stops the whole suite and its error is returned.
pub fn run_suite<O: Write + ?Sized>(
    config: &BenchConfig,
    caps: &Capabilities,
    out: &mut O,
) -> Result<()> {
    config.validate()?;
    let options = SweepOptions::new(config.repetitions, config.warmup)?;

    for entry in plan(config, caps) {
        writeln!(out, "{}", entry.header())?;
        if entry.operation.is_sparse() {
            writeln!(out, "Sparsity: {:.6}", config.sparsity)?;
        }
        run_entry(entry, config, options, out)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OperationToggles, PlatformToggles};

    #[test]
    fn test_headers() {
        let entry = SweepPlan {
            operation: Operation::Add,
            platform: Platform::Cpu,
        };
        assert_eq!(entry.header(), "Dense matrix elementwise addition -- ndarray");
        let entry = SweepPlan {
            operation: Operation::Spgemv,
            platform: Platform::Cpu,
        };
        assert_eq!(entry.header(), "Sparse matrix-vector multiplication -- CSR (CPU)");
    }

    #[test]
    fn test_plan_order() {
        let config = BenchConfig::default();
        let caps = Capabilities {
            gpu: true,
            cuda: true,
        };
        let plan = plan(&config, &caps);
        // 3 dense ops x 3 platforms + sparse on gpu and cpu
        assert_eq!(plan.len(), 11);
        assert_eq!(plan[0].platform, Platform::Gpu);
        assert_eq!(plan[1].platform, Platform::Cpu);
        assert_eq!(plan[2].platform, Platform::Cuda);
        assert!(plan[9..].iter().all(|p| p.operation == Operation::Spgemv));
        assert!(plan.iter().all(|p| p.platform.supports(p.operation)));
    }

    #[test]
    fn test_unavailable_cuda_is_skipped() {
        let config = BenchConfig::default();
        let plan = plan(&config, &Capabilities::cpu_only());
        assert_eq!(plan.len(), 4);
        assert!(plan.iter().all(|p| p.platform == Platform::Cpu));
    }

    #[test]
    fn test_run_suite_cpu_gemm() {
        let config = BenchConfig {
            platforms: PlatformToggles::only(&[Platform::Cpu]),
            operations: OperationToggles::only(&[Operation::Gemm]),
            repetitions: 1,
            warmup: 0,
            seed: Some(0),
            sizes: crate::config::SizeLists {
                gemm: vec![4, 8],
                ..Default::default()
            },
            ..Default::default()
        };
        let mut out = Vec::new();
        run_suite(&config, &Capabilities::cpu_only(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Dense matrix multiplication -- ndarray");
        assert!(lines[1].starts_with("4 "));
        assert!(lines[2].starts_with("8 "));
        assert_eq!(lines[3], "");
    }
}
