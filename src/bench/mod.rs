//! Benchmark harness
//!
//! - [`driver`]: times a workload across problem sizes
//! - [`workload`]: timed statements and their per-backend setups
//! - [`data`]: random host operands
//! - [`suite`]: the full operation x platform plan

pub mod data;
pub mod driver;
pub mod suite;
pub mod workload;

pub use driver::{SizeFailure, Sweep, SweepOptions, Timing, run_sweep, sweep};
pub use suite::{Capabilities, Operation, Platform, SweepPlan, plan, run_suite};
pub use workload::{DenseStatement, Workload};
