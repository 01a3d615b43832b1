//! Benchmark driver
//!
//! For every size, in order: build the workload, run the untimed warm-up
//! executions, then time `repetitions` executions with a monotonic clock and
//! report the mean. The first failure ends the sweep.

use std::fmt;
use std::io::Write;
use std::iter::FusedIterator;
use std::time::{Duration, Instant};

use thiserror::Error;

use super::workload::Workload;
use crate::error::{Error, Result};

/// Default number of timed executions per size
pub const DEFAULT_REPETITIONS: u32 = 10;

/// Default number of untimed executions after setup
pub const DEFAULT_WARMUP: u32 = 3;

/// How many times each size's statement is executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepOptions {
    repetitions: u32,
    warmup: u32,
}

impl SweepOptions {
    /// Options with `repetitions` timed and `warmup` untimed executions.
    ///
    /// `repetitions` must be at least 1.
    pub fn new(repetitions: u32, warmup: u32) -> Result<Self> {
        if repetitions == 0 {
            return Err(Error::InvalidArgument {
                arg: "repetitions",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(Self {
            repetitions,
            warmup,
        })
    }

    /// Timed executions per size
    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    /// Untimed executions per size
    pub fn warmup(&self) -> u32 {
        self.warmup
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            repetitions: DEFAULT_REPETITIONS,
            warmup: DEFAULT_WARMUP,
        }
    }
}

/// Mean per-call latency for one problem size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Problem size
    pub size: usize,
    /// Total timed duration divided by the repetition count
    pub mean: Duration,
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:e}", self.size, self.mean.as_secs_f64())
    }
}

/// A size whose setup, warm-up or timed run failed.
#[derive(Error, Debug)]
#[error("Exception with size {size}: {error}")]
pub struct SizeFailure {
    /// Size being measured
    pub size: usize,
    /// Underlying error
    pub error: Error,
}

/// Lazy sweep over problem sizes, see [`sweep`].
pub struct Sweep<'a, S> {
    setup: S,
    sizes: std::slice::Iter<'a, usize>,
    options: SweepOptions,
    failed: bool,
}

/// Time `setup`'s workload at every size, lazily.
///
/// Yields one `Ok(Timing)` per size in input order. After the first
/// `Err(SizeFailure)` the iterator is exhausted.
pub fn sweep<S, W>(setup: S, sizes: &[usize], options: SweepOptions) -> Sweep<'_, S>
where
    S: FnMut(usize) -> Result<W>,
    W: Workload,
{
    Sweep {
        setup,
        sizes: sizes.iter(),
        options,
        failed: false,
    }
}

fn measure<S, W>(setup: &mut S, size: usize, options: SweepOptions) -> Result<Timing>
where
    S: FnMut(usize) -> Result<W>,
    W: Workload,
{
    let mut workload = setup(size)?;
    for _ in 0..options.warmup {
        workload.run()?;
    }

    let start = Instant::now();
    for _ in 0..options.repetitions {
        workload.run()?;
    }
    let elapsed = start.elapsed();

    Ok(Timing {
        size,
        mean: elapsed / options.repetitions,
    })
}

impl<S, W> Iterator for Sweep<'_, S>
where
    S: FnMut(usize) -> Result<W>,
    W: Workload,
{
    type Item = std::result::Result<Timing, SizeFailure>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let size = *self.sizes.next()?;
        let result = measure(&mut self.setup, size, self.options)
            .map_err(|error| SizeFailure { size, error });
        self.failed = result.is_err();
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.sizes.len()))
        }
    }
}

impl<S, W> FusedIterator for Sweep<'_, S>
where
    S: FnMut(usize) -> Result<W>,
    W: Workload,
{
}

/// Run a sweep and write one line per size to `out`.
///
/// Successful sizes are written as `"<size> <seconds>"`. A failure is
/// written as `"Exception with size <size>: <error>"` and its error is
/// returned; later sizes are not measured.
pub fn run_sweep<S, W, O>(
    setup: S,
    sizes: &[usize],
    options: SweepOptions,
    out: &mut O,
) -> Result<Vec<Timing>>
where
    S: FnMut(usize) -> Result<W>,
    W: Workload,
    O: Write + ?Sized,
{
    let mut timings = Vec::with_capacity(sizes.len());
    for item in sweep(setup, sizes, options) {
        match item {
            Ok(timing) => {
                writeln!(out, "{}", timing)?;
                timings.push(timing);
            }
            Err(failure) => {
                writeln!(out, "{}", failure)?;
                return Err(failure.error);
            }
        }
    }
    Ok(timings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_size: usize) -> Result<impl Workload> {
        Ok(|| -> Result<()> { Ok(()) })
    }

    #[test]
    fn test_options_reject_zero_repetitions() {
        assert!(SweepOptions::new(0, 3).is_err());
        let opts = SweepOptions::new(1, 0).unwrap();
        assert_eq!((opts.repetitions(), opts.warmup()), (1, 0));
    }

    #[test]
    fn test_default_options() {
        let opts = SweepOptions::default();
        assert_eq!(opts.repetitions(), 10);
        assert_eq!(opts.warmup(), 3);
    }

    #[test]
    fn test_timing_display() {
        let t = Timing {
            size: 8,
            mean: Duration::from_micros(15),
        };
        assert_eq!(t.to_string(), "8 1.5e-5");
    }

    #[test]
    fn test_sweep_is_lazy() {
        let mut built = Vec::new();
        {
            let mut it = sweep(
                |size| {
                    built.push(size);
                    noop(size)
                },
                &[1, 2, 3],
                SweepOptions::default(),
            );
            assert!(it.next().unwrap().is_ok());
        }
        assert_eq!(built, vec![1]);
    }

    #[test]
    fn test_sweep_stops_after_failure() {
        let results: Vec<_> = sweep(
            |size| {
                if size == 2 {
                    Err(Error::InvalidArgument {
                        arg: "size",
                        reason: "bad size".into(),
                    })
                } else {
                    noop(size)
                }
            },
            &[1, 2, 3],
            SweepOptions::default(),
        )
        .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert_eq!(results[1].as_ref().unwrap_err().size, 2);
    }
}
