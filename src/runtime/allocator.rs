//! Fallible host allocation
//!
//! Benchmark sizes are chosen to probe the limits of each backend, so the
//! largest configured sizes routinely exceed host memory. Allocating through
//! these helpers turns that into `Error::OutOfMemory` for the size being
//! measured instead of aborting the whole process.

use crate::error::{Error, Result};

/// Allocate an empty vector with room for `len` elements.
pub fn try_with_capacity<T>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| Error::out_of_memory::<T>(len))?;
    Ok(v)
}

/// Allocate a vector of `len` copies of `value`.
pub fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut v = try_with_capacity(len)?;
    v.resize(len, value);
    Ok(v)
}
