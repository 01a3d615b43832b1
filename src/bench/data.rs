//! Random host operands
//!
//! Dense operands are uniform in `[0, 1)`. Sparse operands are COO triplets
//! at uniformly random coordinates; duplicate coordinates are allowed and
//! summed during SpMV.

use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::runtime::allocator::try_with_capacity;
use crate::sparse::CooMatrix;

/// Number of stored entries for a `size x size` matrix: `max(1, ceil(size² · sparsity))`.
pub fn sparse_nnz(size: usize, sparsity: f64) -> Result<usize> {
    let cells = size as f64 * size as f64;
    let nnz = (cells * sparsity).ceil().max(1.0);
    if !nnz.is_finite() || nnz >= usize::MAX as f64 {
        return Err(Error::out_of_memory::<f32>(usize::MAX));
    }
    Ok(nnz as usize)
}

/// Seeded source of benchmark operands.
#[derive(Debug)]
pub struct HostData {
    rng: StdRng,
}

impl HostData {
    /// Deterministic when `seed` is given, OS-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }

    fn uniform(&mut self, len: usize) -> Result<Vec<f32>> {
        let mut v = try_with_capacity(len)?;
        v.extend((0..len).map(|_| self.rng.random::<f32>()));
        Ok(v)
    }

    /// Dense `rows x cols` matrix.
    pub fn matrix(&mut self, rows: usize, cols: usize) -> Result<Array2<f32>> {
        let len = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::out_of_memory::<f32>(usize::MAX))?;
        let data = self.uniform(len)?;
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::InvalidArgument {
            arg: "shape",
            reason: e.to_string(),
        })
    }

    /// Dense vector of `len` elements.
    pub fn vector(&mut self, len: usize) -> Result<Array1<f32>> {
        Ok(Array1::from_vec(self.uniform(len)?))
    }

    /// Random `size x size` sparse matrix with the given fill fraction.
    pub fn sparse(&mut self, size: usize, sparsity: f64) -> Result<CooMatrix> {
        let nnz = sparse_nnz(size, sparsity)?;
        log::info!("sparse matrix: sparsity {} nnz {}", sparsity, nnz);

        let mut rows = try_with_capacity(nnz)?;
        let mut cols = try_with_capacity(nnz)?;
        for _ in 0..nnz {
            rows.push(self.rng.random_range(0..size));
            cols.push(self.rng.random_range(0..size));
        }
        let values = self.uniform(nnz)?;

        CooMatrix::new([size, size], rows, cols, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparse_nnz() {
        assert_eq!(sparse_nnz(100, 0.02).unwrap(), 200);
        assert_eq!(sparse_nnz(10, 0.015).unwrap(), 2);
        assert_eq!(sparse_nnz(1, 0.02).unwrap(), 1);
    }

    #[test]
    fn test_matrix_values_in_unit_interval() {
        let mut data = HostData::new(Some(7));
        let m = data.matrix(8, 4).unwrap();
        assert_eq!(m.dim(), (8, 4));
        assert!(m.iter().all(|&v| (0.0..1.0).contains(&v)));
    }

    #[test]
    fn test_seed_is_deterministic() {
        let a = HostData::new(Some(42)).vector(16).unwrap();
        let b = HostData::new(Some(42)).vector(16).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_sparse_shape_and_nnz() {
        let coo = HostData::new(Some(1)).sparse(100, 0.02).unwrap();
        assert_eq!(coo.shape(), [100, 100]);
        assert_eq!(coo.nnz(), 200);
        assert!(coo.row_indices().iter().all(|&r| r < 100));
        assert!(coo.col_indices().iter().all(|&c| c < 100));
    }

    #[test]
    fn test_oversized_matrix_is_an_error() {
        let err = HostData::new(Some(1)).matrix(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, Error::OutOfMemory { .. }));
    }
}
