//! Compressed sparse row matrix

use crate::error::{Error, Result};

/// Sparse matrix in CSR format.
///
/// Invariants checked on construction:
/// - `row_ptrs.len() == nrows + 1`, `row_ptrs[0] == 0`, non-decreasing
/// - `row_ptrs[nrows] == col_indices.len() == values.len()`
/// - every column index is `< ncols`
#[derive(Clone, Debug, PartialEq)]
pub struct CsrMatrix {
    nrows: usize,
    ncols: usize,
    row_ptrs: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f32>,
}

impl CsrMatrix {
    /// Build a CSR matrix from its raw arrays.
    pub fn new(
        shape: [usize; 2],
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self> {
        let [nrows, ncols] = shape;

        if row_ptrs.len() != nrows + 1 {
            return Err(Error::shape_mismatch(&[nrows + 1], &[row_ptrs.len()]));
        }
        if col_indices.len() != values.len() {
            return Err(Error::shape_mismatch(&[values.len()], &[col_indices.len()]));
        }
        if row_ptrs[0] != 0 || row_ptrs[nrows] != values.len() {
            return Err(Error::InvalidArgument {
                arg: "row_ptrs",
                reason: format!(
                    "must start at 0 and end at nnz={}, got {}..{}",
                    values.len(),
                    row_ptrs[0],
                    row_ptrs[nrows]
                ),
            });
        }
        if row_ptrs.windows(2).any(|w| w[0] > w[1]) {
            return Err(Error::InvalidArgument {
                arg: "row_ptrs",
                reason: "must be non-decreasing".to_string(),
            });
        }
        if let Some(&c) = col_indices.iter().find(|&&c| c >= ncols) {
            return Err(Error::InvalidArgument {
                arg: "col_indices",
                reason: format!("column {} out of bounds for {} columns", c, ncols),
            });
        }

        Ok(Self {
            nrows,
            ncols,
            row_ptrs,
            col_indices,
            values,
        })
    }

    /// `[nrows, ncols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.nrows, self.ncols]
    }

    /// Number of rows
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row pointer array, `nrows + 1` entries
    pub fn row_ptrs(&self) -> &[usize] {
        &self.row_ptrs
    }

    /// Column index of each stored entry
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Stored values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Sparse matrix-vector product `y = A * x`.
    ///
    /// Rows are independent, so with the `rayon` feature they are computed
    /// in parallel. Accumulation is done in f64.
    pub fn spmv(&self, x: &[f32]) -> Result<Vec<f32>> {
        if x.len() != self.ncols {
            return Err(Error::shape_mismatch(&[self.ncols], &[x.len()]));
        }

        let mut y = crate::runtime::allocator::try_filled(self.nrows, 0.0f32)?;

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            y.par_iter_mut()
                .enumerate()
                .for_each(|(row, out)| *out = self.row_dot(row, x));
        }

        #[cfg(not(feature = "rayon"))]
        for (row, out) in y.iter_mut().enumerate() {
            *out = self.row_dot(row, x);
        }

        Ok(y)
    }

    #[inline]
    fn row_dot(&self, row: usize, x: &[f32]) -> f32 {
        let start = self.row_ptrs[row];
        let end = self.row_ptrs[row + 1];
        let mut sum: f64 = 0.0;
        for j in start..end {
            sum += self.values[j] as f64 * x[self.col_indices[j]] as f64;
        }
        sum as f32
    }
}
