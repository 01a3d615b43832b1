//! Coordinate-format sparse matrix

use super::CsrMatrix;
use crate::error::{Error, Result};
use crate::runtime::allocator::{try_filled, try_with_capacity};

/// Sparse matrix stored as (row, col, value) triplets.
#[derive(Clone, Debug, PartialEq)]
pub struct CooMatrix {
    nrows: usize,
    ncols: usize,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f32>,
}

impl CooMatrix {
    /// Build a COO matrix, validating triplet lengths and bounds.
    pub fn new(
        shape: [usize; 2],
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self> {
        let [nrows, ncols] = shape;
        let nnz = values.len();

        if row_indices.len() != nnz || col_indices.len() != nnz {
            return Err(Error::InvalidArgument {
                arg: "row_indices/col_indices",
                reason: format!(
                    "expected {} indices each, got {} rows and {} cols",
                    nnz,
                    row_indices.len(),
                    col_indices.len()
                ),
            });
        }
        if let Some(&r) = row_indices.iter().find(|&&r| r >= nrows) {
            return Err(Error::InvalidArgument {
                arg: "row_indices",
                reason: format!("row {} out of bounds for {} rows", r, nrows),
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
            row_indices,
            col_indices,
            values,
        })
    }

    /// `[nrows, ncols]`
    pub fn shape(&self) -> [usize; 2] {
        [self.nrows, self.ncols]
    }

    /// Number of stored entries (duplicates counted separately)
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Row index of each stored entry
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Column index of each stored entry
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Stored values
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Convert to CSR.
    ///
    /// Entries are bucketed by row with a counting pass and sorted by column
    /// within each row. Duplicates are kept as separate entries.
    pub fn to_csr(&self) -> Result<CsrMatrix> {
        let nnz = self.nnz();

        let mut row_ptrs = try_filled(self.nrows + 1, 0usize)?;
        for &r in &self.row_indices {
            row_ptrs[r + 1] += 1;
        }
        for i in 0..self.nrows {
            row_ptrs[i + 1] += row_ptrs[i];
        }

        let mut next = try_with_capacity(self.nrows)?;
        next.extend_from_slice(&row_ptrs[..self.nrows]);

        let mut col_indices = try_filled(nnz, 0usize)?;
        let mut values = try_filled(nnz, 0.0f32)?;
        for i in 0..nnz {
            let row = self.row_indices[i];
            let dst = next[row];
            next[row] += 1;
            col_indices[dst] = self.col_indices[i];
            values[dst] = self.values[i];
        }
        drop(next);

        let mut scratch: Vec<(usize, f32)> = Vec::new();
        for row in 0..self.nrows {
            let (start, end) = (row_ptrs[row], row_ptrs[row + 1]);
            if end - start < 2 {
                continue;
            }
            scratch.clear();
            scratch.extend(
                col_indices[start..end]
                    .iter()
                    .copied()
                    .zip(values[start..end].iter().copied()),
            );
            scratch.sort_by_key(|&(col, _)| col);
            for (j, &(col, val)) in scratch.iter().enumerate() {
                col_indices[start + j] = col;
                values[start + j] = val;
            }
        }

        CsrMatrix::new([self.nrows, self.ncols], row_ptrs, col_indices, values)
    }
}
