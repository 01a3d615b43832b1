//! Sparse matrix support
//!
//! Two storage formats cover what the sparse sweep needs:
//!
//! - **COO** (Coordinate): (row, col, value) triplets. This is how the random
//!   benchmark matrices are generated. Duplicate coordinates are allowed and
//!   contribute additively, matching the usual COO semantics.
//!
//! - **CSR** (Compressed Sparse Row): row-major compressed format used by
//!   every SpMV kernel (CPU and GPU). O(nnz + nrows) storage.
//!
//! # Usage
//!
//! ```
//! use numbench::sparse::CooMatrix;
//!
//! let coo = CooMatrix::new([3, 3], vec![0, 1, 2], vec![1, 0, 2], vec![1.0, 2.0, 3.0])?;
//! let csr = coo.to_csr()?;
//! let y = csr.spmv(&[1.0, 1.0, 1.0])?;
//! assert_eq!(y, vec![1.0, 2.0, 3.0]);
//! # Ok::<(), numbench::error::Error>(())
//! ```

mod coo;
mod csr;

pub use coo::CooMatrix;
pub use csr::CsrMatrix;
