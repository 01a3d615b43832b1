//! Timed statements and the setups that build them
//!
//! A setup turns a problem size into a [`Workload`]: operands already on the
//! device plus the statement to run. Running a workload executes the
//! statement once and waits for the device, so wall-clock time covers the
//! actual work.

use crate::bench::data::HostData;
use crate::error::Result;
use crate::ops::{DenseOps, SparseOps};
use crate::runtime::{Runtime, RuntimeClient};

/// One executable benchmark statement.
pub trait Workload {
    /// Execute the statement once, to completion.
    fn run(&mut self) -> Result<()>;
}

impl<F> Workload for F
where
    F: FnMut() -> Result<()>,
{
    fn run(&mut self) -> Result<()> {
        self()
    }
}

/// Dense statement timed by a [`DenseWorkload`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DenseStatement {
    /// `C = A + B`
    Add,
    /// `C = A @ B`
    Matmul,
    /// `y = A @ x`
    Matvec,
}

enum DenseOperands<R: Runtime> {
    Pair(R::Matrix, R::Matrix),
    MatrixVector(R::Matrix, R::Vector),
}

/// Square dense operands resident on a runtime's device.
pub struct DenseWorkload<R: Runtime> {
    client: R::Client,
    statement: DenseStatement,
    operands: DenseOperands<R>,
}

impl<R> DenseWorkload<R>
where
    R: Runtime,
    R::Client: DenseOps<R>,
{
    /// Generate `size x size` operands and upload them to the default device.
    pub fn new(statement: DenseStatement, size: usize, data: &mut HostData) -> Result<Self> {
        let device = R::default_device();
        let client = R::default_client(&device)?;

        let a = client.upload_matrix(data.matrix(size, size)?)?;
        let operands = match statement {
            DenseStatement::Add | DenseStatement::Matmul => {
                DenseOperands::Pair(a, client.upload_matrix(data.matrix(size, size)?)?)
            }
            DenseStatement::Matvec => {
                DenseOperands::MatrixVector(a, client.upload_vector(data.vector(size)?)?)
            }
        };
        client.flush()?;

        Ok(Self {
            client,
            statement,
            operands,
        })
    }
}

impl<R> Workload for DenseWorkload<R>
where
    R: Runtime,
    R::Client: DenseOps<R>,
{
    fn run(&mut self) -> Result<()> {
        match (&self.operands, self.statement) {
            (DenseOperands::Pair(a, b), DenseStatement::Add) => {
                let _c = self.client.add(a, b)?;
                self.client.synchronize()
            }
            (DenseOperands::Pair(a, b), _) => {
                let _c = self.client.matmul(a, b)?;
                self.client.synchronize()
            }
            (DenseOperands::MatrixVector(a, x), _) => {
                let _y = self.client.matvec(a, x)?;
                self.client.synchronize()
            }
        }
    }
}

/// Square CSR operand and dense vector resident on a runtime's device.
pub struct SparseWorkload<R>
where
    R: Runtime,
    R::Client: SparseOps<R>,
{
    client: R::Client,
    a: <R::Client as SparseOps<R>>::SparseMatrix,
    x: R::Vector,
}

impl<R> SparseWorkload<R>
where
    R: Runtime,
    R::Client: SparseOps<R> + DenseOps<R>,
{
    /// Generate a random `size x size` CSR matrix and a dense vector.
    pub fn new(size: usize, sparsity: f64, data: &mut HostData) -> Result<Self> {
        let device = R::default_device();
        let client = R::default_client(&device)?;

        let csr = data.sparse(size, sparsity)?.to_csr()?;
        let a = client.upload_csr(csr)?;
        let x = client.upload_vector(data.vector(size)?)?;
        client.flush()?;

        Ok(Self { client, a, x })
    }
}

impl<R> Workload for SparseWorkload<R>
where
    R: Runtime,
    R::Client: SparseOps<R>,
{
    fn run(&mut self) -> Result<()> {
        let _y = self.client.spmv(&self.a, &self.x)?;
        self.client.synchronize()
    }
}

/// Setup for a dense sweep on runtime `R`.
pub fn dense_setup<R>(
    statement: DenseStatement,
    seed: Option<u64>,
) -> impl FnMut(usize) -> Result<DenseWorkload<R>>
where
    R: Runtime,
    R::Client: DenseOps<R>,
{
    let mut data = HostData::new(seed);
    move |size| {
        log::debug!("{:?} setup on {}: size {}", statement, R::name(), size);
        DenseWorkload::new(statement, size, &mut data)
    }
}

/// Setup for a sparse sweep on runtime `R`.
pub fn sparse_setup<R>(
    sparsity: f64,
    seed: Option<u64>,
) -> impl FnMut(usize) -> Result<SparseWorkload<R>>
where
    R: Runtime,
    R::Client: SparseOps<R> + DenseOps<R>,
{
    let mut data = HostData::new(seed);
    move |size| {
        log::debug!("spmv setup on {}: size {}", R::name(), size);
        SparseWorkload::new(size, sparsity, &mut data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuRuntime;

    #[test]
    fn test_closure_is_a_workload() {
        let mut calls = 0;
        let mut w = || -> Result<()> {
            calls += 1;
            Ok(())
        };
        w.run().unwrap();
        w.run().unwrap();
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_dense_setup_runs_each_statement() {
        for statement in [
            DenseStatement::Add,
            DenseStatement::Matmul,
            DenseStatement::Matvec,
        ] {
            let mut setup = dense_setup::<CpuRuntime>(statement, Some(3));
            let mut workload = setup(8).unwrap();
            workload.run().unwrap();
        }
    }

    #[test]
    fn test_sparse_setup_runs() {
        let mut setup = sparse_setup::<CpuRuntime>(0.02, Some(3));
        let mut workload = setup(100).unwrap();
        workload.run().unwrap();
    }
}
