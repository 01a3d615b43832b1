//! CSR SpMV kernel launcher

use wgpu::{Buffer, Queue};

use super::pipeline::{LayoutKey, PipelineCache, grid_2d, workgroup_count};
use super::sparse_wgsl::CSR_SPMV_SHADER;
use crate::error::Result;

/// Launch CSR SpMV: `y = A * x`, one thread per row.
#[allow(clippy::too_many_arguments)]
pub fn launch_csr_spmv(
    cache: &PipelineCache,
    queue: &Queue,
    row_ptrs: &Buffer,
    col_indices: &Buffer,
    values: &Buffer,
    x: &Buffer,
    y: &Buffer,
    params_buffer: &Buffer,
    nrows: usize,
    max_per_dim: u32,
) -> Result<()> {
    let (groups_x, groups_y) = grid_2d(workgroup_count(nrows), max_per_dim, "spmv")?;

    let module = cache.get_or_create_module("csr_spmv", CSR_SPMV_SHADER);
    let layout = cache.get_or_create_layout(LayoutKey {
        num_storage_buffers: 5,
        num_uniform_buffers: 1,
    });
    let pipeline = cache.get_or_create_pipeline("csr_spmv", "csr_spmv_f32", &module, &layout);

    let bind_group = cache.create_bind_group(
        &layout,
        &[row_ptrs, col_indices, values, x, y, params_buffer],
    );

    let mut encoder = cache
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("csr_spmv"),
        });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("csr_spmv"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}
