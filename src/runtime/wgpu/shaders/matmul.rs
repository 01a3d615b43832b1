//! Matrix multiplication WGSL kernel launchers
//!
//! - 2D matrix multiplication (C = A @ B)
//! - Matrix-vector multiplication (y = A @ x)

use wgpu::{Buffer, Queue};

use super::matmul_wgsl::{MATMUL_SHADER, MATVEC_SHADER, TILE_SIZE};
use super::pipeline::{LayoutKey, PipelineCache, grid_2d};
use crate::error::{Error, Result};

const LAYOUT: LayoutKey = LayoutKey {
    num_storage_buffers: 3,
    num_uniform_buffers: 1,
};

/// Launch tiled matrix multiplication kernel.
///
/// Computes C = A @ B where A is [M, K] and B is [K, N].
#[allow(clippy::too_many_arguments)]
pub fn launch_matmul(
    cache: &PipelineCache,
    queue: &Queue,
    a: &Buffer,
    b: &Buffer,
    c: &Buffer,
    params_buffer: &Buffer,
    m: usize,
    n: usize,
    max_per_dim: u32,
) -> Result<()> {
    // Workgroups in x (columns) and y (rows)
    let groups_x = n.div_ceil(TILE_SIZE as usize).max(1);
    let groups_y = m.div_ceil(TILE_SIZE as usize).max(1);
    if groups_x > max_per_dim as usize || groups_y > max_per_dim as usize {
        return Err(Error::backend_limitation(
            "wgpu",
            "matmul",
            format!(
                "{}x{} tiles exceed {} workgroups per dimension",
                groups_y, groups_x, max_per_dim
            ),
        ));
    }

    let module = cache.get_or_create_module("matmul", MATMUL_SHADER);
    let layout = cache.get_or_create_layout(LAYOUT);
    let pipeline = cache.get_or_create_pipeline("matmul", "matmul_f32", &module, &layout);

    let bind_group = cache.create_bind_group(&layout, &[a, b, c, params_buffer]);

    let mut encoder = cache
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("matmul"),
        });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("matmul"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups_x as u32, groups_y as u32, 1);
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}

/// Launch matrix-vector multiplication kernel.
///
/// Computes y = A @ x where A is [M, N]. One workgroup reduces one row.
#[allow(clippy::too_many_arguments)]
pub fn launch_matvec(
    cache: &PipelineCache,
    queue: &Queue,
    a: &Buffer,
    x: &Buffer,
    y: &Buffer,
    params_buffer: &Buffer,
    m: usize,
    max_per_dim: u32,
) -> Result<()> {
    let (groups_x, groups_y) = grid_2d(m, max_per_dim, "matvec")?;

    let module = cache.get_or_create_module("matvec", MATVEC_SHADER);
    let layout = cache.get_or_create_layout(LAYOUT);
    let pipeline = cache.get_or_create_pipeline("matvec", "matvec_f32", &module, &layout);

    let bind_group = cache.create_bind_group(&layout, &[a, x, y, params_buffer]);

    let mut encoder = cache
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("matvec"),
        });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("matvec"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}
