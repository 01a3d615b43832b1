//! Elementwise WGSL kernel launchers

use wgpu::{Buffer, Queue};

use super::elementwise_wgsl::ADD_SHADER;
use super::pipeline::{LayoutKey, PipelineCache, grid_2d, workgroup_count};
use crate::error::Result;

/// Launch `out = a + b` over `numel` elements.
#[allow(clippy::too_many_arguments)]
pub fn launch_add(
    cache: &PipelineCache,
    queue: &Queue,
    a: &Buffer,
    b: &Buffer,
    out: &Buffer,
    params_buffer: &Buffer,
    numel: usize,
    max_per_dim: u32,
) -> Result<()> {
    let (groups_x, groups_y) = grid_2d(workgroup_count(numel), max_per_dim, "add")?;

    let module = cache.get_or_create_module("elementwise", ADD_SHADER);
    let layout = cache.get_or_create_layout(LayoutKey {
        num_storage_buffers: 3,
        num_uniform_buffers: 1,
    });
    let pipeline = cache.get_or_create_pipeline("elementwise", "add_f32", &module, &layout);

    let bind_group = cache.create_bind_group(&layout, &[a, b, out, params_buffer]);

    let mut encoder = cache
        .device()
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("add"),
        });

    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("add"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, Some(&bind_group), &[]);
        pass.dispatch_workgroups(groups_x, groups_y, 1);
    }

    queue.submit(std::iter::once(encoder.finish()));
    Ok(())
}
