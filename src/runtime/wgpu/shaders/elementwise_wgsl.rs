//! WGSL shader source for elementwise addition

/// Elementwise addition: `out[i] = a[i] + b[i]`
///
/// Dispatched on a 2-D grid so element counts beyond
/// 65535 * 256 still fit in one dispatch.
pub const ADD_SHADER: &str = r#"
const WORKGROUP_SIZE: u32 = 256u;

struct AddParams {
    numel: u32,
    _pad0: u32,
    _pad1: u32,
    _pad2: u32,
}

@group(0) @binding(0) var<storage, read_write> add_a: array<f32>;
@group(0) @binding(1) var<storage, read_write> add_b: array<f32>;
@group(0) @binding(2) var<storage, read_write> add_out: array<f32>;
@group(0) @binding(3) var<uniform> add_params: AddParams;

@compute @workgroup_size(256)
fn add_f32(@builtin(global_invocation_id) gid: vec3<u32>,
           @builtin(num_workgroups) num_groups: vec3<u32>) {
    let idx = gid.y * num_groups.x * WORKGROUP_SIZE + gid.x;
    if (idx < add_params.numel) {
        add_out[idx] = add_a[idx] + add_b[idx];
    }
}
"#;
