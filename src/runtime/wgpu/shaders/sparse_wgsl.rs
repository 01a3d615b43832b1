//! WGSL shader source for CSR sparse matrix-vector multiplication

/// CSR SpMV: `y = A * x`
///
/// Row-parallel, one thread per row, no atomics. Rows are spread over a
/// 2-D grid like the elementwise kernels.
pub const CSR_SPMV_SHADER: &str = r#"
const WORKGROUP_SIZE: u32 = 256u;

struct SpmvParams {
    nrows: u32,
    ncols: u32,
    _pad0: u32,
    _pad1: u32,
}

// CSR format
@group(0) @binding(0) var<storage, read_write> row_ptrs: array<u32>;
@group(0) @binding(1) var<storage, read_write> col_indices: array<u32>;
@group(0) @binding(2) var<storage, read_write> values: array<f32>;
// Dense vector x
@group(0) @binding(3) var<storage, read_write> x: array<f32>;
// Output vector y
@group(0) @binding(4) var<storage, read_write> y: array<f32>;
@group(0) @binding(5) var<uniform> params: SpmvParams;

@compute @workgroup_size(256)
fn csr_spmv_f32(@builtin(global_invocation_id) gid: vec3<u32>,
                @builtin(num_workgroups) num_groups: vec3<u32>) {
    let row = gid.y * num_groups.x * WORKGROUP_SIZE + gid.x;
    if (row >= params.nrows) {
        return;
    }

    let row_start = row_ptrs[row];
    let row_end = row_ptrs[row + 1u];

    var sum: f32 = 0.0;
    for (var j: u32 = row_start; j < row_end; j = j + 1u) {
        sum = sum + values[j] * x[col_indices[j]];
    }

    y[row] = sum;
}
"#;
