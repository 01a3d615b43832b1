//! WGSL shader sources for dense matrix products
//!
//! Tiled matrix-matrix multiplication and a shared-memory reduction for
//! matrix-vector multiplication. Row-major storage throughout.

/// Tile edge for the tiled matmul (must match `TILE_SIZE` in the shader)
pub const TILE_SIZE: u32 = 16;

/// Matrix multiplication shader: `C = A @ B`, A is [M, K], B is [K, N]
pub const MATMUL_SHADER: &str = r#"
const TILE_SIZE: u32 = 16u;

var<workgroup> tile_a: array<array<f32, 16>, 16>;
var<workgroup> tile_b: array<array<f32, 16>, 16>;

struct MatmulParams {
    M: u32,
    K: u32,
    N: u32,
    _pad0: u32,
}

@group(0) @binding(0) var<storage, read_write> matmul_a: array<f32>;
@group(0) @binding(1) var<storage, read_write> matmul_b: array<f32>;
@group(0) @binding(2) var<storage, read_write> matmul_c: array<f32>;
@group(0) @binding(3) var<uniform> matmul_params: MatmulParams;

// Each workgroup computes a TILE_SIZE x TILE_SIZE tile of the output.
@compute @workgroup_size(16, 16, 1)
fn matmul_f32(@builtin(local_invocation_id) local_id: vec3<u32>,
              @builtin(workgroup_id) group_id: vec3<u32>) {
    let M = matmul_params.M;
    let K = matmul_params.K;
    let N = matmul_params.N;

    let row = group_id.y * TILE_SIZE + local_id.y;
    let col = group_id.x * TILE_SIZE + local_id.x;

    var sum: f32 = 0.0;
    let num_tiles = (K + TILE_SIZE - 1u) / TILE_SIZE;

    for (var t: u32 = 0u; t < num_tiles; t = t + 1u) {
        let a_col = t * TILE_SIZE + local_id.x;
        if (row < M && a_col < K) {
            tile_a[local_id.y][local_id.x] = matmul_a[row * K + a_col];
        } else {
            tile_a[local_id.y][local_id.x] = 0.0;
        }

        let b_row = t * TILE_SIZE + local_id.y;
        if (b_row < K && col < N) {
            tile_b[local_id.y][local_id.x] = matmul_b[b_row * N + col];
        } else {
            tile_b[local_id.y][local_id.x] = 0.0;
        }

        workgroupBarrier();

        for (var k: u32 = 0u; k < TILE_SIZE; k = k + 1u) {
            sum = sum + tile_a[local_id.y][k] * tile_b[k][local_id.x];
        }

        workgroupBarrier();
    }

    if (row < M && col < N) {
        matmul_c[row * N + col] = sum;
    }
}
"#;

/// Matrix-vector shader: `y = A @ x`, A is [M, N]
///
/// One workgroup per row; rows are spread over a 2-D grid of workgroups.
pub const MATVEC_SHADER: &str = r#"
struct MatvecParams {
    M: u32,
    N: u32,
    _pad0: u32,
    _pad1: u32,
}

@group(0) @binding(0) var<storage, read_write> matvec_a: array<f32>;
@group(0) @binding(1) var<storage, read_write> matvec_x: array<f32>;
@group(0) @binding(2) var<storage, read_write> matvec_y: array<f32>;
@group(0) @binding(3) var<uniform> matvec_params: MatvecParams;

var<workgroup> matvec_shared: array<f32, 256>;

@compute @workgroup_size(256)
fn matvec_f32(@builtin(local_invocation_id) local_id: vec3<u32>,
              @builtin(workgroup_id) group_id: vec3<u32>,
              @builtin(num_workgroups) num_groups: vec3<u32>) {
    let tid = local_id.x;
    let row = group_id.y * num_groups.x + group_id.x;
    let N = matvec_params.N;

    // Out-of-range workgroups still take part in the barriers below.
    var sum: f32 = 0.0;
    if (row < matvec_params.M) {
        let row_offset = row * N;
        var i: u32 = tid;
        while (i < N) {
            sum = sum + matvec_a[row_offset + i] * matvec_x[i];
            i = i + 256u;
        }
    }

    matvec_shared[tid] = sum;
    workgroupBarrier();

    for (var s: u32 = 128u; s > 0u; s = s >> 1u) {
        if (tid < s) {
            matvec_shared[tid] = matvec_shared[tid] + matvec_shared[tid + s];
        }
        workgroupBarrier();
    }

    if (tid == 0u && row < matvec_params.M) {
        matvec_y[row] = matvec_shared[0];
    }
}
"#;
