//! End-to-end suite report on the CPU platform

use numbench::bench::{Capabilities, Operation, Platform, run_suite};
use numbench::config::{BenchConfig, OperationToggles, PlatformToggles, SizeLists};

fn cpu_config(ops: &[Operation], sizes: SizeLists) -> BenchConfig {
    BenchConfig {
        platforms: PlatformToggles::only(&[Platform::Cpu]),
        operations: OperationToggles::only(ops),
        sizes,
        repetitions: 2,
        warmup: 1,
        seed: Some(5),
        ..Default::default()
    }
}

#[test]
fn test_full_cpu_report_layout() {
    let sizes = SizeLists {
        add: vec![8, 16],
        gemm: vec![8],
        gemv: vec![8, 16],
        spgemv: vec![100],
    };
    let config = cpu_config(&Operation::ALL, sizes);

    let mut out = Vec::new();
    run_suite(&config, &Capabilities::cpu_only(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines,
        vec![
            "Dense matrix elementwise addition -- ndarray",
            lines[1],
            lines[2],
            "",
            "Dense matrix multiplication -- ndarray",
            lines[5],
            "",
            "Dense matrix-vector multiplication -- ndarray",
            lines[8],
            lines[9],
            "",
            "Sparse matrix-vector multiplication -- CSR (CPU)",
            "Sparsity: 0.020000",
            lines[13],
            "",
        ]
    );
    for (line, size) in [(1, "8"), (2, "16"), (5, "8"), (8, "8"), (9, "16"), (13, "100")] {
        let mut parts = lines[line].split(' ');
        assert_eq!(parts.next(), Some(size));
        let secs: f64 = parts.next().unwrap().parse().unwrap();
        assert!(secs >= 0.0);
    }
}

#[test]
fn test_disabled_platforms_print_nothing() {
    let mut config = cpu_config(&Operation::ALL, SizeLists::default());
    config.platforms = PlatformToggles::only(&[]);

    let mut out = Vec::new();
    run_suite(&config, &Capabilities::cpu_only(), &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_invalid_config_stops_before_output() {
    let mut config = cpu_config(&[Operation::Add], SizeLists::default());
    config.sparsity = 0.0;

    let mut out = Vec::new();
    assert!(run_suite(&config, &Capabilities::cpu_only(), &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_failing_size_stops_the_suite() {
    // 2^40 x 2^40 dense matrices cannot be allocated
    let sizes = SizeLists {
        add: vec![8, 1 << 40, 16],
        ..Default::default()
    };
    let config = cpu_config(&[Operation::Add, Operation::Gemm], sizes);

    let mut out = Vec::new();
    let err = run_suite(&config, &Capabilities::cpu_only(), &mut out).unwrap_err();
    assert!(err.to_string().contains("Out of memory"));

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("8 "));
    assert!(lines[2].starts_with(&format!("Exception with size {}:", 1u64 << 40)));
    assert!(!text.contains("Dense matrix multiplication"));
}
