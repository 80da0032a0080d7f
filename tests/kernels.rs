//! Smoke test for the kernel benchmark suites: a short campaign at the
//! reference point must verify cleanly, fill every measurable series and
//! emit a well-formed CSV file.

use ckks_workbench::kernels::{self, BenchConfig};
use ckks_workbench::params::{EncMode, reference_8192_4};

#[test]
fn short_expression_campaign_verifies_and_reports() {
    let out_dir = std::env::temp_dir().join("ckks-workbench-kernels-test");
    let cfg = BenchConfig {
        runs: 2,
        out_dir: Some(out_dir.clone()),
        ..BenchConfig::default()
    };
    let settings = [reference_8192_4(EncMode::Symmetric)];

    let reports = kernels::run_expression_suite(&settings, &cfg).expect("suite failed");
    assert_eq!(reports.len(), 1);
    let report = &reports[0];

    assert!(
        report.outcome.passed,
        "outcome notes: {:?}",
        report.outcome.notes
    );
    assert_eq!(report.stats.kernels.len(), 13);

    let mut rotate_runs = 0;
    for kernel in &report.stats.kernels {
        match kernel.kernel.as_str() {
            // Rotation depends on the library build: either every run
            // sampled it or the rejection was recorded in the outcome.
            "ROTATE" => rotate_runs = kernel.runs,
            _ => assert_eq!(kernel.runs, 2, "kernel {} lost samples", kernel.kernel),
        }
    }
    let rotate_noted = report
        .outcome
        .notes
        .iter()
        .any(|n| n.contains("ROTATE_UNSUPPORTED"));
    assert!(
        rotate_runs == 2 || rotate_noted,
        "rotation neither sampled nor recorded as unsupported"
    );

    let csv = report.csv.as_ref().expect("csv path missing");
    let body = std::fs::read_to_string(csv).expect("csv not written");
    assert!(body.contains("ENCODE"));
    assert!(body.contains("Avg,"));
    std::fs::remove_file(csv).ok();
}

#[test]
fn short_elementary_campaign_round_trips() {
    let cfg = BenchConfig {
        runs: 2,
        out_dir: None,
        ..BenchConfig::default()
    };
    let settings = [reference_8192_4(EncMode::Asymmetric)];

    let reports = kernels::run_elementary_suite(&settings, &cfg).expect("suite failed");
    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(
        report.outcome.passed,
        "outcome notes: {:?}",
        report.outcome.notes
    );
    assert!(report.csv.is_none());
}
