//! End-to-end circuit correctness at the parameter points the campaign
//! marks `ok`. The shallow `error`/`precision` entries demonstrate failure
//! modes by design and are exercised through the CLI, not asserted here.

use ckks_workbench::circuits::{self, RunOpts};

fn run_ok(id: u32) {
    let entry = circuits::find(id).expect("missing catalogue entry");
    assert_eq!(entry.tag, "ok", "entry {id} is not an ok-tagged circuit");
    let opts = RunOpts {
        quiet: true,
        ..RunOpts::default()
    };
    let outcome = (entry.run)(&opts).expect("circuit raised a library error");
    assert!(
        outcome.passed,
        "{}: worst error {:.4}%, notes {:?}",
        outcome.title, outcome.worst_error_pct, outcome.notes
    );
}

#[test]
fn mul_depth_abc_at_the_reference_point() {
    run_ok(3);
}

#[test]
fn mul_depth_balanced_tree_at_the_reference_point() {
    run_ok(5);
}

#[test]
fn add_accumulate_at_the_reference_point() {
    run_ok(8);
}

#[test]
fn muladd_accumulate_at_the_reference_point() {
    run_ok(11);
}

#[test]
fn square_depth_at_the_reference_point() {
    run_ok(14);
}

#[test]
fn negate_chain_at_the_reference_point() {
    run_ok(16);
}

#[test]
fn mulplain_depth_at_the_reference_point() {
    run_ok(20);
}

#[test]
fn discriminant_at_the_reference_point() {
    run_ok(22);
}

#[test]
fn mixed_size_add_at_the_reference_point() {
    run_ok(23);
}

#[test]
fn add_latency_sweep_stays_correct_at_every_level() {
    let entry = circuits::find(24).expect("missing catalogue entry");
    let opts = RunOpts {
        quiet: true,
        acc_runs: 3,
        ..RunOpts::default()
    };
    let outcome = (entry.run)(&opts).expect("sweep raised a library error");
    assert!(outcome.passed, "notes {:?}", outcome.notes);
    // One timing note per level of the six-prime ladder.
    let timing_notes = outcome
        .notes
        .iter()
        .filter(|n| n.contains("add avg"))
        .count();
    assert_eq!(timing_notes, 5);
}

#[test]
fn halley_demo_converges() {
    let entry = circuits::find(25).expect("missing catalogue entry");
    let opts = RunOpts {
        quiet: true,
        ..RunOpts::default()
    };
    let outcome = (entry.run)(&opts).expect("cleartext demo cannot fail");
    assert!(outcome.passed);
}

#[test]
#[ignore = "CKKS rotation is not supported by this build of the bindings"]
fn rotate_depth_at_the_reference_point() {
    let entry = circuits::find(17).expect("missing catalogue entry");
    let opts = RunOpts {
        quiet: true,
        ..RunOpts::default()
    };
    let outcome = (entry.run)(&opts).expect("circuit raised a library error");
    assert!(outcome.passed, "notes {:?}", outcome.notes);
}
