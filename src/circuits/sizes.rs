//! Operand-size circuits: addition across different ciphertext sizes and
//! the add-latency-vs-level sweep.

use std::time::Instant;

use super::{CircuitOutcome, RunOpts, Trace};
use crate::engine::CkksEngine;
use crate::error::WorkbenchResult;
use crate::inputs;
use crate::oracle;
use crate::params::BenchSetting;

/// `A·B + C` where the un-relinearized product (three polynomials) is added
/// to a fresh two-polynomial ciphertext encrypted at the product scale. The
/// shorter operand is padded by the library; relinearize/rescale happen
/// after the addition.
pub fn add_mixed_sizes(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = CkksEngine::builder(setting).build()?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_ab = oracle::mul(&a, &b);
    let expected_sum = oracle::add(&expected_ab, &c);

    let mut trace = Trace::new(&engine, opts);
    let product_logp = engine.scale_bits() * 2;
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values_at(&c, product_logp)?;

    trace.step("A·B (left at size 3)");
    let ab = engine.multiply(&ct_a, &ct_b)?;
    trace.check(&ab, &expected_ab, "AB")?;

    trace.step("A·B + C across sizes 3 and 2");
    let sum = engine.add(&ab, &ct_c)?;
    if sum.size != 3 {
        trace.note(format!("SIZE_{}", sum.size));
    }
    trace.check(&sum, &expected_sum, "AB_PLUS_C")?;

    let sum = engine.relinearize(&sum)?;
    trace.check(&sum, &expected_sum, "AB_PLUS_C_RELIN")?;
    let sum = engine.rescale(&sum)?;
    trace.check(&sum, &expected_sum, "AB_PLUS_C_RESCALE")?;

    Ok(trace.finish("add_mixed_sizes"))
}

/// Time ciphertext addition at every level of a wide ladder.
///
/// The operand is added to itself `acc_runs` times per level, then
/// mod-switched one level down; smaller remaining moduli mean smaller
/// operands and faster additions, which is the curve this sweep records.
pub fn add_vs_level_sweep(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = CkksEngine::builder(setting).build()?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_2a = oracle::add(&a, &a);

    let mut trace = Trace::new(&engine, opts);
    let mut ct = engine.encrypt_values(&a)?;
    let reps = opts.acc_runs.max(1);

    loop {
        let mut total_us = 0.0;
        let mut doubled = engine.add(&ct, &ct)?;
        for _ in 0..reps {
            let start = Instant::now();
            doubled = engine.add(&ct, &ct)?;
            total_us += start.elapsed().as_secs_f64() * 1e6;
        }
        trace.check(&doubled, &expected_2a, &format!("ADD_L{}", ct.level))?;
        trace.note(format!(
            "level {}: add avg {:.2} us over {} reps",
            ct.level,
            total_us / reps as f64,
            reps
        ));

        if ct.level == 0 {
            break;
        }
        ct = engine.mod_switch(&ct)?;
    }

    Ok(trace.finish("add_vs_level_sweep"))
}
