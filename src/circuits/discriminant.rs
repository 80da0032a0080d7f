//! Degree-2 discriminant `B² − 4AC` over encrypted coefficient vectors.

use super::{CircuitOutcome, RunOpts, Trace};
use crate::engine::CkksEngine;
use crate::error::WorkbenchResult;
use crate::inputs;
use crate::oracle;
use crate::params::BenchSetting;

/// Both branches are routed through the same multiply/rescale shape so the
/// final subtraction meets identical scales: `B²` is multiplied by the
/// plaintext constant 1 on the same level the `A·C` branch is multiplied by
/// 4, and both products rescale once more before subtracting.
pub fn discriminant(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = CkksEngine::builder(setting).build()?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_bb = oracle::square(&b);
    let expected_ac = oracle::mul(&a, &c);
    let expected_4ac = oracle::scale(&expected_ac, 4.0);
    let expected_disc = oracle::sub(&expected_bb, &expected_4ac);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values(&c)?;

    trace.step("B²");
    let bb = engine.square(&ct_b)?;
    trace.check(&bb, &expected_bb, "BB")?;
    let bb = engine.relinearize(&bb)?;
    trace.check(&bb, &expected_bb, "BB_RELIN")?;
    let bb = engine.rescale(&bb)?;
    trace.check(&bb, &expected_bb, "BB_RESCALE")?;

    trace.step("A·C");
    let ac = engine.multiply(&ct_a, &ct_c)?;
    trace.check(&ac, &expected_ac, "AC")?;
    let ac = engine.relinearize(&ac)?;
    trace.check(&ac, &expected_ac, "AC_RELIN")?;
    let ac = engine.rescale(&ac)?;
    trace.check(&ac, &expected_ac, "AC_RESCALE")?;

    trace.step("4·(A·C) and 1·B² on the same level");
    let four = engine.encode_scalar(4.0, inputs::DEFAULT_BINS)?;
    let four = engine.mod_switch_plain_to_level(&four, ac.level)?;
    let one = engine.encode_scalar(1.0, inputs::DEFAULT_BINS)?;
    let one = engine.mod_switch_plain_to_level(&one, bb.level)?;

    let four_ac = engine.multiply_plain(&ac, &four)?;
    trace.check(&four_ac, &expected_4ac, "4AC")?;
    let four_ac = engine.rescale(&four_ac)?;
    trace.check(&four_ac, &expected_4ac, "4AC_RESCALE")?;

    let one_bb = engine.multiply_plain(&bb, &one)?;
    let one_bb = engine.rescale(&one_bb)?;
    trace.check(&one_bb, &expected_bb, "BB_ALIGNED")?;

    trace.step("B² − 4·A·C");
    let disc = engine.sub(&one_bb, &four_ac)?;
    trace.check(&disc, &expected_disc, "DISCRIMINANT")?;

    Ok(trace.finish("discriminant"))
}
