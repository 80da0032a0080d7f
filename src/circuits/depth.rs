//! Depth and precision circuits: multiplication chains, accumulating
//! additions, squares, negations, plaintext multiplications and the Galois
//! rotation probe.

use super::{CircuitOutcome, RunOpts, Trace};
use crate::engine::CkksEngine;
use crate::error::WorkbenchResult;
use crate::inputs;
use crate::oracle;
use crate::params::BenchSetting;

fn build(setting: BenchSetting) -> WorkbenchResult<CkksEngine> {
    Ok(CkksEngine::builder(setting).build()?)
}

/// `(A·B)·C`: relinearize/rescale after the first product, decrypt the
/// second one at its product scale.
///
/// On a three-prime ladder the second multiplication happens on the last
/// prime of the chain, where the product scale no longer fits the modulus;
/// the library rejects it, which is the failure the shallow entry
/// demonstrates.
pub fn mul_depth_abc(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_ab = oracle::mul(&a, &b);
    let expected_abc = oracle::mul(&expected_ab, &c);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values(&c)?;

    trace.step("A·B");
    let ab = engine.multiply(&ct_a, &ct_b)?;
    trace.check(&ab, &expected_ab, "AB")?;
    let ab = engine.relinearize(&ab)?;
    trace.check(&ab, &expected_ab, "AB_RELIN")?;
    let ab = engine.rescale(&ab)?;
    trace.check(&ab, &expected_ab, "AB_RESCALE")?;

    trace.step("(A·B)·C");
    let ct_c = engine.mod_switch_to_level(&ct_c, ab.level)?;
    let abc = engine.multiply(&ab, &ct_c)?;
    trace.check(&abc, &expected_abc, "ABC")?;
    let abc = engine.relinearize(&abc)?;
    trace.check(&abc, &expected_abc, "ABC_RELIN")?;

    Ok(trace.finish("mul_depth_abc"))
}

/// `((A·B)·C)·D`: one multiplication deeper than the four-prime ladder
/// supports. The last product lands on the final prime where its scale no
/// longer fits, the deep-chain failure demonstration.
pub fn mul_depth_abcd_chain(
    setting: BenchSetting,
    opts: &RunOpts,
) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let d = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_ab = oracle::mul(&a, &b);
    let expected_abc = oracle::mul(&expected_ab, &c);
    let expected_abcd = oracle::mul(&expected_abc, &d);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values(&c)?;
    let ct_d = engine.encrypt_values(&d)?;

    trace.step("A·B");
    let ab = engine.multiply(&ct_a, &ct_b)?;
    let ab = engine.relinearize(&ab)?;
    let ab = engine.rescale(&ab)?;
    trace.check(&ab, &expected_ab, "AB")?;

    trace.step("(A·B)·C");
    let ct_c = engine.mod_switch_to_level(&ct_c, ab.level)?;
    let abc = engine.multiply(&ab, &ct_c)?;
    let abc = engine.relinearize(&abc)?;
    let abc = engine.rescale(&abc)?;
    trace.check(&abc, &expected_abc, "ABC")?;

    trace.step("((A·B)·C)·D");
    let ct_d = engine.mod_switch_to_level(&ct_d, abc.level)?;
    let abcd = engine.multiply(&abc, &ct_d)?;
    let abcd = engine.relinearize(&abcd)?;
    trace.check(&abcd, &expected_abcd, "ABCD_FINAL")?;

    Ok(trace.finish("mul_depth_abcd_chain"))
}

/// `(A·B)·(C·D)`: the rebalanced tree that fits the same four-prime ladder.
pub fn mul_depth_abcd_balanced(
    setting: BenchSetting,
    opts: &RunOpts,
) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let d = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_ab = oracle::mul(&a, &b);
    let expected_cd = oracle::mul(&c, &d);
    let expected_abcd = oracle::mul(&expected_ab, &expected_cd);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values(&c)?;
    let ct_d = engine.encrypt_values(&d)?;

    trace.step("A·B");
    let ab = engine.multiply(&ct_a, &ct_b)?;
    let ab = engine.relinearize(&ab)?;
    let ab = engine.rescale(&ab)?;
    trace.check(&ab, &expected_ab, "AB")?;

    trace.step("C·D");
    let cd = engine.multiply(&ct_c, &ct_d)?;
    let cd = engine.relinearize(&cd)?;
    let cd = engine.rescale(&cd)?;
    trace.check(&cd, &expected_cd, "CD")?;

    trace.step("(A·B)·(C·D)");
    let abcd = engine.multiply(&ab, &cd)?;
    let abcd = engine.relinearize(&abcd)?;
    trace.check(&abcd, &expected_abcd, "ABCD")?;

    Ok(trace.finish("mul_depth_abcd_balanced"))
}

/// `A + A + … + A`: additions keep scale and level, so the accumulator can
/// run arbitrarily long on any ladder.
pub fn add_accumulate(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;

    trace.step("A + A");
    let mut acc = engine.add(&ct_a, &ct_a)?;
    let mut expected = oracle::add(&a, &a);
    trace.check(&acc, &expected, "ACC_2")?;

    for i in 2..opts.acc_runs {
        acc = engine.add(&acc, &ct_a)?;
        expected = oracle::add(&expected, &a);
        trace.check(&acc, &expected, &format!("ACC_{}", i + 1))?;
    }

    Ok(trace.finish("add_accumulate"))
}

/// `(A·B) + C + … + C` with the addend encrypted at the product scale, so
/// every addition meets exactly matching scales.
pub fn muladd_accumulate(
    setting: BenchSetting,
    opts: &RunOpts,
) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let b = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let c = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;

    let mut trace = Trace::new(&engine, opts);
    let product_logp = engine.scale_bits() * 2;
    let ct_a = engine.encrypt_values(&a)?;
    let ct_b = engine.encrypt_values(&b)?;
    let ct_c = engine.encrypt_values_at(&c, product_logp)?;

    trace.step("A·B");
    let ab = engine.multiply(&ct_a, &ct_b)?;
    let ab = engine.relinearize(&ab)?;
    let mut expected = oracle::mul(&a, &b);
    trace.check(&ab, &expected, "AB")?;

    trace.step("(A·B) + C + … + C");
    let mut acc = ab;
    for i in 0..opts.acc_runs {
        acc = engine.add(&acc, &ct_c)?;
        expected = oracle::add(&expected, &c);
        trace.check(&acc, &expected, &format!("MULADD_{}", i + 1))?;
    }

    let acc = engine.rescale(&acc)?;
    trace.check(&acc, &expected, "MULADD_RESCALE")?;

    Ok(trace.finish("muladd_accumulate"))
}

/// `(A²)²` with relinearize/rescale between the squarings.
pub fn square_depth(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_aa = oracle::square(&a);
    let expected_a4 = oracle::square(&expected_aa);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;

    trace.step("A²");
    let aa = engine.square(&ct_a)?;
    trace.check(&aa, &expected_aa, "AA")?;
    let aa = engine.relinearize(&aa)?;
    trace.check(&aa, &expected_aa, "AA_RELIN")?;
    let aa = engine.rescale(&aa)?;
    trace.check(&aa, &expected_aa, "AA_RESCALE")?;

    trace.step("(A²)²");
    let a4 = engine.square(&aa)?;
    let a4 = engine.relinearize(&a4)?;
    trace.check(&a4, &expected_a4, "A4_FINAL")?;

    Ok(trace.finish("square_depth"))
}

/// `neg(neg(…neg(A)))` repeated `acc_runs` times.
pub fn negate_chain(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;

    let mut trace = Trace::new(&engine, opts);
    let mut ct = engine.encrypt_values(&a)?;
    let mut expected = a;

    trace.step("negation chain");
    for i in 0..opts.acc_runs {
        ct = engine.negate(&ct)?;
        expected = oracle::neg(&expected);
        trace.check(&ct, &expected, &format!("NEG_{}", i + 1))?;
    }

    Ok(trace.finish("negate_chain"))
}

/// Galois rotation probe. The binding only exposes the batching rotation
/// entry points, which this library build rejects for the CKKS scheme; the
/// circuit records that instead of crashing, and starts passing the moment
/// the binding gains a CKKS rotation.
pub fn rotate_depth(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;

    let mut trace = Trace::new(&engine, opts);
    let mut ct = engine.encrypt_values(&a)?;
    let mut expected = a;

    trace.step("rotation chain");
    for i in 0..opts.acc_runs {
        match engine.rotate(&ct, 1) {
            Ok(rotated) => {
                ct = rotated;
                expected = oracle::rotate_left(&expected, 1);
                trace.check(&ct, &expected, &format!("ROT_{}", i + 1))?;
            }
            Err(err) => {
                trace.note(format!("ROTATE_UNSUPPORTED: {err}"));
                let mut outcome = trace.finish("rotate_depth");
                outcome.passed = false;
                return Ok(outcome);
            }
        }
    }

    Ok(trace.finish("rotate_depth"))
}

/// `2·(2·A)` by plaintext multiplication with a rescale between the steps.
pub fn mulplain_depth(setting: BenchSetting, opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let engine = build(setting)?;
    let mut rng = inputs::seeded_rng(opts.seed);
    let limit = opts.range_limit;
    let a = inputs::uniform_f64(&mut rng, inputs::DEFAULT_BINS, -limit, limit)?;
    let expected_2a = oracle::scale(&a, 2.0);
    let expected_4a = oracle::scale(&a, 4.0);

    let mut trace = Trace::new(&engine, opts);
    let ct_a = engine.encrypt_values(&a)?;
    let two = engine.encode_scalar(2.0, inputs::DEFAULT_BINS)?;

    trace.step("2·A");
    let doubled = engine.multiply_plain(&ct_a, &two)?;
    trace.check(&doubled, &expected_2a, "MULPLAIN_1")?;
    let doubled = engine.rescale(&doubled)?;
    trace.check(&doubled, &expected_2a, "MULPLAIN_1_RESCALE")?;

    trace.step("2·(2·A)");
    let two_down = engine.mod_switch_plain_to_level(&two, doubled.level)?;
    let quadrupled = engine.multiply_plain(&doubled, &two_down)?;
    trace.check(&quadrupled, &expected_4a, "MULPLAIN_2")?;
    let quadrupled = engine.rescale(&quadrupled)?;
    trace.check(&quadrupled, &expected_4a, "MULPLAIN_FINAL")?;

    Ok(trace.finish("mulplain_depth"))
}

/// Cleartext Halley iteration for `1/√S`: the prototyping routine for a
/// homomorphic square root, all additions and multiplications.
pub fn halley_demo(opts: &RunOpts) -> WorkbenchResult<CircuitOutcome> {
    let s = 25.0;
    let x0 = 0.3;
    let steps = opts.acc_runs.max(8);
    let iterates = oracle::halley_inv_sqrt(s, x0, steps);

    if !opts.quiet {
        println!("Halley iteration for 1/sqrt({s}), x0 = {x0}");
        for (i, x) in iterates.iter().enumerate() {
            println!("  step {:>2}: x = {x:.10}  S·x = {:.10}", i + 1, s * x);
        }
    }

    let last = iterates.last().copied().unwrap_or(x0);
    let worst = oracle::relative_error_pct(s.sqrt(), s * last);
    Ok(CircuitOutcome {
        title: "halley_demo".to_string(),
        passed: worst <= oracle::DEFAULT_TOLERANCE_PCT,
        worst_error_pct: worst,
        notes: Vec::new(),
    })
}
