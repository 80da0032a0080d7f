//! Engine facade behavior against a live library context: encode/encrypt
//! round trips and the chain bookkeeping that every circuit builds on.

use approx::assert_relative_eq;
use ckks_workbench::params::reference_8192_4;
use ckks_workbench::{CkksEngine, EncMode, EngineError, inputs};

fn engine(mode: EncMode) -> CkksEngine {
    CkksEngine::builder(reference_8192_4(mode))
        .build()
        .expect("engine setup failed")
}

#[test]
fn fresh_roundtrip_preserves_input_in_both_modes() {
    for mode in [EncMode::Symmetric, EncMode::Asymmetric] {
        let engine = engine(mode);
        let mut rng = inputs::seeded_rng(42);
        let values = inputs::uniform_f64(&mut rng, 10, -100.0, 100.0).unwrap();

        let ct = engine.encrypt_values(&values).unwrap();
        assert_eq!(ct.size, 2);
        assert_eq!(ct.level, 2);
        assert_eq!(ct.logp, 40);

        let decoded = engine.decrypt_to_vec(&ct, values.len()).unwrap();
        for (expected, actual) in values.iter().zip(&decoded) {
            assert_relative_eq!(*expected, *actual, max_relative = 1e-6);
        }
    }
}

#[test]
fn bookkeeping_tracks_a_multiply_relinearize_rescale_chain() {
    let engine = engine(EncMode::Symmetric);
    let mut rng = inputs::seeded_rng(7);
    let a = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();
    let b = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();

    let ct_a = engine.encrypt_values(&a).unwrap();
    let ct_b = engine.encrypt_values(&b).unwrap();

    let product = engine.multiply(&ct_a, &ct_b).unwrap();
    assert_eq!(product.size, 3);
    assert_eq!(product.logp, 80);
    assert_eq!(product.level, 2);

    let relined = engine.relinearize(&product).unwrap();
    assert_eq!(relined.size, 2);
    assert_eq!(relined.logp, 80);

    let rescaled = engine.rescale(&relined).unwrap();
    assert_eq!(rescaled.size, 2);
    assert_eq!(rescaled.logp, 40);
    assert_eq!(rescaled.level, 1);

    let switched = engine.mod_switch(&rescaled).unwrap();
    assert_eq!(switched.logp, 40);
    assert_eq!(switched.level, 0);

    // The decrypted product is still the slotwise a·b.
    let decoded = engine.decrypt_to_vec(&switched, a.len()).unwrap();
    for ((x, y), actual) in a.iter().zip(&b).zip(&decoded) {
        assert_relative_eq!(x * y, *actual, max_relative = 1e-3, epsilon = 1e-3);
    }
}

#[test]
fn misaligned_operands_are_rejected_by_the_bookkeeping() {
    let engine = engine(EncMode::Symmetric);
    let mut rng = inputs::seeded_rng(11);
    let a = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();

    let at_nominal = engine.encrypt_values(&a).unwrap();
    let at_product = engine.encrypt_values_at(&a, 80).unwrap();
    assert!(matches!(
        engine.add(&at_nominal, &at_product),
        Err(EngineError::ScaleMismatch { left: 40, right: 80 })
    ));

    let switched = engine.mod_switch(&at_nominal).unwrap();
    assert!(matches!(
        engine.add(&switched, &at_nominal),
        Err(EngineError::LevelMismatch { .. })
    ));

    let bottom = engine.mod_switch(&switched).unwrap();
    assert_eq!(bottom.level, 0);
    assert!(matches!(
        engine.mod_switch(&bottom),
        Err(EngineError::ChainExhausted(0))
    ));
    assert!(matches!(
        engine.rescale(&bottom),
        Err(EngineError::ChainExhausted(0))
    ));
}

#[test]
fn addends_encoded_at_the_product_scale_line_up() {
    let engine = engine(EncMode::Symmetric);
    let mut rng = inputs::seeded_rng(13);
    let a = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();
    let b = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();
    let c = inputs::uniform_f64(&mut rng, 10, -10.0, 10.0).unwrap();

    let ct_a = engine.encrypt_values(&a).unwrap();
    let ct_b = engine.encrypt_values(&b).unwrap();
    let product = engine.relinearize(&engine.multiply(&ct_a, &ct_b).unwrap()).unwrap();

    let plain_c = engine.encode_at(&c, product.logp).unwrap();
    let sum = engine.add_plain(&product, &plain_c).unwrap();

    let decoded = engine.decrypt_to_vec(&sum, a.len()).unwrap();
    for (i, actual) in decoded.iter().enumerate() {
        let expected = a[i] * b[i] + c[i];
        assert_relative_eq!(expected, *actual, max_relative = 1e-3, epsilon = 1e-3);
    }
}
