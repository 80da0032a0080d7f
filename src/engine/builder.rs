use sealy::{
    CKKSEncoder, CKKSEncryptionParametersBuilder, CoefficientModulusFactory, Context, Decryptor,
    Encryptor, Evaluator, KeyGenerator,
};

use super::{CkksEngine, EngineError, EngineResult};
use crate::params::BenchSetting;

/// Builds a [`CkksEngine`] from a [`BenchSetting`].
///
/// Construction walks the same path as the library's own examples: encryption
/// parameters, context with an expanded modulus chain, key generation, then
/// the encryptor/decryptor/evaluator/encoder quartet. Any step the library
/// rejects (oversized ladders, invalid degrees) comes back as an error the
/// benchmark runners record and step over.
pub struct CkksEngineBuilder {
    setting: BenchSetting,
}

impl CkksEngineBuilder {
    pub fn new(setting: BenchSetting) -> Self {
        Self { setting }
    }

    pub fn build(self) -> EngineResult<CkksEngine> {
        let setting = self.setting;
        if setting.modulus_bits.len() < 3 {
            return Err(EngineError::LadderTooShort(setting.modulus_bits.len()));
        }
        let degree = setting
            .degree_type()
            .ok_or(EngineError::UnsupportedDegree(setting.degree))?;

        let moduli = CoefficientModulusFactory::build(degree.clone(), &setting.modulus_bits)?;
        let params = CKKSEncryptionParametersBuilder::new()
            .set_poly_modulus_degree(degree)
            .set_coefficient_modulus(moduli)
            .build()?;

        // The second argument asks for the full modulus switching chain,
        // which rescaling and mod-switching walk down.
        let context = Context::new(&params, true, setting.security.to_level())?;

        let keygen = KeyGenerator::new(&context)?;
        let secret_key = keygen.secret_key();
        let public_key = keygen.create_public_key();
        let relin_keys = keygen.create_relinearization_keys()?;
        let galois_keys = keygen.create_galois_keys()?;

        let scale = 2f64.powi(setting.scale_bits() as i32);
        let encoder = CKKSEncoder::new(&context, scale)?;
        let slot_count = encoder.get_slot_count();

        let encryptor =
            Encryptor::with_public_and_secret_key(&context, &public_key, &secret_key)?;
        let decryptor = Decryptor::new(&context, &secret_key)?;
        let evaluator = Evaluator::new(&context)?;

        Ok(CkksEngine {
            context,
            relin_keys,
            galois_keys,
            encryptor,
            decryptor,
            evaluator,
            encoder,
            setting,
            slot_count,
        })
    }
}
