//! Facade over the wrapped encrypted-computation library.
//!
//! `CkksEngine` owns everything a run needs (context, key material,
//! encryptor, decryptor, evaluator and the base encoder) and exposes the
//! homomorphic operations with chain bookkeeping on top (see [`types`]).
//! Nothing in here computes on polynomials itself; every cryptographic step
//! is a delegation into the library.

pub mod builder;
pub mod errors;
pub mod ops;
pub mod types;

pub use builder::CkksEngineBuilder;
pub use errors::{EngineError, EngineResult};
pub use types::{Tracked, TrackedPlain};

use sealy::{
    CKKSEncoder, Context, Decryptor, Encryptor, Evaluator, GaloisKey, Plaintext,
    RelinearizationKey, SymAsym,
};

use crate::params::{BenchSetting, EncMode};

pub struct CkksEngine {
    pub(crate) context: Context,
    pub(crate) relin_keys: RelinearizationKey,
    pub(crate) galois_keys: GaloisKey,
    pub(crate) encryptor: Encryptor<SymAsym>,
    pub(crate) decryptor: Decryptor,
    pub(crate) evaluator: Evaluator,
    pub(crate) encoder: CKKSEncoder,
    setting: BenchSetting,
    slot_count: usize,
}

impl CkksEngine {
    pub fn builder(setting: BenchSetting) -> CkksEngineBuilder {
        CkksEngineBuilder::new(setting)
    }

    pub fn setting(&self) -> &BenchSetting {
        &self.setting
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn scale_bits(&self) -> u32 {
        self.setting.scale_bits()
    }

    /// One-line parameter summary for run transcripts.
    pub fn summary(&self) -> String {
        format!(
            "{} | slots={} scale=2^{} fresh_level={}",
            self.setting.label(),
            self.slot_count,
            self.setting.scale_bits(),
            self.setting.fresh_level()
        )
    }

    /// Encode at the nominal scale `2^scale_bits`.
    pub fn encode(&self, values: &[f64]) -> EngineResult<TrackedPlain> {
        let plain = self.encoder.encode_f64(values)?;
        Ok(TrackedPlain::fresh(
            plain,
            self.setting.scale_bits(),
            self.setting.fresh_level(),
        ))
    }

    /// Encode at an explicit power-of-two scale `2^logp`.
    ///
    /// Used to place addends directly at a product scale so that later
    /// additions meet operands whose scales match exactly.
    pub fn encode_at(&self, values: &[f64], logp: u32) -> EngineResult<TrackedPlain> {
        let scale = 2f64.powi(logp as i32);
        let encoder = CKKSEncoder::new(&self.context, scale)?;
        let plain = encoder.encode_f64(values)?;
        Ok(TrackedPlain::fresh(plain, logp, self.setting.fresh_level()))
    }

    /// Encode a constant broadcast over `len` slots at the nominal scale.
    pub fn encode_scalar(&self, value: f64, len: usize) -> EngineResult<TrackedPlain> {
        self.encode(&vec![value; len])
    }

    /// Encode a constant broadcast over `len` slots at scale `2^logp`.
    pub fn encode_scalar_at(&self, value: f64, len: usize, logp: u32) -> EngineResult<TrackedPlain> {
        self.encode_at(&vec![value; len], logp)
    }

    /// Encrypt through the entry point the setting's mode selects.
    pub fn encrypt(&self, plain: &TrackedPlain) -> EngineResult<Tracked> {
        let inner = match self.setting.mode {
            EncMode::Symmetric => self.encryptor.encrypt_symmetric(&plain.inner)?,
            EncMode::Asymmetric => self.encryptor.encrypt(&plain.inner)?,
        };
        Ok(Tracked::fresh(inner, plain.logp, plain.level))
    }

    /// Encode at the nominal scale and encrypt in one step.
    pub fn encrypt_values(&self, values: &[f64]) -> EngineResult<Tracked> {
        let plain = self.encode(values)?;
        self.encrypt(&plain)
    }

    /// Encode at scale `2^logp` and encrypt in one step.
    pub fn encrypt_values_at(&self, values: &[f64], logp: u32) -> EngineResult<Tracked> {
        let plain = self.encode_at(values, logp)?;
        self.encrypt(&plain)
    }

    pub fn decrypt(&self, ct: &Tracked) -> EngineResult<Plaintext> {
        Ok(self.decryptor.decrypt(&ct.inner)?)
    }

    pub fn decode(&self, plain: &Plaintext) -> EngineResult<Vec<f64>> {
        Ok(self.encoder.decode_f64(plain)?)
    }

    /// Decrypt and decode, truncated to the first `len` slots.
    pub fn decrypt_to_vec(&self, ct: &Tracked, len: usize) -> EngineResult<Vec<f64>> {
        let plain = self.decrypt(ct)?;
        let mut values = self.decode(&plain)?;
        values.truncate(len);
        Ok(values)
    }

    pub(crate) fn rescale_prime_bits(&self, level: usize) -> u32 {
        self.setting.modulus_bits[level] as u32
    }
}
