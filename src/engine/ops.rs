//! Homomorphic operations with chain bookkeeping.
//!
//! Every method delegates to the library's evaluator and updates the
//! harness-side `logp`/`level`/`size` metadata. Additions verify the
//! bookkeeping up front: the library rejects mismatched scales anyway, but
//! checking here turns an opaque native error into a precise one. All
//! methods use the out-of-place evaluator entry points so benchmark loops
//! can re-run them on the same operands.

use sealy::EvaluatorOps;

use super::types::{Tracked, TrackedPlain};
use super::{CkksEngine, EngineError, EngineResult};

impl CkksEngine {
    fn check_aligned(a: &Tracked, b: &Tracked) -> EngineResult<()> {
        if a.logp != b.logp {
            return Err(EngineError::ScaleMismatch {
                left: a.logp,
                right: b.logp,
            });
        }
        if a.level != b.level {
            return Err(EngineError::LevelMismatch {
                left: a.level,
                right: b.level,
            });
        }
        Ok(())
    }

    fn check_plain_aligned(a: &Tracked, p: &TrackedPlain) -> EngineResult<()> {
        if a.logp != p.logp {
            return Err(EngineError::ScaleMismatch {
                left: a.logp,
                right: p.logp,
            });
        }
        if a.level != p.level {
            return Err(EngineError::LevelMismatch {
                left: a.level,
                right: p.level,
            });
        }
        Ok(())
    }

    /// Ciphertext addition. Operand sizes may differ (a degree-2 and a
    /// degree-3 ciphertext add slotwise; the shorter one is padded).
    pub fn add(&self, a: &Tracked, b: &Tracked) -> EngineResult<Tracked> {
        Self::check_aligned(a, b)?;
        let inner = self.evaluator.add(&a.inner, &b.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: a.size.max(b.size),
        })
    }

    pub fn sub(&self, a: &Tracked, b: &Tracked) -> EngineResult<Tracked> {
        Self::check_aligned(a, b)?;
        let inner = self.evaluator.sub(&a.inner, &b.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: a.size.max(b.size),
        })
    }

    pub fn add_plain(&self, a: &Tracked, p: &TrackedPlain) -> EngineResult<Tracked> {
        Self::check_plain_aligned(a, p)?;
        let inner = self.evaluator.add_plain(&a.inner, &p.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: a.size,
        })
    }

    /// Ciphertext multiplication. The product carries the summed precision
    /// bits and grows to three polynomials until relinearized.
    pub fn multiply(&self, a: &Tracked, b: &Tracked) -> EngineResult<Tracked> {
        if a.level != b.level {
            return Err(EngineError::LevelMismatch {
                left: a.level,
                right: b.level,
            });
        }
        let inner = self.evaluator.multiply(&a.inner, &b.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp + b.logp,
            level: a.level,
            size: 3,
        })
    }

    pub fn multiply_plain(&self, a: &Tracked, p: &TrackedPlain) -> EngineResult<Tracked> {
        if a.level != p.level {
            return Err(EngineError::LevelMismatch {
                left: a.level,
                right: p.level,
            });
        }
        let inner = self.evaluator.multiply_plain(&a.inner, &p.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp + p.logp,
            level: a.level,
            size: a.size,
        })
    }

    pub fn square(&self, a: &Tracked) -> EngineResult<Tracked> {
        let inner = self.evaluator.square(&a.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp * 2,
            level: a.level,
            size: 3,
        })
    }

    pub fn negate(&self, a: &Tracked) -> EngineResult<Tracked> {
        let inner = self.evaluator.negate(&a.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: a.size,
        })
    }

    /// Relinearize a degree-3 product back down to two polynomials.
    pub fn relinearize(&self, a: &Tracked) -> EngineResult<Tracked> {
        let inner = self.evaluator.relinearize(&a.inner, &self.relin_keys)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: 2,
        })
    }

    /// Rescale to the next prime in the chain: drops the level's prime from
    /// the modulus and its bit size from the nominal precision.
    pub fn rescale(&self, a: &Tracked) -> EngineResult<Tracked> {
        if a.level == 0 {
            return Err(EngineError::ChainExhausted(a.level));
        }
        let inner = self.evaluator.rescale_to_next(&a.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp - self.rescale_prime_bits(a.level),
            level: a.level - 1,
            size: a.size,
        })
    }

    /// Switch a ciphertext one level down without rescaling. Scale is kept,
    /// only the chain position moves.
    pub fn mod_switch(&self, a: &Tracked) -> EngineResult<Tracked> {
        if a.level == 0 {
            return Err(EngineError::ChainExhausted(a.level));
        }
        let inner = self.evaluator.mod_switch_to_next(&a.inner)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level - 1,
            size: a.size,
        })
    }

    /// Walk a ciphertext down to `target` (strictly below its current
    /// level) with repeated mod switches.
    pub fn mod_switch_to_level(&self, a: &Tracked, target: usize) -> EngineResult<Tracked> {
        if target >= a.level {
            return Err(EngineError::LevelMismatch {
                left: a.level,
                right: target,
            });
        }
        let mut cur = self.mod_switch(a)?;
        while cur.level > target {
            cur = self.mod_switch(&cur)?;
        }
        Ok(cur)
    }

    /// Walk a plaintext down to `target` (strictly below its current level)
    /// with repeated mod switches.
    pub fn mod_switch_plain_to_level(
        &self,
        p: &TrackedPlain,
        target: usize,
    ) -> EngineResult<TrackedPlain> {
        if target >= p.level {
            return Err(EngineError::LevelMismatch {
                left: p.level,
                right: target,
            });
        }
        let mut inner = self.evaluator.mod_switch_to_next_plaintext(&p.inner)?;
        let mut level = p.level - 1;
        while level > target {
            inner = self.evaluator.mod_switch_to_next_plaintext(&inner)?;
            level -= 1;
        }
        Ok(TrackedPlain {
            inner,
            logp: p.logp,
            level,
        })
    }

    /// Galois rotation by `steps` slots through the binding's row-rotation
    /// entry point. The CKKS build of the library rejects this at run time;
    /// callers record the error as a per-kernel outcome.
    pub fn rotate(&self, a: &Tracked, steps: i32) -> EngineResult<Tracked> {
        let inner = self
            .evaluator
            .rotate_rows(&a.inner, steps, &self.galois_keys)?;
        Ok(Tracked {
            inner,
            logp: a.logp,
            level: a.level,
            size: a.size,
        })
    }
}
