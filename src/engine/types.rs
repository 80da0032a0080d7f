//! Ciphertext and plaintext handles with harness-side bookkeeping.
//!
//! The wrapped library keeps scale, chain position and polynomial count
//! inside opaque native objects. The workbench mirrors the three quantities
//! it reasons about next to the handle, in the same spirit as HEAAN's
//! `logp`/`logq` pair:
//! - `logp`: nominal precision bits; the encoding scale is `2^logp`, products
//!   add their operands' `logp`, rescaling subtracts the dropped prime's bits
//! - `level`: remaining rescale/mod-switch steps on the data chain
//! - `size`: polynomial count (2 fresh, 3 after multiplication, back to 2
//!   after relinearization)

use std::fmt;

use sealy::{Ciphertext, Plaintext};

/// An encrypted vector together with the workbench's chain bookkeeping.
#[derive(Debug)]
pub struct Tracked {
    pub(crate) inner: Ciphertext,
    pub logp: u32,
    pub level: usize,
    pub size: usize,
}

impl Tracked {
    pub(crate) fn fresh(inner: Ciphertext, logp: u32, level: usize) -> Self {
        Self {
            inner,
            logp,
            level,
            size: 2,
        }
    }
}

impl fmt::Display for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ciphertext size={} level={} scale=2^{}",
            self.size, self.level, self.logp
        )
    }
}

/// An encoded vector together with its scale and chain position.
#[derive(Debug)]
pub struct TrackedPlain {
    pub(crate) inner: Plaintext,
    pub logp: u32,
    pub level: usize,
}

impl TrackedPlain {
    pub(crate) fn fresh(inner: Plaintext, logp: u32, level: usize) -> Self {
        Self { inner, logp, level }
    }
}

impl fmt::Display for TrackedPlain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plaintext level={} scale=2^{}", self.level, self.logp)
    }
}
