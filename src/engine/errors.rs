use thiserror::Error;

/// Errors raised by the engine facade, either surfaced from the wrapped
/// library or detected by the harness-side bookkeeping before a call that
/// would be rejected anyway.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("library call failed: {0}")]
    Seal(#[from] sealy::Error),

    #[error("unsupported polynomial modulus degree {0}")]
    UnsupportedDegree(usize),

    #[error("modulus ladder must hold at least three primes, got {0}")]
    LadderTooShort(usize),

    #[error("scale mismatch: 2^{left} vs 2^{right}")]
    ScaleMismatch { left: u32, right: u32 },

    #[error("level mismatch: {left} vs {right}")]
    LevelMismatch { left: usize, right: usize },

    #[error("modulus chain exhausted: no level left below {0}")]
    ChainExhausted(usize),
}

pub type EngineResult<T> = Result<T, EngineError>;
