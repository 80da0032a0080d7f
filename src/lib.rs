//! Benchmarking and correctness workbench for CKKS homomorphic arithmetic.
//!
//! The heavy lifting (encoding, encryption, homomorphic evaluation,
//! decryption) is delegated to the wrapped library; this crate wires those
//! primitives into fixed arithmetic circuits, checks every decrypted result
//! against a cleartext oracle, times the individual kernels and reduces the
//! timing series to outlier-robust statistics with CSV output.

pub mod circuits;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod kernels;
pub mod oracle;
pub mod params;
pub mod report;
pub mod stats;

pub use engine::{CkksEngine, CkksEngineBuilder, EngineError, Tracked, TrackedPlain};
pub use error::{WorkbenchError, WorkbenchResult};
pub use kernels::{BenchConfig, KernelKind};
pub use params::{BenchSetting, EncMode, Security};
pub use stats::KernelStats;
