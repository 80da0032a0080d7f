//! The catalogue of fixed correctness circuits.
//!
//! Each circuit builds an engine for its parameter point, runs a fixed
//! homomorphic expression with explicit relinearize/rescale/mod-switch
//! steps, prints the chain bookkeeping after every step and compares every
//! intermediate against the cleartext oracle. The qualitative tag on each
//! entry records what the campaign observes at that point: `ok` circuits
//! stay inside tolerance, `precision`/`error` entries demonstrate how
//! shallow modulus ladders degrade, `unsupported` marks operations this
//! library build rejects.

pub mod depth;
pub mod discriminant;
pub mod sizes;

use crate::engine::{CkksEngine, Tracked};
use crate::error::WorkbenchResult;
use crate::oracle::{self, DEFAULT_TOLERANCE_PCT};
use crate::params::EncMode;

/// Options shared by all circuit runs.
#[derive(Debug, Clone)]
pub struct RunOpts {
    pub range_limit: f64,
    /// Repetition count for accumulating circuits (adds, negations, sweep
    /// repetitions per level).
    pub acc_runs: usize,
    pub seed: u64,
    pub quiet: bool,
}

impl Default for RunOpts {
    fn default() -> Self {
        Self {
            range_limit: 100.0,
            acc_runs: 10,
            seed: 0x0ddba11,
            quiet: false,
        }
    }
}

impl RunOpts {
    fn with_range(&self, range_limit: f64) -> Self {
        Self {
            range_limit,
            ..self.clone()
        }
    }
}

/// Result of one circuit run.
#[derive(Debug, Clone)]
pub struct CircuitOutcome {
    pub title: String,
    pub passed: bool,
    pub worst_error_pct: f64,
    pub notes: Vec<String>,
}

/// Step-by-step transcript and check accumulator for a circuit run.
pub(crate) struct Trace<'a> {
    engine: &'a CkksEngine,
    quiet: bool,
    passed: bool,
    worst_pct: f64,
    notes: Vec<String>,
}

impl<'a> Trace<'a> {
    pub(crate) fn new(engine: &'a CkksEngine, opts: &RunOpts) -> Self {
        if !opts.quiet {
            println!("  {}", engine.summary());
        }
        Self {
            engine,
            quiet: opts.quiet,
            passed: true,
            worst_pct: 0.0,
            notes: Vec::new(),
        }
    }

    pub(crate) fn step(&self, msg: &str) {
        if !self.quiet {
            println!("• {msg}");
        }
    }

    pub(crate) fn info(&self, ct: &Tracked) {
        if !self.quiet {
            println!("  {ct}");
        }
    }

    pub(crate) fn note(&mut self, note: impl Into<String>) {
        let note = note.into();
        if !self.quiet {
            println!("  ⚠ {note}");
        }
        self.notes.push(note);
    }

    /// Decrypt `ct`, compare against `expected` and fold the result into
    /// the outcome.
    pub(crate) fn check(
        &mut self,
        ct: &Tracked,
        expected: &[f64],
        step: &str,
    ) -> WorkbenchResult<()> {
        self.info(ct);
        let actual = self.engine.decrypt_to_vec(ct, expected.len())?;
        let check = oracle::check_slots(expected, &actual, DEFAULT_TOLERANCE_PCT);
        if check.worst_pct > self.worst_pct {
            self.worst_pct = check.worst_pct;
        }
        if check.passed {
            if !self.quiet {
                println!("  ✅ {step} within {DEFAULT_TOLERANCE_PCT}% (worst {:.4}%)", check.worst_pct);
            }
        } else {
            if !self.quiet {
                println!(
                    "  ❌ {step} check failed (worst {:.4}% at slot {})",
                    check.worst_pct, check.worst_slot
                );
            }
            self.passed = false;
            self.notes.push(step.to_string());
        }
        Ok(())
    }

    pub(crate) fn finish(self, title: &str) -> CircuitOutcome {
        CircuitOutcome {
            title: title.to_string(),
            passed: self.passed,
            worst_error_pct: self.worst_pct,
            notes: self.notes,
        }
    }
}

/// One catalogue entry.
pub struct CircuitEntry {
    pub id: u32,
    pub title: &'static str,
    /// Qualitative tag observed for this parameter point.
    pub tag: &'static str,
    pub run: fn(&RunOpts) -> WorkbenchResult<CircuitOutcome>,
}

/// The numbered circuit catalogue, the source of truth for the menu, the
/// CLI and the integration tests.
pub fn catalogue() -> Vec<CircuitEntry> {
    use crate::params::{reference_8192_4, shallow_4096_3, shallow_4096_4, wide_8192_6};
    const SYM: EncMode = EncMode::Symmetric;

    vec![
        CircuitEntry {
            id: 1,
            title: "Mul depth 4096, 3 primes, (A*B)*C",
            tag: "error",
            run: |o| depth::mul_depth_abc(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 2,
            title: "Mul depth 4096, 4 primes, (A*B)*C",
            tag: "precision",
            run: |o| depth::mul_depth_abc(shallow_4096_4(SYM), &o.with_range(1.0)),
        },
        CircuitEntry {
            id: 3,
            title: "Mul depth 8192, 4 primes, (A*B)*C",
            tag: "ok",
            run: |o| depth::mul_depth_abc(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 4,
            title: "Mul depth 8192, 4 primes, ((A*B)*C)*D",
            tag: "error",
            run: |o| depth::mul_depth_abcd_chain(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 5,
            title: "Mul depth 8192, 4 primes, (A*B)*(C*D)",
            tag: "ok",
            run: |o| depth::mul_depth_abcd_balanced(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 6,
            title: "Add depth 4096, 3 primes, A+A+...+A",
            tag: "ok",
            run: |o| depth::add_accumulate(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 7,
            title: "Add depth 4096, 4 primes, A+A+...+A",
            tag: "ok",
            run: |o| depth::add_accumulate(shallow_4096_4(SYM), o),
        },
        CircuitEntry {
            id: 8,
            title: "Add depth 8192, 4 primes, A+A+...+A",
            tag: "ok",
            run: |o| depth::add_accumulate(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 9,
            title: "Mul/Add depth 4096, 3 primes, (A*B)+C+...+C",
            tag: "ok",
            run: |o| depth::muladd_accumulate(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 10,
            title: "Mul/Add depth 4096, 4 primes, (A*B)+C+...+C",
            tag: "precision",
            run: |o| depth::muladd_accumulate(shallow_4096_4(SYM), o),
        },
        CircuitEntry {
            id: 11,
            title: "Mul/Add depth 8192, 4 primes, (A*B)+C+...+C",
            tag: "ok",
            run: |o| depth::muladd_accumulate(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 12,
            title: "Square depth 4096, 3 primes, (A^2)^2",
            tag: "error",
            run: |o| depth::square_depth(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 13,
            title: "Square depth 4096, 4 primes, (A^2)^2",
            tag: "precision",
            run: |o| depth::square_depth(shallow_4096_4(SYM), &o.with_range(2.0)),
        },
        CircuitEntry {
            id: 14,
            title: "Square depth 8192, 4 primes, (A^2)^2",
            tag: "ok",
            run: |o| depth::square_depth(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 15,
            title: "Negate depth 4096, 3 primes, neg(...neg(A))",
            tag: "ok",
            run: |o| depth::negate_chain(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 16,
            title: "Negate depth 8192, 4 primes, neg(...neg(A))",
            tag: "ok",
            run: |o| depth::negate_chain(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 17,
            title: "Rotate depth 8192, 4 primes, rotate(A,1)",
            tag: "unsupported",
            run: |o| depth::rotate_depth(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 18,
            title: "Mulplain depth 4096, 3 primes, 2*(2*A)",
            tag: "error",
            run: |o| depth::mulplain_depth(shallow_4096_3(SYM), o),
        },
        CircuitEntry {
            id: 19,
            title: "Mulplain depth 4096, 4 primes, 2*(2*A)",
            tag: "precision",
            run: |o| depth::mulplain_depth(shallow_4096_4(SYM), o),
        },
        CircuitEntry {
            id: 20,
            title: "Mulplain depth 8192, 4 primes, 2*(2*A)",
            tag: "ok",
            run: |o| depth::mulplain_depth(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 21,
            title: "Discriminant degree 2, 4096, 4 primes, B^2-4AC",
            tag: "precision",
            run: |o| discriminant::discriminant(shallow_4096_4(SYM), &o.with_range(3.0)),
        },
        CircuitEntry {
            id: 22,
            title: "Discriminant degree 2, 8192, 4 primes, B^2-4AC",
            tag: "ok",
            run: |o| discriminant::discriminant(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 23,
            title: "Add on different sizes, 8192, 4 primes, AB+C",
            tag: "ok",
            run: |o| sizes::add_mixed_sizes(reference_8192_4(SYM), o),
        },
        CircuitEntry {
            id: 24,
            title: "Add latency vs level, 8192, 6 primes, A+A per level",
            tag: "perf",
            run: |o| sizes::add_vs_level_sweep(wide_8192_6(SYM), o),
        },
        CircuitEntry {
            id: 25,
            title: "Misc: Halley iteration for 1/sqrt(S) in the clear",
            tag: "demo",
            run: |o| depth::halley_demo(o),
        },
    ]
}

/// Look up a catalogue entry by menu id.
pub fn find(id: u32) -> Option<CircuitEntry> {
    catalogue().into_iter().find(|c| c.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_ids_are_unique_and_sorted() {
        let ids: Vec<u32> = catalogue().iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn every_tag_is_a_known_class() {
        let known = ["ok", "error", "precision", "unsupported", "perf", "demo"];
        for entry in catalogue() {
            assert!(known.contains(&entry.tag), "tag {} unknown", entry.tag);
        }
    }

    #[test]
    fn find_resolves_reference_entries() {
        assert!(find(3).is_some());
        assert!(find(22).is_some());
        assert!(find(999).is_none());
    }
}
