//! Benchmark settings: encryption mode, security class, polynomial degree
//! and the coefficient modulus ladder, plus the preset parameter points the
//! measurement campaign runs against.

use std::fmt;

use sealy::{DegreeType, SecurityLevel};

/// Which encryption entry point of the library a run exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncMode {
    Symmetric,
    Asymmetric,
}

impl fmt::Display for EncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncMode::Symmetric => write!(f, "symmetric"),
            EncMode::Asymmetric => write!(f, "asymmetric"),
        }
    }
}

/// Lattice security class, mapped onto the library's security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    Tc128,
    Tc192,
    Tc256,
}

impl Security {
    pub fn bits(self) -> u32 {
        match self {
            Security::Tc128 => 128,
            Security::Tc192 => 192,
            Security::Tc256 => 256,
        }
    }

    pub(crate) fn to_level(self) -> SecurityLevel {
        match self {
            Security::Tc128 => SecurityLevel::TC128,
            Security::Tc192 => SecurityLevel::TC192,
            Security::Tc256 => SecurityLevel::TC256,
        }
    }
}

/// One parameter point of the campaign.
///
/// The coefficient modulus ladder is given as prime bit sizes, outermost
/// primes first/last, exactly as handed to the library's modulus factory.
/// The nominal encoding scale is `2^modulus_bits[1]` (the inner rescaling
/// prime), so a fresh product can be rescaled back to roughly the original
/// precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchSetting {
    pub mode: EncMode,
    pub security: Security,
    pub degree: usize,
    pub modulus_bits: Vec<i32>,
}

impl BenchSetting {
    pub fn new(mode: EncMode, security: Security, degree: usize, modulus_bits: &[i32]) -> Self {
        Self {
            mode,
            security,
            degree,
            modulus_bits: modulus_bits.to_vec(),
        }
    }

    /// Nominal scale exponent: bit size of the inner rescaling prime.
    pub fn scale_bits(&self) -> u32 {
        self.modulus_bits[1] as u32
    }

    /// Chain level of a freshly encrypted ciphertext. The last prime in the
    /// ladder is reserved for key switching, so with `k` primes the data
    /// chain starts at level `k - 2` and rescaling walks it down to 0.
    pub fn fresh_level(&self) -> usize {
        self.modulus_bits.len().saturating_sub(2)
    }

    pub(crate) fn degree_type(&self) -> Option<DegreeType> {
        match self.degree {
            1024 => Some(DegreeType::D1024),
            2048 => Some(DegreeType::D2048),
            4096 => Some(DegreeType::D4096),
            8192 => Some(DegreeType::D8192),
            16384 => Some(DegreeType::D16384),
            32768 => Some(DegreeType::D32768),
            _ => None,
        }
    }

    /// Report heading, e.g.
    /// `Mode=symmetric, Level=128, Degree=8192, Modulus={60;40;40;60}`.
    pub fn label(&self) -> String {
        let ladder = self
            .modulus_bits
            .iter()
            .map(|b| b.to_string())
            .collect::<Vec<_>>()
            .join(";");
        format!(
            "Mode={}, Level={}, Degree={}, Modulus={{{}}}",
            self.mode,
            self.security.bits(),
            self.degree,
            ladder
        )
    }

    /// Short tag used in CSV file names, e.g. `sym_128_8192_4`.
    pub fn file_tag(&self) -> String {
        let mode = match self.mode {
            EncMode::Symmetric => "sym",
            EncMode::Asymmetric => "asym",
        };
        format!(
            "{}_{}_{}_{}",
            mode,
            self.security.bits(),
            self.degree,
            self.modulus_bits.len()
        )
    }
}

/// Shallow three-prime ladder at degree 4096. One rescale level; the deeper
/// circuits exhaust the chain and demonstrate precision collapse.
pub fn shallow_4096_3(mode: EncMode) -> BenchSetting {
    BenchSetting::new(mode, Security::Tc128, 4096, &[35, 25, 35])
}

/// Four-prime ladder at degree 4096. Two rescale levels but only 20-bit
/// precision, the precision-loss demonstration point.
pub fn shallow_4096_4(mode: EncMode) -> BenchSetting {
    BenchSetting::new(mode, Security::Tc128, 4096, &[25, 20, 20, 25])
}

/// The reference point of the campaign: degree 8192, `{60,40,40,60}`,
/// scale `2^40`.
pub fn reference_8192_4(mode: EncMode) -> BenchSetting {
    BenchSetting::new(mode, Security::Tc128, 8192, &[60, 40, 40, 60])
}

/// Wide six-prime ladder at degree 8192 used by the add-latency-vs-level
/// sweep: four switchable data levels.
pub fn wide_8192_6(mode: EncMode) -> BenchSetting {
    BenchSetting::new(mode, Security::Tc128, 8192, &[40, 30, 30, 30, 30, 40])
}

/// Settings table for the kernel benchmark suites.
pub fn kernel_settings() -> Vec<BenchSetting> {
    vec![
        reference_8192_4(EncMode::Symmetric),
        reference_8192_4(EncMode::Asymmetric),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_follows_inner_prime() {
        assert_eq!(reference_8192_4(EncMode::Symmetric).scale_bits(), 40);
        assert_eq!(shallow_4096_3(EncMode::Symmetric).scale_bits(), 25);
        assert_eq!(shallow_4096_4(EncMode::Symmetric).scale_bits(), 20);
    }

    #[test]
    fn fresh_level_leaves_out_the_special_prime() {
        assert_eq!(reference_8192_4(EncMode::Symmetric).fresh_level(), 2);
        assert_eq!(shallow_4096_3(EncMode::Symmetric).fresh_level(), 1);
        assert_eq!(wide_8192_6(EncMode::Symmetric).fresh_level(), 4);
    }

    #[test]
    fn label_matches_report_heading_shape() {
        let s = reference_8192_4(EncMode::Asymmetric);
        assert_eq!(
            s.label(),
            "Mode=asymmetric, Level=128, Degree=8192, Modulus={60;40;40;60}"
        );
        assert_eq!(s.file_tag(), "asym_128_8192_4");
    }
}
