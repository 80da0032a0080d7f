//! Cleartext reference computations and precision checking.
//!
//! Every circuit evaluates its expression twice: once homomorphically and
//! once here, slot by slot on the raw inputs. The comparison is relative,
//! in percent, because CKKS noise scales with the magnitude of the result.

/// Default tolerance for decrypted-vs-expected comparisons, in percent.
pub const DEFAULT_TOLERANCE_PCT: f64 = 2.0;

/// Relative error `100 · |1 − expected/actual|`, in percent.
pub fn relative_error_pct(expected: f64, actual: f64) -> f64 {
    if actual == 0.0 {
        if expected == 0.0 { 0.0 } else { f64::INFINITY }
    } else {
        100.0 * (1.0 - expected / actual).abs()
    }
}

/// Outcome of a slotwise comparison.
#[derive(Debug, Clone)]
pub struct SlotCheck {
    pub passed: bool,
    pub worst_pct: f64,
    pub worst_slot: usize,
    pub slots: usize,
}

/// Compare `actual` against `expected` slot by slot with the given percent
/// tolerance. Only the first `expected.len()` slots participate.
pub fn check_slots(expected: &[f64], actual: &[f64], tolerance_pct: f64) -> SlotCheck {
    let mut worst_pct = 0.0;
    let mut worst_slot = 0;
    for (i, (&e, &a)) in expected.iter().zip(actual.iter()).enumerate() {
        let err = relative_error_pct(e, a);
        if err > worst_pct {
            worst_pct = err;
            worst_slot = i;
        }
    }
    SlotCheck {
        passed: worst_pct <= tolerance_pct && expected.len() <= actual.len(),
        worst_pct,
        worst_slot,
        slots: expected.len(),
    }
}

pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

pub fn sub(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

pub fn mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x * y).collect()
}

pub fn square(a: &[f64]) -> Vec<f64> {
    a.iter().map(|x| x * x).collect()
}

pub fn neg(a: &[f64]) -> Vec<f64> {
    a.iter().map(|x| -x).collect()
}

pub fn scale(a: &[f64], k: f64) -> Vec<f64> {
    a.iter().map(|x| x * k).collect()
}

pub fn add_scalar(a: &[f64], k: f64) -> Vec<f64> {
    a.iter().map(|x| x + k).collect()
}

/// Cyclic left rotation by `steps` slots.
pub fn rotate_left(a: &[f64], steps: usize) -> Vec<f64> {
    if a.is_empty() {
        return Vec::new();
    }
    let steps = steps % a.len();
    let mut out = Vec::with_capacity(a.len());
    out.extend_from_slice(&a[steps..]);
    out.extend_from_slice(&a[..steps]);
    out
}

/// Expected intermediates of the kernel expression
/// `−(A² + B·C + coeff_d·D + coeff)`.
#[derive(Debug, Clone)]
pub struct ExprExpected {
    pub aa: Vec<f64>,
    pub bc: Vec<f64>,
    pub coeff_d: Vec<f64>,
    pub aa_plus_bc: Vec<f64>,
    pub tail: Vec<f64>,
    pub sum: Vec<f64>,
    pub result: Vec<f64>,
}

pub fn kernel_expr(
    a: &[f64],
    b: &[f64],
    c: &[f64],
    d: &[f64],
    coeff_d: f64,
    coeff: f64,
) -> ExprExpected {
    let aa = square(a);
    let bc = mul(b, c);
    let coeff_d = scale(d, coeff_d);
    let aa_plus_bc = add(&aa, &bc);
    let tail = add_scalar(&coeff_d, coeff);
    let sum = add(&aa_plus_bc, &tail);
    let result = neg(&sum);
    ExprExpected {
        aa,
        bc,
        coeff_d,
        aa_plus_bc,
        tail,
        sum,
        result,
    }
}

/// Halley's iteration for `1/√s`, the cleartext prototyping routine kept
/// from the misc experiments: each step evaluates only additions and
/// multiplications, the shape a homomorphic port would need.
///
/// Returns the successive iterates `x_1 .. x_n`; `s · x_n` approximates
/// `√s` when the starting point is inside the basin of convergence.
pub fn halley_inv_sqrt(s: f64, x0: f64, steps: usize) -> Vec<f64> {
    let c_15_8 = 15.0 / 8.0;
    let c_10_8 = 10.0 / 8.0;
    let c_3_8 = 3.0 / 8.0;
    let mut x = x0;
    let mut iterates = Vec::with_capacity(steps);
    for _ in 0..steps {
        let y = s * x * x;
        x = x * (c_15_8 - y * (c_10_8 - c_3_8 * y));
        iterates.push(x);
    }
    iterates
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn relative_error_is_symmetric_around_exact() {
        assert_eq!(relative_error_pct(10.0, 10.0), 0.0);
        assert_relative_eq!(relative_error_pct(98.0, 100.0), 2.0, max_relative = 1e-12);
    }

    #[test]
    fn check_flags_the_worst_slot() {
        let expected = [1.0, 2.0, 3.0];
        let actual = [1.0, 2.5, 3.0];
        let check = check_slots(&expected, &actual, 2.0);
        assert!(!check.passed);
        assert_eq!(check.worst_slot, 1);
        assert!(check.worst_pct > 19.0);
    }

    #[test]
    fn check_passes_within_tolerance() {
        let expected = [100.0, -50.0];
        let actual = [100.5, -50.2];
        assert!(check_slots(&expected, &actual, 2.0).passed);
    }

    #[test]
    fn expr_intermediates_compose() {
        let a = [2.0];
        let b = [3.0];
        let c = [4.0];
        let d = [5.0];
        let e = kernel_expr(&a, &b, &c, &d, 3.0, 1.0);
        assert_eq!(e.aa, vec![4.0]);
        assert_eq!(e.bc, vec![12.0]);
        assert_eq!(e.coeff_d, vec![15.0]);
        assert_eq!(e.sum, vec![4.0 + 12.0 + 15.0 + 1.0]);
        assert_eq!(e.result, vec![-32.0]);
    }

    #[test]
    fn rotation_wraps() {
        assert_eq!(rotate_left(&[1.0, 2.0, 3.0], 1), vec![2.0, 3.0, 1.0]);
        assert_eq!(rotate_left(&[1.0, 2.0, 3.0], 3), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn halley_converges_for_s_25() {
        let iterates = halley_inv_sqrt(25.0, 0.3, 10);
        let last = iterates.last().copied().unwrap();
        assert_relative_eq!(25.0 * last, 5.0, max_relative = 1e-6);
    }
}
