//! Outlier-robust summary statistics for kernel timing series.
//!
//! A series holds one microsecond sample per run, with 0.0 marking runs that
//! never reached the kernel (setup failure, earlier exception). Plain mean
//! and deviation are computed over the non-empty samples; the robust block
//! computes quartiles, the interquartile range and Tukey fences, then a
//! trimmed mean/deviation over the in-fence samples together with the
//! outlier count and percentage.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("empty sample series")]
    EmptySeries,

    #[error("percentile {0} outside [0, 1]")]
    BadPercentile(f64),
}

/// Samples at or below this value are treated as "run never happened".
const EMPTY_SAMPLE: f64 = 0.01;

/// Linear-interpolation percentile over an unsorted sample set.
pub fn percentile(samples: &[f64], p: f64) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::EmptySeries);
    }
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::BadPercentile(p));
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        Ok(sorted[lo])
    } else {
        let w = rank - lo as f64;
        Ok(sorted[lo] * (1.0 - w) + sorted[hi] * w)
    }
}

/// Count of samples inside the open-below/closed-above window `(low, high]`.
pub fn count_within(samples: &[f64], low: f64, high: f64) -> usize {
    samples.iter().filter(|&&v| v > low && v <= high).count()
}

/// Mean of the samples inside `(low, high]`, `None` when the window is empty.
pub fn windowed_mean(samples: &[f64], low: f64, high: f64) -> Option<f64> {
    let mut acc = 0.0;
    let mut n = 0usize;
    for &v in samples {
        if v > low && v <= high {
            acc += v;
            n += 1;
        }
    }
    (n > 0).then(|| acc / n as f64)
}

/// Population standard deviation of the samples inside `(low, high]`.
pub fn windowed_std_dev(samples: &[f64], low: f64, high: f64) -> Option<f64> {
    let mean = windowed_mean(samples, low, high)?;
    let mut acc = 0.0;
    let mut n = 0usize;
    for &v in samples {
        if v > low && v <= high {
            acc += (v - mean) * (v - mean);
            n += 1;
        }
    }
    Some((acc / n as f64).sqrt())
}

/// Robust per-kernel timing summary.
#[derive(Debug, Clone)]
pub struct KernelStats {
    pub kernel: String,
    /// Number of runs that actually produced a sample.
    pub runs: u32,
    pub max: f64,
    pub min: f64,
    pub avg: f64,
    pub s_dev: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    /// Mean over the samples inside the Tukey fences.
    pub trimmed_avg: f64,
    /// Deviation over the samples inside the Tukey fences.
    pub trimmed_s_dev: f64,
    pub outliers: u32,
    pub outlier_pct: f64,
}

impl KernelStats {
    pub fn from_series(kernel: &str, series: &[f64]) -> Result<Self, StatsError> {
        let live: Vec<f64> = series.iter().copied().filter(|&v| v > EMPTY_SAMPLE).collect();
        if live.is_empty() {
            return Err(StatsError::EmptySeries);
        }
        let runs = live.len() as u32;
        let max = live.iter().copied().fold(f64::MIN, f64::max);
        let min = live.iter().copied().fold(f64::MAX, f64::min);
        let avg = windowed_mean(&live, EMPTY_SAMPLE, f64::MAX).unwrap_or(0.0);
        let s_dev = windowed_std_dev(&live, EMPTY_SAMPLE, f64::MAX).unwrap_or(0.0);

        let q1 = percentile(&live, 0.25)?;
        let q3 = percentile(&live, 0.75)?;
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let kept = count_within(&live, lower_fence, upper_fence);
        let outliers = (live.len() - kept) as u32;
        let trimmed_avg = windowed_mean(&live, lower_fence, upper_fence).unwrap_or(avg);
        let trimmed_s_dev = windowed_std_dev(&live, lower_fence, upper_fence).unwrap_or(s_dev);
        let outlier_pct = 100.0 * f64::from(outliers) / f64::from(runs);

        Ok(Self {
            kernel: kernel.to_string(),
            runs,
            max,
            min,
            avg,
            s_dev,
            q1,
            q3,
            iqr,
            lower_fence,
            upper_fence,
            trimmed_avg,
            trimmed_s_dev,
            outliers,
            outlier_pct,
        })
    }

    /// A stats row for a kernel that never produced a sample (for example a
    /// kernel the library rejects): zeros everywhere, zero runs.
    pub fn empty(kernel: &str) -> Self {
        Self {
            kernel: kernel.to_string(),
            runs: 0,
            max: 0.0,
            min: 0.0,
            avg: 0.0,
            s_dev: 0.0,
            q1: 0.0,
            q3: 0.0,
            iqr: 0.0,
            lower_fence: 0.0,
            upper_fence: 0.0,
            trimmed_avg: 0.0,
            trimmed_s_dev: 0.0,
            outliers: 0,
            outlier_pct: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn percentile_interpolates() {
        let samples = [10.0, 20.0, 30.0, 40.0];
        assert_relative_eq!(percentile(&samples, 0.0).unwrap(), 10.0);
        assert_relative_eq!(percentile(&samples, 1.0).unwrap(), 40.0);
        assert_relative_eq!(percentile(&samples, 0.5).unwrap(), 25.0);
        assert_relative_eq!(percentile(&samples, 0.25).unwrap(), 17.5);
    }

    #[test]
    fn empty_series_is_an_error() {
        assert!(percentile(&[], 0.5).is_err());
        assert!(KernelStats::from_series("ADD", &[0.0, 0.0]).is_err());
    }

    #[test]
    fn single_sample_degenerates_cleanly() {
        let stats = KernelStats::from_series("MUL", &[42.0]).unwrap();
        assert_eq!(stats.runs, 1);
        assert_relative_eq!(stats.avg, 42.0);
        assert_relative_eq!(stats.s_dev, 0.0);
        assert_relative_eq!(stats.q1, 42.0);
        assert_relative_eq!(stats.q3, 42.0);
        assert_eq!(stats.outliers, 0);
    }

    #[test]
    fn zero_samples_are_skipped_not_averaged() {
        // A failed run leaves 0.0 in the series and must not drag the mean.
        let stats = KernelStats::from_series("ENCODE", &[0.0, 100.0, 100.0]).unwrap();
        assert_eq!(stats.runs, 2);
        assert_relative_eq!(stats.avg, 100.0);
    }

    #[test]
    fn gross_outlier_is_fenced_out() {
        let series = [100.0, 101.0, 99.0, 100.0, 102.0, 98.0, 100.0, 5000.0];
        let stats = KernelStats::from_series("ROTATE", &series).unwrap();
        assert_eq!(stats.outliers, 1);
        assert!(stats.trimmed_avg < 110.0);
        assert!(stats.avg > 110.0);
        assert_relative_eq!(stats.outlier_pct, 100.0 / 8.0, max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn trimmed_mean_stays_within_sample_bounds(
            samples in proptest::collection::vec(1.0f64..1e6, 1..64)
        ) {
            let stats = KernelStats::from_series("K", &samples).unwrap();
            prop_assert!(stats.trimmed_avg >= stats.min - 1e-9);
            prop_assert!(stats.trimmed_avg <= stats.max + 1e-9);
            prop_assert!(stats.q1 <= stats.q3);
            prop_assert!(stats.outliers <= stats.runs);
        }

        #[test]
        fn percentile_is_monotone(
            samples in proptest::collection::vec(0.0f64..1e6, 2..64),
            p in 0.0f64..1.0,
            q in 0.0f64..1.0,
        ) {
            let (lo, hi) = if p <= q { (p, q) } else { (q, p) };
            let a = percentile(&samples, lo).unwrap();
            let b = percentile(&samples, hi).unwrap();
            prop_assert!(a <= b + 1e-9);
        }
    }
}
