//! Console tables and CSV emission for benchmark results.
//!
//! Each setting produces one CSV file: an outcome header line, a summary
//! matrix (Avg/S_dev/Max/Min/Run by kernel) and one detail row per run.
//! File names carry a timestamp and the setting tag so repeated campaigns
//! never clobber each other.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::WorkbenchResult;
use crate::params::BenchSetting;
use crate::stats::KernelStats;

/// Execution outcome of one setting: did every check pass, and the markers
/// accumulated along the way (failed checks, recorded exceptions).
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub setting: String,
    pub passed: bool,
    pub notes: Vec<String>,
}

impl SuiteOutcome {
    pub fn new(setting: String) -> Self {
        Self {
            setting,
            passed: true,
            notes: Vec::new(),
        }
    }

    pub fn flag(&mut self, note: impl Into<String>) {
        self.passed = false;
        self.notes.push(note.into());
    }

    /// Note something without failing the outcome (e.g. a kernel the
    /// library build does not support).
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn summary_line(&self) -> String {
        let mut line = format!("{}, precision={}", self.setting, u8::from(self.passed));
        if !self.notes.is_empty() {
            line.push_str(", ");
            line.push_str(&self.notes.join(" "));
        }
        line
    }
}

/// Statistics for every kernel of one setting.
#[derive(Debug, Clone)]
pub struct SuiteStats {
    pub setting: String,
    pub kernels: Vec<KernelStats>,
}

/// Fixed-width statistics table on stdout, one row per kernel.
pub fn print_stats(stats: &SuiteStats) {
    println!("{}", stats.setting);
    println!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>5} {:>10} {:>10} {:>5} {:>8}",
        "kernel", "avg", "s_dev", "max", "min", "run", "avg_o", "s_dev_o", "cnt_o", "perc_o"
    );
    for k in &stats.kernels {
        println!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>5} {:>10.2} {:>10.2} {:>5} {:>7.1}%",
            k.kernel,
            k.avg,
            k.s_dev,
            k.max,
            k.min,
            k.runs,
            k.trimmed_avg,
            k.trimmed_s_dev,
            k.outliers,
            k.outlier_pct
        );
    }
}

/// Write the per-setting CSV file and return its path.
///
/// `series` pairs each kernel name with its per-run samples; all series
/// must have the same length (one slot per run, zero when missed).
pub fn write_csv(
    dir: &Path,
    suite: &str,
    setting: &BenchSetting,
    outcome: &SuiteOutcome,
    stats: &SuiteStats,
    series: &[(String, Vec<f64>)],
    unit: &str,
) -> WorkbenchResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let stamp = Local::now().format("%Y%m%d-%H%M%S");
    let path = dir.join(format!("{}_{}_{}.csv", stamp, suite, setting.file_tag()));

    let mut out = String::new();
    out.push_str(&format!("{},{}\n\n", outcome.summary_line(), unit));

    let names: Vec<&str> = stats.kernels.iter().map(|k| k.kernel.as_str()).collect();
    out.push_str(&format!(" ,{}\n", names.join(",")));
    push_row(&mut out, "Avg", &stats.kernels, |k| k.avg);
    push_row(&mut out, "S_dev", &stats.kernels, |k| k.s_dev);
    push_row(&mut out, "Max", &stats.kernels, |k| k.max);
    push_row(&mut out, "Min", &stats.kernels, |k| k.min);
    push_row(&mut out, "Run", &stats.kernels, |k| f64::from(k.runs));
    push_row(&mut out, "Avg_o", &stats.kernels, |k| k.trimmed_avg);
    push_row(&mut out, "S_dev_o", &stats.kernels, |k| k.trimmed_s_dev);
    out.push('\n');

    let runs = series.iter().map(|(_, s)| s.len()).max().unwrap_or(0);
    for run in 0..runs {
        out.push(',');
        for (_, samples) in series {
            let v = samples.get(run).copied().unwrap_or(0.0);
            out.push_str(&format!("{v},"));
        }
        out.push('\n');
    }

    fs::write(&path, out)?;
    Ok(path)
}

fn push_row(out: &mut String, label: &str, kernels: &[KernelStats], f: impl Fn(&KernelStats) -> f64) {
    let cells = kernels
        .iter()
        .map(|k| format!("{}", f(k)))
        .collect::<Vec<_>>()
        .join(",");
    out.push_str(&format!("{label},{cells}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{EncMode, reference_8192_4};

    fn sample_stats() -> SuiteStats {
        SuiteStats {
            setting: "test".into(),
            kernels: vec![
                KernelStats::from_series("ENCODE", &[10.0, 11.0, 12.0]).unwrap(),
                KernelStats::from_series("MUL", &[100.0, 110.0, 105.0]).unwrap(),
            ],
        }
    }

    #[test]
    fn outcome_line_mirrors_pass_state() {
        let mut outcome = SuiteOutcome::new("S".into());
        assert_eq!(outcome.summary_line(), "S, precision=1");
        outcome.flag("MUL_3");
        assert_eq!(outcome.summary_line(), "S, precision=0, MUL_3");
    }

    #[test]
    fn csv_has_header_summary_and_run_rows() {
        let dir = std::env::temp_dir().join("ckks-workbench-report-test");
        let setting = reference_8192_4(EncMode::Symmetric);
        let outcome = SuiteOutcome::new(setting.label());
        let stats = sample_stats();
        let series = vec![
            ("ENCODE".to_string(), vec![10.0, 11.0, 12.0]),
            ("MUL".to_string(), vec![100.0, 110.0, 105.0]),
        ];
        let path = write_csv(&dir, "expr", &setting, &outcome, &stats, &series, "us").unwrap();
        let body = std::fs::read_to_string(&path).unwrap();
        assert!(body.starts_with(&format!("{}, precision=1,us", setting.label())));
        assert!(body.contains(" ,ENCODE,MUL"));
        assert!(body.contains("Avg,11,105"));
        assert!(body.lines().count() >= 12);
        std::fs::remove_file(path).ok();
    }
}
