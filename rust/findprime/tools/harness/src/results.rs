//! Benchmark result records and their JSON file format.
//!
//! Field names follow the JSON written by google-benchmark's
//! `--benchmark_out_format=json`, so result files from either tool can be read.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::time_unit::TimeUnit;

/// Machine and process details recorded alongside a set of runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub date: String,
    #[serde(default)]
    pub executable: PathBuf,
    pub num_cpus: usize,
    #[serde(default)]
    pub mhz_per_cpu: u64,
    #[serde(default)]
    pub library_build_type: String,
}

impl Context {
    /// Describes the current process and machine.
    pub fn current() -> Self {
        let executable = std::env::current_exe().unwrap_or_else(|e| {
            warn!("could not determine executable path: {}", e);
            PathBuf::new()
        });
        let mhz_per_cpu = std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|text| parse_cpu_mhz(&text))
            .unwrap_or(0);

        Self {
            date: chrono::Local::now().to_rfc3339(),
            executable,
            num_cpus: num_cpus::get(),
            mhz_per_cpu,
            library_build_type: if cfg!(debug_assertions) {
                "debug".to_string()
            } else {
                "release".to_string()
            },
        }
    }
}

/// Reads the first `cpu MHz` entry of a `/proc/cpuinfo` listing.
pub fn parse_cpu_mhz(cpuinfo: &str) -> Option<u64> {
    cpuinfo
        .lines()
        .filter(|line| line.starts_with("cpu MHz"))
        .find_map(|line| line.split(':').nth(1))
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|mhz| mhz.is_finite() && *mhz >= 0.0)
        .map(|mhz| mhz.round() as u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    Iteration,
    Aggregate,
}

/// One measured benchmark, or an aggregate over repetitions of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub name: String,
    #[serde(default)]
    pub run_name: String,
    #[serde(default = "default_run_type")]
    pub run_type: RunType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate_name: Option<String>,
    #[serde(default = "default_repetitions")]
    pub repetitions: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_index: Option<u32>,
    pub iterations: u64,
    /// Wall-clock time per iteration, in `time_unit`
    pub real_time: f64,
    /// Process CPU time per iteration, in `time_unit`
    pub cpu_time: f64,
    #[serde(default)]
    pub time_unit: Option<TimeUnit>,
}

fn default_run_type() -> RunType {
    RunType::Iteration
}

fn default_repetitions() -> u32 {
    1
}

impl Run {
    /// Builds an iteration run from totals measured over `iterations` iterations.
    pub fn from_totals(
        run_name: &str,
        iterations: u64,
        total_real: Duration,
        total_cpu: Duration,
        unit: TimeUnit,
    ) -> Self {
        let divisor = iterations.max(1) as f64;
        Self {
            name: run_name.to_string(),
            run_name: run_name.to_string(),
            run_type: RunType::Iteration,
            aggregate_name: None,
            repetitions: 1,
            repetition_index: None,
            iterations,
            real_time: unit.from_duration(total_real) / divisor,
            cpu_time: unit.from_duration(total_cpu) / divisor,
            time_unit: Some(unit),
        }
    }

    /// The unit the times are expressed in. Missing units are read as nanoseconds.
    pub fn unit(&self) -> TimeUnit {
        match self.time_unit {
            Some(unit) => unit,
            None => {
                warn!("no time unit recorded for '{}', assuming ns", self.name);
                TimeUnit::Nanosecond
            }
        }
    }

    pub fn real_duration(&self) -> Duration {
        self.unit().to_duration(self.real_time)
    }

    pub fn cpu_duration(&self) -> Duration {
        self.unit().to_duration(self.cpu_time)
    }

    /// Returns a copy with times re-expressed in `target`.
    pub fn in_unit(&self, target: TimeUnit) -> Self {
        let from = self.unit();
        Self {
            real_time: from.convert(self.real_time, target),
            cpu_time: from.convert(self.cpu_time, target),
            time_unit: Some(target),
            ..self.clone()
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.run_type == RunType::Aggregate
    }
}

/// Computes `mean`, `median` and `stddev` runs over repetitions of one benchmark.
///
/// All inputs must share `run_name` and `time_unit`; fewer than two runs give no aggregates.
pub fn aggregate(runs: &[Run]) -> Vec<Run> {
    let Some(first) = runs.first() else {
        return Vec::new();
    };
    if runs.len() < 2 {
        return Vec::new();
    }

    let real: Vec<f64> = runs.iter().map(|run| run.real_time).collect();
    let cpu: Vec<f64> = runs.iter().map(|run| run.cpu_time).collect();

    let stats: [(&str, fn(&[f64]) -> f64); 3] =
        [("mean", mean), ("median", median), ("stddev", stddev)];

    stats
        .iter()
        .map(|(label, stat)| Run {
            name: format!("{}_{}", first.run_name, label),
            run_name: first.run_name.clone(),
            run_type: RunType::Aggregate,
            aggregate_name: Some(label.to_string()),
            repetitions: runs.len() as u32,
            repetition_index: None,
            iterations: runs.len() as u64,
            real_time: stat(&real),
            cpu_time: stat(&cpu),
            time_unit: first.time_unit,
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// Sample standard deviation, matching google-benchmark's aggregate.
fn stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// A result file: context plus every run, aggregates included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResults {
    pub context: Context,
    pub benchmarks: Vec<Run>,
}

impl BenchmarkResults {
    pub fn new(context: Context, benchmarks: Vec<Run>) -> Self {
        Self {
            context,
            benchmarks,
        }
    }

    /// Returns a copy with every run re-expressed in `unit`.
    pub fn in_unit(&self, unit: TimeUnit) -> Self {
        Self {
            context: self.context.clone(),
            benchmarks: self.benchmarks.iter().map(|run| run.in_unit(unit)).collect(),
        }
    }
}

/// Contents of a file written by either [`write_results_file`] or [`write_results_sets`].
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultsDocument {
    Single(BenchmarkResults),
    Many(Vec<BenchmarkResults>),
}

/// Reads a JSON file holding one result set or a list of them.
pub fn parse_results_sets<P: AsRef<Path>>(path: P) -> Result<Vec<BenchmarkResults>> {
    let file = File::open(path)?;
    let sets = match serde_json::from_reader(BufReader::new(file))? {
        ResultsDocument::Single(results) => vec![results],
        ResultsDocument::Many(sets) => sets,
    };
    Ok(sets)
}

/// Writes several result sets, one per executed benchmark, as a JSON list.
pub fn write_results_sets<P: AsRef<Path>>(path: P, sets: &[BenchmarkResults]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, sets)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a JSON result file.
pub fn parse_results_file<P: AsRef<Path>>(path: P) -> Result<BenchmarkResults> {
    let file = File::open(path)?;
    let results = serde_json::from_reader(BufReader::new(file))?;
    Ok(results)
}

/// Writes a JSON result file, replacing any existing one.
pub fn write_results_file<P: AsRef<Path>>(path: P, results: &BenchmarkResults) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, results)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(real: f64) -> Run {
        Run {
            real_time: real,
            cpu_time: real / 2.0,
            ..Run::from_totals("calc_nth_prime", 10, Duration::ZERO, Duration::ZERO, TimeUnit::Millisecond)
        }
    }

    #[test]
    fn test_from_totals_divides_by_iterations() {
        let run = Run::from_totals(
            "calc_nth_prime_args/2",
            4,
            Duration::from_millis(100),
            Duration::from_millis(80),
            TimeUnit::Millisecond,
        );
        assert_eq!(run.real_time, 25.0);
        assert_eq!(run.cpu_time, 20.0);
        assert_eq!(run.iterations, 4);
        assert_eq!(run.time_unit, Some(TimeUnit::Millisecond));
    }

    #[test]
    fn test_aggregates() {
        let runs = vec![run(1.0), run(3.0), run(2.0), run(6.0)];
        let aggregates = aggregate(&runs);
        let names: Vec<&str> = aggregates.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["calc_nth_prime_mean", "calc_nth_prime_median", "calc_nth_prime_stddev"]
        );

        assert_eq!(aggregates[0].real_time, 3.0);
        assert_eq!(aggregates[1].real_time, 2.5);
        // sample variance of 1,3,2,6 around 3 is 14 / 3
        assert!((aggregates[2].real_time - (14.0_f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!(aggregates.iter().all(|r| r.is_aggregate() && r.repetitions == 4));
    }

    #[test]
    fn test_single_run_has_no_aggregates() {
        assert!(aggregate(&[run(1.0)]).is_empty());
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_in_unit() {
        let converted = run(2.0).in_unit(TimeUnit::Microsecond);
        assert_eq!(converted.real_time, 2000.0);
        assert_eq!(converted.cpu_time, 1000.0);
        assert_eq!(converted.time_unit, Some(TimeUnit::Microsecond));
    }

    #[test]
    fn test_missing_time_unit_is_nanoseconds() {
        let json = r#"{"name": "bm", "iterations": 3, "real_time": 1500.0, "cpu_time": 1000.0}"#;
        let run: Run = serde_json::from_str(json).unwrap();
        assert_eq!(run.time_unit, None);
        assert_eq!(run.run_type, RunType::Iteration);
        assert_eq!(run.real_duration(), Duration::from_nanos(1500));
    }

    #[test]
    fn test_parse_cpu_mhz() {
        let cpuinfo = "processor\t: 0\nmodel name\t: Test CPU\ncpu MHz\t\t: 2399.998\n\nprocessor\t: 1\ncpu MHz\t\t: 1200.000\n";
        assert_eq!(parse_cpu_mhz(cpuinfo), Some(2400));
        assert_eq!(parse_cpu_mhz("processor\t: 0\n"), None);
    }
}
