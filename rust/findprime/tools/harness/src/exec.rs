//! Discovery and execution of external google-benchmark executables.

use std::path::{Path, PathBuf};
use std::process::Command;

use glob::Pattern;
use is_executable::IsExecutable;
use log::{info, warn};
use walkdir::WalkDir;

use crate::error::{HarnessError, Result};
use crate::results::{parse_results_file, BenchmarkResults};

/// Path pattern a file must match to count as a benchmark executable.
pub const DEFAULT_EXECUTABLE_PATTERN: &str = "*-benchmark*";

/// Walks `root` for executable files whose path matches `pattern`.
///
/// Unreadable entries are skipped with a warning. Results are sorted by path.
pub fn find_executable_benchmarks<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = Pattern::new(pattern)?;

    let mut found: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.path().is_executable())
        .filter(|entry| pattern.matches_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    found.sort();
    Ok(found)
}

/// Runs one executable with JSON output to a temporary file and parses the result.
pub fn execute_benchmark(executable: &Path) -> Result<BenchmarkResults> {
    let out_file = tempfile::Builder::new()
        .prefix("findprime-bench-")
        .suffix(".json")
        .tempfile()?;

    info!("executing {}", executable.display());
    let output = Command::new(executable)
        .arg(format!("--benchmark_out={}", out_file.path().display()))
        .arg("--benchmark_out_format=json")
        .output()?;

    if !output.status.success() {
        return Err(HarnessError::BenchmarkFailed {
            executable: executable.to_path_buf(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let mut results = parse_results_file(out_file.path())?;
    if results.context.executable.as_os_str().is_empty() {
        results.context.executable = executable.to_path_buf();
    }
    out_file.close()?;
    Ok(results)
}

/// Runs every executable in order, stopping at the first failure.
pub fn execute_benchmarks(executables: &[PathBuf]) -> Result<Vec<BenchmarkResults>> {
    let mut all_results = Vec::with_capacity(executables.len());
    for (index, executable) in executables.iter().enumerate() {
        let results = execute_benchmark(executable)?;
        info!(
            "[{}/{}] {}: {} runs",
            index + 1,
            executables.len(),
            executable.display(),
            results.benchmarks.len()
        );
        all_results.push(results);
    }
    Ok(all_results)
}
