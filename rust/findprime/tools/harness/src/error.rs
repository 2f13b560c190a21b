use std::path::PathBuf;

use thiserror::Error;

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Errors that can occur while running or reporting benchmarks
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The measured workload failed
    #[error("Workload error: {0}")]
    FindPrime(#[from] findprime::FindPrimeError),

    /// Errors related to I/O operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown time unit: {0}")]
    UnknownTimeUnit(String),

    /// The benchmark filter is not a valid regular expression
    #[error("Invalid benchmark filter: {0}")]
    InvalidFilter(#[from] regex::Error),

    /// A benchmark asked for an argument it was not registered with
    #[error("Benchmark argument {index} missing (benchmark has {available})")]
    MissingArgument { index: usize, available: usize },

    /// A benchmark function returned without entering its timed loop
    #[error("Benchmark '{0}' did not run any iterations")]
    NoIterations(String),

    /// The executable search pattern is not a valid glob
    #[error("Invalid executable pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    /// An external benchmark executable exited unsuccessfully
    #[error("Benchmark executable {} failed ({status}): {stderr}", .executable.display())]
    BenchmarkFailed {
        executable: PathBuf,
        status: String,
        stderr: String,
    },
}
