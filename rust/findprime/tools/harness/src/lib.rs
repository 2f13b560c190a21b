//! Timed benchmark harness for the findprime workload.
//!
//! Benchmarks are plain functions registered with optional arguments. The
//! [`Runner`] picks an iteration count for each one, measures wall-clock and
//! process CPU time, and passes the [`Run`]s to a [`Reporter`]. Result files use
//! the google-benchmark JSON layout, so the same tools can also [`exec`] external
//! google-benchmark executables and [`plot`] their results.

pub mod cpu_time;
pub mod error;
pub mod exec;
pub mod plot;
pub mod registry;
pub mod report;
pub mod results;
pub mod runner;
pub mod state;
pub mod time_unit;
pub mod workload;

pub use error::{HarnessError, Result};
pub use exec::{execute_benchmark, execute_benchmarks, find_executable_benchmarks, DEFAULT_EXECUTABLE_PATTERN};
pub use plot::{build_plot, write_plot, PlotKind};
pub use registry::{default_registry, Benchmark, BenchmarkFn, BenchmarkInstance, Registry};
pub use report::{ConsoleReporter, CsvReporter, JsonReporter, MultiReporter, Reporter};
pub use results::{
    parse_results_file, parse_results_sets, write_results_file, write_results_sets, BenchmarkResults,
    Context, Run, RunType,
};
pub use runner::{HarnessConfig, Runner};
pub use state::State;
pub use time_unit::TimeUnit;
pub use workload::Workload;
