use std::time::Duration;

use log::{debug, info};
use regex::Regex;

use crate::error::{HarnessError, Result};
use crate::registry::{BenchmarkInstance, Registry};
use crate::report::Reporter;
use crate::results::{aggregate, Context, Run};
use crate::time_unit::TimeUnit;
use crate::workload::Workload;

/// Default values for HarnessConfig
pub const DEFAULT_MIN_TIME: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_ITERATIONS: u64 = 1_000_000_000;
pub const DEFAULT_REPETITIONS: u32 = 1;

/// Largest factor the iteration count may grow by between attempts.
const MAX_GROWTH: f64 = 10.0;
/// Overshoot applied to the predicted iteration count.
const GROWTH_MARGIN: f64 = 1.4;

/// Settings for a harness run
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Minimum measured wall-clock time per benchmark
    pub min_time: Duration,

    /// Upper bound on iterations per measurement
    pub max_iterations: u64,

    /// Measurements per benchmark; aggregates are reported when above 1
    pub repetitions: u32,

    /// Regular expression selecting benchmarks by name
    pub filter: Option<String>,

    /// Unit used for recorded per-iteration times
    pub time_unit: TimeUnit,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            min_time: DEFAULT_MIN_TIME,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            repetitions: DEFAULT_REPETITIONS,
            filter: None,
            time_unit: TimeUnit::Millisecond,
        }
    }
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_time(mut self, min_time: Duration) -> Self {
        self.min_time = min_time;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_time_unit(mut self, time_unit: TimeUnit) -> Self {
        self.time_unit = time_unit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(HarnessError::InvalidArgument(
                "max iterations must be at least 1".to_string(),
            ));
        }
        if self.repetitions == 0 {
            return Err(HarnessError::InvalidArgument(
                "repetitions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Predicts the iteration count for the next attempt after `iterations`
/// took `elapsed` and fell short of `min_time`.
pub fn next_iterations(iterations: u64, elapsed: Duration, min_time: Duration, max_iterations: u64) -> u64 {
    let elapsed_secs = elapsed.as_secs_f64();
    let min_secs = min_time.as_secs_f64();

    // Very short runs are too noisy to extrapolate from.
    let mut multiplier = if min_secs > 0.0 && elapsed_secs / min_secs > 0.1 {
        min_secs * GROWTH_MARGIN / elapsed_secs.max(1e-9)
    } else {
        MAX_GROWTH
    };
    multiplier = multiplier.min(MAX_GROWTH);
    if multiplier <= 1.0 {
        multiplier = 2.0;
    }

    let predicted = (iterations as f64 * multiplier).round();
    let predicted = if predicted >= max_iterations as f64 {
        max_iterations
    } else {
        predicted as u64
    };
    predicted.max(iterations.saturating_add(1)).min(max_iterations)
}

/// Runs registered benchmarks and hands their results to a reporter.
#[derive(Debug, Clone, Default)]
pub struct Runner {
    config: HarnessConfig,
}

impl Runner {
    pub fn new(config: HarnessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Compiles the configured filter, if any.
    pub fn filter(&self) -> Result<Option<Regex>> {
        match &self.config.filter {
            Some(pattern) => Ok(Some(Regex::new(pattern)?)),
            None => Ok(None),
        }
    }

    /// Runs every matching benchmark in registration order and returns all runs,
    /// aggregates included.
    pub fn run(
        &self,
        registry: &Registry,
        workload: &mut Workload,
        reporter: &mut dyn Reporter,
    ) -> Result<Vec<Run>> {
        let filter = self.filter()?;
        let instances = registry.matching(filter.as_ref());
        if instances.is_empty() {
            return Err(match &self.config.filter {
                Some(pattern) => {
                    HarnessError::InvalidArgument(format!("no benchmarks match filter '{}'", pattern))
                }
                None => HarnessError::InvalidArgument("registry is empty".to_string()),
            });
        }

        reporter.report_context(&Context::current())?;

        let mut all_runs = Vec::new();
        for instance in &instances {
            let mut runs = Vec::with_capacity(self.config.repetitions as usize);
            for repetition in 0..self.config.repetitions {
                let mut run = self.measure(instance, workload)?;
                run.repetitions = self.config.repetitions;
                if self.config.repetitions > 1 {
                    run.repetition_index = Some(repetition);
                }
                runs.push(run);
            }
            runs.extend(aggregate(&runs));
            workload.flush()?;

            reporter.report_runs(&runs)?;
            all_runs.extend(runs);
        }

        reporter.finalize()?;
        info!(
            "ran {} benchmarks, {} finder invocations",
            instances.len(),
            workload.invocations()
        );
        Ok(all_runs)
    }

    /// Grows the iteration count until one measurement lasts at least `min_time`.
    pub fn measure(&self, instance: &BenchmarkInstance, workload: &mut Workload) -> Result<Run> {
        let mut iterations = 1;
        loop {
            let state = instance.measure(iterations, workload)?;
            let elapsed = state.real_time();
            debug!(
                "{}: {} iterations in {:?} (cpu {:?})",
                instance.name,
                state.iterations(),
                elapsed,
                state.cpu_time()
            );

            if elapsed >= self.config.min_time || iterations >= self.config.max_iterations {
                return Ok(Run::from_totals(
                    &instance.name,
                    state.iterations(),
                    elapsed,
                    state.cpu_time(),
                    self.config.time_unit,
                ));
            }

            iterations = next_iterations(
                iterations,
                elapsed,
                self.config.min_time,
                self.config.max_iterations,
            );
        }
    }
}
