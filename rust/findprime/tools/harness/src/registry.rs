use std::fmt;

use regex::Regex;

use crate::error::{HarnessError, Result};
use crate::state::State;
use crate::workload::Workload;

/// Signature of a registered benchmark.
pub type BenchmarkFn = fn(&mut State, &mut Workload) -> Result<()>;

/// Repetition counts registered for the parameterized benchmarks.
pub const REPEAT_ARGS: &[i64] = &[2, 4, 6];

/// A benchmark function with the arguments it should be run with.
#[derive(Clone)]
pub struct Benchmark {
    name: String,
    func: BenchmarkFn,
    args: Vec<i64>,
}

impl Benchmark {
    pub fn new(name: impl Into<String>, func: BenchmarkFn) -> Self {
        Self {
            name: name.into(),
            func,
            args: Vec::new(),
        }
    }

    /// Adds one instance of the benchmark run with `arg` as `range(0)`.
    pub fn arg(mut self, arg: i64) -> Self {
        self.args.push(arg);
        self
    }

    pub fn args(mut self, args: &[i64]) -> Self {
        self.args.extend_from_slice(args);
        self
    }

    /// Expands into one instance per argument, named `name/arg`.
    pub fn instances(&self) -> Vec<BenchmarkInstance> {
        if self.args.is_empty() {
            return vec![BenchmarkInstance {
                name: self.name.clone(),
                args: Vec::new(),
                func: self.func,
            }];
        }

        self.args
            .iter()
            .map(|arg| BenchmarkInstance {
                name: format!("{}/{}", self.name, arg),
                args: vec![*arg],
                func: self.func,
            })
            .collect()
    }
}

impl fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Benchmark")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

/// A single runnable benchmark configuration.
#[derive(Clone)]
pub struct BenchmarkInstance {
    pub name: String,
    pub args: Vec<i64>,
    pub func: BenchmarkFn,
}

impl fmt::Debug for BenchmarkInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BenchmarkInstance")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish()
    }
}

impl BenchmarkInstance {
    /// Runs the benchmark function once with `iterations` as the iteration budget.
    pub fn measure(&self, iterations: u64, workload: &mut Workload) -> Result<State> {
        let mut state = State::new(iterations, self.args.clone());
        (self.func)(&mut state, workload)?;
        if state.iterations() == 0 && iterations > 0 {
            return Err(HarnessError::NoIterations(self.name.clone()));
        }
        Ok(state)
    }
}

/// Ordered collection of benchmarks.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    benchmarks: Vec<Benchmark>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, benchmark: Benchmark) -> &mut Self {
        self.benchmarks.push(benchmark);
        self
    }

    /// All instances, in registration order.
    pub fn instances(&self) -> Vec<BenchmarkInstance> {
        self.benchmarks.iter().flat_map(Benchmark::instances).collect()
    }

    /// Instances whose name matches `filter`, or all of them.
    pub fn matching(&self, filter: Option<&Regex>) -> Vec<BenchmarkInstance> {
        self.instances()
            .into_iter()
            .filter(|instance| filter.map_or(true, |re| re.is_match(&instance.name)))
            .collect()
    }
}

/// One finder invocation per iteration.
pub fn calc_nth_prime_benchmark(state: &mut State, workload: &mut Workload) -> Result<()> {
    state.iter(|| workload.calc_nth_prime())
}

/// `range(0)` finder invocations per iteration.
pub fn calc_nth_prime_args_benchmark(state: &mut State, workload: &mut Workload) -> Result<()> {
    let repeat = repeat_count(state)?;
    state.iter(|| {
        for _ in 0..repeat {
            workload.calc_nth_prime()?;
        }
        Ok(())
    })
}

/// `range(0)` repetitions of two back-to-back finder invocations per iteration.
pub fn calc_nth_prime_args_x2_benchmark(state: &mut State, workload: &mut Workload) -> Result<()> {
    let repeat = repeat_count(state)?;
    state.iter(|| {
        for _ in 0..repeat {
            workload.calc_nth_prime()?;
            workload.calc_nth_prime()?;
        }
        Ok(())
    })
}

fn repeat_count(state: &State) -> Result<u64> {
    let repeat = state.range(0)?;
    u64::try_from(repeat).map_err(|_| {
        HarnessError::InvalidArgument(format!("repeat count must not be negative, got {}", repeat))
    })
}

/// The reference suite: a plain run plus two parameterized variants.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register(Benchmark::new("calc_nth_prime", calc_nth_prime_benchmark))
        .register(Benchmark::new("calc_nth_prime_args", calc_nth_prime_args_benchmark).args(REPEAT_ARGS))
        .register(
            Benchmark::new("calc_nth_prime_args_x2", calc_nth_prime_args_x2_benchmark).args(REPEAT_ARGS),
        );
    registry
}
