use std::time::{Duration, Instant};

use crate::cpu_time::process_cpu_time;
use crate::error::{HarnessError, Result};

/// Handle passed to a benchmark function for one measurement.
///
/// The runner decides how many iterations to run; the benchmark function calls
/// [`iter`](Self::iter) with the code to measure and reads its registered
/// arguments through [`range`](Self::range).
#[derive(Debug)]
pub struct State {
    max_iterations: u64,
    args: Vec<i64>,
    completed: u64,
    real_time: Duration,
    cpu_time: Duration,
}

impl State {
    pub fn new(max_iterations: u64, args: Vec<i64>) -> Self {
        Self {
            max_iterations,
            args,
            completed: 0,
            real_time: Duration::ZERO,
            cpu_time: Duration::ZERO,
        }
    }

    /// Returns the registered argument at `index`.
    pub fn range(&self, index: usize) -> Result<i64> {
        self.args
            .get(index)
            .copied()
            .ok_or(HarnessError::MissingArgument {
                index,
                available: self.args.len(),
            })
    }

    /// Runs `body` once per iteration inside the timed region.
    ///
    /// Stops at the first error; iterations completed up to that point stay recorded.
    pub fn iter<F>(&mut self, mut body: F) -> Result<()>
    where
        F: FnMut() -> Result<()>,
    {
        let cpu_start = process_cpu_time();
        let start = Instant::now();

        let mut outcome = Ok(());
        while self.completed < self.max_iterations {
            if let Err(e) = body() {
                outcome = Err(e);
                break;
            }
            self.completed += 1;
        }

        self.real_time += start.elapsed();
        self.cpu_time += process_cpu_time().saturating_sub(cpu_start);
        outcome
    }

    /// Iterations that finished inside [`iter`](Self::iter).
    pub fn iterations(&self) -> u64 {
        self.completed
    }

    pub fn real_time(&self) -> Duration {
        self.real_time
    }

    pub fn cpu_time(&self) -> Duration {
        self.cpu_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iter_runs_requested_iterations() {
        let mut state = State::new(17, vec![]);
        let mut calls = 0;
        state
            .iter(|| {
                calls += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(calls, 17);
        assert_eq!(state.iterations(), 17);
    }

    #[test]
    fn test_iter_stops_on_error() {
        let mut state = State::new(10, vec![]);
        let mut calls = 0;
        let result = state.iter(|| {
            calls += 1;
            if calls == 4 {
                Err(HarnessError::InvalidArgument("boom".to_string()))
            } else {
                Ok(())
            }
        });
        assert!(result.is_err());
        assert_eq!(state.iterations(), 3);
    }

    #[test]
    fn test_range() {
        let state = State::new(1, vec![4]);
        assert_eq!(state.range(0).unwrap(), 4);
        assert!(matches!(
            state.range(1),
            Err(HarnessError::MissingArgument {
                index: 1,
                available: 1
            })
        ));
    }
}
