use std::fmt;
use std::io::Write;
use std::marker::PhantomData;

use log::trace;

use crate::config::FinderConfig;
use crate::error::{FindPrimeError, Result};
use crate::primality::is_prime_with_mode;
use crate::types::{Candidate, PrimalityMode};

/// The outcome of one search: the `n`th prime is `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthPrime<T = u64> {
    pub n: u64,
    pub value: T,
}

impl<T: Candidate> fmt::Display for NthPrime<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}th prime number is {}.", self.n, self.value)
    }
}

/// Counts primes upward from 2 until the target count is reached.
///
/// The candidate type bounds the search: once the next candidate would not fit
/// in `T` the search stops with [`FindPrimeError::Overflow`]. Every call to
/// [`find`](Self::find) starts from scratch, so repeated calls are independent.
///
/// ```
/// use findprime::NthPrimeFinder;
///
/// let prime = NthPrimeFinder::<u32>::new(5).find().unwrap();
/// assert_eq!(prime.value, 11);
/// assert_eq!(prime.to_string(), "5th prime number is 11.");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct NthPrimeFinder<T = u64> {
    target: u64,
    mode: PrimalityMode,
    _candidate: PhantomData<T>,
}

impl<T: Candidate> NthPrimeFinder<T> {
    /// Creates a finder for the `target`th prime using naive trial division.
    pub fn new(target: u64) -> Self {
        Self {
            target,
            mode: PrimalityMode::TrialDivision,
            _candidate: PhantomData,
        }
    }

    /// Creates a finder from a [`FinderConfig`].
    pub fn from_config(config: &FinderConfig) -> Self {
        Self::new(config.target).with_mode(config.mode)
    }

    /// Sets the primality mode.
    pub fn with_mode(mut self, mode: PrimalityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Runs the search.
    pub fn find(&self) -> Result<NthPrime<T>> {
        if self.target == 0 {
            return Err(FindPrimeError::InvalidArgument(
                "target count must be positive, got 0".to_string(),
            ));
        }

        let mut candidate = T::ONE;
        let mut count: u64 = 0;

        loop {
            candidate = candidate.checked_increment().ok_or(FindPrimeError::Overflow {
                target: self.target,
                found: count,
            })?;

            if is_prime_with_mode(candidate, self.mode) {
                count += 1;
            }

            if count == self.target {
                trace!("found prime #{} = {} ({} mode)", count, candidate, self.mode);
                return Ok(NthPrime {
                    n: self.target,
                    value: candidate,
                });
            }
        }
    }

    /// Runs the search and writes the report line to `writer`.
    pub fn report<W: Write + ?Sized>(&self, writer: &mut W) -> Result<NthPrime<T>> {
        let prime = self.find()?;
        writeln!(writer, "{}", prime)?;
        Ok(prime)
    }
}

/// Returns the `n`th prime using naive trial division over `u64` candidates.
pub fn compute_nth_prime(n: u64) -> Result<u64> {
    NthPrimeFinder::<u64>::new(n).find().map(|prime| prime.value)
}

/// Benchmark body: finds the configured prime and writes one report line.
///
/// The returned status carries no information beyond success.
pub fn calc_nth_prime<W: Write + ?Sized>(config: &FinderConfig, writer: &mut W) -> Result<()> {
    NthPrimeFinder::<u64>::from_config(config).report(writer)?;
    Ok(())
}
