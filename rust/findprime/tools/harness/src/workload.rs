use std::fmt;
use std::io::{self, Write};

use findprime::{calc_nth_prime, FinderConfig};

use crate::error::Result;

/// The measured computation plus the destination of its report lines.
pub struct Workload {
    config: FinderConfig,
    output: Box<dyn Write>,
    invocations: u64,
}

impl fmt::Debug for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workload")
            .field("config", &self.config)
            .field("invocations", &self.invocations)
            .finish()
    }
}

impl Workload {
    /// Creates a workload that writes report lines to `output`.
    pub fn new(config: FinderConfig, output: Box<dyn Write>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            output,
            invocations: 0,
        })
    }

    /// Writes report lines to standard output.
    pub fn stdout(config: FinderConfig) -> Result<Self> {
        Self::new(config, Box::new(io::stdout()))
    }

    /// Discards report lines.
    pub fn quiet(config: FinderConfig) -> Result<Self> {
        Self::new(config, Box::new(io::sink()))
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Total finder invocations so far, across all benchmarks.
    pub fn invocations(&self) -> u64 {
        self.invocations
    }

    /// One finder invocation.
    pub fn calc_nth_prime(&mut self) -> Result<()> {
        calc_nth_prime(&self.config, &mut *self.output)?;
        self.invocations += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }
}
