use crate::error::{FindPrimeError, Result};
use crate::types::PrimalityMode;

/// Target count used when nothing else is configured.
pub const DEFAULT_TARGET: u64 = 2000;

/// Build-time override for the target count, read from `FINDPRIME_N_VALUE` when compiling.
pub const BUILD_TARGET_ENV: Option<&str> = option_env!("FINDPRIME_N_VALUE");

/// Parses a target count, rejecting zero, negative and non-numeric values.
pub fn parse_target(value: &str) -> Result<u64> {
    let trimmed = value.trim();
    let parsed: i128 = trimmed.parse().map_err(|_| {
        FindPrimeError::InvalidArgument(format!("target count '{}' is not an integer", trimmed))
    })?;
    target_from_signed(parsed)
}

/// Converts a signed count into a target, rejecting anything below 1.
pub fn target_from_signed(value: i128) -> Result<u64> {
    if value <= 0 {
        return Err(FindPrimeError::InvalidArgument(format!(
            "target count must be positive, got {}",
            value
        )));
    }
    u64::try_from(value).map_err(|_| {
        FindPrimeError::InvalidArgument(format!("target count {} is out of range", value))
    })
}

/// Target count baked in at build time, or [`DEFAULT_TARGET`].
pub fn build_time_target() -> Result<u64> {
    target_from_build_value(BUILD_TARGET_ENV)
}

/// Resolves an optional build-time value into a target count.
pub fn target_from_build_value(value: Option<&str>) -> Result<u64> {
    match value {
        Some(value) => parse_target(value),
        None => Ok(DEFAULT_TARGET),
    }
}

/// Settings for one Nth-prime search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinderConfig {
    /// 1-indexed position of the prime to find
    pub target: u64,

    /// Divisor bound used by the primality test
    pub mode: PrimalityMode,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            mode: PrimalityMode::TrialDivision,
        }
    }
}

impl FinderConfig {
    /// Creates a config with the default target and the naive mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a config whose target comes from the build-time override, if any.
    pub fn from_build_env() -> Result<Self> {
        Ok(Self::default().with_target(build_time_target()?))
    }

    /// Sets the target count.
    pub fn with_target(mut self, target: u64) -> Self {
        self.target = target;
        self
    }

    /// Sets the primality mode.
    pub fn with_mode(mut self, mode: PrimalityMode) -> Self {
        self.mode = mode;
        self
    }

    /// Checks that the target is usable.
    pub fn validate(&self) -> Result<()> {
        if self.target == 0 {
            return Err(FindPrimeError::InvalidArgument(
                "target count must be positive, got 0".to_string(),
            ));
        }
        Ok(())
    }
}
