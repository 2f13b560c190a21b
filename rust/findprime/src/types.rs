use std::fmt;
use std::str::FromStr;

use crate::error::FindPrimeError;

/// Unsigned integer type usable as a search candidate.
///
/// Implemented for `u8`, `u16`, `u32`, `u64` and `usize`. Narrow widths are
/// mostly useful for exercising the overflow path.
pub trait Candidate: Copy + Ord + fmt::Debug + fmt::Display {
    const ONE: Self;
    const TWO: Self;

    /// Returns `self + 1`, or `None` if that is not representable.
    fn checked_increment(self) -> Option<Self>;

    /// Returns true if `divisor` divides `self` evenly. `divisor` is never zero.
    fn is_divisible_by(self, divisor: Self) -> bool;

    /// Returns true if `self * self > limit`, treating an overflowing square as larger.
    fn square_exceeds(self, limit: Self) -> bool;

    /// Widens the value for reporting.
    fn to_u64(self) -> u64;
}

macro_rules! impl_candidate {
    ($($t:ty),*) => {
        $(
            impl Candidate for $t {
                const ONE: Self = 1;
                const TWO: Self = 2;

                #[inline]
                fn checked_increment(self) -> Option<Self> {
                    self.checked_add(1)
                }

                #[inline]
                fn is_divisible_by(self, divisor: Self) -> bool {
                    self % divisor == 0
                }

                #[inline]
                fn square_exceeds(self, limit: Self) -> bool {
                    match self.checked_mul(self) {
                        Some(square) => square > limit,
                        None => true,
                    }
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_candidate!(u8, u16, u32, u64, usize);

/// How many divisors the primality test tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimalityMode {
    /// Every divisor in `[2, n)`. This is the workload being measured.
    #[default]
    TrialDivision,

    /// Stops once `j * j > n`. Same answers, far less work.
    SquareRootBounded,
}

impl PrimalityMode {
    /// Short name used on the command line and in benchmark labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimalityMode::TrialDivision => "naive",
            PrimalityMode::SquareRootBounded => "sqrt",
        }
    }
}

impl fmt::Display for PrimalityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for PrimalityMode {
    type Err = FindPrimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "naive" | "trial-division" => Ok(PrimalityMode::TrialDivision),
            "sqrt" | "square-root" => Ok(PrimalityMode::SquareRootBounded),
            other => Err(FindPrimeError::InvalidArgument(format!(
                "unknown primality mode '{}', expected 'naive' or 'sqrt'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_exceeds_handles_overflow() {
        assert!(!3_u8.square_exceeds(9));
        assert!(4_u8.square_exceeds(9));
        // 16 * 16 = 256 does not fit in a u8
        assert!(16_u8.square_exceeds(255));
    }

    #[test]
    fn test_checked_increment_at_max() {
        assert_eq!(254_u8.checked_increment(), Some(255));
        assert_eq!(u8::MAX.checked_increment(), None);
        assert_eq!(u64::MAX.checked_increment(), None);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("naive".parse::<PrimalityMode>().unwrap(), PrimalityMode::TrialDivision);
        assert_eq!("SQRT".parse::<PrimalityMode>().unwrap(), PrimalityMode::SquareRootBounded);
        assert!("sieve".parse::<PrimalityMode>().is_err());
        assert_eq!(PrimalityMode::default(), PrimalityMode::TrialDivision);
    }
}
