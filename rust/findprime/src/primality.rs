//! Trial-division primality test.

use crate::types::{Candidate, PrimalityMode};

/// Returns true if `number` is prime, trying every divisor in `[2, number)`.
///
/// This is deliberately O(n): it is the work the benchmarks measure.
/// Values below 2 are reported as not prime.
pub fn is_prime<T: Candidate>(number: T) -> bool {
    is_prime_with_mode(number, PrimalityMode::TrialDivision)
}

/// Returns true if `number` is prime, using the given divisor bound.
pub fn is_prime_with_mode<T: Candidate>(number: T, mode: PrimalityMode) -> bool {
    if number < T::TWO {
        return false;
    }

    match mode {
        PrimalityMode::TrialDivision => trial_division(number),
        PrimalityMode::SquareRootBounded => square_root_bounded(number),
    }
}

fn trial_division<T: Candidate>(number: T) -> bool {
    let mut divisor = T::TWO;
    while divisor < number {
        if number.is_divisible_by(divisor) {
            return false;
        }
        // divisor < number, so the increment cannot overflow
        divisor = match divisor.checked_increment() {
            Some(next) => next,
            None => break,
        };
    }
    true
}

fn square_root_bounded<T: Candidate>(number: T) -> bool {
    let mut divisor = T::TWO;
    while divisor < number && !divisor.square_exceeds(number) {
        if number.is_divisible_by(divisor) {
            return false;
        }
        divisor = match divisor.checked_increment() {
            Some(next) => next,
            None => break,
        };
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_divisor_below(n: u64) -> bool {
        (2..n).any(|j| n % j == 0)
    }

    #[test]
    fn test_smallest_prime() {
        assert!(is_prime(2_u32));
    }

    #[test]
    fn test_first_composite() {
        assert!(!is_prime(4_u32));
    }

    #[test]
    fn test_below_two_is_not_prime() {
        assert!(!is_prime(0_u64));
        assert!(!is_prime(1_u64));
        assert!(!is_prime_with_mode(1_u8, PrimalityMode::SquareRootBounded));
    }

    #[test]
    fn test_matches_divisor_definition() {
        for n in 2..600_u64 {
            assert_eq!(is_prime(n), !has_divisor_below(n), "mismatch at {}", n);
        }
    }

    #[test]
    fn test_modes_agree() {
        for n in 0..=u8::MAX {
            assert_eq!(
                is_prime(n),
                is_prime_with_mode(n, PrimalityMode::SquareRootBounded),
                "modes disagree at {}",
                n
            );
        }
        for n in 0..5000_u32 {
            assert_eq!(
                is_prime(n),
                is_prime_with_mode(n, PrimalityMode::SquareRootBounded),
                "modes disagree at {}",
                n
            );
        }
    }

    #[test]
    fn test_bounded_loop_handles_small_squares() {
        for n in [2_u32, 3, 4, 9, 25, 49, 121] {
            assert_eq!(trial_division(n), square_root_bounded(n), "loops disagree at {}", n);
        }
        assert!(square_root_bounded(2_u8));
        assert!(!square_root_bounded(4_u8));
        assert!(!trial_division(25_u16));
    }

    #[test]
    fn test_largest_u8_prime() {
        assert!(is_prime(251_u8));
        assert!(!is_prime(255_u8));
    }
}
