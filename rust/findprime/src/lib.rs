//! # findprime
//!
//! Finds the Nth prime number by counting upward from 2 with a naive
//! trial-division primality test. The crate exists to be measured: the
//! primality test tries every divisor below the candidate, and the search
//! reports each result as a single line of text.
//!
//! - [`is_prime`]: O(n) trial division.
//! - [`NthPrimeFinder`]: the counting search, generic over the candidate width.
//! - [`compute_nth_prime`]: the one-call entry point used by benchmark harnesses.
//! - [`calc_nth_prime`]: the benchmark body, which also writes the report line.
//!
//! ```
//! use findprime::{compute_nth_prime, is_prime};
//!
//! assert!(is_prime(7_u32));
//! assert_eq!(compute_nth_prime(2000).unwrap(), 17389);
//! ```

mod error;
mod types;

pub mod config;
pub mod finder;
pub mod primality;

// Error type
pub use error::{FindPrimeError, Result};
// Types
pub use types::{Candidate, PrimalityMode};

pub use config::{FinderConfig, DEFAULT_TARGET};
pub use finder::{calc_nth_prime, compute_nth_prime, NthPrime, NthPrimeFinder};
pub use primality::{is_prime, is_prime_with_mode};
