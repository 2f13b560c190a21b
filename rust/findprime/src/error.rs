use thiserror::Error;

/// Result type for findprime operations
pub type Result<T> = std::result::Result<T, FindPrimeError>;

/// Errors that can occur while searching for the Nth prime.
#[derive(Error, Debug)]
pub enum FindPrimeError {
    /// The target count was zero or negative, or a configured value could not be parsed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The next candidate does not fit in the candidate integer type.
    ///
    /// `found` is the number of primes counted before the search ran out of range.
    #[error("Candidate overflow: found {found} of {target} primes before exceeding the candidate range")]
    Overflow { target: u64, found: u64 },

    /// Writing the report line failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
