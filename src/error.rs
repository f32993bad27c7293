//! Host-facing error types.
//!
//! The per-frame simulation never fails. These errors cover the handful of
//! contract violations a host can commit around it: bad balance files and
//! wave requests that make no sense for the current session.

use std::fmt;

/// Top-level error enum for the simulation core.
#[derive(Debug)]
pub enum SimError {
    /// Waves are numbered from 1.
    InvalidWave {
        /// The wave number the host asked for.
        wave: u32,
    },

    /// The session already reached GameOver and must be rebuilt.
    SessionOver {
        /// Final score of the finished run.
        score: u64,
    },

    /// A balance value is outside its usable range.
    InvalidBalance {
        /// Field name in the balance file.
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },

    /// The balance JSON could not be parsed.
    BalanceParse(serde_json::Error),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidWave { wave } => {
                write!(f, "invalid wave number {} (waves start at 1)", wave)
            }
            SimError::SessionOver { score } => write!(
                f,
                "session is over (final score {}); start a new run",
                score
            ),
            SimError::InvalidBalance {
                name,
                value,
                expected,
            } => write!(
                f,
                "balance value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
            SimError::BalanceParse(err) => write!(f, "failed to parse balance: {}", err),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::BalanceParse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::BalanceParse(err)
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;
