//! Error types for network description and assembly.

use pn_core::PnError;
use pn_operators::OperatorError;
use thiserror::Error;

/// Errors raised while describing, discretizing or updating a network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("State size mismatch for {what}: expected {expected}, got {actual}")]
    StateSize {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Compressor '{name}' references pipe {index} but the network has {pipe_count} pipes")]
    UnknownPipe {
        name: String,
        index: usize,
        pipe_count: usize,
    },

    #[error("Invalid topology: {what}")]
    Topology { what: String },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl From<NetworkError> for PnError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::Operator(op) => op.into(),
            NetworkError::InvalidArg { what } => PnError::InvalidArg { what },
            NetworkError::StateSize {
                what,
                expected,
                actual,
            } => PnError::DimensionMismatch {
                what,
                expected,
                actual,
            },
            NetworkError::UnknownPipe {
                index, pipe_count, ..
            } => PnError::IndexOob {
                what: "compressor pipe index",
                index,
                len: pipe_count,
            },
            NetworkError::Topology { what: _ } => PnError::Invariant {
                what: "network topology",
            },
        }
    }
}
