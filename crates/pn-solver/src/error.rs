//! Error types for solver operations.

use pn_core::PnError;
use pn_network::NetworkError;
use pn_operators::OperatorError;
use thiserror::Error;

/// Errors that can occur while evaluating residuals or solving.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Problem setup error: {what}")]
    ProblemSetup { what: String },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Invalid state: {what}")]
    InvalidState { what: String },

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Operator error: {0}")]
    Operator(#[from] OperatorError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<SolverError> for PnError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::ProblemSetup { what: _ } => PnError::InvalidArg {
                what: "problem setup",
            },
            SolverError::ConvergenceFailed { what: _ } => PnError::InvalidArg {
                what: "convergence",
            },
            SolverError::InvalidState { what: _ } => PnError::InvalidArg { what: "state" },
            SolverError::Network(net) => net.into(),
            SolverError::Operator(op) => op.into(),
            SolverError::Numeric { what: _ } => PnError::InvalidArg { what: "numeric" },
        }
    }
}

pub(crate) fn check_size(what: &str, expected: usize, actual: usize) -> SolverResult<()> {
    if expected != actual {
        return Err(SolverError::InvalidState {
            what: format!("{what} has length {actual}, expected {expected}"),
        });
    }
    Ok(())
}
