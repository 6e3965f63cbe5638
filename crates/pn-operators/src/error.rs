//! Error types for operator construction and evaluation.

use pn_core::PnError;
use thiserror::Error;

/// Errors raised while building or applying sparse operators.
///
/// All of these are structural: they point at a caller bug (wrong sizes,
/// indices outside the operator) rather than a numerical condition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OperatorError {
    #[error("Block composition needs at least one operator")]
    EmptyComposition,

    #[error("Triplet ({row}, {col}) outside a {nrows}x{ncols} operator")]
    TripletOutOfBounds {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    #[error("Dimension mismatch for {what}: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Sparse format error: {message}")]
    Format { message: String },
}

pub type OperatorResult<T> = Result<T, OperatorError>;

impl From<OperatorError> for PnError {
    fn from(e: OperatorError) -> Self {
        match e {
            OperatorError::EmptyComposition => PnError::InvalidArg {
                what: "empty block composition",
            },
            OperatorError::TripletOutOfBounds { row, nrows, .. } => PnError::IndexOob {
                what: "operator triplet",
                index: row,
                len: nrows,
            },
            OperatorError::DimensionMismatch {
                what,
                expected,
                actual,
            } => PnError::DimensionMismatch {
                what,
                expected,
                actual,
            },
            OperatorError::InvalidArg { what } => PnError::InvalidArg { what },
            OperatorError::Format { message: _ } => PnError::Invariant {
                what: "sparse format",
            },
        }
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> OperatorResult<()> {
    if expected != actual {
        return Err(OperatorError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = OperatorError::TripletOutOfBounds {
            row: 7,
            col: 1,
            nrows: 5,
            ncols: 5,
        };
        assert!(err.to_string().contains("(7, 1)"));
    }

    #[test]
    fn error_conversion() {
        let pn: PnError = OperatorError::EmptyComposition.into();
        assert!(matches!(pn, PnError::InvalidArg { .. }));
    }

    #[test]
    fn check_len_reports_both_sizes() {
        let err = check_len("state", 9, 8).unwrap_err();
        assert_eq!(
            err,
            OperatorError::DimensionMismatch {
                what: "state",
                expected: 9,
                actual: 8
            }
        );
    }
}
