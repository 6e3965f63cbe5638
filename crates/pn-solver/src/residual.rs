//! The residual contract shared by every steady system.

use crate::error::SolverResult;
use pn_core::Scalar;

/// A square-or-tall nonlinear system `F(state) = 0`.
///
/// `evaluate` may refresh internal operators to match `state` but must be
/// repeatable: the same state always yields bit-identical residuals.
pub trait Residual<T: Scalar> {
    /// Length of the state vector.
    fn n_state(&self) -> usize;

    /// Length of the residual vector.
    fn n_res(&self) -> usize;

    fn evaluate(&mut self, state: &[T], residual: &mut [T]) -> SolverResult<()>;
}
