//! Starting points for steady solves.

use crate::error::{SolverResult, check_size};
use nalgebra::DVector;
use pn_core::Scalar;
use pn_network::DiscretePipe;

/// Where the least-squares iteration starts.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InitialGuess {
    /// All densities and momenta zero.
    Zero,
    /// Boundary pressure and momentum spread over every pipe, see [`uniform_guess`].
    #[default]
    Uniform,
    /// Caller-supplied state.
    Given(Vec<f64>),
}

/// Constant state per pipe: density from `pressure` through the pipe's own
/// `R T`, momentum equal to `momentum` on every face.
pub fn uniform_guess<T: Scalar>(pipes: &[DiscretePipe<T>], pressure: f64, momentum: f64) -> Vec<f64> {
    let mut state = Vec::with_capacity(pipes.iter().map(|p| p.n_state).sum());
    for pipe in pipes {
        let density = pressure / (pipe.gas_constant * pipe.temperature);
        state.extend(std::iter::repeat_n(density, pipe.n_rho));
        state.extend(std::iter::repeat_n(momentum, pipe.n_mom));
    }
    state
}

pub(crate) fn initial_state<T: Scalar>(
    guess: &InitialGuess,
    pipes: &[DiscretePipe<T>],
    pressure: f64,
    momentum: f64,
) -> SolverResult<DVector<f64>> {
    let n_state = pipes.iter().map(|p| p.n_state).sum();
    match guess {
        InitialGuess::Zero => Ok(DVector::zeros(n_state)),
        InitialGuess::Uniform => Ok(DVector::from_vec(uniform_guess(pipes, pressure, momentum))),
        InitialGuess::Given(state) => {
            check_size("initial guess", n_state, state.len())?;
            Ok(DVector::from_column_slice(state))
        }
    }
}
