//! pn-solver: steady-state residuals and a least-squares driver for them.
//!
//! [`SteadySystem`] (one pipe) and [`SteadyCompressorSystem`] (a discretized
//! network) implement [`Residual`] for any [`pn_core::Scalar`], so the same
//! code yields plain residuals and, instantiated with `Dual64`, exact
//! Jacobian columns. [`solve_pipe_steady`] and [`solve_network_steady`] wire
//! both instantiations into [`gauss_newton`].

pub mod error;
pub mod gauss_newton;
pub mod initialization;
pub mod jacobian;
pub mod residual;
pub mod solve;
pub mod steady;

pub use error::{SolverError, SolverResult};
pub use gauss_newton::{GaussNewtonConfig, GaussNewtonResult, gauss_newton};
pub use initialization::{InitialGuess, uniform_guess};
pub use jacobian::{JacobianMode, dual_jacobian, evaluate, finite_difference_jacobian};
pub use residual::Residual;
pub use solve::{PipeProfile, SolverConfig, SteadySolution, solve_network_steady, solve_pipe_steady};
pub use steady::{SteadyCompressorSystem, SteadySystem, input_vec};
