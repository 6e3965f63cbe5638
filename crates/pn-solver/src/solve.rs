//! High-level steady solves for a single pipe or a compressor network.

use crate::error::SolverResult;
use crate::gauss_newton::{GaussNewtonConfig, GaussNewtonResult, gauss_newton};
use crate::initialization::{InitialGuess, initial_state};
use crate::jacobian::{JacobianMode, dual_jacobian, evaluate, finite_difference_jacobian};
use crate::residual::Residual;
use crate::steady::{SteadyCompressorSystem, SteadySystem, input_vec};
use nalgebra::DVector;
use num_dual::Dual64;
use pn_core::GasContext;
use pn_network::{DiscretePipe, DiscretizationParams, Network, NetworkBoundary, Pipe, discretize};
use tracing::info;

/// Steady solve options.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub gauss_newton: GaussNewtonConfig,
    pub jacobian: JacobianMode,
    /// Relative perturbation for finite-difference Jacobians
    pub fd_epsilon: f64,
    pub initial_guess: InitialGuess,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gauss_newton: GaussNewtonConfig::default(),
            jacobian: JacobianMode::Dual,
            fd_epsilon: 1e-7,
            initial_guess: InitialGuess::Uniform,
        }
    }
}

/// Converged density and momentum of one pipe.
#[derive(Debug, Clone, PartialEq)]
pub struct PipeProfile {
    pub name: String,
    pub rho: Vec<f64>,
    pub mom: Vec<f64>,
    /// `R T rho` on the density nodes
    pub pressure: Vec<f64>,
}

impl PipeProfile {
    pub fn inlet_pressure(&self) -> f64 {
        self.pressure.first().copied().unwrap_or(f64::NAN)
    }

    pub fn outlet_pressure(&self) -> f64 {
        self.pressure.last().copied().unwrap_or(f64::NAN)
    }

    pub fn inlet_momentum(&self) -> f64 {
        self.mom.first().copied().unwrap_or(f64::NAN)
    }

    pub fn outlet_momentum(&self) -> f64 {
        self.mom.last().copied().unwrap_or(f64::NAN)
    }
}

/// Result of a steady solve.
#[derive(Debug, Clone)]
pub struct SteadySolution {
    /// Flat state `[rho_0; mom_0; rho_1; mom_1; ...]`
    pub state: Vec<f64>,
    pub pipes: Vec<PipeProfile>,
    /// Residual infinity norm at `state`
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Solve the steady state of a single pipe.
pub fn solve_pipe_steady(
    pipe: &Pipe,
    resolution: usize,
    gas: &GasContext,
    inlet_pressure: f64,
    outlet_momentum: f64,
    config: &SolverConfig,
) -> SolverResult<SteadySolution> {
    let plain = discretize::<f64>(pipe, resolution, gas)?;
    let dual = discretize::<Dual64>(pipe, resolution, gas)?;

    let x0 = initial_state(
        &config.initial_guess,
        std::slice::from_ref(&plain),
        inlet_pressure,
        outlet_momentum,
    )?;
    let layout = Layout::of(std::slice::from_ref(&plain));

    let input = input_vec(inlet_pressure, outlet_momentum);
    info!(pipe = pipe.name(), resolution, "solving single-pipe steady state");
    let result = run(
        SteadySystem::new(plain, input),
        SteadySystem::new(dual, input),
        x0,
        config,
    )?;
    Ok(layout.solution(result))
}

/// Solve the steady state of a network with compressor coupling.
pub fn solve_network_steady(
    network: &Network,
    params: &DiscretizationParams,
    gas: &GasContext,
    boundary: &NetworkBoundary,
    config: &SolverConfig,
) -> SolverResult<SteadySolution> {
    let plain = network.discretize::<f64>(params, gas)?;
    let dual = network.discretize::<Dual64>(params, gas)?;

    let x0 = initial_state(
        &config.initial_guess,
        plain.pipes(),
        boundary.inlet_pressure,
        boundary.outlet_momentum,
    )?;
    let layout = Layout::of(plain.pipes());

    info!(
        pipes = network.pipes().len(),
        compressors = network.compressors().len(),
        resolution = params.resolution,
        "solving network steady state"
    );
    let result = run(
        SteadyCompressorSystem::with_boundary(plain, boundary)?,
        SteadyCompressorSystem::with_boundary(dual, boundary)?,
        x0,
        config,
    )?;
    Ok(layout.solution(result))
}

fn run<P, D>(plain: P, mut dual: D, x0: DVector<f64>, config: &SolverConfig) -> SolverResult<GaussNewtonResult>
where
    P: Residual<f64> + Clone,
    D: Residual<Dual64>,
{
    let mut probe = plain.clone();
    let mut plain = plain;
    match config.jacobian {
        JacobianMode::Dual => gauss_newton(
            x0,
            |x| evaluate(&mut plain, x),
            |x| Ok(dual_jacobian(&mut dual, x)?.1),
            &config.gauss_newton,
        ),
        JacobianMode::FiniteDifference => gauss_newton(
            x0,
            |x| evaluate(&mut plain, x),
            |x| finite_difference_jacobian(x, |v| evaluate(&mut probe, v), config.fd_epsilon),
            &config.gauss_newton,
        ),
    }
}

/// Per-pipe slicing of the flat state.
struct Layout {
    pipes: Vec<(String, usize, usize, f64)>,
}

impl Layout {
    fn of<T: pn_core::Scalar>(pipes: &[DiscretePipe<T>]) -> Self {
        Self {
            pipes: pipes
                .iter()
                .map(|p| {
                    (
                        p.name().to_owned(),
                        p.n_rho,
                        p.n_mom,
                        p.gas_constant * p.temperature,
                    )
                })
                .collect(),
        }
    }

    fn solution(&self, result: GaussNewtonResult) -> SteadySolution {
        let state: Vec<f64> = result.x.iter().copied().collect();
        let mut offset = 0;
        let pipes = self
            .pipes
            .iter()
            .map(|(name, n_rho, n_mom, rt)| {
                let rho = state[offset..offset + n_rho].to_vec();
                let mom = state[offset + n_rho..offset + n_rho + n_mom].to_vec();
                offset += n_rho + n_mom;
                PipeProfile {
                    name: name.clone(),
                    pressure: rho.iter().map(|r| r * rt).collect(),
                    rho,
                    mom,
                }
            })
            .collect();
        SteadySolution {
            state,
            pipes,
            residual_norm: result.residual_norm,
            iterations: result.iterations,
        }
    }
}
