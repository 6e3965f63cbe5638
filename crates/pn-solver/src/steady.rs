//! Steady-state residual functors.
//!
//! Both systems compute `Jt * e_t + G * u`: the port-extended interconnection
//! applied to the current extended effort, plus the input coupling applied to
//! the boundary inputs. A zero residual means the flow balance holds with no
//! time-derivative term.

use crate::error::{SolverResult, check_size};
use crate::residual::Residual;
use pn_core::Scalar;
use pn_network::{DiscreteNetwork, DiscretePipe, NetworkBoundary};

/// Boundary inputs of a single pipe: `[inlet_pressure, -outlet_momentum]`.
pub fn input_vec(inlet_pressure: f64, outlet_momentum: f64) -> [f64; 2] {
    [inlet_pressure, -outlet_momentum]
}

/// Steady residual of one discretized pipe.
#[derive(Clone, Debug)]
pub struct SteadySystem<T: Scalar> {
    pipe: DiscretePipe<T>,
    input: Vec<T>,
}

impl<T: Scalar> SteadySystem<T> {
    pub fn new(pipe: DiscretePipe<T>, input: [f64; 2]) -> Self {
        Self {
            pipe,
            input: input.iter().map(|&v| T::from(v)).collect(),
        }
    }

    pub fn pipe(&self) -> &DiscretePipe<T> {
        &self.pipe
    }

    pub fn input(&self) -> &[T] {
        &self.input
    }
}

impl<T: Scalar> Residual<T> for SteadySystem<T> {
    fn n_state(&self) -> usize {
        self.pipe.n_state
    }

    fn n_res(&self) -> usize {
        self.pipe.n_res
    }

    fn evaluate(&mut self, state: &[T], residual: &mut [T]) -> SolverResult<()> {
        check_size("pipe state", self.pipe.n_state, state.len())?;
        check_size("pipe residual", self.pipe.n_res, residual.len())?;

        self.pipe.set_state(state)?;
        self.pipe
            .interconnection_extended()
            .apply_into(self.pipe.effort().vec_t(), residual)?;
        self.pipe
            .input_coupling()
            .apply_add_into(&self.input, residual)?;
        Ok(())
    }
}

/// Steady residual of a discretized network with compressor coupling.
#[derive(Clone, Debug)]
pub struct SteadyCompressorSystem<T: Scalar> {
    network: DiscreteNetwork<T>,
    input: Vec<T>,
}

impl<T: Scalar> SteadyCompressorSystem<T> {
    /// Wrap `network` with a raw input vector in G column order.
    pub fn new(network: DiscreteNetwork<T>, input: &[f64]) -> SolverResult<Self> {
        check_size("network input", network.input_coupling().ncols(), input.len())?;
        Ok(Self {
            network,
            input: input.iter().map(|&v| T::from(v)).collect(),
        })
    }

    pub fn with_boundary(network: DiscreteNetwork<T>, boundary: &NetworkBoundary) -> SolverResult<Self> {
        let input = network.input_vec(boundary)?;
        Self::new(network, &input)
    }

    pub fn network(&self) -> &DiscreteNetwork<T> {
        &self.network
    }

    pub fn input(&self) -> &[T] {
        &self.input
    }
}

impl<T: Scalar> Residual<T> for SteadyCompressorSystem<T> {
    fn n_state(&self) -> usize {
        self.network.n_state()
    }

    fn n_res(&self) -> usize {
        self.network.n_res()
    }

    fn evaluate(&mut self, state: &[T], residual: &mut [T]) -> SolverResult<()> {
        check_size("network state", self.network.n_state(), state.len())?;
        check_size("network residual", self.network.n_res(), residual.len())?;

        self.network.set_state(state)?;
        self.network
            .interconnection()
            .apply_into(self.network.effort(), residual)?;
        self.network
            .input_coupling()
            .apply_add_into(&self.input, residual)?;
        Ok(())
    }
}
