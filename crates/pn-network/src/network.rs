//! Continuous network description and its assembled discrete counterpart.

use crate::compressor::{Compressor, CompressorKind, validate_compressors};
use crate::discrete::{DiscretePipe, discretize};
use crate::error::{NetworkError, NetworkResult};
use crate::pipe::Pipe;
use pn_core::{GasContext, Scalar};
use pn_operators::{PORT_COUNT, SparseOperator, block_diagonal};
use tracing::{debug, warn};

/// Grid parameters shared by every pipe of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscretizationParams {
    /// Density nodes per pipe
    pub resolution: usize,
}

/// Boundary values for a network solve.
///
/// `compressor_boundaries[c]` holds the two station values of compressor
/// `c`, in the order (upstream outlet, downstream inlet).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NetworkBoundary {
    pub inlet_pressure: f64,
    pub outlet_momentum: f64,
    pub compressor_boundaries: Vec<[f64; 2]>,
}

/// Ordered pipes plus the compressors joining them.
#[derive(Debug, Clone)]
pub struct Network {
    pipes: Vec<Pipe>,
    compressors: Vec<Compressor>,
}

impl Network {
    pub fn new(pipes: Vec<Pipe>, compressors: Vec<Compressor>) -> NetworkResult<Self> {
        if pipes.is_empty() {
            return Err(NetworkError::InvalidArg {
                what: "network needs at least one pipe",
            });
        }
        for pipe in &pipes {
            pipe.validate()?;
        }
        validate_compressors(&compressors, pipes.len())?;
        for c in &compressors {
            if let CompressorKind::Unmodeled { type_tag, model_tag } = &c.kind {
                warn!(
                    compressor = %c.name,
                    type_tag = %type_tag,
                    model_tag = %model_tag,
                    "unmodeled compressor, input coupling keeps its default entries"
                );
            }
        }
        Ok(Self { pipes, compressors })
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn compressors(&self) -> &[Compressor] {
        &self.compressors
    }

    pub fn discretize<T: Scalar>(
        &self,
        params: &DiscretizationParams,
        gas: &GasContext,
    ) -> NetworkResult<DiscreteNetwork<T>> {
        let pipes = self
            .pipes
            .iter()
            .map(|p| discretize(p, params.resolution, gas))
            .collect::<NetworkResult<Vec<_>>>()?;
        DiscreteNetwork::new(pipes, self.compressors.clone())
    }

    /// Input vector in G column order, see [`network_input`].
    pub fn input_vec(&self, boundary: &NetworkBoundary) -> NetworkResult<Vec<f64>> {
        network_input(self.pipes.len(), &self.compressors, boundary)
    }
}

/// Build the `2 * pipe_count` input vector multiplied by the network's G.
///
/// Column `2 i` is the inlet port of pipe `i`, column `2 i + 1` its outlet
/// port. Compressor ports take the station values; the remaining inlets take
/// the inlet pressure and the remaining outlets the negated outlet momentum.
pub fn network_input(
    pipe_count: usize,
    compressors: &[Compressor],
    boundary: &NetworkBoundary,
) -> NetworkResult<Vec<f64>> {
    if boundary.compressor_boundaries.len() != compressors.len() {
        return Err(NetworkError::StateSize {
            what: "compressor boundary values",
            expected: compressors.len(),
            actual: boundary.compressor_boundaries.len(),
        });
    }
    let mut input = Vec::with_capacity(PORT_COUNT * pipe_count);
    for _ in 0..pipe_count {
        input.push(boundary.inlet_pressure);
        input.push(-boundary.outlet_momentum);
    }
    for (c, [outlet, inlet]) in compressors.iter().zip(&boundary.compressor_boundaries) {
        let up = PORT_COUNT * c.upstream + 1;
        let down = PORT_COUNT * c.downstream;
        if up >= input.len() || down >= input.len() {
            return Err(NetworkError::UnknownPipe {
                name: c.name.clone(),
                index: c.upstream.max(c.downstream),
                pipe_count,
            });
        }
        input[up] = *outlet;
        input[down] = *inlet;
    }
    Ok(input)
}

/// Assembled network operators, refreshed in place by [`DiscreteNetwork::set_state`].
///
/// Every global operator is block diagonal in pipe order. The storage and
/// interconnection blocks are the pipes' port-extended Et and Jt so that
/// they act on the global extended effort; only the compressor coupling
/// written into G leaves the diagonal blocks.
#[derive(Clone, Debug)]
pub struct DiscreteNetwork<T: Scalar> {
    pipes: Vec<DiscretePipe<T>>,
    compressors: Vec<Compressor>,
    e: SparseOperator<f64>,
    j: SparseOperator<f64>,
    r: SparseOperator<T>,
    g: SparseOperator<T>,
    effort: Vec<T>,
    state_offsets: Vec<usize>,
    res_offsets: Vec<usize>,
    n_state: usize,
    n_res: usize,
}

impl<T: Scalar> DiscreteNetwork<T> {
    pub fn new(pipes: Vec<DiscretePipe<T>>, compressors: Vec<Compressor>) -> NetworkResult<Self> {
        if pipes.is_empty() {
            return Err(NetworkError::InvalidArg {
                what: "network needs at least one pipe",
            });
        }
        validate_compressors(&compressors, pipes.len())?;

        let e = compose(&pipes, DiscretePipe::storage_extended)?;
        let j = compose(&pipes, DiscretePipe::interconnection_extended)?;
        let r = compose(&pipes, DiscretePipe::dissipation_extended)?;
        let g = compose(&pipes, DiscretePipe::input_coupling)?;

        let mut state_offsets = Vec::with_capacity(pipes.len());
        let mut res_offsets = Vec::with_capacity(pipes.len());
        let (mut n_state, mut n_res) = (0, 0);
        for pipe in &pipes {
            state_offsets.push(n_state);
            res_offsets.push(n_res);
            n_state += pipe.n_state;
            n_res += pipe.n_res;
        }

        debug!(
            pipes = pipes.len(),
            compressors = compressors.len(),
            n_state,
            n_res,
            "assembled discrete network"
        );

        Ok(Self {
            pipes,
            compressors,
            e,
            j,
            r,
            g,
            effort: vec![T::zero(); n_res],
            state_offsets,
            res_offsets,
            n_state,
            n_res,
        })
    }

    pub fn n_state(&self) -> usize {
        self.n_state
    }

    pub fn n_res(&self) -> usize {
        self.n_res
    }

    pub fn pipes(&self) -> &[DiscretePipe<T>] {
        &self.pipes
    }

    pub fn compressors(&self) -> &[Compressor] {
        &self.compressors
    }

    pub fn storage(&self) -> &SparseOperator<f64> {
        &self.e
    }

    pub fn interconnection(&self) -> &SparseOperator<f64> {
        &self.j
    }

    pub fn dissipation(&self) -> &SparseOperator<T> {
        &self.r
    }

    pub fn input_coupling(&self) -> &SparseOperator<T> {
        &self.g
    }

    pub fn effort(&self) -> &[T] {
        &self.effort
    }

    /// Offset of pipe `i`'s block inside the global state vector.
    pub fn state_offsets(&self) -> &[usize] {
        &self.state_offsets
    }

    /// Offset of pipe `i`'s block inside the global residual.
    pub fn res_offsets(&self) -> &[usize] {
        &self.res_offsets
    }

    pub fn input_vec(&self, boundary: &NetworkBoundary) -> NetworkResult<Vec<f64>> {
        network_input(self.pipes.len(), &self.compressors, boundary)
    }

    /// Push `state` through every pipe, then rebuild R, the effort and G.
    pub fn set_state(&mut self, state: &[T]) -> NetworkResult<()> {
        if state.len() != self.n_state {
            return Err(NetworkError::StateSize {
                what: "network state",
                expected: self.n_state,
                actual: state.len(),
            });
        }

        for (pipe, &offset) in self.pipes.iter_mut().zip(&self.state_offsets) {
            pipe.set_state(&state[offset..offset + pipe.n_state])?;
        }

        self.r = compose(&self.pipes, DiscretePipe::dissipation_extended)?;

        for (pipe, &offset) in self.pipes.iter().zip(&self.res_offsets) {
            self.effort[offset..offset + pipe.n_res].copy_from_slice(pipe.effort().vec_t());
        }

        self.g = compose(&self.pipes, DiscretePipe::input_coupling)?;
        for c in &self.compressors {
            couple(&mut self.g, c, &self.pipes, &self.res_offsets)?;
        }
        Ok(())
    }
}

fn compose<T: Scalar, S: Scalar>(
    pipes: &[DiscretePipe<T>],
    select: impl Fn(&DiscretePipe<T>) -> &SparseOperator<S>,
) -> NetworkResult<SparseOperator<S>> {
    let blocks: Vec<&SparseOperator<S>> = pipes.iter().map(select).collect();
    Ok(block_diagonal(&blocks)?)
}

/// Overwrite the compressor entries of G from the current pipe states.
fn couple<T: Scalar>(
    g: &mut SparseOperator<T>,
    compressor: &Compressor,
    pipes: &[DiscretePipe<T>],
    res_offsets: &[usize],
) -> NetworkResult<()> {
    let (up, down) = (compressor.upstream, compressor.downstream);
    let upstream = &pipes[up];
    let downstream = &pipes[down];

    let outlet = (res_offsets[up] + upstream.n_res - 1, PORT_COUNT * up + 1);
    let inlet = (res_offsets[down] + downstream.n_res - 2, PORT_COUNT * down);

    let pre_pressure = upstream.outlet_pressure();
    let post_momentum = downstream.inlet_momentum();

    match &compressor.kind {
        CompressorKind::FixedCompression => {
            g.set_value(outlet.0, outlet.1, -post_momentum)?;
            g.set_value(inlet.0, inlet.1, pre_pressure)?;
        }
        CompressorKind::FixedPressureAdiabaticVane {
            isentropic_exponent,
        } => {
            g.set_value(outlet.0, outlet.1, -post_momentum)?;
            g.scale_value(outlet.0, outlet.1, pre_pressure.powf(1.0 / isentropic_exponent))?;
        }
        CompressorKind::Unmodeled { .. } => {}
    }
    Ok(())
}
