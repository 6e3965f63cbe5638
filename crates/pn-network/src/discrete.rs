//! Discretized pipe: the full operator set at a fixed resolution.

use crate::error::{NetworkError, NetworkResult};
use crate::pipe::Pipe;
use pn_core::{GasContext, Scalar};
use pn_operators::{
    Effort, ExtendedDissipation, PORT_COUNT, SparseOperator, input_coupling, interconnection,
    interconnection_extended, port_selector, storage_extended,
};
use uom::si::length::meter;
use uom::si::thermodynamic_temperature::kelvin;

/// One pipe turned into port-Hamiltonian operators on a staggered grid.
///
/// Density lives on `n_rho` nodes, momentum on the `n_mom = n_rho - 1` faces
/// between them. The state vector is `[rho; mom]` of length `n_state`, the
/// residual has `n_res = n_state + 2` rows (one per port).
#[derive(Clone, Debug)]
pub struct DiscretePipe<T: Scalar> {
    name: String,
    pub n_rho: usize,
    pub n_mom: usize,
    pub n_state: usize,
    pub n_res: usize,
    pub mesh_width: f64,
    pub temperature: f64,
    pub gas_constant: f64,
    e: SparseOperator<f64>,
    et: SparseOperator<f64>,
    j: SparseOperator<f64>,
    jt: SparseOperator<f64>,
    u: SparseOperator<f64>,
    rt: ExtendedDissipation<T>,
    g: SparseOperator<T>,
    effort: Effort<T>,
    rho: Vec<T>,
    mom: Vec<T>,
}

/// Build the operator set for `pipe` with `resolution` density nodes.
pub fn discretize<T: Scalar>(
    pipe: &Pipe,
    resolution: usize,
    gas: &GasContext,
) -> NetworkResult<DiscretePipe<T>> {
    pipe.validate()?;
    if resolution < 2 {
        return Err(NetworkError::InvalidArg {
            what: "resolution must be at least 2",
        });
    }

    let n_rho = resolution;
    let n_mom = resolution - 1;
    let n_state = n_rho + n_mom;
    let length = pipe.length.get::<meter>();
    let diameter = pipe.diameter.get::<meter>();
    let temperature = pipe.temperature.get::<kelvin>();
    let mesh_width = length / resolution as f64;

    let e = pn_operators::storage(n_rho, n_mom)?;
    Ok(DiscretePipe {
        name: pipe.name().to_owned(),
        n_rho,
        n_mom,
        n_state,
        n_res: n_state + PORT_COUNT,
        mesh_width,
        temperature,
        gas_constant: gas.gas_constant(),
        et: storage_extended(n_rho, n_mom)?,
        e,
        j: interconnection(n_rho, n_mom, mesh_width)?,
        jt: interconnection_extended(n_rho, n_mom, mesh_width)?,
        u: port_selector(n_rho, n_mom)?,
        rt: ExtendedDissipation::new(n_rho, n_mom, pipe.friction, diameter)?,
        g: input_coupling(n_rho, n_mom)?,
        effort: Effort::new(n_rho, n_mom, temperature, gas)?,
        rho: vec![T::zero(); n_rho],
        mom: vec![T::zero(); n_mom],
    })
}

impl<T: Scalar> DiscretePipe<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Split `state` into density and momentum, then refresh Rt and the effort.
    pub fn set_state(&mut self, state: &[T]) -> NetworkResult<()> {
        if state.len() != self.n_state {
            return Err(NetworkError::StateSize {
                what: "pipe state",
                expected: self.n_state,
                actual: state.len(),
            });
        }
        let (rho, mom) = state.split_at(self.n_rho);
        self.rho.copy_from_slice(rho);
        self.mom.copy_from_slice(mom);
        self.rt.update_state(&self.rho, &self.mom)?;
        self.effort.update_state(&self.rho, &self.mom)?;
        Ok(())
    }

    pub fn rho(&self) -> &[T] {
        &self.rho
    }

    pub fn mom(&self) -> &[T] {
        &self.mom
    }

    pub fn storage(&self) -> &SparseOperator<f64> {
        &self.e
    }

    pub fn storage_extended(&self) -> &SparseOperator<f64> {
        &self.et
    }

    pub fn interconnection(&self) -> &SparseOperator<f64> {
        &self.j
    }

    pub fn interconnection_extended(&self) -> &SparseOperator<f64> {
        &self.jt
    }

    pub fn port_selector(&self) -> &SparseOperator<f64> {
        &self.u
    }

    pub fn output_selector(&self) -> &SparseOperator<f64> {
        self.effort.output_selector()
    }

    pub fn dissipation(&self) -> &SparseOperator<T> {
        self.rt.inner().operator()
    }

    pub fn dissipation_extended(&self) -> &SparseOperator<T> {
        self.rt.operator()
    }

    pub fn input_coupling(&self) -> &SparseOperator<T> {
        &self.g
    }

    pub fn effort(&self) -> &Effort<T> {
        &self.effort
    }

    /// Pressure at the last density node, `R T rho[n_rho - 1]`.
    pub fn outlet_pressure(&self) -> T {
        self.rho[self.n_rho - 1] * T::from(self.gas_constant * self.temperature)
    }

    /// Momentum on the first face.
    pub fn inlet_momentum(&self) -> T {
        self.mom[0]
    }
}
