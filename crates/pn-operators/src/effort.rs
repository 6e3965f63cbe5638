//! Effort (co-state) vector of a discretized pipe.

use crate::PORT_COUNT;
use crate::error::{OperatorError, OperatorResult, check_len};
use crate::ports::output_selector;
use crate::sparse::SparseOperator;
use pn_core::{GasContext, Scalar};

/// Pressure-like and momentum-like efforts plus the two port efforts.
///
/// After [`Effort::update_state`]:
/// - `vec[..n_rho] = rho * R * T`
/// - `vec[n_rho..] = mom`
/// - `vec_t = [vec; Y * vec]`
///
/// Both buffers are allocated once and overwritten in place.
#[derive(Clone, Debug)]
pub struct Effort<T: Scalar> {
    n_rho: usize,
    n_mom: usize,
    temperature: f64,
    gas_constant: f64,
    y: SparseOperator<f64>,
    vec: Vec<T>,
    vec_t: Vec<T>,
}

impl<T: Scalar> Effort<T> {
    pub fn new(n_rho: usize, n_mom: usize, temperature: f64, gas: &GasContext) -> OperatorResult<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(OperatorError::InvalidArg {
                what: "temperature must be positive",
            });
        }
        let n = n_rho + n_mom;
        Ok(Self {
            n_rho,
            n_mom,
            temperature,
            gas_constant: gas.gas_constant(),
            y: output_selector(n_rho, n_mom)?,
            vec: vec![T::zero(); n],
            vec_t: vec![T::zero(); n + PORT_COUNT],
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn gas_constant(&self) -> f64 {
        self.gas_constant
    }

    pub fn output_selector(&self) -> &SparseOperator<f64> {
        &self.y
    }

    pub fn vec(&self) -> &[T] {
        &self.vec
    }

    pub fn vec_t(&self) -> &[T] {
        &self.vec_t
    }

    pub fn update_state(&mut self, rho: &[T], mom: &[T]) -> OperatorResult<()> {
        check_len("density", self.n_rho, rho.len())?;
        check_len("momentum", self.n_mom, mom.len())?;

        let rt = T::from(self.gas_constant * self.temperature);
        let (pressure, momentum) = self.vec.split_at_mut(self.n_rho);
        for (p, &r) in pressure.iter_mut().zip(rho) {
            *p = r * rt;
        }
        momentum.copy_from_slice(mom);

        let n = self.n_rho + self.n_mom;
        let (base, ports) = self.vec_t.split_at_mut(n);
        base.copy_from_slice(&self.vec);
        self.y.apply_into(&self.vec, ports)
    }
}
