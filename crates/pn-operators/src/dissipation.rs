//! Friction dissipation operators R and Rt.

use crate::PORT_COUNT;
use crate::error::{OperatorError, OperatorResult, check_len};
use crate::sparse::{SparseOperator, Triplet};
use pn_core::Scalar;

/// R: momentum-diagonal friction operator.
///
/// The only state-dependent operator. Entry `n_rho + j` on the diagonal is
/// `f * |mom[j] / rho[j]| / (2 D)`, density and momentum paired by index.
/// Call [`Dissipation::update_state`] whenever the candidate state changes.
#[derive(Clone, Debug)]
pub struct Dissipation<T: Scalar> {
    friction: f64,
    diameter: f64,
    op: SparseOperator<T>,
}

impl<T: Scalar> Dissipation<T> {
    pub fn new(n_rho: usize, n_mom: usize, friction: f64, diameter: f64) -> OperatorResult<Self> {
        if !friction.is_finite() || friction < 0.0 {
            return Err(OperatorError::InvalidArg {
                what: "friction factor must be non-negative",
            });
        }
        if !diameter.is_finite() || diameter <= 0.0 {
            return Err(OperatorError::InvalidArg {
                what: "diameter must be positive",
            });
        }
        let n = n_rho + n_mom;
        let triplets = (0..n_mom)
            .map(|j| Triplet::new(n_rho + j, n_rho + j, T::zero()))
            .collect();
        Ok(Self {
            friction,
            diameter,
            op: SparseOperator::from_triplets(n, n, n_rho, n_mom, triplets)?,
        })
    }

    pub fn friction(&self) -> f64 {
        self.friction
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn operator(&self) -> &SparseOperator<T> {
        &self.op
    }

    pub fn update_state(&mut self, rho: &[T], mom: &[T]) -> OperatorResult<()> {
        let (n_rho, n_mom) = (self.op.n_rho(), self.op.n_mom());
        check_len("density", n_rho, rho.len())?;
        check_len("momentum", n_mom, mom.len())?;

        let coeff = T::from(self.friction / (2.0 * self.diameter));
        let triplets = mom
            .iter()
            .zip(rho)
            .enumerate()
            .map(|(j, (&m, &r))| Triplet::new(n_rho + j, n_rho + j, coeff * (m / r).abs()))
            .collect();
        self.op.set_triplets(triplets)
    }
}

/// Rt: R inside the port-extended `(n + 2) x (n + 2)` shape.
#[derive(Clone, Debug)]
pub struct ExtendedDissipation<T: Scalar> {
    inner: Dissipation<T>,
    op: SparseOperator<T>,
}

impl<T: Scalar> ExtendedDissipation<T> {
    pub fn new(n_rho: usize, n_mom: usize, friction: f64, diameter: f64) -> OperatorResult<Self> {
        let inner = Dissipation::new(n_rho, n_mom, friction, diameter)?;
        let n = n_rho + n_mom + PORT_COUNT;
        let op = SparseOperator::from_triplets(n, n, n_rho, n_mom, inner.operator().triplets().to_vec())?;
        Ok(Self { inner, op })
    }

    /// The plain R this operator pads.
    pub fn inner(&self) -> &Dissipation<T> {
        &self.inner
    }

    pub fn operator(&self) -> &SparseOperator<T> {
        &self.op
    }

    pub fn update_state(&mut self, rho: &[T], mom: &[T]) -> OperatorResult<()> {
        self.inner.update_state(rho, mom)?;
        self.op.set_triplets(self.inner.operator().triplets().to_vec())
    }
}
