//! Jacobians of a [`Residual`]: forward-mode dual numbers or finite differences.

use crate::error::{SolverError, SolverResult};
use crate::residual::Residual;
use nalgebra::{DMatrix, DVector};
use num_dual::Dual64;

/// How the driver obtains Jacobians.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JacobianMode {
    /// Exact columns from the `Dual64` instantiation of the residual.
    #[default]
    Dual,
    /// Forward differences on the plain residual.
    FiniteDifference,
}

/// Evaluate a plain residual at `x`.
pub fn evaluate<R: Residual<f64>>(system: &mut R, x: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let mut r = DVector::zeros(system.n_res());
    system.evaluate(x.as_slice(), r.as_mut_slice())?;
    Ok(r)
}

/// Residual and Jacobian at `x` from the dual-number instantiation.
///
/// Column `j` is obtained by seeding `x[j]` with a unit derivative.
pub fn dual_jacobian<R: Residual<Dual64>>(
    system: &mut R,
    x: &DVector<f64>,
) -> SolverResult<(DVector<f64>, DMatrix<f64>)> {
    let n = system.n_state();
    let m = system.n_res();
    if x.len() != n {
        return Err(SolverError::InvalidState {
            what: format!("state has length {}, expected {n}", x.len()),
        });
    }

    let mut state: Vec<Dual64> = x.iter().map(|&v| Dual64::from(v)).collect();
    let mut out = vec![Dual64::from(0.0); m];
    system.evaluate(&state, &mut out)?;
    let r = DVector::from_iterator(m, out.iter().map(|o| o.re));

    let mut jac = DMatrix::zeros(m, n);
    for j in 0..n {
        state[j].eps = 1.0;
        system.evaluate(&state, &mut out)?;
        state[j].eps = 0.0;
        for (i, o) in out.iter().enumerate() {
            jac[(i, j)] = o.eps;
        }
    }

    Ok((r, jac))
}

/// Compute Jacobian using forward finite differences.
///
/// For each column j, perturbs x[j] by epsilon and computes (f(x+e) - f(x))/epsilon.
pub fn finite_difference_jacobian<F>(
    x: &DVector<f64>,
    mut f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let n = x.len();
    let f_x = f(x)?;
    let m = f_x.len();

    let mut jac = DMatrix::zeros(m, n);

    for j in 0..n {
        let mut x_perturbed = x.clone();
        let dx = epsilon * x[j].abs().max(1.0);
        x_perturbed[j] += dx;

        let f_perturbed = f(&x_perturbed)?;
        let df = (f_perturbed - &f_x) / dx;

        jac.set_column(j, &df);
    }

    Ok(jac)
}
