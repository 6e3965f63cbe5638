//! Gauss-Newton least-squares solver with backtracking line search.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use pn_core::inf_norm;
use tracing::{debug, info};

/// Gauss-Newton solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussNewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the residual infinity norm
    pub abs_tol: f64,
    /// Tolerance relative to the initial residual infinity norm
    pub rel_tol: f64,
    /// Step size (relative to the iterate) below which the iteration has stalled
    pub step_tol: f64,
    /// Residual infinity norm still accepted when the iteration stalls
    pub stall_tol: f64,
    /// Singular values below this are treated as zero in the least-squares step
    pub svd_eps: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
}

impl Default for GaussNewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-8,
            rel_tol: 1e-14,
            step_tol: 1e-12,
            stall_tol: 1e-6,
            svd_eps: 1e-14,
            line_search_beta: 0.5,
            max_line_search_iters: 30,
        }
    }
}

/// Gauss-Newton iteration result.
#[derive(Debug, Clone)]
pub struct GaussNewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Final residual infinity norm
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
}

/// Minimize `|r(x)|` for a possibly tall system.
///
/// Each step solves `J dx = -r` in the least-squares sense through an SVD,
/// then halves the step until the residual 2-norm decreases. A negligible
/// step ends the iteration, successfully only if the residual is below
/// `stall_tol`: near machine precision the absolute tolerance can sit under
/// the rounding floor of large pressures.
pub fn gauss_newton<F, J>(
    x0: DVector<f64>,
    mut residual_fn: F,
    mut jacobian_fn: J,
    config: &GaussNewtonConfig,
) -> SolverResult<GaussNewtonResult>
where
    F: FnMut(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: FnMut(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    let mut x = x0;
    let mut r = residual_fn(&x)?;
    check_finite(&r, "initial residual")?;
    let r0_norm = inf_norm(r.as_slice());

    for iter in 0..config.max_iterations {
        let r_norm = inf_norm(r.as_slice());
        if r_norm <= config.abs_tol || r_norm <= config.rel_tol * r0_norm {
            info!(iterations = iter, residual = r_norm, "Gauss-Newton converged");
            return Ok(GaussNewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let jac = jacobian_fn(&x)?;
        if jac.iter().any(|v| !v.is_finite()) {
            return Err(SolverError::Numeric {
                what: format!("non-finite Jacobian at iteration {iter}"),
            });
        }

        let dx = jac
            .svd(true, true)
            .solve(&(-&r), config.svd_eps)
            .map_err(|e| SolverError::Numeric {
                what: format!("least-squares step failed: {e}"),
            })?;

        let step_norm = dx.norm();
        if step_norm <= config.step_tol * (x.norm() + config.step_tol) {
            if r_norm > config.stall_tol {
                return Err(SolverError::ConvergenceFailed {
                    what: format!("Stalled at iteration {iter}, residual = {r_norm}"),
                });
            }
            info!(
                iterations = iter,
                residual = r_norm,
                step = step_norm,
                "Gauss-Newton converged on step size"
            );
            return Ok(GaussNewtonResult {
                x,
                residual_norm: r_norm,
                iterations: iter,
            });
        }

        let r_l2 = r.norm();
        let mut alpha = 1.0;
        let mut accepted = None;
        for _ in 0..config.max_line_search_iters {
            let x_new = &x + alpha * &dx;
            let r_new = residual_fn(&x_new)?;
            let r_new_l2 = r_new.norm();
            if r_new_l2.is_finite() && r_new_l2 < r_l2 {
                accepted = Some((x_new, r_new));
                break;
            }
            alpha *= config.line_search_beta;
        }

        let Some((x_new, r_new)) = accepted else {
            return Err(SolverError::ConvergenceFailed {
                what: format!(
                    "Line search stagnated at iteration {iter}, residual = {r_norm}"
                ),
            });
        };

        debug!(
            iteration = iter,
            residual = r_norm,
            step = step_norm,
            alpha,
            "Gauss-Newton step"
        );
        x = x_new;
        r = r_new;
    }

    let r_norm = inf_norm(r.as_slice());
    if r_norm <= config.abs_tol || r_norm <= config.rel_tol * r0_norm {
        info!(
            iterations = config.max_iterations,
            residual = r_norm,
            "Gauss-Newton converged"
        );
        return Ok(GaussNewtonResult {
            x,
            residual_norm: r_norm,
            iterations: config.max_iterations,
        });
    }
    Err(SolverError::ConvergenceFailed {
        what: format!(
            "Maximum iterations {} reached, residual = {}",
            config.max_iterations, r_norm
        ),
    })
}

fn check_finite(r: &DVector<f64>, what: &str) -> SolverResult<()> {
    if let Some(v) = r.iter().find(|v| !v.is_finite()) {
        return Err(SolverError::Numeric {
            what: format!("{what} contains {v}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0 from x = 3
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] - 4.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };

        let x0 = DVector::from_element(1, 3.0);
        let result = gauss_newton(x0, residual, jacobian, &GaussNewtonConfig::default()).unwrap();

        assert!((result.x[0] - 2.0).abs() < 1e-8);
        assert!(result.iterations > 0);
    }

    #[test]
    fn consistent_overdetermined_linear_system() {
        // rows: x + y = 3, x - y = 1, 2x + y = 5  ->  x = 2, y = 1
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, -1.0, 2.0, 1.0]);
        let b = DVector::from_vec(vec![3.0, 1.0, 5.0]);
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> { Ok(&a * x - &b) };
        let jacobian = |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> { Ok(a.clone()) };

        let result = gauss_newton(
            DVector::zeros(2),
            residual,
            jacobian,
            &GaussNewtonConfig::default(),
        )
        .unwrap();
        assert!((result.x[0] - 2.0).abs() < 1e-12);
        assert!((result.x[1] - 1.0).abs() < 1e-12);
        assert!(result.iterations <= 2);
    }

    #[test]
    fn unsolvable_system_reports_failure() {
        // x^2 + 1 = 0 has no real root; the minimizer x = 0 leaves residual 1
        let residual = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, x[0] * x[0] + 1.0))
        };
        let jacobian = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 2.0 * x[0]))
        };
        let err = gauss_newton(
            DVector::from_element(1, 2.0),
            residual,
            jacobian,
            &GaussNewtonConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::ConvergenceFailed { .. }));
    }

    #[test]
    fn non_finite_start_is_numeric_error() {
        let residual = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_element(1, f64::NAN))
        };
        let jacobian = |_: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            Ok(DMatrix::from_element(1, 1, 1.0))
        };
        let err = gauss_newton(
            DVector::zeros(1),
            residual,
            jacobian,
            &GaussNewtonConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SolverError::Numeric { .. }));
    }
}
