//! Interconnection operators J and Jt plus the boundary port selector U.
//!
//! Grid layout: density on `n_rho` nodes, momentum on the `n_mom = n_rho - 1`
//! staggered faces between them, state ordered `[rho_0.., mom_0..]`.

use crate::PORT_COUNT;
use crate::error::{OperatorError, OperatorResult};
use crate::sparse::{SparseOperator, Triplet};

/// First-order derivative block Dx (`n_rho - 1` rows, `n_rho` columns).
///
/// Row `j` is the forward difference `(p[j+1] - p[j]) / h` at face `j`. The
/// inlet node column is left out: the inlet pressure reaches the first face
/// through the inlet port closure in [`interconnection_extended`].
pub fn derivative(n_rho: usize, mesh_width: f64) -> Vec<Triplet<f64>> {
    let inv_h = 1.0 / mesh_width;
    let mut triplets = Vec::with_capacity(2 * n_rho);
    for j in 0..n_rho.saturating_sub(1) {
        if j > 0 {
            triplets.push(Triplet::new(j, j, -inv_h));
        }
        triplets.push(Triplet::new(j, j + 1, inv_h));
    }
    triplets
}

/// J: `[[0, Dx^T], [-Dx, 0]]`.
///
/// The density->momentum block holds `-Dx`, the momentum->density block its
/// negated adjoint, so `J + J^T = 0` holds exactly.
pub fn interconnection(
    n_rho: usize,
    n_mom: usize,
    mesh_width: f64,
) -> OperatorResult<SparseOperator<f64>> {
    check_grid(n_rho, n_mom, mesh_width)?;
    let n = n_rho + n_mom;
    let dx = derivative(n_rho, mesh_width);

    let mut triplets = Vec::with_capacity(2 * dx.len());
    triplets.extend(dx.iter().map(|t| Triplet::new(t.col, n_rho + t.row, t.value)));
    triplets.extend(dx.iter().map(|t| Triplet::new(n_rho + t.row, t.col, -t.value)));

    SparseOperator::from_triplets(n, n, n_rho, n_mom, triplets)
}

/// U: selects the inlet density (+1) and outlet momentum (-1) as ports.
pub fn port_selector(n_rho: usize, n_mom: usize) -> OperatorResult<SparseOperator<f64>> {
    let n = n_rho + n_mom;
    SparseOperator::from_triplets(
        PORT_COUNT,
        n,
        n_rho,
        n_mom,
        vec![Triplet::new(0, 0, 1.0), Triplet::new(1, n - 1, -1.0)],
    )
}

/// Jt: J extended by the two ports.
///
/// - J sits unchanged in the leading `n x n` block.
/// - `-U` fills the two port rows.
/// - The port columns (multiplying the port efforts `Y e`) close the
///   boundary stencil: the inlet pressure enters the first momentum row and
///   the outlet momentum balances the last density row.
pub fn interconnection_extended(
    n_rho: usize,
    n_mom: usize,
    mesh_width: f64,
) -> OperatorResult<SparseOperator<f64>> {
    let j = interconnection(n_rho, n_mom, mesh_width)?;
    let u = port_selector(n_rho, n_mom)?;
    let n = n_rho + n_mom;
    let inv_h = 1.0 / mesh_width;

    let mut triplets = Vec::with_capacity(j.triplets().len() + 2 * PORT_COUNT);
    triplets.extend_from_slice(j.triplets());
    triplets.extend(
        u.triplets()
            .iter()
            .map(|t| Triplet::new(n + t.row, t.col, -t.value)),
    );
    triplets.push(Triplet::new(n_rho, n, inv_h));
    triplets.push(Triplet::new(n_rho - 1, n + 1, -inv_h));

    SparseOperator::from_triplets(n + PORT_COUNT, n + PORT_COUNT, n_rho, n_mom, triplets)
}

fn check_grid(n_rho: usize, n_mom: usize, mesh_width: f64) -> OperatorResult<()> {
    if n_rho < 2 || n_mom + 1 != n_rho {
        return Err(OperatorError::InvalidArg {
            what: "staggered grid needs n_rho >= 2 and n_mom = n_rho - 1",
        });
    }
    if !mesh_width.is_finite() || mesh_width <= 0.0 {
        return Err(OperatorError::InvalidArg {
            what: "mesh width must be positive",
        });
    }
    Ok(())
}
