//! Port operators: output selector Y and input coupling G.

use crate::PORT_COUNT;
use crate::error::OperatorResult;
use crate::sparse::{SparseOperator, Triplet};
use pn_core::Scalar;

/// Y: reads the port efforts (inlet pressure, outlet momentum) off an effort vector.
pub fn output_selector(n_rho: usize, n_mom: usize) -> OperatorResult<SparseOperator<f64>> {
    let n = n_rho + n_mom;
    SparseOperator::from_triplets(
        PORT_COUNT,
        n,
        n_rho,
        n_mom,
        vec![Triplet::new(0, 0, 1.0), Triplet::new(1, n - 1, 1.0)],
    )
}

/// G: feeds the two boundary inputs into the two port rows.
///
/// State-typed because network assembly overwrites its entries with
/// state-dependent compressor coupling.
pub fn input_coupling<T: Scalar>(n_rho: usize, n_mom: usize) -> OperatorResult<SparseOperator<T>> {
    let n = n_rho + n_mom;
    SparseOperator::from_triplets(
        n + PORT_COUNT,
        PORT_COUNT,
        n_rho,
        n_mom,
        vec![Triplet::new(n, 0, T::one()), Triplet::new(n + 1, 1, T::one())],
    )
}
