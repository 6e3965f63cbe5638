//! Energy-storage operators E and Et.

use crate::PORT_COUNT;
use crate::error::OperatorResult;
use crate::sparse::{SparseOperator, Triplet};

/// E: identity over the `n_rho + n_mom` state.
pub fn storage(n_rho: usize, n_mom: usize) -> OperatorResult<SparseOperator<f64>> {
    let n = n_rho + n_mom;
    SparseOperator::from_triplets(n, n, n_rho, n_mom, identity(n))
}

/// Et: E padded with the two port rows (which stay empty).
pub fn storage_extended(n_rho: usize, n_mom: usize) -> OperatorResult<SparseOperator<f64>> {
    let n = n_rho + n_mom;
    SparseOperator::from_triplets(n + PORT_COUNT, n, n_rho, n_mom, identity(n))
}

fn identity(n: usize) -> Vec<Triplet<f64>> {
    (0..n).map(|i| Triplet::new(i, i, 1.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_is_identity() {
        let e = storage(3, 2).unwrap();
        assert_eq!(e.to_dense(), nalgebra::DMatrix::<f64>::identity(5, 5));
    }

    #[test]
    fn extended_storage_pads_port_rows() {
        let et = storage_extended(3, 2).unwrap();
        assert_eq!((et.nrows(), et.ncols()), (7, 5));
        assert_eq!(et.triplets(), storage(3, 2).unwrap().triplets());
        let dense = et.to_dense();
        assert!(dense.row(5).iter().all(|v| *v == 0.0));
        assert!(dense.row(6).iter().all(|v| *v == 0.0));
    }
}
