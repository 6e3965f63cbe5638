//! Algebraic properties of the elementary operators.

use pn_operators::{
    Dissipation, SparseOperator, Triplet, block_diagonal, input_coupling, interconnection,
    interconnection_extended, storage_extended,
};
use proptest::prelude::*;

fn random_operator(nrows: usize, ncols: usize, seed: &[f64]) -> SparseOperator<f64> {
    let triplets = seed
        .iter()
        .enumerate()
        .map(|(k, v)| Triplet::new(k % nrows, (k * 7) % ncols, *v))
        .collect();
    SparseOperator::from_triplets(nrows, ncols, 1, 1, triplets).unwrap()
}

#[test]
fn block_diagonal_is_associative() {
    let a = interconnection(3, 2, 0.5).unwrap();
    let b = storage_extended(4, 3).unwrap();
    let c = input_coupling::<f64>(2, 1).unwrap();

    let flat = block_diagonal(&[&a, &b, &c]).unwrap();
    let bc = block_diagonal(&[&b, &c]).unwrap();
    let nested = block_diagonal(&[&a, &bc]).unwrap();

    assert_eq!(flat.to_dense(), nested.to_dense());
    assert_eq!((flat.n_rho(), flat.n_mom()), (nested.n_rho(), nested.n_mom()));
}

#[test]
fn block_offsets_are_prior_block_sizes() {
    let ops: Vec<SparseOperator<f64>> = [2, 5, 3]
        .iter()
        .map(|&n_rho| interconnection_extended(n_rho, n_rho - 1, 1.0).unwrap())
        .collect();
    let refs: Vec<&SparseOperator<f64>> = ops.iter().collect();
    let composed = block_diagonal(&refs).unwrap();
    let dense = composed.to_dense();

    let (mut r0, mut c0) = (0, 0);
    for op in &ops {
        let block = dense.view((r0, c0), (op.nrows(), op.ncols()));
        assert_eq!(block, op.to_dense());
        r0 += op.nrows();
        c0 += op.ncols();
    }
    assert_eq!((r0, c0), (composed.nrows(), composed.ncols()));
    // every stored entry stays inside its own diagonal block
    assert_eq!(
        composed.nnz(),
        ops.iter().map(|op| op.nnz()).sum::<usize>()
    );
}

proptest! {
    #[test]
    fn friction_entries_are_non_negative(
        rho in prop::collection::vec(0.1_f64..100.0, 6),
        mom in prop::collection::vec(-50.0_f64..50.0, 5),
    ) {
        let mut r = Dissipation::<f64>::new(6, 5, 0.01, 0.5).unwrap();
        r.update_state(&rho, &mom).unwrap();
        for t in r.operator().triplets() {
            prop_assert!(t.value >= 0.0);
            prop_assert!(t.row == t.col && t.row >= 6);
        }
    }

    #[test]
    fn friction_update_is_pure(
        rho in prop::collection::vec(0.1_f64..100.0, 4),
        mom in prop::collection::vec(-50.0_f64..50.0, 3),
    ) {
        let mut a = Dissipation::<f64>::new(4, 3, 0.02, 0.4).unwrap();
        let mut b = Dissipation::<f64>::new(4, 3, 0.02, 0.4).unwrap();
        a.update_state(&rho, &mom).unwrap();
        a.update_state(&rho, &mom).unwrap();
        b.update_state(&[1.0; 4], &[7.0; 3]).unwrap();
        b.update_state(&rho, &mom).unwrap();
        prop_assert_eq!(a.operator().to_dense(), b.operator().to_dense());
    }

    #[test]
    fn interconnection_skew_for_any_mesh(n_rho in 2_usize..40, h in 1e-3_f64..1e3) {
        let j = interconnection(n_rho, n_rho - 1, h).unwrap();
        let dense = j.to_dense();
        let sum = &dense + dense.transpose();
        prop_assert!(sum.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn composition_applies_blockwise(
        seed_a in prop::collection::vec(-5.0_f64..5.0, 1..6),
        seed_b in prop::collection::vec(-5.0_f64..5.0, 1..6),
        x in prop::collection::vec(-5.0_f64..5.0, 7),
    ) {
        let a = random_operator(2, 3, &seed_a);
        let b = random_operator(3, 4, &seed_b);
        let ab = block_diagonal(&[&a, &b]).unwrap();
        let y = ab.apply(&x).unwrap();
        let ya = a.apply(&x[..3]).unwrap();
        let yb = b.apply(&x[3..]).unwrap();
        prop_assert_eq!(&y[..2], &ya[..]);
        prop_assert_eq!(&y[2..], &yb[..]);
    }
}
