//! Triplet-backed sparse operator and block-diagonal composition.

use crate::error::{OperatorError, OperatorResult, check_len};
use nalgebra::DMatrix;
use nalgebra_sparse::CsrMatrix;
use pn_core::Scalar;
use std::collections::BTreeMap;

/// One `(row, col, value)` entry of a sparse operator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triplet<T> {
    pub row: usize,
    pub col: usize,
    pub value: T,
}

impl<T> Triplet<T> {
    pub fn new(row: usize, col: usize, value: T) -> Self {
        Self { row, col, value }
    }

    /// Same entry shifted by a row and column offset.
    pub fn offset(self, row_offset: usize, col_offset: usize) -> Self {
        Self {
            row: self.row + row_offset,
            col: self.col + col_offset,
            value: self.value,
        }
    }
}

/// Sparse operator kept as a triplet list and its compiled CSR matrix.
///
/// The compiled matrix is always the replay of the triplet list with
/// last-write-wins on duplicate coordinates. Every mutation goes through the
/// triplets and recompiles, so the two never diverge.
///
/// `n_rho` / `n_mom` record the density/momentum split the operator was
/// built for; composed operators carry the sums over their blocks.
#[derive(Clone, Debug)]
pub struct SparseOperator<T: Scalar> {
    n_rho: usize,
    n_mom: usize,
    triplets: Vec<Triplet<T>>,
    matrix: CsrMatrix<T>,
}

impl<T: Scalar> SparseOperator<T> {
    /// Build and compile an operator of shape `nrows x ncols`.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        n_rho: usize,
        n_mom: usize,
        triplets: Vec<Triplet<T>>,
    ) -> OperatorResult<Self> {
        let matrix = compile(nrows, ncols, &triplets)?;
        Ok(Self {
            n_rho,
            n_mom,
            triplets,
            matrix,
        })
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn n_rho(&self) -> usize {
        self.n_rho
    }

    pub fn n_mom(&self) -> usize {
        self.n_mom
    }

    /// Number of stored entries after duplicate resolution.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    pub fn triplets(&self) -> &[Triplet<T>] {
        &self.triplets
    }

    pub fn matrix(&self) -> &CsrMatrix<T> {
        &self.matrix
    }

    /// Replace the whole triplet list, keeping the shape.
    pub fn set_triplets(&mut self, triplets: Vec<Triplet<T>>) -> OperatorResult<()> {
        self.matrix = compile(self.nrows(), self.ncols(), &triplets)?;
        self.triplets = triplets;
        Ok(())
    }

    /// Stored value at `(row, col)`, `None` for structural zeros.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.nrows() {
            return None;
        }
        let offsets = self.matrix.row_offsets();
        let (start, end) = (offsets[row], offsets[row + 1]);
        let cols = &self.matrix.col_indices()[start..end];
        cols.binary_search(&col)
            .ok()
            .map(|k| self.matrix.values()[start + k])
    }

    /// Value at `(row, col)`, zero when nothing is stored there.
    pub fn value(&self, row: usize, col: usize) -> T {
        self.get(row, col).unwrap_or_else(T::zero)
    }

    /// Overwrite the coefficient at `(row, col)`, inserting it if absent.
    pub fn set_value(&mut self, row: usize, col: usize, value: T) -> OperatorResult<()> {
        self.check_coordinate(row, col)?;
        let mut found = false;
        for t in self
            .triplets
            .iter_mut()
            .filter(|t| t.row == row && t.col == col)
        {
            t.value = value;
            found = true;
        }
        if !found {
            self.triplets.push(Triplet::new(row, col, value));
        }
        self.matrix = compile(self.nrows(), self.ncols(), &self.triplets)?;
        Ok(())
    }

    /// Multiply the coefficient at `(row, col)` by `factor`.
    pub fn scale_value(&mut self, row: usize, col: usize, factor: T) -> OperatorResult<()> {
        self.check_coordinate(row, col)?;
        let current = self.value(row, col);
        self.set_value(row, col, current * factor)
    }

    /// `out = self * x`, lifting the operator's entries into `x`'s scalar.
    pub fn apply_into<U>(&self, x: &[U], out: &mut [U]) -> OperatorResult<()>
    where
        U: Scalar + From<T>,
    {
        out.iter_mut().for_each(|o| *o = U::zero());
        self.apply_add_into(x, out)
    }

    /// `out += self * x`.
    pub fn apply_add_into<U>(&self, x: &[U], out: &mut [U]) -> OperatorResult<()>
    where
        U: Scalar + From<T>,
    {
        check_len("operator input", self.ncols(), x.len())?;
        check_len("operator output", self.nrows(), out.len())?;

        let offsets = self.matrix.row_offsets();
        let cols = self.matrix.col_indices();
        let vals = self.matrix.values();
        for (row, acc) in out.iter_mut().enumerate() {
            for k in offsets[row]..offsets[row + 1] {
                *acc += U::from(vals[k]) * x[cols[k]];
            }
        }
        Ok(())
    }

    /// Allocating `self * x`.
    pub fn apply<U>(&self, x: &[U]) -> OperatorResult<Vec<U>>
    where
        U: Scalar + From<T>,
    {
        let mut out = vec![U::zero(); self.nrows()];
        self.apply_into(x, &mut out)?;
        Ok(out)
    }

    /// Transposed operator (rows and columns swapped, split swapped too).
    pub fn transpose(&self) -> OperatorResult<Self> {
        let triplets = self
            .triplets
            .iter()
            .map(|t| Triplet::new(t.col, t.row, t.value))
            .collect();
        Self::from_triplets(self.ncols(), self.nrows(), self.n_rho, self.n_mom, triplets)
    }

    pub fn to_dense(&self) -> DMatrix<T> {
        let mut dense = DMatrix::from_element(self.nrows(), self.ncols(), T::zero());
        let offsets = self.matrix.row_offsets();
        let cols = self.matrix.col_indices();
        let vals = self.matrix.values();
        for row in 0..self.nrows() {
            for k in offsets[row]..offsets[row + 1] {
                dense[(row, cols[k])] = vals[k];
            }
        }
        dense
    }

    fn check_coordinate(&self, row: usize, col: usize) -> OperatorResult<()> {
        if row >= self.nrows() || col >= self.ncols() {
            return Err(OperatorError::TripletOutOfBounds {
                row,
                col,
                nrows: self.nrows(),
                ncols: self.ncols(),
            });
        }
        Ok(())
    }
}

/// Replay triplets into CSR form; later duplicates overwrite earlier ones.
fn compile<T: Scalar>(
    nrows: usize,
    ncols: usize,
    triplets: &[Triplet<T>],
) -> OperatorResult<CsrMatrix<T>> {
    let mut entries: BTreeMap<(usize, usize), T> = BTreeMap::new();
    for t in triplets {
        if t.row >= nrows || t.col >= ncols {
            return Err(OperatorError::TripletOutOfBounds {
                row: t.row,
                col: t.col,
                nrows,
                ncols,
            });
        }
        entries.insert((t.row, t.col), t.value);
    }

    let mut row_offsets = Vec::with_capacity(nrows + 1);
    let mut col_indices = Vec::with_capacity(entries.len());
    let mut values = Vec::with_capacity(entries.len());
    row_offsets.push(0);
    let mut row = 0;
    for ((r, c), v) in entries {
        while row < r {
            row_offsets.push(col_indices.len());
            row += 1;
        }
        col_indices.push(c);
        values.push(v);
    }
    while row < nrows {
        row_offsets.push(col_indices.len());
        row += 1;
    }

    CsrMatrix::try_from_csr_data(nrows, ncols, row_offsets, col_indices, values).map_err(|e| {
        OperatorError::Format {
            message: e.to_string(),
        }
    })
}

/// Block-diagonal concatenation of same-typed operators.
///
/// Block `i` lands at row offset = sum of prior row counts and column offset
/// = sum of prior column counts. No entry couples two blocks.
pub fn block_diagonal<T: Scalar>(operators: &[&SparseOperator<T>]) -> OperatorResult<SparseOperator<T>> {
    if operators.is_empty() {
        return Err(OperatorError::EmptyComposition);
    }

    let nnz: usize = operators.iter().map(|op| op.triplets.len()).sum();
    let mut triplets = Vec::with_capacity(nnz);
    let (mut row_offset, mut col_offset) = (0, 0);
    let (mut n_rho, mut n_mom) = (0, 0);
    for op in operators {
        triplets.extend(
            op.triplets
                .iter()
                .map(|t| t.offset(row_offset, col_offset)),
        );
        row_offset += op.nrows();
        col_offset += op.ncols();
        n_rho += op.n_rho;
        n_mom += op.n_mom;
    }

    SparseOperator::from_triplets(row_offset, col_offset, n_rho, n_mom, triplets)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(values: [f64; 3]) -> SparseOperator<f64> {
        SparseOperator::from_triplets(
            2,
            3,
            1,
            1,
            vec![
                Triplet::new(0, 0, values[0]),
                Triplet::new(1, 2, values[1]),
                Triplet::new(0, 1, values[2]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn duplicates_resolve_last_write_wins() {
        let op = SparseOperator::from_triplets(
            2,
            2,
            1,
            1,
            vec![
                Triplet::new(0, 1, 1.0),
                Triplet::new(0, 1, 5.0),
                Triplet::new(1, 0, 2.0),
            ],
        )
        .unwrap();
        assert_eq!(op.nnz(), 2);
        assert_eq!(op.value(0, 1), 5.0);
        assert_eq!(op.value(1, 1), 0.0);
        assert_eq!(op.get(1, 1), None);
    }

    #[test]
    fn out_of_bounds_triplet_is_rejected() {
        let err = SparseOperator::from_triplets(2, 2, 1, 1, vec![Triplet::new(2, 0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, OperatorError::TripletOutOfBounds { row: 2, .. }));
    }

    #[test]
    fn empty_rows_compile() {
        let op = SparseOperator::from_triplets(4, 4, 2, 2, vec![Triplet::new(3, 3, 1.0)]).unwrap();
        assert_eq!(op.matrix().row_offsets(), &[0, 0, 0, 0, 1]);
    }

    #[test]
    fn set_value_keeps_triplets_and_matrix_in_sync() {
        let mut op = small([1.0, 2.0, 3.0]);
        op.set_value(1, 2, -4.0).unwrap();
        op.set_value(1, 0, 7.0).unwrap();
        assert_eq!(op.value(1, 2), -4.0);
        assert_eq!(op.value(1, 0), 7.0);

        let replayed =
            SparseOperator::from_triplets(2, 3, 1, 1, op.triplets().to_vec()).unwrap();
        assert_eq!(replayed.to_dense(), op.to_dense());
    }

    #[test]
    fn scale_value_multiplies_existing_entry() {
        let mut op = small([1.0, 2.0, 3.0]);
        op.scale_value(1, 2, 2.5).unwrap();
        assert_eq!(op.value(1, 2), 5.0);
        assert!(op.scale_value(5, 0, 1.0).is_err());
    }

    #[test]
    fn apply_matches_dense_product() {
        let op = small([1.0, 2.0, 3.0]);
        let y = op.apply(&[1.0, 10.0, 100.0]).unwrap();
        assert_eq!(y, vec![1.0 + 30.0, 200.0]);
    }

    #[test]
    fn apply_checks_lengths() {
        let op = small([1.0, 2.0, 3.0]);
        assert!(op.apply(&[1.0, 2.0]).is_err());
        let mut out = vec![0.0; 3];
        assert!(op.apply_into(&[1.0, 2.0, 3.0], &mut out).is_err());
    }

    #[test]
    fn transpose_swaps_shape_and_entries() {
        let op = small([1.0, 2.0, 3.0]);
        let t = op.transpose().unwrap();
        assert_eq!((t.nrows(), t.ncols()), (3, 2));
        assert_eq!(t.to_dense(), op.to_dense().transpose());
    }

    #[test]
    fn block_diagonal_offsets_blocks() {
        let a = small([1.0, 2.0, 3.0]);
        let b = small([4.0, 5.0, 6.0]);
        let ab = block_diagonal(&[&a, &b]).unwrap();
        assert_eq!((ab.nrows(), ab.ncols()), (4, 6));
        assert_eq!((ab.n_rho(), ab.n_mom()), (2, 2));
        assert_eq!(ab.value(2, 3), 4.0);
        assert_eq!(ab.value(3, 5), 5.0);
        // no cross-block coupling
        let dense = ab.to_dense();
        for r in 0..2 {
            for c in 3..6 {
                assert_eq!(dense[(r, c)], 0.0);
            }
        }
    }

    #[test]
    fn block_diagonal_rejects_empty_input() {
        let ops: [&SparseOperator<f64>; 0] = [];
        assert_eq!(
            block_diagonal(&ops).unwrap_err(),
            OperatorError::EmptyComposition
        );
    }
}
