//! Sparse integer matrices stored by column.

use std::collections::BTreeMap;

use nalgebra::DMatrix;

use super::HomologyError;

/// `rows × cols` integer matrix; each column maps row index → non-zero entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    columns: Vec<BTreeMap<usize, i64>>,
}

impl SparseMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            columns: vec![BTreeMap::new(); cols],
        }
    }

    /// Build from row-major dense data.
    pub fn from_rows(rows: &[Vec<i64>]) -> Self {
        let cols = rows.first().map_or(0, Vec::len);
        let mut m = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                m.add_to_entry(i, j, x);
            }
        }
        m
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when either dimension is zero.
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn is_zero(&self) -> bool {
        self.columns.iter().all(BTreeMap::is_empty)
    }

    /// Number of stored non-zero entries.
    pub fn nnz(&self) -> usize {
        self.columns.iter().map(BTreeMap::len).sum()
    }

    /// `self[row, col] += value`, dropping entries that cancel.
    pub fn add_to_entry(&mut self, row: usize, col: usize, value: i64) {
        assert!(row < self.rows, "row {row} out of range ({} rows)", self.rows);
        if value == 0 {
            return;
        }
        let column = &mut self.columns[col];
        let entry = column.entry(row).or_insert(0);
        *entry += value;
        if *entry == 0 {
            column.remove(&row);
        }
    }

    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.columns[col].get(&row).copied().unwrap_or(0)
    }

    pub fn column(&self, col: usize) -> &BTreeMap<usize, i64> {
        &self.columns[col]
    }

    pub fn columns(&self) -> &[BTreeMap<usize, i64>] {
        &self.columns
    }

    /// Product `self · rhs` with overflow checks.
    pub fn matmul(&self, rhs: &SparseMatrix) -> Result<SparseMatrix, HomologyError> {
        if self.cols != rhs.rows {
            return Err(HomologyError::shape(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        let mut out = SparseMatrix::zeros(self.rows, rhs.cols);
        for (j, column) in rhs.columns.iter().enumerate() {
            let mut acc: BTreeMap<usize, i64> = BTreeMap::new();
            for (&k, &b) in column {
                for (&i, &a) in &self.columns[k] {
                    let term = a.checked_mul(b).ok_or(HomologyError::Overflow)?;
                    let slot = acc.entry(i).or_insert(0);
                    *slot = slot.checked_add(term).ok_or(HomologyError::Overflow)?;
                }
            }
            acc.retain(|_, x| *x != 0);
            out.columns[j] = acc;
        }
        Ok(out)
    }

    pub fn to_dense(&self) -> DMatrix<i128> {
        let mut m = DMatrix::<i128>::zeros(self.rows, self.cols);
        for (j, column) in self.columns.iter().enumerate() {
            for (&i, &x) in column {
                m[(i, j)] = i128::from(x);
            }
        }
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_cancel() {
        let mut m = SparseMatrix::zeros(2, 2);
        m.add_to_entry(0, 1, 1);
        m.add_to_entry(0, 1, -1);
        m.add_to_entry(1, 0, 3);
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.get(1, 0), 3);
        assert_eq!(m.get(0, 1), 0);
    }

    #[test]
    fn product_and_dense_view() {
        let a = SparseMatrix::from_rows(&[vec![1, -1]]);
        let b = SparseMatrix::from_rows(&[vec![1], vec![1]]);
        assert!(a.matmul(&b).unwrap().is_zero());
        let c = b.matmul(&a).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.to_dense()[(1, 1)], -1);
        assert!(a.matmul(&a).is_err());
    }
}
