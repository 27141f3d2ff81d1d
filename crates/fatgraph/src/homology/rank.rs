//! Exact rank oracles.

use std::collections::BTreeMap;

use super::{HomologyError, SparseMatrix};

/// Exact rank of an integer matrix.
pub trait RankOracle {
    /// Must return 0 for a matrix with a zero dimension without doing any work.
    fn rank(&self, m: &SparseMatrix) -> Result<usize, HomologyError>;

    fn name(&self) -> &'static str;
}

fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Fraction-free elimination over sparse columns.
///
/// Each column is reduced against the pivots found so far, keyed by their
/// leading (smallest) row; a column that does not vanish becomes a new pivot.
/// Reduced vectors are divided by the gcd of their entries to keep them small.
#[derive(Clone, Copy, Debug, Default)]
pub struct SparseElimination;

impl SparseElimination {
    /// `(b/g)·v - (a/g)·p` with `a = v[lead]`, `b = p[lead]`, then content-normalised.
    fn eliminate(
        v: &BTreeMap<usize, i128>,
        p: &BTreeMap<usize, i128>,
        lead: usize,
    ) -> Result<BTreeMap<usize, i128>, HomologyError> {
        let a = v.get(&lead).copied().unwrap_or(0);
        let b = p.get(&lead).copied().unwrap_or(1);
        let g = gcd(a, b);
        let (fv, fp) = (b / g, a / g);
        let mut out: BTreeMap<usize, i128> = BTreeMap::new();
        for (&row, &x) in v {
            out.insert(row, x.checked_mul(fv).ok_or(HomologyError::Overflow)?);
        }
        for (&row, &y) in p {
            let term = y.checked_mul(fp).ok_or(HomologyError::Overflow)?;
            let slot = out.entry(row).or_insert(0);
            *slot = slot.checked_sub(term).ok_or(HomologyError::Overflow)?;
        }
        out.retain(|_, x| *x != 0);
        let content = out.values().fold(0, |acc, &x| gcd(acc, x));
        if content > 1 {
            for x in out.values_mut() {
                *x /= content;
            }
        }
        Ok(out)
    }
}

impl RankOracle for SparseElimination {
    fn rank(&self, m: &SparseMatrix) -> Result<usize, HomologyError> {
        if m.is_degenerate() {
            return Ok(0);
        }
        let mut pivots: BTreeMap<usize, BTreeMap<usize, i128>> = BTreeMap::new();
        for column in m.columns() {
            let mut v: BTreeMap<usize, i128> =
                column.iter().map(|(&r, &x)| (r, i128::from(x))).collect();
            loop {
                let Some((&lead, _)) = v.first_key_value() else {
                    break;
                };
                let Some(p) = pivots.get(&lead) else {
                    pivots.insert(lead, v);
                    break;
                };
                v = Self::eliminate(&v, p, lead)?;
            }
        }
        Ok(pivots.len())
    }

    fn name(&self) -> &'static str {
        "sparse-elimination"
    }
}

/// Bareiss fraction-free Gaussian elimination on a dense `nalgebra` matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct DenseBareiss;

impl RankOracle for DenseBareiss {
    fn rank(&self, m: &SparseMatrix) -> Result<usize, HomologyError> {
        if m.is_degenerate() {
            return Ok(0);
        }
        let mut a = m.to_dense();
        let (rows, cols) = a.shape();
        let mut rank = 0;
        let mut prev: i128 = 1;
        for c in 0..cols {
            if rank == rows {
                break;
            }
            let Some(p) = (rank..rows).find(|&r| a[(r, c)] != 0) else {
                continue;
            };
            a.swap_rows(rank, p);
            let pivot = a[(rank, c)];
            for r in rank + 1..rows {
                let factor = a[(r, c)];
                for cc in c + 1..cols {
                    let lhs = a[(r, cc)].checked_mul(pivot).ok_or(HomologyError::Overflow)?;
                    let rhs = factor
                        .checked_mul(a[(rank, cc)])
                        .ok_or(HomologyError::Overflow)?;
                    let num = lhs.checked_sub(rhs).ok_or(HomologyError::Overflow)?;
                    // exact by Sylvester's identity
                    a[(r, cc)] = num / prev;
                }
                a[(r, c)] = 0;
            }
            prev = pivot;
            rank += 1;
        }
        Ok(rank)
    }

    fn name(&self) -> &'static str {
        "dense-bareiss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(rows: &[Vec<i64>]) -> (usize, usize) {
        let m = SparseMatrix::from_rows(rows);
        (
            SparseElimination.rank(&m).unwrap(),
            DenseBareiss.rank(&m).unwrap(),
        )
    }

    #[test]
    fn degenerate_shapes_have_rank_zero() {
        assert_eq!(SparseElimination.rank(&SparseMatrix::zeros(0, 5)).unwrap(), 0);
        assert_eq!(DenseBareiss.rank(&SparseMatrix::zeros(4, 0)).unwrap(), 0);
        assert_eq!(both(&[vec![0, 0], vec![0, 0]]), (0, 0));
    }

    #[test]
    fn small_ranks() {
        assert_eq!(both(&[vec![1, 2], vec![2, 4]]), (1, 1));
        assert_eq!(both(&[vec![2, 3], vec![4, 5]]), (2, 2));
        assert_eq!(
            both(&[vec![1, 1, 0], vec![-1, 0, 1], vec![0, -1, -1]]),
            (2, 2)
        );
        // needs a row swap and skips a zero column
        assert_eq!(both(&[vec![0, 0, 1], vec![0, 3, 0], vec![0, 6, 2]]), (2, 2));
    }
}
