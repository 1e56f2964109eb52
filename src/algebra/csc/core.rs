#![allow(non_snake_case)]

use crate::algebra::{FloatT, ShapedMatrix, SparseFormatError};

/// Owned compressed sparse column storage for factorization output.
///
/// A [`Matrix`](crate::algebra::Matrix) shares an immutable pattern.  The
/// factors computed by the [`linsol`](crate::linsol) backends grow column
/// by column instead, so they keep their own index arrays here.  Rows in a
/// column are kept in the order the factorization produced them, which need
/// not be ascending: the LU factors place the diagonal first in each column
/// of `L` and last in each column of `U`.
///
/// ```
/// use spmatrix::algebra::CscMatrix;
///
/// // [5  .]
/// // [1  2]
/// let L = CscMatrix::new(2, 2, vec![0, 2, 3], vec![0, 1, 1], vec![5., 1., 2.]);
/// assert_eq!(L.nnz(), 3);
/// assert!(L.check_format().is_ok());
/// assert!(L.has_sorted_rows());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix<T = f64> {
    pub m: usize,
    pub n: usize,
    /// start of each column in `rowval`, with `n + 1` entries
    pub colptr: Vec<usize>,
    pub rowval: Vec<usize>,
    pub nzval: Vec<T>,
}

impl<T> CscMatrix<T>
where
    T: FloatT,
{
    /// # Panics
    /// Panics unless `colptr` has `n + 1` entries ending at the common
    /// length of `rowval` and `nzval`.
    pub fn new(m: usize, n: usize, colptr: Vec<usize>, rowval: Vec<usize>, nzval: Vec<T>) -> Self {
        assert!(colptr.len() == n + 1 && colptr[n] == rowval.len());
        assert_eq!(rowval.len(), nzval.len());
        Self {
            m,
            n,
            colptr,
            rowval,
            nzval,
        }
    }

    /// `m x n` storage with room for `nnz` entries, all in the last column
    pub fn spalloc(size: (usize, usize), nnz: usize) -> Self {
        let (m, n) = size;
        let colptr = (0..=n).map(|j| if j == n { nnz } else { 0 }).collect();
        Self::new(m, n, colptr, vec![0; nnz], vec![T::zero(); nnz])
    }

    pub fn nnz(&self) -> usize {
        self.rowval.len()
    }

    /// Validates the index arrays.  Rows within a column may come in any
    /// order but must not repeat.
    pub fn check_format(&self) -> Result<(), SparseFormatError> {
        let lengths_agree = self.colptr.len() == self.n + 1
            && self.rowval.len() == self.nzval.len()
            && self.colptr.last() == Some(&self.rowval.len());
        if !lengths_agree {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colptr[0] != 0 || self.colptr.windows(2).any(|w| w[1] < w[0]) {
            return Err(SparseFormatError::BadColptr);
        }
        if self.rowval.iter().any(|&r| r >= self.m) {
            return Err(SparseFormatError::BadRowval);
        }
        // column that last used each row
        let mut seen = vec![usize::MAX; self.m];
        for (j, w) in self.colptr.windows(2).enumerate() {
            for &r in &self.rowval[w[0]..w[1]] {
                if seen[r] == j {
                    return Err(SparseFormatError::BadRowOrdering);
                }
                seen[r] = j;
            }
        }
        Ok(())
    }

    /// True if the rows of every column are strictly increasing
    pub fn has_sorted_rows(&self) -> bool {
        self.colptr
            .windows(2)
            .all(|w| self.rowval[w[0]..w[1]].windows(2).all(|r| r[0] < r[1]))
    }
}

impl<T> ShapedMatrix for CscMatrix<T> {
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
}

#[test]
fn test_csc_check_format() {
    let good = CscMatrix::new(2, 2, vec![0, 1, 3], vec![1, 0, 1], vec![1., 2., 3.]);
    assert!(good.check_format().is_ok());
    assert!(good.has_sorted_rows());
    assert_eq!(good.nnz(), 3);
    assert_eq!(good.size(), (2, 2));

    // order within a column is free
    let unsorted = CscMatrix::new(2, 2, vec![0, 1, 3], vec![1, 1, 0], vec![1., 2., 3.]);
    assert!(unsorted.check_format().is_ok());
    assert!(!unsorted.has_sorted_rows());

    let repeated = CscMatrix::new(2, 2, vec![0, 1, 3], vec![1, 0, 0], vec![1., 2., 3.]);
    assert_eq!(
        repeated.check_format(),
        Err(SparseFormatError::BadRowOrdering)
    );
    let out_of_range = CscMatrix::new(2, 2, vec![0, 1, 3], vec![1, 0, 2], vec![1., 2., 3.]);
    assert_eq!(out_of_range.check_format(), Err(SparseFormatError::BadRowval));

    let mut bad_colptr = good.clone();
    bad_colptr.colptr = vec![1, 0, 3];
    assert_eq!(bad_colptr.check_format(), Err(SparseFormatError::BadColptr));
    let mut short = good;
    short.nzval.pop();
    assert_eq!(short.check_format(), Err(SparseFormatError::IncompatibleDimension));

    let empty = CscMatrix::<f64>::spalloc((3, 0), 0);
    assert!(empty.check_format().is_ok());
    assert_eq!(empty.colptr, vec![0]);
}
