use crate::algebra::{MatrixError, ShapedMatrix, SparseFormatError};
use lazy_static::lazy_static;
#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize};
use std::cmp::min;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Structural pattern of a sparse matrix in compressed column format.
///
/// A pattern records which `(row, col)` positions are structurally nonzero,
/// independently of any values.  Patterns are immutable once built: every
/// structural operation returns a new pattern, and matrices share them
/// through an `Arc`.
///
/// __Example usage__ : the pattern of the 3 x 3 matrix
/// ```text
/// A = [*  *  *]
///     [*  .  *]
///     [.  *  *]
/// ```
///
/// ```
/// use spmatrix::algebra::Sparsity;
///
/// let sp = Sparsity::new(
///    3,                         // rows
///    3,                         // cols
///    vec![0, 2, 4, 7],          // colind
///    vec![0, 1, 0, 2, 0, 1, 2], // row
/// ).unwrap();
///
/// assert_eq!(sp.nnz(), 7);
/// assert_eq!(sp.get_nz(2, 1), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Sparsity {
    nrows: usize,
    ncols: usize,
    colind: Vec<usize>,
    row: Vec<usize>,
}

// Deserialized arrays go through the same checks as `Sparsity::new`
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Sparsity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts {
            nrows: usize,
            ncols: usize,
            colind: Vec<usize>,
            row: Vec<usize>,
        }
        let p = Parts::deserialize(deserializer)?;
        Sparsity::new(p.nrows, p.ncols, p.colind, p.row).map_err(de::Error::custom)
    }
}

lazy_static! {
    static ref SCALAR: Arc<Sparsity> = Arc::new(Sparsity::dense(1, 1));
    static ref EMPTY: Arc<Sparsity> = Arc::new(Sparsity::dense(0, 0));
}

impl Sparsity {
    /// Pattern constructor.  Runs [`sanity_check`](Sparsity::sanity_check)
    /// on the supplied arrays.
    pub fn new(
        nrows: usize,
        ncols: usize,
        colind: Vec<usize>,
        row: Vec<usize>,
    ) -> Result<Self, SparseFormatError> {
        let sp = Sparsity {
            nrows,
            ncols,
            colind,
            row,
        };
        sp.sanity_check()?;
        Ok(sp)
    }

    // internal constructor for arrays that are correct by construction
    pub(crate) fn from_parts(nrows: usize, ncols: usize, colind: Vec<usize>, row: Vec<usize>) -> Self {
        let sp = Sparsity {
            nrows,
            ncols,
            colind,
            row,
        };
        debug_assert!(sp.sanity_check().is_ok());
        sp
    }

    /// Fully populated pattern
    pub fn dense(nrows: usize, ncols: usize) -> Self {
        let colind = (0..=ncols).map(|j| j * nrows).collect();
        let row = (0..ncols).flat_map(|_| 0..nrows).collect();
        Self::from_parts(nrows, ncols, colind, row)
    }

    /// Pattern without any structural nonzeros
    pub fn sparse(nrows: usize, ncols: usize) -> Self {
        Self::from_parts(nrows, ncols, vec![0; ncols + 1], Vec::new())
    }

    /// Shared dense 1 x 1 pattern
    pub fn scalar() -> Arc<Sparsity> {
        SCALAR.clone()
    }

    /// Shared 0 x 0 pattern
    pub fn empty() -> Arc<Sparsity> {
        EMPTY.clone()
    }

    /// Square diagonal pattern
    pub fn diagonal(n: usize) -> Self {
        Self::diagonal_rect(n, n)
    }

    /// Leading diagonal of a possibly non-square shape
    pub fn diagonal_rect(nrows: usize, ncols: usize) -> Self {
        let k = min(nrows, ncols);
        let colind = (0..=ncols).map(|j| min(j, k)).collect();
        Self::from_parts(nrows, ncols, colind, (0..k).collect())
    }

    /// Dense lower triangle, diagonal included
    pub fn lower_triangular(n: usize) -> Self {
        Self::banded_inner(n, |j| j..n)
    }

    /// Dense upper triangle, diagonal included.  Equal to the transpose
    /// of [`lower_triangular`](Sparsity::lower_triangular).
    pub fn upper_triangular(n: usize) -> Self {
        Self::banded_inner(n, |j| 0..(j + 1))
    }

    /// All positions with `|row - col| <= k`
    pub fn banded(n: usize, k: usize) -> Self {
        Self::banded_inner(n, |j| j.saturating_sub(k)..min(n, j + k + 1))
    }

    fn banded_inner<F: Fn(usize) -> Range<usize>>(n: usize, rows_of_col: F) -> Self {
        let mut colind = Vec::with_capacity(n + 1);
        let mut row = Vec::new();
        colind.push(0);
        for j in 0..n {
            row.extend(rows_of_col(j));
            colind.push(row.len());
        }
        Self::from_parts(n, n, colind, row)
    }

    /// Pattern from lists of row and column indices.  Repeated positions
    /// are merged.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
    ) -> Result<Self, MatrixError> {
        Ok(Self::from_triplets_with_mapping(nrows, ncols, rows, cols)?.0)
    }

    /// As [`from_triplets`](Sparsity::from_triplets), also returning the
    /// nonzero index that each input position landed on.
    pub fn from_triplets_with_mapping(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
    ) -> Result<(Self, Vec<usize>), MatrixError> {
        if rows.len() != cols.len() {
            return Err(MatrixError::Shape(format!(
                "{} row indices but {} column indices",
                rows.len(),
                cols.len()
            )));
        }
        if let Some(t) = (0..rows.len()).find(|&t| rows[t] >= nrows || cols[t] >= ncols) {
            return Err(MatrixError::Index(format!(
                "position ({},{}) outside {}x{}",
                rows[t], cols[t], nrows, ncols
            )));
        }

        let mut order: Vec<usize> = (0..rows.len()).collect();
        order.sort_by_key(|&t| (cols[t], rows[t]));

        let mut colind = vec![0; ncols + 1];
        let mut row = Vec::with_capacity(rows.len());
        let mut mapping = vec![0; rows.len()];
        let mut last: Option<(usize, usize)> = None;
        for t in order {
            let pos = (cols[t], rows[t]);
            if last != Some(pos) {
                row.push(rows[t]);
                colind[cols[t] + 1] += 1;
                last = Some(pos);
            }
            mapping[t] = row.len() - 1;
        }
        for j in 0..ncols {
            colind[j + 1] += colind[j];
        }
        Ok((Self::from_parts(nrows, ncols, colind, row), mapping))
    }

    /// Cartesian selection: every `(rows[i], cols[j])` pair is a nonzero
    pub fn from_col_row(
        cols: &[usize],
        rows: &[usize],
        nrows: usize,
        ncols: usize,
    ) -> Result<Self, MatrixError> {
        let (rr, cc): (Vec<usize>, Vec<usize>) = cols
            .iter()
            .flat_map(|&c| rows.iter().map(move |&r| (r, c)))
            .unzip();
        Self::from_triplets(nrows, ncols, &rr, &cc)
    }

    /// column offsets, length `ncols + 1`
    pub fn colind(&self) -> &[usize] {
        &self.colind
    }

    /// row index of every nonzero
    pub fn row(&self) -> &[usize] {
        &self.row
    }

    pub(crate) fn col_range(&self, col: usize) -> Range<usize> {
        self.colind[col]..self.colind[col + 1]
    }

    pub(crate) fn rows_of_col(&self, col: usize) -> &[usize] {
        &self.row[self.col_range(col)]
    }

    /// number of structural nonzeros
    pub fn nnz(&self) -> usize {
        self.row.len()
    }

    /// number of nonzeros strictly below the diagonal
    pub fn size_l(&self) -> usize {
        self.count_where(|r, c| r > c)
    }

    /// number of nonzeros strictly above the diagonal
    pub fn size_u(&self) -> usize {
        self.count_where(|r, c| r < c)
    }

    /// number of nonzeros on the diagonal
    pub fn size_d(&self) -> usize {
        self.count_where(|r, c| r == c)
    }

    fn count_where<F: Fn(usize, usize) -> bool>(&self, f: F) -> usize {
        (0..self.ncols)
            .map(|c| self.rows_of_col(c).iter().filter(|&&r| f(r, c)).count())
            .sum()
    }

    /// column index of every nonzero
    pub fn get_col(&self) -> Vec<usize> {
        let mut col = Vec::with_capacity(self.nnz());
        for c in 0..self.ncols {
            col.extend(std::iter::repeat(c).take(self.colind[c + 1] - self.colind[c]));
        }
        col
    }

    /// `(rows, cols)` of every nonzero, in storage order
    pub fn triplets(&self) -> (Vec<usize>, Vec<usize>) {
        (self.row.clone(), self.get_col())
    }

    /// column-major linear position `row + col * nrows` of every nonzero
    pub fn elements(&self) -> Vec<usize> {
        self.get_col()
            .iter()
            .zip(&self.row)
            .map(|(&c, &r)| r + c * self.nrows)
            .collect()
    }

    /// nonzero index of position `(row, col)`, if structurally present
    pub fn get_nz(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        let first = self.colind[col];
        self.rows_of_col(col)
            .binary_search(&row)
            .ok()
            .map(|k| first + k)
    }

    pub fn has_nz(&self, row: usize, col: usize) -> bool {
        self.get_nz(row, col).is_some()
    }

    pub fn is_dense(&self) -> bool {
        self.nnz() == self.numel()
    }

    /// true if every structural entry lies on the diagonal
    pub fn is_diagonal(&self) -> bool {
        self.is_square() && self.size_d() == self.nnz()
    }

    /// true if no structural entries lie above the diagonal
    pub fn is_tril(&self) -> bool {
        self.size_u() == 0
    }

    /// true if no structural entries lie below the diagonal
    pub fn is_triu(&self) -> bool {
        self.size_l() == 0
    }

    /// Checks the pattern invariants: column offsets start at zero, are
    /// monotonic and end at the nonzero count, and rows are in range and
    /// strictly increasing within each column.
    pub fn sanity_check(&self) -> Result<(), SparseFormatError> {
        if self.colind.len() != self.ncols + 1 {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if self.colind[0] != 0 || self.colind.windows(2).any(|c| c[0] > c[1]) {
            return Err(SparseFormatError::BadColptr);
        }
        if self.colind[self.ncols] != self.row.len() {
            return Err(SparseFormatError::IncompatibleDimension);
        }
        if !self.row.iter().all(|r| r < &self.nrows) {
            return Err(SparseFormatError::BadRowval);
        }
        for col in 0..self.ncols {
            if self.rows_of_col(col).windows(2).any(|c| c[0] >= c[1]) {
                return Err(SparseFormatError::BadRowOrdering);
            }
        }
        Ok(())
    }

    /// Keeps the nonzeros for which `keep(row, col)` holds
    pub fn filter<F: Fn(usize, usize) -> bool>(&self, keep: F) -> Sparsity {
        self.filter_with_mapping(keep).0
    }

    /// As [`filter`](Sparsity::filter), also returning the original
    /// nonzero index of every kept entry.
    pub fn filter_with_mapping<F: Fn(usize, usize) -> bool>(&self, keep: F) -> (Sparsity, Vec<usize>) {
        self.filter_nz_with_mapping(|k, c| keep(self.row[k], c))
    }

    // keeps the nonzeros for which `keep(nz, col)` holds
    pub(crate) fn filter_nz_with_mapping<F: Fn(usize, usize) -> bool>(
        &self,
        keep: F,
    ) -> (Sparsity, Vec<usize>) {
        let mut colind = Vec::with_capacity(self.ncols + 1);
        let mut row = Vec::new();
        let mut mapping = Vec::new();
        colind.push(0);
        for c in 0..self.ncols {
            for k in self.col_range(c) {
                if keep(k, c) {
                    row.push(self.row[k]);
                    mapping.push(k);
                }
            }
            colind.push(row.len());
        }
        (
            Self::from_parts(self.nrows, self.ncols, colind, row),
            mapping,
        )
    }

    /// Lower triangle, optionally including the diagonal
    pub fn lower(&self, include_diagonal: bool) -> Sparsity {
        self.filter(|r, c| r > c || (include_diagonal && r == c))
    }

    /// Upper triangle, optionally including the diagonal
    pub fn upper(&self, include_diagonal: bool) -> Sparsity {
        self.filter(|r, c| r < c || (include_diagonal && r == c))
    }

    /// Cartesian sub-pattern `self[rows, cols]`.
    ///
    /// Index lists may be in any order and may repeat entries.  Also
    /// returns, per nonzero of the result, the nonzero of `self` it was
    /// taken from.
    pub fn sub(&self, rows: &[usize], cols: &[usize]) -> Result<(Sparsity, Vec<usize>), MatrixError> {
        check_in_range(rows, self.nrows, "row")?;
        check_in_range(cols, self.ncols, "column")?;

        // output rows that each source row feeds
        let mut rowmap: Vec<Vec<usize>> = vec![Vec::new(); self.nrows];
        for (ii, &r) in rows.iter().enumerate() {
            rowmap[r].push(ii);
        }

        let mut colind = Vec::with_capacity(cols.len() + 1);
        let mut row = Vec::new();
        let mut mapping = Vec::new();
        let mut buf: Vec<(usize, usize)> = Vec::new();
        colind.push(0);
        for &c in cols {
            buf.clear();
            for k in self.col_range(c) {
                buf.extend(rowmap[self.row[k]].iter().map(|&ii| (ii, k)));
            }
            buf.sort_unstable();
            for &(ii, k) in &buf {
                row.push(ii);
                mapping.push(k);
            }
            colind.push(row.len());
        }
        Ok((
            Self::from_parts(rows.len(), cols.len(), colind, row),
            mapping,
        ))
    }

    /// Deletes the given rows and columns.  Order and repetition in the
    /// lists do not matter.  Also returns the kept nonzero indices.
    pub fn remove_rows_cols(
        &self,
        rows: &[usize],
        cols: &[usize],
    ) -> Result<(Sparsity, Vec<usize>), MatrixError> {
        check_in_range(rows, self.nrows, "row")?;
        check_in_range(cols, self.ncols, "column")?;

        let newrow = compacted_index(self.nrows, rows);
        let newcol = compacted_index(self.ncols, cols);
        let nrows = newrow.iter().flatten().count();
        let ncols = newcol.iter().flatten().count();

        let mut colind = Vec::with_capacity(ncols + 1);
        let mut row = Vec::new();
        let mut mapping = Vec::new();
        colind.push(0);
        for c in (0..self.ncols).filter(|&c| newcol[c].is_some()) {
            for k in self.col_range(c) {
                if let Some(r) = newrow[self.row[k]] {
                    row.push(r);
                    mapping.push(k);
                }
            }
            colind.push(row.len());
        }
        Ok((Self::from_parts(nrows, ncols, colind, row), mapping))
    }

    /// Column-major reshape.  Nonzero order is unchanged.
    pub fn reshape(&self, nrows: usize, ncols: usize) -> Result<Sparsity, MatrixError> {
        if nrows * ncols != self.numel() {
            return Err(MatrixError::Shape(format!(
                "cannot reshape {} into {}x{}",
                self.dim_string(),
                nrows,
                ncols
            )));
        }
        let mut colind = vec![0; ncols + 1];
        let mut row = Vec::with_capacity(self.nnz());
        for el in self.elements() {
            row.push(el % nrows);
            colind[el / nrows + 1] += 1;
        }
        for j in 0..ncols {
            colind[j + 1] += colind[j];
        }
        Ok(Self::from_parts(nrows, ncols, colind, row))
    }

    /// Changes the dimensions, dropping entries that fall outside.
    /// Also returns the kept nonzero indices.
    pub fn resize(&self, nrows: usize, ncols: usize) -> (Sparsity, Vec<usize>) {
        let mut colind = Vec::with_capacity(ncols + 1);
        let mut row = Vec::new();
        let mut mapping = Vec::new();
        colind.push(0);
        for c in 0..ncols {
            if c < self.ncols {
                for k in self.col_range(c) {
                    if self.row[k] < nrows {
                        row.push(self.row[k]);
                        mapping.push(k);
                    }
                }
            }
            colind.push(row.len());
        }
        (Self::from_parts(nrows, ncols, colind, row), mapping)
    }

    /// Text plot of the pattern, `*` for nonzeros and `.` otherwise
    pub fn spy(&self) -> String {
        let mut grid = vec![vec!['.'; self.ncols]; self.nrows];
        for c in 0..self.ncols {
            for &r in self.rows_of_col(c) {
                grid[r][c] = '*';
            }
        }
        let mut out = String::with_capacity(self.nrows * (self.ncols + 1));
        for line in grid {
            out.extend(line);
            out.push('\n');
        }
        out
    }
}

// maps each index in 0..n to its position after deleting `removed`
fn compacted_index(n: usize, removed: &[usize]) -> Vec<Option<usize>> {
    let mut keep = vec![true; n];
    removed.iter().for_each(|&i| keep[i] = false);
    let mut next = 0;
    keep.iter()
        .map(|&k| {
            k.then(|| {
                next += 1;
                next - 1
            })
        })
        .collect()
}

pub(crate) fn check_in_range(idx: &[usize], len: usize, what: &str) -> Result<(), MatrixError> {
    match idx.iter().find(|&&i| i >= len) {
        Some(i) => Err(MatrixError::Index(format!(
            "{} {} out of range for dimension {}",
            what, i, len
        ))),
        None => Ok(()),
    }
}

impl ShapedMatrix for Sparsity {
    fn nrows(&self) -> usize {
        self.nrows
    }
    fn ncols(&self) -> usize {
        self.ncols
    }
}

impl fmt::Display for Sparsity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sparsity({}, {} nnz)", self.dim_string(), self.nnz())
    }
}

#[test]
fn test_sparsity_banded_and_counts() {
    let sp = Sparsity::banded(4, 1);
    // [* * . .]
    // [* * * .]
    // [. * * *]
    // [. . * *]
    assert_eq!(sp.colind(), &[0, 2, 5, 8, 10]);
    assert_eq!(sp.row(), &[0, 1, 0, 1, 2, 1, 2, 3, 2, 3]);
    assert_eq!(sp.size_l(), 3);
    assert_eq!(sp.size_u(), 3);
    assert_eq!(sp.size_d(), 4);
    assert_eq!(sp.spy(), "**..\n***.\n.***\n..**\n");
}
