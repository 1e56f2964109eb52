use crate::algebra::*;
use itertools::izip;
use log::trace;
#[cfg(feature = "serde")]
use serde::{de, Deserialize, Deserializer, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Sparse matrix with a shared sparsity pattern.
///
/// Values are stored for the structural nonzeros only, in the storage order
/// of the pattern (column by column, rows ascending).  A structural nonzero
/// may still hold a numerically zero value.  Positions absent from the
/// pattern read as zero.
///
/// __Example usage__ :
///
/// ```
/// use spmatrix::algebra::*;
///
/// // [1  .]
/// // [.  2]
/// let A = DMatrix::new(Sparsity::diagonal(2), vec![1., 2.]).unwrap();
/// assert_eq!(A.nnz(), 2);
/// assert_eq!(A.value_at(1, 1), 2.);
/// assert_eq!(A.value_at(0, 1), 0.);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Matrix<T = f64> {
    sparsity: Arc<Sparsity>,
    nzval: Vec<T>,
}

// The value count is checked against the pattern as in `Matrix::new`
#[cfg(feature = "serde")]
impl<'de, T> Deserialize<'de> for Matrix<T>
where
    T: Element + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Parts<V> {
            sparsity: Arc<Sparsity>,
            nzval: Vec<V>,
        }
        let p = Parts::<T>::deserialize(deserializer)?;
        Matrix::new(p.sparsity, p.nzval).map_err(de::Error::custom)
    }
}

/// Matrix of `f64` values
pub type DMatrix = Matrix<f64>;
/// Matrix of integers, used as an index matrix
pub type IMatrix = Matrix<i64>;

impl<T> Matrix<T>
where
    T: Element,
{
    /// Matrix from a pattern and one value per structural nonzero.
    pub fn new(sparsity: impl Into<Arc<Sparsity>>, nzval: Vec<T>) -> Result<Self, MatrixError> {
        let sparsity = sparsity.into();
        if nzval.len() != sparsity.nnz() {
            return Err(MatrixError::Shape(format!(
                "{} values for a pattern with {} nonzeros",
                nzval.len(),
                sparsity.nnz()
            )));
        }
        Ok(Self { sparsity, nzval })
    }

    // callers guarantee that the lengths agree
    pub(crate) fn from_parts(sparsity: Arc<Sparsity>, nzval: Vec<T>) -> Self {
        debug_assert_eq!(sparsity.nnz(), nzval.len());
        Self { sparsity, nzval }
    }

    /// Every structural nonzero of `sparsity` set to `value`
    pub fn from_sparsity(sparsity: impl Into<Arc<Sparsity>>, value: T) -> Self {
        let sparsity = sparsity.into();
        let nzval = vec![value; sparsity.nnz()];
        Self { sparsity, nzval }
    }

    /// All-zero matrix without structural nonzeros
    pub fn sparse(nrows: usize, ncols: usize) -> Self {
        Self::from_parts(Arc::new(Sparsity::sparse(nrows, ncols)), Vec::new())
    }

    /// Dense matrix of zeros
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::zero())
    }

    /// Dense matrix of ones
    pub fn ones(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::one())
    }

    /// Dense matrix with every element equal to `value`
    pub fn filled(nrows: usize, ncols: usize, value: T) -> Self {
        Self::from_sparsity(Sparsity::dense(nrows, ncols), value)
    }

    /// Identity with a diagonal pattern
    pub fn eye(n: usize) -> Self {
        Self::from_sparsity(Sparsity::diagonal(n), T::one())
    }

    /// 1x1 matrix.  All scalars share one pattern.
    pub fn scalar(value: T) -> Self {
        Self::from_parts(Sparsity::scalar(), vec![value])
    }

    /// Dense matrix from a list of rows.  All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, MatrixError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, |r| r.len());
        if let Some(i) = rows.iter().position(|r| r.len() != ncols) {
            return Err(MatrixError::Shape(format!(
                "row {} has {} elements, expected {}",
                i,
                rows[i].len(),
                ncols
            )));
        }
        let mut nzval = Vec::with_capacity(nrows * ncols);
        for c in 0..ncols {
            nzval.extend(rows.iter().map(|r| r[c].clone()));
        }
        Ok(Self::from_parts(Arc::new(Sparsity::dense(nrows, ncols)), nzval))
    }

    /// Dense column vector
    pub fn from_column(values: Vec<T>) -> Self {
        Self::from_parts(Arc::new(Sparsity::dense(values.len(), 1)), values)
    }

    /// Dense row vector
    pub fn from_row(values: Vec<T>) -> Self {
        Self::from_parts(Arc::new(Sparsity::dense(1, values.len())), values)
    }

    /// Matrix from `(row, col, value)` triplets.  Values at repeated
    /// positions are summed.
    pub fn from_triplets(
        nrows: usize,
        ncols: usize,
        rows: &[usize],
        cols: &[usize],
        values: &[T],
    ) -> Result<Self, MatrixError> {
        if values.len() != rows.len() {
            return Err(MatrixError::Shape(format!(
                "{} values for {} positions",
                values.len(),
                rows.len()
            )));
        }
        let (sp, mapping) = Sparsity::from_triplets_with_mapping(nrows, ncols, rows, cols)?;
        let mut nzval = vec![T::zero(); sp.nnz()];
        for (v, &k) in values.iter().zip(&mapping) {
            nzval[k] = nzval[k].clone() + v.clone();
        }
        Ok(Self::from_parts(Arc::new(sp), nzval))
    }

    pub fn sparsity(&self) -> &Sparsity {
        &self.sparsity
    }

    /// shared handle on the pattern
    pub fn sparsity_arc(&self) -> Arc<Sparsity> {
        Arc::clone(&self.sparsity)
    }

    /// structural nonzero values in storage order
    pub fn nonzeros(&self) -> &[T] {
        &self.nzval
    }

    /// Mutable access to the values.  The pattern cannot change this way.
    pub fn nonzeros_mut(&mut self) -> &mut [T] {
        &mut self.nzval
    }

    pub fn into_parts(self) -> (Arc<Sparsity>, Vec<T>) {
        (self.sparsity, self.nzval)
    }

    /// number of structural nonzeros
    pub fn nnz(&self) -> usize {
        self.nzval.len()
    }

    /// stored value at `(row, col)`, if structurally present
    pub fn element(&self, row: usize, col: usize) -> Option<&T> {
        self.sparsity.get_nz(row, col).map(|k| &self.nzval[k])
    }

    /// value at `(row, col)`, zero if structurally absent
    pub fn value_at(&self, row: usize, col: usize) -> T {
        self.element(row, col).cloned().unwrap_or_else(T::zero)
    }

    // stored value at a column-major linear position
    pub(crate) fn element_linear(&self, el: usize) -> Option<&T> {
        let m = self.nrows();
        self.element(el % m, el / m)
    }

    /// Values as a list of rows, absent positions as zero
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        let mut rows = vec![vec![T::zero(); self.ncols()]; self.nrows()];
        for c in 0..self.ncols() {
            for k in self.sparsity.col_range(c) {
                rows[self.sparsity.row()[k]][c] = self.nzval[k].clone();
            }
        }
        rows
    }

    /// Every element in column-major order, absent positions as zero
    pub fn to_dense_colmajor(&self) -> Vec<T> {
        let mut out = vec![T::zero(); self.numel()];
        for (el, v) in izip!(self.sparsity.elements(), &self.nzval) {
            out[el] = v.clone();
        }
        out
    }

    /// Drops structural nonzeros that hold a zero value
    pub fn make_sparse(&mut self) {
        let (sp, kept) = self
            .sparsity
            .filter_nz_with_mapping(|k, _| self.nzval[k] != T::zero());
        if kept.len() == self.nnz() {
            return;
        }
        trace!(
            "make_sparse: {} of {} nonzeros dropped",
            self.nnz() - kept.len(),
            self.nnz()
        );
        self.nzval = kept.iter().map(|&k| self.nzval[k].clone()).collect();
        self.sparsity = Arc::new(sp);
    }

    /// Makes every position structurally present, absent ones as zero
    pub fn make_dense(&mut self) {
        if self.sparsity.is_dense() {
            return;
        }
        trace!("make_dense: {} to {} nonzeros", self.nnz(), self.numel());
        self.nzval = self.to_dense_colmajor();
        self.sparsity = Arc::new(Sparsity::dense(self.nrows(), self.ncols()));
    }

    /// Dense copy
    pub fn densified(&self) -> Self {
        let mut out = self.clone();
        out.make_dense();
        out
    }

    /// Changes the dimensions, dropping values that fall outside
    pub fn resize(&mut self, nrows: usize, ncols: usize) {
        let (sp, kept) = self.sparsity.resize(nrows, ncols);
        self.nzval = kept.iter().map(|&k| self.nzval[k].clone()).collect();
        self.sparsity = Arc::new(sp);
    }

    /// Appends the rows of `other` below `self`
    pub fn append(&mut self, other: &Matrix<T>) -> Result<(), MatrixError> {
        *self = vertcat(&[&*self, other])?;
        Ok(())
    }

    /// Appends the columns of `other` to the right of `self`
    pub fn append_columns(&mut self, other: &Matrix<T>) -> Result<(), MatrixError> {
        *self = horzcat(&[&*self, other])?;
        Ok(())
    }

    /// Deletes the given rows and columns
    pub fn remove_rows_cols(&mut self, rows: &[usize], cols: &[usize]) -> Result<(), MatrixError> {
        let (sp, kept) = self.sparsity.remove_rows_cols(rows, cols)?;
        self.nzval = kept.iter().map(|&k| self.nzval[k].clone()).collect();
        self.sparsity = Arc::new(sp);
        Ok(())
    }

    /// Copy with the same pattern and mapped values
    pub fn map<U: Element, F: Fn(&T) -> U>(&self, f: F) -> Matrix<U> {
        Matrix::from_parts(self.sparsity_arc(), self.nzval.iter().map(f).collect())
    }

    // contiguous block, for splitting
    pub(crate) fn sub_block(&self, rows: Range<usize>, cols: Range<usize>) -> Result<Self, MatrixError> {
        let rows: Vec<usize> = rows.collect();
        let cols: Vec<usize> = cols.collect();
        self.select(&rows, &cols)
    }

    // Cartesian selection `self[rows, cols]`
    pub(crate) fn select(&self, rows: &[usize], cols: &[usize]) -> Result<Self, MatrixError> {
        let (sp, source) = self.sparsity.sub(rows, cols)?;
        let nzval = source.iter().map(|&k| self.nzval[k].clone()).collect();
        Ok(Self::from_parts(Arc::new(sp), nzval))
    }

    // Adds the positions of `extra` to the pattern as explicit zeros
    pub(crate) fn widen_pattern(&mut self, extra: &Sparsity) -> Result<(), MatrixError> {
        let (sp, mapping) = self.sparsity.combine_with_mapping(extra, false, false)?;
        if sp.nnz() == self.nnz() {
            return Ok(());
        }
        trace!("pattern grows from {} to {} nonzeros", self.nnz(), sp.nnz());
        self.nzval = mapping
            .iter()
            .map(|&(k, _)| k.map_or_else(T::zero, |k| self.nzval[k].clone()))
            .collect();
        self.sparsity = Arc::new(sp);
        Ok(())
    }
}

impl<T> From<T> for Matrix<T>
where
    T: Element,
{
    fn from(value: T) -> Self {
        Self::scalar(value)
    }
}

impl<T> From<&Matrix<T>> for Matrix<T>
where
    T: Element,
{
    fn from(m: &Matrix<T>) -> Self {
        m.clone()
    }
}

impl<T> ShapedMatrix for Matrix<T> {
    fn nrows(&self) -> usize {
        self.sparsity.nrows()
    }
    fn ncols(&self) -> usize {
        self.sparsity.ncols()
    }
}
