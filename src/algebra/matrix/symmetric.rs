use crate::algebra::*;
use itertools::izip;
use std::sync::Arc;

impl<T> Matrix<T>
where
    T: Element,
{
    /// Packs a symmetric matrix into the values of its upper triangle,
    /// diagonal included, in column-major order.
    ///
    /// ```
    /// use spmatrix::algebra::*;
    ///
    /// let mut A = IMatrix::from_rows(&[vec![1, 2, -3], vec![2, -1, 0], vec![-3, 0, 5]]).unwrap();
    /// A.make_sparse();
    /// assert_eq!(A.to_sparse_symmetric_vector().unwrap(), vec![1, 2, -1, -3, 5]);
    /// ```
    pub fn to_sparse_symmetric_vector(&self) -> Result<Vec<T>, MatrixError> {
        if !self.sparsity().is_symmetric() {
            return Err(MatrixError::Shape(format!(
                "{} is not a symmetric pattern",
                self.sparsity()
            )));
        }
        let (_, kept) = self.sparsity().filter_with_mapping(|r, c| r <= c);
        Ok(kept.iter().map(|&k| self.nonzeros()[k].clone()).collect())
    }

    /// Inverse of [`to_sparse_symmetric_vector`](Matrix::to_sparse_symmetric_vector)
    /// for a symmetric pattern `sp`.
    pub fn from_sparse_symmetric_vector(sp: &Sparsity, v: &[T]) -> Result<Self, MatrixError> {
        let mut M = Self::from_sparsity(sp.clone(), T::zero());
        M.set_sparse_symmetric(v)?;
        Ok(M)
    }

    /// Overwrites the values of a symmetric matrix from the packed upper
    /// triangle `v`.  Both triangles are written.
    pub fn set_sparse_symmetric(&mut self, v: &[T]) -> Result<(), MatrixError> {
        let sp = self.sparsity_arc();
        if !sp.is_symmetric() {
            return Err(MatrixError::Shape(format!("{} is not a symmetric pattern", sp)));
        }
        let nupper = sp.size_u() + sp.size_d();
        if v.len() != nupper {
            return Err(MatrixError::Shape(format!(
                "{} values for an upper triangle with {} nonzeros",
                v.len(),
                nupper
            )));
        }
        let (_, kept) = sp.filter_with_mapping(|r, c| r <= c);
        let (_, transpose_map) = sp.transpose_with_mapping();
        let nzval = self.nonzeros_mut();
        for (&k, value) in izip!(&kept, v) {
            nzval[k] = value.clone();
            nzval[transpose_map[k]] = value.clone();
        }
        Ok(())
    }

    /// Lower triangle, optionally including the diagonal
    pub fn tril(&self, include_diagonal: bool) -> Matrix<T> {
        self.filtered(|r, c| r > c || (include_diagonal && r == c))
    }

    /// Upper triangle, optionally including the diagonal
    pub fn triu(&self, include_diagonal: bool) -> Matrix<T> {
        self.filtered(|r, c| r < c || (include_diagonal && r == c))
    }

    fn filtered<F: Fn(usize, usize) -> bool>(&self, keep: F) -> Matrix<T> {
        let (sp, kept) = self.sparsity().filter_with_mapping(keep);
        let nzval = kept.iter().map(|&k| self.nonzeros()[k].clone()).collect();
        Matrix::from_parts(Arc::new(sp), nzval)
    }

    /// Symmetric matrix from its lower triangle.  Entries above the
    /// diagonal are an error.
    pub fn tril2symm(&self) -> Result<Matrix<T>, MatrixError> {
        if !self.is_square() || !self.sparsity().is_tril() {
            return Err(MatrixError::Shape(format!(
                "{} is not lower triangular",
                self.sparsity()
            )));
        }
        self.mirrored()
    }

    /// Symmetric matrix from its upper triangle.  Entries below the
    /// diagonal are an error.
    pub fn triu2symm(&self) -> Result<Matrix<T>, MatrixError> {
        if !self.is_square() || !self.sparsity().is_triu() {
            return Err(MatrixError::Shape(format!(
                "{} is not upper triangular",
                self.sparsity()
            )));
        }
        self.mirrored()
    }

    // self + self' with the diagonal counted once, for triangular self
    fn mirrored(&self) -> Result<Matrix<T>, MatrixError> {
        let offdiag = self.filtered(|r, c| r != c);
        offdiag.transpose().plus(self)
    }
}
