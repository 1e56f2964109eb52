use crate::algebra::*;
use std::borrow::Borrow;
use std::sync::Arc;

impl<T> Matrix<T>
where
    T: Element,
{
    pub fn transpose(&self) -> Matrix<T> {
        let (sp, source) = self.sparsity().transpose_with_mapping();
        let nzval = source.iter().map(|&k| self.nonzeros()[k].clone()).collect();
        Matrix::from_parts(Arc::new(sp), nzval)
    }

    /// Matrix product `self * other`
    pub fn mtimes(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        let sp = self.sparsity().pattern_product(other.sparsity())?;
        let (A, B) = (self.sparsity(), other.sparsity());

        // column by column, scattering into a dense work column
        let mut work = vec![T::zero(); self.nrows()];
        let mut nzval = Vec::with_capacity(sp.nnz());
        for j in 0..other.ncols() {
            for kb in B.col_range(j) {
                let b = &other.nonzeros()[kb];
                let col = B.row()[kb];
                for ka in A.col_range(col) {
                    let i = A.row()[ka];
                    work[i] = work[i].clone() + self.nonzeros()[ka].clone() * b.clone();
                }
            }
            for &i in sp.rows_of_col(j) {
                nzval.push(std::mem::replace(&mut work[i], T::zero()));
            }
        }
        Ok(Matrix::from_parts(Arc::new(sp), nzval))
    }

    /// Sum of each column, as a row vector
    pub fn sum_rows(&self) -> Matrix<T> {
        let sp = self.sparsity();
        let mut colind = vec![0];
        let mut nzval = Vec::new();
        for c in 0..self.ncols() {
            let range = sp.col_range(c);
            if !range.is_empty() {
                nzval.push(range.fold(T::zero(), |acc, k| acc + self.nonzeros()[k].clone()));
            }
            colind.push(nzval.len());
        }
        let row = vec![0; nzval.len()];
        let sp = Sparsity::from_parts(1, self.ncols(), colind, row);
        Matrix::from_parts(Arc::new(sp), nzval)
    }

    /// Sum of each row, as a column vector
    pub fn sum_cols(&self) -> Matrix<T> {
        self.transpose().sum_rows().transpose()
    }

    /// Column-major reshape
    pub fn reshape(&self, nrows: usize, ncols: usize) -> Result<Matrix<T>, MatrixError> {
        let sp = self.sparsity().reshape(nrows, ncols)?;
        Ok(Matrix::from_parts(Arc::new(sp), self.nonzeros().to_vec()))
    }

    /// All elements stacked into one column
    pub fn vec(&self) -> Matrix<T> {
        if self.ncols() == 1 {
            return self.clone();
        }
        let m = self.nrows();
        // column-major positions, ascending in storage order
        let row: Vec<usize> = self
            .sparsity()
            .row()
            .iter()
            .zip(self.sparsity().get_col())
            .map(|(&r, c)| r + c * m)
            .collect();
        let sp = Sparsity::from_parts(self.numel(), 1, vec![0, row.len()], row);
        Matrix::from_parts(Arc::new(sp), self.nonzeros().to_vec())
    }

    /// Diagonal matrix from a vector, or the diagonal of a square matrix
    /// as a column vector
    pub fn diag(&self) -> Result<Matrix<T>, MatrixError> {
        if self.is_vector() {
            let v = self.vec();
            let n = v.nrows();
            let rows = v.sparsity().row().to_vec();
            let sp = Sparsity::from_triplets(n, n, &rows, &rows)?;
            return Ok(Matrix::from_parts(Arc::new(sp), v.nonzeros().to_vec()));
        }
        if !self.is_square() {
            return Err(MatrixError::Shape(format!(
                "diag of a {} matrix",
                self.dim_string()
            )));
        }
        let n = self.nrows();
        let (_, kept) = self.sparsity().filter_with_mapping(|r, c| r == c);
        let rows: Vec<usize> = kept.iter().map(|&k| self.sparsity().row()[k]).collect();
        let sp = Sparsity::from_triplets(n, 1, &rows, &vec![0; rows.len()])?;
        let nzval = kept.iter().map(|&k| self.nonzeros()[k].clone()).collect();
        Ok(Matrix::from_parts(Arc::new(sp), nzval))
    }
}

/// Product of a chain of matrices, left to right
pub fn mtimes_all<T, M>(ms: &[M]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    let (first, rest) = ms.split_first().ok_or(MatrixError::Arity("mtimes"))?;
    rest.iter()
        .try_fold(first.borrow().clone(), |acc, m| acc.mtimes(m.borrow()))
}

/// Vertical concatenation of the column-major vectorizations
pub fn veccat<T, M>(ms: &[M]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    let vs: Vec<Matrix<T>> = ms.iter().map(|m| m.borrow().vec()).collect();
    if vs.is_empty() {
        return Ok(Matrix::sparse(0, 1));
    }
    vertcat(&vs)
}

/// Dense column of all structural nonzeros, operand by operand
pub fn vecnzcat<T, M>(ms: &[M]) -> Matrix<T>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    let values: Vec<T> = ms
        .iter()
        .flat_map(|m| m.borrow().nonzeros().to_vec())
        .collect();
    Matrix::from_column(values)
}

/// Cross product of 3-vectors.
///
/// `dim` selects the axis of length 3: `Some(1)` takes every column as a
/// vector, `Some(2)` every row.  `None` picks the first axis of length 3.
pub fn cross<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    dim: Option<usize>,
) -> Result<Matrix<T>, MatrixError> {
    if a.size() != b.size() {
        return Err(MatrixError::Shape(format!(
            "cross of {} and {}",
            a.dim_string(),
            b.dim_string()
        )));
    }
    let dim = match dim {
        Some(d) => d,
        None if a.nrows() == 3 => 1,
        None => 2,
    };
    let length = match dim {
        1 => a.nrows(),
        2 => a.ncols(),
        _ => {
            return Err(MatrixError::Shape(format!("cross along dimension {}", dim)));
        }
    };
    if length != 3 {
        return Err(MatrixError::Shape(format!(
            "cross needs 3 elements along dimension {} of a {} matrix",
            dim,
            a.dim_string()
        )));
    }

    let part = |m: &Matrix<T>, i: isize| {
        if dim == 1 {
            m.get2(i, ..)
        } else {
            m.get2(.., i)
        }
    };
    let (a0, a1, a2) = (part(a, 0)?, part(a, 1)?, part(a, 2)?);
    let (b0, b1, b2) = (part(b, 0)?, part(b, 1)?, part(b, 2)?);
    let c0 = a1.times(&b2)?.minus(&a2.times(&b1)?)?;
    let c1 = a2.times(&b0)?.minus(&a0.times(&b2)?)?;
    let c2 = a0.times(&b1)?.minus(&a1.times(&b0)?)?;
    if dim == 1 {
        vertcat(&[c0, c1, c2])
    } else {
        horzcat(&[c0, c1, c2])
    }
}
