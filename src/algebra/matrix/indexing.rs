use crate::algebra::*;
use itertools::iproduct;
use std::sync::Arc;

// Positions picked out by an index expression.  Entries are stored in
// column-major order of the result as `(row, col, source)`, where `source`
// is a column-major position in the indexed matrix.
struct Selection {
    nrows: usize,
    ncols: usize,
    entries: Vec<(usize, usize, usize)>,
    // every entry is a nonzero of the result, even if its source is absent
    fixed_pattern: bool,
}

impl Selection {
    fn new(nrows: usize, ncols: usize, fixed_pattern: bool) -> Self {
        Self {
            nrows,
            ncols,
            entries: Vec::new(),
            fixed_pattern,
        }
    }
}

// index matrix entry on an axis of length `len`
fn resolve_entry(v: i64, len: usize) -> Result<usize, MatrixError> {
    resolve_int(v as isize, len).map_err(|_| {
        MatrixError::Shape(format!("index matrix entry {} outside dimension {}", v, len))
    })
}

impl<T> Matrix<T>
where
    T: Element,
{
    /// Single index selection `self[i]`.
    ///
    /// Integers, slices and lists address elements by their column-major
    /// position.  The result is a column vector, or a row vector when
    /// `self` is one.  An integer matrix `I` gives a result with the shape
    /// and pattern of `I`, with `I`'s entries taken as column-major
    /// positions.  A pattern mask of the same shape as `self` keeps the
    /// nonzeros of `self` it covers.
    pub fn get<I: Into<Index>>(&self, i: I) -> Result<Matrix<T>, MatrixError> {
        let sel = self.selection1(&i.into())?;
        Ok(self.gather(&sel))
    }

    /// Row and column selection `self[i, j]`.
    ///
    /// With two axis selectors the result is the Cartesian product of the
    /// selected rows and columns.  An integer matrix on one side picks
    /// positions along that axis and the result is one block per position
    /// selected on the other axis, concatenated horizontally for a row
    /// matrix and vertically for a column matrix.  Two integer matrices
    /// must have the same shape and pattern and are used pairwise.
    pub fn get2<I: Into<Index>, J: Into<Index>>(&self, i: I, j: J) -> Result<Matrix<T>, MatrixError> {
        let (i, j) = (i.into(), j.into());
        if i.is_axis() && j.is_axis() {
            let rows = i.resolve_axis(self.nrows())?;
            let cols = j.resolve_axis(self.ncols())?;
            return self.select(&rows, &cols);
        }
        let sel = self.selection2(&i, &j)?;
        Ok(self.gather(&sel))
    }

    /// Assignment `self[i] = v`, see [`get`](Matrix::get).
    ///
    /// `v` must have exactly the shape of the selection or be a scalar, a
    /// row vector is not accepted for a column selection.  Targets
    /// that are absent from the pattern are added unless the value written
    /// to them is structurally zero.  Where the same position is selected
    /// more than once the last write wins.
    pub fn set<I: Into<Index>, V: Into<Matrix<T>>>(&mut self, i: I, v: V) -> Result<(), MatrixError> {
        let sel = self.selection1(&i.into())?;
        self.scatter(&sel, &v.into())
    }

    /// Assignment `self[i, j] = v`, see [`get2`](Matrix::get2) and [`set`](Matrix::set).
    pub fn set2<I: Into<Index>, J: Into<Index>, V: Into<Matrix<T>>>(
        &mut self,
        i: I,
        j: J,
        v: V,
    ) -> Result<(), MatrixError> {
        let sel = self.selection2(&i.into(), &j.into())?;
        self.scatter(&sel, &v.into())
    }

    fn selection1(&self, idx: &Index) -> Result<Selection, MatrixError> {
        let (m, n) = self.size();
        match idx {
            Index::Mask(mask) => {
                if mask.size() != self.size() {
                    return Err(MatrixError::Shape(format!(
                        "mask {} on a {} matrix",
                        mask.dim_string(),
                        self.dim_string()
                    )));
                }
                let mut sel = Selection::new(m, n, false);
                for c in 0..n {
                    for &r in mask.rows_of_col(c) {
                        sel.entries.push((r, c, r + c * m));
                    }
                }
                Ok(sel)
            }
            Index::Matrix(I) => {
                let numel = self.numel();
                let sp = I.sparsity();
                let mut sel = Selection::new(I.nrows(), I.ncols(), true);
                for c in 0..I.ncols() {
                    for k in sp.col_range(c) {
                        let p = resolve_int(I.nonzeros()[k] as isize, numel)?;
                        sel.entries.push((sp.row()[k], c, p));
                    }
                }
                Ok(sel)
            }
            _ => {
                let pos = idx.resolve_axis(self.numel())?;
                let along_row = matches!(idx, Index::Int(_)) || (m == 1 && n != 1);
                let mut sel = if along_row {
                    Selection::new(1, pos.len(), false)
                } else {
                    Selection::new(pos.len(), 1, false)
                };
                sel.entries = pos
                    .into_iter()
                    .enumerate()
                    .map(|(t, p)| if along_row { (0, t, p) } else { (t, 0, p) })
                    .collect();
                Ok(sel)
            }
        }
    }

    fn selection2(&self, i: &Index, j: &Index) -> Result<Selection, MatrixError> {
        let (m, n) = self.size();
        match (i, j) {
            (Index::Mask(_), _) | (_, Index::Mask(_)) => Err(MatrixError::Shape(
                "a pattern mask must be the only index".to_string(),
            )),
            (Index::Matrix(I), Index::Matrix(J)) => {
                if I.sparsity() != J.sparsity() {
                    return Err(MatrixError::Shape(format!(
                        "index matrices {} and {} differ in shape or pattern",
                        I.sparsity(),
                        J.sparsity()
                    )));
                }
                let sp = I.sparsity();
                let mut sel = Selection::new(I.nrows(), I.ncols(), true);
                for c in 0..I.ncols() {
                    for k in sp.col_range(c) {
                        let r0 = resolve_entry(I.nonzeros()[k], m)?;
                        let c0 = resolve_entry(J.nonzeros()[k], n)?;
                        sel.entries.push((sp.row()[k], c, r0 + c0 * m));
                    }
                }
                Ok(sel)
            }
            (Index::Matrix(I), j) => {
                let cols = j.resolve_axis(n)?;
                let sp = I.sparsity();
                let rows: Vec<usize> = I
                    .nonzeros()
                    .iter()
                    .map(|&v| resolve_entry(v, m))
                    .collect::<Result<_, _>>()?;
                let mut sel = Selection::new(I.nrows(), I.ncols() * cols.len(), true);
                for (b, &cj) in cols.iter().enumerate() {
                    for c in 0..I.ncols() {
                        for k in sp.col_range(c) {
                            sel.entries
                                .push((sp.row()[k], b * I.ncols() + c, rows[k] + cj * m));
                        }
                    }
                }
                Ok(sel)
            }
            (i, Index::Matrix(J)) => {
                let rows = i.resolve_axis(m)?;
                let sp = J.sparsity();
                let cols: Vec<usize> = J
                    .nonzeros()
                    .iter()
                    .map(|&v| resolve_entry(v, n))
                    .collect::<Result<_, _>>()?;
                let mut sel = Selection::new(J.nrows() * rows.len(), J.ncols(), true);
                for c in 0..J.ncols() {
                    for (b, &ri) in rows.iter().enumerate() {
                        for k in sp.col_range(c) {
                            sel.entries
                                .push((b * J.nrows() + sp.row()[k], c, ri + cols[k] * m));
                        }
                    }
                }
                Ok(sel)
            }
            (i, j) => {
                let rows = i.resolve_axis(m)?;
                let cols = j.resolve_axis(n)?;
                let mut sel = Selection::new(rows.len(), cols.len(), false);
                sel.entries = iproduct!(cols.iter().enumerate(), rows.iter().enumerate())
                    .map(|((jj, &c), (ii, &r))| (ii, jj, r + c * m))
                    .collect();
                Ok(sel)
            }
        }
    }

    fn gather(&self, sel: &Selection) -> Matrix<T> {
        let mut colind = vec![0; sel.ncols + 1];
        let mut row = Vec::new();
        let mut nzval = Vec::new();
        for &(r, c, p) in &sel.entries {
            let v = match self.element_linear(p) {
                Some(v) => v.clone(),
                None if sel.fixed_pattern => T::zero(),
                None => continue,
            };
            row.push(r);
            nzval.push(v);
            colind[c + 1] += 1;
        }
        for c in 0..sel.ncols {
            colind[c + 1] += colind[c];
        }
        let sp = Sparsity::from_parts(sel.nrows, sel.ncols, colind, row);
        Matrix::from_parts(Arc::new(sp), nzval)
    }

    fn scatter(&mut self, sel: &Selection, v: &Matrix<T>) -> Result<(), MatrixError> {
        let same_shape = v.size() == (sel.nrows, sel.ncols);
        if !same_shape && !v.is_scalar() {
            return Err(MatrixError::Shape(format!(
                "cannot assign {} to a {}x{} selection",
                v.dim_string(),
                sel.nrows,
                sel.ncols
            )));
        }

        let writes: Vec<(usize, Option<T>)> = sel
            .entries
            .iter()
            .map(|&(r, c, p)| {
                let value = if same_shape { v.element(r, c) } else { v.element(0, 0) };
                (p, value.cloned())
            })
            .collect();

        let m = self.nrows();
        let (rows, cols): (Vec<usize>, Vec<usize>) = writes
            .iter()
            .filter(|(p, value)| value.is_some() && self.element_linear(*p).is_none())
            .map(|&(p, _)| (p % m, p / m))
            .unzip();
        if !rows.is_empty() {
            let extra = Sparsity::from_triplets(m, self.ncols(), &rows, &cols)?;
            self.widen_pattern(&extra)?;
        }

        for (p, value) in writes {
            if let Some(k) = self.sparsity().get_nz(p % m, p / m) {
                self.nonzeros_mut()[k] = value.unwrap_or_else(T::zero);
            }
        }
        Ok(())
    }
}
