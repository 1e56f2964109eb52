use super::Assembly;
use crate::algebra::{MatrixError, MatrixShape, ShapedMatrix, Sparsity};

/// Origin of a nonzero in an elementwise combination: the nonzero of the
/// left and of the right operand at that position, if any.
pub type CombineMap = Vec<(Option<usize>, Option<usize>)>;

/// Origin of a nonzero in a block assembly: `(operand, nonzero)`.
pub type BlockMap = Vec<(usize, usize)>;

impl Sparsity {
    pub fn transpose(&self) -> Sparsity {
        self.transpose_with_mapping().0
    }

    /// Transpose, also returning for every nonzero of the result the
    /// nonzero of `self` it came from.
    pub fn transpose_with_mapping(&self) -> (Sparsity, Vec<usize>) {
        let mut A = Assembly::spalloc((self.ncols(), self.nrows()), self.nnz());
        A.colcount_block(self, 0, MatrixShape::T);
        A.colcount_to_colptr();
        A.fill_block(self, 0, 0, 0, MatrixShape::T);
        A.backshift_colptrs();
        let (sp, source) = A.finish();
        (sp, source.into_iter().map(|(_, k)| k).collect())
    }

    /// Positions present in either pattern
    pub fn union(&self, other: &Sparsity) -> Result<Sparsity, MatrixError> {
        self.pattern_combine(other, false, false)
    }

    /// Positions present in both patterns
    pub fn intersection(&self, other: &Sparsity) -> Result<Sparsity, MatrixError> {
        self.pattern_combine(other, true, true)
    }

    /// Pattern of an elementwise `f(x, y)` between same-shape operands.
    ///
    /// A position present in both operands is always kept.  A position
    /// present only in `self` is kept unless `fx0_is_zero`, one present
    /// only in `other` is kept unless `f0x_is_zero`.
    pub fn pattern_combine(
        &self,
        other: &Sparsity,
        f0x_is_zero: bool,
        fx0_is_zero: bool,
    ) -> Result<Sparsity, MatrixError> {
        Ok(self
            .combine_with_mapping(other, f0x_is_zero, fx0_is_zero)?
            .0)
    }

    /// As [`pattern_combine`](Sparsity::pattern_combine), also returning
    /// the operand nonzeros behind every result nonzero.
    pub fn combine_with_mapping(
        &self,
        other: &Sparsity,
        f0x_is_zero: bool,
        fx0_is_zero: bool,
    ) -> Result<(Sparsity, CombineMap), MatrixError> {
        if self.size() != other.size() {
            return Err(MatrixError::Shape(format!(
                "elementwise operation between {} and {}",
                self.dim_string(),
                other.dim_string()
            )));
        }

        let mut colind = Vec::with_capacity(self.ncols() + 1);
        let mut row = Vec::new();
        let mut mapping = Vec::new();
        colind.push(0);
        for c in 0..self.ncols() {
            let (mut kx, ex) = (self.colind()[c], self.colind()[c + 1]);
            let (mut ky, ey) = (other.colind()[c], other.colind()[c + 1]);
            while kx < ex || ky < ey {
                let rx = if kx < ex { self.row()[kx] } else { usize::MAX };
                let ry = if ky < ey { other.row()[ky] } else { usize::MAX };
                if rx == ry {
                    row.push(rx);
                    mapping.push((Some(kx), Some(ky)));
                    kx += 1;
                    ky += 1;
                } else if rx < ry {
                    if !fx0_is_zero {
                        row.push(rx);
                        mapping.push((Some(kx), None));
                    }
                    kx += 1;
                } else {
                    if !f0x_is_zero {
                        row.push(ry);
                        mapping.push((None, Some(ky)));
                    }
                    ky += 1;
                }
            }
            colind.push(row.len());
        }
        Ok((
            Sparsity::from_parts(self.nrows(), self.ncols(), colind, row),
            mapping,
        ))
    }

    /// Complement: every position that is not a nonzero of `self`
    pub fn pattern_inverse(&self) -> Sparsity {
        let mut present = vec![usize::MAX; self.nrows()];
        let mut colind = Vec::with_capacity(self.ncols() + 1);
        let mut row = Vec::with_capacity(self.numel() - self.nnz());
        colind.push(0);
        for c in 0..self.ncols() {
            self.rows_of_col(c).iter().for_each(|&r| present[r] = c);
            row.extend((0..self.nrows()).filter(|&r| present[r] != c));
            colind.push(row.len());
        }
        Sparsity::from_parts(self.nrows(), self.ncols(), colind, row)
    }

    /// Pattern of the matrix product `self * other`
    pub fn pattern_product(&self, other: &Sparsity) -> Result<Sparsity, MatrixError> {
        if self.ncols() != other.nrows() {
            return Err(MatrixError::Shape(format!(
                "product of {} and {}",
                self.dim_string(),
                other.dim_string()
            )));
        }
        let mut mark = vec![usize::MAX; self.nrows()];
        let mut colind = Vec::with_capacity(other.ncols() + 1);
        let mut row = Vec::new();
        colind.push(0);
        for j in 0..other.ncols() {
            let start = row.len();
            for &k in other.rows_of_col(j) {
                for &i in self.rows_of_col(k) {
                    if mark[i] != j {
                        mark[i] = j;
                        row.push(i);
                    }
                }
            }
            row[start..].sort_unstable();
            colind.push(row.len());
        }
        Ok(Sparsity::from_parts(
            self.nrows(),
            other.ncols(),
            colind,
            row,
        ))
    }

    /// Horizontal concatenation of patterns
    pub fn horzcat(sps: &[&Sparsity]) -> Result<Sparsity, MatrixError> {
        Ok(Self::horzcat_with_mapping(sps)?.0)
    }

    /// Vertical concatenation of patterns
    pub fn vertcat(sps: &[&Sparsity]) -> Result<Sparsity, MatrixError> {
        Ok(Self::vertcat_with_mapping(sps)?.0)
    }

    /// Block diagonal composition of patterns
    pub fn blkdiag(sps: &[&Sparsity]) -> Result<Sparsity, MatrixError> {
        Ok(Self::blkdiag_with_mapping(sps)?.0)
    }

    /// Pattern of the Kronecker product
    pub fn kron(a: &Sparsity, b: &Sparsity) -> Sparsity {
        Self::kron_with_mapping(a, b).0
    }

    pub fn horzcat_with_mapping(sps: &[&Sparsity]) -> Result<(Sparsity, BlockMap), MatrixError> {
        let dims: Vec<_> = sps.iter().map(|sp| sp.size()).collect();
        let used = concat_operands(&dims, true)?;

        let m = sps[used[0]].nrows();
        let n = used.iter().map(|&b| sps[b].ncols()).sum();
        let nnz = used.iter().map(|&b| sps[b].nnz()).sum();
        let mut A = Assembly::spalloc((m, n), nnz);

        let mut nextcol = 0;
        for &b in &used {
            A.colcount_block(sps[b], nextcol, MatrixShape::N);
            nextcol += sps[b].ncols();
        }
        A.colcount_to_colptr();

        let mut nextcol = 0;
        for &b in &used {
            A.fill_block(sps[b], b, 0, nextcol, MatrixShape::N);
            nextcol += sps[b].ncols();
        }
        A.backshift_colptrs();
        Ok(A.finish())
    }

    pub fn vertcat_with_mapping(sps: &[&Sparsity]) -> Result<(Sparsity, BlockMap), MatrixError> {
        let dims: Vec<_> = sps.iter().map(|sp| sp.size()).collect();
        let used = concat_operands(&dims, false)?;

        let m = used.iter().map(|&b| sps[b].nrows()).sum();
        let n = sps[used[0]].ncols();
        let nnz = used.iter().map(|&b| sps[b].nnz()).sum();
        let mut A = Assembly::spalloc((m, n), nnz);

        for &b in &used {
            A.colcount_block(sps[b], 0, MatrixShape::N);
        }
        A.colcount_to_colptr();

        let mut nextrow = 0;
        for &b in &used {
            A.fill_block(sps[b], b, nextrow, 0, MatrixShape::N);
            nextrow += sps[b].nrows();
        }
        A.backshift_colptrs();
        Ok(A.finish())
    }

    pub fn blkdiag_with_mapping(sps: &[&Sparsity]) -> Result<(Sparsity, BlockMap), MatrixError> {
        if sps.is_empty() {
            return Err(MatrixError::Arity("blkdiag"));
        }
        let m = sps.iter().map(|sp| sp.nrows()).sum();
        let n = sps.iter().map(|sp| sp.ncols()).sum();
        let nnz = sps.iter().map(|sp| sp.nnz()).sum();
        let mut A = Assembly::spalloc((m, n), nnz);

        let mut nextcol = 0;
        for sp in sps {
            A.colcount_block(sp, nextcol, MatrixShape::N);
            nextcol += sp.ncols();
        }
        A.colcount_to_colptr();

        let (mut nextrow, mut nextcol) = (0, 0);
        for (b, sp) in sps.iter().enumerate() {
            A.fill_block(sp, b, nextrow, nextcol, MatrixShape::N);
            nextrow += sp.nrows();
            nextcol += sp.ncols();
        }
        A.backshift_colptrs();
        Ok(A.finish())
    }

    /// Kronecker product pattern.  Every result nonzero is tagged with
    /// the nonzero of `a` and the nonzero of `b` that produce it.
    pub fn kron_with_mapping(a: &Sparsity, b: &Sparsity) -> (Sparsity, BlockMap) {
        let (rb, cb) = b.size();
        let mut A = Assembly::spalloc((a.nrows() * rb, a.ncols() * cb), a.nnz() * b.nnz());

        for ja in 0..a.ncols() {
            for _ in a.col_range(ja) {
                A.colcount_block(b, ja * cb, MatrixShape::N);
            }
        }
        A.colcount_to_colptr();

        // block rows of a column of `a` are filled top to bottom,
        // which keeps the rows sorted within each output column
        for ja in 0..a.ncols() {
            for ka in a.col_range(ja) {
                A.fill_block(b, ka, a.row()[ka] * rb, ja * cb, MatrixShape::N);
            }
        }
        A.backshift_colptrs();
        A.finish()
    }
}

// Picks the operands of a concatenation.  The extent that must agree
// (rows for horizontal, columns for vertical) is taken from the first
// operand that has any elements.  Element-free operands that disagree
// with it are skipped, others are an error.
fn concat_operands(dims: &[(usize, usize)], horizontal: bool) -> Result<Vec<usize>, MatrixError> {
    let what = if horizontal { "horzcat" } else { "vertcat" };
    if dims.is_empty() {
        return Err(MatrixError::Arity(what));
    }
    let fixed = |d: &(usize, usize)| if horizontal { d.0 } else { d.1 };
    let reference = dims
        .iter()
        .find(|d| d.0 * d.1 > 0)
        .map_or(fixed(&dims[0]), fixed);

    let mut used = Vec::with_capacity(dims.len());
    for (b, d) in dims.iter().enumerate() {
        if fixed(d) == reference {
            used.push(b);
        } else if d.0 * d.1 > 0 {
            return Err(MatrixError::Shape(format!(
                "{}: operand {} is {}x{}, expected {} {}",
                what,
                b,
                d.0,
                d.1,
                reference,
                if horizontal { "rows" } else { "columns" }
            )));
        }
    }
    Ok(used)
}
