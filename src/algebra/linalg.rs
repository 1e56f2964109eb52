use crate::algebra::*;
use crate::linsol::*;
use log::{debug, warn};
use std::sync::Arc;

/// Structural rank: the largest number of nonzeros that can be chosen
/// with no two in the same row or column.
pub fn sprank<T: Element>(a: &Matrix<T>) -> usize {
    a.sparsity().sprank()
}

fn check_square<T: Element>(a: &Matrix<T>, what: &str) -> Result<(), MatrixError> {
    if !a.is_square() {
        return Err(MatrixError::Shape(format!(
            "{} of a non-square {} matrix",
            what,
            a.dim_string()
        )));
    }
    Ok(())
}

// largest remaining dimension expanded term by term
const COFACTOR_MAX_DIM: usize = 4;

/// Determinant of a square matrix of any [`Element`], exact for integers.
///
/// A structurally singular matrix is zero without further work.  Rows and
/// columns holding a single nonzero are eliminated first, which reduces
/// triangular and permuted diagonal matrices of any size in linear steps.
/// What remains is expanded along its sparsest row or column when it is
/// at most 4 x 4, and otherwise handed to [`Element::dense_det`]
/// (fraction free elimination, or partial pivoting for floats).  See
/// [`lu_det`] for a fully sparse numeric alternative.
pub fn det<T: Element>(a: &Matrix<T>) -> Result<T, MatrixError> {
    check_square(a, "det")?;
    let n = a.nrows();
    if n == 0 {
        return Ok(T::one());
    }
    if a.sparsity().sprank() < n {
        return Ok(T::zero());
    }
    expand_det(a.clone())
}

fn expand_det<T: Element>(mut a: Matrix<T>) -> Result<T, MatrixError> {
    let mut scale = T::one();
    loop {
        let n = a.nrows();
        match n {
            0 => return Ok(scale),
            1 => return Ok(scale * a.value_at(0, 0)),
            2 => {
                let d = a.value_at(0, 0) * a.value_at(1, 1) - a.value_at(0, 1) * a.value_at(1, 0);
                return Ok(scale * d);
            }
            _ => {}
        }

        let line = sparsest_line(&a);
        match line.len() {
            0 => return Ok(T::zero()),
            1 => {
                let (r, c, v) = line[0].clone();
                a.remove_rows_cols(&[r], &[c])?;
                scale = with_sign(scale * v, r + c);
            }
            _ if n > COFACTOR_MAX_DIM => {
                debug!(
                    "det: dense elimination of a {} block with {} nonzeros",
                    a.dim_string(),
                    a.nnz()
                );
                return Ok(scale * T::dense_det(a.to_rows()));
            }
            _ => {
                let mut det = T::zero();
                for (r, c, v) in line {
                    let mut minor = a.clone();
                    minor.remove_rows_cols(&[r], &[c])?;
                    det = det + with_sign(v * expand_det(minor)?, r + c);
                }
                return Ok(scale * det);
            }
        }
    }
}

// (row, col, value) of every entry of the row or column with the fewest
// nonzeros, the column on ties
fn sparsest_line<T: Element>(a: &Matrix<T>) -> Vec<(usize, usize, T)> {
    let sp = a.sparsity();
    let n = a.nrows();
    let mut rowcount = vec![0; n];
    sp.row().iter().for_each(|&r| rowcount[r] += 1);
    let col = (0..n).min_by_key(|&c| sp.col_range(c).len());
    let row = (0..n).min_by_key(|&r| rowcount[r]);
    match (col, row) {
        (Some(c), Some(r)) if sp.col_range(c).len() <= rowcount[r] => sp
            .col_range(c)
            .map(|k| (sp.row()[k], c, a.nonzeros()[k].clone()))
            .collect(),
        (_, Some(r)) => (0..n)
            .filter_map(|c| a.element(r, c).map(|v| (r, c, v.clone())))
            .collect(),
        _ => Vec::new(),
    }
}

fn with_sign<T: Element>(v: T, parity: usize) -> T {
    if parity % 2 == 0 {
        v
    } else {
        -v
    }
}

/// Determinant from a sparse LU factorization.  A zero pivot gives zero.
pub fn lu_det<T: FloatT>(a: &Matrix<T>) -> Result<T, MatrixError> {
    check_square(a, "lu_det")?;
    if a.nrows() == 0 {
        return Ok(T::one());
    }
    let mut lu = SparseLuSolver::new(a.sparsity_arc(), &LinearSolverSettings::default())?;
    match lu.factorize(a.nonzeros()) {
        Ok(()) => Ok(lu.determinant()?),
        Err(LinearSolverError::ZeroPivot) => {
            warn!("lu_det: zero pivot in {}, determinant is zero", a.sparsity());
            Ok(T::zero())
        }
        Err(e) => Err(e.into()),
    }
}

/// Solves `A X = B` with the backend named by `method`
/// (`"lu"`, `"ldl"` or `"qdldl"`), see [`solve_with`].
pub fn solve<T: FloatT>(a: &Matrix<T>, b: &Matrix<T>, method: &str) -> Result<Matrix<T>, MatrixError> {
    let settings = LinearSolverSettings::<T> {
        direct_solve_method: method.to_string(),
        ..LinearSolverSettings::default()
    };
    settings.validate()?;
    solve_with(a, b, &settings)
}

/// Solves `A X = B` for square `A`.
///
/// The pattern of `X` is structural: `X[i, j]` is present whenever `x_i`
/// can depend on a nonzero of column `j` of `B` through the pattern of
/// `A`.  A structurally singular `A` is an error before any numeric work
/// starts, and a numerically singular one when factorizing.
pub fn solve_with<T: FloatT>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    settings: &LinearSolverSettings<T>,
) -> Result<Matrix<T>, MatrixError> {
    check_solve_shapes(a, b)?;
    if a.nrows() == 0 {
        return Ok(Matrix::sparse(0, b.ncols()));
    }
    // structural singularity is reported before factoring
    if a.sparsity().sprank() < a.nrows() {
        return Err(MatrixError::SingularMatrix);
    }
    let mut solver = LinearSolverBackend::new(a.sparsity_arc(), settings)?;
    debug!(
        "solve: {} with {} right hand sides, {} backend",
        a.sparsity(),
        b.ncols(),
        solver.name()
    );
    solve_using(a, b, &mut solver)
}

/// Solves `A X = B` with a caller supplied solver created for the pattern
/// of `A`.  The solver is refactored with the values of `A`.
pub fn solve_using<T, S>(a: &Matrix<T>, b: &Matrix<T>, solver: &mut S) -> Result<Matrix<T>, MatrixError>
where
    T: FloatT,
    S: LinearSolver<T>,
{
    check_solve_shapes(a, b)?;
    if **solver.sparsity() != *a.sparsity() {
        return Err(MatrixError::Shape(format!(
            "solver built for {}, matrix is {}",
            solver.sparsity(),
            a.sparsity()
        )));
    }
    let n = a.nrows();
    if n == 0 {
        return Ok(Matrix::sparse(0, b.ncols()));
    }
    let matching = a.sparsity().maximum_matching();
    let sp = a.sparsity().solve_pattern(b.sparsity(), &matching)?;

    solver.factorize(a.nonzeros())?;

    let mut work = vec![T::zero(); n];
    let mut nzval = Vec::with_capacity(sp.nnz());
    for j in 0..b.ncols() {
        if sp.col_range(j).is_empty() {
            continue;
        }
        work.iter_mut().for_each(|x| *x = T::zero());
        for k in b.sparsity().col_range(j) {
            work[b.sparsity().row()[k]] = b.nonzeros()[k];
        }
        solver.solve(&mut work)?;
        nzval.extend(sp.rows_of_col(j).iter().map(|&i| work[i]));
    }
    Ok(Matrix::from_parts(Arc::new(sp), nzval))
}

fn check_solve_shapes<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<(), MatrixError> {
    check_square(a, "solve")?;
    if b.nrows() != a.nrows() {
        return Err(MatrixError::Shape(format!(
            "solve with {} and right hand side {}",
            a.dim_string(),
            b.dim_string()
        )));
    }
    Ok(())
}

/// Inverse of a square matrix via [`solve`] with the identity
pub fn inv<T: FloatT>(a: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
    check_square(a, "inv")?;
    solve(a, &Matrix::eye(a.nrows()), "lu")
}
