#![allow(non_snake_case)]
use super::{LinearSolver, LinearSolverError, LinearSolverSettings};
use crate::algebra::*;
use crate::qdldl::amd_ordering;
use log::debug;
use std::sync::Arc;

const LU_UNKNOWN: usize = usize::MAX;

/// Left-looking sparse LU factorization `P A Q = L U` with threshold
/// partial pivoting.
///
/// The column ordering `Q` is fixed when the solver is created, from an
/// AMD ordering of the pattern of `A + A'`.  Row pivots are chosen
/// column by column during the numeric factorization, preferring the
/// entry that would keep the ordering symmetric whenever its magnitude is
/// within `pivot_tolerance` of the largest candidate.
#[derive(Debug)]
pub struct SparseLuSolver<T> {
    sparsity: Arc<Sparsity>,
    // column ordering
    q: Vec<usize>,
    pivot_tolerance: T,
    factors: Option<LuFactors<T>>,
    workspace: LuWorkspace<T>,
}

#[derive(Debug)]
struct LuFactors<T> {
    // unit lower triangular, diagonal first in every column
    L: CscMatrix<T>,
    // upper triangular, diagonal last in every column
    U: CscMatrix<T>,
    // row pivot of every original row
    pinv: Vec<usize>,
}

#[derive(Debug)]
struct LuWorkspace<T> {
    x: Vec<T>,
    xi: Vec<usize>,
    stack: Vec<usize>,
    pstack: Vec<usize>,
    marked: Vec<bool>,
}

impl<T> LuWorkspace<T>
where
    T: FloatT,
{
    fn new(n: usize) -> Self {
        Self {
            x: vec![T::zero(); n],
            xi: vec![0; n],
            stack: vec![0; n],
            pstack: vec![0; n],
            marked: vec![false; n],
        }
    }
}

impl<T> SparseLuSolver<T>
where
    T: FloatT,
{
    pub fn new(
        sparsity: Arc<Sparsity>,
        settings: &LinearSolverSettings<T>,
    ) -> Result<Self, LinearSolverError> {
        if !sparsity.is_square() {
            return Err(LinearSolverError::IncompatibleDimension);
        }
        let n = sparsity.ncols();

        let q = if settings.amd_ordering {
            let sym = sparsity
                .union(&sparsity.transpose())
                .map_err(|_| LinearSolverError::IncompatibleDimension)?;
            amd_ordering(&sym, settings.amd_dense_scale)?.0
        } else {
            (0..n).collect()
        };
        debug!("sparse LU for {} with {} nonzeros", sparsity, sparsity.nnz());

        Ok(Self {
            sparsity,
            q,
            pivot_tolerance: settings.pivot_tolerance,
            factors: None,
            workspace: LuWorkspace::new(n),
        })
    }

    /// fixed column ordering of the factorization
    pub fn column_ordering(&self) -> &[usize] {
        &self.q
    }

    /// number of nonzeros in the factors `L` and `U`
    pub fn factor_nnz(&self) -> Option<(usize, usize)> {
        self.factors.as_ref().map(|f| (f.L.nnz(), f.U.nnz()))
    }
}

impl<T> LinearSolver<T> for SparseLuSolver<T>
where
    T: FloatT,
{
    fn sparsity(&self) -> &Arc<Sparsity> {
        &self.sparsity
    }

    fn factorize(&mut self, nzval: &[T]) -> Result<(), LinearSolverError> {
        if nzval.len() != self.sparsity.nnz() {
            return Err(LinearSolverError::IncompatibleDimension);
        }
        self.factors = None;
        let factors = _lu(
            &self.sparsity,
            nzval,
            &self.q,
            self.pivot_tolerance,
            &mut self.workspace,
        )?;
        self.factors = Some(factors);
        Ok(())
    }

    fn solve(&mut self, b: &mut [T]) -> Result<(), LinearSolverError> {
        let f = self
            .factors
            .as_ref()
            .ok_or(LinearSolverError::NotFactorized)?;
        if b.len() != self.q.len() {
            return Err(LinearSolverError::IncompatibleDimension);
        }
        let x = &mut self.workspace.x;
        for (k, &p) in f.pinv.iter().enumerate() {
            x[p] = b[k];
        }
        _lsolve(&f.L, x);
        _usolve(&f.U, x);
        for (k, &qk) in self.q.iter().enumerate() {
            b[qk] = x[k];
        }
        Ok(())
    }

    fn determinant(&self) -> Result<T, LinearSolverError> {
        let f = self
            .factors
            .as_ref()
            .ok_or(LinearSolverError::NotFactorized)?;
        let n = self.q.len();
        let mut det = (0..n).fold(T::one(), |acc, k| acc * f.U.nzval[f.U.colptr[k + 1] - 1]);
        if permutation_is_odd(&f.pinv) != permutation_is_odd(&self.q) {
            det = -det;
        }
        Ok(det)
    }
}

// numeric factorization, column by column in the order q
fn _lu<T: FloatT>(
    A: &Sparsity,
    Ax: &[T],
    q: &[usize],
    tol: T,
    work: &mut LuWorkspace<T>,
) -> Result<LuFactors<T>, LinearSolverError> {
    let n = A.ncols();
    let mut L = CscMatrix::<T>::spalloc((n, n), 0);
    let mut U = CscMatrix::<T>::spalloc((n, n), 0);
    L.rowval.reserve(4 * A.nnz() + n);
    L.nzval.reserve(4 * A.nnz() + n);
    U.rowval.reserve(4 * A.nnz() + n);
    U.nzval.reserve(4 * A.nnz() + n);

    let mut pinv = vec![LU_UNKNOWN; n];
    work.x.fill(T::zero());

    for k in 0..n {
        L.colptr[k] = L.rowval.len();
        U.colptr[k] = U.rowval.len();
        let col = q[k];

        // x = L \ A(:,col), nonzero pattern in xi[top..n]
        let top = _spsolve(&L, A, Ax, col, &pinv, work);

        // split x into the column of U and the pivot candidates
        let mut ipiv = LU_UNKNOWN;
        let mut a = -T::one();
        for p in top..n {
            let i = work.xi[p];
            if pinv[i] == LU_UNKNOWN {
                let t = work.x[i].abs();
                if t > a {
                    a = t;
                    ipiv = i;
                }
            } else {
                U.rowval.push(pinv[i]);
                U.nzval.push(work.x[i]);
            }
        }
        if ipiv == LU_UNKNOWN || a <= T::zero() || !a.is_finite() {
            return Err(LinearSolverError::ZeroPivot);
        }
        if pinv[col] == LU_UNKNOWN && work.x[col].abs() >= a * tol {
            ipiv = col;
        }

        let pivot = work.x[ipiv];
        U.rowval.push(k);
        U.nzval.push(pivot);
        pinv[ipiv] = k;
        L.rowval.push(ipiv);
        L.nzval.push(T::one());
        for p in top..n {
            let i = work.xi[p];
            if pinv[i] == LU_UNKNOWN {
                L.rowval.push(i);
                L.nzval.push(work.x[i] / pivot);
            }
            work.x[i] = T::zero();
        }
    }
    L.colptr[n] = L.rowval.len();
    U.colptr[n] = U.rowval.len();

    // rows of L in pivot order
    for i in L.rowval.iter_mut() {
        *i = pinv[*i];
    }
    debug_assert!(L.check_format().is_ok() && U.check_format().is_ok());
    Ok(LuFactors { L, U, pinv })
}

// Solves L x = A(:,col) for the columns of L computed so far.  Rows
// that are not yet pivotal pass through unchanged.  Returns `top`, with
// the nonzero pattern of x in xi[top..n] in topological order.
fn _spsolve<T: FloatT>(
    L: &CscMatrix<T>,
    A: &Sparsity,
    Ax: &[T],
    col: usize,
    pinv: &[usize],
    work: &mut LuWorkspace<T>,
) -> usize {
    let n = A.nrows();
    let top = _reach(L, A, col, pinv, work);
    for p in top..n {
        work.x[work.xi[p]] = T::zero();
    }
    for p in A.colind()[col]..A.colind()[col + 1] {
        work.x[A.row()[p]] = Ax[p];
    }
    for px in top..n {
        let j = work.xi[px];
        let J = pinv[j];
        if J == LU_UNKNOWN {
            continue;
        }
        // skip the unit diagonal, stored first
        let xj = work.x[j];
        for p in (L.colptr[J] + 1)..L.colptr[J + 1] {
            work.x[L.rowval[p]] -= L.nzval[p] * xj;
        }
    }
    top
}

// Rows reachable from the nonzeros of A(:,col) through the graph of L
fn _reach<T: FloatT>(
    L: &CscMatrix<T>,
    A: &Sparsity,
    col: usize,
    pinv: &[usize],
    work: &mut LuWorkspace<T>,
) -> usize {
    let mut top = A.nrows();
    for p in A.colind()[col]..A.colind()[col + 1] {
        let i = A.row()[p];
        if !work.marked[i] {
            top = _dfs(i, L, top, pinv, work);
        }
    }
    for p in top..A.nrows() {
        work.marked[work.xi[p]] = false;
    }
    top
}

// Depth first search from row j, pushing finished rows onto xi[..top]
fn _dfs<T: FloatT>(
    j: usize,
    L: &CscMatrix<T>,
    mut top: usize,
    pinv: &[usize],
    work: &mut LuWorkspace<T>,
) -> usize {
    let mut head = 0;
    work.stack[0] = j;
    loop {
        let j = work.stack[head];
        let jnew = pinv[j];
        if !work.marked[j] {
            work.marked[j] = true;
            work.pstack[head] = if jnew == LU_UNKNOWN { 0 } else { L.colptr[jnew] };
        }
        let p2 = if jnew == LU_UNKNOWN { 0 } else { L.colptr[jnew + 1] };

        let mut done = true;
        for p in work.pstack[head]..p2 {
            let i = L.rowval[p];
            if work.marked[i] {
                continue;
            }
            work.pstack[head] = p;
            head += 1;
            work.stack[head] = i;
            done = false;
            break;
        }
        if done {
            top -= 1;
            work.xi[top] = j;
            if head == 0 {
                break;
            }
            head -= 1;
        }
    }
    top
}

// Solves L x = b for unit lower triangular L, diagonal first
fn _lsolve<T: FloatT>(L: &CscMatrix<T>, x: &mut [T]) {
    for j in 0..L.n {
        let xj = x[j];
        for p in (L.colptr[j] + 1)..L.colptr[j + 1] {
            x[L.rowval[p]] -= L.nzval[p] * xj;
        }
    }
}

// Solves U x = b for upper triangular U, diagonal last
fn _usolve<T: FloatT>(U: &CscMatrix<T>, x: &mut [T]) {
    for j in (0..U.n).rev() {
        let last = U.colptr[j + 1] - 1;
        x[j] /= U.nzval[last];
        let xj = x[j];
        for p in U.colptr[j]..last {
            x[U.rowval[p]] -= U.nzval[p] * xj;
        }
    }
}

// parity of a permutation by cycle decomposition
pub(crate) fn permutation_is_odd(p: &[usize]) -> bool {
    let mut seen = vec![false; p.len()];
    let mut transpositions = 0;
    for start in 0..p.len() {
        if seen[start] {
            continue;
        }
        let mut len = 0;
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            i = p[i];
            len += 1;
        }
        transpositions += len - 1;
    }
    transpositions % 2 == 1
}
