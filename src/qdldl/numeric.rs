#![allow(non_snake_case)]
use super::symbolic::{amd_ordering, Symbolic};
use crate::algebra::*;
use derive_builder::Builder;
use itertools::izip;
use log::trace;
use thiserror::Error;

/// Errors from [`LdlFactors`] operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QdldlError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix is not upper triangular")]
    NotUpperTriangular,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Fill reducing ordering failed")]
    Ordering,
    #[error("No numeric factorization has been computed")]
    NotFactored,
}

/// Ordering options for [`LdlFactors::symbolic`]
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct QdldlSettings {
    /// scaling of the AMD dense row threshold
    #[builder(default = "1.5")]
    pub amd_dense_scale: f64,
    /// explicit ordering, AMD is used when absent
    #[builder(default = "None", setter(strip_option))]
    pub perm: Option<Vec<usize>>,
}

impl Default for QdldlSettings {
    fn default() -> Self {
        Self {
            amd_dense_scale: 1.5,
            perm: None,
        }
    }
}

/// $P A P^T = L D L^T$ for a symmetric quasidefinite `A`, with $L$ unit
/// lower triangular (the unit diagonal is not stored) and $D$ diagonal.
#[derive(Debug, Clone)]
pub struct LdlFactors<T = f64> {
    symbolic: Symbolic,
    /// strictly lower triangular part of the factor, in permuted order
    pub L: CscMatrix<T>,
    /// diagonal of the factor
    pub D: Vec<T>,
    dinv: Vec<T>,
    // values of the permuted triangle
    values: Vec<T>,
    work: LdlWork<T>,
    is_factored: bool,
}

#[derive(Debug, Clone)]
struct LdlWork<T> {
    y: Vec<T>,
    marked: Vec<bool>,
    reach: Vec<usize>,
    path: Vec<usize>,
    next: Vec<usize>,
}

impl<T: FloatT> LdlWork<T> {
    fn new(n: usize) -> Self {
        Self {
            y: vec![T::zero(); n],
            marked: vec![false; n],
            reach: Vec::with_capacity(n),
            path: Vec::with_capacity(n),
            next: vec![0; n],
        }
    }
}

impl<T> LdlFactors<T>
where
    T: FloatT,
{
    /// Orders the upper triangular pattern `triu` and fixes the structure
    /// of the factor.  No values are needed.
    pub fn symbolic(triu: &Sparsity, settings: &QdldlSettings) -> Result<Self, QdldlError> {
        check_structure(triu)?;
        let n = triu.ncols();

        let perm = match &settings.perm {
            Some(p) => p.clone(),
            None => amd_ordering(triu, settings.amd_dense_scale)?.0,
        };
        let symbolic = Symbolic::new(triu, perm)?;

        let lnz = symbolic.lnz();
        let L = CscMatrix::new(
            n,
            n,
            symbolic.lcolptr.clone(),
            vec![0; lnz],
            vec![T::zero(); lnz],
        );
        let mut factors = Self {
            values: vec![T::zero(); symbolic.pattern.nnz()],
            symbolic,
            L,
            D: vec![T::zero(); n],
            dinv: vec![T::zero(); n],
            work: LdlWork::new(n),
            is_factored: false,
        };
        // the row indices of L do not depend on the values
        factors.eliminate(false)?;
        debug_assert!(factors.L.check_format().is_ok() && factors.L.has_sorted_rows());
        trace!("ldl symbolic: n = {}, nnz(L) = {}", n, lnz);
        Ok(factors)
    }

    /// Symbolic and numeric factorization in one call.  `values` are given
    /// in the storage order of `triu`.
    pub fn new(
        triu: &Sparsity,
        values: &[T],
        settings: Option<QdldlSettings>,
    ) -> Result<Self, QdldlError> {
        let mut factors = Self::symbolic(triu, &settings.unwrap_or_default())?;
        factors.factor(values)?;
        Ok(factors)
    }

    /// Numeric factorization for new `values` of the pattern passed to
    /// [`symbolic`](LdlFactors::symbolic), in its storage order.
    pub fn factor(&mut self, values: &[T]) -> Result<(), QdldlError> {
        if values.len() != self.values.len() {
            return Err(QdldlError::IncompatibleDimension);
        }
        for (&v, &k) in values.iter().zip(&self.symbolic.source_map) {
            self.values[k] = v;
        }
        self.is_factored = false;
        self.eliminate(true)?;
        self.is_factored = true;
        Ok(())
    }

    /// fill reducing ordering in use
    pub fn perm(&self) -> &[usize] {
        &self.symbolic.perm
    }

    pub fn is_factored(&self) -> bool {
        self.is_factored
    }

    /// Solves `A x = b` in place.
    pub fn solve(&mut self, b: &mut [T]) -> Result<(), QdldlError> {
        if !self.is_factored {
            return Err(QdldlError::NotFactored);
        }
        if b.len() != self.D.len() {
            return Err(QdldlError::IncompatibleDimension);
        }
        let perm = &self.symbolic.perm;
        let x = &mut self.work.y;
        for (xi, &p) in x.iter_mut().zip(perm) {
            *xi = b[p];
        }

        let L = &self.L;
        // (L + I) z = x
        for j in 0..x.len() {
            let xj = x[j];
            for p in L.colptr[j]..L.colptr[j + 1] {
                x[L.rowval[p]] -= L.nzval[p] * xj;
            }
        }
        izip!(x.iter_mut(), &self.dinv).for_each(|(xi, &d)| *xi *= d);
        // (L + I)ᵀ x = z
        for j in (0..x.len()).rev() {
            let s = (L.colptr[j]..L.colptr[j + 1])
                .fold(T::zero(), |s, p| s + L.nzval[p] * x[L.rowval[p]]);
            x[j] -= s;
        }

        for (&xi, &p) in x.iter().zip(perm) {
            b[p] = xi;
        }
        x.fill(T::zero());
        Ok(())
    }

    /// number of positive entries in D
    pub fn positive_inertia(&self) -> usize {
        self.D.iter().filter(|&&d| d > T::zero()).count()
    }

    /// Determinant of `A`, the product of D.  A symmetric permutation
    /// leaves it unchanged.
    pub fn determinant(&self) -> Result<T, QdldlError> {
        if !self.is_factored {
            return Err(QdldlError::NotFactored);
        }
        Ok(self.D.iter().fold(T::one(), |acc, &d| acc * d))
    }

    // Row by row up-looking elimination.  Row k of L solves a triangular
    // system whose nonzeros are the nodes reachable in the elimination
    // tree from the entries above the diagonal in column k.  With
    // `numeric` false only the row indices of L are written.
    fn eliminate(&mut self, numeric: bool) -> Result<(), QdldlError> {
        let Self {
            symbolic,
            L,
            D,
            dinv,
            values,
            work,
            ..
        } = self;
        let n = symbolic.n();
        let pattern = &symbolic.pattern;
        let parent = &symbolic.parent;
        let LdlWork {
            y,
            marked,
            reach,
            path,
            next,
        } = work;

        next.copy_from_slice(&L.colptr[..n]);

        for k in 0..n {
            let mut dk = T::zero();
            reach.clear();

            for p in pattern.col_range(k) {
                let i = pattern.row()[p];
                if i == k {
                    dk = values[p];
                    continue;
                }
                y[i] = values[p];

                path.clear();
                let mut node = Some(i);
                while let Some(j) = node {
                    if j >= k || marked[j] {
                        break;
                    }
                    marked[j] = true;
                    path.push(j);
                    node = parent[j];
                }
                reach.extend(path.drain(..).rev());
            }

            // descendants before ancestors
            for &j in reach.iter().rev() {
                let slot = next[j];
                if numeric {
                    let yj = y[j];
                    for q in L.colptr[j]..slot {
                        y[L.rowval[q]] -= L.nzval[q] * yj;
                    }
                    let lkj = yj * dinv[j];
                    L.nzval[slot] = lkj;
                    dk -= yj * lkj;
                }
                L.rowval[slot] = k;
                next[j] += 1;
                y[j] = T::zero();
                marked[j] = false;
            }

            if numeric {
                if dk == T::zero() {
                    return Err(QdldlError::ZeroPivot);
                }
                D[k] = dk;
                dinv[k] = T::recip(dk);
            }
        }
        Ok(())
    }
}

fn check_structure(triu: &Sparsity) -> Result<(), QdldlError> {
    if !triu.is_square() {
        return Err(QdldlError::IncompatibleDimension);
    }
    if !triu.is_triu() {
        return Err(QdldlError::NotUpperTriangular);
    }
    if triu.colind().windows(2).any(|c| c[0] == c[1]) {
        return Err(QdldlError::EmptyColumn);
    }
    Ok(())
}
