#![allow(non_snake_case)]
use super::{LinearSolver, LinearSolverError, LinearSolverSettings};
use crate::algebra::*;
use crate::qdldl::*;
use log::debug;
use std::sync::Arc;

/// $LDL^T$ solver for symmetric quasidefinite matrices.
///
/// The full symmetric pattern is supplied.  Only its upper triangle is
/// handed to [`LdlFactors`], whose symbolic phase runs once at
/// construction.  Every numeric factorization then reuses that structure.
pub struct LdlSolver<T> {
    sparsity: Arc<Sparsity>,
    // nonzero holding the transposed position of every nonzero
    transpose_map: Vec<usize>,
    // nonzeros on or above the diagonal, in triangle storage order
    triu_source: Vec<usize>,
    triu_values: Vec<T>,
    factors: LdlFactors<T>,
}

impl<T> LdlSolver<T>
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
        let (spT, transpose_map) = sparsity.transpose_with_mapping();
        if spT != *sparsity {
            return Err(LinearSolverError::NotSymmetric);
        }

        let (triu, triu_source) = sparsity.filter_with_mapping(|r, c| r <= c);
        let opts = QdldlSettings {
            amd_dense_scale: settings.amd_dense_scale,
            perm: (!settings.amd_ordering).then(|| (0..sparsity.ncols()).collect()),
        };
        let factors = LdlFactors::<T>::symbolic(&triu, &opts)?;

        debug!(
            "LDL for {} with {} nonzeros in L",
            sparsity,
            factors.L.nnz()
        );

        Ok(Self {
            sparsity,
            transpose_map,
            triu_values: vec![T::zero(); triu_source.len()],
            triu_source,
            factors,
        })
    }
}

impl<T> LinearSolver<T> for LdlSolver<T>
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
        if self
            .transpose_map
            .iter()
            .enumerate()
            .any(|(k, &kt)| nzval[k] != nzval[kt])
        {
            return Err(LinearSolverError::NotSymmetric);
        }

        for (v, &k) in self.triu_values.iter_mut().zip(&self.triu_source) {
            *v = nzval[k];
        }
        Ok(self.factors.factor(&self.triu_values)?)
    }

    fn solve(&mut self, b: &mut [T]) -> Result<(), LinearSolverError> {
        Ok(self.factors.solve(b)?)
    }

    fn determinant(&self) -> Result<T, LinearSolverError> {
        Ok(self.factors.determinant()?)
    }
}
