//! Pluggable sparse direct solvers.
//!
//! A [`LinearSolver`] is created once for a fixed [`Sparsity`] and can then
//! be numerically factored for any number of value arrays on that pattern.
//! Backends are selected by name through
//! [`LinearSolverSettings::direct_solve_method`]:
//!
//! * `"lu"` : left-looking sparse LU with partial pivoting and an AMD
//!   column ordering.  Works for any structurally nonsingular matrix.
//! * `"ldl"` (alias `"qdldl"`) : $LDL^T$ factorization for symmetric
//!   quasidefinite matrices, see [`qdldl`](crate::qdldl).

use crate::algebra::{FloatT, Sparsity};
use crate::qdldl::QdldlError;
use enum_dispatch::*;
use std::sync::Arc;
use thiserror::Error;

mod config;
mod ldl;
mod lu;
mod settings;
pub use ldl::*;
pub use lu::*;
pub use settings::*;

/// Error type returned by the linear solver backends.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinearSolverError {
    #[error("Matrix dimension fields are incompatible")]
    IncompatibleDimension,
    #[error("Matrix values are not symmetric")]
    NotSymmetric,
    #[error("Matrix has a zero column")]
    EmptyColumn,
    #[error("Matrix factorization produced a zero pivot")]
    ZeroPivot,
    #[error("Invalid permutation vector")]
    InvalidPermutation,
    #[error("Fill reducing ordering failed")]
    Ordering,
    #[error("No numeric factorization available")]
    NotFactorized,
    #[error("Unrecognized linear solver type: \"{0}\"")]
    UnknownMethod(String),
}

impl From<QdldlError> for LinearSolverError {
    fn from(e: QdldlError) -> Self {
        match e {
            QdldlError::IncompatibleDimension => LinearSolverError::IncompatibleDimension,
            QdldlError::EmptyColumn => LinearSolverError::EmptyColumn,
            QdldlError::NotUpperTriangular => LinearSolverError::NotSymmetric,
            QdldlError::ZeroPivot => LinearSolverError::ZeroPivot,
            QdldlError::InvalidPermutation => LinearSolverError::InvalidPermutation,
            QdldlError::Ordering => LinearSolverError::Ordering,
            QdldlError::NotFactored => LinearSolverError::NotFactorized,
        }
    }
}

/// A sparse direct solver bound to one square sparsity pattern.
#[enum_dispatch]
pub trait LinearSolver<T>
where
    T: FloatT,
{
    /// The pattern the solver was created for
    fn sparsity(&self) -> &Arc<Sparsity>;

    /// Numeric factorization for `nzval`, the structural nonzeros of a
    /// matrix on [`sparsity`](LinearSolver::sparsity).
    fn factorize(&mut self, nzval: &[T]) -> Result<(), LinearSolverError>;

    /// Solves in place with the current factors (x replaces b).
    fn solve(&mut self, b: &mut [T]) -> Result<(), LinearSolverError>;

    /// Determinant of the currently factored matrix
    fn determinant(&self) -> Result<T, LinearSolverError>;
}

/// The built in [`LinearSolver`] implementations.
#[enum_dispatch(LinearSolver<T>)]
pub enum LinearSolverBackend<T: FloatT> {
    SparseLu(SparseLuSolver<T>),
    Ldl(LdlSolver<T>),
}
