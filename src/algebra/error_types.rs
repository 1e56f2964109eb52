use crate::linsol::{LinearSolverError, SettingsError};
use thiserror::Error;

/// Error type returned by sparsity pattern construction and checking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SparseFormatError {
    /// Dimension fields and/or array lengths are incompatible
    #[error("Pattern dimension fields and/or array lengths are incompatible")]
    IncompatibleDimension,
    /// Row indices are not strictly increasing within a column
    #[error("Row indices are unsorted or duplicated within a column")]
    BadRowOrdering,
    /// Row value exceeds the row dimension
    #[error("Row value exceeds the pattern row dimension")]
    BadRowval,
    /// Column offsets do not start at zero or are not monotonic
    #[error("Bad column pointer values")]
    BadColptr,
}

/// Error type returned by matrix and pattern operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    /// Operand dimensions or arity of a shaped argument do not agree
    #[error("Shape mismatch: {0}")]
    Shape(String),
    /// An integer, slice or list index resolves outside its range
    #[error("Index out of range: {0}")]
    Index(String),
    /// A sparsity pattern is malformed
    #[error("Malformed sparsity pattern: {0}")]
    Structural(#[from] SparseFormatError),
    /// Linear system is structurally or numerically singular
    #[error("Matrix is singular")]
    SingularMatrix,
    /// Truth value requested for a matrix that does not have exactly one element
    #[error("Truth value of a matrix with {0} elements is ambiguous")]
    AmbiguousTruth(usize),
    /// An operation that needs at least one operand got none
    #[error("{0} requires at least one operand")]
    Arity(&'static str),
    /// A reduction was requested over a matrix with no elements
    #[error("{0} of a matrix with no elements")]
    Emptiness(&'static str),
    /// Failure inside a linear solver backend
    #[error("Linear solver failure: {0}")]
    LinearSolver(LinearSolverError),
    /// Invalid linear solver settings
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

impl From<LinearSolverError> for MatrixError {
    fn from(e: LinearSolverError) -> Self {
        match e {
            LinearSolverError::ZeroPivot => MatrixError::SingularMatrix,
            _ => MatrixError::LinearSolver(e),
        }
    }
}
