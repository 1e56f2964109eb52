//! The generic sparse [`Matrix`] container.
//!
//! A matrix pairs a shared, immutable [`Sparsity`](crate::algebra::Sparsity)
//! pattern with its own array of structural nonzero values.  Operations
//! return new matrices.  The only in-place operations are assignment
//! through an index and the explicit structural edits (`make_sparse`,
//! `make_dense`, `resize`, `append` and `remove_rows_cols`).

mod core;
pub use self::core::*;
mod display;
mod elementwise;
mod indexing;
mod matrix_math;
pub use self::matrix_math::{cross, mtimes_all, veccat, vecnzcat};
mod symmetric;
