//! __spmatrix__ is a sparse matrix value engine.
//!
//! Every [`Matrix`](crate::algebra::Matrix) carries an explicit, immutable and
//! shareable [`Sparsity`](crate::algebra::Sparsity) pattern in compressed
//! column format together with an owned array of structural nonzero values.
//! On top of that container the crate provides
//!
//! * NumPy-like indexing and assignment with integers, slices (including
//!   negative steps), integer lists, sparsity masks and index matrices,
//! * elementwise arithmetic and comparisons with sparsity-aware result patterns,
//! * block algebra: concatenation, splitting, block-diagonal composition,
//!   Kronecker products and symmetric packing,
//! * structural linear algebra: structural rank via maximum bipartite matching,
//!   a determinant for any element type and sparse direct solves through a pluggable
//!   [`LinearSolver`](crate::linsol::LinearSolver).
//!
//! ```
//! use spmatrix::algebra::*;
//!
//! let a = DMatrix::from_rows(&[vec![4., 1.], vec![2., 3.]]).unwrap();
//! let b = DMatrix::from_column(vec![1., 2.]);
//! let x = solve(&a, &b, "lu").unwrap();
//! let r = a.mtimes(&x).unwrap();
//! assert!((r.to_rows()[1][0] - 2.0).abs() < 1e-12);
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

pub mod algebra;
pub mod linsol;
pub mod qdldl;
