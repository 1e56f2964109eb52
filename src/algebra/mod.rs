//! Sparsity patterns, index expressions, the generic matrix container and
//! the block and linear algebra built on them.

#![allow(non_snake_case)]

mod error_types;
pub use error_types::*;
mod floats;
pub use floats::*;
mod matrix_traits;
pub use matrix_traits::*;
mod csc;
pub use csc::*;
mod sparsity;
pub use sparsity::*;
mod index;
pub use index::*;
mod matrix;
pub use matrix::*;
mod block_concatenate;
pub use block_concatenate::*;
mod linalg;
pub use linalg::*;

#[cfg(test)]
mod tests;
