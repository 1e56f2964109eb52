//! Sparse $LDL^T$ factorization of symmetric quasidefinite matrices.
//!
//! The matrix is supplied as the pattern of its upper triangle.  Work is
//! split in two phases: [`LdlFactors::symbolic`] orders the pattern and
//! fixes the structure of $L$, after which [`LdlFactors::factor`] can be
//! called any number of times with new values.

mod numeric;
mod symbolic;

pub use self::numeric::*;
pub(crate) use self::symbolic::{amd_ordering, elimination_tree};

#[cfg(test)]
mod test;
