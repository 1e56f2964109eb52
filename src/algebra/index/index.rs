use super::Slice;
use crate::algebra::{IMatrix, MatrixError, Sparsity};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// An index expression, consumed by [`Matrix::get`](crate::algebra::Matrix::get)
/// and friends.
///
/// Most callers never build one explicitly: integers, ranges, integer
/// arrays and vectors, patterns and integer matrices all convert with
/// `into()`.
#[derive(Debug, Clone, PartialEq)]
pub enum Index {
    /// single position, negative values count from the end
    Int(isize),
    /// `start:stop:step` range
    Slice(Slice),
    /// positions in list order, duplicates allowed
    List(Vec<isize>),
    /// the structural nonzeros of a same-shape pattern
    Mask(Sparsity),
    /// an integer matrix of positions, the result takes its shape
    Matrix(IMatrix),
}

impl Index {
    /// every position along an axis
    pub fn all() -> Self {
        Index::Slice(Slice::all())
    }

    /// True for the variants that select positions along one axis
    pub fn is_axis(&self) -> bool {
        matches!(self, Index::Int(_) | Index::Slice(_) | Index::List(_))
    }

    /// Positions selected along an axis of length `len`, in selection
    /// order.  Masks and index matrices do not select along an axis.
    pub fn resolve_axis(&self, len: usize) -> Result<Vec<usize>, MatrixError> {
        match self {
            Index::Int(i) => Ok(vec![resolve_int(*i, len)?]),
            Index::Slice(s) => s.get_all(len),
            Index::List(l) => l.iter().map(|&i| resolve_int(i, len)).collect(),
            Index::Mask(_) | Index::Matrix(_) => Err(MatrixError::Shape(
                "a pattern or matrix index cannot select along an axis".to_string(),
            )),
        }
    }
}

/// Resolves a possibly negative position on an axis of length `len`
pub fn resolve_int(i: isize, len: usize) -> Result<usize, MatrixError> {
    let n = len as isize;
    let r = if i < 0 { i + n } else { i };
    if r < 0 || r >= n {
        return Err(MatrixError::Index(format!(
            "index {} out of range for dimension {}",
            i, len
        )));
    }
    Ok(r as usize)
}

macro_rules! impl_index_from_int {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Index {
            fn from(i: $ty) -> Self {
                Index::Int(i as isize)
            }
        }
        impl From<Vec<$ty>> for Index {
            fn from(l: Vec<$ty>) -> Self {
                Index::List(l.into_iter().map(|i| i as isize).collect())
            }
        }
        impl From<&[$ty]> for Index {
            fn from(l: &[$ty]) -> Self {
                Index::List(l.iter().map(|&i| i as isize).collect())
            }
        }
        impl<const N: usize> From<[$ty; N]> for Index {
            fn from(l: [$ty; N]) -> Self {
                Index::List(l.iter().map(|&i| i as isize).collect())
            }
        }
        impl From<Range<$ty>> for Index {
            fn from(r: Range<$ty>) -> Self {
                Index::Slice(r.into())
            }
        }
        impl From<RangeFrom<$ty>> for Index {
            fn from(r: RangeFrom<$ty>) -> Self {
                Index::Slice(r.into())
            }
        }
        impl From<RangeTo<$ty>> for Index {
            fn from(r: RangeTo<$ty>) -> Self {
                Index::Slice(r.into())
            }
        }
    )*};
}
impl_index_from_int!(i32, i64, isize, usize);

impl From<RangeFull> for Index {
    fn from(_: RangeFull) -> Self {
        Index::all()
    }
}

impl From<Slice> for Index {
    fn from(s: Slice) -> Self {
        Index::Slice(s)
    }
}

impl From<Sparsity> for Index {
    fn from(sp: Sparsity) -> Self {
        Index::Mask(sp)
    }
}

impl From<&Sparsity> for Index {
    fn from(sp: &Sparsity) -> Self {
        Index::Mask(sp.clone())
    }
}

impl From<IMatrix> for Index {
    fn from(m: IMatrix) -> Self {
        Index::Matrix(m)
    }
}

impl From<&IMatrix> for Index {
    fn from(m: &IMatrix) -> Self {
        Index::Matrix(m.clone())
    }
}

impl From<&Index> for Index {
    fn from(i: &Index) -> Self {
        i.clone()
    }
}

#[test]
fn test_index_resolution() {
    assert_eq!(resolve_int(-1, 4).unwrap(), 3);
    assert!(resolve_int(4, 4).is_err());
    assert!(resolve_int(-5, 4).is_err());

    let idx: Index = vec![0, 2, -1].into();
    assert_eq!(idx.resolve_axis(3).unwrap(), vec![0, 2, 2]);
    let idx: Index = [0, 12].into();
    assert!(matches!(idx.resolve_axis(4), Err(MatrixError::Index(_))));
    let idx: Index = (1..).into();
    assert_eq!(idx.resolve_axis(3).unwrap(), vec![1, 2]);
    assert!(Index::from(Sparsity::dense(2, 2)).resolve_axis(2).is_err());
}
