use crate::algebra::MatrixError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

/// A `start:stop:step` range over one axis.
///
/// Resolution follows the usual slicing rules of ordered sequences:
/// negative `start`/`stop` count from the end, a missing `start` is the
/// first position in the direction of `step` and a missing `stop` runs
/// past the last one.  `stop` is clamped to the axis, so an unreachable
/// `stop` gives an empty selection.  An explicit `start` outside
/// `[-len, len]` is an index error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: isize,
}

impl Default for Slice {
    fn default() -> Self {
        Self::all()
    }
}

impl Slice {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        Self { start, stop, step }
    }

    /// every position, in order
    pub fn all() -> Self {
        Self::new(None, None, 1)
    }

    /// `start..stop` with unit step
    pub fn range(start: isize, stop: isize) -> Self {
        Self::new(Some(start), Some(stop), 1)
    }

    /// every position, last to first
    pub fn reversed() -> Self {
        Self::new(None, None, -1)
    }

    /// Positions selected on an axis of length `len`, in selection order.
    pub fn get_all(&self, len: usize) -> Result<Vec<usize>, MatrixError> {
        if self.step == 0 {
            return Err(MatrixError::Index("slice step cannot be zero".to_string()));
        }
        let n = len as isize;
        let step = self.step;
        let (lower, upper) = if step > 0 { (0, n) } else { (-1, n - 1) };

        let clamp = |i: isize| {
            let i = if i < 0 { i + n } else { i };
            i.clamp(lower, upper)
        };

        let start = match self.start {
            None => {
                if step > 0 {
                    lower
                } else {
                    upper
                }
            }
            Some(i) => {
                if i < -n || i > n {
                    return Err(MatrixError::Index(format!(
                        "slice start {} out of range for dimension {}",
                        i, len
                    )));
                }
                clamp(i)
            }
        };
        let stop = match self.stop {
            None => {
                if step > 0 {
                    upper
                } else {
                    lower
                }
            }
            Some(i) => clamp(i),
        };

        let mut all = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            all.push(i as usize);
            i += step;
        }
        Ok(all)
    }
}

impl From<RangeFull> for Slice {
    fn from(_: RangeFull) -> Self {
        Slice::all()
    }
}

macro_rules! impl_slice_from_ranges {
    ($($ty:ty),*) => {$(
        impl From<Range<$ty>> for Slice {
            fn from(r: Range<$ty>) -> Self {
                Slice::range(r.start as isize, r.end as isize)
            }
        }
        impl From<RangeFrom<$ty>> for Slice {
            fn from(r: RangeFrom<$ty>) -> Self {
                Slice::new(Some(r.start as isize), None, 1)
            }
        }
        impl From<RangeTo<$ty>> for Slice {
            fn from(r: RangeTo<$ty>) -> Self {
                Slice::new(None, Some(r.end as isize), 1)
            }
        }
    )*};
}
impl_slice_from_ranges!(i32, i64, isize, usize);
