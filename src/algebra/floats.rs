#![allow(non_snake_case)]
use num_traits::{Float, FromPrimitive, NumAssign, One, Zero};
use std::fmt::{Debug, Display, LowerExp};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Element type held by a [`Matrix`](crate::algebra::Matrix).
///
/// The container never looks inside its elements beyond the arithmetic
/// and comparison operators below, so opaque symbolic scalars can be
/// stored as long as they provide them.  Implementations are provided for
/// `f32`, `f64`, `i32` and `i64`.
pub trait Element:
    'static
    + Clone
    + Debug
    + PartialEq
    + PartialOrd
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// False for values such as `NaN` or `±inf`.
    fn is_regular(&self) -> bool {
        true
    }

    /// One for `true`, zero for `false`.
    fn from_bool(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }

    /// Determinant of a dense square matrix given by rows.
    ///
    /// Fraction free Bareiss elimination: every division is exact, so
    /// integer types give exact results.  Floating point types override
    /// this with partial pivoting.
    fn dense_det(mut rows: Vec<Vec<Self>>) -> Self {
        let n = rows.len();
        let mut negate = false;
        let mut prev = Self::one();
        for k in 0..n {
            let Some(p) = (k..n).find(|&i| !rows[i][k].is_zero()) else {
                return Self::zero();
            };
            if p != k {
                rows.swap(p, k);
                negate = !negate;
            }
            let (top, rest) = rows.split_at_mut(k + 1);
            let pivot = &top[k];
            for row in rest.iter_mut() {
                for j in k + 1..n {
                    row[j] = (row[j].clone() * pivot[k].clone() - row[k].clone() * pivot[j].clone())
                        / prev.clone();
                }
            }
            prev = pivot[k].clone();
        }
        if negate {
            -prev
        } else {
            prev
        }
    }
}

macro_rules! impl_element_float {
    ($($ty:ty),*) => {$(
        impl Element for $ty {
            #[inline]
            fn is_regular(&self) -> bool {
                self.is_finite()
            }

            fn dense_det(mut rows: Vec<Vec<Self>>) -> Self {
                let n = rows.len();
                let mut det = 1.0;
                for k in 0..n {
                    let p = (k..n).fold(k, |p, i| if rows[i][k].abs() > rows[p][k].abs() { i } else { p });
                    if rows[p][k] == 0.0 {
                        return 0.0;
                    }
                    if p != k {
                        rows.swap(p, k);
                        det = -det;
                    }
                    let (top, rest) = rows.split_at_mut(k + 1);
                    let pivot = &top[k];
                    det *= pivot[k];
                    for row in rest.iter_mut() {
                        let f = row[k] / pivot[k];
                        if f != 0.0 {
                            for j in k + 1..n {
                                row[j] -= f * pivot[j];
                            }
                        }
                    }
                }
                det
            }
        }
    )*};
}
macro_rules! impl_element_int {
    ($($ty:ty),*) => {$(
        impl Element for $ty {}
    )*};
}
impl_element_float!(f32, f64);
impl_element_int!(i32, i64);

/// Floating point values used by numeric factorizations.
///
/// All numeric solves and LU determinants operate on values implementing
/// `FloatT`.  It is blanket implemented for anything satisfying its bounds,
/// which in practice means `f32` and `f64`.  `FloatT` relies on
/// [`num_traits`](num_traits) for most of its constituent trait bounds.
pub trait FloatT:
    Element + Copy + Float + NumAssign + Default + FromPrimitive + Display + LowerExp + Send + Sync
{
}

impl<T> FloatT for T where
    T: Element
        + Copy
        + Float
        + NumAssign
        + Default
        + FromPrimitive
        + Display
        + LowerExp
        + Send
        + Sync
{
}

/// Trait for converting Rust primitives to [`FloatT`](crate::algebra::FloatT)
///
/// Used for numeric constants and for the defaults of the
/// [linear solver settings](crate::linsol::LinearSolverSettings).

// NB: allows (2.0).as_T() on constants rather than T::from_f64(2.0).unwrap()
pub trait AsFloatT<T>: 'static {
    fn as_T(&self) -> T;
}

macro_rules! impl_as_FloatT {
    ($ty:ty, $ident:ident) => {
        impl<T> AsFloatT<T> for $ty
        where
            T: std::ops::Mul<T, Output = T> + FromPrimitive + 'static,
        {
            #[inline]
            fn as_T(&self) -> T {
                T::$ident(*self).unwrap()
            }
        }
    };
}
impl_as_FloatT!(u32, from_u32);
impl_as_FloatT!(usize, from_usize);
impl_as_FloatT!(f32, from_f32);
impl_as_FloatT!(f64, from_f64);
