use crate::algebra::*;
use std::ops::{Add, Div, Mul, Neg, Sub};

impl<T> Matrix<T>
where
    T: Element,
{
    /// Elementwise `f(self, other)`.
    ///
    /// A 1x1 operand is broadcast against the other one.  Otherwise the
    /// shapes must agree.  The result pattern follows from the zero
    /// properties of `f`: `f0x_is_zero` states that `f(0, y) == 0` for
    /// every `y` and `fx0_is_zero` that `f(x, 0) == 0` for every `x`.  A
    /// function with `f(0, 0) != 0` gives a dense result.
    pub fn elementwise<F>(
        &self,
        other: &Matrix<T>,
        f0x_is_zero: bool,
        fx0_is_zero: bool,
        f: F,
    ) -> Result<Matrix<T>, MatrixError>
    where
        F: Fn(T, T) -> T,
    {
        let zero = T::zero;
        if other.is_scalar() && !self.is_scalar() {
            let s = other.value_at(0, 0);
            return Ok(self.with_scalar(|x| f(x, s.clone()), f(zero(), s.clone())));
        }
        if self.is_scalar() && !other.is_scalar() {
            let s = self.value_at(0, 0);
            return Ok(other.with_scalar(|y| f(s.clone(), y), f(s.clone(), zero())));
        }

        if f(zero(), zero()) != zero() {
            return self.densified().combine(&other.densified(), false, false, f);
        }
        self.combine(other, f0x_is_zero, fx0_is_zero, f)
    }

    fn combine<F>(
        &self,
        other: &Matrix<T>,
        f0x_is_zero: bool,
        fx0_is_zero: bool,
        f: F,
    ) -> Result<Matrix<T>, MatrixError>
    where
        F: Fn(T, T) -> T,
    {
        let (sp, mapping) = self
            .sparsity()
            .combine_with_mapping(other.sparsity(), f0x_is_zero, fx0_is_zero)?;
        let value = |m: &Matrix<T>, k: Option<usize>| {
            k.map_or_else(T::zero, |k| m.nonzeros()[k].clone())
        };
        let nzval = mapping
            .into_iter()
            .map(|(kx, ky)| f(value(self, kx), value(other, ky)))
            .collect();
        Ok(Matrix::from_parts(sp.into(), nzval))
    }

    // `f` applied to every element.  The pattern survives if `f(0) == 0`.
    fn with_scalar<F: Fn(T) -> T>(&self, f: F, f_of_zero: T) -> Matrix<T> {
        if f_of_zero == T::zero() {
            self.map(|x| f(x.clone()))
        } else {
            self.densified().map(|x| f(x.clone()))
        }
    }

    /// Elementwise `self + other`
    pub fn plus(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.elementwise(other, false, false, |x, y| x + y)
    }

    /// Elementwise `self - other`
    pub fn minus(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.elementwise(other, false, false, |x, y| x - y)
    }

    /// Elementwise product, nonzero only where both operands are
    pub fn times(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.elementwise(other, true, true, |x, y| x * y)
    }

    /// Elementwise `self / other`.  The result keeps the pattern of `self`.
    pub fn rdivide(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.elementwise(other, true, false, |x, y| x / y)
    }

    fn compare<F: Fn(&T, &T) -> bool>(&self, other: &Matrix<T>, f: F) -> Result<Matrix<T>, MatrixError> {
        self.elementwise(other, false, false, |x, y| T::from_bool(f(&x, &y)))
    }

    /// Elementwise `self < other` as ones and zeros
    pub fn less_than(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x < y)
    }

    /// Elementwise `self <= other` as ones and zeros
    pub fn less_equal(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x <= y)
    }

    /// Elementwise `self > other` as ones and zeros
    pub fn greater_than(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x > y)
    }

    /// Elementwise `self >= other` as ones and zeros
    pub fn greater_equal(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x >= y)
    }

    /// Elementwise `self == other` as ones and zeros
    pub fn equal_to(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x == y)
    }

    /// Elementwise `self != other` as ones and zeros
    pub fn not_equal_to(&self, other: &Matrix<T>) -> Result<Matrix<T>, MatrixError> {
        self.compare(other, |x, y| x != y)
    }

    /// True if every element is nonzero.  Structurally absent elements
    /// count as zero.
    pub fn all(&self) -> Result<bool, MatrixError> {
        if self.numel() == 0 {
            return Err(MatrixError::Emptiness("all"));
        }
        Ok(self.sparsity().is_dense() && self.nonzeros().iter().all(|v| *v != T::zero()))
    }

    /// True if any element is nonzero
    pub fn any(&self) -> Result<bool, MatrixError> {
        if self.numel() == 0 {
            return Err(MatrixError::Emptiness("any"));
        }
        Ok(self.nonzeros().iter().any(|v| *v != T::zero()))
    }

    /// Truth value of a 1x1 matrix
    pub fn is_true(&self) -> Result<bool, MatrixError> {
        if self.numel() != 1 {
            return Err(MatrixError::AmbiguousTruth(self.numel()));
        }
        Ok(self.value_at(0, 0) != T::zero())
    }

    /// True if no stored value is infinite or `NaN`
    pub fn is_regular(&self) -> bool {
        self.nonzeros().iter().all(|v| v.is_regular())
    }
}

impl<T: Element> Neg for &Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        self.map(|x| -x.clone())
    }
}

impl<T: Element> Neg for Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        -&self
    }
}

// scalar broadcast, the pattern survives when `0 op s == 0`
macro_rules! impl_scalar_op {
    ($Trait:ident, $fn:ident, $op:tt) => {
        impl<T: Element> $Trait<T> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $fn(self, s: T) -> Matrix<T> {
                let f = |x: T| x $op s.clone();
                let f_of_zero = f(T::zero());
                self.with_scalar(f, f_of_zero)
            }
        }
    };
}
impl_scalar_op!(Add, add, +);
impl_scalar_op!(Sub, sub, -);
impl_scalar_op!(Mul, mul, *);
impl_scalar_op!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;

    fn bidiag() -> DMatrix {
        // [1 .]
        // [2 3]
        Matrix::from_triplets(2, 2, &[0, 1, 1], &[0, 0, 1], &[1., 2., 3.]).unwrap()
    }

    #[test]
    fn test_elementwise_patterns() {
        let A = bidiag();
        let B = DMatrix::eye(2);

        assert_eq!(A.plus(&B).unwrap().nnz(), 3);
        assert_eq!(A.times(&B).unwrap().nnz(), 2);
        assert_eq!(B.rdivide(&A).unwrap().sparsity(), B.sparsity());
        assert_eq!(A.rdivide(&B).unwrap().sparsity(), A.sparsity());

        // 0 <= 0 holds, so comparisons of this kind are dense
        assert!(A.less_equal(&B).unwrap().sparsity().is_dense());
        let lt = A.less_than(&B).unwrap();
        assert_eq!(lt.sparsity(), A.sparsity());
        assert_eq!(lt.to_rows(), vec![vec![0., 0.], vec![0., 0.]]);
        assert!(A.plus(&DMatrix::eye(3)).is_err());
    }

    #[test]
    fn test_scalar_broadcast() {
        let A = bidiag();
        let B = &A * 2.;
        assert_eq!(B.sparsity(), A.sparsity());
        assert_eq!(B.value_at(1, 0), 4.);

        let C = &A + 1.;
        assert!(C.sparsity().is_dense());
        assert_eq!(C.to_rows(), vec![vec![2., 1.], vec![3., 4.]]);

        let D = DMatrix::scalar(6.).rdivide(&A).unwrap();
        assert!(D.sparsity().is_dense());
        assert_eq!(D.value_at(1, 1), 2.);

        let N = -&A;
        assert_eq!(N.value_at(1, 0), -2.);

        // 1x1 receivers follow the same pattern rule
        let E = DMatrix::sparse(1, 1);
        assert_eq!((&E * 3.).nnz(), 0);
        assert_eq!((&E + 2.).to_rows(), vec![vec![2.]]);
        assert_eq!((&A - 0.).sparsity(), A.sparsity());
        let I = &IMatrix::eye(2) - 1;
        assert_eq!(I.to_rows(), vec![vec![0, -1], vec![-1, 0]]);
    }

    #[test]
    fn test_truth_values() {
        let A = bidiag();
        assert!(!A.all().unwrap());
        assert!(A.any().unwrap());
        assert!(DMatrix::ones(2, 3).all().unwrap());
        assert_eq!(DMatrix::sparse(0, 3).all(), Err(MatrixError::Emptiness("all")));
        assert_eq!(DMatrix::sparse(3, 0).any(), Err(MatrixError::Emptiness("any")));

        assert_eq!(A.is_true(), Err(MatrixError::AmbiguousTruth(4)));
        assert!(DMatrix::scalar(0.5).is_true().unwrap());
        assert!(!DMatrix::sparse(1, 1).is_true().unwrap());

        assert!(A.is_regular());
        assert!(!(&A / 0.).is_regular());
    }
}
