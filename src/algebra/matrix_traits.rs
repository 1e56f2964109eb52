// T = transpose, N = non-transposed
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MatrixShape {
    N,
    T,
}

/// Dimension queries shared by patterns, matrices and factor storage.
pub trait ShapedMatrix {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    /// number of elements, structural zeros included
    fn numel(&self) -> usize {
        self.nrows() * self.ncols()
    }
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
    /// true if either dimension is zero
    fn is_empty(&self) -> bool {
        self.nrows() == 0 || self.ncols() == 0
    }
    fn is_scalar(&self) -> bool {
        self.nrows() == 1 && self.ncols() == 1
    }
    fn is_vector(&self) -> bool {
        self.nrows() == 1 || self.ncols() == 1
    }
    /// "3x4" style dimension string for error messages
    fn dim_string(&self) -> String {
        format!("{}x{}", self.nrows(), self.ncols())
    }
}
