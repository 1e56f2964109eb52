use crate::algebra::*;

// structurally absent elements print as "00"
impl<T> std::fmt::Display for Matrix<T>
where
    T: Element,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_scalar() {
            return write_element(self.element(0, 0), f);
        }
        write!(f, "{}: [", self.dim_string())?;
        for (i, row) in self.row_elements().into_iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "\n [")?;
            for (j, v) in row.into_iter().enumerate() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write_element(v, f)?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

fn write_element<T: Element>(v: Option<&T>, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    match v {
        Some(v) => write!(f, "{:?}", v),
        None => write!(f, "00"),
    }
}

impl<T> Matrix<T>
where
    T: Element,
{
    fn row_elements(&self) -> Vec<Vec<Option<&T>>> {
        let mut rows = vec![vec![None; self.ncols()]; self.nrows()];
        let sp = self.sparsity();
        for c in 0..self.ncols() {
            for k in sp.col_range(c) {
                rows[sp.row()[k]][c] = Some(&self.nonzeros()[k]);
            }
        }
        rows
    }
}

#[test]
fn test_display() {
    let A = Matrix::from_triplets(2, 2, &[0, 1], &[0, 1], &[1, 0]).unwrap();
    assert_eq!(A.to_string(), "2x2: [\n [1, 00],\n [00, 0]]");
    assert_eq!(Matrix::scalar(2.5).to_string(), "2.5");
    assert_eq!(DMatrix::sparse(1, 1).to_string(), "00");
}
