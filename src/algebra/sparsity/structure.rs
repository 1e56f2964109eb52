use crate::algebra::{MatrixError, ShapedMatrix, Sparsity};
use crate::qdldl::elimination_tree;

const UNMATCHED: usize = usize::MAX;

/// Maximum matching between the rows and columns of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    /// row matched to each column
    pub row_of_col: Vec<Option<usize>>,
    /// column matched to each row
    pub col_of_row: Vec<Option<usize>>,
}

impl Matching {
    /// number of matched pairs
    pub fn size(&self) -> usize {
        self.row_of_col.iter().flatten().count()
    }
}

impl Sparsity {
    /// Maximum matching in the bipartite graph with one vertex per row,
    /// one per column and one edge per structural nonzero.
    ///
    /// Each column in turn searches for an augmenting path by depth first
    /// search over alternating (nonzero, matched) edges.  The search uses an
    /// explicit stack, so deep paths cannot overflow the call stack.
    pub fn maximum_matching(&self) -> Matching {
        let (m, n) = self.size();
        let mut col_of_row = vec![UNMATCHED; m];
        let mut row_of_col = vec![UNMATCHED; n];

        // rows visited in the current search, stamped by root column
        let mut visited = vec![UNMATCHED; m];
        // (column, next nonzero to try) of the current path
        let mut stack: Vec<(usize, usize)> = Vec::new();
        // rows through which the path left each column on the stack
        let mut via: Vec<usize> = Vec::new();

        // cheap pass: take any free row
        for j in 0..n {
            if let Some(&i) = self.rows_of_col(j).iter().find(|&&i| col_of_row[i] == UNMATCHED) {
                col_of_row[i] = j;
                row_of_col[j] = i;
            }
        }

        for root in 0..n {
            if row_of_col[root] != UNMATCHED {
                continue;
            }
            stack.clear();
            via.clear();
            stack.push((root, self.colind()[root]));

            while let Some(&(j, p)) = stack.last() {
                let top = stack.len() - 1;
                if p == self.colind()[j + 1] {
                    stack.pop();
                    via.pop();
                    continue;
                }
                stack[top].1 += 1;

                let i = self.row()[p];
                if visited[i] == root {
                    continue;
                }
                visited[i] = root;

                if col_of_row[i] == UNMATCHED {
                    // augment: shift every matched row one column up the path
                    let mut row = i;
                    for k in (0..stack.len()).rev() {
                        let col = stack[k].0;
                        let prev = if k > 0 { via[k - 1] } else { UNMATCHED };
                        col_of_row[row] = col;
                        row_of_col[col] = row;
                        row = prev;
                    }
                    break;
                }
                via.push(i);
                stack.push((col_of_row[i], self.colind()[col_of_row[i]]));
            }
        }

        let wrap = |v: Vec<usize>| v.into_iter().map(|x| (x != UNMATCHED).then_some(x)).collect();
        Matching {
            row_of_col: wrap(row_of_col),
            col_of_row: wrap(col_of_row),
        }
    }

    /// Structural rank: size of a maximum row/column matching
    pub fn sprank(&self) -> usize {
        self.maximum_matching().size()
    }

    /// True if the pattern is square and equal to its transpose
    pub fn is_symmetric(&self) -> bool {
        self.is_square() && *self == self.transpose()
    }

    /// Elimination tree of a symmetric pattern.  Only the upper triangle
    /// is read.  Entry `j` holds the parent of node `j`, `None` for roots.
    pub fn elimination_tree(&self) -> Result<Vec<Option<usize>>, MatrixError> {
        if !self.is_square() {
            return Err(MatrixError::Shape(format!(
                "elimination tree of non-square {}",
                self.dim_string()
            )));
        }
        Ok(elimination_tree(&self.upper(true)).0)
    }

    /// Pattern of `X` in `A X = B`, for `A = self` with a perfect matching
    /// `matching` and `B` of pattern `rhs`.
    ///
    /// With rows permuted so that matched entries sit on the diagonal,
    /// column `j` of `X` can only be nonzero on the vertices reachable from
    /// the (permuted) nonzeros of column `j` of `B`, following an edge
    /// `k -> i` for every nonzero in row `i`, column `k` of the permuted
    /// matrix.
    pub fn solve_pattern(&self, rhs: &Sparsity, matching: &Matching) -> Result<Sparsity, MatrixError> {
        let n = self.nrows();
        if !self.is_square() || rhs.nrows() != n {
            return Err(MatrixError::Shape(format!(
                "solve with {} and {}",
                self.dim_string(),
                rhs.dim_string()
            )));
        }
        // column matched to each row is its position after permutation
        let mut q = Vec::with_capacity(n);
        for c in &matching.col_of_row {
            q.push(c.ok_or(MatrixError::SingularMatrix)?);
        }

        let mut mark = vec![UNMATCHED; n];
        let mut stack = Vec::new();
        let mut colind = Vec::with_capacity(rhs.ncols() + 1);
        let mut row = Vec::new();
        colind.push(0);
        for j in 0..rhs.ncols() {
            let start = row.len();
            for &r in rhs.rows_of_col(j) {
                if mark[q[r]] != j {
                    mark[q[r]] = j;
                    stack.push(q[r]);
                }
            }
            while let Some(k) = stack.pop() {
                row.push(k);
                for &r in self.rows_of_col(k) {
                    if mark[q[r]] != j {
                        mark[q[r]] = j;
                        stack.push(q[r]);
                    }
                }
            }
            row[start..].sort_unstable();
            colind.push(row.len());
        }
        Ok(Sparsity::from_parts(n, rhs.ncols(), colind, row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_needs_augmenting_path() {
        // greedy takes row 0 for column 0, column 1 must then reroute it
        // [* *]
        // [* .]
        let sp = Sparsity::from_triplets(2, 2, &[0, 1, 0], &[0, 0, 1]).unwrap();
        let m = sp.maximum_matching();
        assert_eq!(m.size(), 2);
        assert_eq!(m.row_of_col, vec![Some(1), Some(0)]);
        assert_eq!(m.col_of_row, vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_elimination_tree_arrow() {
        // arrow pattern: dense last row and column
        let n = 4;
        let rows = [0, 1, 2, 3, 3, 3, 3, 0, 1, 2];
        let cols = [0, 1, 2, 3, 0, 1, 2, 3, 3, 3];
        let sp = Sparsity::from_triplets(n, n, &rows, &cols).unwrap();
        let parent = sp.elimination_tree().unwrap();
        assert_eq!(parent, vec![Some(3), Some(3), Some(3), None]);
    }

    #[test]
    fn test_solve_pattern_lower_bidiagonal() {
        // x = L \ e0 fills in everything below the first entry
        let L = Sparsity::from_triplets(3, 3, &[0, 1, 1, 2, 2], &[0, 0, 1, 1, 2]).unwrap();
        let b = Sparsity::from_triplets(3, 1, &[0], &[0]).unwrap();
        let m = L.maximum_matching();
        let x = L.solve_pattern(&b, &m).unwrap();
        assert_eq!(x.row(), &[0, 1, 2]);

        let b = Sparsity::from_triplets(3, 1, &[1], &[0]).unwrap();
        let x = L.solve_pattern(&b, &m).unwrap();
        assert_eq!(x.row(), &[1, 2]);
    }
}
