//---------------------------------------------------------
// low-level internal utilities for counting / filling entries
// of block partitioned sparsity patterns.
//
// Assembly is done in three passes: column counts of every block
// are accumulated into `colptr`, the counts are turned into fill
// positions, blocks are filled in increasing block-row order within
// each column and `colptr` is finally shifted back into place.  Each
// output nonzero records the (block, nonzero) pair it came from, so
// that callers can gather values of any element type afterwards.
//---------------------------------------------------------

use crate::algebra::{MatrixShape, Sparsity, ShapedMatrix};

pub(crate) struct Assembly {
    m: usize,
    n: usize,
    colptr: Vec<usize>,
    rowval: Vec<usize>,
    source: Vec<(usize, usize)>,
}

impl Assembly {
    // allocate an m x n target for `nnz` entries
    pub(crate) fn spalloc(size: (usize, usize), nnz: usize) -> Self {
        let (m, n) = size;
        Assembly {
            m,
            n,
            colptr: vec![0; n + 1],
            rowval: vec![0; nnz],
            source: vec![(0, 0); nnz],
        }
    }

    // increment self.colptr by the number of nonzeros in M
    pub(crate) fn colcount_block(&mut self, M: &Sparsity, initcol: usize, shape: MatrixShape) {
        match shape {
            MatrixShape::T => {
                for row in M.row().iter() {
                    self.colptr[initcol + row] += 1;
                }
            }
            MatrixShape::N => {
                let Mp = M.colind();
                for i in 0..M.ncols() {
                    self.colptr[initcol + i] += Mp[i + 1] - Mp[i];
                }
            }
        }
    }

    pub(crate) fn colcount_to_colptr(&mut self) {
        let mut currentptr = 0;
        for p in &mut self.colptr {
            let count = *p;
            *p = currentptr;
            currentptr += count;
        }
    }

    // populate entries of M using self.colptr as indicator of the next
    // fill location in each column.  Every entry remembers that it is
    // nonzero `j` of block `block`.
    pub(crate) fn fill_block(
        &mut self,
        M: &Sparsity,
        block: usize,
        initrow: usize,
        initcol: usize,
        shape: MatrixShape,
    ) {
        let Mp = M.colind();
        let Mi = M.row();
        for i in 0..M.ncols() {
            for j in Mp[i]..Mp[i + 1] {
                let (col, row) = match shape {
                    MatrixShape::T => (Mi[j] + initcol, i + initrow),
                    MatrixShape::N => (i + initcol, Mi[j] + initrow),
                };
                let dest = self.colptr[col];
                self.rowval[dest] = row;
                self.source[dest] = (block, j);
                self.colptr[col] += 1;
            }
        }
    }

    pub(crate) fn backshift_colptrs(&mut self) {
        self.colptr.rotate_right(1);
        self.colptr[0] = 0;
    }

    // hand back the finished pattern with the origin of each nonzero
    pub(crate) fn finish(self) -> (Sparsity, Vec<(usize, usize)>) {
        (
            Sparsity::from_parts(self.m, self.n, self.colptr, self.rowval),
            self.source,
        )
    }
}
