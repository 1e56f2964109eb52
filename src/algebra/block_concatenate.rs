use crate::algebra::*;
use std::borrow::Borrow;
use std::sync::Arc;

// gathers the values of an assembled pattern from its operands
fn assemble<T, M>(ms: &[M], sp: Sparsity, source: BlockMap) -> Matrix<T>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    let nzval = source
        .iter()
        .map(|&(b, k)| ms[b].borrow().nonzeros()[k].clone())
        .collect();
    Matrix::from_parts(Arc::new(sp), nzval)
}

fn sparsities<T, M>(ms: &[M]) -> Vec<&Sparsity>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    ms.iter().map(|m| m.borrow().sparsity()).collect()
}

/// Horizontal concatenation `[A B ...]`.
///
/// All operands must have the same number of rows, except that operands
/// without elements are skipped.  A single operand is returned as is.
pub fn horzcat<T, M>(ms: &[M]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    if ms.len() == 1 {
        return Ok(ms[0].borrow().clone());
    }
    let (sp, source) = Sparsity::horzcat_with_mapping(&sparsities::<T, M>(ms))?;
    Ok(assemble(ms, sp, source))
}

/// Vertical concatenation `[A; B; ...]`, see [`horzcat`]
pub fn vertcat<T, M>(ms: &[M]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    if ms.len() == 1 {
        return Ok(ms[0].borrow().clone());
    }
    let (sp, source) = Sparsity::vertcat_with_mapping(&sparsities::<T, M>(ms))?;
    Ok(assemble(ms, sp, source))
}

/// Block matrix from a list of block rows.  Each block row is
/// concatenated horizontally and the results vertically.
pub fn blockcat<T, R>(blocks: &[R]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    R: AsRef<[Matrix<T>]>,
{
    let rows = blocks
        .iter()
        .map(|r| horzcat(r.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    vertcat(&rows)
}

/// Block diagonal matrix with the operands on the diagonal
pub fn blkdiag<T, M>(ms: &[M]) -> Result<Matrix<T>, MatrixError>
where
    T: Element,
    M: Borrow<Matrix<T>>,
{
    let (sp, source) = Sparsity::blkdiag_with_mapping(&sparsities::<T, M>(ms))?;
    Ok(assemble(ms, sp, source))
}

/// Kronecker product
pub fn kron<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Matrix<T> {
    let (sp, source) = Sparsity::kron_with_mapping(a.sparsity(), b.sparsity());
    let nzval = source
        .iter()
        .map(|&(ka, kb)| a.nonzeros()[ka].clone() * b.nonzeros()[kb].clone())
        .collect();
    Matrix::from_parts(Arc::new(sp), nzval)
}

// Checks split offsets against an extent and appends the extent if missing
fn split_points(offsets: &[usize], extent: usize) -> Result<Vec<usize>, MatrixError> {
    if offsets.first() != Some(&0) {
        return Err(MatrixError::Shape(
            "split offsets must start at zero".to_string(),
        ));
    }
    if offsets.windows(2).any(|w| w[0] > w[1]) {
        return Err(MatrixError::Shape(
            "split offsets must be non-decreasing".to_string(),
        ));
    }
    let mut points = offsets.to_vec();
    match points.last() {
        Some(&last) if last > extent => {
            return Err(MatrixError::Shape(format!(
                "split offset {} exceeds dimension {}",
                last, extent
            )));
        }
        Some(&last) if last < extent => points.push(extent),
        _ => {}
    }
    Ok(points)
}

/// Splits into column blocks starting at `offsets`.
///
/// `offsets` must start at zero and be non-decreasing.  The last block
/// runs to the final column.  Horizontal concatenation of the pieces
/// gives back the original matrix.
pub fn horzsplit<T: Element>(m: &Matrix<T>, offsets: &[usize]) -> Result<Vec<Matrix<T>>, MatrixError> {
    let points = split_points(offsets, m.ncols())?;
    if points.len() == 1 {
        return Ok(vec![m.clone()]);
    }
    points
        .windows(2)
        .map(|w| m.sub_block(0..m.nrows(), w[0]..w[1]))
        .collect()
}

/// Splits into row blocks starting at `offsets`, see [`horzsplit`]
pub fn vertsplit<T: Element>(m: &Matrix<T>, offsets: &[usize]) -> Result<Vec<Matrix<T>>, MatrixError> {
    let points = split_points(offsets, m.nrows())?;
    if points.len() == 1 {
        return Ok(vec![m.clone()]);
    }
    points
        .windows(2)
        .map(|w| m.sub_block(w[0]..w[1], 0..m.ncols()))
        .collect()
}

fn step_offsets(step: usize, extent: usize) -> Result<Vec<usize>, MatrixError> {
    if step == 0 {
        return Err(MatrixError::Shape("split step cannot be zero".to_string()));
    }
    Ok((0..extent.max(1)).step_by(step).collect())
}

/// Column blocks of width `step`, the last one possibly narrower
pub fn horzsplit_step<T: Element>(m: &Matrix<T>, step: usize) -> Result<Vec<Matrix<T>>, MatrixError> {
    horzsplit(m, &step_offsets(step, m.ncols())?)
}

/// Row blocks of height `step`, the last one possibly shorter
pub fn vertsplit_step<T: Element>(m: &Matrix<T>, step: usize) -> Result<Vec<Matrix<T>>, MatrixError> {
    vertsplit(m, &step_offsets(step, m.nrows())?)
}

/// One block per column
pub fn horzsplit_each<T: Element>(m: &Matrix<T>) -> Result<Vec<Matrix<T>>, MatrixError> {
    horzsplit_step(m, 1)
}

/// One block per row
pub fn vertsplit_each<T: Element>(m: &Matrix<T>) -> Result<Vec<Matrix<T>>, MatrixError> {
    vertsplit_step(m, 1)
}

/// Splits into a grid of blocks, see [`horzsplit`] and [`vertsplit`]
pub fn blocksplit<T: Element>(
    m: &Matrix<T>,
    row_offsets: &[usize],
    col_offsets: &[usize],
) -> Result<Vec<Vec<Matrix<T>>>, MatrixError> {
    vertsplit(m, row_offsets)?
        .iter()
        .map(|r| horzsplit(r, col_offsets))
        .collect()
}
