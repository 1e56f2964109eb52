use super::QdldlError;
use crate::algebra::{ShapedMatrix, Sparsity};

/// Elimination tree of a symmetric matrix given by its upper triangle.
///
/// Returns the parent of every node (`None` for roots) and the number of
/// strictly subdiagonal nonzeros in each column of the factor $L$.
pub(crate) fn elimination_tree(triu: &Sparsity) -> (Vec<Option<usize>>, Vec<usize>) {
    let n = triu.ncols();
    let mut parent = vec![None; n];
    let mut counts = vec![0; n];
    // last column that reached each node, `n` if none yet
    let mut flag = vec![n; n];

    for k in 0..n {
        flag[k] = k;
        for &i in triu.rows_of_col(k) {
            // climb from row i towards k, stopping at a node seen this column
            let mut node = i;
            while flag[node] != k {
                let up = *parent[node].get_or_insert(k);
                counts[node] += 1;
                flag[node] = k;
                node = up;
            }
        }
    }
    (parent, counts)
}

/// Approximate minimum degree ordering of a symmetric pattern.  Returns
/// the permutation and its inverse.
pub(crate) fn amd_ordering(
    sp: &Sparsity,
    dense_scale: f64,
) -> Result<(Vec<usize>, Vec<usize>), QdldlError> {
    let n = sp.ncols();
    if n == 0 {
        return Ok((Vec::new(), Vec::new()));
    }
    let mut control = amd::Control::default();
    control.dense *= dense_scale;
    let (perm, iperm, _info) =
        amd::order(n, sp.colind(), sp.row(), &control).map_err(|_| QdldlError::Ordering)?;
    Ok((perm, iperm))
}

/// Inverse of the permutation `perm`, or an error if `perm` is not one
pub(crate) fn invert_permutation(perm: &[usize]) -> Result<Vec<usize>, QdldlError> {
    let n = perm.len();
    let mut iperm = vec![None; n];
    for (i, &p) in perm.iter().enumerate() {
        if p >= n || iperm[p].is_some() {
            return Err(QdldlError::InvalidPermutation);
        }
        iperm[p] = Some(i);
    }
    Ok(iperm.into_iter().flatten().collect())
}

/// Upper triangle of $P A P^T$, where `triu` is the upper triangle of `A`
/// and `iperm` the inverse of the permutation defining `P`.  Also returns
/// the nonzero of the result that each nonzero of `triu` moves to.
pub(crate) fn permute_triu(
    triu: &Sparsity,
    iperm: &[usize],
) -> Result<(Sparsity, Vec<usize>), QdldlError> {
    let n = triu.ncols();
    let (rows, cols): (Vec<usize>, Vec<usize>) = triu
        .row()
        .iter()
        .zip(triu.get_col())
        .map(|(&r, c)| {
            let (pr, pc) = (iperm[r], iperm[c]);
            (pr.min(pc), pr.max(pc))
        })
        .unzip();

    // in range whenever `iperm` is a permutation of `0..n`
    Sparsity::from_triplets_with_mapping(n, n, &rows, &cols)
        .map_err(|_| QdldlError::InvalidPermutation)
}

/// Structural part of the factorization: the ordering, the permuted
/// triangle and the layout of $L$.
#[derive(Debug, Clone)]
pub(crate) struct Symbolic {
    pub perm: Vec<usize>,
    // upper triangle of the permuted matrix
    pub pattern: Sparsity,
    // nonzero of `pattern` receiving each input nonzero
    pub source_map: Vec<usize>,
    pub parent: Vec<Option<usize>>,
    // column offsets of L
    pub lcolptr: Vec<usize>,
}

impl Symbolic {
    pub fn new(triu: &Sparsity, perm: Vec<usize>) -> Result<Self, QdldlError> {
        if perm.len() != triu.ncols() {
            return Err(QdldlError::InvalidPermutation);
        }
        let iperm = invert_permutation(&perm)?;
        let (pattern, source_map) = permute_triu(triu, &iperm)?;
        let (parent, counts) = elimination_tree(&pattern);

        let mut lcolptr = vec![0];
        let mut total = 0;
        for c in counts {
            total += c;
            lcolptr.push(total);
        }
        Ok(Self {
            perm,
            pattern,
            source_map,
            parent,
            lcolptr,
        })
    }

    pub fn n(&self) -> usize {
        self.perm.len()
    }

    pub fn lnz(&self) -> usize {
        self.lcolptr[self.n()]
    }
}
