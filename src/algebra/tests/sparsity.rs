#![allow(non_snake_case)]
use crate::algebra::*;

fn pattern_6x4() -> Sparsity {
    // [* . . .]
    // [. . * .]
    // [. . * .]
    // [. . . .]
    // [. . . .]
    // [. . . *]
    Sparsity::from_triplets(6, 4, &[0, 1, 2, 5], &[0, 2, 2, 3]).unwrap()
}

#[test]
fn test_sprank() {
    assert_eq!(Sparsity::diagonal(5).sprank(), 5);
    assert_eq!(Sparsity::sparse(4, 3).sprank(), 0);
    assert_eq!(Sparsity::dense(3, 5).sprank(), 3);
    assert_eq!(Sparsity::dense(5, 3).sprank(), 3);
    assert_eq!(pattern_6x4().sprank(), 3);

    // permutation pattern
    let P = Sparsity::from_triplets(4, 4, &[2, 0, 3, 1], &[0, 1, 2, 3]).unwrap();
    assert_eq!(P.sprank(), 4);
}

#[test]
fn test_sprank_long_augmenting_chain() {
    // column j holds rows j and j+1, the last column only row 0.  The
    // greedy pass matches column j to row j and leaves the last column
    // with an augmenting path through every other column.
    let n = 2000;
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for j in 0..n - 1 {
        rows.extend([j, j + 1]);
        cols.extend([j, j]);
    }
    rows.push(0);
    cols.push(n - 1);
    let sp = Sparsity::from_triplets(n, n, &rows, &cols).unwrap();
    let m = sp.maximum_matching();
    assert_eq!(m.size(), n);
    assert_eq!(m.row_of_col[n - 1], Some(0));
    assert_eq!(m.row_of_col[0], Some(1));
    assert_eq!(sp.transpose().sprank(), n);
}

#[test]
fn test_construction_checks() {
    assert!(Sparsity::new(2, 2, vec![0, 1, 2], vec![0, 1]).is_ok());
    assert_eq!(
        Sparsity::new(2, 2, vec![0, 2, 2], vec![1, 0]),
        Err(SparseFormatError::BadRowOrdering)
    );
    assert_eq!(
        Sparsity::new(2, 2, vec![0, 1, 2], vec![0, 2]),
        Err(SparseFormatError::BadRowval)
    );
    assert_eq!(
        Sparsity::new(2, 2, vec![0, 1], vec![0]),
        Err(SparseFormatError::IncompatibleDimension)
    );
    assert!(Sparsity::from_triplets(2, 2, &[0, 3], &[0, 0]).is_err());
}

#[test]
fn test_combine_patterns() {
    let a = Sparsity::diagonal(3);
    let b = Sparsity::lower_triangular(3);
    assert_eq!(a.union(&b).unwrap(), b);
    assert_eq!(a.intersection(&b).unwrap(), a);
    assert_eq!(a.pattern_inverse().nnz(), 6);
    assert_eq!(b.pattern_inverse(), Sparsity::upper_triangular(3).upper(false));
    assert!(a.union(&Sparsity::dense(2, 3)).is_err());

    // [* .] [* *]   [* *]
    // [* .] [. .] = [* *]
    let x = Sparsity::from_triplets(2, 2, &[0, 1], &[0, 0]).unwrap();
    let y = Sparsity::from_triplets(2, 2, &[0, 0], &[0, 1]).unwrap();
    assert!(x.pattern_product(&y).unwrap().is_dense());
    assert_eq!(y.pattern_product(&x).unwrap().nnz(), 1);
}

#[test]
fn test_sub_and_remove() {
    let sp = pattern_6x4();
    let (sub, source) = sp.sub(&[2, 0, 2], &[2, 0]).unwrap();
    assert_eq!(sub.size(), (3, 2));
    // rows 2 and 0 of column 2, then row 0 of column 0
    assert_eq!(sub.row(), &[0, 2, 1]);
    assert_eq!(source, vec![2, 2, 0]);
    assert!(sp.sub(&[6], &[0]).is_err());

    let (rem, kept) = sp.remove_rows_cols(&[1, 3, 4], &[1]).unwrap();
    assert_eq!(rem.size(), (3, 3));
    assert_eq!(rem.nnz(), 3);
    assert_eq!(kept, vec![0, 2, 3]);
}

#[test]
fn test_reshape_and_transpose() {
    let sp = pattern_6x4();
    let r = sp.reshape(12, 2).unwrap();
    assert_eq!(r.elements(), sp.elements());
    assert!(sp.reshape(5, 5).is_err());

    let (t, source) = sp.transpose_with_mapping();
    assert_eq!(t.size(), (4, 6));
    assert!(t.has_nz(2, 1) && t.has_nz(3, 5));
    assert_eq!(source.len(), sp.nnz());
    assert_eq!(t.transpose(), sp);
}

#[test]
fn test_symmetry_and_triangles() {
    let sp = Sparsity::banded(5, 2);
    assert!(sp.is_symmetric());
    assert_eq!(sp.size_u(), sp.size_l());
    assert_eq!(sp.size_d(), 5);
    assert!(sp.upper(true).is_triu());
    assert!(sp.lower(true).is_tril());
    assert!(!pattern_6x4().is_symmetric());
}
