#![allow(non_snake_case)]
use crate::algebra::*;
use std::sync::Arc;

fn test_matrix_3x3() -> IMatrix {
    // [1 2 3]
    // [4 5 6]
    // [7 8 9]
    IMatrix::from_rows(&[vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap()
}

fn test_matrix_4x5() -> DMatrix {
    let rows: Vec<Vec<f64>> = (0..4)
        .map(|i| (0..5).map(|j| (10 * i + j) as f64).collect())
        .collect();
    DMatrix::from_rows(&rows).unwrap()
}

fn column(m: &IMatrix) -> Vec<i64> {
    m.to_dense_colmajor()
}

#[test]
fn test_get_lists_and_slices() {
    let A = test_matrix_3x3();
    assert_eq!(column(&A.get2([0, 2, 1], 0).unwrap()), vec![1, 7, 4]);
    assert_eq!(A.get2(0, [0, 2, 1]).unwrap().to_rows(), vec![vec![1, 3, 2]]);
    assert_eq!(column(&A.get2(Slice::reversed(), 0).unwrap()), vec![7, 4, 1]);
    assert_eq!(A.get2(-1, -1).unwrap().value_at(0, 0), 9);
    assert_eq!(A.get2(1.., ..2).unwrap().to_rows(), vec![vec![4, 5], vec![7, 8]]);

    // an unreachable stop is an empty selection
    let E = A.get2(Slice::new(Some(2), Some(0), 1), ..).unwrap();
    assert_eq!(E.size(), (0, 3));
}

#[test]
fn test_get_out_of_bounds() {
    let Y = test_matrix_4x5();
    assert!(matches!(Y.get2(12, 0), Err(MatrixError::Index(_))));
    assert!(matches!(Y.get2(0, 12), Err(MatrixError::Index(_))));
    assert!(matches!(Y.get2(12, ..), Err(MatrixError::Index(_))));
    assert!(matches!(Y.get2(-5, 0), Err(MatrixError::Index(_))));
    assert!(matches!(Y.get2(Slice::new(Some(9), None, 1), 0), Err(MatrixError::Index(_))));
    assert_eq!(Y.get2(-1, 2).unwrap().value_at(0, 0), 32.);
    assert!(Y.get(20).is_err());
}

#[test]
fn test_get_linear() {
    let A = test_matrix_3x3();
    // column-major positions
    assert_eq!(A.get(4).unwrap().value_at(0, 0), 5);
    let v = A.get(..3).unwrap();
    assert_eq!(v.size(), (3, 1));
    assert_eq!(column(&v), vec![1, 4, 7]);
    assert_eq!(column(&A.get(vec![-1, 0]).unwrap()), vec![9, 1]);

    let r = IMatrix::from_row(vec![1, 2, 3]);
    assert_eq!(r.get(1..).unwrap().to_rows(), vec![vec![2, 3]]);

    // absent positions stay absent
    let D = IMatrix::eye(3);
    let d = D.get(..).unwrap();
    assert_eq!(d.size(), (9, 1));
    assert_eq!(d.nnz(), 3);
}

#[test]
fn test_get_index_matrix() {
    let A = test_matrix_3x3();
    let I = IMatrix::from_rows(&[vec![0, 4], vec![8, -1]]).unwrap();
    assert_eq!(A.get(&I).unwrap().to_rows(), vec![vec![1, 5], vec![9, 9]]);

    // the result takes the pattern of the index matrix
    let I = IMatrix::from_triplets(2, 2, &[0, 1], &[0, 1], &[3, 1]).unwrap();
    let B = A.get(&I).unwrap();
    assert_eq!(B.sparsity(), I.sparsity());
    assert_eq!(B.to_rows(), vec![vec![2, 0], vec![0, 4]]);

    // absent sources read as explicit zeros
    let S = IMatrix::eye(3);
    let I = IMatrix::from_column(vec![1, 4, 3]);
    let B = S.get(&I).unwrap();
    assert_eq!(B.nnz(), 3);
    assert_eq!(column(&B), vec![0, 1, 0]);

    assert!(matches!(
        A.get(IMatrix::from_column(vec![9])),
        Err(MatrixError::Index(_))
    ));
}

#[test]
fn test_get2_index_matrix() {
    let A = test_matrix_3x3();

    // one block per selected column, side by side
    let I = IMatrix::from_column(vec![2, 0]);
    assert_eq!(A.get2(&I, [0, 2]).unwrap().to_rows(), vec![vec![7, 9], vec![1, 3]]);

    // one block per selected row, stacked
    let J = IMatrix::from_row(vec![1, 2]);
    assert_eq!(A.get2(0..2, &J).unwrap().to_rows(), vec![vec![2, 3], vec![5, 6]]);

    // pairwise
    let I = IMatrix::from_column(vec![0, 2]);
    let J = IMatrix::from_column(vec![1, -3]);
    assert_eq!(column(&A.get2(&I, &J).unwrap()), vec![2, 7]);

    assert!(matches!(
        A.get2(&I, IMatrix::from_row(vec![0, 1])),
        Err(MatrixError::Shape(_))
    ));
    assert!(matches!(
        A.get2(IMatrix::from_column(vec![3]), 0),
        Err(MatrixError::Shape(_))
    ));
}

#[test]
fn test_get_mask() {
    // [1 .]
    // [2 3]
    let A = IMatrix::from_triplets(2, 2, &[0, 1, 1], &[0, 0, 1], &[1, 2, 3]).unwrap();
    let mask = Sparsity::upper_triangular(2);
    let B = A.get(&mask).unwrap();
    assert_eq!(B.size(), (2, 2));
    assert_eq!(B.nnz(), 2);
    assert_eq!(B.to_rows(), vec![vec![1, 0], vec![0, 3]]);

    assert!(matches!(A.get(Sparsity::dense(3, 2)), Err(MatrixError::Shape(_))));
    assert!(matches!(A.get2(&mask, 0), Err(MatrixError::Shape(_))));
}

#[test]
fn test_set_grows_pattern() {
    let mut A = DMatrix::sparse(3, 3);
    let before = A.sparsity_arc();
    A.set2(0, 1, 5.).unwrap();
    assert_eq!(A.nnz(), 1);
    assert_eq!(A.value_at(0, 1), 5.);
    assert_eq!(before.nnz(), 0);

    // structurally zero values are not inserted
    A.set2(1, .., DMatrix::sparse(1, 1)).unwrap();
    assert_eq!(A.nnz(), 1);
    // but overwrite present entries with zero
    A.set2(0, .., DMatrix::sparse(1, 1)).unwrap();
    assert_eq!(A.nnz(), 1);
    assert_eq!(A.value_at(0, 1), 0.);

    A.set2(.., 2, DMatrix::from_column(vec![1., 2., 3.])).unwrap();
    assert_eq!(A.nnz(), 4);
    assert_eq!(A.to_rows()[2], vec![0., 0., 3.]);

    assert!(matches!(
        A.set2(.., 2, DMatrix::from_column(vec![1., 2.])),
        Err(MatrixError::Shape(_))
    ));
}

#[test]
fn test_set_last_write_wins() {
    let mut B = IMatrix::zeros(1, 3);
    B.set([0, 0], IMatrix::from_row(vec![1, 2])).unwrap();
    assert_eq!(B.to_rows(), vec![vec![2, 0, 0]]);

    let mut C = IMatrix::sparse(2, 2);
    C.set2([1, 1], [0, 0], IMatrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap())
        .unwrap();
    assert_eq!(C.nnz(), 1);
    assert_eq!(C.value_at(1, 0), 4);
}

#[test]
fn test_set_index_matrix_and_mask() {
    let mut A = test_matrix_3x3();
    let I = IMatrix::from_rows(&[vec![0, 4], vec![8, -1]]).unwrap();
    A.set(&I, IMatrix::from_rows(&[vec![10, 20], vec![30, 40]]).unwrap())
        .unwrap();
    // position 8 is written twice, the last write wins
    assert_eq!(A.value_at(0, 0), 10);
    assert_eq!(A.value_at(1, 1), 20);
    assert_eq!(A.value_at(2, 2), 40);

    let mut C = DMatrix::sparse(3, 3);
    C.set(Sparsity::diagonal(3), DMatrix::filled(3, 3, 7.)).unwrap();
    assert_eq!(C.nnz(), 3);
    assert!(C.sparsity().is_diagonal());
    assert!(C.set(Sparsity::diagonal(3), DMatrix::ones(2, 2)).is_err());

    // scalars broadcast over the selection
    C.set(Sparsity::diagonal(3), 1.).unwrap();
    assert_eq!(C, DMatrix::eye(3));
}

#[test]
fn test_get_shares_nothing_with_receiver() {
    let A = test_matrix_3x3();
    let mut B = A.get2(.., ..).unwrap();
    B.set2(0, 0, 100).unwrap();
    assert_eq!(A.value_at(0, 0), 1);
    assert!(!Arc::ptr_eq(&A.sparsity_arc(), &B.sparsity_arc()));
}

#[test]
fn test_set_rejects_transposed_vector() {
    let mut A = test_matrix_3x3();
    let before = A.clone();
    assert!(matches!(
        A.set2(Slice::all(), 0, IMatrix::from_row(vec![1, 2, 3])),
        Err(MatrixError::Shape(_))
    ));
    assert!(matches!(
        A.set2(0, Slice::all(), IMatrix::from_column(vec![1, 2, 3])),
        Err(MatrixError::Shape(_))
    ));
    assert!(matches!(
        A.set(..3, IMatrix::from_row(vec![1, 2, 3])),
        Err(MatrixError::Shape(_))
    ));
    assert_eq!(A, before);

    A.set2(Slice::all(), 0, IMatrix::from_column(vec![1, 2, 3])).unwrap();
    A.set2(0, Slice::all(), IMatrix::from_row(vec![7, 8, 9])).unwrap();
    assert_eq!(A.to_rows(), vec![vec![7, 8, 9], vec![2, 5, 6], vec![3, 8, 9]]);
}

#[test]
fn test_get_reversed_column() {
    let a = DMatrix::from_column(vec![1., 2., 3., 4., 5.]);
    let col = |s: Slice| a.get2(s, 0).unwrap().to_dense_colmajor();
    assert_eq!(col(Slice::new(Some(4), Some(0), -1)), vec![5., 4., 3., 2.]);
    assert_eq!(col(Slice::new(Some(3), Some(0), -2)), vec![4., 2.]);
    assert_eq!(col(Slice::new(None, Some(2), -1)), vec![5., 4.]);
    let empty = a.get2(Slice::new(Some(0), Some(4), -1), 0).unwrap();
    assert_eq!(empty.size(), (0, 1));
}

#[test]
fn test_set_out_of_bounds_leaves_receiver() {
    let mut Y = DMatrix::zeros(4, 5);
    let before = Y.clone();
    let failures = [
        Y.clone().set2(12, 0, 0.),
        Y.clone().set2(12, 12, 0.),
        Y.clone().set2(0, 12, 0.),
        Y.clone().set2(12, .., 0.),
        Y.clone().set2(Slice::range(12, 15), 0, 0.),
        Y.clone().set2(.., 12, 0.),
        Y.clone().set2(0, Slice::range(12, 15), 0.),
        Y.clone().set2(-12, 2, 0.),
        Y.clone().set2(Slice::range(-12, -9), 2, 0.),
    ];
    for result in failures {
        assert!(matches!(result, Err(MatrixError::Index(_))));
    }
    assert!(Y.set2(Slice::range(12, 15), 0, 1.).is_err());
    assert!(Y.set2(.., 12, 1.).is_err());
    assert_eq!(Y, before);

    Y.set2(-1, 2, 1.).unwrap();
    Y.set2(Slice::range(-3, -1), 2, 2.).unwrap();
    assert_eq!(Y.get2(.., 2).unwrap().to_dense_colmajor(), vec![0., 2., 2., 1.]);
}

// [0 2]
// [0 1]
fn index_2x2() -> IMatrix {
    IMatrix::from_rows(&[vec![0, 2], vec![0, 1]]).unwrap()
}

fn test_matrix_4x3() -> DMatrix {
    DMatrix::from_rows(&[
        vec![1., 2., 3.],
        vec![4., 5., 6.],
        vec![7., 8., 9.],
        vec![10., 11., 12.],
    ])
    .unwrap()
}

#[test]
fn test_get2_index_matrix_with_slice() {
    let A = index_2x2();
    let B = test_matrix_4x3();

    let expected = DMatrix::from_rows(&[
        vec![1., 3.],
        vec![1., 2.],
        vec![4., 6.],
        vec![4., 5.],
        vec![7., 9.],
        vec![7., 8.],
        vec![10., 12.],
        vec![10., 11.],
    ])
    .unwrap();
    assert_eq!(B.get2(.., &A).unwrap(), expected);

    let expected = DMatrix::from_rows(&[
        vec![1., 7., 2., 8., 3., 9.],
        vec![1., 4., 2., 5., 3., 6.],
    ])
    .unwrap();
    assert_eq!(B.get2(&A, ..).unwrap(), expected);

    let F = DMatrix::from_rows(&[vec![1., 2.], vec![4., 5.]]).unwrap();
    assert!(matches!(F.get2(.., &A), Err(MatrixError::Shape(_))));

    assert_eq!(B.get2(&A, 1).unwrap().to_rows(), vec![vec![2., 8.], vec![2., 5.]]);
    assert_eq!(B.get2(1, &A).unwrap().to_rows(), vec![vec![4., 6.], vec![4., 5.]]);
}

#[test]
fn test_set2_index_matrix_with_slice() {
    let A = index_2x2();
    let mut B = test_matrix_4x3();
    let doubled = DMatrix::from_rows(&[
        vec![2., 6.],
        vec![2., 4.],
        vec![8., 12.],
        vec![8., 10.],
        vec![14., 18.],
        vec![14., 16.],
        vec![20., 24.],
        vec![20., 22.],
    ])
    .unwrap();
    B.set2(.., &A, doubled).unwrap();
    let expected: Vec<Vec<f64>> = test_matrix_4x3()
        .to_rows()
        .into_iter()
        .map(|r| r.into_iter().map(|v| 2. * v).collect())
        .collect();
    assert_eq!(B.to_rows(), expected);

    B.set2(.., &A, 7.).unwrap();
    assert_eq!(B, DMatrix::filled(4, 3, 7.));

    let rows = DMatrix::from_rows(&[
        vec![1., 7., 2., 8., 3., 9.],
        vec![1., 4., 2., 5., 3., 6.],
    ])
    .unwrap();
    B.set2(&A, .., rows).unwrap();
    assert_eq!(
        B.to_rows(),
        vec![vec![1., 2., 3.], vec![4., 5., 6.], vec![7., 8., 9.], vec![7., 7., 7.]]
    );

    B.set2(&A, .., 6.).unwrap();
    assert_eq!(
        B.to_rows(),
        vec![vec![6., 6., 6.], vec![6., 6., 6.], vec![6., 6., 6.], vec![7., 7., 7.]]
    );

    // sparse receivers grow to cover the written block
    let mut S = DMatrix::sparse(3, 4);
    S.set2(.., &A, 7.).unwrap();
    assert_eq!(S.nnz(), 9);
    assert_eq!(S.to_rows(), vec![vec![7., 7., 7., 0.]; 3]);

    let mut S = DMatrix::sparse(4, 4);
    S.set2(&A, .., 8.).unwrap();
    assert_eq!(S.nnz(), 12);
    assert_eq!(S.to_rows()[3], vec![0.; 4]);
    assert_eq!(S.to_rows()[0], vec![8.; 4]);
}

// upper triangular index pair
// I = [0 2]   J = [2 0]
//     [. 1]       [. 1]
fn index_pair() -> (IMatrix, IMatrix) {
    let I = IMatrix::from_triplets(2, 2, &[0, 0, 1], &[0, 1, 1], &[0, 2, 1]).unwrap();
    let J = IMatrix::from_triplets(2, 2, &[0, 0, 1], &[0, 1, 1], &[2, 0, 1]).unwrap();
    (I, J)
}

#[test]
fn test_get2_sparse_index_pair() {
    let (I, J) = index_pair();
    let C = test_matrix_4x3();
    let R = C.get2(&I, &J).unwrap();
    assert_eq!(R.sparsity(), I.sparsity());
    assert_eq!(R.to_rows(), vec![vec![3., 7.], vec![0., 5.]]);

    let F = DMatrix::from_rows(&[vec![1., 2.], vec![4., 5.]]).unwrap();
    assert!(matches!(F.get2(&I, &J), Err(MatrixError::Shape(_))));

    // absent sources are structural zeros of the index pattern
    let R = DMatrix::sparse(3, 4).get2(&I, &J).unwrap();
    assert_eq!(R.nnz(), 3);
    assert_eq!(R.to_rows(), vec![vec![0., 0.], vec![0., 0.]]);
}

#[test]
fn test_set2_sparse_index_pair() {
    let (I, J) = index_pair();
    let V = DMatrix::from_triplets(2, 2, &[0, 0, 1], &[0, 1, 1], &[3., 7., 5.]).unwrap();

    let mut C = DMatrix::zeros(3, 4);
    C.set2(&I, &J, V.clone()).unwrap();
    assert_eq!(C.get2(&I, &J).unwrap().to_rows(), vec![vec![3., 7.], vec![0., 5.]]);
    assert_eq!(C.value_at(0, 2), 3.);
    assert_eq!(C.value_at(2, 0), 7.);

    let mut C = DMatrix::sparse(3, 4);
    C.set2(&I, &J, V).unwrap();
    assert_eq!(C.nnz(), 3);
    assert_eq!(C.get2(&I, &J).unwrap().to_rows(), vec![vec![3., 7.], vec![0., 5.]]);
}
