#![allow(non_snake_case)]
use crate::algebra::*;
use crate::linsol::*;

fn arrow_4x4() -> DMatrix {
    // [4 1 1 1]
    // [1 4 . .]
    // [1 . 4 .]
    // [1 . . 4]
    let mut A = DMatrix::from_rows(&[
        vec![4., 1., 1., 1.],
        vec![1., 4., 0., 0.],
        vec![1., 0., 4., 0.],
        vec![1., 0., 0., 4.],
    ])
    .unwrap();
    A.make_sparse();
    A
}

fn lower_bidiagonal() -> DMatrix {
    // [2 . .]
    // [1 2 .]
    // [. 1 2]
    Matrix::from_triplets(3, 3, &[0, 1, 1, 2, 2], &[0, 0, 1, 1, 2], &[2., 1., 2., 1., 2.]).unwrap()
}

fn assert_close(A: &DMatrix, B: &DMatrix, tol: f64) {
    assert_eq!(A.size(), B.size());
    for (a, b) in A.to_dense_colmajor().iter().zip(B.to_dense_colmajor()) {
        assert!((a - b).abs() < tol, "{} != {}", a, b);
    }
}

#[test]
fn test_sprank_of_matrices() {
    assert_eq!(sprank(&DMatrix::eye(4)), 4);
    assert_eq!(sprank(&DMatrix::sparse(3, 3)), 0);
    // structural, not numeric
    assert_eq!(sprank(&DMatrix::zeros(2, 3)), 2);
}

#[test]
fn test_det() {
    let A = IMatrix::from_rows(&[vec![2, 0, 1], vec![1, 3, 2], vec![1, 1, 2]]).unwrap();
    assert_eq!(det(&A).unwrap(), 6);

    let mut S = A.clone();
    S.make_sparse();
    assert_eq!(det(&S).unwrap(), 6);

    assert_eq!(det(&arrow_4x4()).unwrap(), 208.);
    assert_eq!(det(&lower_bidiagonal()).unwrap(), 8.);
    assert_eq!(det(&IMatrix::sparse(0, 0)).unwrap(), 1);

    // structurally singular: second column is empty
    let Z = IMatrix::from_triplets(2, 2, &[0, 1], &[0, 0], &[1, 1]).unwrap();
    assert_eq!(det(&Z).unwrap(), 0);
    assert!(matches!(det(&IMatrix::ones(2, 3)), Err(MatrixError::Shape(_))));
}

// 5x5 with a[i, j] = i + j on the given rows and columns
fn sum_of_indices(rows: usize, cols: usize) -> IMatrix {
    let mut a = IMatrix::sparse(5, 5);
    for i in 0..rows {
        for j in 0..cols {
            a.set2(i as i64, j as i64, (i + j) as i64).unwrap();
        }
    }
    a
}

#[test]
fn test_det_5x5() {
    assert_eq!(det(&IMatrix::scalar(5)).unwrap(), 5);

    let mut a = IMatrix::sparse(5, 5);
    for i in 0..5 {
        a.set2(i, i, i + 1).unwrap();
    }
    assert_eq!(det(&a).unwrap(), 120);

    let mut a = IMatrix::sparse(5, 5);
    for i in 0..4 {
        a.set2(i, i, i + 1).unwrap();
    }
    a.set2(0, 4, 3).unwrap();
    a.set2(4, 0, 7).unwrap();
    assert_eq!(det(&a).unwrap(), -504);

    // rank two, structurally full
    assert_eq!(det(&sum_of_indices(5, 5)).unwrap(), 0);
    // empty last row or column
    assert_eq!(det(&sum_of_indices(4, 5)).unwrap(), 0);
    assert_eq!(det(&sum_of_indices(5, 4)).unwrap(), 0);

    for (r, c) in [(4, 1), (4, 2)] {
        let mut a = sum_of_indices(4, 5);
        a.set2(r, c, 12).unwrap();
        assert_eq!(det(&a).unwrap(), 0);
        assert_eq!(det(&a.transpose()).unwrap(), 0);
    }

    let mut a = DMatrix::sparse(50, 50);
    for i in 0..50 {
        a.set2(i, i, (i + 1) as f64).unwrap();
    }
    let expected = (1..=50).fold(1.0, |acc, k| acc * k as f64);
    assert!((det(&a).unwrap() / expected - 1.).abs() < 1e-12);
}

// I + ones(n, n), with determinant n + 1
fn shifted_ones<T: Element>(n: usize) -> Matrix<T> {
    let rows: Vec<Vec<T>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| if i == j { T::one() + T::one() } else { T::one() })
                .collect()
        })
        .collect();
    Matrix::from_rows(&rows).unwrap()
}

#[test]
fn test_det_dense_large() {
    let A = shifted_ones::<f64>(20);
    let d = det(&A).unwrap();
    assert!((d - 21.).abs() < 1e-9, "{}", d);
    assert!((lu_det(&A).unwrap() - d).abs() < 1e-9);

    // exact for integers
    assert_eq!(det(&shifted_ones::<i64>(20)).unwrap(), 21);

    // row swaps flip the sign
    let mut P = shifted_ones::<i64>(8);
    let (r0, r1) = (P.get2(0, ..).unwrap(), P.get2(3, ..).unwrap());
    P.set2(0, .., r1).unwrap();
    P.set2(3, .., r0).unwrap();
    assert_eq!(det(&P).unwrap(), -9);
}

#[test]
fn test_det_large_sparse() {
    // lower bidiagonal, every step removes a single entry column
    let n = 2000;
    let rows: Vec<usize> = (0..n).chain(1..n).collect();
    let cols: Vec<usize> = (0..n).chain(0..n - 1).collect();
    let vals: Vec<i64> = (0..n).map(|_| 1).chain((1..n).map(|_| 5)).collect();
    let A = IMatrix::from_triplets(n, n, &rows, &cols, &vals).unwrap();
    assert_eq!(det(&A).unwrap(), 1);

    // a 2x2 block on the diagonal with the remaining entries
    let mut B = DMatrix::eye(n);
    B.set2(0, n as i64 - 1, 3.).unwrap();
    B.set2(n as i64 - 1, 0, 2.).unwrap();
    assert_eq!(det(&B).unwrap(), -5.);
}

#[test]
fn test_lu_det() {
    let d = lu_det(&arrow_4x4()).unwrap();
    assert!((d - 208.).abs() < 1e-10);
    let d = lu_det(&DMatrix::from_rows(&[vec![0., 2.], vec![3., 1.]]).unwrap()).unwrap();
    assert!((d + 6.).abs() < 1e-12);
    // numerically singular
    let d = lu_det(&DMatrix::from_rows(&[vec![1., 2.], vec![2., 4.]]).unwrap()).unwrap();
    assert_eq!(d, 0.);
}

#[test]
fn test_solve() {
    let A = DMatrix::from_rows(&[vec![4., 1.], vec![2., 3.]]).unwrap();
    let b = DMatrix::from_column(vec![1., 2.]);
    let x = solve(&A, &b, "lu").unwrap();
    assert_close(&x, &DMatrix::from_column(vec![0.1, 0.6]), 1e-14);

    // several right hand sides, symmetric backend
    let A = arrow_4x4();
    let B = DMatrix::from_rows(&[
        vec![5.5, 4.],
        vec![-3., 1.],
        vec![9., 1.],
        vec![3., 1.],
    ])
    .unwrap();
    for method in ["lu", "ldl", "qdldl"] {
        let X = solve(&A, &B, method).unwrap();
        assert_close(&A.mtimes(&X).unwrap(), &B, 1e-12);
        assert_close(
            &X.get2(.., 0).unwrap(),
            &DMatrix::from_column(vec![1., -1., 2., 0.5]),
            1e-12,
        );
    }
}

#[test]
fn test_solve_pattern() {
    let L = lower_bidiagonal();
    let b = DMatrix::from_triplets(3, 2, &[1, 2], &[0, 1], &[2., 4.]).unwrap();
    let X = solve(&L, &b, "lu").unwrap();
    // x[:,0] depends on rows 1 and 2 only, x[:,1] on row 2 only
    assert_eq!(X.sparsity().row(), &[1, 2, 2]);
    assert_close(
        &X,
        &DMatrix::from_rows(&[vec![0., 0.], vec![1., 0.], vec![-0.5, 2.]]).unwrap(),
        1e-14,
    );
}

#[test]
fn test_solve_errors() {
    let b = DMatrix::from_column(vec![1., 1.]);

    let A = DMatrix::ones(2, 3);
    assert!(matches!(solve(&A, &b, "lu"), Err(MatrixError::Shape(_))));
    let A = DMatrix::eye(3);
    assert!(matches!(solve(&A, &b, "lu"), Err(MatrixError::Shape(_))));

    // structurally singular
    let A = DMatrix::from_triplets(2, 2, &[0, 1], &[0, 0], &[1., 1.]).unwrap();
    assert_eq!(solve(&A, &b, "lu"), Err(MatrixError::SingularMatrix));

    // numerically singular
    let A = DMatrix::from_rows(&[vec![1., 2.], vec![2., 4.]]).unwrap();
    assert_eq!(solve(&A, &b, "lu"), Err(MatrixError::SingularMatrix));

    let A = DMatrix::eye(2);
    assert_eq!(
        solve(&A, &b, "chol"),
        Err(MatrixError::Settings(SettingsError::BadFieldValue(
            "direct_solve_method"
        )))
    );
    // the symmetric backend rejects unsymmetric values
    let A = DMatrix::from_rows(&[vec![2., 1.], vec![0.5, 2.]]).unwrap();
    assert_eq!(
        solve(&A, &b, "ldl"),
        Err(MatrixError::LinearSolver(LinearSolverError::NotSymmetric))
    );
}

#[test]
fn test_solve_using_reuses_solver() {
    let A = arrow_4x4();
    let settings = LinearSolverSettings::default();
    let mut solver = LinearSolverBackend::new(A.sparsity_arc(), &settings).unwrap();

    let b = DMatrix::from_column(vec![5.5, -3., 9., 3.]);
    let x1 = solve_using(&A, &b, &mut solver).unwrap();

    // same pattern, new values
    let A2 = &A * 2.;
    let x2 = solve_using(&A2, &b, &mut solver).unwrap();
    assert_close(&(&x2 * 2.), &x1, 1e-12);

    let other = DMatrix::eye(4);
    assert!(matches!(
        solve_using(&other, &b, &mut solver),
        Err(MatrixError::Shape(_))
    ));
}

#[test]
fn test_inv() {
    let A = lower_bidiagonal();
    let Ainv = inv(&A).unwrap();
    assert!(Ainv.sparsity().is_tril());
    assert_close(&A.mtimes(&Ainv).unwrap(), &DMatrix::eye(3), 1e-14);
    assert!(inv(&DMatrix::ones(2, 3)).is_err());
}
