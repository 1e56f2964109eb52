use super::symbolic::{invert_permutation, permute_triu};
use super::*;
use crate::algebra::Sparsity;

// A =
//[ 8.0  -3.0   2.0    ⋅ ]
//[  ⋅    8.0  -1.0    ⋅ ]
//[  ⋅     ⋅    8.0  -1.0]
//[  ⋅     ⋅     ⋅    1.0]
fn triu_4x4() -> (Sparsity, Vec<f64>) {
    let sp = Sparsity::new(4, 4, vec![0, 1, 3, 6, 8], vec![0, 0, 1, 0, 1, 2, 2, 3]).unwrap();
    (sp, vec![8., -3., 8., 2., -1., 8., -1., 1.])
}

fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .fold(0.0, |acc, (x, y)| f64::max(acc, (x - y).abs()))
}

fn identity_order() -> QdldlSettings {
    QdldlSettingsBuilder::default()
        .perm(vec![0, 1, 2, 3])
        .build()
        .unwrap()
}

#[test]
fn test_invert_permutation() {
    assert_eq!(invert_permutation(&[3, 0, 2, 1]).unwrap(), vec![1, 3, 2, 0]);
    // repeated index
    assert!(invert_permutation(&[3, 0, 2, 0]).is_err());
    // index too big
    assert!(invert_permutation(&[4, 0, 2, 1]).is_err());
}

#[test]
fn test_elimination_tree() {
    let (sp, _) = triu_4x4();
    let (parent, counts) = elimination_tree(&sp);
    assert_eq!(parent, vec![Some(1), Some(2), Some(3), None]);
    assert_eq!(counts, vec![2, 1, 1, 0]);

    // diagonal matrices have no edges
    let (parent, counts) = elimination_tree(&Sparsity::diagonal(3));
    assert_eq!(parent, vec![None; 3]);
    assert_eq!(counts, vec![0; 3]);
}

#[test]
fn test_amd() {
    let (sp, _) = triu_4x4();
    let (perm, iperm) = amd_ordering(&sp, 1.5).unwrap();
    assert_eq!(perm, [3, 0, 1, 2]);
    assert_eq!(iperm, [1, 2, 3, 0]);
}

#[test]
fn test_permute_triu() {
    let (sp, _) = triu_4x4();

    let (permuted, map) = permute_triu(&sp, &[0, 1, 2, 3]).unwrap();
    assert_eq!(permuted, sp);
    assert_eq!(map, (0..8).collect::<Vec<_>>());

    // perm = [2, 3, 0, 1] is its own inverse
    let (permuted, map) = permute_triu(&sp, &[2, 3, 0, 1]).unwrap();
    assert!(permuted.is_triu());
    assert_eq!(permuted.colind(), &[0, 1, 3, 5, 8]);
    assert_eq!(permuted.row(), &[0, 0, 1, 0, 2, 0, 2, 3]);
    assert_eq!(map, vec![4, 6, 7, 3, 5, 0, 1, 2]);

    // an index past the end moves entries out of the matrix
    assert_eq!(
        permute_triu(&sp, &[0, 1, 2, 7]).err(),
        Some(QdldlError::InvalidPermutation)
    );
}

#[test]
fn test_settings_builder() {
    let opts = QdldlSettings::default();
    assert_eq!(opts.amd_dense_scale, 1.5);
    assert!(opts.perm.is_none());
    assert_eq!(opts, QdldlSettingsBuilder::default().build().unwrap());

    let opts = QdldlSettingsBuilder::default()
        .perm(vec![0, 1, 2, 3])
        .amd_dense_scale(1.0)
        .build()
        .unwrap();
    assert_eq!(opts.perm, Some(vec![0, 1, 2, 3]));
    assert_eq!(opts.amd_dense_scale, 1.0);
}

#[test]
fn test_solve_orderings() {
    let (sp, vals) = triu_4x4();
    let x = [1., -2., 3., -4.];

    let orderings = [
        Some(identity_order()),
        None,
        Some(
            QdldlSettingsBuilder::default()
                .perm(vec![3, 0, 2, 1])
                .build()
                .unwrap(),
        ),
    ];
    for opts in orderings {
        let mut factors = LdlFactors::new(&sp, &vals, opts).unwrap();
        let mut b = [20.0, -22.0, 32.0, -7.0];
        factors.solve(&mut b).unwrap();
        assert!(max_abs_diff(&x, &b) <= 1e-8);
    }
}

#[test]
fn test_symbolic_then_factor() {
    let (sp, vals) = triu_4x4();
    let mut factors = LdlFactors::<f64>::symbolic(&sp, &QdldlSettings::default()).unwrap();
    assert!(!factors.is_factored());
    // rows of L are written in elimination order
    assert_eq!(factors.L.check_format(), Ok(()));
    assert!(factors.L.has_sorted_rows());
    assert_eq!(factors.solve(&mut [0.; 4]), Err(QdldlError::NotFactored));
    assert!(factors.determinant().is_err());

    factors.factor(&vals).unwrap();
    let mut b = [20.0, -22.0, 32.0, -7.0];
    factors.solve(&mut b).unwrap();
    assert!(max_abs_diff(&[1., -2., 3., -4.], &b) <= 1e-8);

    assert_eq!(
        factors.factor(&vals[1..]),
        Err(QdldlError::IncompatibleDimension)
    );
}

#[test]
fn test_zero_pivot() {
    // zero on the first pivot
    let (sp, mut vals) = triu_4x4();
    vals[0] = 0.;
    assert_eq!(
        LdlFactors::new(&sp, &vals, Some(identity_order())).err(),
        Some(QdldlError::ZeroPivot)
    );

    // AMD orders the last column first
    let (sp, mut vals) = triu_4x4();
    vals[7] = 0.;
    assert_eq!(
        LdlFactors::new(&sp, &vals, None).err(),
        Some(QdldlError::ZeroPivot)
    );
}

#[test]
fn test_structure_errors() {
    let full = Sparsity::dense(3, 3);
    assert_eq!(
        LdlFactors::<f64>::symbolic(&full, &QdldlSettings::default()).err(),
        Some(QdldlError::NotUpperTriangular)
    );

    let gap = Sparsity::new(3, 3, vec![0, 1, 1, 4], vec![0, 0, 1, 2]).unwrap();
    assert_eq!(
        LdlFactors::<f64>::symbolic(&gap, &QdldlSettings::default()).err(),
        Some(QdldlError::EmptyColumn)
    );

    let (sp, _) = triu_4x4();
    let bad = QdldlSettingsBuilder::default()
        .perm(vec![0, 1, 2])
        .build()
        .unwrap();
    assert_eq!(
        LdlFactors::<f64>::symbolic(&sp, &bad).err(),
        Some(QdldlError::InvalidPermutation)
    );
}

#[test]
fn test_determinant_and_refactor() {
    let (sp, mut vals) = triu_4x4();
    let mut factors = LdlFactors::new(&sp, &vals, None).unwrap();
    let det = factors.determinant().unwrap();
    assert!((det - factors.D.iter().product::<f64>()).abs() < 1e-10);
    assert_eq!(factors.positive_inertia(), 4);

    // identity ordering gives the same determinant
    let plain = LdlFactors::new(&sp, &vals, Some(identity_order())).unwrap();
    assert!((plain.determinant().unwrap() - det).abs() < 1e-10);

    // double the last diagonal entry
    vals[7] = 2.0;
    factors.factor(&vals).unwrap();
    let mut b = [20.0, -22.0, 32.0, -11.0];
    factors.solve(&mut b).unwrap();
    assert!(max_abs_diff(&[1., -2., 3., -4.], &b) <= 1e-8);
}

#[test]
fn test_empty_matrix() {
    let sp = Sparsity::sparse(0, 0);
    let mut factors = LdlFactors::<f64>::new(&sp, &[], None).unwrap();
    assert_eq!(factors.determinant(), Ok(1.0));
    factors.solve(&mut []).unwrap();
}
