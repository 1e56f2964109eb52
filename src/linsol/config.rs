use super::*;
use crate::algebra::{FloatT, Sparsity};
use log::debug;
use std::sync::Arc;

// Maps the user setting to a backend.  Adding a backend means adding
// a variant to `LinearSolverBackend`, a match arm here and a name to
// the settings validation.

impl<T> LinearSolverBackend<T>
where
    T: FloatT,
{
    /// Creates the backend named by `settings.direct_solve_method` for
    /// matrices with pattern `sparsity`.
    pub fn new(
        sparsity: Arc<Sparsity>,
        settings: &LinearSolverSettings<T>,
    ) -> Result<Self, LinearSolverError> {
        let case = settings.direct_solve_method.as_str();
        debug!("linear solver \"{}\" for {}", case, sparsity);

        match case {
            "lu" => Ok(SparseLuSolver::new(sparsity, settings)?.into()),
            "ldl" | "qdldl" => Ok(LdlSolver::new(sparsity, settings)?.into()),
            _ => Err(LinearSolverError::UnknownMethod(case.to_string())),
        }
    }

    /// Backend name, as accepted by `direct_solve_method`
    pub fn name(&self) -> &'static str {
        match self {
            LinearSolverBackend::SparseLu(_) => "lu",
            LinearSolverBackend::Ldl(_) => "ldl",
        }
    }
}

#[test]
fn test_backend_selection() {
    let sp = Arc::new(Sparsity::diagonal(3));
    let mut settings = LinearSolverSettings::<f64>::default();
    let lu = LinearSolverBackend::new(sp.clone(), &settings).unwrap();
    assert_eq!(lu.name(), "lu");

    settings.direct_solve_method = "qdldl".to_string();
    let mut ldl = LinearSolverBackend::new(sp.clone(), &settings).unwrap();
    assert_eq!(ldl.name(), "ldl");
    ldl.factorize(&[2., 4., 8.]).unwrap();
    let mut b = [1., 1., 1.];
    ldl.solve(&mut b).unwrap();
    assert_eq!(b, [0.5, 0.25, 0.125]);
    assert_eq!(ldl.determinant().unwrap(), 64.);

    settings.direct_solve_method = "chol".to_string();
    assert_eq!(
        LinearSolverBackend::new(sp, &settings).err(),
        Some(LinearSolverError::UnknownMethod("chol".to_string()))
    );
}
