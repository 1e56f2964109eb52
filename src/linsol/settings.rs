use crate::algebra::*;
use derive_builder::Builder;
#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
/// Error type returned by settings validation
pub enum SettingsError {
    /// An error attributable to one of the fields
    #[error("Bad value for field \"{0}\"")]
    BadFieldValue(&'static str),
}

/// Settings for the sparse direct solvers used by
/// [`solve_with`](crate::algebra::solve_with).

#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(bound = "T: Serialize + DeserializeOwned"))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LinearSolverSettings<T: FloatT> {
    ///solver backend, "lu", "ldl" or "qdldl"
    #[builder(default = r#""lu".to_string()"#)]
    pub direct_solve_method: String,

    ///threshold partial pivoting for "lu".  A diagonal pivot is kept
    ///if its magnitude is at least this fraction of the column maximum
    #[builder(default = "(1.0).as_T()")]
    pub pivot_tolerance: T,

    ///fill reducing ordering
    #[builder(default = "true")]
    pub amd_ordering: bool,

    ///scaling of the AMD dense row threshold
    #[builder(default = "1.5")]
    pub amd_dense_scale: f64,
}

impl<T> Default for LinearSolverSettings<T>
where
    T: FloatT,
{
    fn default() -> LinearSolverSettings<T> {
        LinearSolverSettingsBuilder::<T>::default().build().unwrap()
    }
}

impl<T> LinearSolverSettings<T>
where
    T: FloatT,
{
    /// Checks that the settings are valid.  Fields specified by strings
    /// must name a known option and numeric fields must be in range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_direct_solve_method(&self.direct_solve_method)?;
        validate_pivot_tolerance(self.pivot_tolerance)?;
        validate_amd_dense_scale(self.amd_dense_scale)?;
        Ok(())
    }
}

impl From<SettingsError> for LinearSolverSettingsBuilderError {
    fn from(e: SettingsError) -> Self {
        LinearSolverSettingsBuilderError::ValidationError(e.to_string())
    }
}

/// Automatic pre-build settings validation
impl<T> LinearSolverSettingsBuilder<T>
where
    T: FloatT,
{
    pub fn validate(&self) -> Result<(), SettingsError> {
        if let Some(ref direct_solve_method) = self.direct_solve_method {
            validate_direct_solve_method(direct_solve_method)?;
        }
        if let Some(pivot_tolerance) = self.pivot_tolerance {
            validate_pivot_tolerance(pivot_tolerance)?;
        }
        if let Some(amd_dense_scale) = self.amd_dense_scale {
            validate_amd_dense_scale(amd_dense_scale)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------
// individual validation functions go here
// ---------------------------------------------------------

fn validate_direct_solve_method(direct_solve_method: &str) -> Result<(), SettingsError> {
    match direct_solve_method {
        "lu" => Ok(()),
        "ldl" => Ok(()),
        "qdldl" => Ok(()),
        _ => Err(SettingsError::BadFieldValue("direct_solve_method")),
    }
}

fn validate_pivot_tolerance<T: FloatT>(pivot_tolerance: T) -> Result<(), SettingsError> {
    if pivot_tolerance > T::zero() && pivot_tolerance <= T::one() {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("pivot_tolerance"))
    }
}

fn validate_amd_dense_scale(amd_dense_scale: f64) -> Result<(), SettingsError> {
    if amd_dense_scale > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::BadFieldValue("amd_dense_scale"))
    }
}

#[test]
fn test_settings_validate() {
    // all standard settings
    LinearSolverSettingsBuilder::<f64>::default().build().unwrap();

    // fail on unknown method
    assert!(LinearSolverSettingsBuilder::<f64>::default()
        .direct_solve_method("foo".to_string())
        .build()
        .is_err());

    // pivot tolerance must be in (0,1]
    assert!(LinearSolverSettingsBuilder::<f64>::default()
        .pivot_tolerance(0.0)
        .build()
        .is_err());
    assert!(LinearSolverSettingsBuilder::<f64>::default()
        .pivot_tolerance(0.1)
        .direct_solve_method("qdldl".to_string())
        .build()
        .is_ok());

    // a direct field edit is caught by validate
    let mut settings = LinearSolverSettings::<f64>::default();
    assert!(settings.validate().is_ok());
    settings.direct_solve_method = "chol".to_string();
    assert_eq!(
        settings.validate(),
        Err(SettingsError::BadFieldValue("direct_solve_method"))
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_settings_serde_defaults() {
    // missing fields take their default values
    let settings: LinearSolverSettings<f64> =
        serde_json::from_str(r#"{"direct_solve_method": "ldl"}"#).unwrap();
    assert_eq!(settings.direct_solve_method, "ldl");
    assert_eq!(settings.pivot_tolerance, 1.0);
    assert!(settings.amd_ordering);
}
