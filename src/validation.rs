//! Input checks shared by fit and predict.
//!
//! All checks return `Result` so callers can propagate with `?`; nothing in
//! this module panics on bad input.
use ndarray::Array2;

use crate::error::ModelError;

/// Check a feature matrix for non-finite values.
///
/// Reports the position of the first NaN or infinity found.
pub fn check_features(x: &Array2<f32>) -> Result<(), ModelError> {
    for ((row, col), value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(ModelError::InvalidValue { row, col });
        }
    }
    Ok(())
}

/// Validate a training pair: non-empty matrix, matching label count,
/// finite values.
pub fn check_x_y<L>(x: &Array2<f32>, y: &[L]) -> Result<(), ModelError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(ModelError::EmptyInput);
    }
    if x.nrows() != y.len() {
        return Err(ModelError::ShapeMismatch {
            expected: x.nrows(),
            found: y.len(),
        });
    }
    check_features(x)
}
