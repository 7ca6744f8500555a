use ndarray::Array2;

use crate::error::ModelError;

/// A small trait abstraction for classifier models. It centralizes the
/// estimator contract (fit on labeled rows, predict one label per query row)
/// in the `models` module so implementations can live next to model code.
pub trait ClassifierModel<L> {
    /// Fit the model to labeled training rows. Refitting discards any
    /// previously fitted state.
    fn fit(&mut self, x: &Array2<f32>, y: &[L]) -> Result<(), ModelError>;

    /// Predict one label per query row.
    fn predict(&self, x: &Array2<f32>) -> Result<Vec<L>, ModelError>;

    /// Optional human readable name for the model
    fn name(&self) -> &str {
        "classifier"
    }
}
