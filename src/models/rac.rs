use std::hash::Hash;

use ndarray::{Array1, Array2};
use rayon::prelude::*;

use crate::config::ModelConfig;
use crate::data_handling::ClassPartition;
use crate::error::ModelError;
use crate::models::classifier_trait::ClassifierModel;
use crate::ranking::{borda_signature, rank_min, rank_weights, spearman_distance};
use crate::validation;

/// Rank-aggregation classifier (RAC).
///
/// Each class observed at fit time is summarized by a single signature: the
/// Borda-count consensus ranking of that class's training rows. Prediction
/// ranks a query row and returns the label of the signature at minimal
/// Spearman-style distance, breaking exact ties toward the lower class
/// index.
///
/// The `weighted` option (fixed at construction) scales each feature's
/// distance term by how decisive the signature rank is, so extreme ranks
/// dominate middling ones.
pub struct RacClassifier<L> {
    config: ModelConfig,
    state: Option<FittedState<L>>,
}

#[derive(Debug, Clone)]
struct FittedState<L> {
    classes: Vec<L>,
    signatures: Array2<f32>,
    // Training snapshot, kept as metadata only; distances always go
    // through the signatures.
    x: Array2<f32>,
    y: Vec<L>,
}

impl<L> RacClassifier<L>
where
    L: Clone + Eq + Hash,
{
    pub fn new(config: ModelConfig) -> Self {
        RacClassifier {
            config,
            state: None,
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn weighted(&self) -> bool {
        self.config.weighted()
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Class labels seen at fit time, in signature-matrix row order.
    pub fn classes(&self) -> Option<&[L]> {
        self.state.as_ref().map(|state| state.classes.as_slice())
    }

    /// The fitted C x F signature matrix.
    pub fn signatures(&self) -> Option<&Array2<f32>> {
        self.state.as_ref().map(|state| &state.signatures)
    }

    /// Number of training samples retained from the last fit.
    pub fn n_training_samples(&self) -> Option<usize> {
        self.state.as_ref().map(|state| state.x.nrows())
    }

    /// Labels retained from the last fit, row-aligned with the training
    /// snapshot.
    pub fn training_labels(&self) -> Option<&[L]> {
        self.state.as_ref().map(|state| state.y.as_slice())
    }

    /// Compute one signature per class by Borda-count rank aggregation and
    /// store them, replacing any previously fitted state.
    pub fn fit(&mut self, x: &Array2<f32>, y: &[L]) -> Result<(), ModelError> {
        validation::check_x_y(x, y)?;

        let partition = ClassPartition::from_labels(y);
        log::debug!(
            "Computing {} class signatures over {} features from {} samples",
            partition.n_classes(),
            x.ncols(),
            x.nrows()
        );

        let signature_rows: Vec<Array1<f32>> = partition
            .class_rows
            .par_iter()
            .map(|rows| borda_signature(x, rows))
            .collect();

        let mut signatures = Array2::<f32>::zeros((partition.n_classes(), x.ncols()));
        for (class_idx, signature) in signature_rows.into_iter().enumerate() {
            signatures.row_mut(class_idx).assign(&signature);
        }

        self.state = Some(FittedState {
            classes: partition.classes,
            signatures,
            x: x.clone(),
            y: y.to_vec(),
        });

        Ok(())
    }

    /// The N x C matrix of Spearman-style distances between each query row's
    /// ranking and each class signature.
    ///
    /// A query with zero rows or zero columns yields a 0 x C matrix without
    /// computing any ranks.
    pub fn distances_to_signatures(&self, x: &Array2<f32>) -> Result<Array2<f32>, ModelError> {
        let state = self.state.as_ref().ok_or(ModelError::NotFitted)?;
        let n_classes = state.classes.len();

        if x.nrows() == 0 || x.ncols() == 0 {
            return Ok(Array2::zeros((0, n_classes)));
        }
        if x.ncols() != state.signatures.ncols() {
            return Err(ModelError::ShapeMismatch {
                expected: state.signatures.ncols(),
                found: x.ncols(),
            });
        }
        validation::check_features(x)?;

        let signatures = &state.signatures;
        let weights = self.weighted().then(|| {
            let mut w = Array2::<f32>::zeros(signatures.raw_dim());
            for (class_idx, signature) in signatures.outer_iter().enumerate() {
                w.row_mut(class_idx).assign(&rank_weights(signature));
            }
            w
        });
        let weights = weights.as_ref();

        // Rows are independent; each thread writes its own output row.
        let query_rows: Vec<_> = x.outer_iter().collect();
        let distance_rows: Vec<Vec<f32>> = query_rows
            .par_iter()
            .map(|row| {
                let query_rank = rank_min(row.view());
                (0..n_classes)
                    .map(|class_idx| {
                        spearman_distance(
                            signatures.row(class_idx),
                            query_rank.view(),
                            weights.map(|w| w.row(class_idx)),
                        )
                    })
                    .collect()
            })
            .collect();

        let flat: Vec<f32> = distance_rows.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((x.nrows(), n_classes), flat)
            .expect("distance matrix dimensions disagree with query count"))
    }

    /// Predict the label of the nearest class signature for each query row.
    ///
    /// An empty query matrix (zero rows or zero columns) yields an empty
    /// result rather than an error.
    pub fn predict(&self, x: &Array2<f32>) -> Result<Vec<L>, ModelError> {
        let state = self.state.as_ref().ok_or(ModelError::NotFitted)?;
        if x.nrows() == 0 || x.ncols() == 0 {
            return Ok(Vec::new());
        }

        let distances = self.distances_to_signatures(x)?;
        log::trace!(
            "Classifying {} rows against {} signatures",
            x.nrows(),
            state.classes.len()
        );

        let mut predictions = Vec::with_capacity(x.nrows());
        for row in distances.outer_iter() {
            // min_by keeps the first minimum, so exact ties resolve to the
            // lowest class index
            let (closest, _) = row
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
                .expect("fitted model holds at least one class");
            predictions.push(state.classes[closest].clone());
        }

        Ok(predictions)
    }

    /// Mean accuracy of `predict(x)` against `y`.
    pub fn score(&self, x: &Array2<f32>, y: &[L]) -> Result<f32, ModelError> {
        if x.nrows() != y.len() {
            return Err(ModelError::ShapeMismatch {
                expected: x.nrows(),
                found: y.len(),
            });
        }
        if y.is_empty() {
            return Err(ModelError::EmptyInput);
        }

        let predictions = self.predict(x)?;
        let correct = predictions
            .iter()
            .zip(y.iter())
            .filter(|(predicted, truth)| predicted == truth)
            .count();
        Ok(correct as f32 / y.len() as f32)
    }
}

impl<L> Default for RacClassifier<L>
where
    L: Clone + Eq + Hash,
{
    fn default() -> Self {
        RacClassifier::new(ModelConfig::default())
    }
}

impl<L> ClassifierModel<L> for RacClassifier<L>
where
    L: Clone + Eq + Hash,
{
    fn fit(&mut self, x: &Array2<f32>, y: &[L]) -> Result<(), ModelError> {
        RacClassifier::fit(self, x, y)
    }

    fn predict(&self, x: &Array2<f32>) -> Result<Vec<L>, ModelError> {
        RacClassifier::predict(self, x)
    }

    fn name(&self) -> &str {
        "rac"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelType;
    use ndarray::array;

    fn two_class_model(weighted: bool) -> RacClassifier<&'static str> {
        // Rows rank to [1,3,2] (class A) and [3,1,2] (class B); single-row
        // classes make the signatures equal those rankings.
        let x = array![[1.0f32, 5.0, 2.0], [9.0f32, 1.0, 5.0]];
        let mut model = RacClassifier::new(ModelConfig::new(ModelType::Rac { weighted }));
        model.fit(&x, &["A", "B"]).unwrap();
        model
    }

    #[test]
    fn fit_builds_borda_signatures() {
        // Per-sample ranks [1,2,3] and [2,3,1]; sums [3,5,4] re-rank to [1,3,2].
        let x = array![[1.0f32, 2.0, 3.0], [2.0f32, 3.0, 1.0]];
        let mut model = RacClassifier::default();
        model.fit(&x, &["A", "A"]).unwrap();

        assert_eq!(model.classes().unwrap(), &["A"]);
        assert_eq!(model.signatures().unwrap(), &array![[1.0f32, 3.0, 2.0]]);
        assert_eq!(model.n_training_samples(), Some(2));
        assert_eq!(model.training_labels().unwrap(), &["A", "A"]);
        assert!(!model.config().weighted());
    }

    #[test]
    fn predict_returns_nearest_signature_label() {
        let model = two_class_model(false);
        // Query [5,1,9] ranks to [2,1,3]: distance 4 to A, 2 to B.
        let query = array![[5.0f32, 1.0, 9.0]];
        let distances = model.distances_to_signatures(&query).unwrap();
        assert_eq!(distances, array![[4.0f32, 2.0]]);
        assert_eq!(model.predict(&query).unwrap(), vec!["B"]);
    }

    #[test]
    fn weighted_distances_scale_by_signature_decisiveness() {
        let model = two_class_model(true);
        // Bowtie weights for both signatures are [2,2,0] at F=3, so the
        // distances from the unweighted case become 6 and 2.
        let query = array![[5.0f32, 1.0, 9.0]];
        let distances = model.distances_to_signatures(&query).unwrap();
        assert_eq!(distances, array![[6.0f32, 2.0]]);
        assert_eq!(model.predict(&query).unwrap(), vec!["B"]);
    }

    #[test]
    fn exact_distance_ties_pick_the_first_class() {
        // Both classes share one signature; every query ties exactly.
        let x = array![[1.0f32, 2.0, 3.0], [10.0f32, 20.0, 30.0]];
        let mut model = RacClassifier::default();
        model.fit(&x, &["first", "second"]).unwrap();

        let predictions = model.predict(&array![[0.3f32, 0.2, 0.1]]).unwrap();
        assert_eq!(predictions, vec!["first"]);
    }

    #[test]
    fn predict_before_fit_is_not_fitted() {
        let model = RacClassifier::<i32>::default();
        let query = array![[1.0f32, 2.0]];
        assert_eq!(model.predict(&query), Err(ModelError::NotFitted));
        assert_eq!(
            model.distances_to_signatures(&query),
            Err(ModelError::NotFitted)
        );
    }

    #[test]
    fn empty_query_short_circuits() {
        let model = two_class_model(false);
        let no_rows = Array2::<f32>::zeros((0, 3));
        assert_eq!(model.predict(&no_rows).unwrap(), Vec::<&str>::new());

        let no_cols = Array2::<f32>::zeros((2, 0));
        assert_eq!(model.predict(&no_cols).unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn query_width_mismatch_is_an_error() {
        let model = two_class_model(false);
        let query = array![[1.0f32, 2.0]];
        assert_eq!(
            model.predict(&query),
            Err(ModelError::ShapeMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn fit_rejects_empty_and_mismatched_input() {
        let mut model = RacClassifier::default();
        assert_eq!(
            model.fit(&Array2::<f32>::zeros((0, 4)), &[] as &[i32]),
            Err(ModelError::EmptyInput)
        );
        assert_eq!(
            model.fit(&Array2::<f32>::zeros((4, 0)), &[1, 2, 3, 4]),
            Err(ModelError::EmptyInput)
        );
        assert_eq!(
            model.fit(&array![[1.0f32, 2.0], [3.0f32, 4.0]], &[1]),
            Err(ModelError::ShapeMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn non_finite_query_is_rejected() {
        let model = two_class_model(false);
        let query = array![[1.0f32, f32::INFINITY, 3.0]];
        assert_eq!(
            model.predict(&query),
            Err(ModelError::InvalidValue { row: 0, col: 1 })
        );
    }

    #[test]
    fn refit_replaces_all_state() {
        let mut model = RacClassifier::default();
        model
            .fit(&array![[1.0f32, 2.0, 3.0]], &["old"])
            .unwrap();
        model
            .fit(&array![[2.0f32, 1.0], [1.0f32, 2.0]], &["a", "b"])
            .unwrap();

        assert_eq!(model.classes().unwrap(), &["a", "b"]);
        assert_eq!(model.signatures().unwrap().dim(), (2, 2));
        assert_eq!(model.predict(&array![[9.0f32, 4.0]]).unwrap(), vec!["a"]);
    }

    #[test]
    fn training_set_predictions_agree_with_argmin() {
        let x = array![
            [0.1f32, 0.9, 0.5, 0.7],
            [0.2f32, 0.8, 0.4, 0.6],
            [0.9f32, 0.1, 0.6, 0.3],
            [0.8f32, 0.2, 0.7, 0.4],
            [0.5f32, 0.5, 0.9, 0.1]
        ];
        let y = vec![0i32, 0, 1, 1, 2];
        let mut model = RacClassifier::default();
        model.fit(&x, &y).unwrap();

        let distances = model.distances_to_signatures(&x).unwrap();
        let predictions = model.predict(&x).unwrap();
        let classes = model.classes().unwrap();

        for (row_idx, row) in distances.outer_iter().enumerate() {
            let predicted_idx = classes
                .iter()
                .position(|label| *label == predictions[row_idx])
                .unwrap();
            let best = row
                .iter()
                .cloned()
                .fold(f32::INFINITY, f32::min);
            assert_eq!(row[predicted_idx], best);
        }
    }

    #[test]
    fn score_is_perfect_on_rank_separable_classes() {
        // Within each class the rank pattern is identical, so signatures
        // match the samples' own rankings exactly.
        let x = array![
            [1.0f32, 2.0, 3.0],
            [10.0f32, 20.0, 30.0],
            [3.0f32, 2.0, 1.0],
            [30.0f32, 20.0, 10.0]
        ];
        let y = vec!["up", "up", "down", "down"];
        let mut model = RacClassifier::default();
        model.fit(&x, &y).unwrap();
        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn score_rejects_empty_and_mismatched_input() {
        let model = two_class_model(false);
        assert_eq!(
            model.score(&Array2::<f32>::zeros((0, 3)), &[]),
            Err(ModelError::EmptyInput)
        );
        assert_eq!(
            model.score(&array![[1.0f32, 2.0, 3.0]], &["A", "B"]),
            Err(ModelError::ShapeMismatch {
                expected: 1,
                found: 2
            })
        );
    }
}
