use std::hash::Hash;

use crate::config::ModelConfig;
use crate::models::classifier_trait::ClassifierModel;

/// Build a boxed classifier model from a `ModelConfig`.
/// Currently this is a thin factory implemented as a single function.
pub fn build_model<L>(params: ModelConfig) -> Box<dyn ClassifierModel<L>>
where
    L: Clone + Eq + Hash + 'static,
{
    match params.model_type {
        crate::config::ModelType::Rac { .. } => {
            Box::new(crate::models::rac::RacClassifier::new(params))
        }
    }
}
