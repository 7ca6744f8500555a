use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Central configuration for models in the crate.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub model_type: ModelType,
}

/// Supported model types and their options.
///
/// All options are fixed for the lifetime of a model built from them; there
/// is no runtime parameter mutation after construction.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub enum ModelType {
    /// Rank-aggregation classifier with one Borda signature per class.
    Rac {
        /// Weight the Spearman distance by how decisive each signature rank
        /// is (extreme ranks count more than middling ones).
        weighted: bool,
    },
}

impl Default for ModelType {
    fn default() -> Self {
        ModelType::Rac { weighted: false }
    }
}

impl ModelType {
    /// Whether the distance metric is rank-weighted.
    pub fn weighted(&self) -> bool {
        match self {
            ModelType::Rac { weighted } => *weighted,
        }
    }
}

impl FromStr for ModelType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rac" => Ok(ModelType::Rac { weighted: false }),
            "rac-weighted" => Ok(ModelType::Rac { weighted: true }),
            _ => Err(format!(
                "Unknown model type: {}. Expected 'rac' or 'rac-weighted'",
                s
            )),
        }
    }
}

impl ModelConfig {
    pub fn new(model_type: ModelType) -> Self {
        Self { model_type }
    }

    pub fn weighted(&self) -> bool {
        self.model_type.weighted()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::default(),
        }
    }
}
