use serde::{Deserialize, Serialize};

use crate::model::variant::ModelVariant;
use crate::tensor::TensorShape;

/// Optional annotations stored next to the weights in a model file.
/// Every field is optional so bare weight files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    #[serde(default)]
    pub description: Option<String>,
    /// Variant the weights were trained for.
    #[serde(default)]
    pub variant: Option<ModelVariant>,
    /// Declared NHWC input shape; wins over `variant` when both are present.
    #[serde(default)]
    pub input_shape: Option<TensorShape>,
    /// Class names embedded in the model, used when no label file is found.
    #[serde(default)]
    pub output_labels: Option<Vec<String>>,
}

impl ModelMetadata {
    pub fn for_variant(variant: ModelVariant) -> Self {
        ModelMetadata {
            variant: Some(variant),
            input_shape: Some(variant.input_shape()),
            ..Default::default()
        }
    }

    pub fn declared_input_shape(&self) -> Option<TensorShape> {
        self.input_shape.or_else(|| self.variant.map(ModelVariant::input_shape))
    }
}
