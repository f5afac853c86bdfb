use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ClassifyError, Result};
use crate::layers::dense::Layer;
use crate::network::metadata::ModelMetadata;
use crate::runtime::InferenceRuntime;
use crate::tensor::{OutputTensor, ScaledTensor, TensorShape};

/// Forward-only feed-forward network loaded from JSON.
///
/// This is the bundled interpreter behind [`InferenceRuntime`]; quantized
/// inputs are fed to the first layer as raw byte magnitudes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    layers: Vec<Layer>,
    #[serde(default)]
    metadata: Option<ModelMetadata>,
}

impl Network {
    /// Builds a network, checking that consecutive layers chain and that a
    /// declared input shape matches the first layer.
    pub fn from_layers(layers: Vec<Layer>, metadata: Option<ModelMetadata>) -> Result<Network> {
        let net = Network { layers, metadata };
        net.validate()?;
        Ok(net)
    }

    fn validate(&self) -> Result<()> {
        let first = self
            .layers
            .first()
            .ok_or_else(|| ClassifyError::ModelShape("model has no layers".into()))?;

        for (i, layer) in self.layers.iter().enumerate() {
            if !layer.weights.is_consistent() || layer.weights.rows == 0 || layer.weights.cols == 0 {
                return Err(ClassifyError::ModelShape(format!(
                    "layer {} weights do not match their declared {}x{} size",
                    i, layer.weights.rows, layer.weights.cols
                )));
            }
            if layer.biases.len() != layer.size() {
                return Err(ClassifyError::ModelShape(format!(
                    "layer {} has {} biases for {} neurons",
                    i,
                    layer.biases.len(),
                    layer.size()
                )));
            }
        }
        for (i, pair) in self.layers.windows(2).enumerate() {
            if pair[0].size() != pair[1].input_size() {
                return Err(ClassifyError::ModelShape(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].size(),
                    i + 1,
                    pair[1].input_size()
                )));
            }
        }
        if let Some(shape) = self.metadata.as_ref().and_then(ModelMetadata::declared_input_shape) {
            if shape.element_count() != first.input_size() {
                return Err(ClassifyError::ModelShape(format!(
                    "declared input {} has {} elements but the first layer takes {}",
                    shape,
                    shape.element_count(),
                    first.input_size()
                )));
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn metadata(&self) -> Option<&ModelMetadata> {
        self.metadata.as_ref()
    }

    /// Forward pass over a flat input vector.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current);
        }
        current
    }

    /// Serializes the network to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|e| ClassifyError::io(path, e))?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes and validates a network written by `save_json`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Network> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ClassifyError::io(path, e))?;
        let reader = std::io::BufReader::new(file);
        let net: Network = serde_json::from_reader(reader)?;
        net.validate()?;
        info!(
            path = %path.display(),
            layers = net.layers.len(),
            input = %net.input_shape(),
            outputs = net.output_len(),
            "loaded dense model"
        );
        Ok(net)
    }
}

impl InferenceRuntime for Network {
    fn input_shape(&self) -> TensorShape {
        self.metadata
            .as_ref()
            .and_then(ModelMetadata::declared_input_shape)
            .unwrap_or_else(|| {
                let n = self.layers.first().map(Layer::input_size).unwrap_or(0);
                TensorShape::new(1, 1, n, 1)
            })
    }

    fn declares_input_shape(&self) -> bool {
        self.metadata.as_ref().and_then(ModelMetadata::declared_input_shape).is_some()
    }

    fn output_len(&self) -> usize {
        self.layers.last().map(Layer::size).unwrap_or(0)
    }

    fn run(&self, input: &ScaledTensor) -> Result<OutputTensor> {
        let expected = self.input_shape();
        // Undeclared models only constrain the element count.
        let accepted = if self.declares_input_shape() {
            input.shape() == expected
        } else {
            input.len() == expected.element_count()
        };
        if !accepted {
            return Err(ClassifyError::ShapeMismatch {
                expected: expected.to_string(),
                actual: input.shape().to_string(),
            });
        }
        Ok(OutputTensor::from_scores(self.forward(&input.to_f32_vec())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::math::matrix::Matrix;
    use crate::model::ModelVariant;
    use crate::tensor::TensorData;

    fn identity_layer(n: usize) -> Layer {
        let data = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { 0.0 }).collect())
            .collect();
        Layer::new(Matrix::from_data(data).unwrap(), vec![0.0; n], ActivationFunction::Identity)
    }

    fn tiny_meta() -> ModelMetadata {
        ModelMetadata { input_shape: Some(TensorShape::new(1, 2, 2, 1)), ..Default::default() }
    }

    #[test]
    fn rejects_unchained_layers() {
        let err = Network::from_layers(vec![identity_layer(4), identity_layer(3)], None).unwrap_err();
        assert!(matches!(err, ClassifyError::ModelShape(_)));
    }

    #[test]
    fn rejects_declared_shape_mismatch() {
        let meta = ModelMetadata::for_variant(ModelVariant::Digits);
        let err = Network::from_layers(vec![identity_layer(4)], Some(meta)).unwrap_err();
        assert!(matches!(err, ClassifyError::ModelShape(_)));
    }

    #[test]
    fn rejects_empty_model() {
        assert!(Network::from_layers(vec![], None).is_err());
    }

    #[test]
    fn run_checks_input_shape() {
        let net = Network::from_layers(vec![identity_layer(4)], Some(tiny_meta())).unwrap();
        let wrong = ScaledTensor::new(TensorShape::new(1, 1, 4, 1), TensorData::Float(vec![0.0; 4])).unwrap();
        assert!(matches!(net.run(&wrong), Err(ClassifyError::ShapeMismatch { .. })));

        let right = ScaledTensor::new(TensorShape::new(1, 2, 2, 1), TensorData::Quantized(vec![1, 2, 3, 4])).unwrap();
        let out = net.run(&right).unwrap();
        assert_eq!(out.shape, vec![1, 4]);
        assert_eq!(out.data, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn input_shape_falls_back_to_flat_vector() {
        let net = Network::from_layers(vec![identity_layer(4)], None).unwrap();
        assert_eq!(net.input_shape(), TensorShape::new(1, 1, 4, 1));
        assert_eq!(net.output_len(), 4);

        let square = ScaledTensor::new(TensorShape::new(1, 2, 2, 1), TensorData::Float(vec![0.5; 4])).unwrap();
        assert_eq!(net.run(&square).unwrap().data, vec![0.5; 4]);
    }

    #[test]
    fn json_round_trip_through_file() {
        let net = Network::from_layers(vec![identity_layer(4)], Some(tiny_meta())).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.json");
        net.save_json(&path).unwrap();
        let back = Network::load_json(&path).unwrap();
        assert_eq!(back, net);
    }

    #[test]
    fn load_json_validates_bias_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"layers":[{"weights":{"rows":1,"cols":2,"data":[[1.0,1.0]]},"biases":[0.0],"activation":"ReLU"}]}"#,
        )
        .unwrap();
        assert!(matches!(Network::load_json(&path), Err(ClassifyError::ModelShape(_))));
    }
}
