use std::time::Instant;

use image::DynamicImage;
use tracing::{info, warn};

use crate::error::{ClassifyError, Result};
use crate::labels::LabelTable;
use crate::model::{ModelSource, ModelVariant};
use crate::network::Network;
use crate::preprocess::scale::{decode_image, fit_within, scale_with_filter, ResizeFilter};
use crate::rank::{rank_output, RankedResult};
use crate::runtime::InferenceRuntime;
use crate::tensor::ElementKind;

/// Number of ranked candidates returned when the caller does not ask for a
/// specific count.
pub const DEFAULT_TOP_K: usize = 5;

/// Captures larger than this on either edge are shrunk before scaling.
pub const MAX_CAPTURE_EDGE: u32 = 512;

pub type BoxedRuntime = Box<dyn InferenceRuntime + Send + Sync>;

/// One model variant wired end to end: scale → run → rank.
pub struct Classifier {
    variant: ModelVariant,
    element_kind: ElementKind,
    labels: LabelTable,
    runtime: BoxedRuntime,
    top_k: usize,
    filter: ResizeFilter,
}

impl Classifier {
    /// Wires an already-loaded runtime and label table.
    ///
    /// Fails with `InvalidResults` when the runtime's class count disagrees
    /// with the label table, and with `ModelShape` when the runtime cannot
    /// accept the variant's input size.
    pub fn new(
        variant: ModelVariant,
        element_kind: ElementKind,
        labels: LabelTable,
        runtime: BoxedRuntime,
        top_k: usize,
    ) -> Result<Self> {
        if top_k == 0 {
            return Err(ClassifyError::InvalidTopK);
        }
        if runtime.output_len() != labels.len() {
            return Err(ClassifyError::InvalidResults(format!(
                "{} model produces {} classes but its label table has {} entries",
                variant,
                runtime.output_len(),
                labels.len()
            )));
        }
        let expected = variant.input_shape();
        let actual = runtime.input_shape();
        let accepted = if runtime.declares_input_shape() {
            actual == expected
        } else {
            actual.element_count() == expected.element_count()
        };
        if !accepted {
            return Err(ClassifyError::ModelShape(format!(
                "{} expects input {} but the model takes {}",
                variant, expected, actual
            )));
        }
        Ok(Classifier {
            variant,
            element_kind,
            labels,
            runtime,
            top_k,
            filter: ResizeFilter::default(),
        })
    }

    /// Loads the dense model and label table named by `source`.
    ///
    /// When the label file is absent, labels embedded in the model metadata
    /// are used instead.
    pub fn load(source: &ModelSource, top_k: usize) -> Result<Self> {
        let network = Network::load_json(&source.model_path)?;
        let labels = match LabelTable::load(&source.labels_path) {
            Ok(labels) => labels,
            Err(ClassifyError::Io { path, source: io_err })
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                let embedded = network
                    .metadata()
                    .and_then(|m| m.output_labels.clone())
                    .ok_or(ClassifyError::Io { path: path.clone(), source: io_err })?;
                warn!(path = %path.display(), "label file missing; using labels embedded in model");
                LabelTable::from_labels(embedded)?
            }
            Err(e) => return Err(e),
        };
        let classifier = Self::new(
            source.variant,
            source.element_kind,
            labels,
            Box::new(network),
            top_k,
        )?;
        info!(variant = %source.variant, classes = classifier.labels.len(), "classifier ready");
        Ok(classifier)
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn element_kind(&self) -> ElementKind {
        self.element_kind
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Classifies a captured canvas with the configured `top_k`.
    pub fn classify(&self, image: Option<&DynamicImage>) -> Result<RankedResult> {
        self.classify_top(image, self.top_k)
    }

    /// Classifies a captured canvas, keeping the best `top_k` candidates.
    pub fn classify_top(&self, image: Option<&DynamicImage>, top_k: usize) -> Result<RankedResult> {
        let image = image.ok_or(ClassifyError::ImageMissing)?;
        let started = Instant::now();

        let capture = fit_within(image, MAX_CAPTURE_EDGE, MAX_CAPTURE_EDGE);
        let tensor = scale_with_filter(
            &capture,
            self.variant.target_size(),
            self.element_kind.is_quantized(),
            self.filter,
        )?;
        let output = self.runtime.run(&tensor)?;
        let ranked = rank_output(&output, &self.labels, top_k)?;

        info!(
            variant = %self.variant,
            top = ranked.top().map(|p| p.label.as_str()).unwrap_or(""),
            confidence = ranked.top().map(|p| p.confidence).unwrap_or(0.0),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "classified drawing"
        );
        Ok(ranked)
    }

    /// Decodes encoded image bytes and classifies them.
    pub fn classify_bytes(&self, bytes: &[u8], top_k: usize) -> Result<RankedResult> {
        let image = decode_image(bytes)?;
        self.classify_top(Some(&image), top_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{OutputTensor, ScaledTensor, TensorShape};
    use image::{Rgba, RgbaImage};

    /// Scores each class by the mean input intensity times its index weight.
    struct MeanRuntime {
        weights: Vec<f32>,
    }

    impl InferenceRuntime for MeanRuntime {
        fn input_shape(&self) -> TensorShape {
            ModelVariant::Digits.input_shape()
        }

        fn output_len(&self) -> usize {
            self.weights.len()
        }

        fn run(&self, input: &ScaledTensor) -> Result<OutputTensor> {
            let v = input.to_f32_vec();
            let mean = v.iter().sum::<f32>() / v.len() as f32;
            Ok(OutputTensor::from_scores(self.weights.iter().map(|w| w * mean).collect()))
        }
    }

    fn digit_labels() -> LabelTable {
        LabelTable::parse("0\n1\n2\n3\n4\n5\n6\n7\n8\n9\n").unwrap()
    }

    fn classifier(weights: Vec<f32>) -> Result<Classifier> {
        Classifier::new(
            ModelVariant::Digits,
            ElementKind::Float,
            digit_labels(),
            Box::new(MeanRuntime { weights }),
            3,
        )
    }

    #[test]
    fn missing_image_is_reported() {
        let c = classifier(vec![0.1; 10]).unwrap();
        assert!(matches!(c.classify(None), Err(ClassifyError::ImageMissing)));
    }

    #[test]
    fn classify_runs_scale_run_rank() {
        let mut w = vec![0.0; 10];
        w[7] = 1.0;
        w[2] = 0.5;
        let c = classifier(w).unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255])));
        let r = c.classify(Some(&img)).unwrap();
        assert_eq!(r.len(), 3);
        assert_eq!(r.top().unwrap().label, "7");
        assert_eq!(r.predictions[1].label, "2");
        assert_eq!(r.predictions[2].label, "0");
    }

    #[test]
    fn label_count_must_match_outputs() {
        assert!(matches!(classifier(vec![0.0; 9]), Err(ClassifyError::InvalidResults(_))));
    }

    #[test]
    fn zero_top_k_is_rejected_at_construction() {
        let err = Classifier::new(
            ModelVariant::Digits,
            ElementKind::Float,
            digit_labels(),
            Box::new(MeanRuntime { weights: vec![0.0; 10] }),
            0,
        )
        .err()
        .unwrap();
        assert!(matches!(err, ClassifyError::InvalidTopK));
    }

    struct ShapedRuntime {
        shape: TensorShape,
        declared: bool,
    }

    impl InferenceRuntime for ShapedRuntime {
        fn input_shape(&self) -> TensorShape {
            self.shape
        }

        fn declares_input_shape(&self) -> bool {
            self.declared
        }

        fn output_len(&self) -> usize {
            10
        }

        fn run(&self, _input: &ScaledTensor) -> Result<OutputTensor> {
            Ok(OutputTensor::from_scores(vec![0.1; 10]))
        }
    }

    fn shaped(shape: TensorShape, declared: bool) -> Result<Classifier> {
        Classifier::new(
            ModelVariant::Digits,
            ElementKind::Float,
            digit_labels(),
            Box::new(ShapedRuntime { shape, declared }),
            3,
        )
    }

    #[test]
    fn declared_input_shape_must_match_variant_exactly() {
        let flat = TensorShape::new(1, 1, 784, 1);
        assert!(matches!(shaped(flat, true), Err(ClassifyError::ModelShape(_))));
        assert!(shaped(flat, false).is_ok());
        assert!(shaped(TensorShape::new(1, 28, 28, 1), true).is_ok());
        assert!(matches!(
            shaped(TensorShape::new(1, 1, 783, 1), false),
            Err(ClassifyError::ModelShape(_))
        ));
    }

    #[test]
    fn network_declaring_a_flat_input_is_rejected_at_load() {
        use crate::activation::activation::ActivationFunction;
        use crate::layers::dense::Layer;
        use crate::math::matrix::Matrix;
        use crate::network::ModelMetadata;

        let layer = || Layer::new(Matrix::zeros(784, 10), vec![0.0; 10], ActivationFunction::Softmax);
        let flat_meta = ModelMetadata {
            input_shape: Some(TensorShape::new(1, 1, 784, 1)),
            ..Default::default()
        };
        let declared_flat = Network::from_layers(vec![layer()], Some(flat_meta)).unwrap();
        let err = Classifier::new(
            ModelVariant::Digits,
            ElementKind::Float,
            digit_labels(),
            Box::new(declared_flat),
            3,
        )
        .err()
        .unwrap();
        assert!(matches!(err, ClassifyError::ModelShape(_)));

        let bare = Network::from_layers(vec![layer()], None).unwrap();
        let c = Classifier::new(ModelVariant::Digits, ElementKind::Float, digit_labels(), Box::new(bare), 3)
            .unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255])));
        assert_eq!(c.classify(Some(&img)).unwrap().len(), 3);
    }

    #[test]
    fn oversized_capture_is_shrunk_before_scaling() {
        let mut w = vec![0.0; 10];
        w[4] = 1.0;
        let c = classifier(w).unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            MAX_CAPTURE_EDGE * 4,
            MAX_CAPTURE_EDGE * 3,
            Rgba([255, 255, 255, 255]),
        ));
        let r = c.classify(Some(&img)).unwrap();
        assert_eq!(r.top().unwrap().label, "4");
        assert!(r.top().unwrap().confidence > 0.99);
    }

    #[test]
    fn classify_bytes_rejects_empty_upload() {
        let c = classifier(vec![0.1; 10]).unwrap();
        assert!(matches!(c.classify_bytes(&[], 1), Err(ClassifyError::ImageMissing)));
    }
}
