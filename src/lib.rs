pub mod error;
pub mod tensor;
pub mod model;
pub mod preprocess;
pub mod labels;
pub mod rank;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod runtime;
pub mod pipeline;
pub mod stats;
pub mod config;

// Convenience re-exports
pub use error::{ClassifyError, Result};
pub use tensor::{ElementKind, OutputTensor, ScaledTensor, TensorData, TensorShape};
pub use model::{ModelSource, ModelVariant};
pub use preprocess::{decode_image, scale, scale_for, ResizeFilter, TargetSize};
pub use labels::LabelTable;
pub use rank::{rank, rank_output, Prediction, RankedResult};
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use network::{ModelMetadata, Network};
pub use runtime::InferenceRuntime;
pub use pipeline::{Classifier, ModelRegistry};
pub use stats::{Tally, TallyStore};
pub use config::StudioConfig;
