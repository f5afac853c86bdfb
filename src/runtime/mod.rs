use crate::error::Result;
use crate::tensor::{OutputTensor, ScaledTensor, TensorShape};

/// An engine that executes a classification model on a scaled image tensor.
///
/// The crate ships [`Network`](crate::network::Network), a dense JSON model
/// interpreter; hardware-accelerated or vendor runtimes plug in here.
pub trait InferenceRuntime {
    /// NHWC shape `run` accepts.
    fn input_shape(&self) -> TensorShape;

    /// Whether `input_shape()` comes from the model itself. When `false` the
    /// shape is a flat fallback and only its element count is binding.
    fn declares_input_shape(&self) -> bool {
        true
    }

    /// Number of class confidences `run` produces.
    fn output_len(&self) -> usize;

    /// Executes the model. Inputs whose shape differs from `input_shape()`
    /// must be rejected with `ShapeMismatch`.
    fn run(&self, input: &ScaledTensor) -> Result<OutputTensor>;
}
