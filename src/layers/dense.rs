use serde::{Deserialize, Serialize};

use crate::{activation::activation::ActivationFunction, math::matrix::Matrix};

/// Fully connected layer: `a = f(x·W + b)`.
///
/// `weights` is `input_size × size`; `biases` holds `size` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub weights: Matrix,
    pub biases: Vec<f32>,
    pub activation: ActivationFunction,
}

impl Layer {
    pub fn new(weights: Matrix, biases: Vec<f32>, activation: ActivationFunction) -> Layer {
        Layer { weights, biases, activation }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Forward pass for a single sample.
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        let mut z = self.weights.vec_mul(input);
        for (v, b) in z.iter_mut().zip(&self.biases) {
            *v += b;
        }
        self.activation.apply(&mut z);
        z
    }
}
