use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Identity,
    Sigmoid,
    ReLU,
    LeakyReLU { alpha: f32 },
    Tanh,
    /// Vector-valued; applied to a whole layer output by `apply`.
    Softmax,
}

impl ActivationFunction {
    /// Applies the activation to a full layer output in place.
    pub fn apply(&self, values: &mut [f32]) {
        match self {
            ActivationFunction::Identity => {}
            ActivationFunction::Sigmoid => {
                values.iter_mut().for_each(|x| *x = 1.0 / (1.0 + (-*x).exp()));
            }
            ActivationFunction::ReLU => {
                values.iter_mut().for_each(|x| *x = x.max(0.0));
            }
            ActivationFunction::LeakyReLU { alpha } => {
                values.iter_mut().for_each(|x| if *x < 0.0 { *x *= alpha });
            }
            ActivationFunction::Tanh => {
                values.iter_mut().for_each(|x| *x = x.tanh());
            }
            ActivationFunction::Softmax => softmax(values),
        }
    }
}

/// Numerically stable softmax (max-shifted).
fn softmax(values: &mut [f32]) {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for x in values.iter_mut() {
        *x = (*x - max).exp();
        sum += *x;
    }
    if sum > 0.0 {
        values.iter_mut().for_each(|x| *x /= sum);
    }
}
