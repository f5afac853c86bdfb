use crate::error::{ClassifyError, Result};

/// Raw tensor handed back by an inference runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputTensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl OutputTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Self {
        OutputTensor { shape, data }
    }

    /// Single-batch classifier output of shape `[1, n]`.
    pub fn from_scores(scores: Vec<f32>) -> Self {
        OutputTensor { shape: vec![1, scores.len()], data: scores }
    }

    /// The per-class confidence vector of the only batch entry.
    ///
    /// Accepts shapes `[n]` and `[1, n]`; anything else cannot be read as a
    /// classification result.
    pub fn class_scores(&self) -> Result<&[f32]> {
        let n = match self.shape.as_slice() {
            [n] => *n,
            [1, n] => *n,
            other => {
                return Err(ClassifyError::InvalidResults(format!(
                    "expected output shape [1, N], got {:?}",
                    other
                )))
            }
        };
        if self.data.len() != n {
            return Err(ClassifyError::InvalidResults(format!(
                "output declares {} classes but holds {} values",
                n,
                self.data.len()
            )));
        }
        Ok(&self.data)
    }
}
