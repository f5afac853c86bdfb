use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};
use crate::tensor::shape::TensorShape;

/// Element type of a scaled input tensor.
///
/// - `Quantized`: raw 8-bit magnitudes in [0, 255], for models trained on bytes.
/// - `Float`: `f32` values normalized to [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Quantized,
    Float,
}

impl ElementKind {
    pub fn is_quantized(self) -> bool {
        self == ElementKind::Quantized
    }
}

/// Flat element buffer, one variant per element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Quantized(Vec<u8>),
    Float(Vec<f32>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            TensorData::Quantized(v) => v.len(),
            TensorData::Float(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            TensorData::Quantized(_) => ElementKind::Quantized,
            TensorData::Float(_) => ElementKind::Float,
        }
    }
}

/// A preprocessed image ready for the inference runtime.
///
/// Invariant: `data.len() == shape.element_count()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledTensor {
    shape: TensorShape,
    data: TensorData,
}

impl ScaledTensor {
    pub fn new(shape: TensorShape, data: TensorData) -> Result<Self> {
        if data.len() != shape.element_count() {
            return Err(ClassifyError::ShapeMismatch {
                expected: format!("{} elements for {}", shape.element_count(), shape),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(ScaledTensor { shape, data })
    }

    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    pub fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at `(n, y, x, c)`. Quantized elements come back as their
    /// integral magnitude.
    pub fn get(&self, n: usize, y: usize, x: usize, c: usize) -> Option<f32> {
        let i = self.shape.offset(n, y, x, c)?;
        match &self.data {
            TensorData::Quantized(v) => v.get(i).map(|&b| b as f32),
            TensorData::Float(v) => v.get(i).copied(),
        }
    }

    /// Copies the buffer out as `f32` (quantized bytes keep their magnitude).
    pub fn to_f32_vec(&self) -> Vec<f32> {
        match &self.data {
            TensorData::Quantized(v) => v.iter().map(|&b| b as f32).collect(),
            TensorData::Float(v) => v.clone(),
        }
    }

    /// Nested batch/height/width/channel view.
    pub fn to_nested(&self) -> Vec<Vec<Vec<Vec<f32>>>> {
        let flat = self.to_f32_vec();
        let s = self.shape;
        let [sn, sy, sx, _] = s.strides();
        (0..s.batch)
            .map(|n| {
                (0..s.height)
                    .map(|y| {
                        (0..s.width)
                            .map(|x| {
                                let start = n * sn + y * sy + x * sx;
                                flat[start..start + s.channels].to_vec()
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }
}
