use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::preprocess::scale::TargetSize;
use crate::tensor::{ElementKind, TensorShape};

/// Which bundled model is in use.
///
/// Passed explicitly to every preprocessing and ranking call; there is no
/// process-wide "current model" flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelVariant {
    /// Handwritten digits: 28×28 grayscale, 10 classes.
    Digits,
    /// Handwritten Hangul syllables: 64×64 grayscale, 2350 classes.
    Hangul,
}

impl ModelVariant {
    pub const ALL: [ModelVariant; 2] = [ModelVariant::Digits, ModelVariant::Hangul];

    pub fn target_size(self) -> TargetSize {
        match self {
            ModelVariant::Digits => TargetSize::new(28, 28, 1),
            ModelVariant::Hangul => TargetSize::new(64, 64, 1),
        }
    }

    pub fn input_shape(self) -> TensorShape {
        self.target_size().shape()
    }

    pub fn class_count(self) -> usize {
        match self {
            ModelVariant::Digits => 10,
            ModelVariant::Hangul => 2350,
        }
    }

    /// File stem of the model inside the models directory.
    pub fn model_stem(self) -> &'static str {
        match self {
            ModelVariant::Digits => "mnist",
            ModelVariant::Hangul => "hangul_tensorflow",
        }
    }

    pub fn labels_file(self) -> &'static str {
        match self {
            ModelVariant::Digits => "number10.txt",
            ModelVariant::Hangul => "hangul2350.txt",
        }
    }

    /// Both bundled models take normalized float input.
    pub fn default_element_kind(self) -> ElementKind {
        ElementKind::Float
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModelVariant::Digits => "digits",
            ModelVariant::Hangul => "hangul",
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "digits" | "digit" | "number" | "mnist" => Ok(ModelVariant::Digits),
            "hangul" | "korean" => Ok(ModelVariant::Hangul),
            other => Err(format!("unknown model variant '{}' (expected digits or hangul)", other)),
        }
    }
}
