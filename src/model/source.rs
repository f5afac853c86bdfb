use std::path::{Path, PathBuf};

use crate::model::variant::ModelVariant;
use crate::tensor::ElementKind;

/// Where a variant's model weights and label table live on disk, and which
/// element kind its input tensor uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSource {
    pub variant: ModelVariant,
    pub model_path: PathBuf,
    pub labels_path: PathBuf,
    pub element_kind: ElementKind,
}

impl ModelSource {
    /// Resolves `<dir>/<stem>.json` and `<dir>/<labels file>` for `variant`.
    pub fn in_dir(dir: impl AsRef<Path>, variant: ModelVariant) -> Self {
        let dir = dir.as_ref();
        ModelSource {
            variant,
            model_path: dir.join(format!("{}.json", variant.model_stem())),
            labels_path: dir.join(variant.labels_file()),
            element_kind: variant.default_element_kind(),
        }
    }

    pub fn with_element_kind(mut self, kind: ElementKind) -> Self {
        self.element_kind = kind;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_paths_inside_dir() {
        let src = ModelSource::in_dir("trained_models", ModelVariant::Hangul);
        assert_eq!(src.model_path, PathBuf::from("trained_models/hangul_tensorflow.json"));
        assert_eq!(src.labels_path, PathBuf::from("trained_models/hangul2350.txt"));
        assert_eq!(src.element_kind, ElementKind::Float);

        let q = src.with_element_kind(ElementKind::Quantized);
        assert!(q.element_kind.is_quantized());
    }
}
