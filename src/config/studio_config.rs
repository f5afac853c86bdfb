use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};
use crate::model::{ModelSource, ModelVariant};
use crate::pipeline::DEFAULT_TOP_K;
use crate::preprocess::ResizeFilter;
use crate::tensor::ElementKind;

/// Per-variant override of the element kind fed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    pub variant: ModelVariant,
    #[serde(default)]
    pub element_kind: Option<ElementKind>,
}

/// Settings for the classification studio.
///
/// Every field has a default, so an empty JSON object (or no file at all)
/// yields a working configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Directory containing `<model>.json` files and label tables.
    pub models_dir: PathBuf,
    /// JSON file backing the prediction tally.
    pub stats_path: PathBuf,
    /// Ranked candidates returned per request unless the request overrides it.
    pub top_k: usize,
    /// Variants to load at startup.
    pub variants: Vec<VariantConfig>,
    /// Variant selected at startup.
    pub active: ModelVariant,
    pub filter: ResizeFilter,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            bind: "127.0.0.1:7878".to_owned(),
            models_dir: PathBuf::from("trained_models"),
            stats_path: PathBuf::from("trained_models/tally.json"),
            top_k: DEFAULT_TOP_K,
            variants: ModelVariant::ALL
                .iter()
                .map(|&variant| VariantConfig { variant, element_kind: None })
                .collect(),
            active: ModelVariant::Digits,
            filter: ResizeFilter::default(),
        }
    }
}

impl StudioConfig {
    /// Reads a config file written as JSON; missing fields take defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<StudioConfig> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| ClassifyError::io(path, e))?;
        let config: StudioConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(ClassifyError::InvalidTopK);
        }
        Ok(())
    }

    /// Model sources for every configured variant.
    pub fn sources(&self) -> Vec<ModelSource> {
        self.variants
            .iter()
            .map(|vc| {
                let src = ModelSource::in_dir(&self.models_dir, vc.variant);
                match vc.element_kind {
                    Some(kind) => src.with_element_kind(kind),
                    None => src,
                }
            })
            .collect()
    }
}
