use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::error::{ClassifyError, Result};
use crate::model::ModelVariant;
use crate::pipeline::classifier::Classifier;

/// Loaded classifiers keyed by variant, plus the one currently selected.
///
/// Switching the active variant swaps the label table and model wholesale;
/// nothing is shared between variants. Classifiers are handed out as `Arc`s
/// so callers can run inference without holding on to the registry.
#[derive(Default)]
pub struct ModelRegistry {
    classifiers: BTreeMap<ModelVariant, Arc<Classifier>>,
    active: Option<ModelVariant>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a classifier. The first one added becomes active.
    pub fn insert(&mut self, classifier: Classifier) {
        let variant = classifier.variant();
        self.classifiers.insert(variant, Arc::new(classifier));
        if self.active.is_none() {
            self.active = Some(variant);
        }
    }

    pub fn activate(&mut self, variant: ModelVariant) -> Result<()> {
        if !self.classifiers.contains_key(&variant) {
            return Err(ClassifyError::VariantNotLoaded(variant));
        }
        if self.active != Some(variant) {
            info!(from = ?self.active, to = %variant, "switched active model");
        }
        self.active = Some(variant);
        Ok(())
    }

    pub fn active_variant(&self) -> Option<ModelVariant> {
        self.active
    }

    pub fn active(&self) -> Result<&Arc<Classifier>> {
        let variant = self.active.ok_or(ClassifyError::NoModelLoaded)?;
        self.get(variant)
    }

    pub fn get(&self, variant: ModelVariant) -> Result<&Arc<Classifier>> {
        self.classifiers
            .get(&variant)
            .ok_or(ClassifyError::VariantNotLoaded(variant))
    }

    pub fn variants(&self) -> impl Iterator<Item = ModelVariant> + '_ {
        self.classifiers.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }
}
