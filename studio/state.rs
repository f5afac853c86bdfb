use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use sketch_nn::{Classifier, ModelRegistry, StudioConfig, TallyStore};

/// Everything the request handlers share.
pub struct StudioState {
    /// Loaded classifiers and the active variant.
    pub registry: ModelRegistry,
    /// Feedback tally backing `/feedback` and `/stats`.
    pub tally: TallyStore,
    /// Default number of ranked candidates per response.
    pub top_k: usize,
}

impl StudioState {
    /// Loads every configured variant. Variants whose files are missing or
    /// invalid are skipped with a warning so the rest stay usable.
    pub fn from_config(config: &StudioConfig) -> Self {
        let mut registry = ModelRegistry::new();
        for source in config.sources() {
            match Classifier::load(&source, config.top_k) {
                Ok(classifier) => registry.insert(classifier.with_filter(config.filter)),
                Err(e) => warn!(variant = %source.variant, error = %e, "model not loaded"),
            }
        }
        if let Err(e) = registry.activate(config.active) {
            warn!(error = %e, "configured active model unavailable");
        }
        info!(
            loaded = registry.variants().count(),
            active = ?registry.active_variant(),
            "studio state ready"
        );
        StudioState {
            registry,
            tally: TallyStore::new(config.stats_path.clone()),
            top_k: config.top_k,
        }
    }
}

/// `Arc<Mutex<StudioState>>` passed to every handler.
pub type SharedState = Arc<Mutex<StudioState>>;

/// Locks the state, recovering the guard if a previous handler panicked.
pub fn lock(state: &SharedState) -> MutexGuard<'_, StudioState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
