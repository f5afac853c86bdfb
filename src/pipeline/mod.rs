pub mod classifier;
pub mod registry;

pub use classifier::{BoxedRuntime, Classifier, DEFAULT_TOP_K};
pub use registry::ModelRegistry;
