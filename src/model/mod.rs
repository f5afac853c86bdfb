pub mod source;
pub mod variant;

pub use source::ModelSource;
pub use variant::ModelVariant;
