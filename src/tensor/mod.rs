pub mod output;
pub mod scaled;
pub mod shape;

pub use output::OutputTensor;
pub use scaled::{ElementKind, ScaledTensor, TensorData};
pub use shape::TensorShape;
