pub mod studio_config;

pub use studio_config::{StudioConfig, VariantConfig};
