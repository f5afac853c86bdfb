pub mod scale;

pub use scale::{decode_image, fit_within, scale, scale_for, scale_with_filter, ResizeFilter, TargetSize};
