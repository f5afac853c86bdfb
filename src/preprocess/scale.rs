//! Canvas-to-tensor preprocessing.
//!
//! A captured drawing is stretched to the model's input size, the first
//! `channels` colour components of every pixel are read in R, G, B order
//! (alpha is always dropped), and the result is packed into a flat NHWC
//! buffer with batch size 1.

use std::borrow::Cow;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClassifyError, Result};
use crate::model::variant::ModelVariant;
use crate::tensor::{ElementKind, ScaledTensor, TensorData, TensorShape};

const MAX_COLOR_COMPONENTS: usize = 3;
const MAX_RGB_VALUE: f32 = 255.0;

/// Width, height and channel count a model expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
    pub channels: usize,
}

impl TargetSize {
    pub fn new(width: u32, height: u32, channels: usize) -> Self {
        TargetSize { width, height, channels }
    }

    /// Tensor shape with batch size 1.
    pub fn shape(&self) -> TensorShape {
        TensorShape::new(1, self.height as usize, self.width as usize, self.channels)
    }
}

/// Resampling filter used when stretching the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(f: ResizeFilter) -> Self {
        match f {
            ResizeFilter::Nearest    => FilterType::Nearest,
            ResizeFilter::Triangle   => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian   => FilterType::Gaussian,
            ResizeFilter::Lanczos3   => FilterType::Lanczos3,
        }
    }
}

/// Scales `image` into a `1 × height × width × channels` tensor using the
/// default resampling filter.
///
/// With `quantized == false` every component is divided by 255 so values lie
/// in [0.0, 1.0]; with `quantized == true` the raw bytes are kept.
pub fn scale(image: &DynamicImage, target: TargetSize, quantized: bool) -> Result<ScaledTensor> {
    scale_with_filter(image, target, quantized, ResizeFilter::default())
}

/// Scales `image` to the input size of `variant`.
pub fn scale_for(image: &DynamicImage, variant: ModelVariant, kind: ElementKind) -> Result<ScaledTensor> {
    scale(image, variant.target_size(), kind.is_quantized())
}

/// Same as [`scale`] with an explicit resampling filter.
pub fn scale_with_filter(
    image: &DynamicImage,
    target: TargetSize,
    quantized: bool,
    filter: ResizeFilter,
) -> Result<ScaledTensor> {
    let (src_w, src_h) = image.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(ClassifyError::InvalidTargetSize { width: src_w, height: src_h });
    }
    if target.width == 0 || target.height == 0 {
        return Err(ClassifyError::InvalidTargetSize { width: target.width, height: target.height });
    }

    let available = image.color().channel_count() as usize;
    if target.channels == 0 || target.channels > MAX_COLOR_COMPONENTS || target.channels > available {
        return Err(ClassifyError::UnsupportedChannelCount {
            requested: target.channels,
            available: available.min(MAX_COLOR_COMPONENTS),
        });
    }

    let resized = image
        .resize_exact(target.width, target.height, filter.into())
        .to_rgba8();

    // Walk RGBA pixels row-major and keep the leading colour components.
    let components = resized
        .pixels()
        .flat_map(|p| p.0.into_iter().take(target.channels));

    let data = if quantized {
        TensorData::Quantized(components.collect())
    } else {
        TensorData::Float(components.map(|c| c as f32 / MAX_RGB_VALUE).collect())
    };

    debug!(
        src_w, src_h,
        width = target.width, height = target.height, channels = target.channels,
        quantized, "scaled canvas image"
    );
    ScaledTensor::new(target.shape(), data)
}

/// Decodes PNG/JPEG/BMP/GIF bytes.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(ClassifyError::ImageMissing);
    }
    image::load_from_memory(bytes).map_err(|e| ClassifyError::ImageDecode(e.to_string()))
}

/// Shrinks `image` to fit within `max_width × max_height`, preserving the
/// aspect ratio. Images that already fit are borrowed unchanged.
pub fn fit_within(image: &DynamicImage, max_width: u32, max_height: u32) -> Cow<'_, DynamicImage> {
    let (w, h) = image.dimensions();
    if w <= max_width && h <= max_height {
        return Cow::Borrowed(image);
    }
    Cow::Owned(image.resize(max_width, max_height, FilterType::Lanczos3))
}
