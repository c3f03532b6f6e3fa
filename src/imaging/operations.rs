//! High-level image operations.
//!
//! These functions combine the backend with the pure transform: load a file,
//! convert it to the float buffers the transform works on, run the transform,
//! convert back and save.

use super::backend::{BackendError, ImageBackend};
use super::params::TransformRequest;
use super::transform::{Mask, Transformed, TransformError, transform};
use crate::resolution::Resolution;
use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Resolution> {
    Ok(backend.identify(path)?)
}

/// Paths for one file transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub mask: Option<PathBuf>,
    pub mask_output: Option<PathBuf>,
}

impl TransformJob {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            mask: None,
            mask_output: None,
        }
    }

    pub fn with_mask(mut self, mask: impl Into<PathBuf>, mask_output: impl Into<PathBuf>) -> Self {
        self.mask = Some(mask.into());
        self.mask_output = Some(mask_output.into());
        self
    }
}

/// What a file transform produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutcome {
    pub source_size: Resolution,
    pub output_size: Resolution,
}

/// Run one transform in memory on a decoded image.
///
/// Images with an alpha channel keep it; everything else is processed as RGB.
pub fn transform_dynamic(
    image: &DynamicImage,
    mask: Option<&Mask>,
    request: &TransformRequest,
) -> std::result::Result<(DynamicImage, Option<Mask>), TransformError> {
    if image.color().has_alpha() {
        let Transformed { image, mask, .. } = transform(&image.to_rgba32f(), mask, request)?;
        Ok((DynamicImage::ImageRgba32F(image).into_rgba8().into(), mask))
    } else {
        let Transformed { image, mask, .. } = transform(&image.to_rgb32f(), mask, request)?;
        Ok((DynamicImage::ImageRgb32F(image).into_rgb8().into(), mask))
    }
}

/// Decode a grayscale mask into `[0, 1]` samples.
pub fn mask_from_image(image: &DynamicImage) -> Mask {
    image.to_luma32f()
}

/// Quantize a mask to 8-bit grayscale for saving.
pub fn mask_to_image(mask: &Mask) -> DynamicImage {
    let gray: GrayImage = ImageBuffer::from_fn(mask.width(), mask.height(), |x, y| {
        let v = mask.get_pixel(x, y).0[0].clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    });
    DynamicImage::ImageLuma8(gray)
}

/// Load, transform and save one image (and its mask, if the job has one).
pub fn transform_file(
    backend: &impl ImageBackend,
    job: &TransformJob,
    request: &TransformRequest,
) -> Result<TransformOutcome> {
    let image = backend.load(&job.source)?;
    let mask = match &job.mask {
        Some(path) => Some(mask_from_image(&backend.load(path)?)),
        None => None,
    };
    let source_size = Resolution::new(image.width(), image.height());

    debug!(
        source = %job.source.display(),
        %source_size,
        target = %request.target,
        mode = %request.mode,
        anchor = %request.anchor,
        "transforming image"
    );

    let (out, out_mask) = transform_dynamic(&image, mask.as_ref(), request)?;
    backend.save(&out, &job.output)?;

    if let (Some(mask), Some(path)) = (out_mask, &job.mask_output) {
        backend.save(&mask_to_image(&mask), path)?;
    }

    Ok(TransformOutcome {
        source_size,
        output_size: Resolution::new(out.width(), out.height()),
    })
}
