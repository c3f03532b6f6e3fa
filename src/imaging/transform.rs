//! Pixel-level execution of a [`TransformPlan`].
//!
//! Images are float buffers (`Rgb<f32>` or `Rgba<f32>`, samples nominally in
//! `[0, 1]`); masks are `Luma<f32>` buffers of the same spatial size. Every
//! resample, pad and crop applied to the image is applied to the mask with
//! identical numbers. Mask padding is always `0`, whatever the image fill.
//!
//! Inputs are borrowed and never modified; each call allocates fresh output
//! buffers, so concurrent calls on shared inputs are safe.

use super::calculations::{TransformPlan, plan_transform};
use super::params::{PadColor, ProportionMode, ResampleFilter, TransformRequest};
use crate::resolution::Resolution;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma, Pixel, Rgb, Rgba};
use thiserror::Error;

/// Single-channel mask co-transformed with an image.
pub type Mask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Float image with pixel type `P`.
pub type FloatImage<P> = ImageBuffer<P, Vec<f32>>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("source image is empty ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("target {width}x{height} has no positive size divisible by {divisible_by}")]
    InvalidTarget {
        width: u32,
        height: u32,
        divisible_by: u32,
    },
    #[error("unsupported {option}: {value}")]
    UnsupportedOption {
        option: &'static str,
        value: String,
    },
    #[error("invalid pad color '{0}' (expected \"r, g, b\" with components 0-255)")]
    InvalidPadColor(String),
    #[error("mask is {mask_width}x{mask_height} but image is {image_width}x{image_height}")]
    MaskMismatch {
        image_width: u32,
        image_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
}

/// Float pixel types that can be filled with a pad colour.
pub trait CanvasPixel: Pixel<Subpixel = f32> + 'static {
    fn from_pad_color(color: PadColor) -> Self;
}

impl CanvasPixel for Rgb<f32> {
    fn from_pad_color(color: PadColor) -> Self {
        Rgb(color.to_unit())
    }
}

impl CanvasPixel for Rgba<f32> {
    fn from_pad_color(color: PadColor) -> Self {
        let [r, g, b] = color.to_unit();
        Rgba([r, g, b, 1.0])
    }
}

/// How the uncovered canvas area is filled.
#[derive(Debug, Clone, Copy)]
enum Fill<P> {
    Solid(P),
    Edge,
}

/// Result of [`transform`].
#[derive(Debug, Clone)]
pub struct Transformed<P: Pixel<Subpixel = f32>> {
    pub image: FloatImage<P>,
    pub mask: Option<Mask>,
    pub plan: TransformPlan,
}

impl<P: Pixel<Subpixel = f32>> Transformed<P> {
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.image.width(), self.image.height())
    }
}

/// Transform `image` (and `mask`, if any) to the requested geometry.
pub fn transform<P: CanvasPixel>(
    image: &FloatImage<P>,
    mask: Option<&Mask>,
    request: &TransformRequest,
) -> Result<Transformed<P>, TransformError> {
    let source = Resolution::new(image.width(), image.height());
    let plan = plan_transform(
        source,
        request.target,
        request.mode,
        request.anchor,
        request.divisible_by,
    )?;

    if let Some(mask) = mask.filter(|m| m.dimensions() != image.dimensions()) {
        return Err(TransformError::MaskMismatch {
            image_width: image.width(),
            image_height: image.height(),
            mask_width: mask.width(),
            mask_height: mask.height(),
        });
    }

    let image_fill = match request.mode {
        ProportionMode::PadEdge => Fill::Edge,
        _ => Fill::Solid(P::from_pad_color(request.pad_color)),
    };

    Ok(Transformed {
        image: apply_plan(image, &plan, request.filter, image_fill),
        mask: mask.map(|m| apply_plan(m, &plan, request.filter, Fill::Solid(Luma([0.0])))),
        plan,
    })
}

fn apply_plan<P>(
    buffer: &FloatImage<P>,
    plan: &TransformPlan,
    filter: ResampleFilter,
    fill: Fill<P>,
) -> FloatImage<P>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    let scaled = resample(buffer, plan.scaled, filter.filter_type());
    match plan.mode {
        ProportionMode::Stretch | ProportionMode::Resize => scaled,
        ProportionMode::Pad | ProportionMode::PadEdge => {
            place_on_canvas(&scaled, plan.output, plan.offset, fill)
        }
        ProportionMode::Crop => match plan.crop {
            Some(rect) => {
                imageops::crop_imm(&scaled, rect.x, rect.y, rect.width, rect.height).to_image()
            }
            None => scaled,
        },
    }
}

fn resample<P>(buffer: &FloatImage<P>, size: Resolution, filter: FilterType) -> FloatImage<P>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    if buffer.dimensions() == (size.width, size.height) {
        return buffer.clone();
    }
    imageops::resize(buffer, size.width, size.height, filter)
}

/// Place `src` at `offset` on a canvas of `canvas` size.
///
/// With [`Fill::Edge`] each outside pixel copies the nearest pixel of `src`,
/// so corners take the corner pixel.
fn place_on_canvas<P>(
    src: &FloatImage<P>,
    canvas: Resolution,
    offset: (u32, u32),
    fill: Fill<P>,
) -> FloatImage<P>
where
    P: Pixel<Subpixel = f32> + 'static,
{
    let (ox, oy) = offset;
    let (sw, sh) = src.dimensions();
    ImageBuffer::from_fn(canvas.width, canvas.height, |x, y| {
        let inside = x >= ox && x < ox + sw && y >= oy && y < oy + sh;
        if inside {
            return *src.get_pixel(x - ox, y - oy);
        }
        match fill {
            Fill::Solid(pixel) => pixel,
            Fill::Edge => {
                let sx = x.saturating_sub(ox).min(sw - 1);
                let sy = y.saturating_sub(oy).min(sh - 1);
                *src.get_pixel(sx, sy)
            }
        }
    })
}
