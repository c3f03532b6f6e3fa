//! Image transformation: stretch, resize, pad and crop to a target resolution.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Resample** | `imageops::resize` on `f32` buffers |
//! | **Crop** | `imageops::crop_imm` |
//! | **Pad** | solid canvas or edge replication |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a transform request
//! - **Transform**: Executes a plan on float pixels, with an optional mask
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining transform + backend

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
pub mod transform;

pub use backend::{BackendError, ImageBackend};
pub use calculations::{Rect, TransformPlan, plan_transform};
pub use operations::{TransformJob, TransformOutcome, get_dimensions, transform_file};
pub use params::{Anchor, PadColor, ProportionMode, ResampleFilter, TransformRequest};
pub use rust_backend::RustBackend;
pub use transform::{CanvasPixel, FloatImage, Mask, TransformError, Transformed, transform};
