//! # PixelForge
//!
//! Target resolutions for generative image pipelines, and the transforms that
//! bring arbitrary images to them.
//!
//! Two independent pieces make up the core:
//!
//! ```text
//! 1. Enumerate   (aspect, orientation, step, max MP)  →  [Resolution]
//! 2. Transform   (image, mask?, target, mode, anchor) →  (image, mask, plan)
//! ```
//!
//! Enumeration lists every realisation of a preset aspect ratio whose sides
//! are multiples of a step and whose area fits a megapixel budget. The
//! transformer stretches, resizes, pads or crops an image (and an optional
//! mask, with identical geometry) to a target whose sides are first reduced to
//! a multiple of a divisibility constraint.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`resolution`] | Aspect ratios, orientation, `enumerate`, 1024² megapixel math |
//! | [`selection`] | Picker state: re-enumerates on every change and keeps or resets the selection |
//! | [`imaging`] | Transform geometry, pixel execution, `image`-crate backend, file operations |
//! | [`process`] | Batch transform of a directory on the rayon pool |
//! | [`config`] | `pixelforge.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Binary Megapixels
//!
//! One megapixel is 1024 × 1024 pixels everywhere in this crate, so a "1 MP"
//! budget admits 1024×1024 exactly. Diffusion models are trained on
//! power-of-two squares; the decimal million would exclude them.
//!
//! ## Geometry Before Pixels
//!
//! Every transform is first reduced to a [`imaging::TransformPlan`] by pure
//! functions in [`imaging::calculations`]. The pixel stage only executes the
//! plan, and executes it identically for the image and its mask. Output sizes
//! are therefore testable without decoding a single image.
//!
//! ## Float Pixels
//!
//! Transforms run on `f32` buffers from the `image` crate. Conversion from and
//! to 8-bit happens once at the file boundary in [`imaging::operations`].

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;
pub mod resolution;
pub mod selection;
