//! Parameter types for image transforms.
//!
//! These describe *what* to do with an image, not *how*. The geometry in
//! [`calculations`](super::calculations) and the pixel work in
//! [`transform`](super::transform) both consume them.
//!
//! ## Types
//!
//! - [`ProportionMode`]: how a source aspect ratio is reconciled with the target.
//! - [`Anchor`]: which edge wins when padding or cropping is asymmetric.
//! - [`PadColor`]: flat RGB fill for `pad` mode, parsed from `"r, g, b"`.
//! - [`ResampleFilter`]: interpolation used for every resample.
//! - [`TransformRequest`]: the full set of options for one transform call.

use super::transform::TransformError;
use crate::resolution::Resolution;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProportionMode {
    /// Resample straight to the target, ignoring aspect ratio.
    Stretch,
    /// Fit inside the target; output may be smaller on one axis.
    #[default]
    Resize,
    /// Fit inside the target, then fill the rest with a flat colour.
    Pad,
    /// Fit inside the target, then fill by replicating edge pixels.
    PadEdge,
    /// Cover the target, then trim the overflowing axis.
    Crop,
}

impl ProportionMode {
    pub const ALL: [Self; 5] = [
        Self::Stretch,
        Self::Resize,
        Self::Pad,
        Self::PadEdge,
        Self::Crop,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Resize => "resize",
            Self::Pad => "pad",
            Self::PadEdge => "pad_edge",
            Self::Crop => "crop",
        }
    }

    pub fn is_pad(self) -> bool {
        matches!(self, Self::Pad | Self::PadEdge)
    }
}

impl fmt::Display for ProportionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProportionMode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TransformError::UnsupportedOption {
                option: "mode",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
}

impl Anchor {
    pub const ALL: [Self; 5] = [
        Self::Center,
        Self::Top,
        Self::Bottom,
        Self::Left,
        Self::Right,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == s)
            .ok_or_else(|| TransformError::UnsupportedOption {
                option: "anchor",
                value: s.to_string(),
            })
    }
}

/// Flat fill colour as 8-bit RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PadColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PadColor {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components scaled to `[0, 1]`.
    pub fn to_unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.r, self.g, self.b)
    }
}

impl FromStr for PadColor {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TransformError::InvalidPadColor(s.to_string());
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts[..] {
            [r, g, b] => Ok(Self { r, g, b }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for PadColor {
    type Error = TransformError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PadColor> for String {
    fn from(color: PadColor) -> Self {
        color.to_string()
    }
}

/// Interpolation used when resampling image and mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    NearestExact,
    Bilinear,
    Bicubic,
    #[default]
    Lanczos,
}

impl ResampleFilter {
    pub const ALL: [Self; 4] = [
        Self::NearestExact,
        Self::Bilinear,
        Self::Bicubic,
        Self::Lanczos,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NearestExact => "nearest-exact",
            Self::Bilinear => "bilinear",
            Self::Bicubic => "bicubic",
            Self::Lanczos => "lanczos",
        }
    }

    pub fn filter_type(self) -> FilterType {
        match self {
            Self::NearestExact => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
            Self::Bicubic => FilterType::CatmullRom,
            Self::Lanczos => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResampleFilter {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s)
            .ok_or_else(|| TransformError::UnsupportedOption {
                option: "filter",
                value: s.to_string(),
            })
    }
}

/// Full specification for one transform call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformRequest {
    pub target: Resolution,
    pub mode: ProportionMode,
    pub anchor: Anchor,
    /// `0` and `1` both disable the divisibility constraint.
    pub divisible_by: u32,
    pub pad_color: PadColor,
    pub filter: ResampleFilter,
}

impl TransformRequest {
    pub fn new(target: Resolution, mode: ProportionMode) -> Self {
        Self {
            target,
            mode,
            anchor: Anchor::default(),
            divisible_by: 8,
            pad_color: PadColor::BLACK,
            filter: ResampleFilter::default(),
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn divisible_by(mut self, divisible_by: u32) -> Self {
        self.divisible_by = divisible_by;
        self
    }

    pub fn pad_color(mut self, pad_color: PadColor) -> Self {
        self.pad_color = pad_color;
        self
    }

    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = filter;
        self
    }
}
