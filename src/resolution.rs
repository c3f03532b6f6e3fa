//! Resolution enumeration under aspect-ratio, divisibility and megapixel limits.
//!
//! Every resolution produced here is a realisation of a preset aspect ratio
//! scaled by a multiple of the divisibility step:
//!
//! ```text
//! k = step, 2·step, 3·step, …
//! (w, h) = (ratio_w · k, ratio_h · k)      while w · h ≤ max_megapixels · 1024²
//! ```
//!
//! ## Megapixel Base
//!
//! Megapixels are counted in units of 1024 × 1024 = 1,048,576 pixels, not the
//! decimal million. A "1 MP" limit therefore admits 1024×1024 exactly.
//!
//! ## Orientation
//!
//! Enumeration always runs on the landscape realisation of the ratio. Portrait
//! output swaps each realised `(w, h)` pair; the ratio itself is never swapped.
//! Square orientation is only defined for 1:1.
//!
//! All functions here are pure: identical inputs produce identical,
//! identically ordered output.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Pixels in one megapixel (binary base).
pub const MP_BASE: u64 = 1024 * 1024;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("unknown aspect ratio '{0}' (expected one of 1:1, 3:2, 4:3, 16:9, 16:10)")]
    InvalidAspectRatio(String),
    #[error("unsupported {option}: {value}")]
    UnsupportedOption {
        option: &'static str,
        value: String,
    },
    #[error("divisibility step must be positive")]
    InvalidStep,
    #[error("megapixel limit must be a positive number, got {0}")]
    InvalidMegapixels(f64),
    #[error("cannot parse megapixel label '{0}' (expected e.g. \"4 MP\")")]
    InvalidMegapixelLabel(String),
    #[error("cannot parse resolution '{0}' (expected WIDTH×HEIGHT)")]
    InvalidResolution(String),
}

/// One of the preset aspect ratios, stored as `(w_ratio, h_ratio)`.
///
/// Only the presets listed in [`AspectRatio::ALL`] can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AspectRatio {
    w: u32,
    h: u32,
}

impl AspectRatio {
    pub const SQUARE: Self = Self { w: 1, h: 1 };
    pub const CLASSIC: Self = Self { w: 3, h: 2 };
    pub const STANDARD: Self = Self { w: 4, h: 3 };
    pub const WIDE: Self = Self { w: 16, h: 9 };
    pub const WIDE_DISPLAY: Self = Self { w: 16, h: 10 };

    /// Presets in display order.
    pub const ALL: [Self; 5] = [
        Self::SQUARE,
        Self::CLASSIC,
        Self::STANDARD,
        Self::WIDE,
        Self::WIDE_DISPLAY,
    ];

    pub fn w_ratio(self) -> u32 {
        self.w
    }

    pub fn h_ratio(self) -> u32 {
        self.h
    }

    pub fn is_square(self) -> bool {
        self.w == self.h
    }

    /// Preset key, e.g. `"16:9"`.
    pub fn key(self) -> String {
        format!("{}:{}", self.w, self.h)
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::CLASSIC
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.w, self.h)
    }
}

impl FromStr for AspectRatio {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|ratio| ratio.key() == key)
            .ok_or_else(|| ResolutionError::InvalidAspectRatio(key.to_string()))
    }
}

impl TryFrom<String> for AspectRatio {
    type Error = ResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AspectRatio> for String {
    fn from(ratio: AspectRatio) -> Self {
        ratio.key()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Landscape => "landscape",
            Orientation::Portrait => "portrait",
            Orientation::Square => "square",
        }
    }

    /// Square orientation is only meaningful for a 1:1 ratio.
    pub fn check(self, aspect: AspectRatio) -> Result<(), ResolutionError> {
        if self == Orientation::Square && !aspect.is_square() {
            return Err(ResolutionError::UnsupportedOption {
                option: "orientation",
                value: format!("square with aspect ratio {aspect}"),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "landscape" => Ok(Orientation::Landscape),
            "portrait" => Ok(Orientation::Portrait),
            "square" => Ok(Orientation::Square),
            other => Err(ResolutionError::UnsupportedOption {
                option: "orientation",
                value: other.to_string(),
            }),
        }
    }
}

/// A target size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixels(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Pixel count in binary megapixels.
    pub fn megapixels(self) -> f64 {
        self.pixels() as f64 / MP_BASE as f64
    }

    pub fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.width, self.height)
    }
}

impl FromStr for Resolution {
    type Err = ResolutionError;

    /// Accepts `1024×768` as displayed, or an ASCII `1024x768`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionError::InvalidResolution(s.to_string());
        let (w, h) = s
            .trim()
            .split_once(['×', 'x', 'X'])
            .ok_or_else(invalid)?;
        let width: u32 = w.trim().parse().map_err(|_| invalid())?;
        let height: u32 = h.trim().parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Self { width, height })
    }
}

/// Largest pixel count admitted by a megapixel limit.
///
/// Pixel counts are integers, so `total ≤ mp · 1024²` is the same test as
/// `total ≤ floor(mp · 1024²)`.
pub fn max_pixels(max_megapixels: f64) -> Result<u64, ResolutionError> {
    if !max_megapixels.is_finite() || max_megapixels <= 0.0 {
        return Err(ResolutionError::InvalidMegapixels(max_megapixels));
    }
    Ok((max_megapixels * MP_BASE as f64).floor() as u64)
}

/// Enumerate every valid resolution for the given constraints.
///
/// Output is strictly increasing in pixel count. An empty vector means no
/// resolution satisfies the constraints; callers must surface that rather than
/// treat it as an error.
pub fn enumerate(
    aspect: AspectRatio,
    orientation: Orientation,
    divisible_by: u32,
    max_megapixels: f64,
) -> Result<Vec<Resolution>, ResolutionError> {
    if divisible_by == 0 {
        return Err(ResolutionError::InvalidStep);
    }
    orientation.check(aspect)?;
    let limit = max_pixels(max_megapixels)?;

    let rw = u64::from(aspect.w);
    let rh = u64::from(aspect.h);
    let step = u64::from(divisible_by);

    // k² · rw · rh ≤ limit bounds the multiplier
    let max_k = ((limit / (rw * rh)) as f64).sqrt().floor() as u64 + 1;

    let mut resolutions = Vec::new();
    let mut k = step;
    while k <= max_k {
        // both sides fit u32, so their product fits u64
        let (Ok(width), Ok(height)) = (u32::try_from(rw * k), u32::try_from(rh * k)) else {
            break;
        };
        if u64::from(width) * u64::from(height) > limit {
            break;
        }
        let landscape = Resolution::new(width, height);
        resolutions.push(match orientation {
            Orientation::Portrait => landscape.swapped(),
            Orientation::Landscape | Orientation::Square => landscape,
        });
        k += step;
    }

    Ok(resolutions)
}

/// Everything reported about a chosen resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionInfo {
    pub width: u32,
    pub height: u32,
    pub ratio_w: u32,
    pub ratio_h: u32,
    pub orientation: Orientation,
    /// Binary megapixels rounded to 4 decimals.
    pub total_megapixels: f64,
}

impl ResolutionInfo {
    pub fn new(resolution: Resolution, aspect: AspectRatio, orientation: Orientation) -> Self {
        Self {
            width: resolution.width,
            height: resolution.height,
            ratio_w: aspect.w,
            ratio_h: aspect.h,
            orientation,
            total_megapixels: (resolution.megapixels() * 10_000.0).round() / 10_000.0,
        }
    }
}
