//! Tool configuration module.
//!
//! Handles loading, validating, and merging `pixelforge.toml`. Stock defaults
//! are serialized to a TOML table, the user file is merged on top, and the
//! result is deserialized and validated. Command-line flags are applied by the
//! binary after loading.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [resolution]
//! aspect_ratio = "3:2"      # 1:1 | 3:2 | 4:3 | 16:9 | 16:10
//! orientation = "landscape" # landscape | portrait | square (1:1 only)
//! divisible_by = 16         # Both dimensions are multiples of this
//! max_megapixels = 4.0      # In units of 1024 x 1024 pixels
//!
//! [resize]
//! width = 512
//! height = 512
//! mode = "resize"           # stretch | resize | pad | pad_edge | crop
//! anchor = "center"         # center | top | bottom | left | right
//! divisible_by = 8          # 0 or 1 disables the constraint
//! pad_color = "0, 0, 0"     # RGB fill for pad mode
//! filter = "lanczos"        # nearest-exact | bilinear | bicubic | lanczos
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Anchor, PadColor, ProportionMode, ResampleFilter, TransformRequest};
use crate::resolution::{AspectRatio, Orientation, Resolution};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = "pixelforge.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `pixelforge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Resolution enumeration settings.
    pub resolution: ResolutionConfig,
    /// Resize/pad/crop settings.
    pub resize: ResizeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution.divisible_by == 0 {
            return Err(ConfigError::Validation(
                "resolution.divisible_by must be positive".into(),
            ));
        }
        let mp = self.resolution.max_megapixels;
        if !mp.is_finite() || mp <= 0.0 {
            return Err(ConfigError::Validation(
                "resolution.max_megapixels must be a positive number".into(),
            ));
        }
        self.resolution
            .orientation
            .check(self.resolution.aspect_ratio)
            .map_err(|e| ConfigError::Validation(format!("resolution: {e}")))?;
        if self.resize.width == 0 || self.resize.height == 0 {
            return Err(ConfigError::Validation(
                "resize.width and resize.height must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Resolution enumeration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    pub aspect_ratio: AspectRatio,
    pub orientation: Orientation,
    pub divisible_by: u32,
    /// Upper bound in binary megapixels (1 MP = 1024 x 1024 pixels).
    pub max_megapixels: f64,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: AspectRatio::CLASSIC,
            orientation: Orientation::Landscape,
            divisible_by: 16,
            max_megapixels: 4.0,
        }
    }
}

/// Resize/pad/crop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResizeConfig {
    pub width: u32,
    pub height: u32,
    pub mode: ProportionMode,
    pub anchor: Anchor,
    pub divisible_by: u32,
    pub pad_color: PadColor,
    pub filter: ResampleFilter,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            mode: ProportionMode::Resize,
            anchor: Anchor::Center,
            divisible_by: 8,
            pad_color: PadColor::BLACK,
            filter: ResampleFilter::Lanczos,
        }
    }
}

impl ResizeConfig {
    pub fn to_request(&self) -> TransformRequest {
        TransformRequest::new(Resolution::new(self.width, self.height), self.mode)
            .anchor(self.anchor)
            .divisible_by(self.divisible_by)
            .pad_color(self.pad_color)
            .filter(self.filter)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, falling back to stock defaults when it is absent.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `pixelforge.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# PixelForge Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Command-line flags override anything set here.

# ---------------------------------------------------------------------------
# Resolution enumeration (`pixelforge resolutions`)
# ---------------------------------------------------------------------------
[resolution]
# One of "1:1", "3:2", "4:3", "16:9", "16:10".
aspect_ratio = "3:2"

# "landscape", "portrait", or "square" (square requires "1:1").
# Portrait swaps each landscape width/height pair.
orientation = "landscape"

# Both dimensions are multiples of this step. Common: 16, 32, 64.
divisible_by = 16

# Pixel-count ceiling in megapixels of 1024 x 1024 = 1,048,576 pixels.
# Presets: 1, 2, 4, 6, 8, 12, 16.
max_megapixels = 4.0

# ---------------------------------------------------------------------------
# Resize / pad / crop (`pixelforge resize`, `pixelforge batch`)
# ---------------------------------------------------------------------------
[resize]
# Requested target; each side is reduced to a multiple of divisible_by.
width = 512
height = 512

# stretch  - resample to the exact target, ignoring aspect ratio
# resize   - fit inside the target, output may be smaller on one side
# pad      - fit inside, fill the rest with pad_color
# pad_edge - fit inside, fill the rest by repeating edge pixels
# crop     - cover the target, trim the overflow
mode = "resize"

# Placement for pad/pad_edge and retained window for crop:
# "center", "top", "bottom", "left", "right".
anchor = "center"

# 0 or 1 disables the constraint.
divisible_by = 8

# RGB components 0-255.
pad_color = "0, 0, 0"

# "nearest-exact", "bilinear", "bicubic", "lanczos".
filter = "lanczos"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.resolution.aspect_ratio, AspectRatio::CLASSIC);
        assert_eq!(config.resolution.divisible_by, 16);
        assert_eq!(config.resolution.max_megapixels, 4.0);
        assert_eq!(config.resize.width, 512);
        assert_eq!(config.resize.mode, ProportionMode::Resize);
        assert_eq!(config.resize.divisible_by, 8);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[resize]
mode = "pad_edge"
anchor = "bottom"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resize.mode, ProportionMode::PadEdge);
        assert_eq!(config.resize.anchor, Anchor::Bottom);
        // Default values preserved
        assert_eq!(config.resize.width, 512);
        assert_eq!(config.resolution, ResolutionConfig::default());
    }

    #[test]
    fn parse_resolution_settings() {
        let toml = r#"
[resolution]
aspect_ratio = "16:9"
orientation = "portrait"
divisible_by = 64
max_megapixels = 2
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resolution.aspect_ratio, AspectRatio::WIDE);
        assert_eq!(config.resolution.orientation, Orientation::Portrait);
        assert_eq!(config.resolution.divisible_by, 64);
        assert_eq!(config.resolution.max_megapixels, 2.0);
    }

    #[test]
    fn parse_pad_color_and_filter() {
        let toml = r#"
[resize]
pad_color = "255, 255, 255"
filter = "nearest-exact"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.resize.pad_color, PadColor::new(255, 255, 255));
        assert_eq!(config.resize.filter, ResampleFilter::NearestExact);
    }

    #[test]
    fn invalid_enum_values_rejected() {
        for toml in [
            "[resolution]\naspect_ratio = \"21:9\"",
            "[resolution]\norientation = \"diagonal\"",
            "[resize]\nmode = \"fill\"",
            "[resize]\nanchor = \"middle\"",
            "[resize]\npad_color = \"0, 0\"",
            "[resize]\nfilter = \"area\"",
        ] {
            assert!(toml::from_str::<Config>(toml).is_err(), "{toml} should fail");
        }
    }

    #[test]
    fn resize_config_to_request() {
        let resize = ResizeConfig {
            width: 1024,
            height: 768,
            mode: ProportionMode::Crop,
            anchor: Anchor::Top,
            divisible_by: 64,
            pad_color: PadColor::new(1, 2, 3),
            filter: ResampleFilter::Bicubic,
        };
        let req = resize.to_request();
        assert_eq!(req.target, Resolution::new(1024, 768));
        assert_eq!(req.mode, ProportionMode::Crop);
        assert_eq!(req.anchor, Anchor::Top);
        assert_eq!(req.divisible_by, 64);
        assert_eq!(req.pad_color, PadColor::new(1, 2, 3));
        assert_eq!(req.filter, ResampleFilter::Bicubic);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            r#"
[resize]
width = 1024

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.resize.width, 1024);
        assert_eq!(config.resize.height, 512);
        assert_eq!(config.processing.max_processes, Some(2));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[resize]\nqualty = 90\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        assert!(toml::from_str::<Config>("[thumbnails]\nsize = 1").is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[resolution]\norientation = \"square\"\n").unwrap();
        // default ratio is 3:2, so square orientation is invalid
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_step() {
        let mut config = Config::default();
        config.resolution.divisible_by = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_megapixels() {
        for mp in [0.0, -2.0, f64::NAN] {
            let mut config = Config::default();
            config.resolution.max_megapixels = mp;
            assert!(config.validate().is_err(), "{mp} should fail");
        }
    }

    #[test]
    fn validate_zero_resize_target() {
        let mut config = Config::default();
        config.resize.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_allows_zero_resize_divisor() {
        let mut config = Config::default();
        config.resize.divisible_by = 0;
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let threads = effective_threads(&ProcessingConfig {
            max_processes: None,
        });
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let threads = effective_threads(&ProcessingConfig {
            max_processes: Some(99999),
        });
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(threads, cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("width = 512").unwrap();
        let overlay: toml::Value = toml::from_str("width = 768").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("width").unwrap().as_integer(), Some(768));
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str("[resize]\nwidth = 512\nheight = 512").unwrap();
        let overlay: toml::Value = toml::from_str("[resize]\nheight = 256").unwrap();
        let merged = merge_toml(base, overlay);
        let resize = merged.get("resize").unwrap();
        assert_eq!(resize.get("width").unwrap().as_integer(), Some(512));
        assert_eq!(resize.get("height").unwrap().as_integer(), Some(256));
    }

    // =========================================================================
    // stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value().unwrap();
        for section in ["resolution", "resize", "processing"] {
            assert!(value.get(section).is_some(), "missing [{section}]");
        }
    }
}
