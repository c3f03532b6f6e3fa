//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Resolutions
//!
//! ```text
//! 3:2 landscape, divisible by 16, up to 4 MP
//! 001 48×32 (0.0015 MP)
//! 002 96×64 (0.0059 MP)
//! ...
//! ```
//!
//! ## Resize
//!
//! ```text
//! photo.jpg → photo-512.png
//!     Mode: pad (center)
//!     Size: 1920×1080 → 512×512
//! ```
//!
//! ## Batch
//!
//! ```text
//! Transforming 3 images
//!     001 wide.png: 1920×1080 → 512×512
//!     002 broken.png: failed: Failed to decode ...
//! ```

use crate::imaging::{ProportionMode, TransformRequest};
use crate::imaging::operations::TransformOutcome;
use crate::process::ProcessEvent;
use crate::resolution::{AspectRatio, Orientation, ResolutionInfo};
use crate::selection::Choice;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn format_megapixels(mp: f64) -> String {
    let rounded = (mp * 10_000.0).round() / 10_000.0;
    format!("{} MP", rounded)
}

pub fn format_resolution_list(
    aspect: AspectRatio,
    orientation: Orientation,
    divisible_by: u32,
    max_megapixels: f64,
    choices: &[Choice],
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}, divisible by {}, up to {}",
        aspect,
        orientation,
        divisible_by,
        format_megapixels(max_megapixels)
    )];
    for (i, choice) in choices.iter().enumerate() {
        lines.push(match choice.resolution() {
            Some(r) => format!(
                "{} {} ({})",
                format_index(i + 1),
                r,
                format_megapixels(r.megapixels())
            ),
            None => choice.to_string(),
        });
    }
    lines
}

pub fn print_resolution_list(
    aspect: AspectRatio,
    orientation: Orientation,
    divisible_by: u32,
    max_megapixels: f64,
    choices: &[Choice],
) {
    for line in format_resolution_list(aspect, orientation, divisible_by, max_megapixels, choices)
    {
        println!("{}", line);
    }
}

pub fn format_resolution_info(info: &ResolutionInfo) -> Vec<String> {
    vec![
        format!("{}×{}", info.width, info.height),
        format!("{}Ratio: {}:{}", indent(1), info.ratio_w, info.ratio_h),
        format!("{}Orientation: {}", indent(1), info.orientation),
        format!("{}Megapixels: {}", indent(1), info.total_megapixels),
    ]
}

pub fn print_resolution_info(info: &ResolutionInfo) {
    for line in format_resolution_info(info) {
        println!("{}", line);
    }
}

pub fn format_transform_output(
    source: &str,
    output: &str,
    request: &TransformRequest,
    outcome: &TransformOutcome,
) -> Vec<String> {
    let mode = if request.mode.is_pad() || request.mode == ProportionMode::Crop {
        format!("{} ({})", request.mode, request.anchor)
    } else {
        request.mode.to_string()
    };
    vec![
        format!("{} → {}", source, output),
        format!("{}Mode: {}", indent(1), mode),
        format!(
            "{}Size: {} → {}",
            indent(1),
            outcome.source_size,
            outcome.output_size
        ),
    ]
}

pub fn print_transform_output(
    source: &str,
    output: &str,
    request: &TransformRequest,
    outcome: &TransformOutcome,
) {
    for line in format_transform_output(source, output, request, outcome) {
        println!("{}", line);
    }
}

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Started { total } => {
            let noun = if *total == 1 { "image" } else { "images" };
            vec![format!("Transforming {} {}", total, noun)]
        }
        ProcessEvent::Transformed {
            index,
            source,
            source_size,
            output_size,
            ..
        } => vec![format!(
            "{}{} {}: {} → {}",
            indent(1),
            format_index(*index),
            source,
            source_size,
            output_size
        )],
        ProcessEvent::Failed {
            index,
            source,
            error,
        } => vec![format!(
            "{}{} {}: failed: {}",
            indent(1),
            format_index(*index),
            source,
            error
        )],
    }
}
