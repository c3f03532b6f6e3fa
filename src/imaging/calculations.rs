//! Pure geometry for resize, pad and crop transforms.
//!
//! All functions here are pure and testable without any pixels. Scale factors
//! are computed in `f64`; pixel sizes are rounded half away from zero
//! (`f64::round`), and the same numbers drive both image and mask.

use super::params::{Anchor, ProportionMode};
use super::transform::TransformError;
use crate::resolution::Resolution;

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Everything needed to execute one transform, computed up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformPlan {
    pub mode: ProportionMode,
    /// Size the source is resampled to.
    pub scaled: Resolution,
    /// Final output size.
    pub output: Resolution,
    /// Top-left of the scaled image on the output canvas (pad modes).
    pub offset: (u32, u32),
    /// Window kept from the scaled image (crop mode).
    pub crop: Option<Rect>,
}

/// Reduce a dimension to the nearest multiple of `divisible_by` at or below it.
///
/// `0` and `1` leave the value untouched.
pub fn reduce_to_multiple(value: u32, divisible_by: u32) -> u32 {
    if divisible_by > 1 {
        value - value % divisible_by
    } else {
        value
    }
}

/// Apply the divisibility constraint to a requested target.
pub fn reduce_target(target: Resolution, divisible_by: u32) -> Result<Resolution, TransformError> {
    let reduced = Resolution::new(
        reduce_to_multiple(target.width, divisible_by),
        reduce_to_multiple(target.height, divisible_by),
    );
    if reduced.width == 0 || reduced.height == 0 {
        return Err(TransformError::InvalidTarget {
            width: target.width,
            height: target.height,
            divisible_by,
        });
    }
    Ok(reduced)
}

fn scale_dim(value: u32, scale: f64) -> u32 {
    (f64::from(value) * scale).round() as u32
}

/// Largest uniform scale of `source` that fits inside `target`.
///
/// Each scaled dimension is clamped to `1..=target` so rounding can never
/// collapse an axis or spill past the canvas.
pub fn fit_inside(source: Resolution, target: Resolution) -> Resolution {
    let scale = (f64::from(target.width) / f64::from(source.width))
        .min(f64::from(target.height) / f64::from(source.height));
    Resolution::new(
        scale_dim(source.width, scale).clamp(1, target.width),
        scale_dim(source.height, scale).clamp(1, target.height),
    )
}

/// Smallest uniform scale of `source` that covers `target`.
///
/// Each scaled dimension is at least the target, so the crop window always fits.
pub fn fill_cover(source: Resolution, target: Resolution) -> Resolution {
    let scale = (f64::from(target.width) / f64::from(source.width))
        .max(f64::from(target.height) / f64::from(source.height));
    Resolution::new(
        scale_dim(source.width, scale).max(target.width),
        scale_dim(source.height, scale).max(target.height),
    )
}

/// Offset along one axis for distributing `space` spare pixels.
///
/// `leading` anchors to offset 0, `trailing` anchors to `space`, anything else
/// splits evenly with the leading side rounded down.
fn axis_offset(space: u32, leading: bool, trailing: bool) -> u32 {
    if leading {
        0
    } else if trailing {
        space
    } else {
        space / 2
    }
}

/// Offset of an `inner` box inside an `outer` box for the given anchor.
///
/// Used both for placing a scaled image on a pad canvas and for choosing the
/// retained window when cropping; the anchor means the same edge in both.
pub fn anchor_offset(outer: Resolution, inner: Resolution, anchor: Anchor) -> (u32, u32) {
    let space_x = outer.width.saturating_sub(inner.width);
    let space_y = outer.height.saturating_sub(inner.height);
    (
        axis_offset(space_x, anchor == Anchor::Left, anchor == Anchor::Right),
        axis_offset(space_y, anchor == Anchor::Top, anchor == Anchor::Bottom),
    )
}

/// Compute the full geometry for transforming `source` under `mode`.
pub fn plan_transform(
    source: Resolution,
    target: Resolution,
    mode: ProportionMode,
    anchor: Anchor,
    divisible_by: u32,
) -> Result<TransformPlan, TransformError> {
    if source.width == 0 || source.height == 0 {
        return Err(TransformError::EmptyImage {
            width: source.width,
            height: source.height,
        });
    }
    let target = reduce_target(target, divisible_by)?;

    let plan = match mode {
        ProportionMode::Stretch => TransformPlan {
            mode,
            scaled: target,
            output: target,
            offset: (0, 0),
            crop: None,
        },
        ProportionMode::Resize => {
            let scaled = fit_inside(source, target);
            TransformPlan {
                mode,
                scaled,
                output: scaled,
                offset: (0, 0),
                crop: None,
            }
        }
        ProportionMode::Pad | ProportionMode::PadEdge => {
            let scaled = fit_inside(source, target);
            TransformPlan {
                mode,
                scaled,
                output: target,
                offset: anchor_offset(target, scaled, anchor),
                crop: None,
            }
        }
        ProportionMode::Crop => {
            let scaled = fill_cover(source, target);
            let (x, y) = anchor_offset(scaled, target, anchor);
            TransformPlan {
                mode,
                scaled,
                output: target,
                offset: (0, 0),
                crop: Some(Rect {
                    x,
                    y,
                    width: target.width,
                    height: target.height,
                }),
            }
        }
    };

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(width: u32, height: u32) -> Resolution {
        Resolution::new(width, height)
    }

    // =========================================================================
    // divisibility
    // =========================================================================

    #[test]
    fn reduce_rounds_down_only() {
        assert_eq!(reduce_to_multiple(1000, 64), 960);
        assert_eq!(reduce_to_multiple(1024, 64), 1024);
        assert_eq!(reduce_to_multiple(63, 64), 0);
    }

    #[test]
    fn reduce_disabled_for_zero_and_one() {
        assert_eq!(reduce_to_multiple(517, 0), 517);
        assert_eq!(reduce_to_multiple(517, 1), 517);
    }

    #[test]
    fn reduce_target_to_zero_is_invalid() {
        let err = reduce_target(res(512, 40), 64).unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidTarget {
                width: 512,
                height: 40,
                divisible_by: 64
            }
        );
    }

    #[test]
    fn zero_target_is_invalid_even_without_divisor() {
        assert!(reduce_target(res(0, 512), 1).is_err());
    }

    // =========================================================================
    // fit / fill
    // =========================================================================

    #[test]
    fn fit_wide_source_into_square() {
        // 1920x1080 → 512x512: scale = 512/1920, height = 288
        assert_eq!(fit_inside(res(1920, 1080), res(512, 512)), res(512, 288));
    }

    #[test]
    fn fit_tall_source_rounds_half_away() {
        // 300x1000 → 100x100: scale 0.1 → 30x100
        assert_eq!(fit_inside(res(300, 1000), res(100, 100)), res(30, 100));
        // 3x2 → 5x5: scale 5/3 → height 3.333 → 3
        assert_eq!(fit_inside(res(3, 2), res(5, 5)), res(5, 3));
        // 4x1 → 10x10: scale 2.5 → 10x2.5 → 10x3
        assert_eq!(fit_inside(res(4, 1), res(10, 10)), res(10, 3));
    }

    #[test]
    fn fit_never_collapses_an_axis() {
        assert_eq!(fit_inside(res(10_000, 1), res(64, 64)), res(64, 1));
    }

    #[test]
    fn fill_covers_target() {
        // 1920x1080 → 512x512: scale = 512/1080, width = 910.2 → 910
        assert_eq!(fill_cover(res(1920, 1080), res(512, 512)), res(910, 512));
        assert_eq!(fill_cover(res(600, 800), res(500, 400)), res(500, 667));
    }

    // =========================================================================
    // anchors
    // =========================================================================

    #[test]
    fn anchor_center_rounds_leading_down() {
        assert_eq!(anchor_offset(res(512, 512), res(512, 287), Anchor::Center), (0, 112));
    }

    #[test]
    fn anchor_edges() {
        let outer = res(100, 100);
        let inner = res(60, 30);
        assert_eq!(anchor_offset(outer, inner, Anchor::Top), (20, 0));
        assert_eq!(anchor_offset(outer, inner, Anchor::Bottom), (20, 70));
        assert_eq!(anchor_offset(outer, inner, Anchor::Left), (0, 35));
        assert_eq!(anchor_offset(outer, inner, Anchor::Right), (40, 35));
    }

    // =========================================================================
    // plan_transform
    // =========================================================================

    #[test]
    fn plan_stretch_is_exact_target() {
        let plan =
            plan_transform(res(640, 480), res(515, 300), ProportionMode::Stretch, Anchor::Center, 8)
                .unwrap();
        assert_eq!(plan.scaled, res(512, 296));
        assert_eq!(plan.output, res(512, 296));
        assert_eq!(plan.crop, None);
    }

    #[test]
    fn plan_resize_output_is_scaled_image() {
        let plan =
            plan_transform(res(1920, 1080), res(512, 512), ProportionMode::Resize, Anchor::Center, 8)
                .unwrap();
        assert_eq!(plan.output, res(512, 288));
        assert_eq!(plan.offset, (0, 0));
    }

    #[test]
    fn plan_pad_places_by_anchor() {
        let plan =
            plan_transform(res(1920, 1080), res(512, 512), ProportionMode::Pad, Anchor::Bottom, 8)
                .unwrap();
        assert_eq!(plan.scaled, res(512, 288));
        assert_eq!(plan.output, res(512, 512));
        assert_eq!(plan.offset, (0, 224));

        let plan =
            plan_transform(res(1080, 1920), res(512, 512), ProportionMode::PadEdge, Anchor::Center, 8)
                .unwrap();
        assert_eq!(plan.scaled, res(288, 512));
        assert_eq!(plan.offset, (112, 0));
    }

    #[test]
    fn plan_crop_window_by_anchor() {
        let center =
            plan_transform(res(1920, 1080), res(512, 512), ProportionMode::Crop, Anchor::Center, 8)
                .unwrap();
        assert_eq!(center.scaled, res(910, 512));
        assert_eq!(center.output, res(512, 512));
        assert_eq!(
            center.crop,
            Some(Rect {
                x: 199,
                y: 0,
                width: 512,
                height: 512
            })
        );

        let left =
            plan_transform(res(1920, 1080), res(512, 512), ProportionMode::Crop, Anchor::Left, 8)
                .unwrap();
        assert_eq!(left.crop.unwrap().x, 0);

        let right =
            plan_transform(res(1920, 1080), res(512, 512), ProportionMode::Crop, Anchor::Right, 8)
                .unwrap();
        assert_eq!(right.crop.unwrap().x, 398);
    }

    #[test]
    fn plan_crop_vertical_overflow() {
        let top =
            plan_transform(res(1000, 2000), res(400, 400), ProportionMode::Crop, Anchor::Top, 1)
                .unwrap();
        assert_eq!(top.scaled, res(400, 800));
        assert_eq!(top.crop.unwrap().y, 0);

        let bottom =
            plan_transform(res(1000, 2000), res(400, 400), ProportionMode::Crop, Anchor::Bottom, 1)
                .unwrap();
        assert_eq!(bottom.crop.unwrap().y, 400);
    }

    #[test]
    fn plan_empty_source_fails_for_every_mode() {
        for mode in ProportionMode::ALL {
            let err = plan_transform(res(0, 100), res(64, 64), mode, Anchor::Center, 8).unwrap_err();
            assert!(matches!(err, TransformError::EmptyImage { .. }));
        }
    }

    #[test]
    fn plan_checks_source_before_target() {
        let err =
            plan_transform(res(100, 0), res(0, 0), ProportionMode::Stretch, Anchor::Center, 8)
                .unwrap_err();
        assert!(matches!(err, TransformError::EmptyImage { .. }));
    }
}
