//! Host-side resolution picker state.
//!
//! A [`ResolutionSelector`] holds the four enumeration parameters, the list
//! of choices they produce, and the current selection. Every setter changes
//! one parameter and re-enumerates immediately, then reconciles the selection:
//! the previous choice survives if it is still in the new list, otherwise the
//! first entry is selected. An empty enumeration becomes the single
//! [`Choice::Invalid`] sentinel.
//!
//! ```text
//! set_aspect(16:9) ─┐
//! set_orientation ──┼─▶ recompute() ─▶ enumerate() ─▶ choices ─▶ reconcile selection
//! set_divisible_by ─┤
//! set_max_mp ───────┘
//! ```

use crate::resolution::{
    AspectRatio, Orientation, Resolution, ResolutionError, ResolutionInfo, enumerate,
};
use std::fmt;

/// Divisibility steps offered by the picker.
pub const DIVISIBILITY_CHOICES: [u32; 3] = [16, 32, 64];

/// Megapixel limits offered by the picker.
pub const MEGAPIXEL_PRESETS: [u32; 7] = [1, 2, 4, 6, 8, 12, 16];

/// Display label for the empty-list sentinel.
pub const INVALID_LABEL: &str = "INVALID";

/// Label for a megapixel preset, e.g. `"4 MP"`.
pub fn megapixel_label(mp: u32) -> String {
    format!("{mp} MP")
}

/// Parse a `"4 MP"` style label (the unit is optional).
pub fn parse_megapixel_label(label: &str) -> Result<f64, ResolutionError> {
    let number = label
        .trim()
        .strip_suffix("MP")
        .unwrap_or(label)
        .trim();
    let mp: f64 = number
        .parse()
        .map_err(|_| ResolutionError::InvalidMegapixelLabel(label.to_string()))?;
    if !mp.is_finite() || mp <= 0.0 {
        return Err(ResolutionError::InvalidMegapixels(mp));
    }
    Ok(mp)
}

/// One entry in the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Resolution(Resolution),
    /// No resolution satisfies the current parameters.
    Invalid,
}

impl Choice {
    pub fn resolution(self) -> Option<Resolution> {
        match self {
            Choice::Resolution(r) => Some(r),
            Choice::Invalid => None,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Resolution(r) => write!(f, "{r}"),
            Choice::Invalid => f.write_str(INVALID_LABEL),
        }
    }
}

/// What happened to the selection after a recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// The previous choice is still offered and stays selected.
    Preserved(Choice),
    /// The previous choice disappeared; the first choice is now selected.
    Reset { previous: Choice, current: Choice },
}

#[derive(Debug, Clone)]
pub struct ResolutionSelector {
    aspect: AspectRatio,
    orientation: Orientation,
    divisible_by: u32,
    max_megapixels: f64,
    choices: Vec<Choice>,
    selected: Choice,
}

impl ResolutionSelector {
    pub fn new(
        aspect: AspectRatio,
        orientation: Orientation,
        divisible_by: u32,
        max_megapixels: f64,
    ) -> Result<Self, ResolutionError> {
        let choices = build_choices(aspect, orientation, divisible_by, max_megapixels)?;
        let selected = choices[0];
        Ok(Self {
            aspect,
            orientation,
            divisible_by,
            max_megapixels,
            choices,
            selected,
        })
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn selected(&self) -> Choice {
        self.selected
    }

    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn divisible_by(&self) -> u32 {
        self.divisible_by
    }

    pub fn max_megapixels(&self) -> f64 {
        self.max_megapixels
    }

    /// Details for the current selection, or `None` for the sentinel.
    pub fn info(&self) -> Option<ResolutionInfo> {
        self.selected
            .resolution()
            .map(|r| ResolutionInfo::new(r, self.aspect, self.orientation))
    }

    /// Select a choice by value. Returns `false` if it is not offered.
    pub fn select(&mut self, choice: Choice) -> bool {
        if self.choices.contains(&choice) {
            self.selected = choice;
            true
        } else {
            false
        }
    }

    /// Select by display label, e.g. `"1536×1024"` or `"1536x1024"`.
    pub fn select_label(&mut self, label: &str) -> Result<bool, ResolutionError> {
        if label.trim() == INVALID_LABEL {
            return Ok(self.select(Choice::Invalid));
        }
        let resolution: Resolution = label.parse()?;
        Ok(self.select(Choice::Resolution(resolution)))
    }

    pub fn set_aspect(&mut self, aspect: AspectRatio) -> Result<SelectionChange, ResolutionError> {
        self.update(|s| s.aspect = aspect)
    }

    pub fn set_orientation(
        &mut self,
        orientation: Orientation,
    ) -> Result<SelectionChange, ResolutionError> {
        self.update(|s| s.orientation = orientation)
    }

    pub fn set_divisible_by(&mut self, step: u32) -> Result<SelectionChange, ResolutionError> {
        self.update(|s| s.divisible_by = step)
    }

    pub fn set_max_megapixels(&mut self, mp: f64) -> Result<SelectionChange, ResolutionError> {
        self.update(|s| s.max_megapixels = mp)
    }

    /// Re-enumerate with the current parameters and reconcile the selection.
    pub fn recompute(&mut self) -> Result<SelectionChange, ResolutionError> {
        self.choices = build_choices(
            self.aspect,
            self.orientation,
            self.divisible_by,
            self.max_megapixels,
        )?;
        Ok(self.reconcile())
    }

    /// Apply `change` to a copy, recompute, and commit only on success.
    fn update(
        &mut self,
        change: impl FnOnce(&mut Self),
    ) -> Result<SelectionChange, ResolutionError> {
        let mut next = self.clone();
        change(&mut next);
        let outcome = next.recompute()?;
        *self = next;
        Ok(outcome)
    }

    fn reconcile(&mut self) -> SelectionChange {
        let previous = self.selected;
        if self.choices.contains(&previous) {
            SelectionChange::Preserved(previous)
        } else {
            self.selected = self.choices[0];
            SelectionChange::Reset {
                previous,
                current: self.selected,
            }
        }
    }
}

/// Enumerate and wrap as choices; never empty.
fn build_choices(
    aspect: AspectRatio,
    orientation: Orientation,
    divisible_by: u32,
    max_megapixels: f64,
) -> Result<Vec<Choice>, ResolutionError> {
    let resolutions = enumerate(aspect, orientation, divisible_by, max_megapixels)?;
    if resolutions.is_empty() {
        return Ok(vec![Choice::Invalid]);
    }
    Ok(resolutions.into_iter().map(Choice::Resolution).collect())
}
