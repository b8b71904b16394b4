//! Per-level geometric ratios.
//!
//! Levels are split into three layout families. Each family derives a base
//! node size from the viewport, then scales it and picks a vertical offset
//! according to the active display mode. All quantities are fractions of the
//! viewport so the tree reflows on resize.

use serde::Serialize;

use super::display_mode::DisplayMode;
use crate::viewport::Viewport;

/// Node height never exceeds this fraction of node width.
const MAX_ASPECT: f64 = 0.75;

/// Lower bound on the horizontal gap, as a fraction of viewport width.
const MIN_GAP_FRACTION: f64 = 0.015;

/// Sizing produced for one level under one display mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRatios {
    pub node_width: f64,
    pub node_height: f64,
    pub top_space_y: f64,
    pub gap: f64,
}

/// Group of levels sharing one sizing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutFamily {
    /// Levels 0-2, visible in every mode.
    Upper,
    /// Levels 3-4, visible from mode 2.
    Middle,
    /// Levels 5-6, visible only in mode 3.
    Lower,
}

impl LayoutFamily {
    /// Family responsible for `level`, if any.
    pub fn for_level(level: u8) -> Option<Self> {
        match level {
            0..=2 => Some(LayoutFamily::Upper),
            3 | 4 => Some(LayoutFamily::Middle),
            5 | 6 => Some(LayoutFamily::Lower),
            _ => None,
        }
    }

    /// Whether this family handles `level`.
    pub fn covers(self, level: u8) -> bool {
        Self::for_level(level) == Some(self)
    }

    /// Compute ratios for `level` in `mode`.
    ///
    /// Returns `None` when the level does not belong to this family or when
    /// the family has no sizing for the mode (its levels cannot be visible
    /// there).
    pub fn ratios(self, level: u8, mode: DisplayMode, viewport: Viewport) -> Option<DisplayRatios> {
        if !self.covers(level) {
            return None;
        }
        match self {
            LayoutFamily::Upper => Some(upper_ratios(level, mode, viewport)),
            LayoutFamily::Middle => middle_ratios(level, mode, viewport),
            LayoutFamily::Lower => lower_ratios(level, mode, viewport),
        }
    }
}

/// Base size shared by all families: width and height as viewport fractions,
/// height clamped to the aspect limit, gap as a fraction of node width with a
/// viewport-relative floor.
fn base_size(
    viewport: Viewport,
    width_fraction: f64,
    height_fraction: f64,
    gap_fraction: f64,
) -> (f64, f64, f64) {
    let width = viewport.width * width_fraction;
    let height = (viewport.height * height_fraction).min(width * MAX_ASPECT);
    let gap = (width * gap_fraction).max(viewport.width * MIN_GAP_FRACTION);
    (width, height, gap)
}

fn upper_ratios(level: u8, mode: DisplayMode, viewport: Viewport) -> DisplayRatios {
    let (width, height, gap) = base_size(viewport, 0.12, 0.17, 0.17);

    let top_fraction = match level {
        0 => 0.05,
        1 => 0.33,
        _ => 0.62,
    };

    let (scale, top_fraction) = match mode {
        DisplayMode::Coarse => (1.0, top_fraction),
        DisplayMode::Medium => (
            0.7,
            match level {
                0 => 0.025,
                1 => 0.18,
                _ => 0.35,
            },
        ),
        DisplayMode::Fine => (0.55, top_fraction * 0.45),
    };

    DisplayRatios {
        node_width: width * scale,
        node_height: height * scale,
        top_space_y: viewport.height * top_fraction,
        gap,
    }
}

fn middle_ratios(level: u8, mode: DisplayMode, viewport: Viewport) -> Option<DisplayRatios> {
    let (width, height, gap) = base_size(viewport, 0.11, 0.16, 0.25);

    let (scale, top_fraction) = match (mode, level) {
        (DisplayMode::Coarse, _) => return None,
        (DisplayMode::Medium, 3) => (1.0, 0.57),
        (DisplayMode::Medium, _) => (1.0, 0.815),
        (DisplayMode::Fine, 3) => (0.7, 0.42),
        (DisplayMode::Fine, _) => (0.7, 0.56),
    };

    Some(DisplayRatios {
        node_width: width * scale,
        node_height: height * scale,
        top_space_y: viewport.height * top_fraction,
        gap,
    })
}

fn lower_ratios(level: u8, mode: DisplayMode, viewport: Viewport) -> Option<DisplayRatios> {
    if mode != DisplayMode::Fine {
        return None;
    }

    let (width, height, gap) = base_size(viewport, 0.11, 0.14, 0.25);
    let top_fraction = if level == 5 { 0.70 } else { 0.85 };

    Some(DisplayRatios {
        node_width: width,
        node_height: height,
        top_space_y: viewport.height * top_fraction,
        gap,
    })
}
