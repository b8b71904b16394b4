//! Display-mode selection.
//!
//! The deeper the user drills, the more groups are on screen at once, so
//! node footprints shrink in three discrete tiers instead of a continuous
//! zoom.

use serde::{Deserialize, Serialize};

use crate::selection::SelectionState;

/// Discrete zoom tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DisplayMode {
    /// Most zoomed-out tier; nothing deeper than level 1 selected.
    #[default]
    Coarse = 1,
    /// Selection reaches level 2 or 3.
    Medium = 2,
    /// Selection reaches level 4 or 5.
    Fine = 3,
}

impl DisplayMode {
    /// Map the deepest selected level to a tier.
    pub fn for_depth(deepest_selected_level: u8) -> Self {
        match deepest_selected_level {
            0 | 1 => DisplayMode::Coarse,
            2 | 3 => DisplayMode::Medium,
            4 | 5 => DisplayMode::Fine,
            _ => DisplayMode::Coarse,
        }
    }

    /// Tier for the current selection; no selection counts as level 1.
    pub fn for_selection(selection: &SelectionState) -> Self {
        Self::for_depth(selection.deepest_level().unwrap_or(1))
    }

    /// Numeric tier (1, 2 or 3).
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl From<DisplayMode> for u8 {
    fn from(mode: DisplayMode) -> Self {
        mode.as_u8()
    }
}

impl TryFrom<u8> for DisplayMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DisplayMode::Coarse),
            2 => Ok(DisplayMode::Medium),
            3 => Ok(DisplayMode::Fine),
            other => Err(format!("unknown display mode {other}")),
        }
    }
}

/// Functional form of [`DisplayMode::for_depth`].
pub fn get_display_mode(deepest_selected_level: u8) -> DisplayMode {
    DisplayMode::for_depth(deepest_selected_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;

    #[test]
    fn test_depth_mapping() {
        let expected = [
            (0, 1),
            (1, 1),
            (2, 2),
            (3, 2),
            (4, 3),
            (5, 3),
            (6, 1),
            (200, 1),
        ];
        for (level, mode) in expected {
            assert_eq!(get_display_mode(level).as_u8(), mode, "level {level}");
        }
    }

    #[test]
    fn test_empty_selection_is_coarse() {
        assert_eq!(DisplayMode::for_selection(&SelectionState::new()), DisplayMode::Coarse);
    }

    #[test]
    fn test_selection_depth_drives_mode() {
        let mut selection = SelectionState::new();
        selection.select(1, NodeId(2)).unwrap();
        selection.select(2, NodeId(4)).unwrap();
        assert_eq!(DisplayMode::for_selection(&selection), DisplayMode::Medium);

        selection.select(3, NodeId(6)).unwrap();
        selection.select(4, NodeId(8)).unwrap();
        assert_eq!(DisplayMode::for_selection(&selection), DisplayMode::Fine);
    }

    #[test]
    fn test_u8_conversion() {
        assert_eq!(DisplayMode::try_from(2), Ok(DisplayMode::Medium));
        assert!(DisplayMode::try_from(0).is_err());
        assert_eq!(u8::from(DisplayMode::Fine), 3);
    }
}
