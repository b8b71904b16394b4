//! Session configuration.

use serde::Deserialize;

use crate::selection::SelectionPolicy;

/// Tunables for a tree view session. Every field has a default, so a partial
/// (or absent) JS object is accepted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    /// Drag-to-pan multiplier.
    pub pan_speed: f64,
    /// Extra space added right of and below the laid-out scene.
    pub bounds_padding: f64,
    /// Which nodes accept selection clicks.
    pub selection_policy: SelectionPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pan_speed: 1.5,
            bounds_padding: 100.0,
            selection_policy: SelectionPolicy::LevelRange,
        }
    }
}
