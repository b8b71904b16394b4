//! Progressive-disclosure layout pipeline.
//!
//! Stages, in data-flow order:
//!
//! 1. `visibility`: flat nodes + selection → ordered level groups
//! 2. `display_mode`: deepest selection → zoom tier
//! 3. `engine`: groups + tier + viewport → per-node pixel geometry
//! 4. `connector`: laid-out groups → bezier edges
//! 5. `bounds`: laid-out groups → scrollable canvas size

pub mod bounds;
pub mod connector;
pub mod display_mode;
pub mod engine;
pub mod ratios;
pub mod visibility;

pub use bounds::{SceneBounds, scene_bounds};
pub use connector::{Anchor, Link, generate_connections};
pub use display_mode::{DisplayMode, get_display_mode};
pub use engine::{LayoutEngine, calculate_layout};
pub use ratios::{DisplayRatios, LayoutFamily};
pub use visibility::get_visible_groups;
