//! Selection and entrance-animation state.
//!
//! Selection drives progressive disclosure: a level's children are shown
//! only while a node on that level is selected.

mod entrance;
mod state;

pub use entrance::EntranceTracker;
pub use state::{SelectionPolicy, SelectionState, is_selectable_level};
