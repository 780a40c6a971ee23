//! W3Atlas - creep route planner library
//!
//! Camp selection, hero progression and loot aggregation for a strategy-game
//! map, plus the terminal front-end pieces used by the binary.

pub mod constants;
pub mod input;
pub mod items;
pub mod logging;
pub mod map;
pub mod notes;
pub mod planner;
pub mod progression;
pub mod selection;
pub mod settings;
pub mod ui;

pub use planner::{MapStatus, RouteObserver, RoutePlanner};
pub use progression::{calculate_progression, ProgressionState};
pub use selection::{RouteSnapshot, Selection, SelectionError};
