//! Camp, unit and building selection with camp activation order.

pub mod logic;
pub mod store;
pub mod types;

pub use store::{total_raw_xp, RouteSnapshot, SelectionStore};
pub use types::{Selection, SelectionError};
