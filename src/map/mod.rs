//! Map data model and loading.
//!
//! Camps, unit groups and buildings are static per map and read-only once loaded.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;
