//! Field extraction module.
//!
//! Ranked key tables and the lookups that walk them over untyped JSON.

pub mod json_path;
pub mod keys;
pub mod picker;

pub use json_path::*;
pub use picker::*;
