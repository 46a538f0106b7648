//! Normalization module.
//!
//! Turns raw upstream values into the canonical output fields:
//! - Durations of unknown unit into whole minutes
//! - Titles and descriptions into bounded strings
//! - Channel names into filename-safe slugs
//! - Raw event records into canonical events

pub mod duration;
pub mod event;
pub mod text;

pub use duration::*;
pub use event::*;
pub use text::*;
