//! Payload resolution module.
//!
//! Finds the channel records inside an arbitrarily-shaped payload and pulls
//! identity, logo and raw events out of each one.

pub mod channel;
pub mod shape;

pub use channel::*;
pub use shape::*;
