//! Pipeline orchestration module.
//!
//! One run, strictly sequential:
//! - Fetch (with retry)
//! - Persist the raw payload
//! - Resolve shape, extract channels, normalize events
//! - Assemble and write channel documents and the index

pub mod context;
pub mod run;

pub use context::*;
pub use run::*;
