//! Storage module.
//!
//! Output documents, their assembly from normalized channels, and the
//! on-disk layout:
//! - `raw/guide_<start>.json` - verbatim payload
//! - `raw/guide_<start>_ERROR.txt` - marker left when the fetch failed
//! - `channels/<id>.json` - per-channel document
//! - `index.json` - channel index

pub mod assemble;
pub mod models;
pub mod writer;

pub use assemble::*;
pub use models::*;
pub use writer::*;
