//! Security module.
//!
//! Keeps remote references and oversized blobs out of the output documents.

pub mod sanitizer;

pub use sanitizer::*;
