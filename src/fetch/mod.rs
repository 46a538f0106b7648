//! Fetch module.
//!
//! One HTTP GET per run, retried with exponential backoff:
//! - `transport` - the HTTP seam (reqwest in production)
//! - `retry` - backoff schedule, transient status table, sleeping
//! - `client` - the retry loop and response parsing

pub mod client;
pub mod retry;
pub mod transport;

pub use client::*;
pub use retry::*;
pub use transport::*;
