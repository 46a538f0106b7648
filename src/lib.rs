//! Guide Normalizer - TV guide fetch and per-channel split
//!
//! This crate fetches a day of TV schedule from a remote JSON API and
//! rewrites it into a fixed output shape, whatever the upstream payload
//! happens to look like. The implementation prioritizes:
//!
//! 1. **Totality** - Every normalization step returns a value; unknown shapes
//!    degrade to empty values instead of errors
//! 2. **Logging** - Every decision point logged with run/channel context
//! 3. **Availability** - A failed fetch leaves a marker on disk and never
//!    blocks the automation that runs after us
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `extraction` - Ranked key tables and the field picker over raw JSON
//! - `normalize` - Duration, text and event normalization
//! - `resolve` - Payload shape sniffing and channel extraction
//! - `security` - Remote reference scrubbing and raw-event stripping
//! - `storage` - Output documents, assembly and on-disk layout
//! - `fetch` - HTTP client with retry/backoff
//! - `pipeline` - Run orchestrator tying the stages together
//! - `logging` - Structured logging with run context

pub mod error;
pub mod extraction;
pub mod fetch;
pub mod logging;
pub mod normalize;
pub mod pipeline;
pub mod resolve;
pub mod security;
pub mod storage;

pub use error::{FetchError, StoreError, TransientError};
pub use pipeline::run::{run, run_with, split_guide, RunOptions, RunOutcome};

/// Initialize the process-wide logger.
///
/// Defaults to `info`; `RUST_LOG` overrides the filter.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .try_init();
}
