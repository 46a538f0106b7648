//! Error taxonomy.
//!
//! Only the network boundary and the output directory can fail. Everything
//! between them is total and has no error type.

use std::path::PathBuf;

use thiserror::Error;

/// A failure of a single fetch attempt. Always retried.
#[derive(Debug, Error)]
pub enum TransientError {
    #[error("retryable http status {status}")]
    Status { status: u16 },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("invalid json (status={status} body_len={body_len}): {snippet}")]
    Parse {
        status: u16,
        body_len: usize,
        snippet: String,
    },
}

/// The fetch gave up.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("fetch failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: TransientError },

    #[error("http client setup failed: {0}")]
    Client(String),
}

/// Writing the output layout failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json encode error for {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
