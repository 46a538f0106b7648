//! Run orchestrator.
//!
//! Fetch, then normalize, then write. A fetch that gives up degrades the run
//! instead of failing it: the error is logged, a marker is left on disk, and
//! the caller still gets an `Ok` outcome. Only disk failures are errors.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::error::{FetchError, StoreError};
use crate::fetch::client::{FetchClient, FetchConfig, DEFAULT_NID};
use crate::fetch::retry::Sleeper;
use crate::fetch::transport::Transport;
use crate::logging::structured::LogContext;
use crate::normalize::event::NormalizeOptions;
use crate::pipeline::context::RunContext;
use crate::resolve::channel::normalize_channel;
use crate::resolve::shape::resolve_channels;
use crate::storage::assemble::{assemble, Assembly};
use crate::storage::models::Index;
use crate::storage::writer::GuideStore;

/// Default output root.
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

/// Parameters of one invocation.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub nid: String,
    /// Day-start timestamp, seconds since the epoch (UTC).
    pub start: i64,
    pub out_dir: PathBuf,
    /// Fetch and count channels, write nothing.
    pub dry_run: bool,
    pub normalize: NormalizeOptions,
    pub fetch: FetchConfig,
}

impl RunOptions {
    pub fn new(start: i64) -> Self {
        Self {
            nid: DEFAULT_NID.to_string(),
            start,
            out_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            dry_run: false,
            normalize: NormalizeOptions::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// How a run ended. Every variant is a successful exit for the caller.
#[derive(Debug)]
pub enum RunOutcome {
    /// Raw payload, channel documents and index are on disk.
    Written(Index),
    DryRun { channels: usize },
    /// The fetch gave up. `marker` is the error file, absent on dry runs.
    Degraded {
        marker: Option<PathBuf>,
        error: FetchError,
    },
}

/// Run against the real HTTP endpoint.
pub fn run(options: &RunOptions) -> Result<RunOutcome, StoreError> {
    let ctx = RunContext::new(&options.nid, options.start);
    match FetchClient::new(options.fetch.clone()) {
        Ok(client) => execute(&ctx, options, &client),
        Err(error) => degrade(&ctx, options, error),
    }
}

/// Run with a caller-supplied client.
pub fn run_with<T: Transport, S: Sleeper>(
    options: &RunOptions,
    client: &FetchClient<T, S>,
) -> Result<RunOutcome, StoreError> {
    let ctx = RunContext::new(&options.nid, options.start);
    execute(&ctx, options, client)
}

/// Resolve, extract, normalize and assemble a fetched payload. Never fails.
pub fn split_guide(
    payload: &Value,
    start: i64,
    options: &NormalizeOptions,
    ctx: &LogContext,
) -> Assembly {
    let channels = resolve_channels(payload, ctx)
        .into_iter()
        .map(|record| normalize_channel(record, options, ctx))
        .collect();
    assemble(channels, start, ctx)
}

fn execute<T: Transport, S: Sleeper>(
    ctx: &RunContext,
    options: &RunOptions,
    client: &FetchClient<T, S>,
) -> Result<RunOutcome, StoreError> {
    let log_ctx = ctx.log_context();

    crate::log_info!(
        log_ctx,
        "RUN_START",
        nid = ctx.nid,
        start = ctx.start,
        out = options.out_dir.display().to_string(),
        dry_run = options.dry_run,
        title_policy = options.normalize.title_policy.to_string(),
    );
    if !ctx.is_day_aligned() {
        crate::log_warn!(
            log_ctx,
            "START_NOT_DAY_ALIGNED",
            start = ctx.start,
            utc = ctx.day_start().map(|d| d.to_rfc3339()),
        );
    }

    let payload = match client.fetch(&ctx.nid, ctx.start, &log_ctx) {
        Ok(payload) => payload,
        Err(error) => return degrade(ctx, options, error),
    };

    if options.dry_run {
        let channels = resolve_channels(&payload, &log_ctx).len();
        crate::log_info!(log_ctx, "DRY_RUN_COMPLETE", channels = channels);
        return Ok(RunOutcome::DryRun { channels });
    }

    let store = GuideStore::new(&options.out_dir);
    store.write_raw(ctx.start, &payload, &log_ctx)?;

    let assembly = split_guide(&payload, ctx.start, &options.normalize, &log_ctx);
    store.write_assembly(&assembly, &log_ctx)?;

    let events: usize = assembly.documents.iter().map(|d| d.events.len()).sum();
    log::info!(
        "{} RUN_COMPLETE channels={} events={} elapsed_ms={}",
        log_ctx,
        assembly.index.channels.len(),
        events,
        (Utc::now() - ctx.started_at).num_milliseconds()
    );

    Ok(RunOutcome::Written(assembly.index))
}

fn degrade(
    ctx: &RunContext,
    options: &RunOptions,
    error: FetchError,
) -> Result<RunOutcome, StoreError> {
    let log_ctx = ctx.log_context();
    log::error!("{} RUN_DEGRADED error={}", log_ctx, error);

    if options.dry_run {
        return Ok(RunOutcome::Degraded {
            marker: None,
            error,
        });
    }

    let message = format!(
        "guide fetch failed at {} (nid={} start={}): {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        ctx.nid,
        ctx.start,
        error
    );
    let store = GuideStore::new(&options.out_dir);
    let marker = store.write_error_marker(ctx.start, &message, &log_ctx)?;

    Ok(RunOutcome::Degraded {
        marker: Some(marker),
        error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_primary_shape() {
        let ctx = LogContext::new("test-run");
        let payload = json!({"data": {"programs": [
            {"id": "1", "name": "Ch1", "events": [{"name": "Show", "startTime": 100, "duration": 30}]}
        ]}});
        let assembly = split_guide(&payload, 100, &NormalizeOptions::default(), &ctx);
        assert_eq!(assembly.index.channels.len(), 1);
        assert_eq!(assembly.index.channels[0].path, "channels/1.json");
        let doc = assembly.document("1").unwrap();
        assert_eq!(doc.events[0].duration, Some(30));
    }

    #[test]
    fn test_split_unknown_shape_is_empty() {
        let ctx = LogContext::new("test-run");
        let assembly = split_guide(&json!({"foo": "bar"}), 5, &NormalizeOptions::default(), &ctx);
        assert_eq!(assembly.index, Index { start: 5, channels: vec![] });
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::new(1_704_067_200);
        assert_eq!(options.nid, "64865");
        assert_eq!(options.out_dir, PathBuf::from("docs"));
        assert!(!options.dry_run);
        assert_eq!(options.fetch.max_attempts, 4);
    }
}
