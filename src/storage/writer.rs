//! Output layout writer.
//!
//! Plain overwrite, no temp-file rename: a crash can leave a partial file
//! and the recovery is to run again.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::StoreError;
use crate::logging::structured::LogContext;
use crate::storage::assemble::{channel_path, Assembly};
use crate::storage::models::{ChannelDoc, Index};

/// The output root and the files under it.
#[derive(Debug, Clone)]
pub struct GuideStore {
    root: PathBuf,
}

impl GuideStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn raw_path(&self, start: i64) -> PathBuf {
        self.root.join("raw").join(format!("guide_{}.json", start))
    }

    pub fn error_marker_path(&self, start: i64) -> PathBuf {
        self.root.join("raw").join(format!("guide_{}_ERROR.txt", start))
    }

    pub fn channel_path(&self, id: &str) -> PathBuf {
        self.root.join(channel_path(id))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join("index.json")
    }

    /// Persist the payload verbatim and clear any marker from an earlier failed run.
    pub fn write_raw(
        &self,
        start: i64,
        payload: &serde_json::Value,
        ctx: &LogContext,
    ) -> Result<PathBuf, StoreError> {
        let path = self.raw_path(start);
        let bytes = encode(payload, &path)?;
        write_bytes(&path, &bytes)?;

        let marker = self.error_marker_path(start);
        match fs::remove_file(&marker) {
            Ok(()) => log::info!("{} STALE_MARKER_REMOVED path={}", ctx, marker.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(StoreError::Io { path: marker, source }),
        }

        log::info!(
            "{} RAW_PERSISTED path={} bytes={} sha256={}",
            ctx,
            path.display(),
            bytes.len(),
            hex::encode(Sha256::digest(&bytes))
        );
        Ok(path)
    }

    /// Leave a diagnostic marker in place of the raw payload.
    pub fn write_error_marker(
        &self,
        start: i64,
        message: &str,
        ctx: &LogContext,
    ) -> Result<PathBuf, StoreError> {
        let path = self.error_marker_path(start);
        write_bytes(&path, format!("{}\n", message).as_bytes())?;
        log::warn!("{} ERROR_MARKER_WRITTEN path={}", ctx, path.display());
        Ok(path)
    }

    pub fn write_channel(&self, doc: &ChannelDoc, ctx: &LogContext) -> Result<PathBuf, StoreError> {
        let path = self.channel_path(&doc.channel.id);
        write_bytes(&path, &encode(doc, &path)?)?;
        log::debug!(
            "{} CHANNEL_WRITTEN path={} events={}",
            ctx.with_channel(&doc.channel.id),
            path.display(),
            doc.events.len()
        );
        Ok(path)
    }

    pub fn write_index(&self, index: &Index, ctx: &LogContext) -> Result<PathBuf, StoreError> {
        let path = self.index_path();
        write_bytes(&path, &encode(index, &path)?)?;
        log::info!(
            "{} INDEX_WRITTEN path={} channels={}",
            ctx,
            path.display(),
            index.channels.len()
        );
        Ok(path)
    }

    /// Write every channel document, then the index.
    pub fn write_assembly(&self, assembly: &Assembly, ctx: &LogContext) -> Result<(), StoreError> {
        for doc in &assembly.documents {
            self.write_channel(doc, ctx)?;
        }
        self.write_index(&assembly.index, ctx)?;
        Ok(())
    }
}

fn encode<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
