//! Versioned window snapshots
//!
//! A snapshot is one JSON document holding the window parameters and its
//! row table:
//!
//! ```json
//! {"version": 1, "kind": "perpetual", "currency": "BTC",
//!  "start": "2024-10-01", "end": "2024-10-03", "granularity": "1d",
//!  "rows": [...]}
//! ```
//!
//! `version` and `kind` are checked before rows are decoded, so a snapshot
//! written by an incompatible build fails with a typed error instead of
//! decoding into the wrong shape.

use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tenor_core::{Currency, Granularity};

use crate::error::SnapshotError;
use crate::strategy::{SeriesStrategy, WindowQuery};
use crate::window::RangeCache;

/// Current snapshot schema version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Extension appended when the caller gives none
const DEFAULT_EXTENSION: &str = "json";

#[derive(Serialize)]
struct SnapshotOut<'a, R> {
    version: u32,
    kind: &'static str,
    currency: Currency,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    rows: &'a [R],
}

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
    kind: String,
}

#[derive(Deserialize)]
struct SnapshotIn<R> {
    currency: Currency,
    start: NaiveDate,
    end: NaiveDate,
    granularity: Granularity,
    rows: Vec<R>,
}

/// `path` with `.json` appended when it has no extension
pub fn snapshot_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.extension() {
        Some(_) => path.to_path_buf(),
        None => path.with_extension(DEFAULT_EXTENSION),
    }
}

impl<S: SeriesStrategy> RangeCache<S> {
    /// Write the window to disk, returning the path actually written
    pub fn save(&self, path: impl AsRef<Path>) -> Result<PathBuf, SnapshotError> {
        let path = snapshot_path(path);
        let snapshot = SnapshotOut {
            version: SNAPSHOT_VERSION,
            kind: self.kind().as_str(),
            currency: self.currency(),
            start: self.start(),
            end: self.end(),
            granularity: self.granularity(),
            rows: self.rows(),
        };

        fs::write(&path, serde_json::to_vec_pretty(&snapshot)?)?;
        info!("Saved {} rows to {}", self.len(), path.display());
        Ok(path)
    }

    /// Rebuild a window from a snapshot without fetching
    ///
    /// `strategy` serves later operations on the loaded window and must be
    /// of the kind the snapshot was written with.
    pub fn load(path: impl AsRef<Path>, strategy: S) -> Result<Self, SnapshotError> {
        let path = snapshot_path(path);
        let document: serde_json::Value = serde_json::from_slice(&fs::read(&path)?)?;

        let header = SnapshotHeader::deserialize(&document)?;
        if header.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        let expected = strategy.kind().as_str();
        if header.kind != expected {
            return Err(SnapshotError::KindMismatch {
                found: header.kind,
                expected: expected.to_string(),
            });
        }

        let snapshot: SnapshotIn<S::Row> = serde_json::from_value(document)?;
        let query = WindowQuery::new(
            snapshot.currency,
            snapshot.start,
            snapshot.end,
            snapshot.granularity,
        );
        info!("Loaded {} rows from {}", snapshot.rows.len(), path.display());
        Ok(RangeCache::from_parts(strategy, query, snapshot.rows))
    }
}
