// src/ledger.rs
//! Append-only record of show URLs that have already been notified.
//!
//! One URL per line, no header, never compacted. There is no locking: two
//! runs against the same file can interleave their appends.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::RunError;
use crate::listings::Film;

pub const DEFAULT_NOTIFICATIONS_FILE: &str = "/var/db/unliminotify/notifications";

/// Snapshot of the ledger taken at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct SeenUrls(HashSet<String>);

impl SeenUrls {
    pub fn contains(&self, url: &str) -> bool {
        self.0.contains(url)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn from_log(content: &str) -> Self {
        // Lines must match feed URLs byte for byte.
        content
            .lines()
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl FromIterator<String> for SeenUrls {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
pub struct NotificationLedger {
    path: PathBuf,
}

impl NotificationLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every URL recorded so far. A missing file is an empty ledger;
    /// any other read failure is fatal.
    pub async fn load(&self) -> Result<SeenUrls, RunError> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => Ok(SeenUrls::from_log(&s)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no notifications file yet");
                Ok(SeenUrls::default())
            }
            Err(source) => Err(self.storage_err("read", source)),
        }
    }

    /// Append the URL of every show of every film, in order, one line each.
    /// Lines are written one at a time; a failure part-way leaves the earlier
    /// lines in place. Returns the number of lines written.
    pub async fn append(&self, films: &[Film]) -> Result<usize, RunError> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await
            .map_err(|e| self.storage_err("open", e))?;

        let mut written = 0usize;
        for show in films.iter().flat_map(|f| f.shows.iter()) {
            let line = format!("{}\n", show.url);
            file.write_all(line.as_bytes())
                .await
                .map_err(|e| self.storage_err("write to", e))?;
            written += 1;
        }
        file.flush()
            .await
            .map_err(|e| self.storage_err("write to", e))?;

        tracing::debug!(path = %self.path.display(), written, "notifications file appended");
        Ok(written)
    }

    fn storage_err(&self, action: &'static str, source: std::io::Error) -> RunError {
        RunError::Storage {
            action,
            path: self.path.clone(),
            source,
        }
    }
}
