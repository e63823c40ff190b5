//! Session-persist sinks.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::session::SessionSnapshot;

/// Receives the session after every committed change.
///
/// Persisting is fire-and-forget: implementations must not fail the caller.
pub trait SessionSink: Send + Sync {
    fn persist(&self, snapshot: &SessionSnapshot);
}

/// Discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl SessionSink for NoopSink {
    fn persist(&self, _snapshot: &SessionSnapshot) {}
}

/// Keeps every snapshot in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    snapshots: Mutex<Vec<SessionSnapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All snapshots received so far.
    pub fn snapshots(&self) -> Vec<SessionSnapshot> {
        self.snapshots.lock().clone()
    }

    /// The most recent snapshot.
    pub fn last(&self) -> Option<SessionSnapshot> {
        self.snapshots.lock().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().is_empty()
    }
}

impl SessionSink for MemorySink {
    fn persist(&self, snapshot: &SessionSnapshot) {
        self.snapshots.lock().push(snapshot.clone());
    }
}

/// Overwrites a JSON file with the latest snapshot.
///
/// Inside a tokio runtime the write runs on the blocking pool, so `persist`
/// returns immediately and callers holding the controller lock never wait on
/// disk. Writes are sequenced: a snapshot older than the one already on disk
/// is dropped. Outside a runtime the write happens inline.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    issued: Arc<AtomicU64>,
    written: Arc<Mutex<u64>>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issued: Arc::new(AtomicU64::new(0)),
            written: Arc::new(Mutex::new(0)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a snapshot previously written by a `FileSink`.
    pub fn read(path: &Path) -> Result<SessionSnapshot> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn write(path: &Path, written: &Mutex<u64>, seq: u64, json: &str) {
        let mut last = written.lock();
        if *last > seq {
            debug!(path = %path.display(), seq, "Skipping superseded session write");
            return;
        }

        match std::fs::write(path, json) {
            Ok(()) => {
                *last = seq;
                debug!(path = %path.display(), seq, "Persisted session");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to persist session"),
        }
    }
}

impl SessionSink for FileSink {
    fn persist(&self, snapshot: &SessionSnapshot) {
        let json = match serde_json::to_string_pretty(snapshot) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to encode session");
                return;
            }
        };
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let path = self.path.clone();
                let written = self.written.clone();
                handle.spawn_blocking(move || Self::write(&path, &written, seq, &json));
            }
            Err(_) => Self::write(&self.path, &self.written, seq, &json),
        }
    }
}
