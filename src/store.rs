//! Append-only submission log kept as one JSON array on disk.
//!
//! Appends are read-modify-write cycles over the whole file, serialized by
//! a mutex keyed on the backing path. Every write goes to a temp file in the
//! same directory and is renamed into place, so readers never need the lock
//! and always see either the old or the new array.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use chrono::{SubsecRound, Utc};
use dashmap::DashMap;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{Submission, ValidatedSubmission};

/// One writer lock per backing file, shared by every store handle in the process.
static WRITE_LOCKS: LazyLock<DashMap<PathBuf, Arc<Mutex<()>>>> = LazyLock::new(DashMap::new);

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    CorruptData(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "Submission store I/O failure: {err}"),
            StoreError::CorruptData(msg) => write!(f, "Submission store is corrupt: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(err) => Some(err),
            StoreError::CorruptData(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionStore {
    path: PathBuf,
}

impl SubmissionStore {
    /// Does not touch the filesystem. A missing file reads as an empty collection.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp `submission` and append it. Returns the entry as persisted.
    pub async fn append(&self, submission: ValidatedSubmission) -> Result<Submission, StoreError> {
        let write_lock = write_lock_for(&self.path).await?;
        let _guard = write_lock.lock().await;

        let mut submissions = self.load().await?;

        // Millisecond precision matches the on-disk format; never step backwards.
        let now = Utc::now().trunc_subsecs(3);
        let timestamp = submissions
            .last()
            .map_or(now, |last| last.timestamp.instant().max(now));

        let entry = Submission::stamped(submission, timestamp);
        submissions.push(entry.clone());

        let bytes = serde_json::to_vec_pretty(&submissions)
            .map_err(|e| StoreError::CorruptData(format!("serialization failed: {e}")))?;
        write_atomic(&self.path, &bytes).await?;

        tracing::debug!(
            path = %self.path.display(),
            count = submissions.len(),
            "Submission appended"
        );

        Ok(entry)
    }

    /// The full collection in insertion order. Never returns a partial result.
    pub async fn read_all(&self) -> Result<Vec<Submission>, StoreError> {
        self.load().await
    }

    async fn load(&self) -> Result<Vec<Submission>, StoreError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(StoreError::Io(err)),
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            StoreError::CorruptData(format!("{}: {e}", self.path.display()))
        })
    }
}

/// The lock for the file at `path`, keyed by its canonical location so that
/// `data/s.json`, `./data/s.json` and `data/../data/s.json` share one mutex.
/// Creates the parent directory, which must exist to be canonicalized.
async fn write_lock_for(path: &Path) -> Result<Arc<Mutex<()>>, StoreError> {
    let parent = parent_dir(path);
    fs::create_dir_all(&parent).await?;
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} does not name a file", path.display()),
        )
    })?;
    let key = fs::canonicalize(&parent).await?.join(file_name);

    Ok(WRITE_LOCKS
        .entry(key)
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let parent = parent_dir(path);

    let file_name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("submissions.json");
    let tmp = parent.join(format!(".{file_name}.tmp-{}", Uuid::now_v7().simple()));

    if let Err(err) = write_and_rename(&tmp, path, bytes).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(StoreError::Io(err));
    }

    sync_dir(&parent).await;
    Ok(())
}

async fn write_and_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(tmp, path).await
}

/// Persist the rename itself. Best effort: not every platform can open a directory.
async fn sync_dir(dir: &Path) {
    if let Ok(handle) = fs::File::open(dir).await {
        if let Err(err) = handle.sync_all().await {
            tracing::warn!("Failed to sync directory {}: {err}", dir.display());
        }
    }
}
