//! Best-effort on-disk cache of decoder and encoder settings.
//!
//! Each [`ObjectType`] is stored as bincode in `<dir>/<ObjectType>.cache`. A
//! failed or missing read is a miss and a failed write is only logged, so the
//! cache never changes what gets decoded or printed.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum_macros::{Display, EnumIter};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::error::CacheError;

/// Kind of cached object, which also names its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum ObjectType {
    JsonDecoder,
    XmlDecoder,
    XmlEncoder,
}

impl ObjectType {
    pub fn file_name(self) -> String {
        format!("{self}.cache")
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct CacheTimes {
    last_read: Option<DateTime<Utc>>,
    last_write: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CacheClient {
    dir: PathBuf,
    times: Arc<Mutex<CacheTimes>>,
    write_lock: Arc<Mutex<()>>,
}

impl CacheClient {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            times: Arc::new(Mutex::new(CacheTimes::default())),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, kind: ObjectType) -> PathBuf {
        self.dir.join(kind.file_name())
    }

    /// Loads a cached object, returning `None` on a miss or an unreadable file.
    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn read<T: DeserializeOwned>(&self, kind: ObjectType) -> Option<T> {
        let path = self.path_for(kind);
        if !path.exists() {
            debug!(path = %path.display(), "Cache miss");
            return None;
        }

        match read_file(&path) {
            Ok(value) => {
                if let Ok(mut times) = self.times.lock() {
                    times.last_read = Some(Utc::now());
                }
                debug!(path = %path.display(), "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Ignoring unreadable cache file");
                None
            }
        }
    }

    /// Stores `value` on a blocking worker and returns without waiting for it.
    ///
    /// Writes from clones of the same client are serialized; the returned handle
    /// may be awaited or dropped.
    pub fn write<T>(&self, kind: ObjectType, value: &T) -> JoinHandle<()>
    where
        T: Serialize,
    {
        let path = self.path_for(kind);
        let encoded = bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(CacheError::from);
        let times = Arc::clone(&self.times);
        let write_lock = Arc::clone(&self.write_lock);

        tokio::task::spawn_blocking(move || {
            let _guard = write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let result = encoded.and_then(|bytes| write_file(&path, &bytes));
            match result {
                Ok(()) => {
                    if let Ok(mut times) = times.lock() {
                        times.last_write = Some(Utc::now());
                    }
                    debug!(path = %path.display(), "Cache written");
                }
                Err(e) => error!(error = %e, path = %path.display(), "Failed to write cache"),
            }
        })
    }

    pub fn last_read(&self) -> Option<DateTime<Utc>> {
        self.times.lock().ok().and_then(|times| times.last_read)
    }

    pub fn last_write(&self) -> Option<DateTime<Utc>> {
        self.times.lock().ok().and_then(|times| times.last_write)
    }
}

fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, CacheError> {
    let bytes = fs::read(path)?;
    let (value, _) = bincode::serde::decode_from_slice(&bytes, bincode::config::standard())?;
    Ok(value)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, bytes)?;
    Ok(())
}
