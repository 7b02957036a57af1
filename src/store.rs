use crate::error::StoreError;

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Persistence for one transcript blob per scope key.
///
/// Implementations do no locking of their own: callers serialise access to a
/// key through [`crate::locks::ScopeLocks`].
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// `Ok(None)` when no transcript is stored under `key`.
    async fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces the whole blob.
    async fn write(&self, key: &str, text: &str) -> Result<(), StoreError>;

    /// Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

// region:  --- File store

/// Stores each transcript as `<root>/<key>.txt`.
#[derive(Debug, Clone)]
pub struct FileTranscriptStore {
    root: PathBuf,
}

impl FileTranscriptStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key != "."
            && key != ".."
            && key
                .chars()
                .all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.txt")))
    }
}

#[async_trait]
impl TranscriptStore for FileTranscriptStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        tokio::fs::try_exists(&path)
            .await
            .map_err(|source| StoreError::Read {
                key: key.to_string(),
                source,
            })
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => {
                log::error!("Failed to read transcript file {}: {source}", path.display());
                Err(StoreError::Read {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    async fn write(&self, key: &str, text: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let to_err = |source: io::Error| StoreError::Write {
            key: key.to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.root).await.map_err(to_err)?;

        // Write aside then rename, so a failed write never leaves half a transcript.
        let staging = path.with_extension("txt.tmp");
        tokio::fs::write(&staging, text).await.map_err(to_err)?;
        if let Err(source) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(to_err(source));
        }

        log::debug!("Wrote transcript file: {}", path.display());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("Removed transcript file: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Delete {
                key: key.to_string(),
                source,
            }),
        }
    }
}

// endregion:  --- File store

// region:  --- Memory store

/// In-process store. Failures can be switched on per operation kind.
#[derive(Debug, Default)]
pub struct MemoryTranscriptStore {
    blobs: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, text: &str) {
        self.lock().insert(key.to_string(), text.to_string());
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding the map cannot leave it half-updated.
        self.blobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn injected(flag: &AtomicBool) -> Option<io::Error> {
        flag.load(Ordering::SeqCst)
            .then(|| io::Error::other("injected store failure"))
    }
}

#[async_trait]
impl TranscriptStore for MemoryTranscriptStore {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        if let Some(source) = Self::injected(&self.fail_reads) {
            return Err(StoreError::Read {
                key: key.to_string(),
                source,
            });
        }
        Ok(self.lock().contains_key(key))
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if let Some(source) = Self::injected(&self.fail_reads) {
            return Err(StoreError::Read {
                key: key.to_string(),
                source,
            });
        }
        Ok(self.get(key))
    }

    async fn write(&self, key: &str, text: &str) -> Result<(), StoreError> {
        if let Some(source) = Self::injected(&self.fail_writes) {
            return Err(StoreError::Write {
                key: key.to_string(),
                source,
            });
        }
        self.insert(key, text);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        if let Some(source) = Self::injected(&self.fail_deletes) {
            return Err(StoreError::Delete {
                key: key.to_string(),
                source,
            });
        }
        self.lock().remove(key);
        Ok(())
    }
}

// endregion:  --- Memory store
