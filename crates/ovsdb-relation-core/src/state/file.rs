// # File State Store
//
// File-based implementation of StateStore.
//
// ## Purpose
//
// Each hook runs in a fresh process, so flags must survive between
// invocations. This store keeps them in a JSON file next to the unit's
// other local state.
//
// ## Crash Recovery
//
// - Atomic writes: write to `.tmp`, then rename over the state file
// - Backup: the previous good file is copied to `.backup` before each write
// - Recovery: if the state file fails to parse, the backup is loaded and
//   copied back; if that also fails the store starts empty
//
// ## File Format
//
// ```json
// {
//   "version": "1.0",
//   "updated_at": "2026-01-09T12:00:00Z",
//   "states": ["ovsdb.access.available", "ovsdb.connected"]
// }
// ```

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::StateStore;

/// State file format version
const STATE_FILE_VERSION: &str = "1.0";

/// File-backed flag store
///
/// Writes through on every call that changes the flag set. Calls that leave
/// the set unchanged (setting a present flag, removing an absent one) do not
/// touch the disk.
///
/// # Example
///
/// ```rust,no_run
/// use ovsdb_relation_core::state::FileStateStore;
/// use ovsdb_relation_core::traits::StateStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileStateStore::new("/var/lib/ovsdb-relation/states.json").await?;
///
///     store.set_state("ovsdb.connected").await?;
///     assert!(store.is_state("ovsdb.connected").await?);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    state: Arc<RwLock<FileState>>,
}

#[derive(Debug)]
struct FileState {
    states: BTreeSet<String>,
    dirty: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    updated_at: chrono::DateTime<chrono::Utc>,
    states: BTreeSet<String>,
}

impl FileStateStore {
    /// Create or load a file state store
    ///
    /// Creates the parent directory if needed. A missing state file means no
    /// flags are set.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let states = Self::load_state_with_recovery(&path).await?;

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(FileState {
                states,
                dirty: false,
            })),
        })
    }

    /// Path of the state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_state_with_recovery(path: &Path) -> Result<BTreeSet<String>, Error> {
        match Self::load_state(path).await {
            Ok(states) => {
                tracing::debug!("Loaded {} flag(s) from {}", states.len(), path.display());
                Ok(states)
            }
            Err(Error::Json(e)) => {
                tracing::warn!(
                    "State file {} appears corrupted: {}. Attempting recovery from backup.",
                    path.display(),
                    e
                );

                let backup_path = Self::backup_path(path);
                if !backup_path.exists() {
                    tracing::warn!("No backup file found. Starting with no flags set.");
                    return Ok(BTreeSet::new());
                }

                match Self::load_state(&backup_path).await {
                    Ok(states) => {
                        tracing::info!("Recovered {} flag(s) from backup", states.len());
                        if let Err(restore_err) = fs::copy(&backup_path, path).await {
                            tracing::error!(
                                "Failed to restore state file from backup: {}",
                                restore_err
                            );
                        }
                        Ok(states)
                    }
                    Err(backup_err) => {
                        tracing::error!(
                            "Backup also unreadable: {}. Starting with no flags set.",
                            backup_err
                        );
                        Ok(BTreeSet::new())
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Load flags from a file; parse failures surface as `Error::Json`
    async fn load_state(path: &Path) -> Result<BTreeSet<String>, Error> {
        if !path.exists() {
            tracing::debug!("State file does not exist: {}", path.display());
            return Ok(BTreeSet::new());
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))
        })?;

        let state_file: StateFileFormat = serde_json::from_str(&content)?;

        if state_file.version != STATE_FILE_VERSION {
            tracing::warn!(
                "State file version mismatch: expected {}, got {}. Attempting to load anyway.",
                STATE_FILE_VERSION,
                state_file.version
            );
        }

        Ok(state_file.states)
    }

    /// Write flags to disk atomically
    async fn write_state(&self) -> Result<(), Error> {
        let mut guard = self.state.write().await;

        let state_file = StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            updated_at: chrono::Utc::now(),
            states: guard.states.clone(),
        };
        let json = serde_json::to_string_pretty(&state_file)?;

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            file.write_all(json.as_bytes()).await?;
            file.flush().await?;
        }

        if self.path.exists() {
            let backup_path = Self::backup_path(&self.path);
            if let Err(e) = fs::copy(&self.path, &backup_path).await {
                tracing::warn!("Failed to create backup: {}", e);
            }
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        guard.dirty = false;
        tracing::trace!("Flags written to {}", self.path.display());
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }

    fn backup_path(path: &Path) -> PathBuf {
        let mut backup = path.to_path_buf();
        backup.set_extension("backup");
        backup
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn set_state(&self, name: &str) -> Result<(), Error> {
        let changed = {
            let mut guard = self.state.write().await;
            let inserted = guard.states.insert(name.to_string());
            guard.dirty |= inserted;
            inserted
        };

        if changed {
            self.write_state().await?;
        }
        Ok(())
    }

    async fn remove_state(&self, name: &str) -> Result<(), Error> {
        let changed = {
            let mut guard = self.state.write().await;
            let removed = guard.states.remove(name);
            guard.dirty |= removed;
            removed
        };

        if changed {
            self.write_state().await?;
        }
        Ok(())
    }

    async fn is_state(&self, name: &str) -> Result<bool, Error> {
        Ok(self.state.read().await.states.contains(name))
    }

    async fn list_states(&self) -> Result<Vec<String>, Error> {
        Ok(self.state.read().await.states.iter().cloned().collect())
    }

    async fn flush(&self) -> Result<(), Error> {
        let dirty = self.state.read().await.dirty;
        if dirty {
            self.write_state().await
        } else {
            Ok(())
        }
    }
}
