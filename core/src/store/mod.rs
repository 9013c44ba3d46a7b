//! Whole-file JSON persistence for profiles.
//!
//! Every operation is a read-modify-write of the complete blob; profiles
//! are small and operations follow user actions, so there is no cache to
//! go stale. The in-memory session stays the source of truth: a failed
//! write is logged and reported, never retried, and a corrupt file is
//! discarded rather than allowed to take the session down.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use grimoire_types::{Task, Wizard};
use tracing::{debug, warn};

use crate::catalog;
use crate::progression;

mod blob;

pub use blob::{ProfileRecord, SaveBlob};

/// Errors surfaced by profile persistence.
///
/// Read-side corruption never becomes an error; it is handled internally
/// by starting from an empty profile set.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write profile blob at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode profile blob: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the full profile set.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve the active profile, or `(None, seeded tasks)` when the blob
    /// is empty or the pointer dangles. Lapsed recurring tasks are re-armed
    /// before returning.
    pub fn load_active(&self, now: DateTime<Utc>) -> (Option<Wizard>, Vec<Task>) {
        let blob = self.read_blob();
        let Some(record) = blob.profiles.get(&blob.active_profile_name) else {
            return (None, catalog::seed_tasks());
        };
        let mut tasks = record.task_list.clone();
        progression::reset_recurring_tasks(&mut tasks, now);
        (Some(record.character.clone()), tasks)
    }

    /// Upsert the profile keyed by the wizard's name and make it active.
    pub fn save_active(&self, wizard: &Wizard, tasks: &[Task]) -> Result<(), StoreError> {
        let mut blob = self.read_blob();
        blob.active_profile_name = wizard.name.clone();
        blob.profiles.insert(
            wizard.name.clone(),
            ProfileRecord {
                character: wizard.clone(),
                task_list: tasks.to_vec(),
            },
        );
        self.write_blob(&blob)
    }

    /// All stored profile names, in stored key order.
    pub fn profile_names(&self) -> Vec<String> {
        self.read_blob().profiles.keys().cloned().collect()
    }

    /// Move the active pointer to `name` and return that profile, with
    /// lapsed recurring tasks re-armed.
    ///
    /// An unknown name returns `(None, seeded tasks)` and leaves the stored
    /// pointer untouched.
    pub fn switch_profile(&self, name: &str, now: DateTime<Utc>) -> (Option<Wizard>, Vec<Task>) {
        let mut blob = self.read_blob();
        let Some(record) = blob.profiles.get(name) else {
            return (None, catalog::seed_tasks());
        };
        let character = record.character.clone();
        let mut tasks = record.task_list.clone();
        progression::reset_recurring_tasks(&mut tasks, now);

        blob.active_profile_name = name.to_string();
        if let Err(e) = self.write_blob(&blob) {
            warn!(error = %e, "failed to persist profile switch");
        }
        (Some(character), tasks)
    }

    /// Remove a profile. When the active one is removed the pointer moves
    /// to the first remaining name in key order, or empties when none
    /// remain. Callers re-resolve their session state afterwards.
    pub fn clear_profile(&self, name: &str) -> Result<(), StoreError> {
        let mut blob = self.read_blob();
        if blob.profiles.remove(name).is_none() {
            return Ok(());
        }
        if blob.active_profile_name == name {
            blob.active_profile_name = blob.profiles.keys().next().cloned().unwrap_or_default();
        }
        debug!(profile = %name, "profile cleared");
        self.write_blob(&blob)
    }

    /// Read the blob, recovering to an empty profile set on any failure.
    ///
    /// A missing file is a normal first run and stays quiet; anything else
    /// unreadable or unparseable is logged and discarded.
    fn read_blob(&self) -> SaveBlob {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SaveBlob::default(),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "failed to read profile blob; starting empty"
                );
                return SaveBlob::default();
            }
        };

        match serde_json::from_str::<blob::WireBlob>(&contents) {
            Ok(wire) => SaveBlob::from(wire),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "malformed profile blob discarded; starting empty"
                );
                SaveBlob::default()
            }
        }
    }

    fn write_blob(&self, blob: &SaveBlob) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        let contents = serde_json::to_string_pretty(blob)?;
        fs::write(&self.path, contents).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}
