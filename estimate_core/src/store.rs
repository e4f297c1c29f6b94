//! # Project Store
//!
//! Persists [`SavedProject`] snapshots as one JSON array under a fixed key
//! of a [`KeyValueStorage`].
//!
//! Every mutation reads the whole collection, changes it, and writes the
//! whole collection back in a single `set`. This suits one interactive
//! writer; independent writers can overwrite each other (last write wins).
//!
//! Reads fail open: a missing, unreadable or unparseable payload is an empty
//! collection. Write failures are returned to the caller.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::calculations::calculate;
//! use estimate_core::project::ProjectConfiguration;
//! use estimate_core::store::{MemoryStorage, ProjectStore};
//!
//! let mut store = ProjectStore::new(MemoryStorage::default());
//! let config = ProjectConfiguration::default();
//! let total = calculate(&config).total;
//!
//! let saved = store.save("My Dream Home", &config, total, None)?;
//! assert_eq!(store.list().len(), 1);
//! assert_eq!(store.get_by_id(&saved.id).unwrap().total, total);
//! # Ok::<(), estimate_core::errors::EstimateError>(())
//! ```

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::project::{ProjectConfiguration, SavedProject};

/// Key the saved-project collection lives under
pub const STORAGE_KEY: &str = "dream_home_projects";

/// Durable string storage addressed by key.
pub trait KeyValueStorage {
    /// Raw value for `key`, `None` if nothing is stored
    fn get(&self, key: &str) -> EstimateResult<Option<String>>;

    /// Replace the value for `key`
    fn set(&mut self, key: &str, value: &str) -> EstimateResult<()>;
}

/// In-process storage for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Storage pre-seeded with a raw value
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        MemoryStorage { entries }
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> EstimateResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> EstimateResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Saved-project repository over a key-value storage.
#[derive(Debug)]
pub struct ProjectStore<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> ProjectStore<S> {
    pub fn new(storage: S) -> Self {
        ProjectStore { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// All saved projects in storage order.
    ///
    /// Returns an empty list when nothing is stored or the stored payload
    /// cannot be read or parsed. Records that do not match the project
    /// layout are skipped one by one. Such failures are logged, never
    /// returned.
    pub fn list(&self) -> Vec<SavedProject> {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read saved projects, treating as empty");
                return Vec::new();
            }
        };

        let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, bytes = raw.len(), "Failed to parse saved projects, treating as empty");
                return Vec::new();
            }
        };

        let total = records.len();
        let mut projects = Vec::with_capacity(total);
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<SavedProject>(record) {
                Ok(project) => projects.push(project),
                Err(e) => warn!(index, error = %e, "Skipping unreadable saved project"),
            }
        }
        if projects.len() < total {
            warn!(
                skipped = total - projects.len(),
                kept = projects.len(),
                "Some saved projects could not be read and will be dropped on the next save"
            );
        }
        projects
    }

    /// Save a snapshot.
    ///
    /// With an `id` matching a stored project, that record is replaced in
    /// place. Otherwise the snapshot is appended under a fresh UUID. The
    /// timestamp is always the current time.
    ///
    /// # Errors
    ///
    /// Storage write failures are returned unchanged.
    pub fn save(
        &mut self,
        name: &str,
        config: &ProjectConfiguration,
        total: f64,
        id: Option<&str>,
    ) -> EstimateResult<SavedProject> {
        let mut projects = self.list();
        let existing = id.and_then(|id| projects.iter().position(|p| p.id == id));

        let project = SavedProject {
            id: match existing {
                Some(index) => projects[index].id.clone(),
                None => Uuid::new_v4().to_string(),
            },
            name: name.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            state: config.clone(),
            total,
        };

        match existing {
            Some(index) => {
                debug!(id = %project.id, "Updating saved project in place");
                projects[index] = project.clone();
            }
            None => {
                if let Some(requested) = id {
                    debug!(requested, "No saved project with requested id, creating a new one");
                }
                debug!(id = %project.id, "Appending new saved project");
                projects.push(project.clone());
            }
        }

        self.write_all(&projects)?;
        Ok(project)
    }

    /// Delete a project. Returns whether a record was removed.
    ///
    /// An unknown id is not an error and leaves storage untouched.
    pub fn delete(&mut self, id: &str) -> EstimateResult<bool> {
        let mut projects = self.list();
        let before = projects.len();
        projects.retain(|p| p.id != id);

        if projects.len() == before {
            debug!(id, "Delete requested for unknown project");
            return Ok(false);
        }

        self.write_all(&projects)?;
        Ok(true)
    }

    /// Look up a project by id
    pub fn get_by_id(&self, id: &str) -> Option<SavedProject> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Like [`get_by_id`](Self::get_by_id), but a missing project is an error
    pub fn require(&self, id: &str) -> EstimateResult<SavedProject> {
        self.get_by_id(id).ok_or_else(|| EstimateError::project_not_found(id))
    }

    fn write_all(&mut self, projects: &[SavedProject]) -> EstimateResult<()> {
        let json = serde_json::to_string(projects).map_err(EstimateError::serialization)?;
        self.storage.set(STORAGE_KEY, &json)
    }
}
