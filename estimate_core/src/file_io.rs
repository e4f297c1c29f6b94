//! # File Storage
//!
//! Directory-backed [`KeyValueStorage`]: each key is one `<key>.json` file.
//!
//! - **Atomic writes**: write `<key>.json.tmp`, fsync, rename over the target
//! - **Write locking**: an OS-level exclusive lock (fs2) on a
//!   `<key>.json.lock` sidecar is held while writing; the sidecar names the
//!   holder. A sidecar whose OS lock is free was left by a writer that died
//!   and is taken over.
//!
//! The lock serialises physical writes between processes. It does not make a
//! read-modify-write cycle isolated; the last full write still wins.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::file_io::FileStorage;
//! use estimate_core::store::ProjectStore;
//!
//! let storage = FileStorage::new(".easybuild", "site-office");
//! let store = ProjectStore::new(storage);
//! for project in store.list() {
//!     println!("{} {}", project.id, project.name);
//! }
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{EstimateError, EstimateResult};
use crate::store::KeyValueStorage;

/// Locks older than this are reported as stale
const STALE_LOCK_HOURS: i64 = 24;

/// Machine name recorded when the host name cannot be determined
const UNKNOWN_MACHINE: &str = "unknown";

/// Holder metadata written into the `.lock` sidecar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who took the lock (user name, e-mail, terminal label)
    pub user_id: String,
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: current_machine(),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Whether the holder is gone or the lock has expired
    fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > chrono::Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        if self.machine == current_machine() {
            return !process_alive(self.pid);
        }
        false
    }

    fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }
}

fn current_machine() -> String {
    hostname().unwrap_or_else(|| UNKNOWN_MACHINE.to_string())
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

fn process_alive(pid: u32) -> bool {
    #[cfg(target_os = "linux")]
    {
        Path::new(&format!("/proc/{}", pid)).exists()
    }
    #[cfg(not(target_os = "linux"))]
    {
        // No cheap portable probe; rely on the age check
        let _ = pid;
        true
    }
}

/// Exclusive write lock on a storage file, released on drop.
pub struct FileLock {
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the write lock for `path`.
    ///
    /// The OS lock decides ownership. Holder metadata left in the sidecar by
    /// a process that no longer holds the OS lock is overwritten.
    ///
    /// # Errors
    ///
    /// * `EstimateError::FileLocked` - another process holds the lock
    /// * `EstimateError::FileError` - the sidecar could not be written
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EstimateResult<Self> {
        let lock_path = sidecar_path(path, "lock");

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| io_error("open lock", &lock_path, e))?;

        if handle.try_lock_exclusive().is_err() {
            let (holder, locked_at) = match read_lock_info(&lock_path) {
                Some(existing) => (existing.holder(), existing.locked_at.to_rfc3339()),
                None => ("another process".to_string(), "unknown".to_string()),
            };
            return Err(EstimateError::file_locked(path.display().to_string(), holder, locked_at));
        }

        if let Some(existing) = read_lock_info(&lock_path) {
            debug!(path = %lock_path.display(), holder = %existing.holder(), "Taking over abandoned lock");
        }

        let info = LockInfo::new(user_id);
        let json = serde_json::to_string_pretty(&info).map_err(EstimateError::serialization)?;
        handle
            .set_len(0)
            .and_then(|_| handle.write_all(json.as_bytes()))
            .and_then(|_| handle.sync_all())
            .map_err(|e| io_error("write lock", &lock_path, e))?;

        Ok(FileLock {
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current holder of the lock on `path`, if any live one exists
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&sidecar_path(path, "lock")).filter(|info| !info.is_stale())
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `project.json` -> `project.json.<suffix>`
fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn io_error(operation: &str, path: &Path, err: std::io::Error) -> EstimateError {
    EstimateError::file_error(operation, path.display().to_string(), err.to_string())
}

/// Write `contents` to `path` so that readers see either the old or the new
/// file, never a partial one.
pub fn write_atomic(path: &Path, contents: &str) -> EstimateResult<()> {
    let tmp_path = sidecar_path(path, "tmp");

    let mut tmp = File::create(&tmp_path).map_err(|e| io_error("create temp file", &tmp_path, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.sync_all())
        .map_err(|e| io_error("write temp file", &tmp_path, e))?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io_error("rename to final", path, e)
    })
}

/// Read a file, mapping "not found" to `None`.
pub fn read_optional(path: &Path) -> EstimateResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(io_error("read", path, e)),
    }
}

/// Key-value storage over a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    user_id: String,
}

impl FileStorage {
    /// # Arguments
    ///
    /// * `dir` - Directory holding one file per key (created on first write)
    /// * `user_id` - Name recorded in lock files while writing
    pub fn new(dir: impl Into<PathBuf>, user_id: impl Into<String>) -> Self {
        FileStorage {
            dir: dir.into(),
            user_id: user_id.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> EstimateResult<Option<String>> {
        read_optional(&self.path_for(key))
    }

    fn set(&mut self, key: &str, value: &str) -> EstimateResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error("create directory", &self.dir, e))?;

        let path = self.path_for(key);
        let _lock = FileLock::acquire(&path, self.user_id.as_str())?;
        write_atomic(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote storage file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_paths() {
        let path = Path::new("/data/dream_home_projects.json");
        assert_eq!(sidecar_path(path, "lock"), Path::new("/data/dream_home_projects.json.lock"));
        assert_eq!(sidecar_path(path, "tmp"), Path::new("/data/dream_home_projects.json.tmp"));
    }

    #[test]
    fn test_lock_info_creation() {
        let info = LockInfo::new("site-office");
        assert_eq!(info.user_id, "site-office");
        assert!(info.pid > 0);
        assert!(!info.is_stale());
    }

    #[test]
    fn test_old_lock_is_stale() {
        let mut info = LockInfo::new("someone");
        info.machine = "another-machine".to_string();
        info.locked_at = Utc::now() - chrono::Duration::hours(STALE_LOCK_HOURS + 1);
        assert!(info.is_stale());
    }

    #[test]
    fn test_atomic_write_leaves_no_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        write_atomic(&path, "[]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert!(!sidecar_path(&path, "tmp").exists());

        write_atomic(&path, "[1]").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1]");
    }

    #[test]
    fn test_read_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_optional(&dir.path().join("absent.json")).unwrap(), None);
    }

    #[test]
    fn test_lock_acquire_and_release() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let lock = FileLock::acquire(&path, "first").unwrap();
        let lock_path = sidecar_path(&path, "lock");
        assert!(lock_path.exists());
        assert_eq!(FileLock::check(&path).map(|i| i.user_id), Some("first".to_string()));

        drop(lock);
        assert!(!lock_path.exists());
        assert!(FileLock::check(&path).is_none());
    }

    #[test]
    fn test_held_lock_blocks_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path(), "me");
        let path = storage.path_for("projects");

        let _held = FileLock::acquire(&path, "colleague").unwrap();

        let err = storage.set("projects", "[]").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert!(err.is_recoverable());
        match err {
            EstimateError::FileLocked { locked_by, .. } => assert!(locked_by.starts_with("colleague")),
            other => panic!("expected FileLocked, got {:?}", other),
        }
    }

    #[test]
    fn test_failed_acquire_keeps_holder_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");

        let _held = FileLock::acquire(&path, "first").unwrap();
        assert!(FileLock::acquire(&path, "second").is_err());

        assert_eq!(FileLock::check(&path).map(|i| i.user_id), Some("first".to_string()));
    }

    #[test]
    fn test_abandoned_sidecar_is_taken_over() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path(), "me");
        let path = storage.path_for("projects");

        // Left behind by a killed writer: fresh metadata, no OS lock
        let mut ghost = LockInfo::new("colleague");
        ghost.machine = "other-host".to_string();
        ghost.pid = u32::MAX;
        fs::write(sidecar_path(&path, "lock"), serde_json::to_string(&ghost).unwrap()).unwrap();

        storage.set("projects", "[]").unwrap();
        assert_eq!(storage.get("projects").unwrap().as_deref(), Some("[]"));
        assert!(!sidecar_path(&path, "lock").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_dead_local_holder_is_stale() {
        let mut info = LockInfo::new("me");
        info.pid = u32::MAX;
        assert!(info.is_stale());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"), "me");

        assert_eq!(storage.get("projects").unwrap(), None);
        storage.set("projects", "[\"a\"]").unwrap();
        assert_eq!(storage.get("projects").unwrap().as_deref(), Some("[\"a\"]"));
        assert!(storage.path_for("projects").exists());
        assert!(!sidecar_path(&storage.path_for("projects"), "lock").exists());
    }
}
