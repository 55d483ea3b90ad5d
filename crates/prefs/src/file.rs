use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use fs2::FileExt;
use ron::ser::PrettyConfig;
use tracing::{debug, warn};

use crate::errors::PrefsError;
use crate::storage::PrefStorage;

/// FilePrefs: one preference namespace persisted as a RON map.
///
/// Notes:
/// - All values are cached in memory; reads never touch the disk.
/// - Every write holds the in-memory write lock and an exclusive advisory
///   lock on `<name>.lock`, re-reads the file, applies the change and
///   persists the whole map: write `<name>.tmp`, fsync, rename over the
///   target. Keys written by other handles (or processes) are kept, and the
///   rename makes a single-key write atomic on disk.
/// - The in-memory map only changes once the rename succeeded, so a failed
///   write leaves the previous value visible.
/// - Reads between writes see this handle's cache; `reload` picks up other
///   handles' changes without writing.
pub struct FilePrefs {
    path: PathBuf,
    values: RwLock<BTreeMap<String, bool>>,
}

impl FilePrefs {
    /// Open (or create) the namespace file at `path`.
    ///
    /// Parent directories are created; a missing or empty file is an empty
    /// namespace. A file that does not parse is also treated as empty (it is
    /// replaced by the next write); only I/O failures are returned.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let values = match read_map(&path) {
            Ok(values) => values,
            Err(PrefsError::Parse(err)) => {
                warn!(path = %path.display(), error = %err, "preference file is unreadable, starting empty");
                BTreeMap::new()
            }
            Err(err) => return Err(err),
        };
        debug!(path = %path.display(), entries = values.len(), "opened preference file");

        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the backing file, replacing the cached values.
    /// Unlike `open`, a file that does not parse is an error and the cache is kept.
    pub fn reload(&self) -> Result<(), PrefsError> {
        let fresh = read_map(&self.path)?;
        *self
            .values
            .write()
            .map_err(|_| PrefsError::Poisoned("file prefs"))? = fresh;
        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    /// Apply `change` to the on-disk map under the file lock, write it back,
    /// then publish it to the cache.
    fn write_with<F>(&self, change: F) -> Result<(), PrefsError>
    where
        F: FnOnce(&mut BTreeMap<String, bool>) -> bool,
    {
        let mut values = self
            .values
            .write()
            .map_err(|_| PrefsError::Poisoned("file prefs"))?;

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let lock = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.lock_path())?;
        lock.lock_exclusive()?;

        let res = self.apply_locked(&values, change);

        // Closing the handle releases the lock as well
        if let Err(err) = FileExt::unlock(&lock) {
            warn!(path = %self.path.display(), error = %err, "failed to release preference file lock");
        }

        *values = res?;
        Ok(())
    }

    /// Runs with the file lock held. Returns the map that is now on disk.
    fn apply_locked<F>(
        &self,
        cached: &BTreeMap<String, bool>,
        change: F,
    ) -> Result<BTreeMap<String, bool>, PrefsError>
    where
        F: FnOnce(&mut BTreeMap<String, bool>) -> bool,
    {
        // Start from the file so writes from other handles are kept
        let mut next = match read_map(&self.path) {
            Ok(on_disk) => on_disk,
            Err(PrefsError::Parse(err)) => {
                warn!(path = %self.path.display(), error = %err, "preference file is unreadable, rewriting from cache");
                cached.clone()
            }
            Err(err) => return Err(err),
        };

        if change(&mut next) {
            let text = ron::ser::to_string_pretty(&next, PrettyConfig::default())?;
            self.replace_file(text.as_bytes())?;
        }
        Ok(next)
    }

    /// The rename is the commit point; failures after it are only logged.
    fn replace_file(&self, bytes: &[u8]) -> Result<(), PrefsError> {
        let tmp = self.path.with_extension("tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(bytes)?;
        f.sync_all()?;
        fs::rename(&tmp, &self.path)?;

        #[cfg(unix)]
        if let Some(dir) = self.path.parent() {
            if let Err(err) = File::open(dir).and_then(|d| d.sync_all()) {
                warn!(dir = %dir.display(), error = %err, "failed to sync preference directory");
            }
        }
        Ok(())
    }
}

fn read_map(path: &Path) -> Result<BTreeMap<String, bool>, PrefsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(ron::from_str(&content)?)
}

impl PrefStorage for FilePrefs {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PrefsError> {
        let values = self
            .values
            .read()
            .map_err(|_| PrefsError::Poisoned("file prefs"))?;
        Ok(values.get(key).copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.write_with(|map| map.insert(key.to_owned(), value) != Some(value))?;
        debug!(key, value, "preference written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.write_with(|map| map.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("nested").join("Prefs.ron")).unwrap();

        assert_eq!(prefs.get_bool("pref_vpn").unwrap(), None);
        assert!(!prefs.path().exists(), "opening must not create the file");
    }

    #[test]
    fn unchanged_write_does_not_touch_disk() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("Prefs.ron")).unwrap();

        prefs.remove("never_written").unwrap();
        assert!(!prefs.path().exists());

        prefs.set_bool("k", true).unwrap();
        let written = fs::read_to_string(prefs.path()).unwrap();
        prefs.set_bool("k", true).unwrap();
        assert_eq!(fs::read_to_string(prefs.path()).unwrap(), written);
    }

    #[test]
    fn file_holds_plain_ron_map() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("Prefs.ron")).unwrap();
        prefs.set_bool("pref_vpn", true).unwrap();

        let content = fs::read_to_string(prefs.path()).unwrap();
        let parsed: BTreeMap<String, bool> = ron::from_str(&content).unwrap();
        assert_eq!(parsed.get("pref_vpn"), Some(&true));
        assert!(!prefs.path().with_extension("tmp").exists());
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::open(dir.path().join("Prefs.ron")).unwrap();
        prefs.set_bool("pref_vpn", true).unwrap();

        // A directory where the temp file should go makes the write fail
        let tmp = prefs.path().with_extension("tmp");
        fs::create_dir(&tmp).unwrap();

        assert!(prefs.set_bool("pref_vpn", false).is_err());
        assert_eq!(prefs.get_bool("pref_vpn").unwrap(), Some(true));

        fs::remove_dir(&tmp).unwrap();
        let reopened = FilePrefs::open(prefs.path()).unwrap();
        assert_eq!(reopened.get_bool("pref_vpn").unwrap(), Some(true));
    }

    #[test]
    fn write_merges_keys_from_other_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Prefs.ron");
        let first = FilePrefs::open(&path).unwrap();
        let second = FilePrefs::open(&path).unwrap();

        first.set_bool("pref_vpn", true).unwrap();
        second.set_bool("other", true).unwrap();

        // The second handle's cache now holds what was on disk when it wrote
        assert_eq!(second.get_bool("pref_vpn").unwrap(), Some(true));

        second.remove("pref_vpn").unwrap();
        first.set_bool("third", false).unwrap();
        assert_eq!(first.get_bool("pref_vpn").unwrap(), None);
        assert_eq!(first.get_bool("other").unwrap(), Some(true));
    }
}
