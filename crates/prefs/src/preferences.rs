use tracing::{debug, error, warn};

use crate::storage::PrefStorage;
use crate::PREF_USE_VPN;

/// Snapshot of one named flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preference {
    pub key: &'static str,
    pub value: bool,
    /// Whether the key has ever been written (and not cleared since).
    pub present: bool,
}

/// Infallible view over a `PrefStorage`.
///
/// The flags stored here are non-critical UI state, so storage failures never
/// reach the caller: a failed read is "unset" (`false`), a failed write or
/// clear returns `false` and is logged. Nothing is retried.
#[derive(Debug, Default)]
pub struct Preferences<S> {
    storage: S,
}

impl<S: PrefStorage> Preferences<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored value for `key`, `false` if never set or unreadable.
    pub fn get(&self, key: &str) -> bool {
        self.lookup(key).unwrap_or(false)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    pub fn read(&self, key: &'static str) -> Preference {
        let stored = self.lookup(key);
        Preference {
            key,
            value: stored.unwrap_or(false),
            present: stored.is_some(),
        }
    }

    /// Persist `value` under `key`. Returns whether the write was committed.
    pub fn set(&self, key: &str, value: bool) -> bool {
        match self.storage.set_bool(key, value) {
            Ok(()) => true,
            Err(err) => {
                error!(key, value, error = %err, "failed to write preference");
                false
            }
        }
    }

    /// Remove `key`; clearing an absent key is a successful no-op.
    pub fn clear(&self, key: &str) -> bool {
        match self.storage.remove(key) {
            Ok(()) => {
                debug!(key, "preference cleared");
                true
            }
            Err(err) => {
                error!(key, error = %err, "failed to clear preference");
                false
            }
        }
    }

    pub fn use_vpn(&self) -> bool {
        self.get(PREF_USE_VPN)
    }

    pub fn set_use_vpn(&self, enabled: bool) -> bool {
        self.set(PREF_USE_VPN, enabled)
    }

    /// Forget the stored VPN intent. Other keys in the namespace are kept.
    pub fn clear_preferences(&self) -> bool {
        self.clear(PREF_USE_VPN)
    }

    fn lookup(&self, key: &str) -> Option<bool> {
        match self.storage.get_bool(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read preference, treating as unset");
                None
            }
        }
    }
}
