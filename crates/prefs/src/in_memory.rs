use std::collections::HashMap;
use std::sync::RwLock;

use crate::errors::PrefsError;
use crate::storage::PrefStorage;

/// Non-durable storage, used as a fake in tests and for hosts without a filesystem.
#[derive(Debug, Default)]
pub struct InMemoryPrefs {
    values: RwLock<HashMap<String, bool>>,
}

impl InMemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing values.
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, bool)>,
        K: Into<String>,
    {
        Self {
            values: RwLock::new(values.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

impl PrefStorage for InMemoryPrefs {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PrefsError> {
        let values = self
            .values
            .read()
            .map_err(|_| PrefsError::Poisoned("in-memory prefs"))?;
        Ok(values.get(key).copied())
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefsError> {
        self.values
            .write()
            .map_err(|_| PrefsError::Poisoned("in-memory prefs"))?
            .insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        self.values
            .write()
            .map_err(|_| PrefsError::Poisoned("in-memory prefs"))?
            .remove(key);
        Ok(())
    }
}
