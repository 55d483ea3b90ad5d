use std::sync::Arc;

use crate::errors::PrefsError;

/// A string-keyed boolean storage area.
///
/// Implementations must make each single-key write atomic: a concurrent
/// `get_bool` sees either the old or the new value, never anything else.
pub trait PrefStorage: Send + Sync {
    /// `None` if the key was never written (or was removed).
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PrefsError>;

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefsError>;

    /// Removing an absent key succeeds without doing anything.
    fn remove(&self, key: &str) -> Result<(), PrefsError>;
}

impl<T: PrefStorage + ?Sized> PrefStorage for Arc<T> {
    fn get_bool(&self, key: &str) -> Result<Option<bool>, PrefsError> {
        (**self).get_bool(key)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<(), PrefsError> {
        (**self).set_bool(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), PrefsError> {
        (**self).remove(key)
    }
}
