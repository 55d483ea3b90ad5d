//! Application-scoped boolean preferences.
//!
//! `PrefStorage` is the storage seam (fallible, typed errors). `Preferences`
//! sits on top of it and never fails: reads degrade to `false`, writes report
//! whether they were committed.

mod errors;
mod file;
mod in_memory;
mod preferences;
mod storage;

pub use errors::PrefsError;
pub use file::FilePrefs;
pub use in_memory::InMemoryPrefs;
pub use preferences::{Preference, Preferences};
pub use storage::PrefStorage;

/// Namespace of the application's preference area.
pub const PREFS_NAME: &str = "LanternPrefs";

/// Whether the user wants the VPN tunnel active.
pub const PREF_USE_VPN: &str = "pref_vpn";
