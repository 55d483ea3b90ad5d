//! Facts about the installed package, answered by the host.

use thiserror::Error;
use tracing::error;

/// Installer package name of the Google Play store.
pub const PLAY_STORE_INSTALLER: &str = "com.android.vending";

#[derive(Debug, Error)]
pub enum HostError {
    #[error("package not found: {0}")]
    PackageNotFound(String),
    #[error("host query failed: {0}")]
    Query(String),
}

/// Package metadata lookups provided by the host layer.
pub trait PackageInfo: Send + Sync {
    fn package_name(&self) -> &str;

    /// Whether the running build carries the debuggable flag.
    fn debuggable(&self) -> Result<bool, HostError>;

    /// Package name of whatever installed us; `None` for sideloaded builds.
    fn installer_package_name(&self) -> Result<Option<String>, HostError>;
}

/// Debug build check. Lookup failures count as a release build.
pub fn is_debuggable(package: &dyn PackageInfo) -> bool {
    package.debuggable().unwrap_or_else(|err| {
        error!(package = package.package_name(), error = %err, "error fetching package information");
        false
    })
}

/// Whether the app was installed through the Play store.
pub fn is_play_version(package: &dyn PackageInfo) -> bool {
    match package.installer_package_name() {
        Ok(installer) => installer.as_deref() == Some(PLAY_STORE_INSTALLER),
        Err(err) => {
            error!(package = package.package_name(), error = %err, "error fetching package information");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePackage {
        debuggable: Option<bool>,
        installer: Result<Option<&'static str>, ()>,
    }

    impl PackageInfo for FakePackage {
        fn package_name(&self) -> &str {
            "org.getlantern.lantern"
        }

        fn debuggable(&self) -> Result<bool, HostError> {
            self.debuggable
                .ok_or_else(|| HostError::PackageNotFound(self.package_name().to_owned()))
        }

        fn installer_package_name(&self) -> Result<Option<String>, HostError> {
            self.installer
                .map(|i| i.map(str::to_owned))
                .map_err(|()| HostError::Query("installer lookup denied".into()))
        }
    }

    #[test]
    fn debuggable_flag_is_reported() {
        let pkg = FakePackage {
            debuggable: Some(true),
            installer: Ok(None),
        };
        assert!(is_debuggable(&pkg));
    }

    #[test]
    fn missing_package_is_not_debuggable() {
        let pkg = FakePackage {
            debuggable: None,
            installer: Ok(None),
        };
        assert!(!is_debuggable(&pkg));
    }

    #[test]
    fn only_play_installer_counts() {
        let cases = [
            (Ok(Some(PLAY_STORE_INSTALLER)), true),
            (Ok(Some("com.amazon.venezia")), false),
            (Ok(None), false),
            (Err(()), false),
        ];
        for (installer, expected) in cases {
            let pkg = FakePackage {
                debuggable: Some(false),
                installer,
            };
            assert_eq!(is_play_version(&pkg), expected, "{installer:?}");
        }
    }
}
