//! Tunnel toggle core.
//!
//! - [`gate`]: whether the toggle control may be switched right now
//! - [`connectivity`]: the host-facing reachability seam
//! - [`email`]: syntax check for user-supplied email addresses
//! - [`host`]: install/build facts about the running package

pub mod connectivity;
pub mod email;
pub mod gate;
pub mod host;

pub use connectivity::{
    ActiveNetwork, CachedConnectivity, ConnectivityError, ConnectivityProbe, ConnectivityState,
    NetworkKind, NetworkState,
};
pub use email::is_valid_email;
pub use gate::ConnectivityGate;
pub use host::{is_debuggable, is_play_version, HostError, PackageInfo, PLAY_STORE_INSTALLER};
