//! Network reachability as reported by the host.
//!
//! The host (OS layer) keeps the network status current; this module only
//! reads it. No live probing, no caching beyond a single call and no waiting
//! for a connection to appear.

use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

/// Kind of the active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkKind {
    Wifi,
    Cellular,
    Ethernet,
    Vpn,
    Other,
}

/// Coarse state of the active connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkState {
    Connecting,
    Connected,
    Suspended,
    Disconnecting,
    Disconnected,
    Unknown,
}

impl NetworkState {
    /// "Connected or connecting" counts as reachable.
    pub fn is_connected_or_connecting(self) -> bool {
        matches!(self, NetworkState::Connected | NetworkState::Connecting)
    }
}

/// The connection the host currently reports as active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveNetwork {
    pub kind: NetworkKind,
    pub state: NetworkState,
}

impl ActiveNetwork {
    pub fn new(kind: NetworkKind, state: NetworkState) -> Self {
        Self { kind, state }
    }
}

/// Reachability snapshot, recomputed on every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    pub reachable: bool,
}

impl ConnectivityState {
    pub fn from_active(active: Option<&ActiveNetwork>) -> Self {
        Self {
            reachable: active.is_some_and(|net| net.state.is_connected_or_connecting()),
        }
    }

    pub const fn unreachable() -> Self {
        Self { reachable: false }
    }
}

#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("connectivity service unavailable")]
    ServiceUnavailable,
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("host query failed: {0}")]
    Query(String),
}

/// Synchronous lookup of the host's active connection.
pub trait ConnectivityProbe: Send + Sync {
    /// `Ok(None)` when the host has no active connection.
    fn active_network(&self) -> Result<Option<ActiveNetwork>, ConnectivityError>;
}

impl<T: ConnectivityProbe + ?Sized> ConnectivityProbe for std::sync::Arc<T> {
    fn active_network(&self) -> Result<Option<ActiveNetwork>, ConnectivityError> {
        (**self).active_network()
    }
}

/// Probe whose snapshot is maintained by the host's network callbacks.
///
/// The host layer registers its own listeners and calls `on_network_changed`
/// or `on_network_lost` on every change. `active_network` never blocks longer
/// than a lock acquisition.
#[derive(Debug, Default)]
pub struct CachedConnectivity {
    active: RwLock<Option<ActiveNetwork>>,
}

impl CachedConnectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(active: ActiveNetwork) -> Self {
        Self {
            active: RwLock::new(Some(active)),
        }
    }

    pub fn on_network_changed(&self, active: ActiveNetwork) {
        debug!(kind = ?active.kind, state = ?active.state, "active network changed");
        // A poisoned lock still holds a complete value
        let mut slot = self.active.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(active);
    }

    pub fn on_network_lost(&self) {
        debug!("active network lost");
        let mut slot = self.active.write().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

impl ConnectivityProbe for CachedConnectivity {
    fn active_network(&self) -> Result<Option<ActiveNetwork>, ConnectivityError> {
        self.active
            .read()
            .map(|slot| *slot)
            .map_err(|_| ConnectivityError::Query("network snapshot lock poisoned".into()))
    }
}
