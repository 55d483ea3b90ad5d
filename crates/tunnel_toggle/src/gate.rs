use prefs::{PrefStorage, Preferences};
use tracing::warn;

use crate::connectivity::{ConnectivityProbe, ConnectivityState};

/// Decides whether the tunnel toggle control is enabled.
///
/// The gate owns the preference view so the presentation layer has one
/// handle for both the stored intent and the enable/disable decision, but the
/// decision itself only looks at connectivity: the toggle is enabled while
/// the device has, or is establishing, a network connection.
pub struct ConnectivityGate<S, P> {
    prefs: Preferences<S>,
    probe: P,
}

impl<S: PrefStorage, P: ConnectivityProbe> ConnectivityGate<S, P> {
    pub fn new(prefs: Preferences<S>, probe: P) -> Self {
        Self { prefs, probe }
    }

    pub fn preferences(&self) -> &Preferences<S> {
        &self.prefs
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Samples the host once. A failing query is treated as unreachable.
    pub fn connectivity(&self) -> ConnectivityState {
        match self.probe.active_network() {
            Ok(active) => ConnectivityState::from_active(active.as_ref()),
            Err(err) => {
                warn!(error = %err, "connectivity query failed, treating network as unreachable");
                ConnectivityState::unreachable()
            }
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.connectivity().reachable
    }

    /// Whether the user may flip the toggle right now.
    ///
    /// The stored VPN intent is not consulted here.
    pub fn can_toggle_feature(&self) -> bool {
        self.is_reachable()
    }
}
