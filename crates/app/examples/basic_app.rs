//! Basic application example: bootstrap the context, then drive the toggle
//! the way a presentation layer would.

use app::{AppBuilder, Application, BoxError};
use tunnel_toggle::{
    is_valid_email, ActiveNetwork, CachedConnectivity, NetworkKind, NetworkState,
};

struct MyApp;

impl Application for MyApp {
    const APP_ID: &'static str = "tunnel_toggle_demo";
    // Uses defaults: STUDIO = "getlantern", PROJECT_ID = "lantern_mobile"
}

fn main() -> Result<(), BoxError> {
    let app_context = AppBuilder::<MyApp>::new("1.0.0")?.build();
    let ctx = app_context.path_context();

    println!("App ID: {}", app_context.app_id());
    println!("Version: {}", app_context.version());
    println!("Environment: {:?}", ctx.environment());
    println!("Preferences: {:?}", ctx.prefs_file(MyApp::PREFS_NAMESPACE));
    println!("Log file: {:?}", ctx.log_file_now());
    println!();

    // The host layer would feed this from its own network callbacks
    let gate = app_context.connectivity_gate(CachedConnectivity::new());
    println!("Offline, toggle enabled: {}", gate.can_toggle_feature());

    gate.probe().on_network_changed(ActiveNetwork::new(
        NetworkKind::Wifi,
        NetworkState::Connecting,
    ));
    println!("Connecting, toggle enabled: {}", gate.can_toggle_feature());

    let stored = gate.preferences().use_vpn();
    gate.preferences().set_use_vpn(!stored);
    println!("VPN intent flipped: {} -> {}", stored, gate.preferences().use_vpn());

    for email in ["user@example.com", "user@domain"] {
        println!("{email:?} valid: {}", is_valid_email(email));
    }

    Ok(())
}
