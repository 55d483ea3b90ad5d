use paths::PathContext;
use prefs::{FilePrefs, Preferences};
use std::marker::PhantomData;
#[cfg(debug_assertions)]
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{
    Layer, filter::LevelFilter, filter::filter_fn, fmt, layer::SubscriberExt,
    util::SubscriberInitExt,
};
use tunnel_toggle::{ConnectivityGate, ConnectivityProbe};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Preference store shared between the context and any gates built from it.
pub type SharedPrefs = Arc<FilePrefs>;

/// Application infrastructure context.
///
/// Contains path management, version info, the durable preference area and
/// the logging guard.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    prefs: SharedPrefs,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }

    /// A preference view over the application's namespace.
    pub fn preferences(&self) -> Preferences<SharedPrefs> {
        Preferences::new(Arc::clone(&self.prefs))
    }

    /// Build the toggle gate over this context's preferences and the host's probe.
    pub fn connectivity_gate<P: ConnectivityProbe>(
        &self,
        probe: P,
    ) -> ConnectivityGate<SharedPrefs, P> {
        ConnectivityGate::new(self.preferences(), probe)
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "getlantern";
    const PROJECT_ID: &'static str = "lantern_mobile";
    /// Namespace of the preference file under `shared_prefs/`.
    const PREFS_NAMESPACE: &'static str = prefs::PREFS_NAME;
}

/// Builder for creating the application context with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Initializes logging (file + console)
    /// - Ensures all directories exist
    /// - Opens the preference namespace
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        // Debug builds keep their state inside the workspace
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::STUDIO,
            A::PROJECT_ID,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID);

        Self::with_path_context(path_context, version)
    }

    /// Same as [`AppBuilder::new`] with an explicit path layout.
    pub fn with_path_context(
        path_context: PathContext,
        version: &'static str,
    ) -> Result<Self, BoxError> {
        path_context.ensure_directories()?;

        let log_guard = init_logging(&path_context)?;

        let prefs_file = path_context.prefs_file(A::PREFS_NAMESPACE);
        let prefs = Arc::new(FilePrefs::open(&prefs_file)?);
        info!(
            app = A::APP_ID,
            version,
            prefs = %prefs_file.display(),
            "application context ready"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                prefs,
                _log_guard: log_guard,
            },
            _marker: PhantomData,
        })
    }

    pub fn build(self) -> AppContext {
        self.context
    }
}

fn init_logging(
    path_context: &PathContext,
) -> Result<tracing_appender::non_blocking::WorkerGuard, BoxError> {
    let log_file_path = path_context.log_file_now();
    let log_dir = log_file_path
        .parent()
        .ok_or("log file path should have a parent directory")?;
    let log_filename = log_file_path
        .file_name()
        .ok_or("log file path should have a file name")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    // Separate layer: file (non-blocking) + console (stdout)
    let file_layer = fmt::Layer::default()
        .with_target(false)
        .with_ansi(false)
        .with_writer(non_blocking)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    let console_layer = fmt::Layer::default()
        .with_target(false)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .is_err()
    {
        debug!("global subscriber already installed, keeping it");
    }

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunnel_toggle::{ActiveNetwork, CachedConnectivity, NetworkKind, NetworkState};

    struct TestApp;

    impl Application for TestApp {
        const APP_ID: &'static str = "tunnel_toggle_test";
    }

    fn build_in(dir: &tempfile::TempDir) -> AppContext {
        let ctx = PathContext::with_base_path(
            dir.path().to_path_buf(),
            TestApp::STUDIO,
            TestApp::PROJECT_ID,
            TestApp::APP_ID,
        );
        AppBuilder::<TestApp>::with_path_context(ctx, "0.0.1")
            .expect("bootstrap")
            .build()
    }

    #[test]
    fn bootstrap_creates_layout_and_prefs_file_location() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_in(&dir);

        assert_eq!(app.app_id(), "tunnel_toggle_test");
        assert_eq!(app.version(), "0.0.1");
        assert!(app.path_context().shared_prefs_dir().is_dir());
        assert!(app.path_context().logs_dir().is_dir());

        assert!(app.preferences().set_use_vpn(true));
        assert!(app
            .path_context()
            .prefs_file(prefs::PREFS_NAME)
            .is_file());
    }

    #[test]
    fn gate_shares_the_context_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let app = build_in(&dir);
        let gate = app.connectivity_gate(CachedConnectivity::with_active(ActiveNetwork::new(
            NetworkKind::Wifi,
            NetworkState::Connected,
        )));

        assert!(gate.can_toggle_feature());
        assert!(gate.preferences().set_use_vpn(true));
        assert!(app.preferences().use_vpn());
    }

    #[test]
    fn preferences_survive_a_second_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        {
            let app = build_in(&dir);
            assert!(app.preferences().set_use_vpn(true));
        }
        let app = build_in(&dir);
        assert!(app.preferences().use_vpn());
    }
}
