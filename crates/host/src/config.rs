//! Host process configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Configuration required to bootstrap a hold session host.
#[derive(Clone, Debug)]
pub struct HostConfig {
    /// Directory containing `hold.toml`, `items.ron` and `locale/`.
    pub data_dir: PathBuf,
    /// Locale override; falls back to the locale named in `hold.toml`.
    pub locale: Option<String>,
    /// Session identifier for log files.
    pub session_id: Option<String>,
    /// Snapshot file restored on startup and written on shutdown.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("crates/host/data"),
            locale: None,
            session_id: None,
            snapshot_path: None,
        }
    }
}

impl HostConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HOLD_DATA_DIR` - Content directory (default: crates/host/data)
    /// - `HOLD_LOCALE` - Locale override (default: taken from hold.toml)
    /// - `HOLD_SESSION_ID` - Session identifier for log files (default: auto-generated)
    /// - `HOLD_SNAPSHOT` - Snapshot file restored on startup and written on shutdown (optional)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = env::var_os("HOLD_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        config.locale = env::var("HOLD_LOCALE").ok();
        config.session_id = env::var("HOLD_SESSION_ID").ok();
        config.snapshot_path = env::var("HOLD_SNAPSHOT").ok().map(PathBuf::from);

        config
    }
}
