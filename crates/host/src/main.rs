//! Hold session host binary.
//!
//! Main entry point for a standalone hold host. This binary is the
//! composition root that assembles:
//! 1. Content (hold config, item catalog, locale) loaded from the data directory
//! 2. Session (authoritative store and its workers) via SessionBuilder
//! 3. A scripted walkthrough driving deposits, replication and teardown
//!
//! # Examples
//!
//! ```bash
//! # Defaults: content from crates/host/data, locale from hold.toml
//! cargo run -p shiphold-host
//!
//! # Persist hold contents across runs
//! HOLD_SNAPSHOT=/tmp/hold.bin cargo run -p shiphold-host
//! ```

mod config;
mod demo;

use std::sync::Arc;

use anyhow::{Context, Result};
use hold_content::{CatalogLoader, ConfigLoader, LocaleLoader};
use hold_core::HoldConfig;
use runtime::Session;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use config::HostConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let host_config = HostConfig::from_env();

    // Setup logging: both to stderr and to file
    setup_logging(&host_config.session_id)?;

    tracing::info!("Starting hold host");
    tracing::info!("Data directory: {}", host_config.data_dir.display());

    // 1. Load content
    let hold_config = {
        let path = host_config.data_dir.join("hold.toml");
        if path.is_file() {
            ConfigLoader::load(&path)
                .with_context(|| format!("loading hold config from {}", path.display()))?
        } else {
            tracing::warn!("No hold.toml in data directory, using defaults");
            HoldConfig::default()
        }
    };

    let catalog = {
        let path = host_config.data_dir.join("items.ron");
        CatalogLoader::load(&path)
            .with_context(|| format!("loading item catalog from {}", path.display()))?
    };
    tracing::info!("Item catalog loaded: {} kinds", catalog.len());

    let locale_name = host_config
        .locale
        .clone()
        .unwrap_or_else(|| hold_config.locale.clone());
    let lexicon = LocaleLoader::load_locale(&host_config.data_dir.join("locale"), &locale_name)
        .context("loading locale messages")?;
    tracing::info!("Locale loaded: {}", locale_name);

    // 2. Restore the previous run's hold contents, if any
    let snapshot = match &host_config.snapshot_path {
        Some(path) if path.is_file() => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading snapshot {}", path.display()))?;
            tracing::info!("Restoring snapshot: {} bytes from {}", bytes.len(), path.display());
            Some(bytes)
        }
        _ => None,
    };

    // 3. Build the session
    tracing::debug!("Building session...");
    let mut builder = Session::builder()
        .hold_config(hold_config)
        .catalog(Arc::new(catalog));
    if let Some(bytes) = snapshot {
        builder = builder.restore_snapshot(bytes);
    }
    let session = builder.build().await?;
    tracing::info!("Session built successfully");

    // 4. Drive the session through a representative round
    demo::run(&session, &lexicon).await?;

    // 5. Persist hold contents for the next run
    if let Some(path) = &host_config.snapshot_path {
        let bytes = session.handle().export_snapshot().await?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        tracing::info!("Snapshot written: {} bytes to {}", bytes.len(), path.display());
    }

    session.shutdown().await?;
    tracing::info!("Hold host stopped");

    Ok(())
}

/// Setup logging to both stderr and file
fn setup_logging(session_id: &Option<String>) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};

    // Determine log directory based on OS
    let log_dir = get_log_directory();

    // Create session ID if not provided
    let session_id = session_id.clone().unwrap_or_else(|| {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        format!("session_{}", timestamp)
    });

    // Create session-specific log directory
    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)?;

    // Setup file appender
    let file_appender = tracing_appender::rolling::never(&session_log_dir, "host.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);

    // Create env filter
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    // File layer without ANSI codes, stderr layer with them
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(_guard);

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/host.log", session_log_dir.display());

    Ok(())
}

/// Get the platform-specific log directory
fn get_log_directory() -> std::path::PathBuf {
    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let mut path = std::path::PathBuf::from(home);
            path.push("Library");
            path.push("Caches");
            path.push("shiphold");
            path.push("logs");
            return path;
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg_cache) = std::env::var_os("XDG_CACHE_HOME") {
            let mut path = std::path::PathBuf::from(xdg_cache);
            path.push("shiphold");
            path.push("logs");
            return path;
        } else if let Some(home) = std::env::var_os("HOME") {
            let mut path = std::path::PathBuf::from(home);
            path.push(".cache");
            path.push("shiphold");
            path.push("logs");
            return path;
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(local_appdata) = std::env::var_os("LOCALAPPDATA") {
            let mut path = std::path::PathBuf::from(local_appdata);
            path.push("shiphold");
            path.push("logs");
            return path;
        }
    }

    // Fallback
    std::path::PathBuf::from("/tmp/shiphold/logs")
}
