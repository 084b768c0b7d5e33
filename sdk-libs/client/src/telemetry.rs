use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tracing::warn;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Log directory of the installed subscriber, `None` when it logs to stdout
/// only.
static INSTALLED: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Installs a stdout subscriber filtered by `RUST_LOG` (default `info`).
///
/// Only the first `setup_telemetry*` call of the process installs a
/// subscriber; returns whether this call did.
pub fn setup_telemetry() -> bool {
    install(None)
}

/// Like [`setup_telemetry`], additionally writing hourly rotated files to
/// `log_dir`. If a subscriber without that directory is already installed a
/// warning is logged and no file layer is added.
pub fn setup_telemetry_with_log_dir(log_dir: &Path) -> bool {
    install(Some(log_dir))
}

fn install(log_dir: Option<&Path>) -> bool {
    let mut installed_now = false;
    let active = INSTALLED.get_or_init(|| {
        installed_now = true;
        init_subscriber(log_dir)
    });
    if !installed_now && log_dir.is_some() && active.as_deref() != log_dir {
        warn!(
            "Telemetry already initialized (log dir {:?}), not logging to {:?}",
            active, log_dir
        );
    }
    installed_now
}

fn init_subscriber(log_dir: Option<&Path>) -> Option<PathBuf> {
    let stdout_layer = fmt::Layer::new()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(env_filter());

    let file_appender = log_dir.and_then(|dir| {
        match RollingFileAppender::builder()
            .rotation(Rotation::HOURLY)
            .filename_prefix("cnft")
            .filename_suffix("log")
            .max_log_files(48)
            .build(dir)
        {
            Ok(appender) => Some((dir.to_path_buf(), appender)),
            Err(e) => {
                eprintln!(
                    "Warning: Failed to create log file appender in {}: {}. Logging to stdout only.",
                    dir.display(),
                    e
                );
                None
            }
        }
    });

    match file_appender {
        Some((dir, appender)) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(env_filter());
            // A subscriber installed by the host process wins.
            let _ = tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .try_init();
            // Flushes for the lifetime of the process.
            std::mem::forget(guard);
            Some(dir)
        }
        None => {
            let _ = tracing_subscriber::registry().with(stdout_layer).try_init();
            None
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
