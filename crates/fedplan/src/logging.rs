use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// A log file past this size is moved aside before a run appends to it
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

/// `fedplan.log` -> `fedplan.log.1`
fn previous_log_path(log_path: &Path) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Open `log_path` for appending, creating its directory. An oversized log
/// replaces the previous generation and the run starts a fresh file.
fn open_log_file(log_path: &Path) -> io::Result<File> {
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    match fs::metadata(log_path) {
        Ok(meta) if meta.len() > MAX_LOG_SIZE => {
            fs::rename(log_path, previous_log_path(log_path))?;
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    OpenOptions::new().create(true).append(true).open(log_path)
}

/// Initialize logging.
///
/// Results go to stdout, so logs go to stderr, or to `log_file` when one is
/// given. `RUST_LOG` overrides `level`.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("fedplan={level},fedplan_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));
    let registry = tracing_subscriber::registry().with(env_filter);

    let Some(log_path) = log_file else {
        registry
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
        return Ok(());
    };

    let file = open_log_file(log_path)?;
    registry
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    tracing::info!(log_path = %log_path.display(), "fedplan logging initialized");
    Ok(())
}
