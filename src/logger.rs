use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::LevelFilter;

const LEVEL_ENV: &str = "DATASEED_LOG";

fn level_from_env() -> LevelFilter {
    match std::env::var(LEVEL_ENV).unwrap_or_default().to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

fn now_ts() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}

/// Install the global logger. Lines go to `log_path` (appended) when given,
/// otherwise to stderr. If the file cannot be opened the logger still
/// installs on stderr and the open error is returned. Calling it twice keeps
/// the first logger.
pub fn init(log_path: Option<&Path>) -> std::io::Result<Option<PathBuf>> {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level_from_env())
        .format(|buf, record| {
            writeln!(buf, "{} [{}] {}", now_ts(), record.level(), record.args())
        });

    let opened = log_path.map(|path| open_log_file(path).map(|file| (path, file)));
    let (target, open_err) = match opened {
        Some(Ok((path, file))) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            (Some(path.to_path_buf()), None)
        }
        Some(Err(err)) => (None, Some(err)),
        None => (None, None),
    };

    if builder.try_init().is_ok() {
        if let Some(path) = &target {
            info(&format!("logging initialized: {}", path.display()));
        }
    }
    match open_err {
        Some(err) => Err(err),
        None => Ok(target),
    }
}

fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn error(msg: &str) {
    log::error!("{msg}");
}
pub fn warn(msg: &str) {
    log::warn!("{msg}");
}
pub fn info(msg: &str) {
    log::info!("{msg}");
}
pub fn debug(msg: &str) {
    log::debug!("{msg}");
}
