//! File-based `log` backend with size-based rotation.
//!
//! Logs are written to `~/.config/keysnap/logs/keysnap.log`. When
//! the file exceeds the configured max size, it is rotated to
//! `keysnap.log.1` (one backup kept). The foreground `run` command can
//! additionally echo every line to stderr.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

use crate::sync::lock;

const LOG_FILE_NAME: &str = "keysnap.log";
const BACKUP_FILE_NAME: &str = "keysnap.log.1";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Whether file logging is enabled.
    pub enabled: bool,
    /// Minimum log level: "debug", "info", "warn", or "error".
    pub level: String,
    /// Maximum log file size in megabytes before rotation.
    pub max_file_mb: u64,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".into(),
            max_file_mb: 10,
        }
    }
}

impl LogConfig {
    /// Parses the level name; anything unrecognised means `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        match self.level.to_ascii_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}

struct LogFile {
    file: File,
    path: PathBuf,
    max_bytes: u64,
    written: u64,
}

struct FileLogger {
    file: Option<Mutex<LogFile>>,
    echo: bool,
    level: LevelFilter,
}

/// Installs the global logger. Call once at process startup.
///
/// Does nothing when file logging is disabled and `echo_stderr` is off,
/// or when a logger is already installed.
pub fn init(config: &LogConfig, echo_stderr: bool) {
    let file = if config.enabled { open_log_file(config) } else { None };
    if file.is_none() && !echo_stderr {
        return;
    }

    let level = config.level_filter();
    let logger = FileLogger {
        file: file.map(Mutex::new),
        echo: echo_stderr,
        level,
    };

    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}

/// Path of the active log file.
pub fn log_path() -> Option<PathBuf> {
    crate::config::config_dir().map(|d| d.join("logs").join(LOG_FILE_NAME))
}

fn open_log_file(config: &LogConfig) -> Option<LogFile> {
    let path = log_path()?;
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    let written = file.metadata().map(|m| m.len()).unwrap_or(0);

    Some(LogFile {
        file,
        path,
        max_bytes: config.max_file_mb * 1024 * 1024,
        written,
    })
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "{} [{}] {}: {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );

        if self.echo {
            eprint!("{line}");
        }
        if let Some(file) = &self.file {
            lock(file).append(&line);
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            let _ = lock(file).file.flush();
        }
    }
}

impl LogFile {
    fn append(&mut self, line: &str) {
        let _ = self.file.write_all(line.as_bytes());
        self.written += line.len() as u64;

        if self.max_bytes > 0 && self.written >= self.max_bytes {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        let backup = self.path.with_file_name(BACKUP_FILE_NAME);
        let _ = fs::rename(&self.path, &backup);
        if let Ok(f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            self.file = f;
        }
        self.written = 0;
    }
}

/// Wall-clock `HH:MM:SS` in UTC.
fn timestamp() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let (h, m, s) = (secs / 3600 % 24, secs / 60 % 60, secs % 60);
    format!("{h:02}:{m:02}:{s:02}")
}
