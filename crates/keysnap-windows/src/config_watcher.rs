//! Watches `config.toml` and forwards parsed reloads.
//!
//! Uses `FindFirstChangeNotificationW` on the config directory and
//! compares the file's mtime to tell real edits from unrelated changes
//! (log rotation lives in a subdirectory and is not watched).

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::SystemTime;

use keysnap_core::Config;
use keysnap_core::config;
use windows::Win32::Foundation::WAIT_OBJECT_0;
use windows::Win32::Storage::FileSystem::{
    FILE_NOTIFY_CHANGE_FILE_NAME, FILE_NOTIFY_CHANGE_LAST_WRITE, FindCloseChangeNotification,
    FindFirstChangeNotificationW, FindNextChangeNotification,
};
use windows::Win32::System::Threading::WaitForSingleObject;
use windows::core::HSTRING;

/// Timeout between stop-flag checks when nothing changes (ms).
const WAIT_TIMEOUT_MS: u32 = 1000;

/// Runs until `stop` is set or the receiver is gone.
///
/// Only files that parse are forwarded; validation happens when the
/// daemon applies them. A deleted file is forwarded as the default
/// configuration.
pub fn watch(tx: Sender<Config>, stop: Arc<AtomicBool>) {
    let (Some(dir), Some(path)) = (config::config_dir(), config::config_path()) else {
        log::info!("config dir not found, watcher exiting");
        return;
    };
    if let Err(e) = std::fs::create_dir_all(&dir) {
        log::warn!("cannot create {}: {e}", dir.display());
        return;
    }

    let mut last_mtime = mtime(&path);
    let dir_str = HSTRING::from(dir.as_os_str());
    let flags = FILE_NOTIFY_CHANGE_LAST_WRITE | FILE_NOTIFY_CHANGE_FILE_NAME;

    let Ok(handle) = (unsafe { FindFirstChangeNotificationW(&dir_str, false, flags) }) else {
        log::warn!("FindFirstChangeNotificationW failed, watcher exiting");
        return;
    };

    while !stop.load(Ordering::Relaxed) {
        let result = unsafe { WaitForSingleObject(handle, WAIT_TIMEOUT_MS) };
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if result != WAIT_OBJECT_0 {
            continue;
        }

        let current = mtime(&path);
        if current != last_mtime {
            last_mtime = current;
            if let Some(config) = reload() && tx.send(config).is_err() {
                break;
            }
        }

        let _ = unsafe { FindNextChangeNotification(handle) };
    }

    let _ = unsafe { FindCloseChangeNotification(handle) };
}

fn reload() -> Option<Config> {
    match config::try_load() {
        Ok(Some(config)) => {
            log::info!("config.toml changed, reloading");
            Some(config)
        }
        Ok(None) => {
            log::info!("config.toml removed, reverting to defaults");
            Some(Config::default())
        }
        Err(e) => {
            log::warn!("config.toml invalid, keeping current settings: {e}");
            None
        }
    }
}

fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().ok().and_then(|m| m.modified().ok())
}
