use std::fs;
use std::path::PathBuf;

use crate::WindowResult;

/// Per-user data directory, `%LOCALAPPDATA%\keysnap` on Windows.
/// Created on first use.
fn data_dir() -> WindowResult<PathBuf> {
    let base = dirs::data_local_dir().ok_or("local data directory not available")?;
    let dir = base.join("keysnap");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn pid_path() -> WindowResult<PathBuf> {
    Ok(data_dir()?.join("keysnap.pid"))
}

/// Records the current process as the running daemon.
pub fn write_pid_file() -> WindowResult<()> {
    fs::write(pid_path()?, std::process::id().to_string())?;
    Ok(())
}

/// The PID of the last daemon that started, if its file is still there.
pub fn read_pid_file() -> WindowResult<Option<u32>> {
    let path = pid_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let pid = parse_pid(&fs::read_to_string(&path)?)?;
    Ok(Some(pid))
}

pub fn remove_pid_file() -> WindowResult<()> {
    let path = pid_path()?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

fn parse_pid(contents: &str) -> WindowResult<u32> {
    contents
        .trim()
        .parse()
        .map_err(|e| format!("invalid PID file contents: {e}").into())
}
