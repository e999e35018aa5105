//! Console Ctrl+C / Ctrl+Break handling via `SetConsoleCtrlHandler`.

use std::sync::OnceLock;

use keysnap_core::WindowResult;
use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

/// Written once by `set_handler`, read by the console callback.
static NOTIFY: OnceLock<Box<dyn Fn() + Send + Sync>> = OnceLock::new();

/// Runs `notify` on every Ctrl+C or Ctrl+Break. Only the first
/// registration in a process takes effect.
pub fn set_handler(notify: impl Fn() + Send + Sync + 'static) -> WindowResult<()> {
    if NOTIFY.set(Box::new(notify)).is_err() {
        return Err("Ctrl+C handler already registered".into());
    }
    unsafe { SetConsoleCtrlHandler(Some(handler), true)? };
    Ok(())
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(notify) = NOTIFY.get()
    {
        notify();
        return BOOL(1);
    }
    BOOL(0)
}
