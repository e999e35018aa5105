use std::thread;
use std::time::Duration;

use keysnap_core::{
    HotkeyRequest, Rect, WindowControl, WindowDirectory, WindowError, WindowHandle, WindowInfo,
    WindowMatch,
};

use crate::window::Window;
use crate::{enumerate, input, monitor};

/// Pause between focusing a window and typing into it, so the window
/// has processed the activation before keys arrive.
const FOCUS_SETTLE: Duration = Duration::from_millis(30);

/// The live Win32 desktop. Stateless; every query goes to the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Desktop;

impl WindowDirectory for Win32Desktop {
    fn find_windows(&self, filter: &WindowMatch) -> Vec<WindowHandle> {
        match enumerate::find_windows(filter) {
            Ok(windows) => windows.iter().map(Window::handle).collect(),
            Err(e) => {
                log::warn!("window enumeration failed: {e}");
                Vec::new()
            }
        }
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        Window::foreground().map(|w| w.handle())
    }

    fn rect(&self, handle: WindowHandle) -> Option<Rect> {
        live(handle).ok()?.rect().ok()
    }

    fn is_alive(&self, handle: WindowHandle) -> bool {
        Window::from_handle(handle).exists()
    }

    fn info(&self, handle: WindowHandle) -> Option<WindowInfo> {
        Window::from_handle(handle).info()
    }

    fn work_area(&self, handle: WindowHandle) -> Option<Rect> {
        let window = live(handle).ok()?;
        monitor::work_area_for_window(window.hwnd()).ok()
    }

    fn work_areas(&self) -> Vec<Rect> {
        monitor::work_areas().unwrap_or_else(|e| {
            log::warn!("monitor enumeration failed: {e}");
            Vec::new()
        })
    }
}

impl WindowControl for Win32Desktop {
    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> Result<(), WindowError> {
        live(handle)?
            .set_rect(rect)
            .map_err(|e| WindowError::denied(handle, "resize", e))
    }

    fn unmaximize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let window = live(handle)?;
        if window.is_maximized() {
            window.restore();
        }
        Ok(())
    }

    fn send_hotkey(
        &self,
        handle: WindowHandle,
        request: &HotkeyRequest<'_>,
    ) -> Result<(), WindowError> {
        let target = live(handle)?;
        let previous = Window::foreground();

        if !target.set_foreground() {
            return Err(if target.exists() {
                WindowError::denied(handle, "focus", "foreground change refused")
            } else {
                WindowError::Gone(handle)
            });
        }
        thread::sleep(FOCUS_SETTLE);

        let result = deliver(target, request);

        if request.restore_focus
            && let Some(previous) = previous
            && previous != target
            && previous.exists()
        {
            previous.set_foreground();
        }
        result
    }
}

/// Types the sequence `repeat` times, stopping if the target loses
/// focus so keys never land in another window.
fn deliver(target: Window, request: &HotkeyRequest<'_>) -> Result<(), WindowError> {
    let handle = target.handle();
    for round in 0..request.repeat {
        if round > 0 {
            thread::sleep(request.delay);
        }
        if Window::foreground() != Some(target) {
            return Err(WindowError::denied(handle, "input", "window lost focus"));
        }
        for combo in request.sequence {
            input::send_combo(combo).map_err(|e| WindowError::denied(handle, "input", e))?;
        }
    }
    Ok(())
}

fn live(handle: WindowHandle) -> Result<Window, WindowError> {
    let window = Window::from_handle(handle);
    if window.exists() {
        Ok(window)
    } else {
        Err(WindowError::Gone(handle))
    }
}
