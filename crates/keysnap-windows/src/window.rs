use keysnap_core::{Rect, WindowHandle, WindowInfo, WindowResult};

use windows::Win32::Foundation::HWND;
use windows::Win32::UI::WindowsAndMessaging::{
    GetForegroundWindow, GetWindowTextLengthW, GetWindowTextW, GetWindowThreadProcessId, IsIconic,
    IsWindow, IsWindowVisible, IsZoomed, RealGetWindowClassW, SW_RESTORE, SWP_FRAMECHANGED,
    SWP_NOACTIVATE, SWP_NOCOPYBITS, SWP_NOZORDER, SetForegroundWindow, SetWindowPos, ShowWindow,
};

use crate::frame;

/// A top-level window, identified by its `HWND`.
///
/// Metadata is queried from the OS on every call; nothing is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    pub fn from_handle(handle: WindowHandle) -> Self {
        Self {
            hwnd: HWND(handle.0 as *mut _),
        }
    }

    /// The window that currently has keyboard focus, if any.
    pub fn foreground() -> Option<Self> {
        let hwnd = unsafe { GetForegroundWindow() };
        (!hwnd.is_invalid()).then(|| Self::new(hwnd))
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    pub fn handle(&self) -> WindowHandle {
        WindowHandle(self.hwnd.0 as usize)
    }

    pub fn title(&self) -> String {
        unsafe {
            let length = GetWindowTextLengthW(self.hwnd);
            if length == 0 {
                return String::new();
            }
            // +1 for the null terminator
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(self.hwnd, &mut buffer);
            String::from_utf16_lossy(&buffer[..copied.max(0) as usize])
        }
    }

    pub fn class(&self) -> String {
        // 256 is the maximum class name length in Win32.
        let mut buffer = [0u16; 256];
        let length = unsafe { RealGetWindowClassW(self.hwnd, &mut buffer) };
        String::from_utf16_lossy(&buffer[..length as usize])
    }

    pub fn pid(&self) -> u32 {
        let mut pid = 0u32;
        unsafe { GetWindowThreadProcessId(self.hwnd, Some(&raw mut pid)) };
        pid
    }

    /// Visible bounds, excluding the invisible resize borders.
    pub fn rect(&self) -> WindowResult<Rect> {
        frame::visible_rect(self.hwnd)
    }

    /// Moves the window so its visible bounds match `rect` exactly.
    pub fn set_rect(&self, rect: &Rect) -> WindowResult<()> {
        let outer = frame::insets(self.hwnd)?.expand(rect);

        let mut flags = SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOCOPYBITS;
        // GPU-composited apps only repaint after WM_NCCALCSIZE.
        if matches!(
            self.class().as_str(),
            "Chrome_WidgetWin_1" | "MozillaWindowClass"
        ) {
            flags |= SWP_FRAMECHANGED;
        }

        log::debug!(
            "set_rect {}: visible {:?} outer {:?}",
            self.handle(),
            rect,
            outer
        );
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                outer.x,
                outer.y,
                outer.width,
                outer.height,
                flags,
            )?
        };
        Ok(())
    }

    /// Whether the handle still refers to a window.
    pub fn exists(&self) -> bool {
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }

    pub fn is_visible(&self) -> bool {
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    pub fn is_minimized(&self) -> bool {
        unsafe { IsIconic(self.hwnd).as_bool() }
    }

    pub fn is_maximized(&self) -> bool {
        unsafe { IsZoomed(self.hwnd).as_bool() }
    }

    /// Returns a maximized or minimized window to its normal placement.
    pub fn restore(&self) {
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_RESTORE);
        }
    }

    /// Asks the OS to focus this window. Returns whether it actually
    /// became the foreground window; the foreground lock can refuse.
    pub fn set_foreground(&self) -> bool {
        unsafe {
            let _ = SetForegroundWindow(self.hwnd);
        }
        Self::foreground() == Some(*self)
    }

    /// A snapshot of the window's metadata, or `None` once it is gone.
    pub fn info(&self) -> Option<WindowInfo> {
        if !self.exists() {
            return None;
        }
        Some(WindowInfo {
            handle: self.handle(),
            class: self.class(),
            title: self.title(),
            pid: self.pid(),
            rect: self.rect().ok()?,
        })
    }
}
