use keysnap_core::{WindowMatch, WindowResult};

use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GWL_EXSTYLE, GWL_STYLE, GetWindowLongPtrW, WS_CAPTION, WS_EX_TOOLWINDOW,
};
use windows::core::BOOL;

use crate::window::Window;

/// Enumerates visible, non-minimized, top-level application windows in
/// Z-order (topmost first).
///
/// Minimized windows are left out so that nothing downstream ever
/// brings one back on screen by focusing it.
pub fn enumerate_windows() -> WindowResult<Vec<Window>> {
    let mut windows: Vec<Window> = Vec::new();

    // SAFETY: EnumWindows runs synchronously, so the Vec behind the
    // LPARAM outlives every callback invocation.
    unsafe {
        EnumWindows(
            Some(enum_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )?;
    }

    Ok(windows)
}

/// The enumerated windows whose class and title satisfy `filter`.
pub fn find_windows(filter: &WindowMatch) -> WindowResult<Vec<Window>> {
    Ok(enumerate_windows()?
        .into_iter()
        .filter(|w| filter.matches(&w.class(), &w.title()))
        .collect())
}

unsafe extern "system" fn enum_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec passed in by enumerate_windows().
    let windows = unsafe { &mut *(lparam.0 as *mut Vec<Window>) };

    let window = Window::new(hwnd);
    if window.is_visible() && !window.is_minimized() && is_app_window(hwnd) {
        windows.push(window);
    }

    BOOL(1)
}

/// Has a caption bar and is not a tool window.
fn is_app_window(hwnd: HWND) -> bool {
    unsafe {
        let style = GetWindowLongPtrW(hwnd, GWL_STYLE) as u32;
        let ex_style = GetWindowLongPtrW(hwnd, GWL_EXSTYLE) as u32;

        (style & WS_CAPTION.0) == WS_CAPTION.0 && (ex_style & WS_EX_TOOLWINDOW.0) == 0
    }
}
