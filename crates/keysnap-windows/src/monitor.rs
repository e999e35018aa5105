use std::mem;

use keysnap_core::{Rect, WindowResult};
use windows::Win32::Foundation::{HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITORINFO,
    MonitorFromWindow,
};
use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};
use windows::core::BOOL;

/// Declares the process per-monitor DPI aware (V2) so coordinates are
/// raw pixels on every monitor. Call once at startup.
pub fn enable_dpi_awareness() {
    // Fails harmlessly when a manifest already set it.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}

/// Work area (taskbar excluded) of the monitor nearest to `hwnd`.
pub fn work_area_for_window(hwnd: HWND) -> WindowResult<Rect> {
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    work_area_for_monitor(monitor)
}

/// Work areas of every connected monitor, in enumeration order.
pub fn work_areas() -> WindowResult<Vec<Rect>> {
    let mut monitors: Vec<HMONITOR> = Vec::new();

    // SAFETY: the callback only pushes into the Vec behind the LPARAM,
    // which outlives the synchronous enumeration.
    unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(enum_monitor_callback),
            LPARAM(&mut monitors as *mut _ as isize),
        )
        .ok()?;
    }

    monitors.into_iter().map(work_area_for_monitor).collect()
}

unsafe extern "system" fn enum_monitor_callback(
    monitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = unsafe { &mut *(lparam.0 as *mut Vec<HMONITOR>) };
    monitors.push(monitor);
    BOOL(1)
}

fn work_area_for_monitor(monitor: HMONITOR) -> WindowResult<Rect> {
    let mut info = MONITORINFO {
        cbSize: mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if !unsafe { GetMonitorInfoW(monitor, &mut info) }.as_bool() {
        return Err("failed to get monitor info".into());
    }

    Ok(crate::frame::to_rect(&info.rcWork))
}
