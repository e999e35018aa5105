use std::mem;

use keysnap_core::{Rect, WindowResult};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::Graphics::Dwm::{DWMWA_EXTENDED_FRAME_BOUNDS, DwmGetWindowAttribute};
use windows::Win32::UI::WindowsAndMessaging::GetWindowRect;

/// Width of the invisible resize borders on each side of a window.
///
/// `GetWindowRect` includes the drop-shadow area Windows 10/11 draws
/// around top-level windows; users only see the DWM frame inside it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FrameInsets {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl FrameInsets {
    /// Grows a visible rectangle into the outer rectangle `SetWindowPos`
    /// expects.
    pub fn expand(&self, visible: &Rect) -> Rect {
        Rect::new(
            visible.x - self.left,
            visible.y - self.top,
            visible.width + self.left + self.right,
            visible.height + self.top + self.bottom,
        )
    }
}

/// The bounds the user sees, from DWM extended frame bounds.
///
/// Falls back to `GetWindowRect` if DWM is unavailable.
pub(crate) fn visible_rect(hwnd: HWND) -> WindowResult<Rect> {
    let mut frame = RECT::default();
    let result = unsafe {
        DwmGetWindowAttribute(
            hwnd,
            DWMWA_EXTENDED_FRAME_BOUNDS,
            &mut frame as *mut RECT as *mut _,
            mem::size_of::<RECT>() as u32,
        )
    };

    if result.is_err() {
        unsafe { GetWindowRect(hwnd, &mut frame)? };
    }

    Ok(to_rect(&frame))
}

pub(crate) fn insets(hwnd: HWND) -> WindowResult<FrameInsets> {
    let mut outer = RECT::default();
    unsafe { GetWindowRect(hwnd, &mut outer)? };
    let outer = to_rect(&outer);
    let visible = visible_rect(hwnd)?;

    Ok(FrameInsets {
        left: visible.x - outer.x,
        top: visible.y - outer.y,
        right: outer.right() - visible.right(),
        bottom: outer.bottom() - visible.bottom(),
    })
}

pub(crate) fn to_rect(rc: &RECT) -> Rect {
    Rect::new(rc.left, rc.top, rc.right - rc.left, rc.bottom - rc.top)
}
