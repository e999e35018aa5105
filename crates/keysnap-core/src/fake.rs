//! In-memory desktop for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::{
    HotkeyRequest, Rect, WindowControl, WindowDirectory, WindowError, WindowHandle, WindowInfo,
    WindowMatch,
};

#[derive(Debug, Clone)]
struct FakeWindow {
    handle: WindowHandle,
    class: String,
    title: String,
    rect: Rect,
    /// Bounds to go back to when un-maximized.
    normal: Option<Rect>,
    deny_resize: bool,
    deny_hotkey: bool,
}

#[derive(Debug, Default)]
struct State {
    monitors: Vec<Rect>,
    windows: Vec<FakeWindow>,
    foreground: Option<WindowHandle>,
    sent: HashMap<WindowHandle, usize>,
    order: Vec<WindowHandle>,
}

type SendHook = Box<dyn Fn(WindowHandle) + Send + Sync>;

#[derive(Default)]
pub struct FakeDesktop {
    state: Mutex<State>,
    /// Runs at the start of every `send_hotkey`, outside the state lock.
    on_send: Mutex<Option<SendHook>>,
}

impl std::fmt::Debug for FakeDesktop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeDesktop")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl FakeDesktop {
    pub fn new(monitors: Vec<Rect>) -> Self {
        Self {
            state: Mutex::new(State {
                monitors,
                ..State::default()
            }),
            on_send: Mutex::new(None),
        }
    }

    /// Installs a callback run whenever a hotkey is about to be sent.
    pub fn on_send(&self, hook: impl Fn(WindowHandle) + Send + Sync + 'static) {
        *self.on_send.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn add_window(&self, handle: usize, class: &str, title: &str, rect: Rect) {
        self.state.lock().unwrap().windows.push(FakeWindow {
            handle: WindowHandle(handle),
            class: class.into(),
            title: title.into(),
            rect,
            normal: None,
            deny_resize: false,
            deny_hotkey: false,
        });
    }

    pub fn focus(&self, handle: usize) {
        self.state.lock().unwrap().foreground = Some(WindowHandle(handle));
    }

    pub fn close(&self, handle: usize) {
        let mut state = self.state.lock().unwrap();
        state.windows.retain(|w| w.handle != WindowHandle(handle));
        if state.foreground == Some(WindowHandle(handle)) {
            state.foreground = None;
        }
    }

    pub fn set_monitors(&self, monitors: Vec<Rect>) {
        self.state.lock().unwrap().monitors = monitors;
    }

    pub fn move_window(&self, handle: usize, rect: Rect) {
        self.with_window(handle, |w| w.rect = rect);
    }

    pub fn set_title(&self, handle: usize, title: &str) {
        self.with_window(handle, |w| w.title = title.into());
    }

    pub fn maximize(&self, handle: usize) {
        let area = self.work_area(WindowHandle(handle));
        self.with_window(handle, |w| {
            w.normal = Some(w.rect);
            if let Some(area) = area {
                w.rect = area;
            }
        });
    }

    pub fn deny_resize(&self, handle: usize) {
        self.with_window(handle, |w| w.deny_resize = true);
    }

    pub fn deny_hotkey(&self, handle: usize) {
        self.with_window(handle, |w| w.deny_hotkey = true);
    }

    pub fn allow_hotkey(&self, handle: usize) {
        self.with_window(handle, |w| w.deny_hotkey = false);
    }

    pub fn rect_of(&self, handle: usize) -> Option<Rect> {
        self.rect(WindowHandle(handle))
    }

    /// Successful hotkey deliveries to `handle`.
    pub fn hotkeys_sent(&self, handle: usize) -> usize {
        let state = self.state.lock().unwrap();
        state.sent.get(&WindowHandle(handle)).copied().unwrap_or(0)
    }

    pub fn delivery_order(&self) -> Vec<WindowHandle> {
        self.state.lock().unwrap().order.clone()
    }

    fn with_window(&self, handle: usize, f: impl FnOnce(&mut FakeWindow)) {
        let mut state = self.state.lock().unwrap();
        if let Some(w) = state
            .windows
            .iter_mut()
            .find(|w| w.handle == WindowHandle(handle))
        {
            f(w);
        }
    }

    fn window(&self, handle: WindowHandle) -> Option<FakeWindow> {
        let state = self.state.lock().unwrap();
        state.windows.iter().find(|w| w.handle == handle).cloned()
    }
}

impl WindowDirectory for FakeDesktop {
    fn find_windows(&self, filter: &WindowMatch) -> Vec<WindowHandle> {
        let state = self.state.lock().unwrap();
        state
            .windows
            .iter()
            .filter(|w| filter.matches(&w.class, &w.title))
            .map(|w| w.handle)
            .collect()
    }

    fn foreground_window(&self) -> Option<WindowHandle> {
        self.state.lock().unwrap().foreground
    }

    fn rect(&self, handle: WindowHandle) -> Option<Rect> {
        self.window(handle).map(|w| w.rect)
    }

    fn is_alive(&self, handle: WindowHandle) -> bool {
        self.window(handle).is_some()
    }

    fn info(&self, handle: WindowHandle) -> Option<WindowInfo> {
        self.window(handle).map(|w| WindowInfo {
            handle: w.handle,
            class: w.class,
            title: w.title,
            pid: 1000,
            rect: w.rect,
        })
    }

    fn work_area(&self, handle: WindowHandle) -> Option<Rect> {
        let rect = self.rect(handle)?;
        let (cx, cy) = (rect.center_x(), rect.center_y());
        let state = self.state.lock().unwrap();
        state
            .monitors
            .iter()
            .find(|m| cx >= m.x && cx < m.right() && cy >= m.y && cy < m.bottom())
            .or_else(|| state.monitors.first())
            .copied()
    }

    fn work_areas(&self) -> Vec<Rect> {
        self.state.lock().unwrap().monitors.clone()
    }
}

impl WindowControl for FakeDesktop {
    fn set_rect(&self, handle: WindowHandle, rect: &Rect) -> Result<(), WindowError> {
        let mut state = self.state.lock().unwrap();
        let w = state
            .windows
            .iter_mut()
            .find(|w| w.handle == handle)
            .ok_or(WindowError::Gone(handle))?;
        if w.deny_resize {
            return Err(WindowError::denied(handle, "resize", "access denied"));
        }
        w.rect = *rect;
        Ok(())
    }

    fn unmaximize(&self, handle: WindowHandle) -> Result<(), WindowError> {
        let mut state = self.state.lock().unwrap();
        let w = state
            .windows
            .iter_mut()
            .find(|w| w.handle == handle)
            .ok_or(WindowError::Gone(handle))?;
        if let Some(normal) = w.normal.take() {
            w.rect = normal;
        }
        Ok(())
    }

    fn send_hotkey(
        &self,
        handle: WindowHandle,
        _request: &HotkeyRequest<'_>,
    ) -> Result<(), WindowError> {
        if let Some(hook) = self.on_send.lock().unwrap().as_ref() {
            hook(handle);
        }
        let mut state = self.state.lock().unwrap();
        let w = state
            .windows
            .iter()
            .find(|w| w.handle == handle)
            .ok_or(WindowError::Gone(handle))?;
        if w.deny_hotkey {
            return Err(WindowError::denied(handle, "focus", "foreground lock"));
        }
        *state.sent.entry(handle).or_default() += 1;
        state.order.push(handle);
        Ok(())
    }
}
