//! Low-level keyboard hook (`WH_KEYBOARD_LL`) on a dedicated thread.
//!
//! The hook callback runs on the thread that installed it, inside that
//! thread's message pump. It owns the gesture detector through a
//! thread-local and only posts a [`GestureSignal`] when a run
//! completes; window changes happen elsewhere.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Instant;

use keysnap_core::{ConfigCell, GestureDetector, GestureFired, KeyEvent, KeyState, WindowResult};
use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, HC_ACTION, HHOOK, KBDLLHOOKSTRUCT,
    LLKHF_INJECTED, MSG, PostThreadMessageW, SetWindowsHookExW, TranslateMessage,
    UnhookWindowsHookEx, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN,
    WM_SYSKEYUP,
};

use crate::input;

/// A completed gesture, as seen by the hook thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureSignal {
    pub fired: GestureFired,
    /// Ctrl was held on the final press: restore centered.
    pub centered: bool,
}

struct HookState {
    detector: GestureDetector,
    generation: u64,
    config: Arc<ConfigCell>,
    tx: Sender<GestureSignal>,
}

thread_local! {
    static HOOK_STATE: RefCell<Option<HookState>> = const { RefCell::new(None) };
}

struct HookThread {
    thread_id: u32,
    handle: thread::JoinHandle<()>,
}

impl HookThread {
    fn stop(self) {
        unsafe {
            let _ = PostThreadMessageW(self.thread_id, WM_QUIT, WPARAM(0), LPARAM(0));
        }
        let _ = self.handle.join();
    }
}

/// The process-wide keyboard hook. At most one hook thread exists;
/// it is removed on drop.
pub struct KeyboardHook {
    config: Arc<ConfigCell>,
    tx: Sender<GestureSignal>,
    thread: Option<HookThread>,
}

impl KeyboardHook {
    /// Creates the handle without installing anything yet.
    pub fn new(config: Arc<ConfigCell>, tx: Sender<GestureSignal>) -> Self {
        Self {
            config,
            tx,
            thread: None,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.thread.is_some()
    }

    /// Installs the hook unless it already is.
    pub fn install(&mut self) -> WindowResult<()> {
        if self.thread.is_some() {
            return Ok(());
        }
        self.thread = Some(spawn_hook_thread(self.config.clone(), self.tx.clone())?);
        log::info!("keyboard hook installed");
        Ok(())
    }

    /// Removes the hook if it is installed.
    pub fn uninstall(&mut self) {
        if let Some(thread) = self.thread.take() {
            thread.stop();
            log::info!("keyboard hook removed");
        }
    }
}

impl Drop for KeyboardHook {
    fn drop(&mut self) {
        self.uninstall();
    }
}

fn spawn_hook_thread(
    config: Arc<ConfigCell>,
    tx: Sender<GestureSignal>,
) -> WindowResult<HookThread> {
    let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();

    let handle = thread::spawn(move || {
        let snapshot = config.load();
        HOOK_STATE.with(|cell| {
            *cell.borrow_mut() = Some(HookState {
                detector: GestureDetector::new(snapshot.settings.snap.gesture),
                generation: snapshot.generation,
                config,
                tx,
            });
        });

        let thread_id = unsafe { GetCurrentThreadId() };
        let hook = match install_hook() {
            Ok(hook) => hook,
            Err(e) => {
                let _ = ready_tx.send(Err(format!("failed to install keyboard hook: {e}")));
                return;
            }
        };
        let _ = ready_tx.send(Ok(thread_id));

        run_message_pump();

        unsafe {
            let _ = UnhookWindowsHookEx(hook);
        }
        HOOK_STATE.with(|cell| cell.borrow_mut().take());
    });

    let thread_id = ready_rx
        .recv()
        .map_err(|_| -> Box<dyn std::error::Error> { "hook thread exited unexpectedly".into() })?
        .map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    Ok(HookThread { thread_id, handle })
}

fn install_hook() -> windows::core::Result<HHOOK> {
    unsafe {
        let module = GetModuleHandleW(None)?;
        SetWindowsHookExW(
            WH_KEYBOARD_LL,
            Some(keyboard_proc),
            Some(HINSTANCE::from(module)),
            0,
        )
    }
}

/// Blocks until `WM_QUIT`. Low-level hooks are only called while the
/// installing thread pumps messages.
fn run_message_pump() {
    let mut msg = MSG::default();
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

unsafe extern "system" fn keyboard_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        // SAFETY: for HC_ACTION the OS passes a KBDLLHOOKSTRUCT pointer.
        let info = unsafe { &*(lparam.0 as *const KBDLLHOOKSTRUCT) };
        if let Some(event) = key_event(wparam.0 as u32, info) {
            observe(&event);
        }
    }
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

fn key_event(message: u32, info: &KBDLLHOOKSTRUCT) -> Option<KeyEvent> {
    let state = match message {
        WM_KEYDOWN | WM_SYSKEYDOWN => KeyState::Down,
        WM_KEYUP | WM_SYSKEYUP => KeyState::Up,
        _ => return None,
    };
    Some(KeyEvent {
        key: info.vkCode,
        state,
        at: Instant::now(),
        injected: (info.flags.0 & LLKHF_INJECTED.0) != 0,
    })
}

/// Feeds one event to the thread's detector, picking up a new
/// configuration generation first.
fn observe(event: &KeyEvent) {
    HOOK_STATE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(state) = slot.as_mut() else {
            return;
        };

        let snapshot = state.config.load();
        if snapshot.generation != state.generation {
            state.detector.reconfigure(snapshot.settings.snap.gesture);
            state.generation = snapshot.generation;
        }
        if !snapshot.settings.snap.enabled {
            return;
        }

        if let Some(fired) = state.detector.observe(event) {
            let _ = state.tx.send(GestureSignal {
                fired,
                centered: input::ctrl_held(),
            });
        }
    });
}
