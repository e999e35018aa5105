use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_ACCESS_RIGHTS, PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE,
    TerminateProcess,
};

/// Owned process handle, closed on drop.
struct ProcessHandle(HANDLE);

impl ProcessHandle {
    fn open(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> Option<Self> {
        unsafe { OpenProcess(access, false, pid) }.ok().map(Self)
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Whether a process with `pid` exists. Used to tell a stuck daemon
/// from a stale PID file.
pub fn is_process_alive(pid: u32) -> bool {
    ProcessHandle::open(pid, PROCESS_QUERY_LIMITED_INFORMATION).is_some()
}

/// Forcibly ends the process. Returns whether it was terminated.
pub fn kill_process(pid: u32) -> bool {
    ProcessHandle::open(pid, PROCESS_TERMINATE)
        .is_some_and(|process| unsafe { TerminateProcess(process.0, 1) }.is_ok())
}
