use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::os::windows::io::FromRawHandle;

use keysnap_core::{Command, PIPE_NAME, Response, WindowResult};
use windows::Win32::Foundation::{
    CloseHandle, DUPLICATE_SAME_ACCESS, DuplicateHandle, HANDLE, INVALID_HANDLE_VALUE,
};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, FILE_SHARE_NONE, FlushFileBuffers, OPEN_EXISTING, PIPE_ACCESS_DUPLEX,
};
use windows::Win32::System::Pipes::{
    ConnectNamedPipe, CreateNamedPipeW, DisconnectNamedPipe, PIPE_READMODE_BYTE, PIPE_TYPE_BYTE,
    PIPE_UNLIMITED_INSTANCES, PIPE_WAIT, WaitNamedPipeW,
};
use windows::Win32::System::Threading::GetCurrentProcess;
use windows::core::HSTRING;

const GENERIC_READ_WRITE: u32 = 0x80000000 | 0x40000000;

/// Server end of the daemon pipe. Each connection carries exactly one
/// command line and one response line.
pub struct PipeServer {
    handle: HANDLE,
}

impl PipeServer {
    pub fn create() -> WindowResult<Self> {
        let pipe_name = HSTRING::from(PIPE_NAME);

        let handle = unsafe {
            CreateNamedPipeW(
                &pipe_name,
                PIPE_ACCESS_DUPLEX,
                PIPE_TYPE_BYTE | PIPE_READMODE_BYTE | PIPE_WAIT,
                PIPE_UNLIMITED_INSTANCES,
                1024,
                1024,
                0,
                None,
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            return Err("failed to create named pipe".into());
        }

        Ok(Self { handle })
    }

    /// Blocks until a client connects and sends a command line.
    pub fn accept_command(&self) -> WindowResult<Command> {
        unsafe { ConnectNamedPipe(self.handle, None)? };

        let mut line = String::new();
        BufReader::new(duplicate_as_file(self.handle)?).read_line(&mut line)?;
        Ok(serde_json::from_str(line.trim())?)
    }

    /// Writes the response and disconnects the client.
    pub fn send_response(&self, response: &Response) -> WindowResult<()> {
        let mut writer = duplicate_as_file(self.handle)?;
        writeln!(writer, "{}", serde_json::to_string(response)?)?;
        writer.flush()?;

        // Wait for the client to drain the pipe; disconnecting first
        // would discard the unread response.
        unsafe {
            let _ = FlushFileBuffers(self.handle);
            DisconnectNamedPipe(self.handle)?;
        }
        Ok(())
    }
}

impl Drop for PipeServer {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}

/// Closes a client handle on every exit path.
struct HandleGuard(HANDLE);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Sends one command to the running daemon and waits for its answer.
pub fn send_command(command: &Command) -> WindowResult<Response> {
    let pipe_name = HSTRING::from(PIPE_NAME);

    let handle = unsafe {
        CreateFileW(
            &pipe_name,
            GENERIC_READ_WRITE,
            FILE_SHARE_NONE,
            None,
            OPEN_EXISTING,
            Default::default(),
            None,
        )?
    };
    let _guard = HandleGuard(handle);

    let mut writer = duplicate_as_file(handle)?;
    writeln!(writer, "{}", serde_json::to_string(command)?)?;
    writer.flush()?;

    let mut line = String::new();
    BufReader::new(duplicate_as_file(handle)?).read_line(&mut line)?;
    Ok(serde_json::from_str(line.trim())?)
}

/// Whether a daemon pipe instance exists, without connecting to it.
pub fn is_daemon_running() -> bool {
    let pipe_name = HSTRING::from(PIPE_NAME);
    unsafe { WaitNamedPipeW(&pipe_name, 1).as_bool() }
}

/// Wraps a duplicate of `handle` in a `File` so the two can be closed
/// independently.
fn duplicate_as_file(handle: HANDLE) -> WindowResult<File> {
    let mut dup = HANDLE::default();
    unsafe {
        DuplicateHandle(
            GetCurrentProcess(),
            handle,
            GetCurrentProcess(),
            &mut dup,
            0,
            false,
            DUPLICATE_SAME_ACCESS,
        )?;
        Ok(File::from_raw_handle(dup.0))
    }
}
