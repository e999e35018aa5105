use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

/// `CREATE_NO_WINDOW | CREATE_NEW_PROCESS_GROUP`: no console for the
/// daemon and no Ctrl+C from the launching terminal.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if keysnap_windows::ipc::is_daemon_running() {
        println!("keysnap is already running.");
        return;
    }

    // A PID file without a pipe is either a hung daemon or a leftover.
    if let Ok(Some(pid)) = keysnap_core::pid::read_pid_file() {
        if keysnap_windows::process::is_process_alive(pid) {
            println!("keysnap process exists (PID: {pid}) but is not responding.");
            println!("Run 'keysnap stop' to end it.");
            return;
        }
        let _ = keysnap_core::pid::remove_pid_file();
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => {
            eprintln!("Error: cannot locate the keysnap executable: {e}");
            std::process::exit(1);
        }
    };

    let child = Command::new(exe)
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();

    match child {
        Ok(mut child) => {
            let pid = child.id();
            let _ = child.try_wait();
            print_banner(pid);
        }
        Err(e) => {
            eprintln!("Error: failed to start daemon: {e}");
            std::process::exit(1);
        }
    }
}

fn print_banner(pid: u32) {
    let d = "\x1b[90m"; // Dim gray: labels
    let w = "\x1b[1;97m"; // Bold bright white: values
    let r = "\x1b[0m";

    println!();
    println!("  {d}Config{r}   ~/.config/keysnap/config.toml");
    println!("  {d}Logs{r}     ~/.config/keysnap/logs/keysnap.log");
    println!("  {d}Daemon{r}   Started (PID: {w}{pid}{r})");
    println!("  {d}Tip{r}      Run 'keysnap check-config' after editing the config");
    println!();
}
