use keysnap_core::{Command, pid};
use keysnap_windows::{ipc, process};

pub fn execute() {
    // Graceful shutdown over IPC first.
    if ipc::is_daemon_running() {
        match ipc::send_command(&Command::Stop) {
            Ok(response) if response.is_ok() => {
                println!("keysnap stopped.");
                let _ = pid::remove_pid_file();
                return;
            }
            Ok(response) => {
                eprintln!(
                    "Error: {}",
                    response.message.unwrap_or_else(|| "unknown error".into())
                );
                return;
            }
            Err(e) => eprintln!("IPC failed: {e}"),
        }
    }

    // The pipe is gone but the process may still be alive.
    match pid::read_pid_file() {
        Ok(Some(pid)) if process::is_process_alive(pid) => {
            if process::kill_process(pid) {
                let _ = pid::remove_pid_file();
                println!("keysnap stopped (killed PID {pid}).");
            } else {
                eprintln!("Failed to kill process {pid}.");
                std::process::exit(1);
            }
        }
        _ => println!("keysnap is not running."),
    }
}
