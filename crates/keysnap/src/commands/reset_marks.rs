use keysnap_core::Command;
use keysnap_windows::ipc;

pub fn execute() {
    if !ipc::is_daemon_running() {
        println!("keysnap is not running.");
        return;
    }

    match ipc::send_command(&Command::ResetMarks) {
        Ok(response) if response.is_ok() => {
            println!("{}", response.message.unwrap_or_default());
        }
        Ok(response) => {
            eprintln!(
                "Error: {}",
                response.message.unwrap_or_else(|| "unknown error".into())
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("IPC failed: {e}");
            std::process::exit(1);
        }
    }
}
