pub fn execute() {
    if keysnap_windows::ipc::is_daemon_running() {
        println!("keysnap is already running in the background. Run 'keysnap stop' first.");
        return;
    }

    if let Err(e) = keysnap_windows::daemon::run(true) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
