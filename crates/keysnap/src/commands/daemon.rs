pub fn execute() {
    if let Err(e) = keysnap_windows::daemon::run(false) {
        eprintln!("Daemon error: {e}");
        std::process::exit(1);
    }
}
