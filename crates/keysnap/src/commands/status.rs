use keysnap_core::{Command, PollMode, StatusReport, pid};
use keysnap_windows::{ipc, process};

pub fn execute() {
    if ipc::is_daemon_running() {
        match ipc::send_command(&Command::Status) {
            Ok(response) => match response.report {
                Some(report) => print_report(&report),
                None => println!("keysnap is running."),
            },
            Err(e) => eprintln!("keysnap is running but did not answer: {e}"),
        }
        return;
    }

    // No pipe; a leftover PID file means the daemon died or hung.
    if let Ok(Some(pid)) = pid::read_pid_file() {
        if process::is_process_alive(pid) {
            println!("keysnap process exists (PID: {pid}) but is not responding.");
        } else {
            let _ = pid::remove_pid_file();
            println!("keysnap is not running (cleaned up stale PID file).");
        }
    } else {
        println!("keysnap is not running.");
    }
}

fn print_report(report: &StatusReport) {
    let d = "\x1b[90m";
    let r = "\x1b[0m";

    println!("keysnap is running.");
    println!();
    if report.snap_enabled {
        println!(
            "  {d}Snap{r}       enabled, {} window(s) snapped",
            report.snapped.len()
        );
    } else {
        println!("  {d}Snap{r}       disabled");
    }

    if report.explorer_enabled {
        match report.mode {
            PollMode::OneShot => println!(
                "  {d}Explorer{r}   one-shot, {} window(s) adjusted",
                report.marked
            ),
            PollMode::Repeated => println!("  {d}Explorer{r}   repeated"),
        }
    } else {
        println!("  {d}Explorer{r}   disabled");
    }

    if let Some(tick) = report.last_tick {
        println!(
            "  {d}Last poll{r}  {} matched, {} adjusted, {} failed",
            tick.matched, tick.adjusted, tick.failed
        );
    }
}
