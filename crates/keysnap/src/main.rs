mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "keysnap",
    version,
    about = "Keyboard-driven window snapping and File Explorer view fixing for Windows"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Daemon(DaemonCommands),
    /// Validate the configuration file and print the effective values
    CheckConfig {
        /// Check this file instead of ~/.config/keysnap/config.toml
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

// Commands that talk to the desktop or the daemon; Windows only.
#[derive(Subcommand)]
enum DaemonCommands {
    /// Start the daemon in the background
    Start,
    /// Stop the running daemon
    Stop,
    /// Show whether the daemon is running and what it is doing
    Status,
    /// Let the daemon adjust every open Explorer window once more
    ResetMarks,
    /// Run the daemon in this console (Ctrl+C to quit)
    Run,
    /// Run the daemon (internal, not for direct use)
    #[command(hide = true)]
    Daemon,
}

#[derive(Subcommand)]
enum DebugCommands {
    /// List windows and whether the Explorer filter matches them
    List {
        /// Include windows that do not match the filter
        #[arg(long)]
        all: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig { file } => commands::check_config::execute(file.as_deref()),
        Commands::Daemon(command) => dispatch(command),
        Commands::Debug { command } => debug(command),
    }
}

#[cfg(windows)]
fn dispatch(command: DaemonCommands) {
    match command {
        DaemonCommands::Start => commands::start::execute(),
        DaemonCommands::Stop => commands::stop::execute(),
        DaemonCommands::Status => commands::status::execute(),
        DaemonCommands::ResetMarks => commands::reset_marks::execute(),
        DaemonCommands::Run => commands::run::execute(),
        DaemonCommands::Daemon => commands::daemon::execute(),
    }
}

#[cfg(windows)]
fn debug(command: DebugCommands) {
    match command {
        DebugCommands::List { all } => commands::debug::list::execute(all),
    }
}

#[cfg(not(windows))]
fn dispatch(_command: DaemonCommands) {
    windows_only();
}

#[cfg(not(windows))]
fn debug(_command: DebugCommands) {
    windows_only();
}

#[cfg(not(windows))]
fn windows_only() {
    eprintln!("Error: this command is only available on Windows.");
    std::process::exit(1);
}
