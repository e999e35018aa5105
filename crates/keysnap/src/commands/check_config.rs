use std::path::Path;

use keysnap_core::config::{self, Config};
use keysnap_core::{ConfigError, PollMode, Settings};

pub fn execute(file: Option<&Path>) {
    let (source, loaded) = match file {
        Some(path) => (path.display().to_string(), load_file(path)),
        None => (
            config::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "~/.config/keysnap/config.toml".into()),
            config::try_load(),
        ),
    };

    let config = match loaded {
        Ok(Some(config)) => {
            println!("Config: {source}");
            config
        }
        Ok(None) => {
            println!("Config: {source} (not found, using defaults)");
            Config::default()
        }
        Err(e) => fail(&e),
    };

    match config.validate() {
        Ok(settings) => {
            print_settings(&config, &settings);
            println!("\nConfiguration is valid.");
        }
        Err(e) => fail(&e),
    }
}

fn load_file(path: &Path) -> Result<Option<Config>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
    config::parse(&content).map(Some)
}

fn print_settings(config: &Config, settings: &Settings) {
    let d = "\x1b[90m"; // Dim gray: labels
    let r = "\x1b[0m";

    let snap = &settings.snap;
    println!();
    println!("  {d}Snap{r}       {}", on_off(snap.enabled));
    println!(
        "  {d}Gesture{r}    {} (0x{:02X}) x{} within {} ms, debounce {} ms",
        config.snap.key,
        snap.gesture.key,
        snap.gesture.presses,
        snap.gesture.interval.as_millis(),
        snap.gesture.debounce.as_millis()
    );
    println!("  {d}Size{r}       {}% x {}%", snap.width_pct, snap.height_pct);

    let explorer = &settings.explorer;
    let mode = match explorer.mode {
        PollMode::OneShot => "once per window",
        PollMode::Repeated => "every poll",
    };
    println!("  {d}Explorer{r}   {}", on_off(explorer.enabled));
    println!(
        "  {d}Poll{r}       {mode}, every {} ms",
        explorer.poll_interval.as_millis()
    );
    println!(
        "  {d}Hotkey{r}     {} x{} ({} ms apart)",
        config.explorer.hotkey,
        explorer.repeat,
        explorer.repeat_delay.as_millis()
    );
    match &explorer.window_match.title {
        Some(title) => println!(
            "  {d}Match{r}      class {}, title contains {title:?}",
            explorer.window_match.class
        ),
        None => println!("  {d}Match{r}      class {}", explorer.window_match.class),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

fn fail(error: &ConfigError) -> ! {
    eprintln!("Error: {error}");
    std::process::exit(1);
}
