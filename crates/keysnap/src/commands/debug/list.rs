use keysnap_core::Config;
use keysnap_core::config;

pub fn execute(all: bool) {
    let filter = match config::try_load()
        .map(Option::unwrap_or_default)
        .and_then(|c: Config| c.validate())
    {
        Ok(settings) => settings.explorer.window_match,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let windows = match keysnap_windows::enumerate_windows() {
        Ok(windows) => windows,
        Err(e) => {
            eprintln!("Error: failed to enumerate windows: {e}");
            std::process::exit(1);
        }
    };

    println!(
        "{:<12} {:<5} {:<24} {:>6} {:>6}  Title",
        "HWND", "Match", "Class", "Width", "Height"
    );

    let mut shown = 0;
    let mut matched = 0;
    for window in &windows {
        let title = window.title();
        let class = window.class();
        let is_match = filter.matches(&class, &title);
        if is_match {
            matched += 1;
        }
        if !is_match && (!all || title.is_empty()) {
            continue;
        }

        let rect = window.rect().unwrap_or_default();
        println!(
            "{:<12} {:<5} {:<24} {:>6} {:>6}  {}",
            window.handle().to_string(),
            if is_match { "yes" } else { "" },
            truncate(&class, 24),
            rect.width,
            rect.height,
            title
        );
        shown += 1;
    }

    println!("\n{shown} windows shown, {matched} match the Explorer filter");
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
