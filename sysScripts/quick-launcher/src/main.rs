//! Quick App Launcher (quick-launcher)
//!
//! Two front doors to the same favourites:
//! 1. `quick-launcher <key>` or the numbered terminal menu launches straight
//!    from a fixed table — no config files, no search path surprises.
//! 2. `quick-launcher --rofi` maintains the curated rofi setup (config +
//!    theme) and opens the graphical drun menu, after printing the most
//!    recently used window classes as a hint list.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

use anyhow::{Context, Result, bail};
use notify_rust::Notification;
use serde::Deserialize;

struct App {
    key: &'static str,
    command: &'static str,
    name: &'static str,
    description: &'static str,
}

const APPS: &[App] = &[
    App { key: "browser", command: "librewolf", name: "🌐 LibreWolf", description: "Web Browser" },
    App { key: "code", command: "code", name: "💻 VS Code", description: "Code Editor" },
    App { key: "files", command: "nautilus", name: "📁 Files", description: "File Manager" },
    App { key: "terminal", command: "kitty", name: "⚡ Terminal", description: "Command Line" },
    App { key: "music", command: "spotify-launcher", name: "🎵 Spotify", description: "Music Streaming" },
    App { key: "chat", command: "discord", name: "🎮 Discord", description: "Voice & Chat" },
    App { key: "video", command: "mpv", name: "📺 mpv", description: "Video Player" },
    App { key: "calculator", command: "gnome-calculator", name: "🧮 Calculator", description: "Quick Math" },
];

fn notify(message: &str) {
    let shown = Notification::new()
        .summary("Quick Launcher")
        .body(message)
        .icon("applications-system")
        .timeout(2000)
        .show();
    if shown.is_err() {
        println!("🚀 Quick Launcher: {message}");
    }
}

fn find_app(key: &str) -> Option<&'static App> {
    APPS.iter().find(|a| a.key == key)
}

fn launch_app(key: &str) -> Result<()> {
    let Some(app) = find_app(key) else {
        notify(&format!("❌ Unknown app: {key}"));
        bail!("unknown app: {key}");
    };
    let parts: Vec<&str> = app.command.split_whitespace().collect();
    Command::new(parts[0])
        .args(&parts[1..])
        .spawn()
        .with_context(|| format!("failed to launch {}", app.name))?;
    notify(&format!("🚀 Launching {}", app.name));
    Ok(())
}

fn show_menu() -> Result<()> {
    println!("🚀 Quick App Launcher");
    println!("{}", "=".repeat(30));
    for (i, app) in APPS.iter().enumerate() {
        println!("{:2}. {} - {}", i + 1, app.name, app.description);
    }
    println!("{:2}. Exit", APPS.len() + 1);

    loop {
        print!("\n➤ Choose app (1-{}): ", APPS.len() + 1);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let choice = line.trim();

        if let Ok(n) = choice.parse::<usize>() {
            if n >= 1 && n <= APPS.len() {
                return launch_app(APPS[n - 1].key);
            }
            if n == APPS.len() + 1 {
                println!("👋 Goodbye!");
                return Ok(());
            }
            println!("❌ Invalid choice");
        } else if find_app(&choice.to_lowercase()).is_some() {
            // Typing the key works too.
            return launch_app(&choice.to_lowercase());
        } else {
            println!("❌ Invalid choice");
        }
    }
}

// --- Rofi front-end ---

const ROFI_CONFIG: &str = r#"configuration {
    modi: "drun,run,window";
    show-icons: true;
    icon-theme: "Papirus";
    display-drun: " Apps";
    display-run: " Run";
    display-window: " Windows";
    drun-display-format: "{name}";
    window-format: "{w} · {c} · {t}";
    font: "JetBrains Mono Nerd Font 12";
    kb-row-up: "Up,Control+k,Control+p";
    kb-row-down: "Down,Control+j,Control+n";
    kb-accept-entry: "Return,KP_Enter";
    kb-mode-next: "Shift+Right,Control+Tab";
    kb-mode-previous: "Shift+Left,Control+Shift+Tab";
}

@theme "launcher"
"#;

const ROFI_THEME: &str = r#"* {
    background:     #1a1a1a;
    background-alt: #2d2d2d;
    foreground:     #ffffff;
    selected:       #8b0000;
    active:         #ff6b6b;
    urgent:         #ff4757;
}

window {
    background-color: @background;
    border:           2px;
    border-color:     @selected;
    border-radius:    8px;
    width:            600px;
}

element selected.normal {
    background-color: @selected;
    text-color:       @foreground;
}
"#;

#[derive(Deserialize)]
struct Client {
    class: String,
}

/// Last few distinct window classes, newest last — a cheap "recent apps"
/// list straight from the compositor.
fn recent_classes() -> Vec<String> {
    let Ok(output) = Command::new("hyprctl").args(["clients", "-j"]).output() else {
        return Vec::new();
    };
    let Ok(clients) = serde_json::from_slice::<Vec<Client>>(&output.stdout) else {
        return Vec::new();
    };
    let mut recent: Vec<String> = Vec::new();
    for client in clients.iter().rev().take(5) {
        let class = client.class.to_lowercase();
        if !class.is_empty() && !recent.contains(&class) {
            recent.push(class);
        }
    }
    recent
}

fn rofi_launcher() -> Result<()> {
    let rofi_dir = dirs::home_dir()
        .context("could not determine home directory")?
        .join(".config/rofi");
    fs::create_dir_all(&rofi_dir)?;
    fs::write(rofi_dir.join("config.rasi"), ROFI_CONFIG)
        .context("failed to write rofi config")?;
    fs::write(rofi_dir.join("launcher.rasi"), ROFI_THEME)
        .context("failed to write rofi theme")?;

    let recent = recent_classes();
    if !recent.is_empty() {
        println!("🕘 Recent: {}", recent.join(", "));
    }

    Command::new("rofi")
        .args(["-show", "drun"])
        .spawn()
        .context("failed to spawn rofi")?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--rofi") => rofi_launcher(),
        Some(key) => launch_app(&key.to_lowercase()),
        None => show_menu(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_keys_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for app in APPS {
            assert!(seen.insert(app.key), "duplicate key {}", app.key);
        }
    }

    #[test]
    fn lookup_is_by_key_not_name() {
        assert!(find_app("terminal").is_some());
        assert!(find_app("⚡ Terminal").is_none());
        assert!(find_app("emacs").is_none());
    }
}
