//! Window Layout Manager (window-manager)
//!
//! Hyprland layout automation bound to keybinds:
//! 1. **Presets:** named multi-app layouts (coding, media, ...) that switch
//!    workspaces and launch applications with staggered delays.
//! 2. **Smart split:** picks the split orientation from the active window's
//!    aspect ratio instead of making the user think about it.
//! 3. **Focus / resize:** one dispatcher for arrow keys and vim keys alike.
//!
//! All compositor state comes from `hyprctl -j` JSON; all mutation goes
//! through `hyprctl dispatch`.

use std::env;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use notify_rust::Notification;
use serde::Deserialize;

struct PresetApp {
    command: &'static str,
    workspace: u32,
}

struct Preset {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    apps: &'static [PresetApp],
}

const PRESETS: &[Preset] = &[
    Preset {
        key: "coding",
        name: "🖥️ Coding Layout",
        description: "Editor, browser and terminal for development",
        apps: &[
            PresetApp { command: "code", workspace: 2 },
            PresetApp { command: "librewolf", workspace: 1 },
            PresetApp { command: "kitty", workspace: 2 },
        ],
    },
    Preset {
        key: "media",
        name: "🎵 Media Layout",
        description: "Entertainment and media consumption",
        apps: &[
            PresetApp { command: "spotify-launcher", workspace: 5 },
            PresetApp { command: "mpv", workspace: 5 },
            PresetApp { command: "discord", workspace: 4 },
        ],
    },
    Preset {
        key: "communication",
        name: "💬 Communication Layout",
        description: "Chat and social applications",
        apps: &[
            PresetApp { command: "discord", workspace: 4 },
            PresetApp { command: "telegram-desktop", workspace: 4 },
        ],
    },
    Preset {
        key: "productivity",
        name: "📊 Productivity Layout",
        description: "Work and productivity apps",
        apps: &[
            PresetApp { command: "code", workspace: 2 },
            PresetApp { command: "librewolf", workspace: 1 },
            PresetApp { command: "nautilus", workspace: 3 },
            PresetApp { command: "kitty", workspace: 2 },
        ],
    },
];

// --- Hyprland IPC ---

#[derive(Deserialize, Debug)]
struct WorkspaceRef {
    id: i64,
}

#[derive(Deserialize, Debug)]
struct ActiveWindow {
    class: String,
    title: String,
    size: [i64; 2],
    at: [i64; 2],
    floating: bool,
    workspace: WorkspaceRef,
}

#[derive(Deserialize, Debug)]
struct Workspace {
    id: i64,
    windows: u32,
}

fn dispatch(command: &str) -> Result<()> {
    let status = Command::new("hyprctl")
        .arg("dispatch")
        .args(command.split_whitespace())
        .status()
        .context("failed to run hyprctl")?;
    if !status.success() {
        bail!("hyprctl dispatch {command} failed");
    }
    Ok(())
}

fn active_window() -> Result<ActiveWindow> {
    let output = Command::new("hyprctl")
        .args(["activewindow", "-j"])
        .output()
        .context("failed to run hyprctl activewindow")?;
    serde_json::from_slice(&output.stdout).context("failed to parse hyprctl activewindow JSON")
}

fn workspaces() -> Result<Vec<Workspace>> {
    let output = Command::new("hyprctl")
        .args(["workspaces", "-j"])
        .output()
        .context("failed to run hyprctl workspaces")?;
    serde_json::from_slice(&output.stdout).context("failed to parse hyprctl workspaces JSON")
}

fn notify(message: &str) {
    let shown = Notification::new()
        .summary("Window Manager")
        .body(message)
        .icon("preferences-system-windows")
        .timeout(3000)
        .show();
    if shown.is_err() {
        println!("🪟 Window Manager: {message}");
    }
}

fn launch(command: &str) {
    let parts: Vec<&str> = command.split_whitespace().collect();
    let _ = Command::new(parts[0]).args(&parts[1..]).spawn();
}

// --- Pure decision helpers ---

/// Wide windows split side-by-side, tall (or square-ish) ones stack.
fn split_orientation(width: i64, height: i64) -> &'static str {
    if width as f64 > height as f64 * 1.5 { "horizontal" } else { "vertical" }
}

fn focus_arg(direction: &str) -> Option<&'static str> {
    match direction {
        "left" | "h" => Some("l"),
        "right" | "l" => Some("r"),
        "up" | "k" => Some("u"),
        "down" | "j" => Some("d"),
        _ => None,
    }
}

fn resize_args(direction: &str, amount: i32) -> Option<String> {
    match direction {
        "left" | "h" => Some(format!("-{amount} 0")),
        "right" | "l" => Some(format!("{amount} 0")),
        "up" | "k" => Some(format!("0 -{amount}")),
        "down" | "j" => Some(format!("0 {amount}")),
        _ => None,
    }
}

fn find_preset(key: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.key == key)
}

// --- Actions ---

fn smart_split(direction: &str) -> Result<()> {
    let orientation = if direction == "auto" {
        let window = active_window().context("no active window to split")?;
        split_orientation(window.size[0], window.size[1])
    } else {
        direction
    };

    if orientation == "horizontal" {
        dispatch("layoutmsg orientationcycle left right")?;
    } else {
        dispatch("layoutmsg orientationcycle top bottom")?;
    }
    notify(&format!("✂️ Split window {orientation}ly"));
    Ok(())
}

fn tile_windows(layout: &str) -> Result<()> {
    match layout {
        "master" => {
            dispatch("layoutmsg orientationcycle left right")?;
            dispatch("layoutmsg focusmaster")?;
        }
        "grid" => dispatch("layoutmsg orientationcycle top bottom")?,
        _ => {
            // Few windows fit side by side; beyond that stacking wins.
            let window = active_window()?;
            let count = workspaces()?
                .iter()
                .find(|ws| ws.id == window.workspace.id)
                .map_or(0, |ws| ws.windows);
            if count <= 2 {
                smart_split("horizontal")?;
            } else {
                smart_split("vertical")?;
            }
        }
    }
    Ok(())
}

fn apply_preset(key: &str) -> Result<()> {
    let Some(preset) = find_preset(key) else {
        notify(&format!("❌ Unknown preset: {key}"));
        bail!("unknown preset: {key}");
    };

    notify(&format!("🚀 Applying {}", preset.name));
    for (i, app) in preset.apps.iter().enumerate() {
        dispatch(&format!("workspace {}", app.workspace))?;
        thread::sleep(Duration::from_millis(300));
        launch(app.command);
        // Give each app a head start so windows land on their workspace.
        if i + 1 < preset.apps.len() {
            thread::sleep(Duration::from_millis(1500));
        }
    }
    notify(&format!("✅ {} applied", preset.name));
    Ok(())
}

fn organize_workspace(workspace: u32, theme: &str) -> Result<()> {
    let apps: &[&str] = match theme {
        "coding" => &["code", "librewolf", "kitty"],
        "media" => &["spotify-launcher", "mpv"],
        "communication" => &["discord", "telegram-desktop"],
        _ => bail!("unknown theme: {theme}"),
    };

    dispatch(&format!("workspace {workspace}"))?;
    thread::sleep(Duration::from_millis(500));
    for (i, app) in apps.iter().enumerate() {
        launch(app);
        if i + 1 < apps.len() {
            thread::sleep(Duration::from_secs(2));
        }
    }
    notify(&format!("🎯 Organized workspace {workspace} with {theme} theme"));
    Ok(())
}

fn focus_direction(direction: &str) -> Result<()> {
    match focus_arg(direction) {
        Some(arg) => dispatch(&format!("movefocus {arg}")),
        None => bail!("unknown focus direction: {direction}"),
    }
}

fn resize_window(direction: &str, amount: i32) -> Result<()> {
    match resize_args(direction, amount) {
        Some(args) => dispatch(&format!("resizeactive {args}")),
        None => bail!("unknown resize direction: {direction}"),
    }
}

fn show_window_info() -> Result<()> {
    let window = active_window()?;
    println!("\n📊 Active Window Info:");
    println!("   Class: {}", window.class);
    println!("   Title: {}", window.title);
    println!("   Workspace: {}", window.workspace.id);
    println!("   Size: {}x{}", window.size[0], window.size[1]);
    println!("   Position: {},{}", window.at[0], window.at[1]);
    println!("   Floating: {}", window.floating);
    Ok(())
}

fn window_menu() -> Result<()> {
    println!("🪟 Window Layout Manager");
    println!("{}", "=".repeat(40));
    for (i, preset) in PRESETS.iter().enumerate() {
        println!("{}. Apply {} - {}", i + 1, preset.name, preset.description);
    }
    println!("5. Smart split current window");
    println!("6. Show window info");
    println!("7. Exit");

    loop {
        let mut line = String::new();
        print!("\n➤ Choose action (1-7): ");
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stdin().read_line(&mut line)?;
        match line.trim() {
            "1" => return apply_preset("coding"),
            "2" => return apply_preset("media"),
            "3" => return apply_preset("communication"),
            "4" => return apply_preset("productivity"),
            "5" => return smart_split("auto"),
            "6" => show_window_info()?,
            "7" => {
                println!("👋 Goodbye!");
                return Ok(());
            }
            _ => println!("❌ Invalid choice"),
        }
    }
}

const USAGE: &str = "Usage: window-manager [--preset name] [--split direction] \
[--focus direction] [--resize direction amount] [--organize workspace theme] [--tile layout]";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--preset") => {
            let name = args.get(2).context(USAGE)?;
            apply_preset(name)
        }
        Some("--split") => smart_split(args.get(2).map_or("auto", String::as_str)),
        Some("--focus") => {
            let direction = args.get(2).context(USAGE)?;
            focus_direction(direction)
        }
        Some("--resize") => {
            let direction = args.get(2).context(USAGE)?;
            let amount = args.get(3).map_or(Ok(50), |a| a.parse()).context("amount must be a number")?;
            resize_window(direction, amount)
        }
        Some("--organize") => {
            let workspace: u32 = args.get(2).context(USAGE)?.parse().context("workspace must be a number")?;
            let theme = args.get(3).context(USAGE)?;
            organize_workspace(workspace, theme)
        }
        Some("--tile") => tile_windows(args.get(2).map_or("auto", String::as_str)),
        Some(_) => {
            println!("{USAGE}");
            Ok(())
        }
        None => window_menu(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_windows_split_horizontally() {
        assert_eq!(split_orientation(1600, 900), "horizontal");
        assert_eq!(split_orientation(900, 900), "vertical");
        // Exactly at the 1.5 ratio the tie goes to stacking.
        assert_eq!(split_orientation(1350, 900), "vertical");
    }

    #[test]
    fn vim_and_arrow_keys_map_to_the_same_focus_args() {
        assert_eq!(focus_arg("left"), focus_arg("h"));
        assert_eq!(focus_arg("down"), focus_arg("j"));
        assert_eq!(focus_arg("up"), Some("u"));
        assert_eq!(focus_arg("sideways"), None);
    }

    #[test]
    fn resize_args_carry_sign_and_axis() {
        assert_eq!(resize_args("left", 50).unwrap(), "-50 0");
        assert_eq!(resize_args("down", 30).unwrap(), "0 30");
        assert_eq!(resize_args("nowhere", 50), None);
    }

    #[test]
    fn every_preset_has_apps() {
        for preset in PRESETS {
            assert!(!preset.apps.is_empty(), "{} is empty", preset.key);
        }
        assert!(find_preset("coding").is_some());
        assert!(find_preset("gaming").is_none());
    }
}
