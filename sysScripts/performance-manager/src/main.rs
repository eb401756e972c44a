//! Performance Profile Manager (performance-manager)
//!
//! Toggles Hyprland between visual-effect profiles without touching the
//! config files on disk — everything goes through `hyprctl keyword`, so a
//! compositor restart returns to the user's baseline:
//! 1. Four profiles (performance/balanced/beauty/battery) as one settings
//!    table; the applied keyword sequence is derived from it.
//! 2. `--gaming` flips between performance and balanced for a keybind.
//! 3. `--auto` inspects running clients and the battery to pick a profile.
//! 4. The active profile name is persisted so toggles survive restarts.

use std::path::PathBuf;
use std::process::Command;
use std::{env, fs, thread};

use anyhow::{Context, Result, bail};
use notify_rust::Notification;
use serde::Deserialize;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};

#[derive(Debug, Clone, Copy)]
struct ModeSettings {
    animations: bool,
    blur: bool,
    shadows: bool,
    transparency: bool,
    vfr: bool,
    gaps: u32,
    rounding: u32,
    border_size: u32,
}

struct Mode {
    key: &'static str,
    name: &'static str,
    description: &'static str,
    settings: ModeSettings,
}

const MODES: &[Mode] = &[
    Mode {
        key: "performance",
        name: "🚀 Performance Mode",
        description: "Maximum performance for gaming and heavy tasks",
        settings: ModeSettings {
            animations: false,
            blur: false,
            shadows: false,
            transparency: false,
            vfr: false,
            gaps: 0,
            rounding: 0,
            border_size: 1,
        },
    },
    Mode {
        key: "balanced",
        name: "⚖️ Balanced Mode",
        description: "Good performance with some visual effects",
        settings: ModeSettings {
            animations: true,
            blur: true,
            shadows: false,
            transparency: true,
            vfr: true,
            gaps: 4,
            rounding: 8,
            border_size: 2,
        },
    },
    Mode {
        key: "beauty",
        name: "✨ Beauty Mode",
        description: "Maximum visual effects for showcase",
        settings: ModeSettings {
            animations: true,
            blur: true,
            shadows: true,
            transparency: true,
            vfr: true,
            gaps: 10,
            rounding: 14,
            border_size: 2,
        },
    },
    Mode {
        key: "battery",
        name: "🔋 Battery Mode",
        description: "Optimized for battery life",
        settings: ModeSettings {
            animations: false,
            blur: false,
            shadows: false,
            transparency: false,
            vfr: true,
            gaps: 2,
            rounding: 4,
            border_size: 1,
        },
    },
];

fn find_mode(key: &str) -> Option<&'static Mode> {
    MODES.iter().find(|m| m.key == key)
}

/// Expands a settings struct into the `hyprctl keyword` pairs that realize
/// it. Kept pure so the mapping is testable without a compositor.
fn keyword_sequence(s: &ModeSettings) -> Vec<(String, String)> {
    let mut seq: Vec<(String, String)> = Vec::new();
    let on_off = |b: bool| b.to_string();

    seq.push(("animations:enabled".into(), on_off(s.animations)));

    seq.push(("decoration:blur:enabled".into(), on_off(s.blur)));
    if s.blur {
        seq.push(("decoration:blur:size".into(), "2".into()));
        seq.push(("decoration:blur:passes".into(), "4".into()));
    }

    seq.push(("decoration:drop_shadow".into(), on_off(s.shadows)));
    if s.shadows {
        seq.push(("decoration:shadow_range".into(), "4".into()));
        seq.push(("decoration:shadow_render_power".into(), "3".into()));
    }

    if s.transparency {
        seq.push(("decoration:active_opacity".into(), "0.95".into()));
        seq.push(("decoration:inactive_opacity".into(), "0.90".into()));
    } else {
        seq.push(("decoration:active_opacity".into(), "1.0".into()));
        seq.push(("decoration:inactive_opacity".into(), "1.0".into()));
    }

    seq.push(("misc:vfr".into(), on_off(s.vfr)));
    seq.push(("general:gaps_in".into(), s.gaps.to_string()));
    seq.push(("general:gaps_out".into(), (s.gaps + 2).to_string()));
    seq.push(("decoration:rounding".into(), s.rounding.to_string()));
    seq.push(("general:border_size".into(), s.border_size.to_string()));
    seq
}

fn hypr_keyword(key: &str, value: &str) -> Result<()> {
    let status = Command::new("hyprctl")
        .args(["keyword", key, value])
        .status()
        .context("failed to run hyprctl")?;
    if !status.success() {
        bail!("hyprctl keyword {key} {value} failed");
    }
    Ok(())
}

fn notify(message: &str) {
    let shown = Notification::new()
        .summary("Performance Manager")
        .body(message)
        .icon("preferences-system-performance")
        .timeout(4000)
        .show();
    if shown.is_err() {
        println!("⚡ Performance Manager: {message}");
    }
}

fn state_file() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config/hypr/performance_mode"))
}

fn load_current_mode() -> String {
    state_file()
        .and_then(|p| fs::read_to_string(p).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| find_mode(s).is_some())
        .unwrap_or_else(|| "balanced".to_string())
}

fn save_current_mode(mode: &str) {
    let Some(path) = state_file() else { return };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = fs::write(&path, mode) {
        eprintln!("❌ Failed to save mode: {e}");
    }
}

fn apply_mode(key: &str) -> Result<()> {
    let Some(mode) = find_mode(key) else {
        notify(&format!("❌ Unknown mode: {key}"));
        bail!("unknown mode: {key}");
    };

    notify(&format!("🔄 Switching to {}", mode.name));
    for (keyword, value) in keyword_sequence(&mode.settings) {
        hypr_keyword(&keyword, &value)?;
    }
    save_current_mode(key);
    notify(&format!("✅ {} applied", mode.name));
    Ok(())
}

/// Keybind toggle: in performance mode go back to balanced, from anywhere
/// else jump to performance.
fn toggle_gaming_mode() -> Result<()> {
    if load_current_mode() == "performance" {
        apply_mode("balanced")
    } else {
        apply_mode("performance")
    }
}

#[derive(Deserialize)]
struct Client {
    class: String,
}

const GAMING_CLASSES: &[&str] = &["steam_app_", "lutris", "heroic", "minecraft", "wine"];

fn gaming_client_running() -> bool {
    let Ok(output) = Command::new("hyprctl").args(["clients", "-j"]).output() else {
        return false;
    };
    let Ok(clients) = serde_json::from_slice::<Vec<Client>>(&output.stdout) else {
        return false;
    };
    clients.iter().any(|c| {
        let class = c.class.to_lowercase();
        GAMING_CLASSES.iter().any(|g| class.contains(g))
    })
}

fn battery_low() -> bool {
    let status = fs::read_to_string("/sys/class/power_supply/BAT0/status");
    let capacity = fs::read_to_string("/sys/class/power_supply/BAT0/capacity");
    match (status, capacity) {
        (Ok(status), Ok(capacity)) => {
            status.trim() == "Discharging"
                && capacity.trim().parse::<u32>().map(|c| c < 30).unwrap_or(false)
        }
        _ => false, // desktop machine or no battery info
    }
}

fn auto_detect_mode() -> Result<&'static str> {
    let detected = if gaming_client_running() {
        "performance"
    } else if battery_low() {
        "battery"
    } else {
        "balanced"
    };
    if load_current_mode() != detected {
        apply_mode(detected)?;
    }
    Ok(detected)
}

fn show_status() {
    let current = load_current_mode();
    let mode = find_mode(&current).unwrap_or(&MODES[1]);
    println!("\n⚡ Current Performance Mode: {}", mode.name);
    println!("📝 Description: {}", mode.description);

    let mut sys = System::new();
    sys.refresh_cpu_usage();
    thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let mem_percent = if sys.total_memory() > 0 {
        sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
    } else {
        0.0
    };
    println!("🖥️ CPU Usage: {:.1}%", sys.global_cpu_usage());
    println!("💾 Memory Usage: {mem_percent:.1}%");
}

fn interactive_menu() -> Result<()> {
    let current = load_current_mode();
    println!("⚡ Performance Manager");
    println!("{}", "=".repeat(30));
    for (i, mode) in MODES.iter().enumerate() {
        let active = if mode.key == current { " (ACTIVE)" } else { "" };
        println!("{}. {}{active}", i + 1, mode.name);
        println!("   {}", mode.description);
    }
    println!("{}. Auto-detect optimal mode", MODES.len() + 1);
    println!("{}. Show system status", MODES.len() + 2);
    println!("{}. Exit", MODES.len() + 3);

    loop {
        use std::io::Write;
        print!("\n➤ Choose mode (1-{}): ", MODES.len() + 3);
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;

        match line.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= MODES.len() => return apply_mode(MODES[n - 1].key),
            Ok(n) if n == MODES.len() + 1 => {
                let detected = auto_detect_mode()?;
                println!("🤖 Auto-detected and applied: {detected}");
                return Ok(());
            }
            Ok(n) if n == MODES.len() + 2 => show_status(),
            Ok(n) if n == MODES.len() + 3 => {
                println!("👋 Goodbye!");
                return Ok(());
            }
            _ => println!("❌ Invalid choice"),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--mode") => {
            let name = args.get(2).context("--mode needs a profile name")?;
            apply_mode(name)
        }
        Some("--gaming") => toggle_gaming_mode(),
        Some("--auto") => auto_detect_mode().map(|_| ()),
        Some("--status") => {
            show_status();
            Ok(())
        }
        Some(_) => {
            println!("Usage: performance-manager [--mode name] [--gaming] [--auto] [--status]");
            println!("Available modes: performance, balanced, beauty, battery");
            Ok(())
        }
        None => interactive_menu(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(seq: &[(String, String)], key: &str) -> Option<String> {
        seq.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
    }

    #[test]
    fn performance_mode_strips_all_effects() {
        let seq = keyword_sequence(&find_mode("performance").unwrap().settings);
        assert_eq!(lookup(&seq, "animations:enabled").unwrap(), "false");
        assert_eq!(lookup(&seq, "decoration:blur:enabled").unwrap(), "false");
        assert_eq!(lookup(&seq, "decoration:active_opacity").unwrap(), "1.0");
        assert_eq!(lookup(&seq, "general:gaps_in").unwrap(), "0");
        // Blur tuning keywords are only emitted when blur is on.
        assert!(lookup(&seq, "decoration:blur:size").is_none());
    }

    #[test]
    fn beauty_mode_enables_shadows_with_tuning() {
        let seq = keyword_sequence(&find_mode("beauty").unwrap().settings);
        assert_eq!(lookup(&seq, "decoration:drop_shadow").unwrap(), "true");
        assert_eq!(lookup(&seq, "decoration:shadow_range").unwrap(), "4");
        assert_eq!(lookup(&seq, "decoration:rounding").unwrap(), "14");
    }

    #[test]
    fn outer_gaps_track_inner_gaps() {
        for mode in MODES {
            let seq = keyword_sequence(&mode.settings);
            let gaps_in: u32 = lookup(&seq, "general:gaps_in").unwrap().parse().unwrap();
            let gaps_out: u32 = lookup(&seq, "general:gaps_out").unwrap().parse().unwrap();
            assert_eq!(gaps_out, gaps_in + 2, "mode {}", mode.key);
        }
    }

    #[test]
    fn mode_table_lookup() {
        assert!(find_mode("battery").is_some());
        assert!(find_mode("ludicrous").is_none());
    }
}
