//! Touchpad Gesture Dispatcher (gesture-manager)
//!
//! The target of every `libinput-gestures` binding in this setup. Invoked as
//! `gesture-manager <gesture-name>`, it translates the gesture into the
//! matching Hyprland action:
//! - 3-finger swipes cycle windows and open the launcher/overview.
//! - 4-finger swipes move between workspaces and toggle the desktop.
//! - Pinch drives the compositor zoom, 2-finger rotation cycles the layout.
//!
//! `--setup` writes the libinput-gestures config that wires everything up;
//! a bare invocation prints the reference card.

use std::env;
use std::fs;
use std::process::Command;

use anyhow::{Context, Result, bail};
use notify_rust::Notification;
use serde::Deserialize;

fn notify(title: &str, message: &str) {
    let _ = Notification::new()
        .summary(title)
        .body(message)
        .icon("input-touchpad")
        .timeout(1000)
        .show();
}

fn dispatch(command: &str) -> bool {
    Command::new("hyprctl")
        .arg("dispatch")
        .args(command.split_whitespace())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn keyword(key: &str, value: &str) -> bool {
    Command::new("hyprctl")
        .args(["keyword", key, value])
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[derive(Deserialize)]
struct Client {
    address: String,
    floating: bool,
}

/// 4-finger swipe down: sweep every tiled window into the special workspace.
fn minimize_all() {
    let Ok(output) = Command::new("hyprctl").args(["clients", "-j"]).output() else {
        return;
    };
    let Ok(clients) = serde_json::from_slice::<Vec<Client>>(&output.stdout) else {
        return;
    };
    for client in clients.iter().filter(|c| !c.floating) {
        dispatch(&format!("movetoworkspacesilent special address:{}", client.address));
    }
}

/// Every gesture this binary understands, the action it triggers, and the
/// notification shown. One table so `--setup` and dispatch can't drift.
const GESTURES: &[&str] = &[
    "3_finger_swipe_left",
    "3_finger_swipe_right",
    "3_finger_swipe_up",
    "3_finger_swipe_down",
    "3_finger_tap",
    "4_finger_swipe_left",
    "4_finger_swipe_right",
    "4_finger_swipe_up",
    "4_finger_swipe_down",
    "4_finger_tap",
    "pinch_in",
    "pinch_out",
    "2_finger_rotate_cw",
    "2_finger_rotate_ccw",
];

fn handle_gesture(name: &str) -> Result<()> {
    match name {
        "3_finger_swipe_left" => {
            dispatch("cyclenext prev");
            notify("3-Finger Swipe", "← Previous Window");
        }
        "3_finger_swipe_right" => {
            dispatch("cyclenext");
            notify("3-Finger Swipe", "→ Next Window");
        }
        "3_finger_swipe_up" => {
            let _ = Command::new("rofi").args(["-show", "window"]).spawn();
            notify("3-Finger Swipe Up", "📋 Window Overview");
        }
        "3_finger_swipe_down" => {
            let _ = Command::new("rofi").args(["-show", "drun"]).spawn();
            notify("3-Finger Swipe Down", "🚀 App Launcher");
        }
        "3_finger_tap" => {
            dispatch("focuscurrentorlast");
            notify("3-Finger Tap", "🖱️ Focus Toggle");
        }
        "4_finger_swipe_left" => {
            dispatch("workspace e-1");
            notify("4-Finger Swipe", "← Previous Desktop");
        }
        "4_finger_swipe_right" => {
            dispatch("workspace e+1");
            notify("4-Finger Swipe", "→ Next Desktop");
        }
        "4_finger_swipe_up" => {
            let _ = Command::new("kitty")
                .args(["-e", "sh", "-c", "hyprctl workspaces && read"])
                .spawn();
            notify("4-Finger Swipe Up", "🖥️ All Desktops");
        }
        "4_finger_swipe_down" => {
            minimize_all();
            notify("4-Finger Swipe Down", "🏠 Show Desktop");
        }
        "4_finger_tap" => {
            dispatch("togglespecialworkspace");
            notify("4-Finger Tap", "🏠 Desktop Toggle");
        }
        "pinch_in" => {
            keyword("cursor:zoom_factor", "1.0");
            notify("Pinch In", "🔍- Zoom Out");
        }
        "pinch_out" => {
            keyword("cursor:zoom_factor", "2.0");
            notify("Pinch Out", "🔍+ Zoom In");
        }
        "2_finger_rotate_cw" => {
            dispatch("layoutmsg orientationnext");
            notify("2-Finger Rotate", "↻ Rotate Layout");
        }
        "2_finger_rotate_ccw" => {
            dispatch("layoutmsg orientationprev");
            notify("2-Finger Rotate", "↺ Rotate Layout");
        }
        _ => bail!("unknown gesture: {name}"),
    }
    Ok(())
}

/// Generates the libinput-gestures config binding each gesture back to this
/// binary. Overwrites any previous version.
fn setup_config() -> Result<()> {
    let mut config = String::from("# Hyprland gesture bindings — generated by gesture-manager --setup\n\n");
    for gesture in GESTURES {
        let line = match *gesture {
            "3_finger_swipe_left" => "gesture swipe left 3",
            "3_finger_swipe_right" => "gesture swipe right 3",
            "3_finger_swipe_up" => "gesture swipe up 3",
            "3_finger_swipe_down" => "gesture swipe down 3",
            "3_finger_tap" => "gesture tap 3",
            "4_finger_swipe_left" => "gesture swipe left 4",
            "4_finger_swipe_right" => "gesture swipe right 4",
            "4_finger_swipe_up" => "gesture swipe up 4",
            "4_finger_swipe_down" => "gesture swipe down 4",
            "4_finger_tap" => "gesture tap 4",
            "pinch_in" => "gesture pinch in 2",
            "pinch_out" => "gesture pinch out 2",
            "2_finger_rotate_cw" => "gesture rotate clockwise 2",
            "2_finger_rotate_ccw" => "gesture rotate anticlockwise 2",
            _ => continue,
        };
        config.push_str(&format!("{line} gesture-manager {gesture}\n"));
    }

    let config_path = dirs::home_dir()
        .context("could not determine home directory")?
        .join(".config/libinput-gestures.conf");
    fs::write(&config_path, config)
        .with_context(|| format!("failed to write {}", config_path.display()))?;

    println!("✅ Gesture config written to {}", config_path.display());
    println!("🔧 To activate: libinput-gestures-setup autostart && libinput-gestures-setup start");
    Ok(())
}

fn print_reference() {
    println!("🖱️ Gesture Manager: configured gestures");
    println!("   3-Finger Swipes:");
    println!("     • Left/Right: Cycle windows");
    println!("     • Up: Window overview");
    println!("     • Down: App launcher");
    println!("     • Tap: Focus toggle");
    println!();
    println!("   4-Finger Swipes:");
    println!("     • Left/Right: Switch workspaces");
    println!("     • Up: Show all workspaces");
    println!("     • Down: Show desktop");
    println!("     • Tap: Special workspace toggle");
    println!();
    println!("   Pinch: zoom in/out");
    println!("   2-Finger Rotate: cycle layout orientation");
    println!();
    println!("💡 Run with --setup to (re)generate the libinput-gestures config.");
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--setup") => setup_config(),
        Some(gesture) => handle_gesture(gesture),
        None => {
            print_reference();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_gesture_is_an_error() {
        assert!(handle_gesture("5_finger_salute").is_err());
    }

    #[test]
    fn every_gesture_name_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for gesture in GESTURES {
            assert!(seen.insert(gesture), "duplicate gesture {gesture}");
        }
    }
}
