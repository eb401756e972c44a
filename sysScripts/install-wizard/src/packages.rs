//! Package installation stage.
//!
//! Everything goes through `paru` so AUR and official packages can live in
//! one table. This is the only stage that fails the whole run: a desktop
//! with half its package set missing is worse than an aborted install the
//! user can re-run.

use std::process::Command;

use anyhow::{Context, Result, bail};
use colored::Colorize;

/// GPU driver sets, in the order they are offered by the installer menu.
pub const DRIVER_SETS: &[(&str, &[&str])] = &[
    (
        "Nvidia",
        &[
            "nvidia",
            "nvidia-utils",
            "lib32-nvidia-utils",
            "vulkan-icd-loader",
            "lib32-vulkan-icd-loader",
        ],
    ),
    (
        "AMD",
        &[
            "mesa",
            "lib32-mesa",
            "vulkan-radeon",
            "lib32-vulkan-radeon",
            "libva-mesa-driver",
            "lib32-libva-mesa-driver",
            "mesa-vdpau",
            "lib32-mesa-vdpau",
        ],
    ),
    (
        "Intel",
        &[
            "mesa",
            "lib32-mesa",
            "vulkan-intel",
            "lib32-vulkan-intel",
            "intel-media-sdk",
            "libva-intel-driver",
            "lib32-libva-intel-driver",
        ],
    ),
    ("Do not install GPU driver", &[]),
];

// The Hyprland desktop this repo configures, plus the tools its scripts
// shell out to (swww, pywal, rofi, libinput-gestures, hyprsunset, ...).
const BASE_PACKAGES: &[&str] = &[
    // Compositor & session
    "hyprland",
    "hyprpaper",
    "hyprsunset",
    "xdg-desktop-portal-hyprland",
    "polkit-gnome",
    "qt5-wayland",
    "qt6-wayland",
    // Bars, menus, notifications
    "waybar",
    "rofi-wayland",
    "mako",
    "libnotify",
    // Wallpaper & theming
    "swww",
    "python-pywal",
    "papirus-icon-theme",
    "gnome-themes-extra",
    // Audio & network
    "pipewire",
    "pipewire-pulse",
    "wireplumber",
    "networkmanager",
    // Apps the layout presets launch
    "kitty",
    "nautilus",
    // Input & screenshots
    "libinput-gestures",
    "brightnessctl",
    "grim",
    "slurp",
    "wl-clipboard",
    // Misc tooling
    "jq",
    "noto-fonts",
    "noto-fonts-emoji",
    "ttf-jetbrains-mono-nerd",
];

/// Installs the full package set: base desktop, the chosen GPU drivers, the
/// Ly display manager when requested, and optionally a full system update.
/// Propagates the first failure.
pub fn install_packages(drivers: &[&str], do_ly_dm: bool, do_update_system: bool) -> Result<()> {
    println!("{}", "📦 Installing base packages...".blue().bold());
    install_with_paru(BASE_PACKAGES)?;

    if !drivers.is_empty() {
        println!("{}", "🎮 Installing GPU drivers...".blue().bold());
        install_with_paru(drivers)?;
    }

    if do_ly_dm {
        println!("{}", "🖥️  Installing Ly display manager...".blue().bold());
        install_with_paru(&["ly"])?;
    }

    if do_update_system {
        println!("{}", "⬆️  Updating system...".blue().bold());
        let status = Command::new("paru")
            .args(["-Syu", "--noconfirm"])
            .status()
            .context("paru not found or failed to execute")?;
        if !status.success() {
            bail!("system update failed");
        }
    }

    Ok(())
}

/// One `paru -S --needed --noconfirm` batch. `--needed` makes re-runs cheap.
fn install_with_paru(packages: &[&str]) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }
    let mut args = vec!["-S", "--needed", "--noconfirm"];
    args.extend(packages);
    let status = Command::new("paru")
        .args(&args)
        .status()
        .context("paru not found or failed to execute")?;
    if !status.success() {
        bail!("paru failed to install: {}", packages.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_menu_ends_with_opt_out() {
        let (label, set) = DRIVER_SETS.last().unwrap();
        assert_eq!(*label, "Do not install GPU driver");
        assert!(set.is_empty());
    }

    #[test]
    fn every_real_driver_set_is_non_empty() {
        for (_, set) in &DRIVER_SETS[..DRIVER_SETS.len() - 1] {
            assert!(!set.is_empty());
        }
    }
}
