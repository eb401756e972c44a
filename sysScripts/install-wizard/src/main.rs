//! Hyprland Dotfiles Installer
//!
//! Takes a fresh Arch Linux install (base + git) to a configured Hyprland
//! desktop in four stages:
//! 1. **Bootstrap:** builds `paru` from the AUR so one tool can install
//!    everything else.
//! 2. **Questions:** GPU drivers, config backups, Ly DM, update, reboot —
//!    all answered up front through the full-screen selector so the rest of
//!    the run is unattended.
//! 3. **Packages & dotfiles:** installs the desktop stack and mirrors the
//!    repo's `home/` tree into $HOME.
//! 4. **Post-install:** services, dark mode, gestures, optional reboot.
//!
//! Everything is transcribed to `log.txt` in the working directory.

use std::env;

use anyhow::{Context, Result};
use colored::Colorize;

use install_wizard::audit::AuditLog;
use install_wizard::{homefiles, packages, post_install, selector};

const BANNER_WELCOME: &str = r#"
          ___         _        _ _ _
         |_ _|_ _  __| |_ __ _| | (_)_ _  __ _   _ __  __ _ _ _ _  _
          | || ' \(_-<  _/ _` | | | | ' \/ _` | | '_ \/ _` | '_| || |
         |___|_||_/__/\__\__,_|_|_|_|_||_\__, | | .__/\__,_|_|  \_,_|
                                         |___/  |_|
"#;

const BANNER_PACKAGES: &str = r#"
          ___         _        _ _ _                           _
         |_ _|_ _  __| |_ __ _| | (_)_ _  __ _   _ __  __ _ __| |____ _ __ _ ___ ___
          | || ' \(_-<  _/ _` | | | | ' \/ _` | | '_ \/ _` / _| / / _` / _` / -_|_-<
         |___|_||_/__/\__\__,_|_|_|_|_||_\__, | | .__/\__,_\__|_\_\__,_\__, \___/__/
                                         |___/  |_|                    |___/
"#;

const BANNER_DOTFILES: &str = r#"
          ___         _        _ _ _                _     _    __ _ _
         |_ _|_ _  __| |_ __ _| | (_)_ _  __ _   __| |___| |_ / _(_) |___ ___
          | || ' \(_-<  _/ _` | | | | ' \/ _` | / _` / _ \  _|  _| | / -_|_-<
         |___|_||_/__/\__\__,_|_|_|_|_||_\__, | \__,_\___/\__|_| |_|_\___/__/
                                         |___/
"#;

const BANNER_POST: &str = r#"
          ___        _     _         _        _ _                           _
         | _ \___ __| |_  (_)_ _  __| |_ __ _| | |  _ __ _ _ ___  __ ___ __| |_  _ _ _ ___ ___
         |  _/ _ (_-<  _| | | ' \(_-<  _/ _` | | | | '_ \ '_/ _ \/ _/ -_) _` | || | '_/ -_|_-<
         |_| \___/__/\__| |_|_||_/__/\__\__,_|_|_| | .__/_| \___/\__\___\__,_|\_,_|_| \___/__/
                                                   |_|
"#;

fn main() -> Result<()> {
    let log = AuditLog::at_default_location();
    log.clear()?;
    log.print(BANNER_WELCOME)?;

    let home = dirs::home_dir().context("could not determine home directory")?;

    // Bootstrap paru. Best-effort: if it is already installed the clone and
    // makepkg steps fail harmlessly into the log.
    log.run("sudo rm -rf ~/paru-bin");
    log.run("git clone --depth 1 https://aur.archlinux.org/paru-bin.git");
    log.run_in("makepkg -si --noconfirm", home.join("paru-bin"));
    log.run("sudo rm -rf paru-bin");

    // All questions up front; the answers drive the unattended remainder.
    let driver_names: Vec<&str> = packages::DRIVER_SETS.iter().map(|(name, _)| *name).collect();
    let pick = selector::list_selection("Select GPU drivers to install", &driver_names, &log)?;
    let selected_drivers = packages::DRIVER_SETS[pick].1;

    let do_backup = selector::bool_selection("Do you want to backup config files?", true, &log)?;
    let do_ly_dm = selector::bool_selection("Do you want to install Ly DM?", true, &log)?;
    let do_update_system =
        selector::bool_selection("Do you want to update your system after install?", true, &log)?;
    let do_reboot = selector::bool_selection("Do you want to reboot after install?", true, &log)?;

    log.print(BANNER_PACKAGES)?;
    packages::install_packages(selected_drivers, do_ly_dm, do_update_system)?;

    log.print(BANNER_DOTFILES)?;
    let source = env::current_dir()
        .context("could not determine current directory")?
        .join("home");
    if source.is_dir() {
        homefiles::install_homefiles(&log, &source, &home, do_backup);
    } else {
        anyhow::bail!(
            "dotfiles source {} not found; run the installer from the repo root",
            source.display()
        );
    }

    log.print(BANNER_POST)?;
    post_install::post_install(&log, do_reboot, do_ly_dm);

    println!("{}", "✅ Installation complete.".green().bold());
    Ok(())
}
