//! Post-install hooks.
//!
//! The fixed command sequence that turns a package set into a working
//! session: service enablement, dark-mode defaults, gesture wiring and the
//! waybar stylesheet fix-up. Every step logs and continues; this stage is
//! best-effort by design and a user can re-run any command by hand from the
//! log transcript.

use std::fs;
use std::fs::OpenOptions;

use anyhow::anyhow;

use crate::audit::AuditLog;

pub fn post_install(log: &AuditLog, do_reboot: bool, do_ly_dm: bool) {
    let Some(home) = dirs::home_dir() else {
        log.error(&anyhow!("could not determine home directory, skipping post-install"));
        return;
    };

    // Waybar stylesheet: fix ownership if a previous sudo run left it
    // root-owned, then expand the $HOME placeholder the repo ships with.
    let waybar_css = home.join(".config/waybar/style.css");
    let css = waybar_css.display();
    if OpenOptions::new().read(true).write(true).open(&waybar_css).is_err() {
        log.run(&format!("sudo chown $USER:$USER {css} && chmod 644 {css}"));
    }
    match fs::read_to_string(&waybar_css) {
        Ok(content) => {
            let expanded = content.replace("$HOME", &home.to_string_lossy());
            if let Err(e) = fs::write(&waybar_css, expanded) {
                log.error(&anyhow!("failed to rewrite {css}: {e}"));
            }
        }
        Err(e) => log.error(&anyhow!("failed to read {css}: {e}")),
    }

    // Screenshare & audio
    log.run("systemctl --user enable --now pipewire pipewire-pulse wireplumber");

    // Network manager
    log.run("sudo systemctl enable NetworkManager.service");

    // Default dark mode
    log.run("gsettings set org.gnome.desktop.interface gtk-theme Adwaita-dark");
    log.run("gsettings set org.gnome.desktop.interface color-scheme prefer-dark");
    log.run("gsettings set org.gnome.desktop.interface icon-theme Papirus");
    log.run("gsettings set org.gnome.desktop.interface font-name 'Noto Sans Regular 11'");

    // Advanced touchpad gestures
    log.run("gesture-manager --setup");
    log.run("sudo usermod -a -G input $USER");
    log.run("libinput-gestures-setup autostart");
    log.run("libinput-gestures-setup start");

    if do_ly_dm {
        log.run("sudo systemctl enable ly");
    }

    if do_reboot {
        log.run("sudo reboot");
    }
}
