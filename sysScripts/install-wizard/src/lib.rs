//! Hyprland dotfiles installer.
//!
//! This library backs the `install-wizard` binary and exposes its pieces for
//! integration testing: the raw-terminal selection prompts, the append-only
//! install log, and the package / homefile / post-install stages.

pub mod audit;
pub mod homefiles;
pub mod packages;
pub mod post_install;
pub mod selector;
