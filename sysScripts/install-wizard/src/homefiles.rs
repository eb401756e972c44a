//! Dotfile deployment.
//!
//! Mirrors the repository's `home/` tree into the user's home directory.
//! Pre-existing files can be kept as `<name>.backup` before being replaced,
//! and machine-local override files are never clobbered. Individual copy
//! failures are logged and the walk continues; a half-deployed config is
//! more useful than an aborted install.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::audit::AuditLog;

/// Files that stay untouched when they already exist at the destination.
/// `custom.conf` holds the user's machine-specific Hyprland overrides.
const PRESERVED: &[&str] = &["custom.conf"];

pub fn install_homefiles(log: &AuditLog, source: &Path, home: &Path, do_backup: bool) {
    copy_with_replace(log, source, home, do_backup);
}

fn copy_with_replace(log: &AuditLog, src: &Path, dst: &Path, do_backup: bool) {
    if src.is_dir() {
        if !dst.exists() {
            if let Err(e) = fs::create_dir_all(dst) {
                log.error(&anyhow!("failed to create {}: {e}", dst.display()));
                return;
            }
        }
        match fs::read_dir(src) {
            Ok(entries) => {
                for entry in entries.flatten() {
                    copy_with_replace(log, &entry.path(), &dst.join(entry.file_name()), do_backup);
                }
            }
            Err(e) => log.error(&anyhow!("failed to read {}: {e}", src.display())),
        }
    } else if src.is_file() {
        if let Err(err) = place_file(src, dst, do_backup) {
            log.error(&err);
        }
    }
}

fn place_file(src: &Path, dst: &Path, do_backup: bool) -> Result<()> {
    let keep_existing = dst.is_file()
        && src
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| PRESERVED.contains(&n));
    if keep_existing {
        return Ok(());
    }

    if do_backup && dst.is_file() {
        let mut backup = dst.as_os_str().to_owned();
        backup.push(".backup");
        fs::rename(dst, &backup)
            .with_context(|| format!("failed to back up {}", dst.display()))?;
    }

    fs::copy(src, dst)
        .with_context(|| format!("failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn test_log(dir: &Path) -> AuditLog {
        AuditLog::new(dir.join("log.txt"))
    }

    #[test]
    fn mirrors_nested_tree() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("home");
        let dst = tmp.path().join("target");
        write(&src.join(".config/app/settings.toml"), "a = 1");
        write(&src.join(".zshrc"), "export A=1");

        install_homefiles(&test_log(tmp.path()), &src, &dst, false);

        assert_eq!(
            fs::read_to_string(dst.join(".config/app/settings.toml")).unwrap(),
            "a = 1"
        );
        assert_eq!(fs::read_to_string(dst.join(".zshrc")).unwrap(), "export A=1");
    }

    #[test]
    fn backup_renames_existing_file_before_overwrite() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("home");
        let dst = tmp.path().join("target");
        write(&src.join(".zshrc"), "new");
        write(&dst.join(".zshrc"), "old");

        install_homefiles(&test_log(tmp.path()), &src, &dst, true);

        assert_eq!(fs::read_to_string(dst.join(".zshrc")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.join(".zshrc.backup")).unwrap(), "old");
    }

    #[test]
    fn no_backup_just_overwrites() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("home");
        let dst = tmp.path().join("target");
        write(&src.join(".zshrc"), "new");
        write(&dst.join(".zshrc"), "old");

        install_homefiles(&test_log(tmp.path()), &src, &dst, false);

        assert_eq!(fs::read_to_string(dst.join(".zshrc")).unwrap(), "new");
        assert!(!dst.join(".zshrc.backup").exists());
    }

    #[test]
    fn existing_custom_conf_is_preserved() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("home");
        let dst = tmp.path().join("target");
        write(&src.join(".config/hypr/custom.conf"), "shipped defaults");
        write(&dst.join(".config/hypr/custom.conf"), "user tweaks");

        install_homefiles(&test_log(tmp.path()), &src, &dst, true);

        assert_eq!(
            fs::read_to_string(dst.join(".config/hypr/custom.conf")).unwrap(),
            "user tweaks"
        );
    }

    #[test]
    fn fresh_custom_conf_is_installed() {
        let tmp = tempdir().unwrap();
        let src = tmp.path().join("home");
        let dst = tmp.path().join("target");
        write(&src.join(".config/hypr/custom.conf"), "shipped defaults");

        install_homefiles(&test_log(tmp.path()), &src, &dst, true);

        assert_eq!(
            fs::read_to_string(dst.join(".config/hypr/custom.conf")).unwrap(),
            "shipped defaults"
        );
    }
}
