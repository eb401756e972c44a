//! Wallpaper Rotation Daemon (wp-cycle)
//!
//! Keeps the desktop fresh without any user input:
//! 1. Scans the wallpaper directory for images on every cycle, so files
//!    dropped in while the daemon runs are picked up immediately.
//! 2. Picks a pseudo-random image that differs from the current one.
//! 3. Applies it via `swww` with an animated transition, regenerates the
//!    colour scheme with `wal`, and bounces waybar to pick up the colours.
//! 4. Sleeps the configured interval and goes again.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use std::{fs, thread};

use anyhow::{Context, Result};
use serde::Deserialize;
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[derive(Deserialize, Debug)]
#[serde(default)]
struct WallpaperConfig {
    wallpaper_dir: String,
    interval_secs: u64,
    swww_params: Vec<String>,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        WallpaperConfig {
            wallpaper_dir: "~/Wallpapers".to_string(),
            interval_secs: 600,
            swww_params: vec![
                "--transition-type".into(),
                "wipe".into(),
                "--transition-angle".into(),
                "30".into(),
                "--transition-fps".into(),
                "60".into(),
            ],
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct GlobalConfig {
    #[serde(default)]
    wallpaper: WallpaperConfig,
}

/// Reads `~/.config/hypr-dots/config.toml`. A missing file means defaults;
/// a malformed one is an error the user should see, not paper over.
fn load_config() -> Result<GlobalConfig> {
    let config_path = dirs::home_dir()
        .context("Cannot find home dir")?
        .join(".config/hypr-dots/config.toml");

    let Ok(config_str) = fs::read_to_string(&config_path) else {
        return Ok(GlobalConfig::default());
    };
    toml::from_str(&config_str).context("Failed to parse config.toml. Check for syntax errors.")
}

fn scan_wallpapers(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect()
}

/// Picks an image that isn't the one currently displayed. With a single
/// image the repeat is unavoidable and allowed.
fn pick_random<'a>(files: &'a [PathBuf], previous: Option<&Path>) -> Option<&'a PathBuf> {
    if files.is_empty() {
        return None;
    }
    if files.len() == 1 {
        return files.first();
    }
    let pool: Vec<&PathBuf> = files
        .iter()
        .filter(|f| previous != Some(f.as_path()))
        .collect();
    // Subsecond clock jitter is plenty of entropy for shuffling wallpapers.
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    Some(pool[nanos % pool.len()])
}

fn set_wallpaper(image: &Path, swww_params: &[String]) -> Result<()> {
    Command::new("swww")
        .arg("img")
        .arg(image)
        .args(swww_params)
        .status()
        .context("swww img command failed")?;

    // Regenerate the colour scheme quietly, then bounce waybar so the new
    // palette shows up in the bar.
    Command::new("wal")
        .args(["-i"])
        .arg(image)
        .arg("-q")
        .status()
        .context("wal command failed")?;

    let _ = Command::new("pkill").args(["-x", "waybar"]).status();
    Command::new("waybar")
        .spawn()
        .context("failed to relaunch waybar")?;
    Ok(())
}

fn main() -> Result<()> {
    let config = load_config()?.wallpaper;
    let wall_dir = expand_path(&config.wallpaper_dir);

    // Make sure the daemon that actually draws the wallpaper is up.
    let _ = Command::new("swww-daemon").spawn();

    let mut previous: Option<PathBuf> = None;
    loop {
        let files = scan_wallpapers(&wall_dir);
        match pick_random(&files, previous.as_deref()) {
            Some(choice) => {
                println!("Setting wallpaper: {}", choice.display());
                if let Err(e) = set_wallpaper(choice, &config.swww_params) {
                    eprintln!("Failed to set wallpaper: {e:#}");
                }
                previous = Some(choice.clone());
            }
            None => eprintln!("No valid wallpapers found in {}", wall_dir.display()),
        }
        thread::sleep(Duration::from_secs(config.interval_secs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn picker_skips_the_previous_wallpaper() {
        let files = vec![PathBuf::from("/w/a.png"), PathBuf::from("/w/b.png")];
        for _ in 0..20 {
            let picked = pick_random(&files, Some(Path::new("/w/a.png"))).unwrap();
            assert_eq!(picked, &PathBuf::from("/w/b.png"));
        }
    }

    #[test]
    fn single_wallpaper_may_repeat() {
        let files = vec![PathBuf::from("/w/only.jpg")];
        let picked = pick_random(&files, Some(Path::new("/w/only.jpg"))).unwrap();
        assert_eq!(picked, &files[0]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        assert!(pick_random(&[], None).is_none());
    }

    #[test]
    fn scan_keeps_images_and_drops_the_rest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"").unwrap();
        fs::write(dir.path().join("b.JPG"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::write(dir.path().join("clip.mp4"), b"").unwrap();

        let mut names: Vec<String> = scan_wallpapers(dir.path())
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.png", "b.JPG"]);
    }

    #[test]
    fn default_config_matches_shipped_constants() {
        let config = WallpaperConfig::default();
        assert_eq!(config.wallpaper_dir, "~/Wallpapers");
        assert_eq!(config.interval_secs, 600);
    }
}
