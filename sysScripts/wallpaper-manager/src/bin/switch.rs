//! Wallpaper Switcher (wp-switch)
//!
//! One-shot counterpart to `wp-cycle` for the Hyprland/hyprpaper session:
//! 1. Takes a wallpaper path, `--random`, or runs a small interactive menu.
//! 2. Regenerates the colour scheme with `wal`, rewrites the hyprpaper and
//!    Hyprland wallpaper configs, and restarts the drawing services.
//! 3. Reports the outcome as a desktop notification so it is usable from a
//!    keybind without a terminal attached.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};
use notify_rust::Notification;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];

fn notify(message: &str) {
    let shown = Notification::new()
        .summary("Wallpaper Switcher")
        .body(message)
        .icon("preferences-desktop-wallpaper")
        .timeout(3000)
        .show();
    if shown.is_err() {
        println!("📱 Wallpaper Switcher: {message}");
    }
}

fn wallpaper_dir() -> Result<PathBuf> {
    Ok(dirs::home_dir().context("Cannot find home dir")?.join("Wallpapers"))
}

fn image_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut images: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .collect();
    images.sort();
    images
}

/// Applies a wallpaper: pywal colours, hyprpaper + Hyprland config rewrite,
/// service restart. Fails loudly if the image doesn't exist.
fn set_wallpaper(image: &Path) -> Result<()> {
    if !image.exists() {
        notify(&format!("❌ Image not found: {}", image.display()));
        bail!("image not found: {}", image.display());
    }

    Command::new("wal")
        .arg("-i")
        .arg(image)
        .status()
        .context("wal command failed")?;

    let config_dir = dirs::home_dir()
        .context("Cannot find home dir")?
        .join(".config/hypr");
    fs::create_dir_all(&config_dir)?;

    // Hyprland sources this variable from its main config.
    fs::write(
        config_dir.join("wallpapers.conf"),
        format!("$wallpaper = {}\n", image.display()),
    )
    .context("failed to write wallpapers.conf")?;

    fs::write(
        config_dir.join("hyprpaper.conf"),
        format!("preload = {p}\nwallpaper = , {p}\n", p = image.display()),
    )
    .context("failed to write hyprpaper.conf")?;

    // Restart the services that cache the old image.
    let _ = Command::new("pkill").args(["-x", "hyprpaper"]).status();
    let _ = Command::new("pkill").args(["-x", "waybar"]).status();
    let _ = Command::new("waybar").spawn();
    let _ = Command::new("hyprpaper").spawn();

    notify(&format!(
        "✅ Wallpaper set: {}",
        image.file_name().unwrap_or_default().to_string_lossy()
    ));
    Ok(())
}

fn random_wallpaper() -> Result<()> {
    let dir = wallpaper_dir()?;
    let images = image_files(&dir);
    if images.is_empty() {
        notify("❌ No wallpapers found in ~/Wallpapers");
        bail!("no wallpapers in {}", dir.display());
    }
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    set_wallpaper(&images[nanos % images.len()])
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
}

fn interactive() -> Result<()> {
    println!("🖼️  Wallpaper Switcher");
    println!("{}", "=".repeat(40));
    println!("1. Set specific wallpaper");
    println!("2. Random wallpaper");
    println!("3. List available wallpapers");
    println!("4. Exit");

    loop {
        let choice = read_line("\n➤ Choose option (1-4): ")?;
        match choice.as_str() {
            "1" => {
                let path = read_line("📁 Enter wallpaper path: ")?;
                if !path.is_empty() {
                    set_wallpaper(Path::new(&path))?;
                }
                return Ok(());
            }
            "2" => return random_wallpaper(),
            "3" => {
                let images = image_files(&wallpaper_dir()?);
                if images.is_empty() {
                    println!("❌ No wallpapers found in ~/Wallpapers");
                    continue;
                }
                println!("\n📂 Available wallpapers:");
                for (i, image) in images.iter().enumerate() {
                    println!("  {}. {}", i + 1, image.file_name().unwrap_or_default().to_string_lossy());
                }
                let picked = read_line(&format!("\n➤ Select wallpaper (1-{}): ", images.len()))?;
                match picked.parse::<usize>() {
                    Ok(n) if n >= 1 && n <= images.len() => return set_wallpaper(&images[n - 1]),
                    _ => println!("❌ Invalid selection"),
                }
            }
            "4" => {
                println!("👋 Goodbye!");
                return Ok(());
            }
            _ => println!("❌ Invalid option"),
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--random") => random_wallpaper(),
        Some(path) => set_wallpaper(Path::new(path)),
        None => interactive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn listing_is_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.png"), b"").unwrap();
        fs::write(dir.path().join("a.webp"), b"").unwrap();
        fs::write(dir.path().join("skip.mkv"), b"").unwrap();

        let names: Vec<String> = image_files(dir.path())
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.webp", "b.png"]);
    }

    #[test]
    fn missing_directory_is_just_empty() {
        assert!(image_files(Path::new("/definitely/not/here")).is_empty());
    }
}
