//! System Info Dashboard (system-info)
//!
//! Terminal dashboard for the essentials: CPU, memory, disk, network,
//! battery, temperature and the top CPU consumers. Metrics come from one of
//! two providers chosen at startup (see `metrics`): the sysinfo-backed full
//! source, or a `/proc` reader for minimal environments (`--simple`).
//! `--notify` condenses the vitals into a single desktop notification for a
//! status-bar click handler.

mod metrics;

use std::env;

use anyhow::Result;
use chrono::Local;
use notify_rust::Notification;

use metrics::MetricsSource;

fn progress_bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = (width as f64 * clamped / 100.0) as usize;
    format!(
        "[{}{}] {clamped:.1}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days}d {hours}h {minutes}m")
}

fn hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}

fn display_dashboard(source: &mut dyn MetricsSource) {
    println!("🖥️  SYSTEM DASHBOARD ({})", source.label());
    println!("{}", "=".repeat(50));

    println!("🏠 Hostname: {}", hostname());
    match source.uptime_secs() {
        Some(secs) => println!("⏰ Uptime: {}", format_uptime(secs)),
        None => println!("⏰ Uptime: Unknown"),
    }
    println!("📅 Date: {}", Local::now().format("%A, %B %d, %Y %H:%M:%S"));
    println!();

    let cpu = source.cpu();
    let cores = cpu.cores.map_or("N/A".to_string(), |c| c.to_string());
    let freq = cpu
        .frequency_mhz
        .map_or("N/A".to_string(), |f| format!("{f}MHz"));
    println!("🔧 CPU: {cores} cores @ {freq}");
    println!("   Usage: {}", progress_bar(cpu.usage_percent, 20));
    match source.temperature_celsius() {
        Some(temp) => println!("   Temperature: {temp:.1}°C"),
        None => println!("   Temperature: N/A"),
    }
    println!();

    let memory = source.memory();
    println!("💾 Memory: {}GB / {}GB", memory.used_gb, memory.total_gb);
    println!("   Usage: {}", progress_bar(memory.percent, 20));
    if memory.swap_total_gb > 0.0 {
        println!("   Swap: {}GB / {}GB", memory.swap_used_gb, memory.swap_total_gb);
        println!("   Swap: {}", progress_bar(memory.swap_percent, 20));
    }
    println!();

    let disk = source.disk();
    println!("💿 Disk: {}GB / {}GB", disk.used_gb, disk.total_gb);
    println!("   Usage: {}", progress_bar(disk.percent, 20));
    println!("   Free: {}GB", disk.free_gb);
    println!();

    if let Some(network) = source.network() {
        println!("🌐 Network:");
        println!("   Sent: {}MB ({} packets)", network.sent_mb, network.packets_sent);
        println!("   Received: {}MB ({} packets)", network.received_mb, network.packets_received);
        println!();
    }

    if let Some(battery) = metrics::battery() {
        let status = if battery.charging { "🔌 Charging" } else { "🔋 Discharging" };
        println!("🔋 Battery: {}% - {status}", battery.percent);
        println!();
    }

    println!("🔝 Top 5 Processes (by CPU):");
    let top = source.top_processes(5);
    if top.is_empty() {
        println!("   (not available from the {} source)", source.label());
    } else {
        for (i, process) in top.iter().enumerate() {
            println!(
                "   {}. {} (PID: {}) - {:.1}%",
                i + 1,
                process.name,
                process.pid,
                process.cpu_percent
            );
        }
    }
}

fn send_summary(source: &mut dyn MetricsSource) {
    let cpu = source.cpu();
    let memory = source.memory();
    let temp = source
        .temperature_celsius()
        .map_or("N/A".to_string(), |t| format!("{t:.1}°C"));
    let message = format!(
        "CPU: {:.1}% | RAM: {:.1}% | Temp: {temp}",
        cpu.usage_percent, memory.percent
    );

    let shown = Notification::new()
        .summary("System Stats")
        .body(&message)
        .icon("computer")
        .timeout(5000)
        .show();
    if shown.is_err() {
        println!("{message}");
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let force_simple = args.iter().any(|a| a == "--simple");
    let mut source = metrics::select_source(force_simple);

    if args.iter().any(|a| a == "--notify") {
        send_summary(source.as_mut());
    } else {
        display_dashboard(source.as_mut());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_is_fixed_width() {
        let bar = progress_bar(50.0, 20);
        assert!(bar.starts_with('['));
        assert_eq!(bar.chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar.chars().filter(|c| *c == '░').count(), 10);
        assert!(bar.ends_with("50.0%"));
    }

    #[test]
    fn progress_bar_clamps_out_of_range_values() {
        assert!(progress_bar(150.0, 10).contains("100.0%"));
        assert!(progress_bar(-5.0, 10).contains("0.0%"));
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(0), "0d 0h 0m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}
