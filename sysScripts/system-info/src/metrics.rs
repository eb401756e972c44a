//! Metrics sources.
//!
//! Two interchangeable providers behind one trait, picked once at startup:
//! - [`FullMetrics`] uses the `sysinfo` crate and covers everything the
//!   dashboard can show (per-process CPU, network counters, sensors).
//! - [`SimpleMetrics`] reads `/proc` and `df` directly for stripped-down
//!   environments; fields it cannot provide come back as `None`.
//!
//! Battery state is read from `/sys/class/power_supply` in both cases.

use std::fs;
use std::process::Command;

use sysinfo::{Components, Disks, Networks, ProcessesToUpdate, System};

pub struct CpuInfo {
    pub usage_percent: f64,
    pub cores: Option<usize>,
    pub frequency_mhz: Option<u64>,
}

pub struct MemoryInfo {
    pub total_gb: f64,
    pub used_gb: f64,
    pub percent: f64,
    pub swap_total_gb: f64,
    pub swap_used_gb: f64,
    pub swap_percent: f64,
}

pub struct DiskInfo {
    pub total_gb: f64,
    pub used_gb: f64,
    pub free_gb: f64,
    pub percent: f64,
}

pub struct NetworkInfo {
    pub sent_mb: f64,
    pub received_mb: f64,
    pub packets_sent: u64,
    pub packets_received: u64,
}

pub struct ProcessInfo {
    pub pid: u32,
    pub name: String,
    pub cpu_percent: f64,
}

pub struct BatteryInfo {
    pub percent: u32,
    pub charging: bool,
}

pub trait MetricsSource {
    fn label(&self) -> &'static str;
    fn uptime_secs(&self) -> Option<u64>;
    fn cpu(&mut self) -> CpuInfo;
    fn memory(&mut self) -> MemoryInfo;
    fn disk(&self) -> DiskInfo;
    fn network(&self) -> Option<NetworkInfo>;
    fn temperature_celsius(&self) -> Option<f64>;
    fn top_processes(&mut self, count: usize) -> Vec<ProcessInfo>;
}

/// Picks the provider once at startup. `--simple` forces the /proc reader;
/// otherwise the sysinfo-backed source is used.
pub fn select_source(force_simple: bool) -> Box<dyn MetricsSource> {
    if force_simple {
        Box::new(SimpleMetrics)
    } else {
        Box::new(FullMetrics::new())
    }
}

/// Battery via sysfs — the same path regardless of provider.
pub fn battery() -> Option<BatteryInfo> {
    let status = fs::read_to_string("/sys/class/power_supply/BAT0/status").ok()?;
    let capacity = fs::read_to_string("/sys/class/power_supply/BAT0/capacity").ok()?;
    Some(BatteryInfo {
        percent: capacity.trim().parse().ok()?,
        charging: status.trim() != "Discharging",
    })
}

pub fn bytes_to_gb(bytes: u64) -> f64 {
    (bytes as f64 / 1024f64.powi(3) * 100.0).round() / 100.0
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    (bytes as f64 / 1024f64.powi(2) * 100.0).round() / 100.0
}

// --- Full provider (sysinfo) ---

pub struct FullMetrics {
    sys: System,
}

impl FullMetrics {
    pub fn new() -> Self {
        FullMetrics { sys: System::new_all() }
    }
}

impl Default for FullMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsSource for FullMetrics {
    fn label(&self) -> &'static str {
        "full"
    }

    fn uptime_secs(&self) -> Option<u64> {
        Some(System::uptime())
    }

    fn cpu(&mut self) -> CpuInfo {
        // Usage is a delta measurement: two refreshes a beat apart.
        self.sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_cpu_usage();
        let frequency = self.sys.cpus().first().map(|c| c.frequency());
        CpuInfo {
            usage_percent: self.sys.global_cpu_usage() as f64,
            cores: Some(self.sys.cpus().len()),
            frequency_mhz: frequency,
        }
    }

    fn memory(&mut self) -> MemoryInfo {
        self.sys.refresh_memory();
        let total = self.sys.total_memory();
        let used = self.sys.used_memory();
        let swap_total = self.sys.total_swap();
        let swap_used = self.sys.used_swap();
        MemoryInfo {
            total_gb: bytes_to_gb(total),
            used_gb: bytes_to_gb(used),
            percent: percent_of(used, total),
            swap_total_gb: bytes_to_gb(swap_total),
            swap_used_gb: bytes_to_gb(swap_used),
            swap_percent: percent_of(swap_used, swap_total),
        }
    }

    fn disk(&self) -> DiskInfo {
        let disks = Disks::new_with_refreshed_list();
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"));
        match root {
            Some(disk) => {
                let total = disk.total_space();
                let free = disk.available_space();
                let used = total.saturating_sub(free);
                DiskInfo {
                    total_gb: bytes_to_gb(total),
                    used_gb: bytes_to_gb(used),
                    free_gb: bytes_to_gb(free),
                    percent: percent_of(used, total),
                }
            }
            None => DiskInfo { total_gb: 0.0, used_gb: 0.0, free_gb: 0.0, percent: 0.0 },
        }
    }

    fn network(&self) -> Option<NetworkInfo> {
        let networks = Networks::new_with_refreshed_list();
        let mut info = NetworkInfo {
            sent_mb: 0.0,
            received_mb: 0.0,
            packets_sent: 0,
            packets_received: 0,
        };
        for (_, data) in networks.iter() {
            info.sent_mb += bytes_to_mb(data.total_transmitted());
            info.received_mb += bytes_to_mb(data.total_received());
            info.packets_sent += data.total_packets_transmitted();
            info.packets_received += data.total_packets_received();
        }
        Some(info)
    }

    fn temperature_celsius(&self) -> Option<f64> {
        let components = Components::new_with_refreshed_list();
        components
            .list()
            .iter()
            .filter(|c| {
                let label = c.label().to_lowercase();
                label.contains("coretemp") || label.contains("cpu") || label.contains("tctl")
            })
            .filter_map(|c| c.temperature())
            .map(|t| t as f64)
            .next()
    }

    fn top_processes(&mut self, count: usize) -> Vec<ProcessInfo> {
        self.sys.refresh_processes(ProcessesToUpdate::All, true);
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut processes: Vec<ProcessInfo> = self
            .sys
            .processes()
            .values()
            .filter(|p| p.cpu_usage() > 0.0)
            .map(|p| ProcessInfo {
                pid: p.pid().as_u32(),
                name: p.name().to_string_lossy().into_owned(),
                cpu_percent: p.cpu_usage() as f64,
            })
            .collect();
        processes.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
        processes.truncate(count);
        processes
    }
}

// --- Simple provider (/proc + df) ---

pub struct SimpleMetrics;

impl MetricsSource for SimpleMetrics {
    fn label(&self) -> &'static str {
        "simple"
    }

    fn uptime_secs(&self) -> Option<u64> {
        let content = fs::read_to_string("/proc/uptime").ok()?;
        let secs: f64 = content.split_whitespace().next()?.parse().ok()?;
        Some(secs as u64)
    }

    fn cpu(&mut self) -> CpuInfo {
        let usage = fs::read_to_string("/proc/stat")
            .ok()
            .and_then(|stat| parse_proc_stat_usage(&stat))
            .unwrap_or(0.0);
        let cores = fs::read_to_string("/proc/cpuinfo").ok().map(|info| {
            info.lines().filter(|l| l.starts_with("processor")).count()
        });
        CpuInfo { usage_percent: usage, cores, frequency_mhz: None }
    }

    fn memory(&mut self) -> MemoryInfo {
        let Some(meminfo) = fs::read_to_string("/proc/meminfo").ok() else {
            return MemoryInfo {
                total_gb: 0.0,
                used_gb: 0.0,
                percent: 0.0,
                swap_total_gb: 0.0,
                swap_used_gb: 0.0,
                swap_percent: 0.0,
            };
        };
        parse_meminfo(&meminfo)
    }

    fn disk(&self) -> DiskInfo {
        Command::new("df")
            .arg("/")
            .output()
            .ok()
            .and_then(|out| parse_df_root(&String::from_utf8_lossy(&out.stdout)))
            .unwrap_or(DiskInfo { total_gb: 0.0, used_gb: 0.0, free_gb: 0.0, percent: 0.0 })
    }

    fn network(&self) -> Option<NetworkInfo> {
        None
    }

    fn temperature_celsius(&self) -> Option<f64> {
        for zone in ["thermal_zone0", "thermal_zone1"] {
            let path = format!("/sys/class/thermal/{zone}/temp");
            if let Ok(raw) = fs::read_to_string(&path) {
                if let Ok(millidegrees) = raw.trim().parse::<f64>() {
                    return Some(millidegrees / 1000.0);
                }
            }
        }
        None
    }

    fn top_processes(&mut self, _count: usize) -> Vec<ProcessInfo> {
        Vec::new()
    }
}

fn percent_of(part: u64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 / whole as f64 * 100.0 }
}

/// Single-snapshot CPU usage from the aggregate `cpu` line: time not spent
/// idle over total time since boot.
fn parse_proc_stat_usage(stat: &str) -> Option<f64> {
    let line = stat.lines().next()?;
    let times: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|v| v.parse().ok())
        .collect();
    let idle = *times.get(3)?;
    let total: u64 = times.iter().sum();
    if total == 0 {
        return None;
    }
    Some(100.0 * (1.0 - idle as f64 / total as f64))
}

fn parse_meminfo(meminfo: &str) -> MemoryInfo {
    let field = |name: &str| -> u64 {
        meminfo
            .lines()
            .find(|l| l.starts_with(name))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|v| v.parse::<u64>().ok())
            .map(|kb| kb * 1024)
            .unwrap_or(0)
    };
    let total = field("MemTotal:");
    let free = field("MemFree:");
    let available = {
        let a = field("MemAvailable:");
        if a > 0 { a } else { free }
    };
    let used = total.saturating_sub(available);
    let swap_total = field("SwapTotal:");
    let swap_free = field("SwapFree:");
    let swap_used = swap_total.saturating_sub(swap_free);
    MemoryInfo {
        total_gb: bytes_to_gb(total),
        used_gb: bytes_to_gb(used),
        percent: percent_of(used, total),
        swap_total_gb: bytes_to_gb(swap_total),
        swap_used_gb: bytes_to_gb(swap_used),
        swap_percent: percent_of(swap_used, swap_total),
    }
}

/// Second line of `df /`: 1K blocks total/used/available.
fn parse_df_root(output: &str) -> Option<DiskInfo> {
    let line = output.lines().nth(1)?;
    let parts: Vec<&str> = line.split_whitespace().collect();
    let total = parts.get(1)?.parse::<u64>().ok()? * 1024;
    let used = parts.get(2)?.parse::<u64>().ok()? * 1024;
    let free = parts.get(3)?.parse::<u64>().ok()? * 1024;
    Some(DiskInfo {
        total_gb: bytes_to_gb(total),
        used_gb: bytes_to_gb(used),
        free_gb: bytes_to_gb(free),
        percent: percent_of(used, total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gb_conversion_rounds_to_two_decimals() {
        assert_eq!(bytes_to_gb(16 * 1024 * 1024 * 1024), 16.0);
        assert_eq!(bytes_to_gb(1_610_612_736), 1.5);
    }

    #[test]
    fn proc_stat_usage_is_time_not_idle() {
        // user nice system idle — 75 of 100 ticks busy.
        let stat = "cpu  50 5 20 25\ncpu0 50 5 20 25\n";
        let usage = parse_proc_stat_usage(stat).unwrap();
        assert!((usage - 75.0).abs() < 0.01);
    }

    #[test]
    fn proc_stat_with_no_ticks_is_none() {
        assert!(parse_proc_stat_usage("cpu  \n").is_none());
    }

    #[test]
    fn meminfo_prefers_available_over_free() {
        let meminfo = "MemTotal:       8000000 kB\nMemFree:        1000000 kB\nMemAvailable:   4000000 kB\nSwapTotal:      2000000 kB\nSwapFree:       2000000 kB\n";
        let mem = parse_meminfo(meminfo);
        assert!((mem.percent - 50.0).abs() < 0.01);
        assert!((mem.swap_percent - 0.0).abs() < 0.01);
    }

    #[test]
    fn df_output_parses_the_root_line() {
        let output = "Filesystem     1K-blocks     Used Available Use% Mounted on\n/dev/nvme0n1p2 100000000 40000000  60000000  40% /\n";
        let disk = parse_df_root(output).unwrap();
        assert!((disk.percent - 40.0).abs() < 0.01);
        assert!(disk.total_gb > disk.used_gb);
    }

    #[test]
    fn battery_is_optional() {
        // Just must not panic on machines without BAT0.
        let _ = battery();
    }
}
