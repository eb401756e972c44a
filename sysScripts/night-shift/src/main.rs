//! Night Shift Daemon (night-shift)
//!
//! Warms the screen during late-night hours by driving `hyprsunset`.
//! Inside the 01:30–07:00 window the filter runs at 5000K; outside it the
//! running `hyprsunset` gets a SIGINT, which is its documented way to fade
//! back to normal. Polls every five seconds — cheap enough to not matter,
//! fast enough that the transition lands on time.

use std::ffi::OsStr;
use std::process::Command;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveTime};
use sysinfo::{Signal, System};

const NIGHT_TEMPERATURE: u32 = 5000;
const POLL_INTERVAL: Duration = Duration::from_secs(5);

fn window() -> (NaiveTime, NaiveTime) {
    (
        NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
    )
}

fn in_night_window(now: NaiveTime) -> bool {
    let (start, end) = window();
    start <= now && now < end
}

fn start_filter() {
    let _ = Command::new("hyprsunset")
        .arg("-t")
        .arg(NIGHT_TEMPERATURE.to_string())
        .spawn();
}

/// SIGINT rather than kill: hyprsunset restores the gamma table on its own
/// interrupt handler.
fn stop_filter() {
    let sys = System::new_all();
    for process in sys.processes_by_name(OsStr::new("hyprsunset")) {
        process.kill_with(Signal::Interrupt);
    }
}

fn main() -> Result<()> {
    let mut enabled = false;
    loop {
        let should_be_enabled = in_night_window(Local::now().time());

        if should_be_enabled && !enabled {
            println!("🌙 Entering night window, starting hyprsunset at {NIGHT_TEMPERATURE}K");
            start_filter();
            enabled = true;
        }
        if !should_be_enabled && enabled {
            println!("☀️ Leaving night window, stopping hyprsunset");
            stop_filter();
            enabled = false;
        }

        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn window_boundaries_are_half_open() {
        assert!(in_night_window(at(1, 30)));
        assert!(in_night_window(at(3, 0)));
        assert!(!in_night_window(at(7, 0)));
        assert!(!in_night_window(at(1, 29)));
    }

    #[test]
    fn daytime_is_outside_the_window() {
        assert!(!in_night_window(at(12, 0)));
        assert!(!in_night_window(at(23, 59)));
        assert!(!in_night_window(at(0, 0)));
    }
}
