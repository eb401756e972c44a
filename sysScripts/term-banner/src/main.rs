//! Animated Terminal Banner (term-banner)
//!
//! Eye candy for new shells: a wolf's-head ASCII banner with animated eyes
//! and ember accents, a title block, and a live status box. The default
//! (`--static`) prints a single frame so shell startup stays instant;
//! `--animate [secs]` runs a 10 fps loop with the cursor hidden, restoring
//! it on the way out.

use std::env;
use std::io::{Write, stdout};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use colored::Colorize;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use sysinfo::System;

// The art interleaves colours mid-line, so raw SGR codes read better than
// chained Colorize calls there. Everything else uses `colored`.
const GREY: &str = "\x1b[90m";
const FUR: &str = "\x1b[37m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[93m";
const DARK: &str = "\x1b[30m";
const RESET: &str = "\x1b[0m";

const EYE_STATES: &[&str] = &["●", "◐", "○", "◑"];
const EMBER_STATES: &[&str] = &["▓", "▒", "░", "▬"];
const FPS_DELAY: Duration = Duration::from_millis(100);

/// Per-frame animation state: which eye glyph is showing, whether we are
/// mid-blink, and where the ember accents are in their cycle.
struct BannerState {
    eye_index: usize,
    blink_frames: u32,
    ember_flow: usize,
}

impl BannerState {
    fn new() -> Self {
        BannerState { eye_index: 0, blink_frames: 0, ember_flow: 0 }
    }

    fn eye(&mut self, frame: u32) -> &'static str {
        if self.blink_frames > 0 {
            self.blink_frames -= 1;
            return "━";
        }
        if frame > 0 && frame % 30 == 0 {
            self.blink_frames = 2;
            return "━";
        }
        if frame % 8 == 0 {
            self.eye_index = (self.eye_index + 1) % EYE_STATES.len();
        }
        EYE_STATES[self.eye_index]
    }

    fn ember(&mut self) -> &'static str {
        let glyph = EMBER_STATES[self.ember_flow % EMBER_STATES.len()];
        self.ember_flow += 1;
        glyph
    }
}

fn wolf_frame(state: &mut BannerState, frame: u32) -> String {
    let eye = state.eye(frame);
    let ember = state.ember();
    let shade = if frame % 4 < 2 { "▓" } else { "▒" };

    format!(
        "\n\
          {RED}{ember}{RESET}                        {RED}{ember}{RESET}\n\
          {GREY}▄███▄{RESET}                  {GREY}▄███▄{RESET}\n\
         {GREY}██{FUR}{shade}▓▓{GREY}██{RESET}                {GREY}██{FUR}▓▓{shade}{GREY}██{RESET}\n\
         {GREY}██{FUR}▓▓▓▓{GREY}████████████████{FUR}▓▓▓▓{GREY}██{RESET}\n\
          {GREY}██{FUR}▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓▓{GREY}██{RESET}\n\
          {GREY}██{FUR}▓▓▓{YELLOW}{eye}{FUR}▓▓▓▓▓▓▓▓▓▓▓▓{YELLOW}{eye}{FUR}▓▓▓{GREY}██{RESET}\n\
           {GREY}██{FUR}▓▓▓▓▓▓▓{shade}{shade}{shade}▓▓▓▓▓▓▓{GREY}██{RESET}\n\
           {GREY}██{FUR}▓▓▓▓▓▓{DARK}██████{FUR}▓▓▓▓▓▓{GREY}██{RESET}\n\
            {GREY}██{FUR}▓▓▓▓▓{DARK}████{FUR}▓▓▓▓▓{GREY}██{RESET}\n\
             {GREY}██{FUR}▓▓▓▓▓▓▓▓▓▓{GREY}██{RESET}\n\
               {GREY}██{FUR}▓▓▓▓{GREY}██{RESET}\n\
                 {GREY}██{FUR}▓{GREY}██{RESET}\n\
                  {GREY}███{RESET}\n"
    )
}

fn title_block() -> String {
    let lines = [
        r" _                          _       _       ",
        r"| |__  _   _ _ __  _ __  __| | ___ | |_ ___ ",
        r"| '_ \| | | | '_ \| '__/ _` |/ _ \| __/ __|",
        r"| | | | |_| | |_) | | | (_| | (_) | |_\__ \",
        r"|_| |_|\__, | .__/|_|  \__,_|\___/ \__|___/",
        r"       |___/|_|                             ",
    ];
    let mut block = String::new();
    for (i, line) in lines.iter().enumerate() {
        let styled = if i % 2 == 0 {
            format!("        {}", line.bright_red().bold())
        } else {
            format!("        {}", line.red())
        };
        block.push_str(&styled);
        block.push('\n');
    }
    block
}

fn status_box() -> String {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let cpu = sys.global_cpu_usage();
    let mem = if sys.total_memory() > 0 {
        sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
    } else {
        0.0
    };

    let rows = [
        "Session Status".to_string(),
        format!("CPU:  {cpu:>5.1}%"),
        format!("RAM:  {mem:>5.1}%"),
        format!("Time: {}", Local::now().format("%H:%M:%S")),
    ];

    let mut boxed = String::new();
    boxed.push_str(&format!("{}\n", "┌──────────────────────────────┐".bright_cyan()));
    for (i, row) in rows.iter().enumerate() {
        boxed.push_str(&format!("{}\n", format!("│ {row:<28} │").cyan()));
        if i == 0 {
            boxed.push_str(&format!("{}\n", "├──────────────────────────────┤".bright_cyan()));
        }
    }
    boxed.push_str(&format!("{}", "└──────────────────────────────┘".bright_cyan()));
    boxed
}

/// Shows the cursor again no matter how the animation loop ends.
struct CursorGuard;

impl Drop for CursorGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

fn animate(duration_secs: u32) -> Result<()> {
    let mut out = stdout();
    execute!(out, Clear(ClearType::All), Hide)?;
    let _guard = CursorGuard;

    let mut state = BannerState::new();
    let frames = duration_secs * 10;
    for frame in 0..frames {
        execute!(out, MoveTo(0, 0))?;
        write!(out, "{}", wolf_frame(&mut state, frame))?;
        write!(out, "{}", title_block())?;
        writeln!(out, "{}", status_box())?;
        if frame % 20 == 0 {
            writeln!(out, "{}", "                 ·   ·   ·".red())?;
        } else {
            writeln!(out)?;
        }
        out.flush()?;
        thread::sleep(FPS_DELAY);
    }
    Ok(())
}

fn print_static() -> Result<()> {
    let mut state = BannerState::new();
    let mut out = stdout();
    write!(out, "{}", wolf_frame(&mut state, 0))?;
    write!(out, "{}", title_block())?;
    writeln!(out, "{}", status_box())?;
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("--animate") => {
            let secs = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(8);
            animate(secs)
        }
        // Default stays static so it is safe in .zshrc.
        _ => print_static(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eyes_blink_every_thirty_frames() {
        let mut state = BannerState::new();
        assert_ne!(state.eye(1), "━");
        assert_eq!(state.eye(30), "━");
        // The blink holds for the following two frames.
        assert_eq!(state.eye(31), "━");
        assert_eq!(state.eye(32), "━");
        assert_ne!(state.eye(33), "━");
    }

    #[test]
    fn embers_cycle_through_all_glyphs() {
        let mut state = BannerState::new();
        let seen: Vec<&str> = (0..4).map(|_| state.ember()).collect();
        assert_eq!(seen, EMBER_STATES);
    }

    #[test]
    fn frame_always_carries_both_eyes() {
        let mut state = BannerState::new();
        let frame = wolf_frame(&mut state, 1);
        let eye_count = frame.matches(EYE_STATES[0]).count();
        assert_eq!(eye_count, 2);
    }
}
