//! Full-screen terminal selection prompts.
//!
//! The installer's only UI: a centered question with either a Yes/No pair or
//! a vertical list of options, driven by raw single-keystroke input.
//! 1. **Raw input:** the terminal is switched to raw mode for exactly one
//!    keypress at a time, via an RAII guard so an error or interrupt can
//!    never leave the shell without echo.
//! 2. **Rendering:** everything is centered on the *visible* width, so the
//!    highlight escape codes on the selected option don't skew the layout.
//! 3. **Audit:** every committed answer is appended to the install log.

use std::io::{self, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::execute;
use regex::Regex;

use crate::audit::AuditLog;

/// One logical keypress, already decoded from the escape-sequence level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    /// Any printable key we don't act on. Echoed rather than dropped so a
    /// user mashing the wrong key can see the input arriving.
    Other(char),
}

/// Source of keypresses. The real implementation reads the terminal; tests
/// feed a scripted sequence.
pub trait KeySource {
    fn read_key(&mut self) -> Result<Key>;
}

/// Keeps the terminal in raw mode for exactly as long as the guard lives.
/// Restores the previous mode on drop, on every exit path.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> Result<Self> {
        terminal::enable_raw_mode()
            .context("terminal does not support raw mode")?;
        Ok(RawModeGuard)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Reads from the controlling terminal, one keypress per raw-mode window.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn read_key(&mut self) -> Result<Key> {
        let _guard = RawModeGuard::acquire()?;
        loop {
            let ev = event::read().context("failed to read terminal input")?;
            if let Event::Key(key) = ev {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let token = match key.code {
                    event::KeyCode::Up => Key::Up,
                    event::KeyCode::Down => Key::Down,
                    event::KeyCode::Left => Key::Left,
                    event::KeyCode::Right => Key::Right,
                    event::KeyCode::Enter => Key::Enter,
                    event::KeyCode::Char(c) => Key::Other(c),
                    _ => continue,
                };
                return Ok(token);
            }
            // Resize/focus events just mean "redraw with fresh geometry",
            // which the caller does on every loop anyway.
        }
    }
}

/// Removes ANSI styling sequences so the remaining text is what the user sees.
pub fn strip_ansi(text: &str) -> String {
    let re = Regex::new(r"\x1b\[[0-9;]*m").unwrap();
    re.replace_all(text, "").into_owned()
}

/// Centers `text` in a field of `width` columns, measuring only visible
/// characters. Text wider than the field is returned untouched.
pub fn ansi_aware_center(text: &str, width: usize) -> String {
    let visible = strip_ansi(text).chars().count();
    if visible >= width {
        return text.to_string();
    }
    let total = width - visible;
    let left = total / 2;
    let right = total - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Inverted (selected) rendering of a label.
pub fn highlight(label: &str) -> String {
    label.black().on_white().to_string()
}

/// Moves a list index by one with wraparound, so it is valid by construction.
pub fn step_index(index: usize, len: usize, key: Key) -> usize {
    match key {
        Key::Up => {
            if index == 0 { len - 1 } else { index - 1 }
        }
        Key::Down => {
            if index + 1 == len { 0 } else { index + 1 }
        }
        _ => index,
    }
}

fn term_size() -> (usize, usize) {
    // Queried fresh on every redraw; the user may have resized in between.
    match terminal::size() {
        Ok((w, h)) => (w as usize, h as usize),
        Err(_) => (80, 24),
    }
}

fn clear_screen<W: Write>(out: &mut W) -> Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
        .context("failed to clear screen")?;
    Ok(())
}

fn draw_bool<W: Write>(out: &mut W, question: &str, selection: bool) -> Result<()> {
    clear_screen(out)?;
    let (w, h) = term_size();
    write!(out, "{}", "\n".repeat((h / 2).saturating_sub(1)))?;
    writeln!(out, "{}", ansi_aware_center(question, w))?;
    let row = if selection {
        format!("{}   No", highlight("Yes"))
    } else {
        format!("Yes   {}", highlight("No"))
    };
    writeln!(out, "\n{}", ansi_aware_center(&row, w))?;
    out.flush()?;
    Ok(())
}

fn draw_list<W: Write>(out: &mut W, question: &str, options: &[&str], selection: usize) -> Result<()> {
    clear_screen(out)?;
    let (w, h) = term_size();
    // Shift the start line up by half the option count so the whole block
    // stays centered regardless of how many options there are.
    write!(out, "{}", "\n".repeat((h / 2).saturating_sub(options.len() / 2 + 2)))?;
    writeln!(out, "{}\n", ansi_aware_center(question, w))?;
    for (i, option) in options.iter().enumerate() {
        let line = if i == selection {
            highlight(option)
        } else {
            (*option).to_string()
        };
        writeln!(out, "{}", ansi_aware_center(&line, w))?;
    }
    out.flush()?;
    Ok(())
}

/// Yes/No prompt. Left and right both toggle: with only two states there is
/// no directional meaning, either arrow flips the answer. Enter commits.
pub fn bool_selection_with<K, W>(
    question: &str,
    initial: bool,
    keys: &mut K,
    out: &mut W,
    log: &AuditLog,
) -> Result<bool>
where
    K: KeySource,
    W: Write,
{
    let mut selection = initial;
    loop {
        draw_bool(out, question, selection)?;
        match keys.read_key()? {
            Key::Left | Key::Right => selection = !selection,
            Key::Enter => {
                clear_screen(out)?;
                break;
            }
            Key::Other(c) => writeln!(out, "{c}")?,
            _ => {}
        }
    }
    log.append(&format!("Bool selection: \"{question}\": \"{selection}\""))?;
    Ok(selection)
}

/// Vertical list prompt. Up/Down wrap around both ends; Enter commits and
/// returns the index (callers re-index into their own option list for the
/// label). The option list must be non-empty.
pub fn list_selection_with<K, W>(
    question: &str,
    options: &[&str],
    keys: &mut K,
    out: &mut W,
    log: &AuditLog,
) -> Result<usize>
where
    K: KeySource,
    W: Write,
{
    if options.is_empty() {
        bail!("list_selection needs at least one option");
    }
    let mut selection = 0usize;
    loop {
        draw_list(out, question, options, selection)?;
        match keys.read_key()? {
            key @ (Key::Up | Key::Down) => {
                selection = step_index(selection, options.len(), key);
            }
            Key::Enter => {
                clear_screen(out)?;
                break;
            }
            Key::Other(c) => writeln!(out, "{c}")?,
            _ => {}
        }
    }
    log.append(&format!("List selection: \"{question}\": \"{selection}\""))?;
    Ok(selection)
}

fn ensure_tty() -> Result<()> {
    // Fail fast: blocking on event::read() with a pipe for stdin would hang
    // the installer with a blank screen.
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        bail!("interactive prompts need a terminal; stdin/stdout is not a tty");
    }
    Ok(())
}

pub fn bool_selection(question: &str, initial: bool, log: &AuditLog) -> Result<bool> {
    ensure_tty()?;
    bool_selection_with(question, initial, &mut TerminalKeys, &mut io::stdout(), log)
}

pub fn list_selection(question: &str, options: &[&str], log: &AuditLog) -> Result<usize> {
    ensure_tty()?;
    list_selection_with(question, options, &mut TerminalKeys, &mut io::stdout(), log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_pads_both_sides() {
        assert_eq!(ansi_aware_center("ab", 6), "  ab  ");
        // Odd padding goes one column heavier on the right.
        assert_eq!(ansi_aware_center("ab", 7), "  ab   ");
    }

    #[test]
    fn center_ignores_styling_codes() {
        colored::control::set_override(true);
        let styled = highlight("ab");
        let centered = ansi_aware_center(&styled, 6);
        assert_eq!(strip_ansi(&centered), "  ab  ");
    }

    #[test]
    fn center_leaves_wide_text_alone() {
        assert_eq!(ansi_aware_center("abcdef", 4), "abcdef");
    }

    #[test]
    fn index_wraps_at_both_ends() {
        assert_eq!(step_index(0, 3, Key::Up), 2);
        assert_eq!(step_index(2, 3, Key::Down), 0);
        assert_eq!(step_index(1, 3, Key::Down), 2);
        assert_eq!(step_index(1, 3, Key::Left), 1);
    }

    #[test]
    fn single_option_list_stays_at_zero() {
        assert_eq!(step_index(0, 1, Key::Up), 0);
        assert_eq!(step_index(0, 1, Key::Down), 0);
    }
}
