//! Selector state-machine tests.
//!
//! The prompts are driven with a scripted key source and a byte-buffer
//! screen, so everything except the real raw-mode toggle is covered without
//! a terminal: toggle/wraparound behaviour, commit semantics, rendering
//! width math and the audit-log side effect.

use std::fs;

use anyhow::{Result, bail};
use tempfile::TempDir;

use install_wizard::audit::AuditLog;
use install_wizard::selector::{
    self, Key, KeySource, bool_selection_with, list_selection_with,
};

/// Feeds a fixed key sequence, then errors out if the prompt over-reads.
struct ScriptedKeys {
    keys: Vec<Key>,
    next: usize,
}

impl ScriptedKeys {
    fn new(keys: &[Key]) -> Self {
        ScriptedKeys { keys: keys.to_vec(), next: 0 }
    }
}

impl KeySource for ScriptedKeys {
    fn read_key(&mut self) -> Result<Key> {
        match self.keys.get(self.next) {
            Some(key) => {
                self.next += 1;
                Ok(*key)
            }
            None => bail!("prompt read past the scripted key sequence"),
        }
    }
}

/// Key source whose every read fails, standing in for a dead terminal.
struct BrokenKeys;

impl KeySource for BrokenKeys {
    fn read_key(&mut self) -> Result<Key> {
        bail!("simulated terminal read failure")
    }
}

fn temp_log() -> (TempDir, AuditLog) {
    let dir = TempDir::new().unwrap();
    let log = AuditLog::new(dir.path().join("log.txt"));
    (dir, log)
}

fn run_bool(question: &str, initial: bool, keys: &[Key], log: &AuditLog) -> Result<bool> {
    let mut screen = Vec::new();
    bool_selection_with(question, initial, &mut ScriptedKeys::new(keys), &mut screen, log)
}

fn run_list(question: &str, options: &[&str], keys: &[Key], log: &AuditLog) -> Result<usize> {
    let mut screen = Vec::new();
    list_selection_with(question, options, &mut ScriptedKeys::new(keys), &mut screen, log)
}

#[test]
fn immediate_enter_returns_initial_value() {
    let (_dir, log) = temp_log();
    for initial in [true, false] {
        let got = run_bool("Go?", initial, &[Key::Enter], &log).unwrap();
        assert_eq!(got, initial);
    }
}

#[test]
fn even_number_of_toggles_is_a_noop() {
    let (_dir, log) = temp_log();
    for initial in [true, false] {
        let keys = [Key::Left, Key::Right, Key::Left, Key::Left, Key::Enter];
        let got = run_bool("Go?", initial, &keys, &log).unwrap();
        assert_eq!(got, initial);
    }
}

#[test]
fn odd_number_of_toggles_flips() {
    let (_dir, log) = temp_log();
    for initial in [true, false] {
        let keys = [Key::Right, Key::Right, Key::Left, Key::Enter];
        let got = run_bool("Go?", initial, &keys, &log).unwrap();
        assert_eq!(got, !initial);
    }
}

#[test]
fn unrecognized_keys_do_not_change_the_answer() {
    let (_dir, log) = temp_log();
    let keys = [Key::Other('x'), Key::Up, Key::Other('?'), Key::Enter];
    let got = run_bool("Go?", true, &keys, &log).unwrap();
    assert!(got);
}

#[test]
fn full_wraparound_cycle_lands_on_start() {
    let (_dir, log) = temp_log();
    let options = ["A", "B", "C", "D"];
    let baseline = run_list("Pick", &options, &[Key::Enter], &log).unwrap();
    let keys = [Key::Down, Key::Down, Key::Down, Key::Down, Key::Enter];
    let cycled = run_list("Pick", &options, &keys, &log).unwrap();
    assert_eq!(cycled, baseline);
}

#[test]
fn up_from_first_wraps_to_last() {
    let (_dir, log) = temp_log();
    let options = ["A", "B", "C"];
    let got = run_list("Pick", &options, &[Key::Up, Key::Enter], &log).unwrap();
    assert_eq!(got, options.len() - 1);
}

#[test]
fn down_down_enter_selects_third_option() {
    let (_dir, log) = temp_log();
    let got = run_list("Pick", &["A", "B", "C"], &[Key::Down, Key::Down, Key::Enter], &log)
        .unwrap();
    assert_eq!(got, 2);
}

#[test]
fn bool_enter_keeps_true() {
    let (_dir, log) = temp_log();
    assert!(run_bool("Go?", true, &[Key::Enter], &log).unwrap());
}

#[test]
fn bool_left_from_false_yields_true() {
    let (_dir, log) = temp_log();
    assert!(run_bool("Go?", false, &[Key::Left, Key::Enter], &log).unwrap());
}

#[test]
fn highlighted_label_strips_back_to_plain_text() {
    colored::control::set_override(true);
    let styled = selector::highlight("Balanced Mode");
    assert_ne!(styled, "Balanced Mode");
    assert_eq!(selector::strip_ansi(&styled), "Balanced Mode");
}

#[test]
fn bool_commit_writes_one_wellformed_log_line() {
    let (_dir, log) = temp_log();
    run_bool("Install Ly DM?", true, &[Key::Enter], &log).unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content, "Bool selection: \"Install Ly DM?\": \"true\"\n");
}

#[test]
fn list_commit_logs_the_index_not_the_label() {
    let (_dir, log) = temp_log();
    run_list("Select GPU drivers", &["Nvidia", "AMD"], &[Key::Down, Key::Enter], &log).unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content, "List selection: \"Select GPU drivers\": \"1\"\n");
}

#[test]
fn toggling_without_committing_logs_nothing_extra() {
    let (_dir, log) = temp_log();
    let keys = [Key::Left, Key::Right, Key::Left, Key::Enter];
    run_bool("Go?", true, &keys, &log).unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content.lines().count(), 1);
}

#[test]
fn read_failure_propagates_and_skips_the_log() {
    let (_dir, log) = temp_log();
    let mut screen = Vec::new();
    let err = bool_selection_with("Go?", true, &mut BrokenKeys, &mut screen, &log);
    assert!(err.is_err());
    // No commit happened, so nothing may be recorded.
    let content = fs::read_to_string(log.path()).unwrap_or_default();
    assert_eq!(content, "");
}

#[test]
fn empty_option_list_is_rejected() {
    let (_dir, log) = temp_log();
    let mut screen = Vec::new();
    let options: [&str; 0] = [];
    let err = list_selection_with("Pick", &options, &mut ScriptedKeys::new(&[]), &mut screen, &log);
    assert!(err.is_err());
}

#[test]
fn rendered_screen_contains_every_option_label() {
    let (_dir, log) = temp_log();
    let options = ["Performance", "Balanced", "Battery"];
    let mut screen = Vec::new();
    list_selection_with("Pick a mode", &options, &mut ScriptedKeys::new(&[Key::Enter]), &mut screen, &log)
        .unwrap();
    let drawn = selector::strip_ansi(&String::from_utf8_lossy(&screen));
    for option in options {
        assert!(drawn.contains(option), "missing option {option:?}");
    }
}
