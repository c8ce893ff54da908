use crate::common::harness::{HarnessOptions, TermfolioTestHarness};
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;
use termfolio::background::Preset;
use termfolio::model::animation::AnimationKind;

#[test]
fn test_help_lists_every_command() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("help");

    let texts = harness.transcript_texts();
    let start = texts
        .iter()
        .rposition(|t| t == "Available commands:")
        .expect("listing header");
    let listed = &texts[start + 1..];
    assert_eq!(listed.len(), termfolio::command::COMMANDS.len());
    assert!(listed[0].starts_with("  LINKEDIN"));
    assert!(listed.last().unwrap().starts_with("  CLEAR"));
}

#[test]
fn test_whoami_and_setname_update_prompt() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    harness.submit("WHOAMI");
    assert_eq!(harness.last_output().as_deref(), Some("Current user: guest"));

    harness.submit("setname Ada Lovelace");
    assert_eq!(
        harness.last_output().as_deref(),
        Some("User name set to: Ada Lovelace")
    );
    assert_eq!(harness.app().session().prompt(), "Ada Lovelace@-jake-:~$");

    harness.render().unwrap();
    harness.assert_screen_contains("Ada Lovelace@-jake-:~$");
}

#[test]
fn test_setname_without_argument_shows_usage() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("SETNAME   ");
    assert_eq!(
        harness.last_output().as_deref(),
        Some("Usage: SETNAME <name>")
    );
    assert_eq!(harness.app().session().user_name(), "guest");
}

#[test]
fn test_unknown_command_reports_and_shakes() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("sudo rm -rf /");

    assert_eq!(
        harness.last_output().as_deref(),
        Some("Command not found: sudo rm -rf /. Type HELP for available commands.")
    );
    assert_eq!(harness.app().window().animation(), Some(AnimationKind::Shake));

    harness.advance(Duration::from_millis(400));
    assert_eq!(harness.app().window().animation(), None);
}

#[test]
fn test_clear_empties_transcript() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("help");
    harness.submit("clear");
    assert!(harness.app().session().transcript().is_empty());

    harness.render().unwrap();
    harness.assert_screen_not_contains("Available commands:");
    harness.assert_screen_contains("guest@-jake-:~$");
}

#[test]
fn test_linkedin_opens_profile() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.submit("LinkedIn");

    assert_eq!(
        harness.last_output().as_deref(),
        Some("Opening LinkedIn profile...")
    );
    assert_eq!(
        harness.opened_links(),
        vec!["https://linkedin.com/in/-jake-/".to_string()]
    );
}

#[test]
fn test_blank_submission_keeps_buffer_and_transcript() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    let before = harness.transcript_texts();

    harness.submit("   ");
    assert_eq!(harness.transcript_texts(), before);
    assert_eq!(harness.app().session().input(), "   ");
}

#[test]
fn test_backspace_edits_input() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.type_text("helpx");
    harness.send_key(KeyCode::Backspace, KeyModifiers::NONE);
    assert_eq!(harness.app().session().input(), "help");

    harness.render().unwrap();
    harness.assert_screen_contains("guest@-jake-:~$ help");
}

#[test]
fn test_paste_flattens_newlines() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.app_mut().handle_paste("SETNAME\r\nBob");
    assert_eq!(harness.app().session().input(), "SETNAME Bob");
}

#[test]
fn test_pattern_lists_and_switches_presets() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    harness.submit("PATTERN");
    let texts = harness.transcript_texts();
    let tail = &texts[texts.len() - 5..];
    assert_eq!(tail[0], "Background patterns:");
    assert_eq!(tail[1], " * voronoi");
    assert_eq!(tail[2], "   oscillator");

    harness.submit("pattern plasma");
    assert_eq!(
        harness.last_output().as_deref(),
        Some("Background pattern set to: plasma")
    );
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Plasma));

    harness.submit("pattern lava");
    assert!(harness
        .last_output()
        .unwrap()
        .starts_with("Unknown pattern: lava."));
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Plasma));
}

#[test]
fn test_background_toggle_stops_and_restarts_renderer() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    assert!(harness.app().background().is_running());

    harness.submit("BACKGROUND");
    assert_eq!(harness.last_output().as_deref(), Some("Background disabled."));
    assert!(!harness.app().background().is_running());

    harness.submit("PATTERN");
    assert_eq!(
        harness.last_output().as_deref(),
        Some("Background is disabled. Type BACKGROUND to enable it.")
    );

    harness.submit("background");
    assert_eq!(harness.last_output().as_deref(), Some("Background enabled."));
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Voronoi));
}

#[test]
fn test_ctrl_c_quits() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    assert!(!harness.app().should_quit());
    harness.send_key(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(harness.app().should_quit());
}

fn auto_cycling_harness(secs: u64) -> TermfolioTestHarness {
    let mut config = termfolio::config::Config::default();
    config.background.auto_cycle_secs = secs;
    let options = HarnessOptions {
        config,
        ..HarnessOptions::default()
    };
    let mut harness = TermfolioTestHarness::with_options(120, 40, options).unwrap();
    harness.finish_intro();
    harness
}

/// The PATTERN listing line that carries the active marker
fn marked_pattern(harness: &TermfolioTestHarness) -> Option<String> {
    harness
        .transcript_texts()
        .into_iter()
        .rev()
        .take(Preset::ALL.len() + 1)
        .find(|line| line.starts_with(" * "))
}

#[test]
fn test_auto_cycle_advances_renderer_and_listing_marker() {
    // Cycling is armed at startup (t=0) with a 10s interval
    let mut harness = auto_cycling_harness(10);
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Voronoi));

    harness.advance(Duration::from_secs(9));
    assert_eq!(
        harness.app().background().active_preset(),
        Some(Preset::Oscillator)
    );
    assert_eq!(
        harness.app().session().background().preset,
        Preset::Oscillator
    );
    harness.submit("PATTERN");
    assert_eq!(marked_pattern(&harness).as_deref(), Some(" * oscillator"));

    harness.advance(Duration::from_secs(10));
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Noise));
    harness.submit("PATTERN");
    assert_eq!(marked_pattern(&harness).as_deref(), Some(" * noise"));
}

#[test]
fn test_selecting_active_pattern_restarts_auto_cycle() {
    let mut harness = auto_cycling_harness(10);

    // Re-selecting the running preset restarts the 10s countdown from here
    harness.submit("PATTERN voronoi");
    harness.advance(Duration::from_secs(9));
    assert_eq!(harness.app().background().active_preset(), Some(Preset::Voronoi));

    harness.advance(Duration::from_secs(1));
    assert_eq!(
        harness.app().background().active_preset(),
        Some(Preset::Oscillator)
    );
}

#[test]
fn test_disabling_background_stops_auto_cycle() {
    let mut harness = auto_cycling_harness(10);
    harness.submit("BACKGROUND");
    harness.advance(Duration::from_secs(30));
    assert_eq!(harness.app().background().active_preset(), None);
    assert_eq!(harness.app().session().background().preset, Preset::Voronoi);
}
