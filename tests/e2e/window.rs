//! Window chrome: dragging, minimize to dock, maximize, close and re-entry

use crate::common::harness::TermfolioTestHarness;
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Duration;
use termfolio::model::animation::AnimationKind;
use termfolio::model::window::{WindowMode, CLOSED_HIDDEN_FOR};

// 90x28 window centred in 120x40: top-left (15, 6).
// Buttons on the header row: close 16..19, minimize 19..22, maximize 22..25.
const HEADER: (u16, u16) = (50, 6);
const CLOSE: (u16, u16) = (17, 6);
const MINIMIZE: (u16, u16) = (20, 6);
const MAXIMIZE: (u16, u16) = (23, 6);
// Dock: 24 wide, centred on the bottom row
const DOCK: (u16, u16) = (60, 39);

#[test]
fn test_header_drag_moves_window() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    assert_eq!(harness.app().window().position(), (15, 6));

    assert!(harness.mouse_down(HEADER.0, HEADER.1));
    assert!(harness.app().window().is_dragging());
    assert!(harness.mouse_drag(60, 10));
    assert_eq!(harness.app().window().position(), (25, 10));

    assert!(harness.mouse_up(60, 10));
    assert!(!harness.app().window().is_dragging());

    // Drags after release do nothing
    assert!(!harness.mouse_drag(70, 12));
    assert_eq!(harness.app().window().position(), (25, 10));

    harness.render().unwrap();
    harness.assert_screen_contains("guest@-jake-:~$ cat introduction.txt");
}

#[test]
fn test_drag_is_clamped_to_viewport() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    harness.mouse_down(HEADER.0, HEADER.1);
    harness.mouse_drag(119, 39);
    assert_eq!(harness.app().window().position(), (30, 12));

    harness.mouse_drag(0, 0);
    assert_eq!(harness.app().window().position(), (0, 0));
    harness.mouse_up(0, 0);
}

#[test]
fn test_press_on_content_does_not_start_drag() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    assert!(!harness.mouse_down(50, 20));
    assert!(!harness.app().window().is_dragging());
}

#[test]
fn test_minimize_to_dock_and_restore() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    harness.mouse_down(MINIMIZE.0, MINIMIZE.1);
    assert_eq!(harness.app().window().mode(), WindowMode::Minimized);
    assert_eq!(
        harness.app().window().animation(),
        Some(AnimationKind::Minimize)
    );

    harness.advance(Duration::from_millis(300));
    harness.render().unwrap();
    harness.assert_screen_contains("-jake- terminal");
    harness.assert_screen_not_contains("cat introduction.txt");

    // Typing is ignored while minimized
    harness.type_text("help");
    assert_eq!(harness.app().session().input(), "");

    assert!(harness.mouse_down(DOCK.0, DOCK.1));
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);
    assert_eq!(harness.app().window().position(), (15, 6));

    harness.advance(Duration::from_millis(600));
    harness.render().unwrap();
    harness.assert_screen_not_contains("-jake- terminal");
    harness.assert_screen_contains("cat introduction.txt");
}

#[test]
fn test_f9_toggles_minimize() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.send_key(KeyCode::F(9), KeyModifiers::NONE);
    assert!(harness.app().window().is_minimized());
    harness.send_key(KeyCode::F(9), KeyModifiers::NONE);
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);
}

#[test]
fn test_maximize_toggle() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    harness.mouse_down(MAXIMIZE.0, MAXIMIZE.1);
    assert_eq!(harness.app().window().mode(), WindowMode::Maximized);
    let frame = harness.app().window().frame(harness.app().viewport()).unwrap();
    assert_eq!((frame.x, frame.y, frame.width, frame.height), (0, 0, 120, 39));

    // Maximized windows are not draggable
    harness.mouse_down(60, 0);
    assert!(!harness.app().window().is_dragging());

    // Maximize button now sits at the top-left corner
    harness.mouse_down(8, 0);
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);
    assert_eq!(harness.app().window().position(), (15, 6));
}

#[test]
fn test_close_hides_then_reenters() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.type_text("who");

    harness.mouse_down(CLOSE.0, CLOSE.1);
    assert_eq!(harness.app().window().mode(), WindowMode::Closed);
    assert_eq!(harness.app().window().animation(), Some(AnimationKind::Exit));

    harness.advance(Duration::from_millis(300));
    assert_eq!(harness.app().window().animation(), None);
    harness.render().unwrap();
    harness.assert_screen_not_contains("cat introduction.txt");
    harness.assert_screen_not_contains("-jake- terminal");

    harness.advance(CLOSED_HIDDEN_FOR);
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);
    assert_eq!(
        harness.app().window().animation(),
        Some(AnimationKind::ReEnter)
    );

    harness.advance(Duration::from_millis(800));
    assert!(!harness.app().window().is_animating());

    // Transcript and input survive the close
    assert_eq!(harness.app().session().input(), "who");
    harness.render().unwrap();
    harness.assert_screen_contains("guest@-jake-:~$ who");
}

#[test]
fn test_late_tick_finishes_whole_close_sequence() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.mouse_down(CLOSE.0, CLOSE.1);

    harness.advance(Duration::from_secs(10));
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);
    assert!(!harness.app().window().is_animating());
}

#[test]
fn test_resize_recenters_window() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.mouse_down(HEADER.0, HEADER.1);
    harness.mouse_drag(40, 2);
    harness.mouse_up(40, 2);

    harness.resize(100, 30).unwrap();
    assert_eq!(harness.app().window().position(), (5, 1));

    harness.render().unwrap();
    harness.assert_screen_contains("cat introduction.txt");
}

#[test]
fn test_clear_while_maximized_keeps_prompt() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.send_key(KeyCode::F(10), KeyModifiers::NONE);
    assert_eq!(harness.app().window().mode(), WindowMode::Maximized);

    harness.submit("clear");
    assert!(harness.app().session().transcript().is_empty());
    assert_eq!(harness.app().window().mode(), WindowMode::Maximized);
    assert!(harness.app().accepts_input());

    harness.render().unwrap();
    harness.assert_screen_not_contains("cat introduction.txt");
    harness.assert_screen_contains("guest@-jake-:~$");
}

#[test]
fn test_clear_after_reentry_keeps_prompt() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();
    harness.mouse_down(CLOSE.0, CLOSE.1);
    harness.advance(Duration::from_secs(5));
    assert_eq!(harness.app().window().mode(), WindowMode::Normal);

    harness.submit("CLEAR");
    assert!(harness.app().session().transcript().is_empty());

    harness.render().unwrap();
    harness.assert_screen_contains("guest@-jake-:~$");
}

#[test]
fn test_mouse_events_report_when_redraw_is_needed() {
    let mut harness = TermfolioTestHarness::ready(120, 40).unwrap();

    // Nothing changes for presses on content or stray drags and releases
    assert!(!harness.mouse_down(50, 20));
    assert!(!harness.mouse_drag(55, 22));
    assert!(!harness.mouse_up(55, 22));

    assert!(harness.mouse_down(MAXIMIZE.0, MAXIMIZE.1));
    assert_eq!(harness.app().window().mode(), WindowMode::Maximized);
}
