//! Keyboard, mouse and paste handling

use super::App;
use crate::model::window::{WindowAction, WindowHit, WindowMode};
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

impl App {
    /// Handle a key press
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL)
            && matches!(code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.quit();
            return;
        }

        match code {
            KeyCode::F(9) => {
                let action = if self.window.is_minimized() {
                    WindowAction::Restore
                } else {
                    WindowAction::Minimize
                };
                self.apply_window(action);
                return;
            }
            KeyCode::F(10) => {
                self.apply_window(WindowAction::ToggleMaximize);
                return;
            }
            KeyCode::Enter if self.window.mode() == WindowMode::Minimized => {
                self.apply_window(WindowAction::Restore);
                return;
            }
            _ => {}
        }

        if !self.accepts_input() {
            tracing::trace!("Ignoring {:?}: prompt not accepting input", code);
            return;
        }

        match code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => self.session.backspace(),
            KeyCode::Char(c)
                if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.session.insert_char(c)
            }
            _ => {}
        }
    }

    /// Handle a mouse event. Returns true if anything may need redrawing.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        let (column, row) = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.on_dock(column, row) {
                    self.apply_window(WindowAction::Restore);
                    return true;
                }
                let Some(layout) = self.window.layout(self.viewport) else {
                    return false;
                };
                match layout.hit(column, row) {
                    Some(WindowHit::Close) => self.apply_window(WindowAction::Close),
                    Some(WindowHit::Minimize) => self.apply_window(WindowAction::Minimize),
                    Some(WindowHit::Maximize) => self.apply_window(WindowAction::ToggleMaximize),
                    Some(WindowHit::Header) => {
                        self.apply_window(WindowAction::PressHeader { column, row })
                    }
                    Some(WindowHit::Content) | None => return false,
                }
                true
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if !self.window.is_dragging() {
                    return false;
                }
                self.apply_window(WindowAction::DragTo { column, row });
                true
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let was_dragging = self.window.is_dragging();
                self.apply_window(WindowAction::Release);
                was_dragging
            }
            _ => false,
        }
    }

    /// Insert pasted text into the prompt; line breaks become spaces
    pub fn handle_paste(&mut self, text: &str) {
        if !self.accepts_input() {
            return;
        }
        for c in text.chars() {
            match c {
                '\r' => {}
                '\n' | '\t' => self.session.insert_char(' '),
                c if !c.is_control() => self.session.insert_char(c),
                _ => {}
            }
        }
    }
}
