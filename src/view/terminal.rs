//! Rendering of the terminal window
//!
//! ```text
//! ╭ ●  ●  ●  ──────── guest@-jake-: ~ ────────────────╮
//! │guest@-jake-:~$ cat introduction.txt               │
//! │Hello, I'm Jake.                                   │
//! │guest@-jake-:~$ HELP█                              │
//! ╰───────────────────────────────────────────────────╯
//! ```

use super::theme::Theme;
use super::wrap::wrap_spans;
use crate::model::transcript::{Transcript, TranscriptLine};
use crate::model::window::WindowLayout;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;

const BUTTON_GLYPH: char = '●';
const CURSOR_GLYPH: &str = "█";

/// The live prompt line at the bottom of the transcript
#[derive(Debug, Clone, Copy)]
pub struct PromptView<'a> {
    pub prompt: &'a str,
    pub input: &'a str,
    pub cursor_visible: bool,
}

/// Everything needed to draw one frame of the window
#[derive(Debug, Clone, Copy)]
pub struct TerminalView<'a> {
    pub title: &'a str,
    pub transcript: &'a Transcript,
    /// `None` while input is not accepted yet
    pub prompt: Option<PromptView<'a>>,
    /// Dim alternate content rows
    pub scanlines: bool,
    /// Dim the whole window (mid-animation)
    pub dim: bool,
}

/// Draw the window into `area` and return its layout
pub fn render_terminal(
    frame: &mut Frame,
    area: Rect,
    view: &TerminalView,
    theme: &Theme,
) -> WindowLayout {
    let layout = WindowLayout::new(area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border())
        .style(theme.window())
        .title(Line::from(Span::styled(format!(" {} ", view.title), theme.title())).centered());
    frame.render_widget(block, area);

    let buf = frame.buffer_mut();
    for (button, color) in [
        (layout.close, theme.close_button),
        (layout.minimize, theme.minimize_button),
        (layout.maximize, theme.maximize_button),
    ] {
        if button.width < 2 || button.height == 0 {
            continue;
        }
        if let Some(cell) = buf.cell_mut((button.x + 1, button.y)) {
            cell.set_char(BUTTON_GLYPH).set_fg(color);
        }
    }

    let content = layout.content;
    if !content.is_empty() {
        let mut lines = transcript_lines(view, theme, content.width);
        let overflow = lines.len().saturating_sub(content.height as usize);
        lines.drain(..overflow);
        frame.render_widget(Paragraph::new(lines).style(theme.window()), content);

        if view.scanlines {
            let buf = frame.buffer_mut();
            for row in (content.top()..content.bottom()).skip(1).step_by(2) {
                buf.set_style(
                    Rect::new(content.x, row, content.width, 1),
                    Style::default().add_modifier(Modifier::DIM),
                );
            }
        }
    }

    if view.dim {
        frame
            .buffer_mut()
            .set_style(area, Style::default().add_modifier(Modifier::DIM));
    }

    layout
}

/// Wrapped display lines for the transcript and the prompt
fn transcript_lines(view: &TerminalView, theme: &Theme, width: u16) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for entry in view.transcript {
        match entry {
            TranscriptLine::Command(text) | TranscriptLine::Output(text) => {
                let style = if matches!(entry, TranscriptLine::Command(_)) {
                    theme.command()
                } else {
                    theme.output()
                };
                for part in text.split('\n') {
                    lines.extend(wrap_spans(vec![Span::styled(part.to_string(), style)], width));
                }
            }
            TranscriptLine::Input { prompt, text } => {
                lines.extend(wrap_spans(
                    vec![
                        Span::styled(prompt.clone(), theme.prompt()),
                        Span::raw(" "),
                        Span::styled(text.clone(), theme.input()),
                    ],
                    width,
                ));
            }
        }
    }

    if let Some(prompt) = view.prompt {
        let cursor = if prompt.cursor_visible {
            CURSOR_GLYPH
        } else {
            " "
        };
        lines.extend(wrap_spans(
            vec![
                Span::styled(prompt.prompt.to_string(), theme.prompt()),
                Span::raw(" "),
                Span::styled(prompt.input.to_string(), theme.input()),
                Span::styled(cursor, theme.cursor()),
            ],
            width,
        ));
    }

    lines
}
