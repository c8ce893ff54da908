//! Hard wrapping of styled text to a cell width

use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// Wrap `spans` into lines no wider than `width` cells.
///
/// Breaks fall between characters; a character wider than the whole line
/// still gets a line of its own. Always returns at least one line.
pub fn wrap_spans(spans: Vec<Span<'static>>, width: u16) -> Vec<Line<'static>> {
    let width = width.max(1) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0usize;

    for span in spans {
        let style = span.style;
        let mut chunk = String::new();

        for c in span.content.chars() {
            let w = c.width().unwrap_or(0);
            if current_width + w > width && current_width > 0 {
                if !chunk.is_empty() {
                    current.push(Span::styled(std::mem::take(&mut chunk), style));
                }
                lines.push(Line::from(std::mem::take(&mut current)));
                current_width = 0;
            }
            chunk.push(c);
            current_width += w;
        }

        if !chunk.is_empty() {
            current.push(Span::styled(chunk, style));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}
