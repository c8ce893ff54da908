use super::theme::Theme;
use crate::model::window::dock_rect;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Clear, Paragraph};
use ratatui::Frame;

/// Draw the dock on the bottom row of `viewport` and return where it is
pub fn render_dock(frame: &mut Frame, viewport: Rect, label: &str, theme: &Theme) -> Rect {
    let area = dock_rect(viewport);
    if area.is_empty() {
        return area;
    }
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Line::from(format!("▣ {label}")).centered()).style(theme.dock()),
        area,
    );
    area
}
