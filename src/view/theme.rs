use ratatui::style::{Color, Modifier, Style};

/// Colours used to draw the terminal window and the dock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Screen fill when the background is disabled
    pub backdrop: Color,
    pub window_bg: Color,
    pub border: Color,
    pub title: Color,
    pub close_button: Color,
    pub minimize_button: Color,
    pub maximize_button: Color,
    /// Scripted command echo
    pub command: Color,
    pub output: Color,
    pub prompt: Color,
    pub input: Color,
    pub cursor: Color,
    pub dock_bg: Color,
    pub dock_fg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            backdrop: Color::Rgb(8, 8, 12),
            window_bg: Color::Rgb(16, 18, 24),
            border: Color::Rgb(70, 76, 92),
            title: Color::Rgb(170, 176, 190),
            close_button: Color::Rgb(255, 95, 87),
            minimize_button: Color::Rgb(254, 188, 46),
            maximize_button: Color::Rgb(40, 200, 64),
            command: Color::Rgb(80, 250, 123),
            output: Color::Rgb(220, 224, 232),
            prompt: Color::Rgb(80, 250, 123),
            input: Color::Rgb(240, 240, 240),
            cursor: Color::Rgb(80, 250, 123),
            dock_bg: Color::Rgb(36, 40, 52),
            dock_fg: Color::Rgb(220, 224, 232),
        }
    }

    pub fn window(&self) -> Style {
        Style::default().bg(self.window_bg).fg(self.output)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border).bg(self.window_bg)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.title)
            .bg(self.window_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn command(&self) -> Style {
        Style::default().fg(self.command)
    }

    pub fn output(&self) -> Style {
        Style::default().fg(self.output)
    }

    pub fn prompt(&self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input(&self) -> Style {
        Style::default().fg(self.input)
    }

    pub fn cursor(&self) -> Style {
        Style::default().fg(self.cursor)
    }

    pub fn dock(&self) -> Style {
        Style::default().fg(self.dock_fg).bg(self.dock_bg)
    }
}
