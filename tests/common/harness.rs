// Test harness: an App on a TestBackend with a logical clock

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use termfolio::app::{App, Services};
use termfolio::background::ProceduralBackground;
use termfolio::config::Config;
use termfolio::services::intro::{IntroError, IntroSource};
use termfolio::services::opener::LinkOpener;
use termfolio::services::relay::{MessagePayload, MessageRelay, RelayError};
use termfolio::services::storage::{MemoryNameStore, NameStore};
use termfolio::services::time_source::TestTimeSource;

/// Real-time bound on waiting for a worker thread
const ASYNC_WAIT: Duration = Duration::from_secs(5);

pub const DEFAULT_INTRO: &str = "Hello, I'm Jake.\nI build things.";

/// Introduction source with a fixed outcome
pub struct StaticIntro(pub Result<String, IntroError>);

impl IntroSource for StaticIntro {
    fn load(&self) -> Result<String, IntroError> {
        self.0.clone()
    }
}

/// Relay that records payloads and answers with a fixed outcome
#[derive(Clone)]
pub struct RecordingRelay {
    pub sent: Arc<Mutex<Vec<MessagePayload>>>,
    pub succeed: bool,
}

impl RecordingRelay {
    pub fn new(succeed: bool) -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            succeed,
        }
    }
}

impl MessageRelay for RecordingRelay {
    fn send(&self, payload: &MessagePayload) -> Result<(), RelayError> {
        self.sent.lock().unwrap().push(payload.clone());
        if self.succeed {
            Ok(())
        } else {
            Err(RelayError::Status(500))
        }
    }
}

/// Link opener that records URLs instead of launching a browser
#[derive(Clone, Default)]
pub struct RecordingOpener {
    pub opened: Arc<Mutex<Vec<String>>>,
}

impl LinkOpener for RecordingOpener {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Knobs for building a harness
pub struct HarnessOptions {
    pub config: Config,
    pub intro: Result<String, IntroError>,
    pub relay: Arc<dyn MessageRelay>,
    pub names: Box<dyn NameStore>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            config: Config::default(),
            intro: Ok(DEFAULT_INTRO.to_string()),
            relay: Arc::new(RecordingRelay::new(true)),
            names: Box::new(MemoryNameStore::new()),
        }
    }
}

pub struct TermfolioTestHarness {
    app: App,
    terminal: Terminal<TestBackend>,
    time: Arc<TestTimeSource>,
    opener: RecordingOpener,
}

impl TermfolioTestHarness {
    pub fn new(width: u16, height: u16) -> anyhow::Result<Self> {
        Self::with_options(width, height, HarnessOptions::default())
    }

    pub fn with_options(width: u16, height: u16, options: HarnessOptions) -> anyhow::Result<Self> {
        let time = TestTimeSource::shared();
        let opener = RecordingOpener::default();
        let services = Services {
            relay: options.relay,
            opener: Box::new(opener.clone()),
            names: options.names,
            intro: Arc::new(StaticIntro(options.intro)),
            time: time.clone(),
        };
        let app = App::new(
            &options.config,
            services,
            Box::new(ProceduralBackground::new()),
            Rect::new(0, 0, width, height),
        );
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            app,
            terminal,
            time,
            opener,
        })
    }

    /// Harness with the introduction already played back and the entrance finished
    pub fn ready(width: u16, height: u16) -> anyhow::Result<Self> {
        let mut harness = Self::new(width, height)?;
        harness.finish_intro();
        Ok(harness)
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn opened_links(&self) -> Vec<String> {
        self.opener.opened.lock().unwrap().clone()
    }

    /// Move the logical clock forward and run timers
    pub fn advance(&mut self, duration: Duration) {
        self.time.advance(duration);
        self.app.tick();
    }

    /// Apply completions until no worker thread is outstanding
    pub fn wait_for_async(&mut self) {
        while self.app.pending_async() > 0 {
            assert!(
                self.app.wait_for_async(ASYNC_WAIT),
                "worker thread did not report back in time"
            );
        }
        self.app.tick();
    }

    /// Wait for the introduction text and play it to completion
    pub fn finish_intro(&mut self) {
        self.wait_for_async();
        let total = self
            .app
            .playback()
            .total_duration()
            .expect("introduction text should be loaded");
        // Entrance animation is 1200ms; make sure it has settled too
        self.advance(total.max(Duration::from_millis(1200)));
        assert!(self.app.playback().is_complete());
    }

    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.app.handle_key(KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        self.app.handle_key(code, modifiers);
    }

    /// Type a command, press Enter and apply any async completion
    pub fn submit(&mut self, command: &str) {
        self.type_text(command);
        self.send_key(KeyCode::Enter, KeyModifiers::NONE);
        self.wait_for_async();
    }

    fn mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) -> bool {
        self.app.handle_mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    pub fn mouse_down(&mut self, column: u16, row: u16) -> bool {
        self.mouse(MouseEventKind::Down(MouseButton::Left), column, row)
    }

    pub fn mouse_drag(&mut self, column: u16, row: u16) -> bool {
        self.mouse(MouseEventKind::Drag(MouseButton::Left), column, row)
    }

    pub fn mouse_up(&mut self, column: u16, row: u16) -> bool {
        self.mouse(MouseEventKind::Up(MouseButton::Left), column, row)
    }

    pub fn resize(&mut self, width: u16, height: u16) -> anyhow::Result<()> {
        self.terminal.backend_mut().resize(width, height);
        self.terminal.autoresize()?;
        self.app.resize(width, height);
        Ok(())
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let app = &mut self.app;
        self.terminal.draw(|frame| app.render(frame))?;
        Ok(())
    }

    /// Transcript payloads, top to bottom
    pub fn transcript_texts(&self) -> Vec<String> {
        self.app
            .session()
            .transcript()
            .iter()
            .map(|line| line.text().to_string())
            .collect()
    }

    pub fn last_output(&self) -> Option<String> {
        self.app
            .session()
            .transcript()
            .last()
            .map(|line| line.text().to_string())
    }

    /// The rendered screen as text, one line per row
    pub fn screen_to_string(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "Expected screen to contain {:?}\nScreen:\n{}",
            text,
            screen
        );
    }

    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "Expected screen not to contain {:?}\nScreen:\n{}",
            text,
            screen
        );
    }
}
