//! Application state and event dispatch
//!
//! `App` owns the session, the window, the intro playback and the
//! background, and turns terminal events and timer ticks into state
//! transitions. Blocking work (loading the introduction, delivering
//! messages) runs on worker threads that report back as [`AsyncMessage`]s.

mod input;

use crate::background::{Background, BackgroundRenderer, BackgroundSelection};
use crate::command;
use crate::config::Config;
use crate::model::playback::IntroPlayback;
use crate::model::window::{dock_rect, WindowAction, WindowState};
use crate::services::intro::{self, IntroSource};
use crate::services::opener::LinkOpener;
use crate::services::relay::{MessagePayload, MessageRelay};
use crate::services::storage::NameStore;
use crate::services::time_source::SharedTimeSource;
use crate::session::{Effect, Session};
use crate::view::dock::render_dock;
use crate::view::terminal::{render_terminal, PromptView, TerminalView};
use crate::view::theme::Theme;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Frame interval while something is moving
pub const FRAME_DURATION: Duration = Duration::from_millis(16);
/// Poll interval when idle (cursor blink still needs redraws)
pub const IDLE_POLL: Duration = Duration::from_millis(50);

const CURSOR_BLINK: Duration = Duration::from_millis(800);
const SCANLINE_PERIOD: Duration = Duration::from_secs(3);
const SCANLINE_FLASH: Duration = Duration::from_millis(100);

/// Completions coming back from worker threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncMessage {
    /// Introduction text, or the error line that replaces it
    IntroLoaded(String),
    MessageDelivered { name: String, delivered: bool },
}

/// External collaborators, injected so tests can substitute them
pub struct Services {
    pub relay: Arc<dyn MessageRelay>,
    pub opener: Box<dyn LinkOpener>,
    pub names: Box<dyn NameStore>,
    pub intro: Arc<dyn IntroSource>,
    pub time: SharedTimeSource,
}

pub struct App {
    session: Session,
    window: WindowState,
    playback: IntroPlayback,
    background: Background,
    services: Services,
    theme: Theme,
    owner_handle: String,
    /// Command listing shown after the introduction and by HELP
    listing: Vec<String>,
    async_tx: Sender<AsyncMessage>,
    async_rx: Receiver<AsyncMessage>,
    /// Worker threads that have not reported back yet
    pending_async: usize,
    viewport: Rect,
    started_at: Instant,
    should_quit: bool,
}

impl App {
    /// Build the app and start the introduction: the command echo is shown
    /// right away and the text is loaded on a worker thread.
    pub fn new(
        config: &Config,
        services: Services,
        renderer: Box<dyn BackgroundRenderer>,
        viewport: Rect,
    ) -> Self {
        let now = services.time.now();

        let selection = BackgroundSelection {
            enabled: config.background.enabled,
            preset: config.initial_preset().unwrap_or(crate::background::Preset::Voronoi),
        };
        let mut session = Session::new(
            config.owner.handle.clone(),
            config.owner.profile_url.clone(),
            selection,
        );
        if let Some(name) = services.names.load_name() {
            tracing::debug!("Loaded stored user name");
            session.set_user_name(name);
        }

        let mut background = Background::new(
            renderer,
            Duration::from_secs(config.background.auto_cycle_secs),
            now,
        );
        background.resize(viewport.width, viewport.height);
        background.apply(selection, now);

        let window = WindowState::new(config.window.width, config.window.height, viewport, now);
        let mut playback = IntroPlayback::new(
            Duration::from_millis(config.intro.char_delay_ms),
            Duration::from_millis(config.intro.commands_pause_ms),
        );
        let echo = session.intro_echo();
        playback.start(echo, session.transcript_mut(), now);

        let (async_tx, async_rx) = mpsc::channel();
        let mut app = Self {
            session,
            window,
            playback,
            background,
            theme: Theme::default(),
            owner_handle: config.owner.handle.clone(),
            listing: command::command_listing(),
            async_tx,
            async_rx,
            pending_async: 0,
            viewport,
            started_at: now,
            should_quit: false,
            services,
        };
        app.spawn_intro_load();
        app
    }

    fn spawn_intro_load(&mut self) {
        let source = Arc::clone(&self.services.intro);
        let tx = self.async_tx.clone();
        self.pending_async += 1;
        std::thread::spawn(move || {
            let text = intro::load_or_error_text(source.as_ref());
            let _ = tx.send(AsyncMessage::IntroLoaded(text));
        });
    }

    fn spawn_delivery(&mut self, payload: MessagePayload) {
        let relay = Arc::clone(&self.services.relay);
        let tx = self.async_tx.clone();
        self.pending_async += 1;
        std::thread::spawn(move || {
            let delivered = match relay.send(&payload) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Message delivery failed: {}", e);
                    false
                }
            };
            let _ = tx.send(AsyncMessage::MessageDelivered {
                name: payload.name,
                delivered,
            });
        });
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn window(&self) -> &WindowState {
        &self.window
    }

    pub fn playback(&self) -> &IntroPlayback {
        &self.playback
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        tracing::info!("Quit requested");
        self.should_quit = true;
    }

    /// Number of worker threads still running
    pub fn pending_async(&self) -> usize {
        self.pending_async
    }

    /// The prompt accepts input once the introduction has finished
    pub fn accepts_input(&self) -> bool {
        self.playback.is_complete() && self.window.layout(self.viewport).is_some()
    }

    /// Apply any completions that have arrived. Returns true if state changed.
    pub fn process_async_messages(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.async_rx.try_recv() {
            self.apply_async(message);
            changed = true;
        }
        changed
    }

    /// Block until one completion arrives (or `timeout` passes) and apply it
    pub fn wait_for_async(&mut self, timeout: Duration) -> bool {
        match self.async_rx.recv_timeout(timeout) {
            Ok(message) => {
                self.apply_async(message);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    fn apply_async(&mut self, message: AsyncMessage) {
        self.pending_async = self.pending_async.saturating_sub(1);
        let now = self.services.time.now();
        match message {
            AsyncMessage::IntroLoaded(text) => {
                tracing::debug!("Introduction loaded ({} bytes)", text.len());
                self.playback.set_text(&text, now);
                self.playback
                    .advance(now, self.session.transcript_mut(), &self.listing);
            }
            AsyncMessage::MessageDelivered { name, delivered } => {
                tracing::info!("Message delivery finished, delivered={}", delivered);
                self.session.message_delivered(&name, delivered);
            }
        }
    }

    /// Run timed transitions up to the current instant
    pub fn tick(&mut self) -> bool {
        let now = self.services.time.now();
        let mut changed = self
            .playback
            .advance(now, self.session.transcript_mut(), &self.listing);
        changed |= self.window.advance(now);

        if let Some(preset) = self.background.poll_cycle(now) {
            tracing::debug!("Auto-cycling background to {}", preset.name());
            self.session.set_background_preset(preset);
            self.background.apply(self.session.background(), now);
            changed = true;
        }
        changed
    }

    /// How long the event loop may wait for input before the next frame
    pub fn frame_timeout(&self) -> Duration {
        if self.window.is_animating() || self.playback.is_running() || self.background.is_running()
        {
            FRAME_DURATION
        } else {
            IDLE_POLL
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        tracing::debug!("Viewport resized to {}x{}", width, height);
        self.viewport = Rect::new(0, 0, width, height);
        self.background.resize(width, height);
        let now = self.services.time.now();
        self.window.apply(WindowAction::Resize, self.viewport, now);
    }

    pub(crate) fn apply_window(&mut self, action: WindowAction) {
        let now = self.services.time.now();
        self.window.apply(action, self.viewport, now);
    }

    /// Submit the prompt and carry out the resulting effect
    pub(crate) fn submit_input(&mut self) {
        if let Some(effect) = self.session.submit() {
            self.execute(effect);
        }
    }

    fn execute(&mut self, effect: Effect) {
        let now = self.services.time.now();
        match effect {
            Effect::OpenLink(url) => {
                if let Err(e) = self.services.opener.open(&url) {
                    tracing::warn!("Failed to open {}: {}", url, e);
                }
            }
            Effect::SendMessage(payload) => self.spawn_delivery(payload),
            Effect::PersistName(name) => {
                if let Err(e) = self.services.names.store_name(&name) {
                    tracing::warn!("Failed to persist user name: {}", e);
                }
            }
            Effect::BackgroundChanged(selection) => {
                self.background.apply(selection, now);
            }
            Effect::PresetSelected(selection) => {
                self.background.select(selection, now);
            }
            Effect::Shake => {
                self.window.apply(WindowAction::Shake, self.viewport, now);
            }
        }
    }

    fn cursor_visible(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_millis() / CURSOR_BLINK.as_millis()) % 2 == 0
    }

    fn scanlines_active(&self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.started_at);
        elapsed >= SCANLINE_PERIOD
            && elapsed.as_millis() % SCANLINE_PERIOD.as_millis() < SCANLINE_FLASH.as_millis()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let now = self.services.time.now();
        let area = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.backdrop)),
            area,
        );
        self.background.render(frame.buffer_mut(), area, now);

        if let Some((rect, transform)) = self.window.visible_frame(self.viewport, now) {
            if let Some(target) = transform.apply(rect, area) {
                let prompt = self.session.prompt();
                let title = format!("{}@{}: ~", self.session.user_name(), self.owner_handle);
                let view = TerminalView {
                    title: &title,
                    transcript: self.session.transcript(),
                    prompt: self.playback.is_complete().then(|| PromptView {
                        prompt: &prompt,
                        input: self.session.input(),
                        cursor_visible: self.cursor_visible(now),
                    }),
                    scanlines: self.scanlines_active(now),
                    dim: transform.dim,
                };
                render_terminal(frame, target, &view, &self.theme);
            }
        }

        if self.window.dock_visible() {
            let label = format!("{} terminal", self.owner_handle);
            render_dock(frame, area, &label, &self.theme);
        }
    }

    /// Whether a pointer position lands on the dock
    pub(crate) fn on_dock(&self, column: u16, row: u16) -> bool {
        self.window.dock_visible()
            && dock_rect(self.viewport).contains(ratatui::layout::Position::new(column, row))
    }
}
