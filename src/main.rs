use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{
    poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEvent, KeyEventKind,
    MouseEvent, MouseEventKind,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use termfolio::app::{App, Services};
use termfolio::background::{Preset, ProceduralBackground};
use termfolio::config::Config;
use termfolio::config_io::DirectoryContext;
use termfolio::services::intro::IntroLoader;
use termfolio::services::opener::SystemOpener;
use termfolio::services::relay::HttpRelay;
use termfolio::services::storage::LocalStorage;
use termfolio::services::terminal_modes::{self, Mode, TerminalModes};
use termfolio::services::time_source::RealTimeSource;
use termfolio::services::{log_dirs, tracing_setup};

/// A portfolio terminal over an animated background
#[derive(Parser, Debug)]
#[command(name = "termfolio")]
#[command(about = "A draggable portfolio terminal with a tiny command interpreter", long_about = None)]
#[command(version)]
struct Args {
    /// Path to configuration file (replaces the layered lookup)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: per-process file in the state dir)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Introduction source: a file path or an http(s) URL
    #[arg(long, value_name = "SOURCE")]
    intro: Option<String>,

    /// Start with the animated background disabled
    #[arg(long)]
    no_background: bool,

    /// Initial background pattern
    #[arg(long, value_name = "NAME")]
    pattern: Option<String>,

    /// Print the directories used by termfolio and exit
    #[arg(long)]
    show_paths: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,
}

/// Resolve the configuration and apply command-line overrides
fn load_config(args: &Args, dir_context: &DirectoryContext) -> AnyhowResult<Config> {
    let mut config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        let working_dir = std::env::current_dir().unwrap_or_default();
        Config::load_with_layers(dir_context, &working_dir)
    };

    if let Some(source) = &args.intro {
        config.intro.source = source.clone();
    }
    if args.no_background {
        config.background.enabled = false;
    }
    if let Some(name) = &args.pattern {
        let preset = Preset::from_name(name).with_context(|| {
            format!("Unknown pattern '{}'. Available: {}", name, Preset::names())
        })?;
        config.background.preset = preset.name().to_string();
    }

    Ok(config)
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();
    let dir_context =
        DirectoryContext::from_system().context("Failed to determine user directories")?;

    if args.show_paths {
        log_dirs::print_all_paths(&dir_context);
        return Ok(());
    }

    let config = load_config(&args, &dir_context)?;

    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not open log file {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("termfolio starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut terminal_modes = TerminalModes::enable()?;
    if !terminal_modes.is_active(Mode::MouseCapture) {
        tracing::info!("No mouse capture; window controls are on F9 and F10");
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    let size = terminal.size()?;
    let viewport = Rect::new(0, 0, size.width, size.height);
    tracing::debug!("Initial viewport {}x{}", size.width, size.height);

    let services = Services {
        relay: Arc::new(HttpRelay::from_config(&config.relay)),
        opener: Box::new(SystemOpener),
        names: Box::new(LocalStorage::open_or_empty(
            dir_context.local_storage_path(),
        )),
        intro: Arc::new(IntroLoader::from_source(&config.intro.source)),
        time: RealTimeSource::shared(),
    };
    let mut app = App::new(
        &config,
        services,
        Box::new(ProceduralBackground::new()),
        viewport,
    );

    let result = run_event_loop(&mut app, &mut terminal);

    terminal_modes.undo();
    if let Err(e) = &result {
        tracing::error!("Event loop failed: {:#}", e);
    }
    tracing::info!("termfolio exiting");
    result
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    let mut last_render = Instant::now()
        .checked_sub(app.frame_timeout())
        .unwrap_or_else(Instant::now);
    let mut pending_event: Option<CrosstermEvent> = None;
    let mut needs_render = true;

    loop {
        app.process_async_messages();
        app.tick();

        if app.should_quit() {
            break;
        }

        let frame_timeout = app.frame_timeout();
        if needs_render || last_render.elapsed() >= frame_timeout {
            terminal.draw(|frame| app.render(frame))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let event = if let Some(e) = pending_event.take() {
            Some(e)
        } else {
            let timeout = frame_timeout.saturating_sub(last_render.elapsed());
            if event_poll(timeout)? {
                Some(event_read()?)
            } else {
                None
            }
        };

        let Some(event) = event else { continue };

        let (event, next) = coalesce_pointer_moves(event)?;
        pending_event = next;

        match event {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    handle_key_event(app, key_event);
                }
            }
            CrosstermEvent::Mouse(mouse_event) => {
                // Drags and button clicks show up without waiting for the frame
                needs_render |= handle_mouse_event(app, mouse_event);
            }
            CrosstermEvent::Resize(w, h) => {
                app.resize(w, h);
                terminal.autoresize()?;
                needs_render = true;
            }
            CrosstermEvent::Paste(text) => {
                app.handle_paste(&text);
            }
            _ => {}
        }
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    tracing::trace!(
        "Key event received: code={:?}, modifiers={:?}, kind={:?}",
        key_event.code,
        key_event.modifiers,
        key_event.kind,
    );
    app.handle_key(key_event.code, key_event.modifiers);
}

fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) -> bool {
    tracing::trace!(
        "Mouse event received: kind={:?}, column={}, row={}",
        mouse_event.kind,
        mouse_event.column,
        mouse_event.row,
    );
    app.handle_mouse(mouse_event)
}

fn is_pointer_move(event: &CrosstermEvent) -> bool {
    matches!(
        event,
        CrosstermEvent::Mouse(m) if matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Drag(_))
    )
}

/// Skip stale move and drag events, returning the latest one.
/// A different event read while draining is returned as pending.
fn coalesce_pointer_moves(
    event: CrosstermEvent,
) -> AnyhowResult<(CrosstermEvent, Option<CrosstermEvent>)> {
    if !is_pointer_move(&event) {
        return Ok((event, None));
    }

    let mut latest = event;
    while event_poll(Duration::ZERO)? {
        let next = event_read()?;
        if is_pointer_move(&next) {
            latest = next;
        } else {
            return Ok((latest, Some(next)));
        }
    }
    Ok((latest, None))
}
