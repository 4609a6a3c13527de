// src/ui.rs

pub mod footer;
pub mod header;

use crate::app::{App, AppEvent};
use crate::chat_view::draw_chat;
use crate::key_handlers::handle_key;
use crate::storage::KeyValueStorage;
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::{
    io,
    time::{Duration, Instant},
};
use tokio::sync::mpsc::{self, UnboundedReceiver};

const TICK_RATE: Duration = Duration::from_millis(50);

/// Enum for different types of events.
enum Event {
    Input(CEvent),
    Tick,
}

/// Runs the terminal UI until the user quits.
pub async fn run_ui<S: KeyValueStorage>(
    app: &mut App<S>,
    app_events: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, app_events).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Main loop of the application.
async fn run_app<B: Backend, S: KeyValueStorage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    mut app_events: UnboundedReceiver<AppEvent>,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Terminal polling blocks, so it gets its own thread.
    tokio::task::spawn_blocking(move || {
        let mut last_tick = Instant::now();
        loop {
            let timeout = TICK_RATE.saturating_sub(last_tick.elapsed());
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        if tx.blocking_send(Event::Input(event)).is_err() {
                            return;
                        }
                    }
                    Err(e) => log::warn!("Failed to read terminal event: {}", e),
                },
                Ok(false) => {}
                Err(e) => {
                    log::error!("Terminal event polling failed: {}", e);
                    return;
                }
            }

            if last_tick.elapsed() >= TICK_RATE {
                if tx.blocking_send(Event::Tick).is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        terminal.draw(|f| ui(f, app))?;

        tokio::select! {
            Some(event) = rx.recv() => match event {
                Event::Input(CEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_key(key, app);
                }
                Event::Input(_) => {}
                Event::Tick => app.tick(),
            },
            Some(event) = app_events.recv() => app.handle_event(event),
            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Renders the UI components.
pub fn ui<S: KeyValueStorage>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Conversation, status and input
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    header::draw_header(f, chunks[0]);
    draw_chat(f, app, chunks[1]);
    footer::draw_footer(f, chunks[2]);
}
