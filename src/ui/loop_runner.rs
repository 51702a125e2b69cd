//! Main event loop for the TUI.
//!
//! This module contains the core event loop that multiplexes terminal input,
//! background task events, and periodic ticks. It is also where pending
//! fetch work gets dispatched: after every state change the loop asks the
//! feed controller whether the catalog, the background preload, or the next
//! page needs to be fetched, and spawns the matching task exactly once.

use crate::app::{App, AppEvent};
use anyhow::Result;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::input::handle_input;
use super::render::render;
use super::tasks;

/// Result of handling a key press event.
///
/// Returned by input handlers to signal whether the application should
/// continue running or terminate gracefully.
pub enum Action {
    /// Continue the event loop and process more events.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// Uses `tokio::select!` to multiplex three event sources:
/// - **Terminal input**: Key presses from crossterm's async event stream
/// - **Background tasks**: Catalog, preload, page, type, and detail results
///   via the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for status expiry
///
/// # Panic Safety
///
/// Installs a panic hook that restores terminal state before unwinding,
/// ensuring the terminal is not left in raw mode on panic.
///
/// # Arguments
///
/// * `app` - Mutable application state
/// * `event_tx` - Sender handed to spawned background tasks
/// * `event_rx` - Receiver for background task completion events
///
/// # Returns
///
/// Returns `Ok(())` on graceful exit (user quit), or an error if terminal
/// setup fails.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    // Install panic hook BEFORE setting up terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut event_stream = crossterm::event::EventStream::new();

    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    // Signal handlers for graceful shutdown (Unix only)
    // On non-Unix platforms, these become pending futures that never complete
    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    loop {
        // Dispatch any fetch work the last round of events made pending
        pump_fetches(app, &event_tx);
        check_sentinel(app);

        // Only render when state has changed
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // Clear expired status messages and trigger redraw if cleared
        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain all pending app events before handling more input so
        // background results are processed promptly during rapid typing.
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        // Platform-specific signal futures
        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;  // Process in order listed for predictable behavior

            // Signal handlers for graceful shutdown (highest priority)
            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            // Terminal input events
            maybe_event = event_stream.next() => {
                if let Some(Ok(Event::Key(key))) = maybe_event {
                    app.needs_redraw = true;
                    match handle_input(app, key.code, key.modifiers, &event_tx) {
                        Action::Quit => break,
                        Action::Continue => {}
                    }
                }
            }

            // Background task events (blocking recv for when queue was empty)
            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            // Periodic tick for status expiry
            _ = tick_interval.tick() => {}
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

/// Spawn whatever fetch work the controller reports as pending.
///
/// Each `begin_*` call transitions the matching slot to its loading state
/// before the task is spawned, so calling this every iteration never
/// dispatches duplicate requests.
fn pump_fetches(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    if app.feed.begin_catalog_load() {
        tasks::spawn_catalog_load(app.client.clone(), event_tx.clone());
    }

    if app.config.background_preload && app.feed.begin_full_preload() {
        tasks::spawn_preload(
            app.client.clone(),
            Duration::from_millis(app.config.preload_pause_ms),
            event_tx.clone(),
        );
    }

    if let Some(req) = app.feed.begin_page_fetch() {
        tasks::spawn_page_fetch(app.client.clone(), req, event_tx.clone());
    }
}

/// Check whether the selection has reached the armed end-of-list target
/// and advance the page if so.
fn check_sentinel(app: &mut App) {
    let (last_id, at_end, has_more, loading) = {
        let visible = app.feed.visible();
        (
            visible.last().map(|p| p.id),
            !visible.is_empty() && app.selected_row + 1 == visible.len(),
            app.feed.has_more(),
            app.feed.loading(),
        )
    };
    app.sentinel.retarget(last_id);
    if app.sentinel.observe(at_end, has_more, loading) && app.feed.advance_page() {
        app.needs_redraw = true;
    }
}

/// Set up the terminal for TUI rendering.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state.
fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
