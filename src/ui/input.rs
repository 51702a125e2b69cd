//! Input handling for the TUI.
//!
//! This module processes keyboard input and dispatches to the appropriate
//! handler based on current view and mode.

use crate::app::{App, AppEvent, Focus, InputMode, View};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::tasks;
use super::Action;

/// Maximum allowed search term length (UI layer validation)
const MAX_SEARCH_LENGTH: usize = 256;

/// Main input dispatch function.
///
/// Routes input to the appropriate handler based on current mode and view.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Search editing captures all keys
    if app.input_mode == InputMode::Search {
        return handle_search_input(app, code);
    }

    match app.view {
        View::Browse => handle_browse_input(app, code, modifiers, event_tx),
        View::Detail => handle_detail_input(app, code),
    }
}

/// Handle input while editing the search term.
///
/// Every edit reapplies the filter immediately; Esc clears it, Enter keeps
/// the current term and returns to normal navigation.
fn handle_search_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.feed.set_search("");
            app.clamp_selection();
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut term = app.feed.search_term().to_string();
            term.pop();
            app.feed.set_search(&term);
            app.clamp_selection();
        }
        KeyCode::Char(c) => {
            if app.feed.search_term().len() < MAX_SEARCH_LENGTH {
                let mut term = app.feed.search_term().to_string();
                term.push(c);
                app.feed.set_search(&term);
                app.clamp_selection();
            }
        }
        _ => {}
    }
    Action::Continue
}

/// Handle input in browse view (sidebar + feed grid).
fn handle_browse_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }

        KeyCode::Tab => {
            app.focus = match app.focus {
                Focus::Sidebar => Focus::Feed,
                Focus::Feed => Focus::Sidebar,
            };
        }

        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
            app.focus = Focus::Feed;
        }

        KeyCode::Char('j') | KeyCode::Down => nav_down(app, 1),
        KeyCode::Char('k') | KeyCode::Up => nav_up(app, 1),
        KeyCode::PageDown => nav_down(app, crate::feed::PAGE_SIZE),
        KeyCode::PageUp => nav_up(app, crate::feed::PAGE_SIZE),

        KeyCode::Char('g') | KeyCode::Home => match app.focus {
            Focus::Sidebar => app.sidebar_selected = 0,
            Focus::Feed => app.selected_row = 0,
        },

        KeyCode::Enter => match app.focus {
            Focus::Sidebar => {
                let type_name = app.sidebar_selected_type();
                let needs_fetch = app.feed.select_type(&type_name);
                app.selected_row = 0;
                app.sentinel.retarget(None);
                if needs_fetch {
                    tasks::spawn_type_load(app.client.clone(), type_name, event_tx.clone());
                }
                app.focus = Focus::Feed;
            }
            Focus::Feed => {
                let name = app
                    .feed
                    .visible()
                    .get(app.selected_row)
                    .map(|p| p.name.clone());
                if let Some(name) = name {
                    let generation = app.enter_detail(&name);
                    tasks::spawn_detail_load(
                        app.client.clone(),
                        name,
                        generation,
                        event_tx.clone(),
                    );
                }
            }
        },

        KeyCode::Esc => {
            if !app.feed.search_term().is_empty() {
                app.feed.set_search("");
                app.clamp_selection();
            }
        }

        _ => {}
    }
    Action::Continue
}

/// Handle input in the detail view.
fn handle_detail_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => app.exit_detail(),
        _ => {}
    }
    Action::Continue
}

/// Move the selection down within the focused panel.
fn nav_down(app: &mut App, step: usize) {
    match app.focus {
        Focus::Sidebar => {
            let len = app.sidebar_len();
            if len > 0 {
                app.sidebar_selected = (app.sidebar_selected + step).min(len - 1);
            }
        }
        Focus::Feed => {
            let len = app.feed.visible().len();
            if len > 0 {
                app.selected_row = (app.selected_row + step).min(len - 1);
            }
        }
    }
}

/// Move the selection up within the focused panel.
fn nav_up(app: &mut App, step: usize) {
    match app.focus {
        Focus::Sidebar => {
            app.sidebar_selected = app.sidebar_selected.saturating_sub(step);
        }
        Focus::Feed => {
            app.selected_row = app.selected_row.saturating_sub(step);
        }
    }
}
