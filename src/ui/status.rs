use crate::app::{App, InputMode, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Status bar needs at least 1 char width to be meaningful
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Use Cow to avoid allocations for static strings and borrowed status messages
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.feed.loading() {
        Cow::Borrowed("Loading...")
    } else {
        // Static keybinding hints - zero allocation
        match app.view {
            View::Browse => {
                if app.input_mode == InputMode::Search {
                    Cow::Borrowed("Type to filter | ESC clear | ENTER keep")
                } else {
                    Cow::Borrowed("[j/k]move [Tab]switch [/]filter [Enter]open [q]uit")
                }
            }
            View::Detail => Cow::Borrowed("[Esc]back [q]uit"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}
