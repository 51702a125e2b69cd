use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the type sidebar panel.
///
/// Entry 0 is always the synthetic "all" filter; the rest is the fetched
/// type catalog in API order. While the catalog is loading the panel shows
/// a placeholder instead of an empty list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let is_focused = app.focus == Focus::Sidebar;

    let items: Vec<ListItem> = if app.feed.catalog_loading() {
        vec![ListItem::new("Loading types...")]
    } else {
        (0..app.sidebar_len())
            .map(|i| {
                let name = app.sidebar_entry(i);
                let style = if i == app.sidebar_selected {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else if name == app.feed.selected_type() {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(name.to_string()).style(style)
            })
            .collect()
    };

    let border_style = if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title("Types"),
    );

    f.render_widget(list, area);
}
